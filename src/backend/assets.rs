use anyhow::{Context, Result};
use macroquad::audio::{Sound, load_sound, load_sound_from_bytes};
use macroquad::color::Color;
use macroquad::texture::{FilterMode, Texture2D, load_texture};
use std::path::Path;

use crate::game::{Sprite, SpriteSet};
use crate::platform::{ImageId, SoundId};

const BACKGROUND_FILE: &str = "SnakeBoard.png";
const HEAD_FILE: &str = "SnakeHead.png";
const BODY_FILE: &str = "SnakeBody.png";
const FOOD_FILE: &str = "Apple.png";
const MUSIC_FILE: &str = "musicLoop.wav";
const EAT_FILE: &str = "eating.wav";
const CRASH_FILE: &str = "grunt.wav";

// Placeholder palette
const BOARD_COLOR: Color = Color::new(0.05, 0.12, 0.05, 1.0);
const HEAD_COLOR: Color = Color::new(0.64, 1.0, 0.64, 1.0);
const BODY_COLOR: Color = Color::new(0.25, 0.9, 0.25, 1.0);
const FOOD_COLOR: Color = Color::new(0.95, 0.2, 0.2, 1.0);

/// Decoded images and sounds for one run of the game
pub struct Assets {
    pub background: Texture2D,
    pub head: Texture2D,
    pub body: Texture2D,
    pub food: Texture2D,
    pub music: Sound,
    pub eat: Sound,
    pub crash: Sound,
}

impl Assets {
    /// Load every image and sound from `dir`. Any missing or undecodable
    /// file fails the whole load.
    pub async fn load(dir: &Path) -> Result<Self> {
        log::info!("loading assets from {}", dir.display());
        Ok(Self {
            background: texture_file(dir, BACKGROUND_FILE).await?,
            head: texture_file(dir, HEAD_FILE).await?,
            body: texture_file(dir, BODY_FILE).await?,
            food: texture_file(dir, FOOD_FILE).await?,
            music: sound_file(dir, MUSIC_FILE).await?,
            eat: sound_file(dir, EAT_FILE).await?,
            crash: sound_file(dir, CRASH_FILE).await?,
        })
    }

    /// Solid-colour cell textures and synthesized tones
    pub async fn generated(cell_size: f32) -> Result<Self> {
        log::info!("no asset directory given, using generated placeholders");
        let size = cell_size.round().clamp(1.0, u16::MAX as f32) as u16;

        let music = tone_wav(&MUSIC_NOTES, 0.25);
        let eat = tone_wav(&[(880.0, 0.08)], 0.6);
        let crash = tone_wav(&[(110.0, 0.25)], 0.7);

        Ok(Self {
            background: solid_texture(1, BOARD_COLOR),
            head: solid_texture(size, HEAD_COLOR),
            body: solid_texture(size, BODY_COLOR),
            food: solid_texture(size, FOOD_COLOR),
            music: load_sound_from_bytes(&music)
                .await
                .map_err(|err| anyhow::anyhow!("decoding generated music: {err:?}"))?,
            eat: load_sound_from_bytes(&eat)
                .await
                .map_err(|err| anyhow::anyhow!("decoding generated eat sound: {err:?}"))?,
            crash: load_sound_from_bytes(&crash)
                .await
                .map_err(|err| anyhow::anyhow!("decoding generated crash sound: {err:?}"))?,
        })
    }

    /// Collision extents come from the decoded image sizes
    pub fn sprites(&self) -> SpriteSet {
        SpriteSet {
            head: sprite_for(ImageId::SnakeHead, &self.head),
            body: sprite_for(ImageId::SnakeBody, &self.body),
            food: sprite_for(ImageId::Food, &self.food),
        }
    }

    pub fn texture(&self, image: ImageId) -> &Texture2D {
        match image {
            ImageId::Background => &self.background,
            ImageId::SnakeHead => &self.head,
            ImageId::SnakeBody => &self.body,
            ImageId::Food => &self.food,
        }
    }

    pub fn sound(&self, sound: SoundId) -> &Sound {
        match sound {
            SoundId::Music => &self.music,
            SoundId::Eat => &self.eat,
            SoundId::Crash => &self.crash,
        }
    }
}

fn sprite_for(image: ImageId, texture: &Texture2D) -> Sprite {
    Sprite::new(image, texture.width(), texture.height())
}

async fn texture_file(dir: &Path, name: &str) -> Result<Texture2D> {
    let path = dir.join(name);
    let texture = load_texture(&path.to_string_lossy())
        .await
        .map_err(|err| anyhow::anyhow!("{err:?}"))
        .with_context(|| format!("loading image {}", path.display()))?;
    texture.set_filter(FilterMode::Nearest);
    Ok(texture)
}

async fn sound_file(dir: &Path, name: &str) -> Result<Sound> {
    let path = dir.join(name);
    load_sound(&path.to_string_lossy())
        .await
        .map_err(|err| anyhow::anyhow!("{err:?}"))
        .with_context(|| format!("loading sound {}", path.display()))
}

fn solid_texture(size: u16, color: Color) -> Texture2D {
    let pixel = [color.r, color.g, color.b, color.a].map(|c| (c * 255.0) as u8);
    let bytes = pixel.repeat(size as usize * size as usize);
    let texture = Texture2D::from_rgba8(size, size, &bytes);
    texture.set_filter(FilterMode::Nearest);
    texture
}

// A short arpeggio, looped as background music
const MUSIC_NOTES: [(f32, f32); 8] = [
    (220.0, 0.2),
    (277.2, 0.2),
    (329.6, 0.2),
    (440.0, 0.2),
    (329.6, 0.2),
    (277.2, 0.2),
    (246.9, 0.2),
    (196.0, 0.2),
];

/// PCM16 mono WAV holding the given (frequency Hz, duration s) notes back to back
pub fn tone_wav(notes: &[(f32, f32)], volume: f32) -> Vec<u8> {
    let sample_rate: u32 = 44100;
    let num_samples: u32 = notes
        .iter()
        .map(|&(_, seconds)| (seconds * sample_rate as f32) as u32)
        .sum();
    let mut data: Vec<u8> = Vec::with_capacity((num_samples as usize) * 2 + 44);

    let block_align: u16 = 2; // mono 16-bit
    let byte_rate: u32 = sample_rate * block_align as u32;
    let data_size: u32 = num_samples * 2;
    let chunk_size: u32 = 36 + data_size;

    // RIFF header
    data.extend_from_slice(b"RIFF");
    data.extend_from_slice(&chunk_size.to_le_bytes());
    data.extend_from_slice(b"WAVE");
    // fmt chunk
    data.extend_from_slice(b"fmt ");
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes()); // PCM
    data.extend_from_slice(&1u16.to_le_bytes()); // channels
    data.extend_from_slice(&sample_rate.to_le_bytes());
    data.extend_from_slice(&byte_rate.to_le_bytes());
    data.extend_from_slice(&block_align.to_le_bytes());
    data.extend_from_slice(&16u16.to_le_bytes());
    // data chunk
    data.extend_from_slice(b"data");
    data.extend_from_slice(&data_size.to_le_bytes());

    let amplitude = volume.clamp(0.0, 1.0) * 0.7;
    for &(frequency_hz, seconds) in notes {
        let samples = (seconds * sample_rate as f32) as u32;
        for n in 0..samples {
            let t = n as f32 / sample_rate as f32;
            // Short linear fade at both ends of a note to avoid clicks
            let edge = (n.min(samples - n) as f32 / 200.0).min(1.0);
            let value = amplitude * edge * (std::f32::consts::TAU * frequency_hz * t).sin();
            let sample = (value * i16::MAX as f32) as i16;
            data.extend_from_slice(&sample.to_le_bytes());
        }
    }
    data
}

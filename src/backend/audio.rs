use macroquad::audio::{PlaySoundParams, play_sound, stop_sound};

use super::assets::Assets;
use crate::platform::{Audio, SoundId};

/// Sound playback through macroquad's mixer
pub struct MacroquadAudio<'a> {
    assets: &'a Assets,
    volume: f32,
}

impl<'a> MacroquadAudio<'a> {
    /// `volume` is a master level in [0, 1]
    pub fn new(assets: &'a Assets, volume: f32) -> Self {
        Self {
            assets,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    fn params(&self, sound: SoundId, looped: bool) -> PlaySoundParams {
        PlaySoundParams {
            looped,
            volume: mix_level(sound) * self.volume,
        }
    }
}

/// Per-sound level before the master volume
fn mix_level(sound: SoundId) -> f32 {
    match sound {
        SoundId::Music => 0.25,
        SoundId::Eat => 0.35,
        SoundId::Crash => 0.6,
    }
}

impl Audio for MacroquadAudio<'_> {
    fn play(&mut self, sound: SoundId) {
        play_sound(self.assets.sound(sound), self.params(sound, false));
    }

    fn play_looped(&mut self, sound: SoundId) {
        play_sound(self.assets.sound(sound), self.params(sound, true));
    }

    fn stop(&mut self, sound: SoundId) {
        stop_sound(self.assets.sound(sound));
    }
}

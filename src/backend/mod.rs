//! macroquad implementations of the platform traits and the outer
//! application loop (play a session, show the game-over screen, repeat).

mod assets;
mod audio;
mod input;
mod render;

pub use assets::Assets;
pub use audio::MacroquadAudio;
pub use input::{MacroquadClock, MacroquadInput};
pub use render::MacroquadRenderer;

use anyhow::{Context, Result};
use macroquad::color::{Color, GRAY, WHITE};
use macroquad::shapes::draw_rectangle;
use macroquad::text::{draw_text, measure_text};
use macroquad::window::{Conf, next_frame, screen_height, screen_width};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

use crate::game::{GameConfig, Grid, Session, SessionState, StopReason};
use crate::platform::{Audio, Clock, SoundId};
use crate::save::SaveData;

const TITLE_COLOR: Color = Color::new(0.64, 1.0, 0.64, 1.0);

pub fn window_conf(grid: &Grid) -> Conf {
    Conf {
        window_title: "Grid Snake".to_owned(),
        window_width: grid.width().round() as i32,
        window_height: grid.height().round() as i32,
        window_resizable: false,
        ..Default::default()
    }
}

/// Everything outside the game rules that the application needs
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Directory with the image and sound files; generated placeholders when absent
    pub assets_dir: Option<PathBuf>,
    pub save_file: PathBuf,
    /// Fixed seed for food placement
    pub seed: Option<u64>,
    pub volume: f32,
}

pub struct App {
    config: GameConfig,
    options: AppOptions,
    assets: Assets,
}

impl App {
    /// Load assets. Must run inside the macroquad window future.
    pub async fn new(config: GameConfig, options: AppOptions) -> Result<Self> {
        let assets = match &options.assets_dir {
            Some(dir) => Assets::load(dir).await?,
            None => Assets::generated(config.cell_size).await?,
        };
        Ok(Self {
            config,
            options,
            assets,
        })
    }

    /// Play sessions until the player quits
    pub async fn run(self) -> Result<()> {
        let grid = self.config.grid();
        let sprites = self.assets.sprites();
        let input = MacroquadInput::new();
        let mut renderer = MacroquadRenderer::new(&self.assets, &grid);
        let mut audio = MacroquadAudio::new(&self.assets, self.options.volume);
        let mut save = SaveData::load(&self.options.save_file);
        let mut seed = self.options.seed;

        loop {
            let rng = match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            };
            let mut session = Session::new(self.config.clone(), sprites, rng)
                .context("starting session")?;

            audio.play_looped(SoundId::Music);
            let mut clock = MacroquadClock::new();
            let reason = loop {
                let state = session.frame(&input, clock.delta_time(), &mut renderer, &mut audio);
                renderer.show();
                if let SessionState::Stopped(reason) = state {
                    break reason;
                }
                next_frame().await;
            };
            audio.stop(SoundId::Music);

            if reason == StopReason::Quit {
                return Ok(());
            }

            let score = session.score();
            if save.record(score) {
                log::info!("new best score {score}");
            }
            if let Err(err) = save.save(&self.options.save_file) {
                log::warn!("could not store score: {err:#}");
            }

            if !game_over_screen(&renderer, &input, score, save.best_score, reason).await {
                return Ok(());
            }
            // Same seed would replay the same food sequence
            seed = seed.map(|s| s.wrapping_mul(6364136223846793005).wrapping_add(1));
        }
    }
}

/// Overlay the final frame until the player restarts (true) or leaves (false)
async fn game_over_screen(
    renderer: &MacroquadRenderer<'_>,
    input: &MacroquadInput,
    score: u32,
    best: u32,
    reason: StopReason,
) -> bool {
    let cause = match reason {
        StopReason::Wall => "You hit the wall",
        StopReason::SelfCollision => "You bit yourself",
        StopReason::BoardFull => "The board is full",
        StopReason::Quit => "",
    };
    let summary = format!("Score: {score}   Best: {best}");
    let hint = "R: Restart   Esc/Q: Quit";

    loop {
        next_frame().await;

        if input.exit_pressed() {
            return false;
        }
        if input.restart_pressed() {
            return true;
        }

        renderer.show();
        let (sw, sh) = (screen_width(), screen_height());
        draw_rectangle(0.0, 0.0, sw, sh, Color::new(0.0, 0.0, 0.0, 0.5));
        let mut y = sh * 0.4;
        for (text, size, color) in [
            ("GAME OVER", 40.0, TITLE_COLOR),
            (cause, 22.0, GRAY),
            (summary.as_str(), 26.0, WHITE),
            (hint, 20.0, GRAY),
        ] {
            let m = measure_text(text, None, size as u16, 1.0);
            draw_text(text, (sw - m.width) * 0.5, y, size, color);
            y += size + 12.0;
        }
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use gridsnake::backend::{App, AppOptions, window_conf};
use gridsnake::game::{GameConfig, SpawnRange};
use gridsnake::save::DEFAULT_SAVE_FILE;

/// Command-line arguments; they override values from `--config`
#[derive(Debug, Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Classic Snake on a fixed grid")]
struct Cli {
    /// JSON game configuration; missing fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Board width in cells
    #[arg(long)]
    columns: Option<u32>,

    /// Board height in cells
    #[arg(long)]
    rows: Option<u32>,

    /// Cell edge length in pixels
    #[arg(long)]
    cell_size: Option<f32>,

    /// Starting speed in cells per second
    #[arg(long)]
    velocity: Option<f32>,

    /// Speed gained per food eaten, in cells per second
    #[arg(long)]
    acceleration: Option<f32>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Directory with SnakeBoard.png, SnakeHead.png, SnakeBody.png, Apple.png,
    /// musicLoop.wav, eating.wav and grunt.wav
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Where the best score is kept
    #[arg(long, value_name = "FILE", default_value = DEFAULT_SAVE_FILE)]
    save_file: PathBuf,

    /// Let the head pass through the body
    #[arg(long)]
    no_self_collision: bool,

    /// Never eat food
    #[arg(long)]
    no_food_collision: bool,

    /// Spawn food on the last row and column as well
    #[arg(long)]
    full_board_spawn: bool,

    /// Master volume between 0 and 1
    #[arg(long, default_value_t = 1.0)]
    volume: f32,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(velocity) = self.velocity {
            config.velocity = velocity;
        }
        if let Some(acceleration) = self.acceleration {
            config.acceleration = acceleration;
        }
        if self.no_self_collision {
            config.self_collision = false;
        }
        if self.no_food_collision {
            config.food_collision = false;
        }
        if self.full_board_spawn {
            config.spawn.range = SpawnRange::FullBoard;
        }

        config.validate().context("invalid game configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.game_config()?;
    let options = AppOptions {
        assets_dir: cli.assets,
        save_file: cli.save_file,
        seed: cli.seed,
        volume: cli.volume,
    };

    macroquad::Window::from_config(window_conf(&config.grid()), async move {
        let result = match App::new(config, options).await {
            Ok(app) => app.run().await,
            Err(err) => Err(err.context("startup failed")),
        };
        if let Err(err) = result {
            log::error!("{err:#}");
            std::process::exit(1);
        }
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cli = Cli::parse_from([
            "gridsnake",
            "--columns",
            "30",
            "--velocity",
            "6.5",
            "--no-self-collision",
            "--full-board-spawn",
        ]);
        let config = cli.game_config().unwrap();
        assert_eq!(config.columns, 30);
        assert_eq!(config.rows, 20);
        assert_eq!(config.velocity, 6.5);
        assert!(!config.self_collision);
        assert!(config.food_collision);
        assert_eq!(config.spawn.range, SpawnRange::FullBoard);
    }

    #[test]
    fn test_invalid_board_is_rejected() {
        let cli = Cli::parse_from(["gridsnake", "--columns", "1"]);
        assert!(cli.game_config().is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_SAVE_FILE: &str = "gridsnake_save.json";

// Persistent storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SaveData {
    pub best_score: u32,
    pub last_score: u32,
    pub games_played: u32,
}

impl SaveData {
    /// Defaults when the file is missing; a corrupt file is logged and ignored.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                log::warn!("ignoring unreadable save file {}: {err}", path.display());
                Self::default()
            }),
            Err(err) => {
                log::warn!("cannot read save file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))
    }

    /// Returns true when `score` is a new best.
    pub fn record(&mut self, score: u32) -> bool {
        self.games_played += 1;
        self.last_score = score;
        if score > self.best_score {
            self.best_score = score;
            return true;
        }
        false
    }
}

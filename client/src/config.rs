use rps_common::GameConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides where saved data lives
pub const DATA_DIR_ENV: &str = "RPS_DATA_DIR";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub data_dir: String,
    pub log_file: String,
    pub log_level: String,
    pub max_rounds: u32,
    pub move_time_limit_secs: u32,
    pub thinking_delay_ms: u64,
    pub advance_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        let game = GameConfig::default();
        Config {
            data_dir: ".rps".to_string(),
            log_file: "client.log".to_string(),
            log_level: "info".to_string(),
            max_rounds: game.max_rounds,
            move_time_limit_secs: game.move_time_limit_secs,
            thinking_delay_ms: game.thinking_delay_ms,
            advance_delay_ms: game.advance_delay_ms,
        }
    }
}

impl Config {
    pub fn load_from(config_path: &str) -> std::result::Result<Config, Box<dyn std::error::Error>> {
        let mut config = if Path::new(config_path).exists() {
            let content = fs::read_to_string(config_path)?;
            serde_json::from_str(&content)?
        } else {
            Config::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn save_to(&self, config_path: &str) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.data_dir = dir;
            }
        }
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            max_rounds: self.max_rounds,
            move_time_limit_secs: self.move_time_limit_secs,
            thinking_delay_ms: self.thinking_delay_ms,
            advance_delay_ms: self.advance_delay_ms,
        }
        .sanitized()
    }

    pub fn log_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.log_file)
    }
}

use crate::config::*;
use crate::store::FileStore;
use crate::theme::Theme;
use rps_common::store::{self, DIFFICULTY_KEY, THEME_KEY};
use rps_common::Difficulty;

/// Everything the menus share between matches
#[derive(Debug, Clone)]
pub struct SessionState {
    pub config: Config,
    pub store: FileStore,
    pub theme: Theme,
    pub difficulty: Difficulty,
}

impl SessionState {
    pub fn new_with_config(config_path: &str) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load_from(config_path)?;
        let store = FileStore::open(&config.data_dir)?;
        Ok(SessionState {
            theme: store::load_or_default(&store, THEME_KEY),
            difficulty: store::load_or_default(&store, DIFFICULTY_KEY),
            config,
            store,
        })
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        store::save_value(&mut self.store, THEME_KEY, &theme);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        store::save_value(&mut self.store, DIFFICULTY_KEY, &difficulty);
    }
}

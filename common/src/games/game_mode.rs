use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Who player 1 is playing against
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Against the computer
    Single,
    /// Two people sharing one terminal
    Multi,
}

impl GameMode {
    pub fn toggled(&self) -> GameMode {
        match self {
            GameMode::Single => GameMode::Multi,
            GameMode::Multi => GameMode::Single,
        }
    }

    pub fn opponent_label(&self) -> &'static str {
        match self {
            GameMode::Single => "Computer",
            GameMode::Multi => "Player 2",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Single => write!(f, "Single Player"),
            GameMode::Multi => write!(f, "Multiplayer"),
        }
    }
}

/// Strength of the computer opponent
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn next(&self) -> Difficulty {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {other}")),
        }
    }
}

/// Settings a saved match was played under; a match only resumes under the same ones
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSettings {
    pub mode: GameMode,
    pub difficulty: Difficulty,
}

/// Match length and timing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub max_rounds: u32,
    pub move_time_limit_secs: u32,
    pub thinking_delay_ms: u64,
    pub advance_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_rounds: 5,
            move_time_limit_secs: 7,
            thinking_delay_ms: 1500,
            advance_delay_ms: 2500,
        }
    }
}

impl GameConfig {
    /// A match has at least one round and every move at least one second
    pub fn sanitized(mut self) -> Self {
        self.max_rounds = self.max_rounds.max(1);
        self.move_time_limit_secs = self.move_time_limit_secs.max(1);
        self
    }

    pub fn move_time_limit(&self) -> Duration {
        Duration::from_secs(u64::from(self.move_time_limit_secs))
    }

    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_cycles() {
        assert_eq!(Difficulty::Easy.next(), Difficulty::Medium);
        assert_eq!(Difficulty::Medium.next(), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Easy);
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn test_difficulty_parses_its_own_display() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(d.to_string().parse::<Difficulty>(), Ok(d));
        }
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_mode_toggle_and_labels() {
        assert_eq!(GameMode::Single.toggled(), GameMode::Multi);
        assert_eq!(GameMode::Multi.toggled(), GameMode::Single);
        assert_eq!(GameMode::Single.opponent_label(), "Computer");
        assert_eq!(GameMode::Multi.opponent_label(), "Player 2");
    }

    #[test]
    fn test_sanitized_config() {
        let config = GameConfig {
            max_rounds: 0,
            move_time_limit_secs: 0,
            ..GameConfig::default()
        }
        .sanitized();

        assert_eq!(config.max_rounds, 1);
        assert_eq!(config.move_time_limit(), Duration::from_secs(1));
        assert_eq!(GameConfig::default().thinking_delay(), Duration::from_millis(1500));
        assert_eq!(GameConfig::default().advance_delay(), Duration::from_millis(2500));
    }
}

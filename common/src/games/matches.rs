use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::game_mode::GameMode;

/// Final result of a completed match, from player 1's point of view
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    #[serde(rename = "player_win")]
    PlayerWin,
    #[serde(rename = "opponent_win")]
    OpponentWin,
    #[serde(rename = "draw")]
    Draw,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::PlayerWin => write!(f, "player_win"),
            MatchOutcome::OpponentWin => write!(f, "opponent_win"),
            MatchOutcome::Draw => write!(f, "draw"),
        }
    }
}

impl MatchOutcome {
    pub fn from_scores(player1_score: u32, player2_score: u32) -> Self {
        match player1_score.cmp(&player2_score) {
            std::cmp::Ordering::Greater => MatchOutcome::PlayerWin,
            std::cmp::Ordering::Less => MatchOutcome::OpponentWin,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
        }
    }
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

/// Match wins across sessions. Absent keys read as zero.
///
/// Only a JSON object is accepted on input; anything else is malformed.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "Map<String, Value>")]
pub struct Leaderboard {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub player: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub computer: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub player2: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub draws: u64,
}

impl Leaderboard {
    /// Count one finished match. The opponent counter depends on who player 1 faced.
    pub fn record(&mut self, outcome: MatchOutcome, mode: GameMode) {
        match (outcome, mode) {
            (MatchOutcome::PlayerWin, _) => self.player += 1,
            (MatchOutcome::OpponentWin, GameMode::Single) => self.computer += 1,
            (MatchOutcome::OpponentWin, GameMode::Multi) => self.player2 += 1,
            (MatchOutcome::Draw, _) => self.draws += 1,
        }
    }

    pub fn opponent_wins(&self, mode: GameMode) -> u64 {
        match mode {
            GameMode::Single => self.computer,
            GameMode::Multi => self.player2,
        }
    }

    pub fn total(&self) -> u64 {
        self.player + self.computer + self.player2 + self.draws
    }
}

impl TryFrom<Map<String, Value>> for Leaderboard {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let count = |key: &str| match map.get(key) {
            None => Ok(0),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| format!("{key} is not a non-negative integer: {value}")),
        };

        Ok(Leaderboard {
            player: count("player")?,
            computer: count("computer")?,
            player2: count("player2")?,
            draws: count("draws")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_scores() {
        assert_eq!(MatchOutcome::from_scores(3, 1), MatchOutcome::PlayerWin);
        assert_eq!(MatchOutcome::from_scores(0, 2), MatchOutcome::OpponentWin);
        assert_eq!(MatchOutcome::from_scores(2, 2), MatchOutcome::Draw);
    }

    #[test]
    fn test_outcome_serialized_names() {
        assert_eq!(serde_json::to_value(MatchOutcome::PlayerWin).unwrap(), serde_json::json!("player_win"));
        assert_eq!(MatchOutcome::OpponentWin.to_string(), "opponent_win");
    }

    #[test]
    fn test_record_uses_mode_specific_opponent_key() {
        let mut board = Leaderboard::default();
        board.record(MatchOutcome::OpponentWin, GameMode::Single);
        board.record(MatchOutcome::OpponentWin, GameMode::Multi);
        board.record(MatchOutcome::OpponentWin, GameMode::Multi);
        board.record(MatchOutcome::PlayerWin, GameMode::Multi);
        board.record(MatchOutcome::Draw, GameMode::Single);

        assert_eq!(board.computer, 1);
        assert_eq!(board.player2, 2);
        assert_eq!(board.player, 1);
        assert_eq!(board.draws, 1);
        assert_eq!(board.opponent_wins(GameMode::Single), 1);
        assert_eq!(board.opponent_wins(GameMode::Multi), 2);
        assert_eq!(board.total(), 5);
    }

    #[test]
    fn test_absent_keys_read_as_zero() {
        let board: Leaderboard = serde_json::from_str(r#"{"player": 4}"#).unwrap();
        assert_eq!(board.player, 4);
        assert_eq!(board.computer, 0);
        assert_eq!(board.player2, 0);
        assert_eq!(board.draws, 0);

        let empty: Leaderboard = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Leaderboard::default());
    }

    #[test]
    fn test_only_objects_are_leaderboards() {
        assert!(serde_json::from_str::<Leaderboard>("[1, 2, 3]").is_err());
        assert!(serde_json::from_str::<Leaderboard>("7").is_err());
        assert!(serde_json::from_str::<Leaderboard>(r#"{"player": -1}"#).is_err());
        assert!(serde_json::from_str::<Leaderboard>(r#"{"draws": "two"}"#).is_err());

        let board: Leaderboard = serde_json::from_str(r#"{"computer": 2, "theme": "dark"}"#).unwrap();
        assert_eq!(board.computer, 2);
    }

    #[test]
    fn test_zero_counters_are_omitted() {
        let mut board = Leaderboard::default();
        board.record(MatchOutcome::Draw, GameMode::Single);

        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(json, serde_json::json!({"draws": 1}));
    }
}

use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Represents a move in Rock-Paper-Scissors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Every move, in tie-break priority order
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Determine winner: returns Some(winning_move) or None for draw
    pub fn beats(&self, other: &Move) -> Option<Move> {
        match (self, other) {
            (Move::Rock, Move::Scissors) => Some(*self),
            (Move::Paper, Move::Rock) => Some(*self),
            (Move::Scissors, Move::Paper) => Some(*self),
            (Move::Scissors, Move::Rock) => Some(*other),
            (Move::Rock, Move::Paper) => Some(*other),
            (Move::Paper, Move::Scissors) => Some(*other),
            _ => None, // Draw
        }
    }

    /// The move that beats this one
    pub fn counter(&self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Paper => Move::Scissors,
            Move::Scissors => Move::Rock,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Move {
        Move::ALL[rng.gen_range(0..Move::ALL.len())]
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Move::Rock => 0,
            Move::Paper => 1,
            Move::Scissors => 2,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => write!(f, "Rock"),
            Move::Paper => write!(f, "Paper"),
            Move::Scissors => write!(f, "Scissors"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseMoveError(pub String);

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown move: {}", self.0)
    }
}

impl std::error::Error for ParseMoveError {}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" => Ok(Move::Rock),
            "paper" => Ok(Move::Paper),
            "scissors" => Ok(Move::Scissors),
            other => Err(ParseMoveError(other.to_string())),
        }
    }
}

/// Result of a round, always from player 1's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn of(player1: Move, player2: Move) -> Outcome {
        match player1.beats(&player2) {
            Some(winner) if winner == player1 => Outcome::Win,
            Some(_) => Outcome::Lose,
            None => Outcome::Draw,
        }
    }

    /// Same round seen from player 2
    pub fn reversed(&self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Draw => Outcome::Draw,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win => write!(f, "win"),
            Outcome::Lose => write!(f, "lose"),
            Outcome::Draw => write!(f, "draw"),
        }
    }
}

/// Move slot addressed by an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

/// A resolved round. Persisted as `{"round":1,"player1":"rock","player2":"paper","result":"lose"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct RoundRecord {
    pub round: u32,
    pub player1: Move,
    pub player2: Move,
    pub result: Outcome,
}

impl RoundRecord {
    pub fn new(round: u32, player1: Move, player2: Move) -> Self {
        Self {
            round,
            player1,
            player2,
            result: Outcome::of(player1, player2),
        }
    }
}

impl TryFrom<Map<String, Value>> for RoundRecord {
    type Error = String;

    fn try_from(mut map: Map<String, Value>) -> Result<Self, Self::Error> {
        fn field<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str) -> Result<T, String> {
            let value = map.remove(key).ok_or_else(|| format!("missing field `{key}`"))?;
            serde_json::from_value(value).map_err(|e| format!("{key}: {e}"))
        }

        Ok(RoundRecord {
            round: field(&mut map, "round")?,
            player1: field(&mut map, "player1")?,
            player2: field(&mut map, "player2")?,
            result: field(&mut map, "result")?,
        })
    }
}

/// Score as (player1_wins, player2_wins), recomputed from scratch
pub fn replay_scores(history: &[RoundRecord]) -> (u32, u32) {
    history.iter().fold((0, 0), |(p1, p2), record| match record.result {
        Outcome::Win => (p1 + 1, p2),
        Outcome::Lose => (p1, p2 + 1),
        Outcome::Draw => (p1, p2),
    })
}

/// Complete state of the match in progress
#[derive(Debug, Clone, PartialEq)]
pub struct MatchState {
    /// 1-indexed; `max_rounds + 1` once the match is over
    pub round: u32,
    pub player1_move: Option<Move>,
    pub player2_move: Option<Move>,
    /// Result of the current round while it is on display
    pub outcome: Option<Outcome>,
    pub player1_score: u32,
    pub player2_score: u32,
    pub paused: bool,
    /// The computer is deliberating on its move
    pub thinking: bool,
    pub history: Vec<RoundRecord>,
}

impl Default for MatchState {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchState {
    pub fn new() -> Self {
        Self {
            round: 1,
            player1_move: None,
            player2_move: None,
            outcome: None,
            player1_score: 0,
            player2_score: 0,
            paused: false,
            thinking: false,
            history: Vec::new(),
        }
    }

    pub fn slot(&self, player: Player) -> Option<Move> {
        match player {
            Player::One => self.player1_move,
            Player::Two => self.player2_move,
        }
    }

    pub fn score(&self) -> (u32, u32) {
        (self.player1_score, self.player2_score)
    }

    pub fn is_finished(&self, max_rounds: u32) -> bool {
        self.round > max_rounds
    }

    pub fn player1_history(&self) -> Vec<Move> {
        self.history.iter().map(|r| r.player1).collect()
    }

    pub fn player2_history(&self) -> Vec<Move> {
        self.history.iter().map(|r| r.player2).collect()
    }

    /// Empty both move slots and forget the displayed result
    pub(crate) fn clear_round(&mut self) {
        self.player1_move = None;
        self.player2_move = None;
        self.outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rps_move_beats() {
        // Rock beats scissors
        assert_eq!(Move::Rock.beats(&Move::Scissors), Some(Move::Rock));
        assert_eq!(Move::Scissors.beats(&Move::Rock), Some(Move::Rock));

        // Paper beats rock
        assert_eq!(Move::Paper.beats(&Move::Rock), Some(Move::Paper));
        assert_eq!(Move::Rock.beats(&Move::Paper), Some(Move::Paper));

        // Scissors beats paper
        assert_eq!(Move::Scissors.beats(&Move::Paper), Some(Move::Scissors));
        assert_eq!(Move::Paper.beats(&Move::Scissors), Some(Move::Scissors));

        // Draws
        assert_eq!(Move::Rock.beats(&Move::Rock), None);
        assert_eq!(Move::Paper.beats(&Move::Paper), None);
        assert_eq!(Move::Scissors.beats(&Move::Scissors), None);
    }

    #[test]
    fn test_outcome_is_antisymmetric() {
        for a in Move::ALL {
            assert_eq!(Outcome::of(a, a), Outcome::Draw);
            for b in Move::ALL {
                assert_eq!(Outcome::of(a, b), Outcome::of(b, a).reversed());
            }
        }
    }

    #[test]
    fn test_outcome_from_player1_perspective() {
        assert_eq!(Outcome::of(Move::Rock, Move::Scissors), Outcome::Win);
        assert_eq!(Outcome::of(Move::Scissors, Move::Paper), Outcome::Win);
        assert_eq!(Outcome::of(Move::Paper, Move::Rock), Outcome::Win);
        assert_eq!(Outcome::of(Move::Rock, Move::Paper), Outcome::Lose);
    }

    #[test]
    fn test_counter_beats_the_move() {
        for m in Move::ALL {
            assert_eq!(m.counter().beats(&m), Some(m.counter()));
        }
        assert_eq!(Move::Rock.counter(), Move::Paper);
        assert_eq!(Move::Paper.counter(), Move::Scissors);
        assert_eq!(Move::Scissors.counter(), Move::Rock);
    }

    #[test]
    fn test_random_move_covers_all_moves() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[Move::random(&mut rng).index()] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_parse_move() {
        assert_eq!("rock".parse::<Move>(), Ok(Move::Rock));
        assert_eq!(" Paper ".parse::<Move>(), Ok(Move::Paper));
        assert_eq!("SCISSORS".parse::<Move>(), Ok(Move::Scissors));
        assert!("lizard".parse::<Move>().is_err());
    }

    #[test]
    fn test_round_record_json_shape() {
        let record = RoundRecord::new(2, Move::Rock, Move::Paper);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"round": 2, "player1": "rock", "player2": "paper", "result": "lose"})
        );
    }

    #[test]
    fn test_round_record_must_be_an_object() {
        let as_list = serde_json::json!([1, "rock", "paper", "lose"]);
        assert!(serde_json::from_value::<RoundRecord>(as_list).is_err());

        let missing = serde_json::json!({"round": 1, "player1": "rock", "player2": "paper"});
        assert!(serde_json::from_value::<RoundRecord>(missing).is_err());

        let ok = serde_json::json!({"round": 1, "player1": "rock", "player2": "paper", "result": "lose"});
        assert_eq!(
            serde_json::from_value::<RoundRecord>(ok).unwrap(),
            RoundRecord::new(1, Move::Rock, Move::Paper)
        );
    }

    #[test]
    fn test_replay_scores() {
        let history = vec![
            RoundRecord::new(1, Move::Rock, Move::Scissors),
            RoundRecord::new(2, Move::Rock, Move::Rock),
            RoundRecord::new(3, Move::Rock, Move::Paper),
            RoundRecord::new(4, Move::Paper, Move::Rock),
        ];

        assert_eq!(replay_scores(&history), (2, 1));
        assert_eq!(replay_scores(&[]), (0, 0));
    }

    #[test]
    fn test_new_match_state() {
        let state = MatchState::new();
        assert_eq!(state.round, 1);
        assert_eq!(state.slot(Player::One), None);
        assert_eq!(state.slot(Player::Two), None);
        assert_eq!(state.score(), (0, 0));
        assert!(!state.is_finished(5));
        assert!(state.history.is_empty());
    }
}

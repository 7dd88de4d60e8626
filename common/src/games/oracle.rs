use rand::rngs::StdRng;
use rand::SeedableRng;

use super::game_mode::Difficulty;
use super::rock_paper_scissors::Move;

/// Picks the computer's move in single-player matches.
///
/// Histories hold resolved rounds only, oldest first. Player 1's pending
/// move for the current round is never part of `player_history`.
pub trait Oracle {
    fn choose(&mut self, difficulty: Difficulty, player_history: &[Move], computer_history: &[Move]) -> Move;
}

/// Three fixed heuristics, one per difficulty:
/// - easy: uniformly random
/// - medium: counter player 1's previous move
/// - hard: counter player 1's most frequent move
pub struct DifficultyOracle {
    rng: StdRng,
}

impl Default for DifficultyOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl DifficultyOracle {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Oracle for DifficultyOracle {
    fn choose(&mut self, difficulty: Difficulty, player_history: &[Move], _computer_history: &[Move]) -> Move {
        let target = match difficulty {
            Difficulty::Easy => None,
            Difficulty::Medium => player_history.last().copied(),
            Difficulty::Hard => most_frequent(player_history),
        };

        match target {
            Some(predicted) => predicted.counter(),
            None => Move::random(&mut self.rng),
        }
    }
}

/// Most played move, or None for an empty history.
///
/// Ties go to the earliest move in `Move::ALL`, so rock > paper > scissors.
pub fn most_frequent(history: &[Move]) -> Option<Move> {
    if history.is_empty() {
        return None;
    }

    let mut counts = [0usize; 3];
    for m in history {
        counts[m.index()] += 1;
    }

    let mut best = Move::ALL[0];
    for candidate in Move::ALL {
        if counts[candidate.index()] > counts[best.index()] {
            best = candidate;
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::rock_paper_scissors::Move::*;

    #[test]
    fn test_medium_counters_last_move() {
        let mut oracle = DifficultyOracle::seeded(1);
        assert_eq!(oracle.choose(Difficulty::Medium, &[Scissors, Paper, Rock], &[]), Paper);
        assert_eq!(oracle.choose(Difficulty::Medium, &[Rock, Paper], &[]), Scissors);
        assert_eq!(oracle.choose(Difficulty::Medium, &[Scissors], &[]), Rock);
    }

    #[test]
    fn test_hard_counters_mode() {
        let mut oracle = DifficultyOracle::seeded(1);
        assert_eq!(oracle.choose(Difficulty::Hard, &[Rock, Rock, Paper], &[]), Paper);
        assert_eq!(oracle.choose(Difficulty::Hard, &[Scissors, Paper, Scissors], &[]), Rock);
    }

    #[test]
    fn test_hard_ignores_recency() {
        let mut oracle = DifficultyOracle::seeded(1);
        // Last move is paper, but rock dominates
        assert_eq!(oracle.choose(Difficulty::Hard, &[Rock, Rock, Rock, Paper], &[]), Paper);
    }

    #[test]
    fn test_most_frequent_tie_break() {
        assert_eq!(most_frequent(&[]), None);
        assert_eq!(most_frequent(&[Rock, Paper, Scissors]), Some(Rock));
        assert_eq!(most_frequent(&[Scissors, Paper]), Some(Paper));
        assert_eq!(most_frequent(&[Scissors, Rock, Scissors, Rock]), Some(Rock));
        assert_eq!(most_frequent(&[Scissors, Scissors, Paper]), Some(Scissors));
    }

    #[test]
    fn test_empty_history_falls_back_to_random() {
        let mut a = DifficultyOracle::seeded(42);
        let mut b = DifficultyOracle::seeded(42);

        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let picks_a: Vec<Move> = (0..10).map(|_| a.choose(difficulty, &[], &[])).collect();
            let picks_b: Vec<Move> = (0..10).map(|_| b.choose(difficulty, &[], &[])).collect();
            assert_eq!(picks_a, picks_b);
        }
    }

    #[test]
    fn test_easy_ignores_history() {
        let mut oracle = DifficultyOracle::seeded(3);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..60 {
            seen.insert(oracle.choose(Difficulty::Easy, &[Rock, Rock, Rock], &[]));
        }
        assert_eq!(seen.len(), 3);
    }
}

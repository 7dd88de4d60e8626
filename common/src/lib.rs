pub mod events;
pub mod games;
pub mod scheduler;
pub mod store;

pub use events::{EngineEvent, EventLog, EventSink};
pub use games::engine::{Phase, RoundEngine};
pub use games::game_mode::{Difficulty, GameConfig, GameMode, MatchSettings};
pub use games::matches::{Leaderboard, MatchOutcome};
pub use games::oracle::{DifficultyOracle, Oracle};
pub use games::rock_paper_scissors::{replay_scores, MatchState, Move, Outcome, Player, RoundRecord};
pub use scheduler::{ManualScheduler, Scheduler, TaskId};
pub use store::{MemoryStore, Store, StoreError};

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::time::Duration;

use super::game_mode::{Difficulty, GameConfig, GameMode, MatchSettings};
use super::matches::{Leaderboard, MatchOutcome};
use super::oracle::{DifficultyOracle, Oracle};
use super::rock_paper_scissors::{replay_scores, MatchState, Move, Outcome, Player, RoundRecord};
use crate::events::{EngineEvent, EventSink};
use crate::scheduler::{ManualScheduler, Scheduler, TaskId};
use crate::store::{self, Store, HISTORY_KEY, LEADERBOARD_KEY, MATCH_KEY};

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Where the current round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// At least one slot is still empty
    AwaitingMoves,
    /// Both moves are in and the result is on display
    Resolved,
    /// Every round has been played
    Finished,
}

/// Why a user action was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Paused,
    Thinking,
    NotAwaitingMoves,
    ComputerSlot,
    SlotFilled,
    NothingToUndo,
    MatchOver,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Paused => write!(f, "match is paused"),
            Rejection::Thinking => write!(f, "computer is thinking"),
            Rejection::NotAwaitingMoves => write!(f, "round is not accepting moves"),
            Rejection::ComputerSlot => write!(f, "player 2 is the computer"),
            Rejection::SlotFilled => write!(f, "move already submitted"),
            Rejection::NothingToUndo => write!(f, "history is empty"),
            Rejection::MatchOver => write!(f, "match already counted on the leaderboard"),
        }
    }
}

#[derive(Debug, Default)]
struct PendingTasks {
    tick: Option<TaskId>,
    oracle: Option<TaskId>,
    advance: Option<TaskId>,
}

/// Drives one match from round 1 to `max_rounds`.
///
/// Every user action that is not allowed in the current state is a silent
/// no-op. Deferred work (countdown ticks, the computer's thinking delay and
/// the pause between rounds) is requested from the scheduler; the host passes
/// due task ids back through [`RoundEngine::fire`].
pub struct RoundEngine<S: Scheduler, P: Store> {
    config: GameConfig,
    mode: GameMode,
    difficulty: Difficulty,
    state: MatchState,
    countdown: u32,
    pending: PendingTasks,
    scheduler: S,
    store: P,
    oracle: Box<dyn Oracle>,
    sinks: Vec<Box<dyn EventSink>>,
    rng: StdRng,
}

impl<S: Scheduler, P: Store> RoundEngine<S, P> {
    /// Create an engine, resuming the match saved in `store` when it was
    /// played under the same mode and difficulty
    pub fn new(config: GameConfig, mode: GameMode, difficulty: Difficulty, scheduler: S, mut store: P) -> Self {
        let config = config.sanitized();
        let settings = MatchSettings { mode, difficulty };
        let mut state = MatchState::new();

        let saved: Vec<RoundRecord> = store::load_or_default(&store, HISTORY_KEY);
        let saved_settings: Option<MatchSettings> = store::load_or_default(&store, MATCH_KEY);

        let resume = if saved.is_empty() {
            false
        } else if saved_settings != Some(settings) {
            info!("Saved match was played under other settings, starting a new {mode} match ({difficulty})");
            false
        } else if !is_resumable(&saved, config.max_rounds) {
            warn!("Discarding inconsistent saved history of {} rounds", saved.len());
            false
        } else {
            true
        };

        if resume {
            let (p1, p2) = replay_scores(&saved);
            state.round = saved.len() as u32 + 1;
            state.player1_score = p1;
            state.player2_score = p2;
            state.history = saved;
            info!("Resuming match at round {} ({p1}-{p2})", state.round);
        } else if !saved.is_empty() {
            store::save_value(&mut store, HISTORY_KEY, &state.history);
            store::save_value(&mut store, MATCH_KEY, &settings);
        }

        let mut engine = Self {
            countdown: config.move_time_limit_secs,
            config,
            mode,
            difficulty,
            state,
            pending: PendingTasks::default(),
            scheduler,
            store,
            oracle: Box::new(DifficultyOracle::new()),
            sinks: Vec::new(),
            rng: StdRng::from_entropy(),
        };
        engine.start_move_timer();
        engine
    }

    pub fn with_oracle(mut self, oracle: Box<dyn Oracle>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Seed the generator used for timeout picks
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Seconds left for the pending move(s)
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    pub fn phase(&self) -> Phase {
        if self.state.is_finished(self.config.max_rounds) {
            Phase::Finished
        } else if self.state.outcome.is_some() {
            Phase::Resolved
        } else {
            Phase::AwaitingMoves
        }
    }

    pub fn leaderboard(&self) -> Leaderboard {
        store::load_or_default(&self.store, LEADERBOARD_KEY)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Fill `player`'s slot for the current round. Returns whether the move was taken.
    pub fn submit_move(&mut self, player: Player, choice: Move) -> bool {
        if let Err(reason) = self.check_move(player) {
            debug!("Ignoring move from {player}: {reason}");
            return false;
        }

        self.fill_slot(player, choice, false);
        self.start_move_timer();
        true
    }

    /// Drop the most recent round and replay the score from what is left
    pub fn undo_last_round(&mut self) -> bool {
        let check = if self.state.paused {
            Err(Rejection::Paused)
        } else if self.state.thinking {
            Err(Rejection::Thinking)
        } else if self.state.history.is_empty() {
            Err(Rejection::NothingToUndo)
        } else if self.phase() == Phase::Finished {
            Err(Rejection::MatchOver)
        } else {
            Ok(())
        };
        if let Err(reason) = check {
            debug!("Ignoring undo: {reason}");
            return false;
        }

        let Some(last) = self.state.history.pop() else {
            return false;
        };
        self.cancel_all_tasks();

        self.state.round = last.round;
        self.state.clear_round();
        let (p1, p2) = replay_scores(&self.state.history);
        self.state.player1_score = p1;
        self.state.player2_score = p2;
        self.persist_history();

        info!("Undid round {} ({p1}-{p2})", last.round);
        self.emit(EngineEvent::Undone { round: last.round });
        self.start_move_timer();
        true
    }

    /// Start over from round 1 with an empty history
    pub fn reset_game(&mut self) {
        self.cancel_all_tasks();
        self.state = MatchState::new();
        self.persist_history();

        info!("New {} match ({})", self.mode, self.difficulty);
        self.emit(EngineEvent::Reset);
        self.start_move_timer();
    }

    /// Pause or resume. Suspended work picks up where it left off on resume.
    pub fn toggle_pause(&mut self) {
        self.state.paused = !self.state.paused;

        if self.state.paused {
            self.cancel_all_tasks();
        } else {
            if self.state.thinking {
                self.schedule_oracle();
            }
            match self.phase() {
                Phase::AwaitingMoves => self.resume_move_timer(),
                Phase::Resolved => self.schedule_advance(),
                Phase::Finished => {}
            }
        }

        debug!("Paused: {}", self.state.paused);
        self.emit(EngineEvent::PauseChanged(self.state.paused));
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset_game();
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.reset_game();
    }

    /// Run the callback behind a scheduled task. Unknown or stale ids are ignored.
    pub fn fire(&mut self, id: TaskId) {
        if self.pending.tick == Some(id) {
            self.pending.tick = None;
            self.on_tick();
        } else if self.pending.oracle == Some(id) {
            self.pending.oracle = None;
            self.apply_oracle_move();
        } else if self.pending.advance == Some(id) {
            self.pending.advance = None;
            self.advance_or_finish();
        } else {
            debug!("Ignoring stale {id}");
        }
    }

    /// One second of the move countdown
    pub fn on_tick(&mut self) {
        if !self.timer_should_run() {
            return;
        }

        self.cancel_tick();
        self.countdown = self.countdown.saturating_sub(1);
        self.emit(EngineEvent::Tick {
            remaining: self.countdown,
        });

        if self.countdown == 0 {
            self.on_move_timeout();
        } else {
            self.pending.tick = Some(self.scheduler.schedule(TICK_INTERVAL));
        }
    }

    /// Random moves for every human who let the clock run out
    pub fn on_move_timeout(&mut self) {
        if self.state.paused || self.state.thinking || self.phase() != Phase::AwaitingMoves {
            return;
        }

        self.cancel_tick();
        info!("Round {} timed out", self.state.round);
        self.emit(EngineEvent::TimedOut);

        if self.state.player1_move.is_none() {
            let choice = Move::random(&mut self.rng);
            self.fill_slot(Player::One, choice, true);
        }
        if self.mode == GameMode::Multi && self.state.player2_move.is_none() {
            let choice = Move::random(&mut self.rng);
            self.fill_slot(Player::Two, choice, true);
        }

        self.start_move_timer();
    }

    /// Leave the resolved round: start the next one or close the match
    pub fn advance_or_finish(&mut self) {
        if self.state.paused || self.phase() != Phase::Resolved {
            return;
        }
        self.cancel_advance();

        if self.state.round < self.config.max_rounds {
            self.state.round += 1;
            self.state.clear_round();

            debug!("Round {} begins", self.state.round);
            self.emit(EngineEvent::RoundStarted {
                round: self.state.round,
            });
            self.start_move_timer();
        } else {
            self.finish_match();
        }
    }

    fn check_move(&self, player: Player) -> Result<(), Rejection> {
        if self.state.paused {
            Err(Rejection::Paused)
        } else if self.state.thinking {
            Err(Rejection::Thinking)
        } else if self.phase() != Phase::AwaitingMoves {
            Err(Rejection::NotAwaitingMoves)
        } else if player == Player::Two && self.mode == GameMode::Single {
            Err(Rejection::ComputerSlot)
        } else if self.state.slot(player).is_some() {
            Err(Rejection::SlotFilled)
        } else {
            Ok(())
        }
    }

    fn fill_slot(&mut self, player: Player, choice: Move, auto: bool) {
        match player {
            Player::One => self.state.player1_move = Some(choice),
            Player::Two => self.state.player2_move = Some(choice),
        }
        self.emit(EngineEvent::MoveSubmitted { player, auto });

        if player == Player::One && self.mode == GameMode::Single {
            self.state.thinking = true;
            self.schedule_oracle();
            self.emit(EngineEvent::ThinkingStarted);
        }

        self.resolve_round_if_ready();
    }

    fn apply_oracle_move(&mut self) {
        if !self.state.thinking || self.state.paused {
            return;
        }

        let player_history = self.state.player1_history();
        let computer_history = self.state.player2_history();
        let choice = self.oracle.choose(self.difficulty, &player_history, &computer_history);

        self.state.thinking = false;
        self.fill_slot(Player::Two, choice, true);
    }

    fn resolve_round_if_ready(&mut self) {
        let (Some(p1), Some(p2)) = (self.state.player1_move, self.state.player2_move) else {
            return;
        };
        debug_assert!(self.state.outcome.is_none(), "round {} resolved twice", self.state.round);
        debug_assert!(!self.state.thinking, "round resolved while the computer was thinking");

        let record = RoundRecord::new(self.state.round, p1, p2);
        match record.result {
            Outcome::Win => self.state.player1_score += 1,
            Outcome::Lose => self.state.player2_score += 1,
            Outcome::Draw => {}
        }
        self.state.outcome = Some(record.result);
        self.state.history.push(record.clone());
        self.persist_history();

        info!(
            "Round {}: {} vs {} -> {} ({}-{})",
            record.round, record.player1, record.player2, record.result,
            self.state.player1_score, self.state.player2_score
        );
        self.cancel_tick();
        self.emit(EngineEvent::RoundResolved(record));
        self.schedule_advance();
    }

    fn finish_match(&mut self) {
        let (p1, p2) = self.state.score();
        let outcome = MatchOutcome::from_scores(p1, p2);

        self.state.round = self.config.max_rounds + 1;
        self.state.clear_round();

        let mut board: Leaderboard = store::load_or_default(&self.store, LEADERBOARD_KEY);
        board.record(outcome, self.mode);
        store::save_value(&mut self.store, LEADERBOARD_KEY, &board);

        info!("Match finished {p1}-{p2}: {outcome}");
        self.emit(EngineEvent::MatchFinished {
            outcome,
            player1_score: p1,
            player2_score: p2,
        });
    }

    /// Whether some human still owes a move and the clock may run
    fn timer_should_run(&self) -> bool {
        let awaiting_human = self.state.player1_move.is_none()
            || (self.mode == GameMode::Multi && self.state.player2_move.is_none());
        !self.state.paused && self.phase() == Phase::AwaitingMoves && awaiting_human
    }

    /// Restart the countdown from the full limit, or stop it when nobody owes a move
    fn start_move_timer(&mut self) {
        self.cancel_tick();
        if self.timer_should_run() {
            self.countdown = self.config.move_time_limit_secs;
            self.pending.tick = Some(self.scheduler.schedule(TICK_INTERVAL));
        }
    }

    /// Continue the countdown from the seconds that were left
    fn resume_move_timer(&mut self) {
        if self.timer_should_run() && self.pending.tick.is_none() {
            if self.countdown == 0 {
                self.countdown = self.config.move_time_limit_secs;
            }
            self.pending.tick = Some(self.scheduler.schedule(TICK_INTERVAL));
        }
    }

    fn schedule_oracle(&mut self) {
        if let Some(id) = self.pending.oracle.take() {
            self.scheduler.cancel(id);
        }
        self.pending.oracle = Some(self.scheduler.schedule(self.config.thinking_delay()));
    }

    fn schedule_advance(&mut self) {
        self.cancel_advance();
        self.pending.advance = Some(self.scheduler.schedule(self.config.advance_delay()));
    }

    fn cancel_tick(&mut self) {
        if let Some(id) = self.pending.tick.take() {
            self.scheduler.cancel(id);
        }
    }

    fn cancel_advance(&mut self) {
        if let Some(id) = self.pending.advance.take() {
            self.scheduler.cancel(id);
        }
    }

    fn cancel_all_tasks(&mut self) {
        self.cancel_tick();
        self.cancel_advance();
        if let Some(id) = self.pending.oracle.take() {
            self.scheduler.cancel(id);
        }
    }

    fn persist_history(&mut self) {
        let settings = MatchSettings {
            mode: self.mode,
            difficulty: self.difficulty,
        };
        store::save_value(&mut self.store, HISTORY_KEY, &self.state.history);
        store::save_value(&mut self.store, MATCH_KEY, &settings);
    }

    fn emit(&mut self, event: EngineEvent) {
        for sink in self.sinks.iter_mut() {
            sink.notify(&event);
        }
    }
}

impl<P: Store> RoundEngine<ManualScheduler, P> {
    /// Move the virtual clock forward, firing every task that falls due on the way
    pub fn run_for(&mut self, duration: Duration) {
        let until = self.scheduler.now() + duration;
        while let Some(id) = self.scheduler.pop_due(until) {
            self.fire(id);
        }
        self.scheduler.advance_to(until);
    }
}

/// A saved history can be picked up again if it is a consistent prefix of a match
fn is_resumable(history: &[RoundRecord], max_rounds: u32) -> bool {
    history.len() <= max_rounds as usize
        && history.iter().enumerate().all(|(i, record)| {
            record.round as usize == i + 1 && record.result == Outcome::of(record.player1, record.player2)
        })
}

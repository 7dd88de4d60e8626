use colored::*;
use rps_common::*;
use std::io::{self, Write};
use tokio::io::AsyncBufReadExt;

use crate::scheduler::TokioScheduler;
use crate::state::SessionState;
use crate::theme::Theme;
use crate::ui::{bell, clear_screen, drain_stdin_buffer};

type LocalEngine = RoundEngine<TokioScheduler, crate::store::FileStore>;

/// A line of input typed during a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Player, Move),
    Undo,
    NewGame,
    Pause,
    ToggleMode,
    CycleDifficulty,
    ToggleTheme,
    Quit,
}

pub fn parse_command(input: &str, mode: GameMode) -> Option<Command> {
    let input = input.trim().to_lowercase();

    let command = match input.as_str() {
        "1" => Command::Play(Player::One, Move::Rock),
        "2" => Command::Play(Player::One, Move::Paper),
        "3" => Command::Play(Player::One, Move::Scissors),
        "7" if mode == GameMode::Multi => Command::Play(Player::Two, Move::Rock),
        "8" if mode == GameMode::Multi => Command::Play(Player::Two, Move::Paper),
        "9" if mode == GameMode::Multi => Command::Play(Player::Two, Move::Scissors),
        "u" => Command::Undo,
        "n" => Command::NewGame,
        "p" => Command::Pause,
        "m" => Command::ToggleMode,
        "d" => Command::CycleDifficulty,
        "t" => Command::ToggleTheme,
        "q" => Command::Quit,
        other => return other.parse::<Move>().ok().map(|m| Command::Play(Player::One, m)),
    };
    Some(command)
}

/// What a move slot shows. Multiplayer moves stay hidden until both are in.
fn slot_label(engine_state: &MatchState, player: Player, mode: GameMode, phase: Phase) -> String {
    if player == Player::Two && mode == GameMode::Single && engine_state.thinking {
        return "thinking...".to_string();
    }

    match engine_state.slot(player) {
        Some(m) if phase == Phase::Resolved || mode == GameMode::Single => m.to_string(),
        Some(_) => "Ready".to_string(),
        None => "---".to_string(),
    }
}

fn final_banner(outcome: MatchOutcome, mode: GameMode) -> String {
    match (outcome, mode) {
        (MatchOutcome::PlayerWin, GameMode::Single) => "YOU WON THE MATCH!".to_string(),
        (MatchOutcome::PlayerWin, GameMode::Multi) => "PLAYER 1 WINS THE MATCH!".to_string(),
        (MatchOutcome::OpponentWin, GameMode::Single) => "The computer wins this time.".to_string(),
        (MatchOutcome::OpponentWin, GameMode::Multi) => "PLAYER 2 WINS THE MATCH!".to_string(),
        (MatchOutcome::Draw, _) => "The match is a draw!".to_string(),
    }
}

fn round_result_text(outcome: Outcome, mode: GameMode) -> &'static str {
    match (outcome, mode) {
        (Outcome::Win, GameMode::Single) => "You win the round!",
        (Outcome::Win, GameMode::Multi) => "Player 1 wins the round!",
        (Outcome::Lose, GameMode::Single) => "Computer wins the round!",
        (Outcome::Lose, GameMode::Multi) => "Player 2 wins the round!",
        (Outcome::Draw, _) => "It's a draw!",
    }
}

fn render(engine: &LocalEngine, theme: Theme, notice: Option<&str>) {
    clear_screen().ok();

    let state = engine.state();
    let mode = engine.mode();
    let phase = engine.phase();
    let max_rounds = engine.config().max_rounds;

    println!("\n{}", "=".repeat(50).color(theme.accent()));
    println!("{}", theme.highlight("  Rock-Paper-Scissors"));
    println!("{}", "=".repeat(50).color(theme.accent()));
    println!(
        "  {}",
        format!("{mode} | difficulty: {} | theme: {theme}", engine.difficulty()).dimmed()
    );
    println!();

    if phase == Phase::Finished {
        println!("{}", theme.paint(&format!("  Match over after {max_rounds} rounds")));
    } else {
        println!("{}", theme.paint(&format!("  Round {} of {max_rounds}", state.round)));
        if phase == Phase::AwaitingMoves {
            let left = format!("  Time left: {}s", engine.countdown());
            if engine.countdown() <= 3 {
                println!("{}", left.red().bold());
            } else {
                println!("{}", theme.paint(&left));
            }
        }
    }
    if state.paused {
        println!("{}", "  PAUSED (p to resume)".yellow().bold());
    }
    println!();

    println!(
        "    {:<12} {}",
        "Player 1:",
        slot_label(state, Player::One, mode, phase).bright_blue()
    );
    println!(
        "    {:<12} {}",
        format!("{}:", mode.opponent_label()),
        slot_label(state, Player::Two, mode, phase).bright_magenta()
    );
    println!();

    if let Some(outcome) = state.outcome {
        println!("  {}", round_result_text(outcome, mode).color(theme.outcome(outcome)).bold());
        println!();
    }

    let (p1, p2) = state.score();
    println!(
        "  Score: {} - {}",
        p1.to_string().bright_green(),
        p2.to_string().red()
    );

    if phase == Phase::Finished {
        let outcome = MatchOutcome::from_scores(p1, p2);
        let color = match outcome {
            MatchOutcome::PlayerWin => theme.outcome(Outcome::Win),
            MatchOutcome::OpponentWin => theme.outcome(Outcome::Lose),
            MatchOutcome::Draw => theme.outcome(Outcome::Draw),
        };
        println!();
        println!("  {}", final_banner(outcome, mode).color(color).bold());
    }
    println!();

    if !state.history.is_empty() {
        println!("{}", "  Previous Rounds:".bold());
        for record in &state.history {
            println!(
                "    Round {}: {} vs {} - {}",
                record.round,
                record.player1.to_string().bright_blue(),
                record.player2.to_string().bright_magenta(),
                record.result.to_string().to_uppercase().color(theme.outcome(record.result))
            );
        }
        println!();
    }

    let board = engine.leaderboard();
    println!(
        "  {}",
        format!(
            "Leaderboard  you: {}  {}: {}  draws: {}",
            board.player,
            mode.opponent_label().to_lowercase(),
            board.opponent_wins(mode),
            board.draws
        )
        .dimmed()
    );
    println!();

    let moves = match mode {
        GameMode::Single => "1 rock | 2 paper | 3 scissors".to_string(),
        GameMode::Multi => "P1: 1 rock | 2 paper | 3 scissors    P2: 7 rock | 8 paper | 9 scissors".to_string(),
    };
    println!("  {}", moves.dimmed());
    println!(
        "  {}",
        "u undo | n new game | p pause | m mode | d difficulty | t theme | q quit".dimmed()
    );

    if let Some(text) = notice {
        println!();
        println!("  {}", text.yellow());
    }

    print!("  > ");
    io::stdout().flush().ok();
}

/// Turn the latest engine events into terminal feedback
fn react_to_events(events: &EventLog, mode: GameMode) -> Option<String> {
    let mut notice = None;

    for event in events.drain() {
        match event {
            EngineEvent::RoundResolved(_) => bell(),
            EngineEvent::TimedOut => notice = Some("Time's up! A random move was picked.".to_string()),
            EngineEvent::MatchFinished { outcome, .. } => {
                bell();
                notice = Some(format!("{} Press n to play again.", final_banner(outcome, mode)));
            }
            EngineEvent::Undone { round } => notice = Some(format!("Round {round} undone")),
            EngineEvent::Reset => notice = Some("New game".to_string()),
            _ => {}
        }
    }

    notice
}

pub async fn start_game(session: &mut SessionState, mode: GameMode) -> Result<(), Box<dyn std::error::Error>> {
    let (scheduler, mut fired) = TokioScheduler::new();
    let mut engine: LocalEngine = RoundEngine::new(
        session.config.game_config(),
        mode,
        session.difficulty,
        scheduler,
        session.store.clone(),
    );

    let events = EventLog::new();
    engine.subscribe(Box::new(events.clone()));

    drain_stdin_buffer();
    let mut stdin_reader = tokio::io::BufReader::new(tokio::io::stdin());
    let mut input_line = String::new();
    let mut notice: Option<String> = None;

    render(&engine, session.theme, None);

    loop {
        tokio::select! {
            Some(id) = fired.recv() => {
                engine.fire(id);
            }
            result = stdin_reader.read_line(&mut input_line) => {
                let read = result?;
                if read == 0 {
                    return Ok(());
                }

                let line = input_line.trim().to_string();
                input_line.clear();
                if line.is_empty() {
                    continue;
                }

                notice = None;
                match parse_command(&line, engine.mode()) {
                    Some(Command::Play(player, choice)) => {
                        if !engine.submit_move(player, choice) {
                            notice = Some("That move can't be played right now".to_string());
                        }
                    }
                    Some(Command::Undo) => {
                        if !engine.undo_last_round() {
                            notice = Some("Nothing to undo".to_string());
                        }
                    }
                    Some(Command::NewGame) => engine.reset_game(),
                    Some(Command::Pause) => engine.toggle_pause(),
                    Some(Command::ToggleMode) => engine.set_mode(engine.mode().toggled()),
                    Some(Command::CycleDifficulty) => {
                        let next = engine.difficulty().next();
                        session.set_difficulty(next);
                        engine.set_difficulty(next);
                    }
                    Some(Command::ToggleTheme) => session.set_theme(session.theme.toggled()),
                    Some(Command::Quit) => return Ok(()),
                    None => notice = Some(format!("Unknown command: {line}")),
                }
            }
        }

        if let Some(text) = react_to_events(&events, engine.mode()) {
            notice = Some(text);
        }
        render(&engine, session.theme, notice.as_deref());
    }
}

use colored::*;
use rps_common::store::{self, LEADERBOARD_KEY};
use rps_common::{GameMode, Leaderboard};

use crate::state::*;
use crate::ui::*;

pub fn show_leaderboard(session: &SessionState) -> Result<(), Box<dyn std::error::Error>> {
    let board: Leaderboard = store::load_or_default(&session.store, LEADERBOARD_KEY);

    clear_screen()?;
    println!();
    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    println!("{}", "                    LEADERBOARD                    ".bright_cyan().bold());
    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    println!();

    if board.total() == 0 {
        println!("{}", "  No finished matches yet".dimmed());
    } else {
        println!("{}", format!("  Matches played: {}", board.total()).bright_yellow());
        println!("{}", "───────────────────────────────────────────────────".dimmed());
        println!("  {:30} {:>10}", "Player 1 wins", board.player);
        println!("  {:30} {:>10}", "Computer wins", board.opponent_wins(GameMode::Single));
        println!("  {:30} {:>10}", "Player 2 wins", board.opponent_wins(GameMode::Multi));
        println!("  {:30} {:>10}", "Draws", board.draws);
    }

    println!();
    println!("{}", "═══════════════════════════════════════════════════".bright_cyan());
    Ok(())
}

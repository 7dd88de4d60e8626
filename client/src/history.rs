use colored::*;
use rps_common::store::{self, HISTORY_KEY};
use rps_common::{replay_scores, RoundRecord};

use crate::state::*;
use crate::ui::*;

/// Rounds of the saved match, resumed the next time a game starts
pub fn show_history(session: &SessionState) -> Result<(), Box<dyn std::error::Error>> {
    let history: Vec<RoundRecord> = store::load_or_default(&session.store, HISTORY_KEY);
    let theme = session.theme;

    clear_screen()?;
    println!("\n{}", "=".repeat(50).color(theme.accent()));
    println!("{}", theme.highlight("  Saved Match"));
    println!("{}", "=".repeat(50).color(theme.accent()));
    println!();

    if history.is_empty() {
        println!("{}", "  No rounds played yet".dimmed());
        return Ok(());
    }

    for record in &history {
        println!(
            "    Round {}: {} vs {} - {}",
            record.round,
            record.player1.to_string().bright_blue(),
            record.player2.to_string().bright_magenta(),
            record.result.to_string().to_uppercase().color(theme.outcome(record.result))
        );
    }

    let (p1, p2) = replay_scores(&history);
    println!();
    println!("  Score: {} - {}", p1.to_string().bright_green(), p2.to_string().red());
    Ok(())
}

pub mod config;
pub mod games;
pub mod history;
pub mod leaderboard;
pub mod logging;
pub mod scheduler;
pub mod state;
pub mod store;
pub mod theme;
pub mod ui;
pub mod utils;

use std::io;

use colored::*;
use log::info;
use rps_common::GameMode;
use rustyline::DefaultEditor;

use history::*;
use leaderboard::*;
use state::*;
use ui::*;
use utils::VERSION;

use crate::games::rock_paper_scissors;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());

    if let Err(e) = start_app(&config_path).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn start_app(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = SessionState::new_with_config(config_path)?;

    if let Err(e) = logging::init(&session.config.log_path(), &session.config.log_level) {
        eprintln!("{}", format!("Logging disabled: {e}").yellow());
    }
    info!("rps v{VERSION} started, data in {}", session.store.dir().display());

    loop {
        match read_menu_choice(&session)? {
            MenuChoice::Play(mode) => {
                if let Err(e) = rock_paper_scissors::start_game(&mut session, mode).await {
                    println!("{}", format!("Game error: {e}").red());
                    println!("\nPress any key to return to menu...");
                    wait_for_keypress()?;
                }
            }
            MenuChoice::CycleDifficulty => {
                let next = session.difficulty.next();
                session.set_difficulty(next);
            }
            MenuChoice::ToggleTheme => {
                let next = session.theme.toggled();
                session.set_theme(next);
            }
            MenuChoice::Leaderboard => {
                if let Err(e) = show_leaderboard(&session) {
                    println!("{}", format!("Error loading leaderboard: {e}").red());
                }
                println!("\nPress any key to return to menu...");
                wait_for_keypress()?;
            }
            MenuChoice::History => {
                if let Err(e) = show_history(&session) {
                    println!("{}", format!("Error loading history: {e}").red());
                }
                println!("\nPress any key to return to menu...");
                wait_for_keypress()?;
            }
            MenuChoice::Exit => {
                info!("rps exiting");
                println!("\n{}", "Goodbye!".cyan());
                break;
            }
        }
    }

    Ok(())
}

enum MenuChoice {
    Play(GameMode),
    CycleDifficulty,
    ToggleTheme,
    Leaderboard,
    History,
    Exit,
}

fn display_menu(title: &str, items: &[(String, String)]) {
    clear_screen().ok();

    println!();
    println!();
    println!("{}", "░█▀▄░█▀█░█▀▀".bright_cyan());
    println!("{}", "░█▀▄░█▀▀░▀▀█".bright_cyan());
    println!("{}", "░▀░▀░▀░░░▀▀▀".bright_cyan());
    println!();

    println!("{}", title.dimmed());
    println!();

    for (num, text) in items {
        println!("  {}. {}", num.bright_yellow(), text);
    }

    println!();
}

fn read_menu_choice(session: &SessionState) -> io::Result<MenuChoice> {
    let menu_items = vec![
        ("1".to_string(), "Play vs Computer".to_string()),
        ("2".to_string(), "Play Multiplayer (same keyboard)".to_string()),
        ("3".to_string(), format!("Difficulty: {}", session.difficulty)),
        ("4".to_string(), format!("Theme: {}", session.theme)),
        ("5".to_string(), "Leaderboard".to_string()),
        ("6".to_string(), "Saved Match".to_string()),
        ("7".to_string(), "Exit".to_string()),
    ];

    let title = format!("v{VERSION}");
    display_menu(&title, &menu_items);

    let mut rl = DefaultEditor::new().map_err(io::Error::other)?;

    loop {
        let readline = rl.readline("Select option: ");
        match readline {
            Ok(line) => match line.trim() {
                "1" => return Ok(MenuChoice::Play(GameMode::Single)),
                "2" => return Ok(MenuChoice::Play(GameMode::Multi)),
                "3" => return Ok(MenuChoice::CycleDifficulty),
                "4" => return Ok(MenuChoice::ToggleTheme),
                "5" => return Ok(MenuChoice::Leaderboard),
                "6" => return Ok(MenuChoice::History),
                "7" => return Ok(MenuChoice::Exit),
                _ => {
                    println!("{}", format!("Invalid choice. Please enter 1-{}.", menu_items.len()).red());
                    continue;
                }
            },
            Err(_) => {
                return Ok(MenuChoice::Exit);
            }
        }
    }
}

pub mod engine;
pub mod game_mode;
pub mod matches;
pub mod oracle;
pub mod rock_paper_scissors;

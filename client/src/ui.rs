use std::io::{self, Write};
use crossterm::{event::{self, Event}, terminal};

pub fn clear_screen() -> io::Result<()> {
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush()?;
    Ok(())
}

/// Audible cue, if the terminal has one
pub fn bell() {
    print!("\x07");
    let _ = io::stdout().flush();
}

pub fn drain_stdin_buffer() {
    let _ = terminal::enable_raw_mode();

    while let Ok(true) = event::poll(std::time::Duration::from_millis(0)) {
        let _ = event::read();
    }

    let _ = terminal::disable_raw_mode();
}

pub fn wait_for_keypress() -> io::Result<()> {
    terminal::enable_raw_mode()?;

    // Discard whatever was typed while the previous screen was up
    while event::poll(std::time::Duration::from_millis(10))? {
        event::read()?;
    }

    loop {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(_) = event::read()? {
                break;
            }
        }
    }

    terminal::disable_raw_mode()?;
    Ok(())
}

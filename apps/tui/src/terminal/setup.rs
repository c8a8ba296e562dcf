use color_eyre::Result;
use crossterm::{
    cursor, execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Write};

/// Set up the terminal, unwinding any partial state on failure.
pub fn setup() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    eprintln!("Setting up terminal...");

    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    eprintln!("Terminal size: {width}x{height}");

    if let Err(e) = enable_raw_mode() {
        eprintln!("Failed to enable raw mode: {e}");
        return Err(color_eyre::eyre::eyre!("Failed to enable raw mode: {e}"));
    }

    let mut stdout = stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        eprintln!("Failed to enter alternate screen: {e}");
        return Err(color_eyre::eyre::eyre!(
            "Failed to enter alternate screen: {e}"
        ));
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(term) => term,
        Err(e) => {
            let _ = execute!(std::io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            eprintln!("Failed to create terminal: {e}");
            return Err(color_eyre::eyre::eyre!("Failed to create terminal: {e}"));
        }
    };

    if let Err(e) = terminal.clear() {
        eprintln!("Warning: Failed to clear terminal: {e}");
        // Not fatal, continue
    }

    if let Err(e) = execute!(std::io::stdout(), cursor::Hide) {
        eprintln!("Warning: Failed to hide cursor: {e}");
        // Not fatal, continue
    }

    eprintln!("Terminal setup completed successfully");
    Ok(terminal)
}

/// Restore terminal state, reporting but tolerating individual failures.
pub fn cleanup(raw_mode: bool, alternate_screen: bool) {
    let mut stdout_handle = stdout();

    eprintln!("Cleaning up terminal state...");

    // Show the cursor first; this works in either screen.
    match execute!(stdout_handle, cursor::Show) {
        Ok(()) => eprintln!("Cursor visibility restored"),
        Err(e) => eprintln!("Warning: Failed to show cursor: {e}"),
    }

    if alternate_screen {
        match execute!(stdout_handle, LeaveAlternateScreen) {
            Ok(()) => eprintln!("Left alternate screen"),
            Err(e) => eprintln!("Warning: Failed to leave alternate screen: {e}"),
        }
    }

    if raw_mode {
        match disable_raw_mode() {
            Ok(()) => eprintln!("Disabled raw mode"),
            Err(e) => eprintln!("Warning: Failed to disable raw mode: {e}"),
        }
    }

    // Force a newline so the shell prompt lands cleanly.
    let _ = execute!(stdout_handle, cursor::MoveToNextLine(1));
    let _ = stdout_handle.flush();

    eprintln!("Terminal cleanup completed");
}

use std::io::{self, Stdout};

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::ArcadeError;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode, alternate screen, hidden cursor.
pub fn init() -> Result<Tui, ArcadeError> {
    let stdout = io::stdout();
    if !stdout.is_tty() {
        return Err(ArcadeError::NotATerminal);
    }
    enable_raw_mode()?;
    let terminal = undo_on_error(setup(stdout), || {
        let _ = disable_raw_mode();
    })?;
    Ok(terminal)
}

/// Runs `undo` when `result` is an error, then hands the result back.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

fn setup(mut stdout: Stdout) -> io::Result<Tui> {
    execute!(stdout, EnterAlternateScreen, Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn restore(terminal: &mut Tui) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)?;
    terminal.show_cursor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_setup_runs_the_undo() {
        let mut undone = false;
        let failed: io::Result<()> = Err(io::Error::new(io::ErrorKind::Other, "no alternate screen"));
        let result = undo_on_error(failed, || undone = true);
        assert!(result.is_err());
        assert!(undone);
    }

    #[test]
    fn successful_setup_keeps_raw_mode() {
        let mut undone = false;
        let result = undo_on_error(Ok(7), || undone = true);
        assert_eq!(result.unwrap(), 7);
        assert!(!undone);
    }
}

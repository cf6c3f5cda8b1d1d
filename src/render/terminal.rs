use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{stderr, Stderr};

/// Alternate-screen terminal session on stderr
///
/// Restores the terminal on [`TerminalSession::restore`] or, failing that,
/// on drop.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stderr>>,
    raw_mode: bool,
    active: bool,
}

impl TerminalSession {
    /// Enter the alternate screen
    ///
    /// `raw_mode` is needed for key-by-key input; without it Ctrl+C still
    /// interrupts the process.
    pub fn enter(raw_mode: bool) -> Result<Self> {
        if raw_mode {
            enable_raw_mode().context("Failed to enable raw mode")?;
        }
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        Ok(Self {
            terminal,
            raw_mode,
            active: true,
        })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render).context("Failed to draw frame")?;
        Ok(())
    }

    /// Leave the alternate screen and restore the cursor
    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        if self.raw_mode {
            disable_raw_mode().context("Failed to disable raw mode")?;
        }
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::error!(?err, "failed to restore terminal");
        }
    }
}

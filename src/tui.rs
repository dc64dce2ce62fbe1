use std::io::{self, Stdout, Write};

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

use crate::error::{AppError, Result};

/// Owns the terminal while the browser runs. Restoring happens at most once,
/// either through [`Tui::restore`] or on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    mouse_captured: bool,
    active: bool,
}

impl Tui {
    pub fn new(capture_mouse: bool) -> Result<Self> {
        terminal::enable_raw_mode()
            .map_err(|e| AppError::Terminal(format!("failed to enter raw mode: {}", e)))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if capture_mouse {
            execute!(stdout, EnableMouseCapture)?;
        }
        Ok(Self {
            terminal: Terminal::new(CrosstermBackend::new(stdout))?,
            mouse_captured: capture_mouse,
            active: true,
        })
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }

    pub fn restore(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        leave_screen(self.terminal.backend_mut(), self.mouse_captured)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "terminal restore failed");
        }
    }
}

fn leave_screen(out: &mut impl Write, mouse_captured: bool) -> Result<()> {
    if mouse_captured {
        execute!(out, DisableMouseCapture)?;
    }
    terminal::disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen)?;
    Ok(())
}

/// Put the screen back before the default hook prints the panic message.
pub fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Capture state is unknown here; disabling it when off is harmless.
        let _ = leave_screen(&mut io::stdout(), true);
        tracing::error!(panic = %info, "panicked");
        previous(info);
    }));
}

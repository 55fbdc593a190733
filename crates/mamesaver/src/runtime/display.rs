use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::Print,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, Write};

/// Whatever covers the screen between games
pub trait DisplaySurface {
    fn set_metadata(&mut self, description: &str, year_manufacturer: &str);
    fn show_full_screen(&mut self);
    fn close(&mut self);
}

/// Takes over the terminal the saver was started from
///
/// While shown the terminal is in raw mode on the alternate screen with mouse capture on, so
/// single keys and pointer movement reach the input watcher.
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    description: String,
    year_manufacturer: String,
    shown: bool,
}

impl TerminalDisplay {
    fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.shown = true;
        execute!(io::stdout(), EnterAlternateScreen, Hide, EnableMouseCapture)
    }

    fn render(&self, out: &mut impl Write, (width, height): (u16, u16)) -> io::Result<()> {
        let top = height.saturating_sub(2) / 2;

        queue!(out, Clear(ClearType::All))?;
        for (offset, line) in [&self.description, &self.year_manufacturer]
            .into_iter()
            .enumerate()
        {
            queue!(
                out,
                MoveTo(centre_column(line, width), top + offset as u16),
                Print(line)
            )?;
        }
        out.flush()
    }
}

impl DisplaySurface for TerminalDisplay {
    fn set_metadata(&mut self, description: &str, year_manufacturer: &str) {
        self.description = description.to_string();
        self.year_manufacturer = year_manufacturer.to_string();
    }

    fn show_full_screen(&mut self) {
        if !self.shown {
            if let Err(err) = self.enter() {
                tracing::warn!("Could not take over the terminal: {}", err);
            }
        }

        if let Err(err) = self.render(&mut io::stdout().lock(), terminal_size()) {
            tracing::warn!("Could not draw to the terminal: {}", err);
        }
    }

    fn close(&mut self) {
        if !self.shown {
            return;
        }
        self.shown = false;

        if let Err(err) = execute!(io::stdout(), DisableMouseCapture, Show, LeaveAlternateScreen) {
            tracing::warn!("Could not restore the terminal screen: {}", err);
        }
        if let Err(err) = terminal::disable_raw_mode() {
            tracing::warn!("Could not leave raw mode: {}", err);
        }
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        self.close();
    }
}

fn terminal_size() -> (u16, u16) {
    terminal::size().unwrap_or_else(|err| {
        tracing::debug!("Terminal size unavailable, assuming 80x24: {}", err);
        (80, 24)
    })
}

fn centre_column(text: &str, width: u16) -> u16 {
    let length = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    width.saturating_sub(length) / 2
}

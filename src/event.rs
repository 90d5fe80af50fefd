use std::io::{self, Write, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use crossterm::terminal::{self, ClearType};
use crossterm::{cursor, execute};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// The wait ran out with no input: time for the next sample.
    Tick,
    Resize,
}

/// The terminal operations the sampling loop relies on.
pub trait Console {
    fn enter_raw(&mut self) -> io::Result<()>;
    fn restore(&mut self) -> io::Result<()>;
    /// Waits up to `timeout` for a key press or a resize.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Event>;
    /// Drops out of raw mode, prompts on the last row and blocks until the
    /// operator submits a line. Raw mode is back on when this returns.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

#[derive(Debug, Default)]
pub struct CrosstermConsole {
    raw: bool,
}

impl CrosstermConsole {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Console for CrosstermConsole {
    fn enter_raw(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        self.raw = true;
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.raw {
            return Ok(());
        }
        execute!(stdout(), cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        self.raw = false;
        Ok(())
    }

    fn poll_event(&mut self, timeout: Duration) -> io::Result<Event> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                return Ok(Event::Tick);
            }
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    return Ok(Event::Key(key));
                }
                CrosstermEvent::Resize(_, _) => return Ok(Event::Resize),
                _ => {}
            }
        }
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        let (_, rows) = terminal::size()?;
        terminal::disable_raw_mode()?;
        let _raw = Restore(|| {
            let _ = execute!(stdout(), cursor::Hide);
            let _ = terminal::enable_raw_mode();
        });

        let mut out = stdout();
        execute!(
            out,
            cursor::MoveTo(0, rows.saturating_sub(1)),
            terminal::Clear(ClearType::CurrentLine),
            cursor::Show
        )?;
        write!(out, "{prompt}")?;
        out.flush()?;

        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        Ok(line)
    }
}

/// Runs its closure on drop, so the line prompt puts the terminal back on
/// every exit path.
struct Restore<F: FnMut()>(F);

impl<F: FnMut()> Drop for Restore<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}

impl Drop for CrosstermConsole {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

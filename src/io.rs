use std::io;
use std::io::Write;
use std::time::Duration;

use crossterm::cursor;
use crossterm::event;
use crossterm::event::Event as CtEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;

use zxlife::camera::Camera;
use zxlife::screen::Bitmap;
use zxlife::screen::HEIGHT;
use zxlife::screen::WIDTH;

pub enum Event {
    /// Exit the application
    Exit,
}

/// Converts a crossterm event into an application event
pub fn convert_event(event: CtEvent) -> Option<Event> {
    match event {
        CtEvent::Key(
            KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            },
        ) => Some(Event::Exit),
        _ => None,
    }
}

/// Drains pending terminal events without blocking.
pub fn poll_events() -> io::Result<Option<Event>> {
    while event::poll(Duration::ZERO)? {
        if let Some(event) = convert_event(event::read()?) {
            return Ok(Some(event));
        }
    }

    Ok(None)
}

/// Draws the whole screen bitmap to the terminal in braille. Puts the terminal back the way it
/// found it when dropped.
pub struct Terminal {
    cam: Camera,
    stdout: io::Stdout,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(Self {
            cam: Camera::new(WIDTH, HEIGHT),
            stdout,
        })
    }

    pub fn render(&mut self, bitmap: &Bitmap) -> io::Result<()> {
        self.cam.capture(bitmap);
        let frame = self.cam.render();

        for (row, line) in frame.lines().enumerate() {
            queue!(
                self.stdout,
                cursor::MoveTo(0, row as u16),
                style::Print(line)
            )?;
        }

        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // nothing sensible to do if the terminal can't be restored
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

//! Raw-mode terminal loop for the picker

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{ContentStyle, PrintStyledContent, Stylize};
use crossterm::terminal::{
    self, disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::debug;

use crate::error::Result;
use crate::telegram::Dialog;

use super::render::{render, Line, Style};
use super::state::{Key, Outcome, PickerState};
use super::FileInfo;

/// Raw mode + alternate screen for as long as the guard lives.
struct TerminalGuard {
    stdout: Stdout,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, Hide) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        Ok(Self { stdout })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Translate a terminal key press into a picker key.
pub fn map_key(event: KeyEvent) -> Option<Key> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = event.modifiers.contains(KeyModifiers::ALT);

    match event.code {
        KeyCode::Esc => Some(Key::Cancel),
        KeyCode::Char('c') if ctrl => Some(Key::Cancel),
        KeyCode::Char('u') if ctrl => Some(Key::ClearAll),
        KeyCode::Char('w') if ctrl => Some(Key::DeleteWord),
        KeyCode::Backspace if alt => Some(Key::DeleteWord),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Char(ch) if !ctrl && !alt => Some(Key::Char(ch)),
        _ => None,
    }
}

fn content_style(style: Style) -> ContentStyle {
    let base = ContentStyle::new();
    match style {
        Style::Plain => base,
        Style::Header => base.cyan().bold(),
        Style::Dim | Style::SearchBox | Style::Hint => base.dark_grey(),
        Style::File | Style::SearchText => base.white().bold(),
        Style::Cursor => base.black().on_cyan(),
        Style::Placeholder => base.dark_grey().italic(),
        Style::Warning => base.yellow(),
        Style::Selected => base.cyan().bold().reverse(),
        Style::Item => base.grey(),
        Style::More => base.cyan().italic(),
    }
}

fn draw(out: &mut impl Write, lines: &[Line], height: usize) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    for line in lines.iter().take(height) {
        for span in &line.0 {
            queue!(
                out,
                PrintStyledContent(content_style(span.style).apply(span.text.as_str()))
            )?;
        }
        queue!(out, MoveToNextLine(1))?;
    }
    out.flush()
}

/// Run the picker until a contact is chosen or the user cancels. Blocks.
pub fn run(dialogs: &[Dialog], file: Option<&FileInfo>) -> Result<Outcome> {
    let names: Vec<&str> = dialogs.iter().map(Dialog::search_name).collect();
    let mut guard = TerminalGuard::enter()?;
    let mut state = PickerState::new(&names);

    loop {
        let (width, height) = terminal::size()?;
        let lines = render(&state, dialogs, file, width as usize, height as usize);
        draw(&mut guard.stdout, &lines, height as usize)?;

        // Resize and other events simply trigger a redraw.
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(key) = map_key(key) {
            state = state.apply(key, &names);
        }
        if let Some(outcome) = state.outcome {
            debug!(?outcome, query = %state.query, "picker finished");
            return Ok(outcome);
        }
    }
}

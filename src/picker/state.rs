//! Picker state and its key-driven transitions

use crate::fuzzy::{self, Match};
use crate::text;

/// A single input event the picker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Backspace,
    DeleteWord,
    ClearAll,
    Left,
    Right,
    Up,
    Down,
    Enter,
    Cancel,
}

/// How the picker finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Index into the candidate list the picker was started with.
    Selected(usize),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    pub query: String,
    /// Cursor position in characters, `0..=query.chars().count()`.
    pub cursor: usize,
    /// Highlighted row within `filtered`.
    pub selected: usize,
    pub filtered: Vec<Match>,
    pub outcome: Option<Outcome>,
}

impl PickerState {
    pub fn new<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            query: String::new(),
            cursor: 0,
            selected: 0,
            filtered: fuzzy::search(names, ""),
            outcome: None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.outcome.is_some()
    }

    /// Original index of the highlighted candidate, if any row is visible.
    pub fn highlighted(&self) -> Option<usize> {
        self.filtered.get(self.selected).map(|m| m.index)
    }

    /// Apply one key event. Once an outcome is set the state no longer changes.
    pub fn apply<S: AsRef<str>>(self, key: Key, names: &[S]) -> Self {
        if self.is_done() {
            return self;
        }

        match key {
            Key::Char(ch) => insert_char(self, ch, names),
            Key::Backspace => backspace(self, names),
            Key::DeleteWord => delete_word(self, names),
            Key::ClearAll => clear_all(self, names),
            Key::Left => move_left(self),
            Key::Right => move_right(self),
            Key::Up => move_up(self),
            Key::Down => move_down(self),
            Key::Enter => select(self),
            Key::Cancel => cancel(self),
        }
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.query
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn refilter<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.filtered = fuzzy::search(names, &self.query);
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
        self
    }
}

fn insert_char<S: AsRef<str>>(mut state: PickerState, ch: char, names: &[S]) -> PickerState {
    if !text::is_printable(ch) {
        return state;
    }
    let at = state.byte_offset(state.cursor);
    state.query.insert(at, ch);
    state.cursor += 1;
    state.selected = 0;
    state.refilter(names)
}

fn backspace<S: AsRef<str>>(mut state: PickerState, names: &[S]) -> PickerState {
    if state.cursor == 0 {
        return state;
    }
    let at = state.byte_offset(state.cursor - 1);
    state.query.remove(at);
    state.cursor -= 1;
    state.refilter(names)
}

fn delete_word<S: AsRef<str>>(mut state: PickerState, names: &[S]) -> PickerState {
    if state.cursor == 0 {
        return state;
    }

    let chars: Vec<char> = state.query.chars().collect();
    let mut end = state.cursor;
    while end > 0 && chars[end - 1].is_whitespace() {
        end -= 1;
    }
    let start = chars[..end]
        .iter()
        .rposition(|c| *c == ' ')
        .map(|i| i + 1)
        .unwrap_or(0);

    state.query = chars[..start].iter().chain(&chars[state.cursor..]).collect();
    state.cursor = start;
    state.refilter(names)
}

fn clear_all<S: AsRef<str>>(mut state: PickerState, names: &[S]) -> PickerState {
    state.query.clear();
    state.cursor = 0;
    state.selected = 0;
    state.refilter(names)
}

fn move_left(mut state: PickerState) -> PickerState {
    state.cursor = state.cursor.saturating_sub(1);
    state
}

fn move_right(mut state: PickerState) -> PickerState {
    if state.cursor < state.char_len() {
        state.cursor += 1;
    }
    state
}

fn move_up(mut state: PickerState) -> PickerState {
    state.selected = state.selected.saturating_sub(1);
    state
}

fn move_down(mut state: PickerState) -> PickerState {
    if state.selected + 1 < state.filtered.len() {
        state.selected += 1;
    }
    state
}

fn select(mut state: PickerState) -> PickerState {
    state.outcome = Some(match state.highlighted() {
        Some(index) => Outcome::Selected(index),
        None => Outcome::Cancelled,
    });
    state
}

fn cancel(mut state: PickerState) -> PickerState {
    state.outcome = Some(Outcome::Cancelled);
    state
}

//! Pure layout of the picker screen
//!
//! Produces styled lines from the current state and terminal size; the
//! terminal module only paints them.

use crate::output::format_file_size;
use crate::telegram::Dialog;
use crate::text::{display_width, pad_to_width, truncate_to_width};

use super::state::PickerState;
use super::FileInfo;

const PAD: &str = "  ";
const PLACEHOLDER: &str = "Type to search...";
const SEARCH_ICON: &str = "🔍 ";
const HINT: &str = "↑↓ navigate  •  enter select  •  esc cancel";
const UNNAMED: &str = "(unnamed)";

/// Header, search box, footer and the "more" line.
const RESERVED_ROWS: usize = 12;
/// Extra rows taken by the file line and its spacer.
const FILE_ROWS: usize = 2;
/// Left padding, arrow column and type label.
const NAME_COLUMN_OVERHEAD: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Plain,
    Header,
    Dim,
    File,
    SearchBox,
    SearchText,
    Cursor,
    Placeholder,
    Warning,
    Selected,
    Item,
    More,
    Hint,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub style: Style,
    pub text: String,
}

impl Span {
    fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

/// One screen row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line(pub Vec<Span>);

impl Line {
    fn single(style: Style, text: impl Into<String>) -> Self {
        Self(vec![Span::new(style, text)])
    }

    fn blank() -> Self {
        Self::default()
    }

    /// The row's text with styling dropped.
    pub fn text(&self) -> String {
        self.0.iter().map(|span| span.text.as_str()).collect()
    }
}

/// Rows of the contact list that fit, and whether a "more" line follows.
fn visible_rows(total: usize, height: usize, reserved: usize) -> (usize, bool) {
    let mut visible = total.min(height.saturating_sub(reserved));
    let show_more = total > visible;
    if show_more {
        visible = visible.saturating_sub(1).max(1);
    }
    (visible, show_more)
}

pub fn render(
    state: &PickerState,
    dialogs: &[Dialog],
    file: Option<&FileInfo>,
    width: usize,
    height: usize,
) -> Vec<Line> {
    let content_width = width.saturating_sub(4);
    let mut lines = Vec::new();

    lines.push(Line::single(Style::Header, format!("{PAD}╭────────────────────────────╮")));
    lines.push(Line::single(Style::Header, format!("{PAD}│  📨 Telegram File Sender   │")));
    lines.push(Line::single(Style::Header, format!("{PAD}╰────────────────────────────╯")));
    lines.push(Line::blank());

    if let Some(file) = file {
        lines.push(Line(vec![
            Span::new(Style::Dim, format!("{PAD}📎 ")),
            Span::new(Style::File, file.name.clone()),
            Span::new(Style::Dim, format!("  ({})", format_file_size(file.size))),
        ]));
        lines.push(Line::blank());
    }

    render_search_box(&mut lines, state, content_width);

    let reserved = RESERVED_ROWS + if file.is_some() { FILE_ROWS } else { 0 };
    render_contact_list(&mut lines, state, dialogs, content_width, height, reserved);

    lines.push(Line::blank());
    lines.push(Line::single(Style::Hint, format!("{PAD}{HINT}")));
    lines
}

fn render_search_box(lines: &mut Vec<Line>, state: &PickerState, content_width: usize) {
    let inner = content_width.saturating_sub(2);
    let border = "─".repeat(inner);
    let icon_width = display_width(SEARCH_ICON);

    lines.push(Line::single(Style::SearchBox, format!("{PAD}╭{border}╮")));

    let mut row = vec![
        Span::new(Style::SearchBox, format!("{PAD}│ ")),
        Span::new(Style::Plain, SEARCH_ICON),
    ];

    let used = if state.query.is_empty() {
        row.push(Span::new(Style::Placeholder, PLACEHOLDER));
        icon_width + display_width(PLACEHOLDER)
    } else {
        let before: String = state.query.chars().take(state.cursor).collect();
        let mut rest = state.query.chars().skip(state.cursor);
        // The character under the cursor is highlighted; at the end a space stands in.
        let cursor = rest.next().unwrap_or(' ').to_string();
        let after: String = rest.collect();

        let used = icon_width + display_width(&before) + display_width(&cursor) + display_width(&after);
        row.push(Span::new(Style::SearchText, before));
        row.push(Span::new(Style::Cursor, cursor));
        row.push(Span::new(Style::SearchText, after));
        used
    };

    row.push(Span::new(Style::Plain, " ".repeat(inner.saturating_sub(used + 1))));
    row.push(Span::new(Style::SearchBox, "│"));
    lines.push(Line(row));

    lines.push(Line::single(Style::SearchBox, format!("{PAD}╰{border}╯")));
    lines.push(Line::blank());
}

fn render_contact_list(
    lines: &mut Vec<Line>,
    state: &PickerState,
    dialogs: &[Dialog],
    content_width: usize,
    height: usize,
    reserved: usize,
) {
    if state.filtered.is_empty() {
        lines.push(Line::single(Style::Warning, format!("{PAD}  No matches found")));
        return;
    }

    let total = state.filtered.len();
    let (visible, show_more) = visible_rows(total, height, reserved);
    let name_width = content_width.saturating_sub(NAME_COLUMN_OVERHEAD);

    let start = if state.selected >= visible {
        state.selected + 1 - visible
    } else {
        0
    };
    let end = (start + visible).min(total);

    for row in start..end {
        let Some(dialog) = dialogs.get(state.filtered[row].index) else {
            continue;
        };

        let mut name = dialog.name.as_deref().unwrap_or(UNNAMED).to_string();
        if display_width(&name) > name_width {
            name = truncate_to_width(&name, name_width).0;
        }
        let name = pad_to_width(&name, name_width);
        let label = dialog.kind.label();

        if row == state.selected {
            lines.push(Line::single(Style::Selected, format!("{PAD}  → {name} {label}")));
        } else {
            lines.push(Line(vec![
                Span::new(Style::Item, format!("{PAD}    {name} ")),
                Span::new(Style::Dim, label),
            ]));
        }
    }

    if show_more {
        let remaining = total - visible;
        let plural = if remaining == 1 { "" } else { "s" };
        lines.push(Line::single(
            Style::More,
            format!("{PAD}    ↓ {remaining} more contact{plural}..."),
        ));
    }
}

//! Terminal display-width helpers
//!
//! Column math for the contact picker, from the Unicode character database:
//! East_Asian_Width W or F takes two cells, General_Category Mn, Me or Cf
//! takes none, anything else takes one.

use icu_properties::maps;
use icu_properties::{EastAsianWidth, GeneralCategory};

pub const ELLIPSIS: char = '…';

/// Column width of a single character.
pub fn char_width(ch: char) -> usize {
    let eaw = maps::east_asian_width().get(ch);
    if eaw == EastAsianWidth::Wide || eaw == EastAsianWidth::Fullwidth {
        return 2;
    }

    match maps::general_category().get(ch) {
        GeneralCategory::NonspacingMark
        | GeneralCategory::EnclosingMark
        | GeneralCategory::Format => 0,
        _ => 1,
    }
}

/// Whether a typed character may enter a search query.
///
/// Rejects control, format, surrogate, private-use and unassigned code points
/// and every separator except the ASCII space.
pub fn is_printable(ch: char) -> bool {
    if ch == ' ' {
        return true;
    }

    !matches!(
        maps::general_category().get(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
            | GeneralCategory::SpaceSeparator
            | GeneralCategory::LineSeparator
            | GeneralCategory::ParagraphSeparator
    )
}

/// Number of terminal columns `text` occupies.
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Cut `text` so it fits in `max_width` columns, ending with an ellipsis.
///
/// Returns the truncated string together with its display width, which
/// never exceeds `max_width`.
pub fn truncate_to_width(text: &str, max_width: usize) -> (String, usize) {
    if max_width == 0 {
        return (String::new(), 0);
    }

    let limit = max_width - 1;
    let mut width = 0;
    let mut out = String::new();

    for ch in text.chars() {
        let cw = char_width(ch);
        if width + cw > limit {
            out.push(ELLIPSIS);
            width += 1;
            break;
        }
        out.push(ch);
        width += cw;
    }

    (out, width)
}

/// Append spaces until `text` is `target_width` columns wide. Never truncates.
pub fn pad_to_width(text: &str, target_width: usize) -> String {
    let current = display_width(text);
    let mut out = String::with_capacity(text.len() + target_width.saturating_sub(current));
    out.push_str(text);
    for _ in current..target_width {
        out.push(' ');
    }
    out
}

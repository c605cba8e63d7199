use std::fmt::Display;

use ratatui::{layout::Alignment, text::Text};

use crate::summary::MinMax;

pub const COLUMN_SPACING: u16 = 1;

/// Right aligns displayable value
pub fn right_align_text<'a, T: Display>(v: T) -> Text<'a> {
    Text::from(v.to_string()).alignment(Alignment::Right)
}

/// Formats a range as `N` if all values are equal, and otherwise as `min-max`
/// (`long`) or `min+`
pub fn range_to_string<T>(range: &MinMax<T>, long: bool) -> String
where
    T: Copy + Display + Ord,
{
    if range.is_single() {
        range.min.to_string()
    } else if long {
        format!("{}-{}", range.min, range.max)
    } else {
        format!("{}+", range.min)
    }
}

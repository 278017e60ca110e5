//! Screen-specific content rendering, one module per screen.
//!
//! The small helpers here keep every form looking the same: a bracketed
//! input with a cursor block when focused, push-button rows, and link
//! rows for navigation between screens.

pub mod dashboard;
pub mod login;
pub mod password;
pub mod register;
pub mod verify;

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};

use super::styles;

/// Visible width of a form input window
const FIELD_WIDTH: usize = 28;

/// Width reserved for field labels
const LABEL_WIDTH: usize = 12;

/// Create a centered rectangle with fixed dimensions
pub(crate) fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

/// One form row: label, bracketed value, cursor block when focused.
/// Long values show their tail, like a cursor sitting at the end.
pub(crate) fn field_line(label: &str, value: &str, focused: bool, mask: bool) -> Line<'static> {
    let display: String = if mask {
        "*".repeat(value.chars().count().min(FIELD_WIDTH))
    } else {
        let count = value.chars().count();
        value
            .chars()
            .skip(count.saturating_sub(FIELD_WIDTH))
            .collect()
    };

    let style = if focused {
        styles::selected_style()
    } else {
        styles::field_value_style()
    };
    let cursor = if focused { "▌" } else { "" };

    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), styles::muted_style()),
        Span::styled("[", styles::muted_style()),
        Span::styled(
            format!("{:<width$}", format!("{}{}", display, cursor), width = FIELD_WIDTH + 1),
            style,
        ),
        Span::styled("]", styles::muted_style()),
    ])
}

/// A push-button row, marked with arrows when focused.
pub(crate) fn button_line(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::field_value_style()
    };
    let text = if focused {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Line::from(vec![
        Span::raw("  ["),
        Span::styled(text, style),
        Span::raw("]"),
    ])
}

/// A navigation link row.
pub(crate) fn link_line(label: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::muted_style()
    };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("→ {}", label), style),
    ])
}

/// Box-drawing logo rows, indented to sit centered in a dialog.
pub(crate) fn logo_lines(indent: usize) -> Vec<Line<'static>> {
    const LOGO: [&str; 3] = [
        "╔═╗╦╔═╗╔╗╔╔═╗╔╦╗",
        "╚═╗║║ ╦║║║║╣  ║ ",
        "╚═╝╩╚═╝╝╚╝╚═╝ ╩ ",
    ];
    LOGO.iter()
        .map(|row| {
            Line::from(Span::styled(
                format!("{}{}", " ".repeat(indent), row),
                styles::title_style(),
            ))
        })
        .collect()
}

/// Result lines shared by every form: a green notice and a red error.
pub(crate) fn notice_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {}", text), styles::success_style()))
}

pub(crate) fn error_line(text: &str) -> Line<'static> {
    Line::from(Span::styled(format!("  {}", text), styles::error_style()))
}

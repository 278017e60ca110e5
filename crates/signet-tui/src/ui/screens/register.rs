use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, RegisterField};
use crate::ui::styles;

use super::{button_line, centered_rect_fixed, error_line, field_line, link_line, logo_lines};

/// Form inputs paired with the error key the backend files their
/// rejections under.
const FIELDS: [(RegisterField, &str, &str, bool); 5] = [
    (RegisterField::FirstName, "First name:", "first_name", false),
    (RegisterField::LastName, "Last name:", "last_name", false),
    (RegisterField::Email, "Email:", "email", false),
    (RegisterField::Password, "Password:", "password", true),
    (
        RegisterField::PasswordConfirm,
        "Confirm:",
        "password_confirm",
        true,
    ),
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let field_error_count = app
        .register_errors
        .as_ref()
        .map(|errors| {
            FIELDS
                .iter()
                .filter(|(_, _, key, _)| errors.field(key).is_some())
                .count()
        })
        .unwrap_or(0);
    let banner = app
        .register_errors
        .as_ref()
        .and_then(|errors| errors.non_field());

    let mut height = 15 + field_error_count as u16;
    if banner.is_some() {
        height += 2;
    }
    let box_area = centered_rect_fixed(56, height, area);
    frame.render_widget(Clear, box_area);

    let mut lines = logo_lines(19);
    lines.push(Line::from(""));
    for (field, label, key, mask) in FIELDS {
        let value = match field {
            RegisterField::FirstName => &app.register_first_name,
            RegisterField::LastName => &app.register_last_name,
            RegisterField::Email => &app.register_email,
            RegisterField::Password => &app.register_password,
            RegisterField::PasswordConfirm => &app.register_password_confirm,
            _ => unreachable!(),
        };
        lines.push(field_line(label, value, app.register_focus == field, mask));
        if let Some(message) = app
            .register_errors
            .as_ref()
            .and_then(|errors| errors.field(key))
        {
            lines.push(error_line(message));
        }
    }
    lines.push(Line::from(Span::styled(
        "  Names are optional. Passwords need 8+ characters.",
        styles::muted_style(),
    )));
    lines.push(Line::from(""));
    lines.push(button_line(
        "Create account",
        app.register_focus == RegisterField::Submit,
    ));
    lines.push(link_line(
        "Already have an account? Sign in",
        app.register_focus == RegisterField::SignIn,
    ));

    if let Some(banner) = banner {
        lines.push(Line::from(""));
        lines.push(error_line(banner));
    }

    let block = Block::default()
        .title(" Create account ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}

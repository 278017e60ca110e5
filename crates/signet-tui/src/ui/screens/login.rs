use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginField};
use crate::ui::styles;

use super::{button_line, centered_rect_fixed, error_line, field_line, link_line, logo_lines, notice_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut height = 14;
    if app.login_notice.is_some() {
        height += 2;
    }
    if app.login_error.is_some() {
        height += 2;
    }
    let box_area = centered_rect_fixed(50, height, area);
    frame.render_widget(Clear, box_area);

    let mut lines = logo_lines(16);
    lines.push(Line::from(""));
    lines.push(field_line(
        "Email:",
        &app.login_email,
        app.login_focus == LoginField::Email,
        false,
    ));
    lines.push(field_line(
        "Password:",
        &app.login_password,
        app.login_focus == LoginField::Password,
        true,
    ));
    lines.push(Line::from(""));
    lines.push(button_line("Sign in", app.login_focus == LoginField::Submit));
    lines.push(Line::from(""));
    lines.push(link_line(
        "Create a new account",
        app.login_focus == LoginField::Register,
    ));
    lines.push(link_line(
        "Forgot your password?",
        app.login_focus == LoginField::Forgot,
    ));
    lines.push(link_line(
        "Verify your email",
        app.login_focus == LoginField::Verify,
    ));

    if let Some(ref notice) = app.login_notice {
        lines.push(Line::from(""));
        lines.push(notice_line(notice));
    }
    if let Some(ref error) = app.login_error {
        lines.push(Line::from(""));
        lines.push(error_line(error));
    }

    let block = Block::default()
        .title(" Sign in ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, VerifyField};
use crate::ui::styles;

use super::{button_line, centered_rect_fixed, error_line, field_line, link_line, notice_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut height = 9;
    if app.verify_notice.is_some() {
        height += 2;
    }
    if app.verify_error.is_some() {
        height += 2;
    }
    let box_area = centered_rect_fixed(56, height, area);
    frame.render_widget(Clear, box_area);

    let mut lines = vec![Line::from(Span::styled(
        "  Paste the token from your verification email.",
        styles::muted_style(),
    ))];

    if let Some(ref notice) = app.verify_notice {
        lines.push(Line::from(""));
        lines.push(notice_line(notice));
    }

    lines.push(Line::from(""));
    lines.push(field_line(
        "Email:",
        &app.verify_email,
        app.verify_focus == VerifyField::Email,
        false,
    ));
    lines.push(field_line(
        "Token:",
        &app.verify_token,
        app.verify_focus == VerifyField::Token,
        false,
    ));
    lines.push(Line::from(""));
    lines.push(button_line("Verify", app.verify_focus == VerifyField::Submit));

    let resend_label = if app.verify_expired {
        "Token expired - resend verification email"
    } else {
        "Resend verification email"
    };
    lines.push(link_line(resend_label, app.verify_focus == VerifyField::Resend));

    if let Some(ref error) = app.verify_error {
        lines.push(Line::from(""));
        lines.push(error_line(error));
    }

    let block = Block::default()
        .title(" Verify email ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}

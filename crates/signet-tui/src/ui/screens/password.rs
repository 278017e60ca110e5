//! The two password-recovery screens: requesting a reset email and
//! submitting the token it carries with a new password.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, ForgotField, ResetField};
use crate::ui::styles;

use super::{button_line, centered_rect_fixed, error_line, field_line, notice_line};

pub fn render_forgot(frame: &mut Frame, app: &App, area: Rect) {
    let mut height = 7;
    if app.forgot_error.is_some() {
        height += 2;
    }
    let box_area = centered_rect_fixed(56, height, area);
    frame.render_widget(Clear, box_area);

    let mut lines = vec![
        Line::from(Span::styled(
            "  We'll email you a password reset token.",
            styles::muted_style(),
        )),
        Line::from(""),
        field_line(
            "Email:",
            &app.forgot_email,
            app.forgot_focus == ForgotField::Email,
            false,
        ),
        Line::from(""),
        button_line(
            "Send reset email",
            app.forgot_focus == ForgotField::Submit,
        ),
    ];

    if let Some(ref error) = app.forgot_error {
        lines.push(Line::from(""));
        lines.push(error_line(error));
    }

    let block = Block::default()
        .title(" Forgot password ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}

pub fn render_reset(frame: &mut Frame, app: &App, area: Rect) {
    let mut height = 9;
    if app.reset_notice.is_some() {
        height += 2;
    }
    if app.reset_error.is_some() {
        height += 2;
    }
    let box_area = centered_rect_fixed(56, height, area);
    frame.render_widget(Clear, box_area);

    let mut lines = vec![Line::from(Span::styled(
        "  Paste the reset token and choose a new password.",
        styles::muted_style(),
    ))];

    if let Some(ref notice) = app.reset_notice {
        lines.push(Line::from(""));
        lines.push(notice_line(notice));
    }

    lines.push(Line::from(""));
    lines.push(field_line(
        "Token:",
        &app.reset_token,
        app.reset_focus == ResetField::Token,
        false,
    ));
    lines.push(field_line(
        "Password:",
        &app.reset_password,
        app.reset_focus == ResetField::Password,
        true,
    ));
    lines.push(field_line(
        "Confirm:",
        &app.reset_password_confirm,
        app.reset_focus == ResetField::PasswordConfirm,
        true,
    ));
    lines.push(Line::from(""));
    lines.push(button_line(
        "Reset password",
        app.reset_focus == ResetField::Submit,
    ));

    if let Some(ref error) = app.reset_error {
        lines.push(Line::from(""));
        lines.push(error_line(error));
    }

    let block = Block::default()
        .title(" Reset password ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), box_area);
}

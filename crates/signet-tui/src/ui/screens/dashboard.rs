use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, ProfileField};
use crate::ui::styles;

use super::{button_line, error_line, field_line};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(user) = app.session.user() else {
        let lines = vec![Line::from(Span::styled(
            "  No active session",
            styles::muted_style(),
        ))];
        frame.render_widget(Paragraph::new(lines), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Welcome banner
            Constraint::Min(8),    // Profile card
        ])
        .split(area);

    // Welcome banner with the avatar initial
    let banner = Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("({})", user.initial()), styles::highlight_style()),
        Span::styled(
            format!(" Welcome back, {}!", user.greeting_name()),
            styles::title_style(),
        ),
    ]);
    frame.render_widget(Paragraph::new(vec![Line::from(""), banner]), chunks[0]);

    if app.profile_editing {
        render_profile_editor(frame, app, chunks[1]);
    } else {
        render_profile_card(frame, app, user, chunks[1]);
    }
}

fn render_profile_card(
    frame: &mut Frame,
    app: &App,
    user: &signet_core::models::User,
    area: Rect,
) {
    let mut lines = vec![Line::from("")];

    let mut row = |label: &str, value: String| {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(format!("{:<14}", label), styles::muted_style()),
            Span::styled(value, styles::field_value_style()),
        ]));
    };

    row("Name:", user.display_name());
    row("Email:", user.email.clone());
    if let Some(username) = user.username.as_deref() {
        row("Username:", username.to_string());
    }
    if let Some(since) = user.member_since() {
        row("Member since:", since);
    }

    lines.push(Line::from(""));
    if user.is_email_verified {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("✓ Email verified", styles::success_style()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                "! Email not verified - check your inbox",
                styles::error_style(),
            ),
        ]));
    }

    if let Some(ref status) = app.status_message {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(status.clone(), styles::muted_style()),
        ]));
    }

    let block = Block::default()
        .title(" Profile ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_profile_editor(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(""),
        field_line(
            "First name:",
            &app.profile_first_name,
            app.profile_focus == ProfileField::FirstName,
            false,
        ),
        field_line(
            "Last name:",
            &app.profile_last_name,
            app.profile_focus == ProfileField::LastName,
            false,
        ),
        Line::from(""),
        button_line("Save", app.profile_focus == ProfileField::Save),
        Line::from(""),
        Line::from(Span::styled(
            "  [Esc] discards the changes",
            styles::muted_style(),
        )),
    ];

    if let Some(ref error) = app.profile_error {
        lines.push(Line::from(""));
        lines.push(error_line(error));
    }

    let block = Block::default()
        .title(" Edit profile ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

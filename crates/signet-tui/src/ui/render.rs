use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Screen};

use super::screens::{self, dashboard, login, password, register, verify};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  signet";
    let right = app.screen.title();

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize)
                .saturating_sub(title.len() + right.len() + 2),
        )),
        Span::styled(right, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(title_line).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.screen {
        Screen::Login => login::render(frame, app, area),
        Screen::Register => register::render(frame, app, area),
        Screen::VerifyEmail => verify::render(frame, app, area),
        Screen::ForgotPassword => password::render_forgot(frame, app, area),
        Screen::ResetPassword => password::render_reset(frame, app, area),
        Screen::Dashboard => dashboard::render(frame, app, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(" {} ", app.config.server_url())
    };

    let right_text = format!(" {} ", shortcuts_for(app));

    let width = area.width as usize;
    let padding_len = width
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn shortcuts_for(app: &App) -> &'static str {
    match app.screen {
        Screen::Dashboard => {
            if app.profile_editing {
                "[Tab] Next | [Enter] Save | [Esc] Cancel"
            } else {
                "[e]dit | [r]efresh | [s]ign out | [?] help | [q]uit"
            }
        }
        Screen::Login => "[Tab] Next | [Enter] Submit | [Esc] Quit",
        _ => "[Tab] Next | [Enter] Submit | [Esc] Back",
    }
}

fn render_help_overlay(frame: &mut Frame) {
    let area = screens::centered_rect_fixed(52, 22, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled(
            "                 ╔═╗╦╔═╗╔╗╔╔═╗╔╦╗",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "                 ╚═╗║║ ╦║║║║╣  ║ ",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "                 ╚═╝╩╚═╝╝╚╝╚═╝ ╩ ",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            format!("              version {}", version),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(" Forms", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  Tab/↓     ", styles::help_key_style()),
            Span::styled("Next field", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Shift+Tab/↑ ", styles::help_key_style()),
            Span::styled("Previous field", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", styles::help_key_style()),
            Span::styled("Submit / follow link", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  Esc       ", styles::help_key_style()),
            Span::styled("Back to sign in", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(" Dashboard", styles::highlight_style())),
        Line::from(vec![
            Span::styled("  e         ", styles::help_key_style()),
            Span::styled("Edit profile", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  r         ", styles::help_key_style()),
            Span::styled("Refresh profile from server", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  s         ", styles::help_key_style()),
            Span::styled("Sign out", styles::help_desc_style()),
        ]),
        Line::from(vec![
            Span::styled("  q         ", styles::help_key_style()),
            Span::styled("Quit", styles::help_desc_style()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = screens::centered_rect_fixed(46, 10, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "              ╔═╗╦╔═╗╔╗╔╔═╗╔╦╗",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "              ╚═╗║║ ╦║║║║╣  ║ ",
            styles::title_style(),
        )),
        Line::from(Span::styled(
            "              ╚═╝╩╚═╝╝╚╝╚═╝ ╩ ",
            styles::title_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "     Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("     Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

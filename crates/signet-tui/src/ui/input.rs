//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes. Each screen gets its own handler.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_email_char, can_add_name_char, can_add_password_char, can_add_token_char, App,
    AppState, ForgotField, LoginField, ProfileField, RegisterField, ResetField, Screen,
    VerifyField,
};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    match app.screen {
        Screen::Login => handle_login_input(app, key).await,
        Screen::Register => handle_register_input(app, key).await,
        Screen::VerifyEmail => handle_verify_input(app, key).await,
        Screen::ForgotPassword => handle_forgot_input(app, key).await,
        Screen::ResetPassword => handle_reset_input(app, key).await,
        Screen::Dashboard => handle_dashboard_input(app, key).await,
    }
}

async fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            // Quit from the sign-in screen
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginField::Email => {
                app.login_focus = LoginField::Password;
            }
            LoginField::Password | LoginField::Submit => {
                app.attempt_login().await;
            }
            LoginField::Register => app.show_register(),
            LoginField::Forgot => app.show_forgot(),
            LoginField::Verify => app.show_verify(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginField::Email => {
                app.login_email.pop();
            }
            LoginField::Password => {
                app.login_password.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginField::Email => {
                if can_add_email_char(app.login_email.len(), c) {
                    app.login_email.push(c);
                }
            }
            LoginField::Password => {
                if can_add_password_char(app.login_password.len(), c) {
                    app.login_password.push(c);
                }
            }
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_register_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.show_login(),
        KeyCode::Down | KeyCode::Tab => {
            app.register_focus = app.register_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.register_focus = app.register_focus.prev();
        }
        KeyCode::Enter => match app.register_focus {
            RegisterField::Submit | RegisterField::PasswordConfirm => {
                app.attempt_register().await;
            }
            RegisterField::SignIn => app.show_login(),
            _ => {
                app.register_focus = app.register_focus.next();
            }
        },
        KeyCode::Backspace => match app.register_focus {
            RegisterField::FirstName => {
                app.register_first_name.pop();
            }
            RegisterField::LastName => {
                app.register_last_name.pop();
            }
            RegisterField::Email => {
                app.register_email.pop();
            }
            RegisterField::Password => {
                app.register_password.pop();
            }
            RegisterField::PasswordConfirm => {
                app.register_password_confirm.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match app.register_focus {
            RegisterField::FirstName => {
                if can_add_name_char(app.register_first_name.len(), c) {
                    app.register_first_name.push(c);
                }
            }
            RegisterField::LastName => {
                if can_add_name_char(app.register_last_name.len(), c) {
                    app.register_last_name.push(c);
                }
            }
            RegisterField::Email => {
                if can_add_email_char(app.register_email.len(), c) {
                    app.register_email.push(c);
                }
            }
            RegisterField::Password => {
                if can_add_password_char(app.register_password.len(), c) {
                    app.register_password.push(c);
                }
            }
            RegisterField::PasswordConfirm => {
                if can_add_password_char(app.register_password_confirm.len(), c) {
                    app.register_password_confirm.push(c);
                }
            }
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_verify_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.show_login(),
        KeyCode::Down | KeyCode::Tab => {
            app.verify_focus = app.verify_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.verify_focus = app.verify_focus.prev();
        }
        KeyCode::Enter => match app.verify_focus {
            VerifyField::Email | VerifyField::Token => {
                app.verify_focus = app.verify_focus.next();
            }
            VerifyField::Submit => app.attempt_verify().await,
            VerifyField::Resend => app.attempt_resend().await,
        },
        KeyCode::Backspace => match app.verify_focus {
            VerifyField::Email => {
                app.verify_email.pop();
            }
            VerifyField::Token => {
                app.verify_token.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match app.verify_focus {
            VerifyField::Email => {
                if can_add_email_char(app.verify_email.len(), c) {
                    app.verify_email.push(c);
                }
            }
            VerifyField::Token => {
                if can_add_token_char(app.verify_token.len(), c) {
                    app.verify_token.push(c);
                }
            }
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_forgot_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.show_login(),
        KeyCode::Down | KeyCode::Tab | KeyCode::Up | KeyCode::BackTab => {
            app.forgot_focus = app.forgot_focus.next();
        }
        KeyCode::Enter => {
            // A single-input form submits from either position
            app.attempt_forgot().await;
        }
        KeyCode::Backspace => {
            if app.forgot_focus == ForgotField::Email {
                app.forgot_email.pop();
            }
        }
        KeyCode::Char(c) => {
            if app.forgot_focus == ForgotField::Email
                && can_add_email_char(app.forgot_email.len(), c)
            {
                app.forgot_email.push(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

async fn handle_reset_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => app.show_login(),
        KeyCode::Down | KeyCode::Tab => {
            app.reset_focus = app.reset_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.reset_focus = app.reset_focus.prev();
        }
        KeyCode::Enter => match app.reset_focus {
            ResetField::Token | ResetField::Password => {
                app.reset_focus = app.reset_focus.next();
            }
            ResetField::PasswordConfirm | ResetField::Submit => {
                app.attempt_reset().await;
            }
        },
        KeyCode::Backspace => match app.reset_focus {
            ResetField::Token => {
                app.reset_token.pop();
            }
            ResetField::Password => {
                app.reset_password.pop();
            }
            ResetField::PasswordConfirm => {
                app.reset_password_confirm.pop();
            }
            _ => {}
        },
        KeyCode::Char(c) => match app.reset_focus {
            ResetField::Token => {
                if can_add_token_char(app.reset_token.len(), c) {
                    app.reset_token.push(c);
                }
            }
            ResetField::Password => {
                if can_add_password_char(app.reset_password.len(), c) {
                    app.reset_password.push(c);
                }
            }
            ResetField::PasswordConfirm => {
                if can_add_password_char(app.reset_password_confirm.len(), c) {
                    app.reset_password_confirm.push(c);
                }
            }
            _ => {}
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_dashboard_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if app.profile_editing {
        match key.code {
            KeyCode::Esc => app.cancel_profile_edit(),
            KeyCode::Down | KeyCode::Tab => {
                app.profile_focus = app.profile_focus.next();
            }
            KeyCode::Up | KeyCode::BackTab => {
                app.profile_focus = app.profile_focus.prev();
            }
            KeyCode::Enter => match app.profile_focus {
                ProfileField::FirstName => {
                    app.profile_focus = ProfileField::LastName;
                }
                ProfileField::LastName | ProfileField::Save => {
                    app.save_profile().await;
                }
            },
            KeyCode::Backspace => match app.profile_focus {
                ProfileField::FirstName => {
                    app.profile_first_name.pop();
                }
                ProfileField::LastName => {
                    app.profile_last_name.pop();
                }
                ProfileField::Save => {}
            },
            KeyCode::Char(c) => match app.profile_focus {
                ProfileField::FirstName => {
                    if can_add_name_char(app.profile_first_name.len(), c) {
                        app.profile_first_name.push(c);
                    }
                }
                ProfileField::LastName => {
                    if can_add_name_char(app.profile_last_name.len(), c) {
                        app.profile_last_name.push(c);
                    }
                }
                ProfileField::Save => {}
            },
            _ => {}
        }
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        KeyCode::Char('e') => app.start_profile_edit(),
        KeyCode::Char('r') => app.refresh_profile().await,
        KeyCode::Char('s') => app.sign_out().await,
        _ => {}
    }
    Ok(false)
}

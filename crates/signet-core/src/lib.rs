//! Core library for signet - API client, session, tokens, models.
//!
//! Everything that talks to the server or touches disk lives here so
//! the terminal frontend stays a thin layer over `SessionStore`.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError, ValidationErrors};
pub use auth::{SessionStore, TokenStore};
pub use config::Config;

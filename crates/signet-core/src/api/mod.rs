//! REST API client module for the account service.
//!
//! This module provides the `ApiClient` for the registration, login,
//! verification, password, and profile endpoints, plus the error
//! taxonomy surfaced to screens.
//!
//! The API uses JWT bearer token authentication; access tokens are
//! minted at login and rotated through the refresh endpoint.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::{ApiError, ValidationErrors};

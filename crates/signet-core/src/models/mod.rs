//! Data models for the account service.
//!
//! - `User`: the account record with display helpers
//! - Request/receipt payloads for registration, login, verification,
//!   password flows, and profile updates

pub mod account;
pub mod user;

pub use account::{LoginResponse, MessageReceipt, ProfileUpdate, RegisterReceipt, RegisterRequest};
pub use user::User;

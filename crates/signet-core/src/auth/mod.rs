//! Authentication state.
//!
//! - `TokenStore` - the JWT pair on disk, re-read on every use
//! - `SessionStore` - the signed-in user and the operations that
//!   change who that is

pub mod session;
pub mod tokens;

pub use session::SessionStore;
pub use tokens::TokenStore;

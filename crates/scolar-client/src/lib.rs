//! HTTP client for the Scolar school-management API.
//!
//! Every authenticated call runs through the session guard: validate the
//! access token, fall back to the refresh token, refresh, and disconnect
//! when recovery is impossible. Mutations come back as classified
//! [`Outcome`] values for the UI to report.

pub mod client;
pub mod config;
pub mod guard;
pub mod logging;
pub mod outcome;
pub mod services;
pub mod session;

mod auth;

pub use client::ApiClient;
pub use config::Config;
pub use guard::GuardVerdict;
pub use outcome::Outcome;
pub use session::{SessionStore, TokenKind};

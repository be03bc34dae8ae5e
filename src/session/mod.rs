// src/session/mod.rs

//! Authenticated portal session.
//!
//! The session owns the HTTP client and the login state machine. Everything
//! downstream of it (extraction, change tracking, reporting) depends only on
//! the [`Fetch`] trait, so tests can substitute canned markup.

mod auth;
mod portal;

pub use auth::{AuthState, LoginForm, parse_login_form};
pub use portal::PortalSession;

use crate::error::Result;

/// A source of raw markup for a URL.
///
/// Implementations handle re-authentication transparently; callers only see
/// [`crate::error::AppError::Authentication`] when credentials are rejected.
pub trait Fetch {
    fn fetch(&mut self, url: &str) -> Result<String>;
}

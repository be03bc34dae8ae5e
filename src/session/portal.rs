//! Blocking HTTP session against the portal.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{AppError, Result};
use crate::models::{CredentialsConfig, PortalConfig};
use crate::session::Fetch;
use crate::session::auth::{AuthState, parse_login_form};

/// An authenticated session against the portal.
///
/// Holds the cookie jar for the SSO session. Fetches re-authenticate
/// transparently when a response turns out to be the login page; a rejected
/// credential pair is terminal for the session.
pub struct PortalSession {
    client: Client,
    portal: PortalConfig,
    credentials: CredentialsConfig,
    state: AuthState,
}

impl PortalSession {
    /// Create a new session. No request is made until the first fetch.
    pub fn new(portal: PortalConfig, credentials: CredentialsConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&portal.user_agent)
            .timeout(Duration::from_secs(portal.timeout_secs))
            .cookie_store(true)
            .build()?;

        Ok(Self {
            client,
            portal,
            credentials,
            state: AuthState::Unauthenticated,
        })
    }

    /// Current login state.
    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Whether a response body is the SSO login page.
    fn needs_login(&self, body: &str) -> bool {
        body.contains(&self.portal.not_logged_in_marker)
    }

    /// Run the login handshake against the SSO form on `login_page`.
    ///
    /// Returns the page the SSO redirects to on success, which is the page
    /// the original fetch was after.
    fn login(&mut self, login_page: &str) -> Result<String> {
        self.state = AuthState::Authenticating;
        log::debug!("Session unauthenticated, logging in");

        let form = parse_login_form(login_page)?;
        let login_host = self.portal.login_url.trim_end_matches('/');
        let post_url = if form.action.starts_with('/') {
            format!("{}{}", login_host, form.action)
        } else {
            format!("{}/{}", login_host, form.action)
        };

        let params = [
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
            ("lt", form.lt.as_str()),
            ("_eventId", form.event_id.as_str()),
        ];

        let body = self.client.post(&post_url).form(&params).send()?.text()?;

        if body.contains(&self.portal.rejected_marker) {
            self.state = AuthState::Rejected;
            return Err(AppError::Authentication);
        }

        self.state = AuthState::Authenticated;
        log::debug!("Login successful");
        Ok(body)
    }
}

impl Fetch for PortalSession {
    fn fetch(&mut self, url: &str) -> Result<String> {
        // Terminal state: never retry rejected credentials
        if self.state == AuthState::Rejected {
            return Err(AppError::Authentication);
        }

        let body = self.client.get(url).send()?.text()?;

        if self.needs_login(&body) {
            return self.login(&body);
        }

        self.state = AuthState::Authenticated;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> PortalSession {
        PortalSession::new(
            PortalConfig::default(),
            CredentialsConfig {
                username: "student1".to_string(),
                password: "hunter2".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_new_session_is_unauthenticated() {
        assert_eq!(session().state(), AuthState::Unauthenticated);
    }

    #[test]
    fn test_rejected_session_fails_fast() {
        let mut s = session();
        s.state = AuthState::Rejected;

        // No request is attempted: a network error would surface as Http
        let err = s.fetch("https://mms.st-andrews.ac.uk/anything").unwrap_err();
        assert!(matches!(err, AppError::Authentication));
        assert_eq!(s.state(), AuthState::Rejected);
    }

    #[test]
    fn test_needs_login_marker_detection() {
        let s = session();
        assert!(s.needs_login("<html>Log in here with your University username</html>"));
        assert!(!s.needs_login("<html><h3 class=\"module_heading\">CS1001</h3></html>"));
    }
}

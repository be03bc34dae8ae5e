//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Portal URLs and session behavior
    #[serde(default)]
    pub portal: PortalConfig,

    /// Login credentials
    pub credentials: CredentialsConfig,

    /// Email notification settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Snapshot store settings
    #[serde(default)]
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.credentials.username.trim().is_empty() {
            return Err(AppError::validation("credentials.username is empty"));
        }
        if self.credentials.password.is_empty() {
            return Err(AppError::validation("credentials.password is empty"));
        }
        url::Url::parse(&self.portal.base_url)
            .map_err(|e| AppError::validation(format!("portal.base_url is invalid: {e}")))?;
        url::Url::parse(&self.portal.login_url)
            .map_err(|e| AppError::validation(format!("portal.login_url is invalid: {e}")))?;
        if self.portal.timeout_secs == 0 {
            return Err(AppError::validation("portal.timeout_secs must be > 0"));
        }
        if self.portal.not_logged_in_marker.trim().is_empty() {
            return Err(AppError::validation("portal.not_logged_in_marker is empty"));
        }
        if self.portal.rejected_marker.trim().is_empty() {
            return Err(AppError::validation("portal.rejected_marker is empty"));
        }
        if self.notify.email.trim().is_empty() {
            return Err(AppError::validation("notify.email is empty"));
        }
        Ok(())
    }
}

/// Portal URLs and session behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Base URL of the portal; all in-page links are relative to this
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Base URL of the SSO login host
    #[serde(default = "defaults::login_url")]
    pub login_url: String,

    /// Academic year to poll (e.g. "2013_4"); empty means current year
    #[serde(default)]
    pub academic_year: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Response marker meaning the session is not authenticated
    #[serde(default = "defaults::not_logged_in_marker")]
    pub not_logged_in_marker: String,

    /// Response marker meaning the SSO rejected the credentials
    #[serde(default = "defaults::rejected_marker")]
    pub rejected_marker: String,
}

impl PortalConfig {
    /// URL of the "my modules" listing for the configured academic year.
    pub fn modules_url(&self) -> String {
        format!(
            "{}/mms/user/me/Modules?academic_year={}&unit=&command=Get+My+Modules",
            self.base_url, self.academic_year
        )
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            login_url: defaults::login_url(),
            academic_year: String::new(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            not_logged_in_marker: defaults::not_logged_in_marker(),
            rejected_marker: defaults::rejected_marker(),
        }
    }
}

/// Login credentials. No defaults; both fields must be configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub username: String,
    pub password: String,
}

/// Email notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Address notifications are sent to (and from)
    #[serde(default)]
    pub email: String,

    /// Subject line for change notifications
    #[serde(default = "defaults::subject")]
    pub subject: String,

    /// First sentence of the notification body
    #[serde(default = "defaults::preamble")]
    pub preamble: String,

    /// Path of the sendmail binary used for delivery
    #[serde(default = "defaults::sendmail_path")]
    pub sendmail_path: String,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            email: String::new(),
            subject: defaults::subject(),
            preamble: defaults::preamble(),
            sendmail_path: defaults::sendmail_path(),
        }
    }
}

/// Snapshot store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Snapshot file name, relative to the storage directory
    #[serde(default = "defaults::store_file")]
    pub file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            file: defaults::store_file(),
        }
    }
}

mod defaults {
    pub fn base_url() -> String {
        "https://mms.st-andrews.ac.uk".into()
    }
    pub fn login_url() -> String {
        "https://login.st-andrews.ac.uk".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; MMSpider/1.0)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn not_logged_in_marker() -> String {
        "Log in here with your".into()
    }
    pub fn rejected_marker() -> String {
        "cannot be determined to be authentic".into()
    }
    pub fn subject() -> String {
        "MMSpider Alert: Coursework has changed".into()
    }
    pub fn preamble() -> String {
        "MMSpider has detected a change for some elements of coursework. \
         These are detailed below."
            .into()
    }
    pub fn sendmail_path() -> String {
        "/usr/sbin/sendmail".into()
    }
    pub fn store_file() -> String {
        "snapshots.json".into()
    }
}

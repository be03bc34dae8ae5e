// src/notify/mod.rs

//! Email notification delivery.
//!
//! Composition lives here; actual transport is behind [`MailTransport`] so
//! the core never depends on a mail server being reachable.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::{AppError, Result};

/// A plain-text email, UTF-8 throughout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl MailMessage {
    /// Render the message with its headers, ready for submission.
    pub fn render(&self) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\n\r\n{}",
            self.from, self.to, self.subject, self.body
        )
    }
}

/// Delivers composed messages.
pub trait MailTransport {
    fn send(&self, message: &MailMessage) -> Result<()>;
}

/// Delivery through a local sendmail-compatible binary.
pub struct Sendmail {
    path: String,
}

impl Sendmail {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl MailTransport for Sendmail {
    fn send(&self, message: &MailMessage) -> Result<()> {
        // -t: take recipients from the message headers
        let mut child = Command::new(&self.path)
            .arg("-t")
            .stdin(Stdio::piped())
            .spawn()?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin.write_all(message.render().as_bytes())?;
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(AppError::mail(format!("{} exited with {status}", self.path)));
        }

        log::info!("Notification sent to {}", message.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_headers_and_body() {
        let message = MailMessage {
            from: "student1@example.ac.uk".to_string(),
            to: "student1@example.ac.uk".to_string(),
            subject: "MMSpider Alert: Coursework has changed".to_string(),
            body: "Module CS1001:\r\n".to_string(),
        };

        let rendered = message.render();
        assert!(rendered.starts_with("From: student1@example.ac.uk\r\n"));
        assert!(rendered.contains("Subject: MMSpider Alert: Coursework has changed\r\n"));
        // Headers end with a blank line before the body
        assert!(rendered.contains("\r\n\r\nModule CS1001:"));
    }
}

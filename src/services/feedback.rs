//! Feedback extraction.
//!
//! Feedback entries are fetched per URL, on demand. A coursework tool can
//! carry many assignments each with several feedback entries, and most
//! callers only need the assignment metadata, so nothing is prefetched.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{FEEDBACK_JSON_DATE_FORMAT, FeedbackRecord};
use crate::session::Fetch;

/// The machine-readable feedback representation served by the portal.
#[derive(Debug, Deserialize)]
struct FeedbackPayload {
    sender_name: String,
    comment: String,
    feedback_date: String,
}

/// Parse a feedback JSON document into a [`FeedbackRecord`].
pub fn parse_feedback(json: &str) -> Result<FeedbackRecord> {
    let payload: FeedbackPayload = serde_json::from_str(json)?;

    let date = NaiveDateTime::parse_from_str(&payload.feedback_date, FEEDBACK_JSON_DATE_FORMAT)
        .map_err(|e| {
            AppError::parse(
                "feedback",
                format!("bad feedback date '{}': {e}", payload.feedback_date),
            )
        })?;

    Ok(FeedbackRecord {
        sender: payload.sender_name,
        date,
        comment: payload.comment,
    })
}

/// Fetch one feedback entry by URL.
pub fn fetch_feedback(fetcher: &mut dyn Fetch, url: &str) -> Result<FeedbackRecord> {
    let json = fetcher.fetch(url)?;
    parse_feedback(&json)
}

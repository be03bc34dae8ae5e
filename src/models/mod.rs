// src/models/mod.rs

//! Domain models for the spider.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod assignment;
mod config;
mod module;

// Re-export all public types
pub use assignment::{
    AssignmentRecord, DUE_DATE_FORMAT, FEEDBACK_DATE_FORMAT, FEEDBACK_JSON_DATE_FORMAT,
    FeedbackRecord, Snapshot, snapshot_of,
};

#[cfg(test)]
pub(crate) use assignment::sample_record;
pub use config::{Config, CredentialsConfig, NotifyConfig, PortalConfig, StoreConfig};
pub use module::{ModuleSummary, ToolKind, ToolReference};

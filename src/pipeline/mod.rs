// src/pipeline/mod.rs

//! Change detection and reporting pipeline.

mod fingerprint;
mod report;
mod run;
mod tracker;

pub use fingerprint::fingerprint;
pub use report::{ModuleDiff, ReportComposer, ToolDiff};
pub use run::{RunOutcome, run_check};
pub use tracker::ChangeTracker;

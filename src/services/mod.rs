// src/services/mod.rs

//! HTML extraction services.
//!
//! Pure functions of markup text; no network or storage side effects other
//! than the on-demand feedback fetch.

pub mod coursework;
pub mod feedback;
pub mod modules;
pub mod selectors;

pub use coursework::parse_assignments;
pub use feedback::{fetch_feedback, parse_feedback};
pub use modules::parse_module_list;
pub use selectors::PortalSelectors;

//! Report composition.
//!
//! Renders a run's diffs into the plain-text email body: preamble, then
//! module header, tool header, and the full rendering of each changed
//! assignment with its feedback entries. Feedback bodies are fetched here,
//! on demand, not at diff time.

use crate::models::AssignmentRecord;
use crate::services::fetch_feedback;
use crate::session::Fetch;

/// Diffs for one coursework tool, in fetch order.
#[derive(Debug, Clone, Default)]
pub struct ToolDiff {
    pub tool_name: String,
    pub records: Vec<AssignmentRecord>,
}

/// Diffs for one module, grouped by tool in encounter order.
#[derive(Debug, Clone, Default)]
pub struct ModuleDiff {
    pub module_code: String,
    pub tools: Vec<ToolDiff>,
}

impl ModuleDiff {
    pub fn is_empty(&self) -> bool {
        self.tools.iter().all(|t| t.records.is_empty())
    }
}

/// Renders diff sets into the notification body.
pub struct ReportComposer {
    preamble: String,
}

impl ReportComposer {
    pub fn new(preamble: impl Into<String>) -> Self {
        Self {
            preamble: preamble.into(),
        }
    }

    /// Compose the full report. Modules and tools with empty diffs are
    /// omitted; ordering follows the caller's encounter order.
    pub fn compose(&self, fetcher: &mut dyn Fetch, modules: &[ModuleDiff]) -> String {
        let mut body = String::new();
        body.push_str(&self.preamble);
        body.push_str("\r\n");

        for module in modules.iter().filter(|m| !m.is_empty()) {
            body.push_str(&format!("Module {}:\r\n", module.module_code));

            for tool in module.tools.iter().filter(|t| !t.records.is_empty()) {
                body.push_str(&format!("Coursework tool name: {}\r\n", tool.tool_name));

                for record in &tool.records {
                    body.push_str(&self.render_assignment(fetcher, record));
                    body.push_str("\r\n");
                }
            }
        }

        body
    }

    /// Render one assignment and its feedback entries.
    fn render_assignment(&self, fetcher: &mut dyn Fetch, record: &AssignmentRecord) -> String {
        let mut out = record.to_string();
        out.push_str("\r\n");

        for url in &record.feedback_urls {
            match fetch_feedback(fetcher, url) {
                Ok(feedback) => {
                    out.push_str(&feedback.to_string());
                    out.push_str("\r\n");
                }
                Err(e) => {
                    // The diff is already persisted; a broken feedback link
                    // must not sink the notification.
                    log::warn!("Failed to fetch feedback from {url}: {e}");
                    out.push_str(&format!("[Feedback unavailable: {url}]\r\n"));
                }
            }
        }

        out
    }
}

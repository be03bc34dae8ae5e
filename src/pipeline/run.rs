//! One polling run, start to finish.
//!
//! Fully sequential: fetch the module listing, then walk every coursework
//! tool in page order, diffing each against its stored snapshot. A
//! structural parse failure skips that tool and the run continues; any other
//! error, rejected credentials or a failed snapshot write included, aborts
//! the run.

use crate::error::{AppError, Result};
use crate::models::Config;
use crate::pipeline::report::{ModuleDiff, ToolDiff};
use crate::pipeline::tracker::ChangeTracker;
use crate::services::parse_module_list;
use crate::session::Fetch;
use crate::storage::SnapshotStore;

/// Summary of a polling run.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Modules found on the listing page
    pub modules_seen: usize,
    /// Coursework tools checked
    pub tools_checked: usize,
    /// Tools skipped because their page failed structural parsing
    pub parse_failures: usize,
    /// Non-empty diffs, grouped by module then tool in encounter order
    pub diffs: Vec<ModuleDiff>,
}

impl RunOutcome {
    pub fn has_changes(&self) -> bool {
        !self.diffs.is_empty()
    }

    /// Total changed or new assignment records across the run.
    pub fn change_count(&self) -> usize {
        self.diffs
            .iter()
            .flat_map(|m| m.tools.iter())
            .map(|t| t.records.len())
            .sum()
    }
}

/// Run one full check of every coursework tool for the configured year.
pub fn run_check<S: SnapshotStore>(
    config: &Config,
    fetcher: &mut dyn Fetch,
    tracker: &mut ChangeTracker<S>,
) -> Result<RunOutcome> {
    let modules_url = config.portal.modules_url();
    log::info!("Fetching module listing from {modules_url}");

    let html = fetcher.fetch(&modules_url)?;
    let modules = parse_module_list(&html, &config.portal.base_url)?;

    let mut outcome = RunOutcome {
        modules_seen: modules.len(),
        ..RunOutcome::default()
    };

    for module in &modules {
        let mut tools = Vec::new();

        for tool in module.coursework_tools() {
            outcome.tools_checked += 1;
            log::debug!("Checking {} / {}", module.code, tool.name);

            match tracker.check(fetcher, tool) {
                Ok(records) if records.is_empty() => {}
                Ok(records) => {
                    log::info!(
                        "{} / {}: {} changed assignment(s)",
                        module.code,
                        tool.name,
                        records.len()
                    );
                    tools.push(ToolDiff {
                        tool_name: tool.name.clone(),
                        records,
                    });
                }
                Err(e @ AppError::Parse { .. }) => {
                    // Structural failure on one tool must not mask changes
                    // elsewhere; skipping it is this caller's policy. Auth,
                    // HTTP, and store errors are run failures, not skips.
                    outcome.parse_failures += 1;
                    log::warn!("Skipping tool {} ({}): {}", tool.name, tool.url, e);
                }
                Err(e) => return Err(e),
            }
        }

        if !tools.is_empty() {
            outcome.diffs.push(ModuleDiff {
                module_code: module.code.clone(),
                tools,
            });
        }
    }

    Ok(outcome)
}

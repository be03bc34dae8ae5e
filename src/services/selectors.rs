//! CSS selectors for the portal's markup.
//!
//! Parsed once per extraction pass and shared across the extractors, so a
//! typo in a selector surfaces as a single well-labelled error.

use scraper::Selector;

use crate::error::{AppError, Result};

/// The fixed selector set for the portal's pages.
pub struct PortalSelectors {
    /// Module heading on the listing page
    pub module_heading: Selector,
    /// Tool list within a module's sibling block
    pub tool_list: Selector,
    /// Any anchor
    pub anchor: Selector,
    /// Assignment table body
    pub table_body: Selector,
    /// Assignment table row
    pub row: Selector,
    /// Assignment table cell
    pub cell: Selector,
    /// Feedback link list inside the feedback cell
    pub feedback_list: Selector,
    /// Feedback list entry
    pub list_item: Selector,
    /// Hidden id input in the id cell
    pub hidden_input: Selector,
}

impl PortalSelectors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            module_heading: parse("h3.module_heading")?,
            tool_list: parse("ul.module_resources")?,
            anchor: parse("a")?,
            table_body: parse("tbody")?,
            row: parse("tr")?,
            cell: parse("td")?,
            feedback_list: parse("ul.horizontal")?,
            list_item: parse("li")?,
            hidden_input: parse("input")?,
        })
    }
}

fn parse(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

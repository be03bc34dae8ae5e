//! Module listing extraction.
//!
//! Turns the "my modules" page into [`ModuleSummary`] values. Headings whose
//! link does not match the module URL pattern are decorative and silently
//! skipped; a module without a tool list simply has no tools.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use crate::error::Result;
use crate::models::{ModuleSummary, ToolKind, ToolReference};
use crate::services::selectors::PortalSelectors;
use crate::utils::url::resolve;

/// Fixed path pattern of a module URL: /module/{year}/{semester}/{code}/
const MODULE_URL_PATTERN: &str = r"/module/([^/]+)/([^/]+)/([^/]+)/";

fn module_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MODULE_URL_PATTERN).expect("valid module URL pattern"))
}

/// Parse the module listing page into modules with their classified tools.
pub fn parse_module_list(html: &str, base_url: &str) -> Result<Vec<ModuleSummary>> {
    let selectors = PortalSelectors::new()?;
    let document = Html::parse_document(html);

    let mut modules = Vec::new();
    for heading in document.select(&selectors.module_heading) {
        let Some(link) = heading.select(&selectors.anchor).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let Some(caps) = module_url_re().captures(href) else {
            // Malformed or decorative heading; expected, not an error
            continue;
        };

        let semester = caps[2].to_string();
        let code = caps[3].to_string();
        let name = link.text().collect::<String>().trim().to_string();
        let tools = parse_module_tools(heading, base_url, &selectors);

        modules.push(ModuleSummary {
            code,
            name,
            semester,
            tools,
        });
    }

    Ok(modules)
}

/// Parse the tool list held in the heading's following sibling block.
fn parse_module_tools(
    heading: ElementRef<'_>,
    base_url: &str,
    selectors: &PortalSelectors,
) -> Vec<ToolReference> {
    // The heading's details live in the next element sibling
    let Some(section) = heading.next_siblings().find_map(ElementRef::wrap) else {
        return Vec::new();
    };
    let Some(tool_list) = section.select(&selectors.tool_list).next() else {
        return Vec::new();
    };

    let mut tools = Vec::new();
    for link in tool_list.select(&selectors.anchor) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };

        let kind = classify(link);
        let name = link.text().collect::<String>().trim().to_string();
        let url = resolve(base_url, href);

        tools.push(ToolReference { name, kind, url });
    }

    tools
}

/// Classify a tool link by its CSS classes.
///
/// The portal tags each link with a generic class plus the tool class; the
/// first recognized class wins, anything else degrades to `Invalid`.
fn classify(link: ElementRef<'_>) -> ToolKind {
    link.value()
        .classes()
        .map(ToolKind::from_class)
        .find(|kind| *kind != ToolKind::Invalid)
        .unwrap_or(ToolKind::Invalid)
}

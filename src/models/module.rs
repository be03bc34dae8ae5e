//! Module and tool data structures.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of tool a module exposes on the portal.
///
/// The portal tags each tool link with a CSS class; anything unrecognized
/// maps to [`ToolKind::Invalid`] rather than failing the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Attendance,
    Content,
    Coursework,
    Enrollment,
    Moodle,
    Signup,
    Url,
    Invalid,
}

impl ToolKind {
    /// Classify a tool link by its markup class string.
    pub fn from_class(class: &str) -> Self {
        match class {
            "coursework" => Self::Coursework,
            "tas" => Self::Attendance,
            "Enrollment" => Self::Enrollment,
            "URL" => Self::Url,
            "content" => Self::Content,
            "signup" => Self::Signup,
            "moodlelink" => Self::Moodle,
            _ => Self::Invalid,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Attendance => "Attendance",
            Self::Content => "Content",
            Self::Coursework => "Coursework",
            Self::Enrollment => "Enrollment",
            Self::Moodle => "Moodle Link",
            Self::Signup => "Signup",
            Self::Url => "URL",
            Self::Invalid => "Invalid Tool",
        };
        f.write_str(name)
    }
}

/// A tool exposed by a module (coursework, attendance, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolReference {
    /// Display name of the tool
    pub name: String,

    /// Classified tool kind
    pub kind: ToolKind,

    /// Absolute URL of the tool page
    pub url: String,
}

impl ToolReference {
    pub fn is_coursework(&self) -> bool {
        self.kind == ToolKind::Coursework
    }
}

/// A module as listed on the "my modules" page.
///
/// Built once per fetch of the listing page; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    /// Module code (e.g. "CS4099")
    pub code: String,

    /// Module display name
    pub name: String,

    /// Semester identifier from the module URL (e.g. "S1", "Y1")
    pub semester: String,

    /// Tools in page order
    pub tools: Vec<ToolReference>,
}

impl ModuleSummary {
    /// Tools of a given kind, in page order.
    pub fn tools_of_kind(&self, kind: ToolKind) -> impl Iterator<Item = &ToolReference> {
        self.tools.iter().filter(move |t| t.kind == kind)
    }

    /// Coursework tools, in page order.
    pub fn coursework_tools(&self) -> impl Iterator<Item = &ToolReference> {
        self.tools_of_kind(ToolKind::Coursework)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_class_known_kinds() {
        assert_eq!(ToolKind::from_class("coursework"), ToolKind::Coursework);
        assert_eq!(ToolKind::from_class("tas"), ToolKind::Attendance);
        assert_eq!(ToolKind::from_class("Enrollment"), ToolKind::Enrollment);
        assert_eq!(ToolKind::from_class("URL"), ToolKind::Url);
        assert_eq!(ToolKind::from_class("content"), ToolKind::Content);
        assert_eq!(ToolKind::from_class("signup"), ToolKind::Signup);
        assert_eq!(ToolKind::from_class("moodlelink"), ToolKind::Moodle);
    }

    #[test]
    fn test_from_class_unknown_is_invalid() {
        assert_eq!(ToolKind::from_class("wiki"), ToolKind::Invalid);
        assert_eq!(ToolKind::from_class(""), ToolKind::Invalid);
        // Classification is case-sensitive, matching the portal's markup
        assert_eq!(ToolKind::from_class("Coursework"), ToolKind::Invalid);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(ToolKind::Moodle.to_string(), "Moodle Link");
        assert_eq!(ToolKind::Invalid.to_string(), "Invalid Tool");
    }

    #[test]
    fn test_tools_of_kind_preserves_order() {
        let tool = |name: &str, kind| ToolReference {
            name: name.to_string(),
            kind,
            url: format!("https://example.com/{name}"),
        };
        let module = ModuleSummary {
            code: "CS1001".to_string(),
            name: "Programming".to_string(),
            semester: "S1".to_string(),
            tools: vec![
                tool("Practicals", ToolKind::Coursework),
                tool("Slides", ToolKind::Content),
                tool("Exams", ToolKind::Coursework),
            ],
        };

        let names: Vec<_> = module.coursework_tools().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Practicals", "Exams"]);
    }
}

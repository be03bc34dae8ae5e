//! Assignment and feedback data structures.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date format of the due and submitted cells: "30 Sep 10, 23:59".
pub const DUE_DATE_FORMAT: &str = "%d %b %y, %H:%M";

/// Date format of the feedback-by cell: "07 Oct 10".
pub const FEEDBACK_DATE_FORMAT: &str = "%d %b %y";

/// Date format used by the feedback JSON representation: "07/10/2010 14:30".
pub const FEEDBACK_JSON_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// One row of a coursework tool's assignment table.
///
/// Equality is full structural equality over every field, which is exactly
/// the change-detection equality: feedback bodies are fetched lazily and are
/// deliberately not part of the record, only their URLs are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Portal-assigned id, unique within a tool
    pub id: u32,

    /// Assignment display name
    pub name: String,

    /// Submission deadline
    pub due_date: NaiveDateTime,

    /// Date feedback is promised by
    pub feedback_date: NaiveDate,

    /// When the student submitted; absent means not submitted, which must
    /// never be conflated with any concrete timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_date: Option<NaiveDateTime>,

    /// URL of the uploaded submission, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_url: Option<String>,

    /// Feedback entry URLs in page order, placeholder actions excluded
    #[serde(default)]
    pub feedback_urls: Vec<String>,

    /// Recorded grade, absent until graded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<f64>,

    /// Weighting percentage, absent when the tool has none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weighting: Option<f64>,
}

impl fmt::Display for AssignmentRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "------ Assignment {} -------", self.name)?;
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Due date: {}", self.due_date.format(DUE_DATE_FORMAT))?;
        writeln!(
            f,
            "Feedback date: {}",
            self.feedback_date.format(FEEDBACK_DATE_FORMAT)
        )?;

        match self.submitted_date {
            Some(submitted) => {
                writeln!(f, "Submitted date: {}", submitted.format(DUE_DATE_FORMAT))?;
                if let Some(url) = &self.submission_url {
                    writeln!(f, "Uploaded file URL: {url}")?;
                }
            }
            None => writeln!(f, "Not submitted")?,
        }

        match self.grade {
            Some(grade) => writeln!(f, "Grade: {grade}")?,
            None => writeln!(f, "No grade recorded")?,
        }
        match self.weighting {
            Some(weighting) => write!(f, "Weighting: {weighting}"),
            None => write!(f, "Not weighted"),
        }
    }
}

/// A single piece of feedback on an assignment.
///
/// Fetched on demand per feedback URL; not part of snapshot equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    /// Who left the feedback
    pub sender: String,

    /// When it was left
    pub date: NaiveDateTime,

    /// The comment body
    pub comment: String,
}

impl fmt::Display for FeedbackRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Feedback from {} on {}: \n{}",
            self.sender,
            self.date.format(DUE_DATE_FORMAT),
            self.comment
        )
    }
}

/// The full set of assignment records for one tool at the end of a run,
/// keyed by assignment id rendered as a string.
///
/// BTreeMap keeps the serialized form stable across runs.
pub type Snapshot = BTreeMap<String, AssignmentRecord>;

/// Build a snapshot from a fetched assignment sequence.
pub fn snapshot_of(records: &[AssignmentRecord]) -> Snapshot {
    records
        .iter()
        .map(|r| (r.id.to_string(), r.clone()))
        .collect()
}


#[cfg(test)]
pub(crate) use tests::sample_record;

//! Coursework listing extraction.
//!
//! The assignment table is positionally addressed: every row must carry the
//! full column set, and each column has its own leniency. A short row means
//! the institution changed its markup and is fatal for the page; an empty or
//! unparsable optional cell is normal and degrades to an absent value.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use scraper::{ElementRef, Html};

use crate::error::{AppError, Result};
use crate::models::{
    AssignmentRecord, DUE_DATE_FORMAT, FEEDBACK_DATE_FORMAT,
};
use crate::services::selectors::PortalSelectors;
use crate::utils::url::resolve;

/// Visible text of the placeholder action in the feedback cell. Not feedback.
const ADD_COMMENT_PLACEHOLDER: &str = "[Add Comment]";

/// Query suffix asking the portal for the machine-readable feedback form.
const FEEDBACK_JSON_SUFFIX: &str = "&template_format=application/json";

/// Whether a column tolerates empty or unparsable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leniency {
    /// Unparsable content fails the page
    Required,
    /// Unparsable content degrades to an absent value
    Lenient,
}

/// What a column of the assignment table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnField {
    Name,
    DueDate,
    FeedbackDate,
    SubmissionFile,
    SubmittedDate,
    Feedback,
    Grade,
    Weighting,
    Chart,
    Id,
}

/// One column of the assignment table.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub field: ColumnField,
    pub name: &'static str,
    pub leniency: Leniency,
}

/// The positional schema of the assignment table, in cell order.
///
/// Row extraction walks this list; each column's leniency decides whether
/// unparsable content fails the page or degrades to an absent value.
pub const COLUMNS: [Column; 10] = [
    Column { field: ColumnField::Name, name: "name", leniency: Leniency::Required },
    Column { field: ColumnField::DueDate, name: "due date", leniency: Leniency::Required },
    Column { field: ColumnField::FeedbackDate, name: "feedback date", leniency: Leniency::Required },
    Column { field: ColumnField::SubmissionFile, name: "submission file", leniency: Leniency::Lenient },
    Column { field: ColumnField::SubmittedDate, name: "submitted date", leniency: Leniency::Lenient },
    Column { field: ColumnField::Feedback, name: "feedback", leniency: Leniency::Lenient },
    Column { field: ColumnField::Grade, name: "grade", leniency: Leniency::Lenient },
    Column { field: ColumnField::Weighting, name: "weighting", leniency: Leniency::Lenient },
    Column { field: ColumnField::Chart, name: "chart", leniency: Leniency::Lenient },
    Column { field: ColumnField::Id, name: "id", leniency: Leniency::Required },
];

fn weighting_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+) %").expect("valid weighting pattern"))
}

/// Parse a coursework tool's page into its assignment records.
///
/// `tool_url` is the tool's own URL, needed to resolve the relative
/// submission and feedback links.
pub fn parse_assignments(html: &str, tool_url: &str) -> Result<Vec<AssignmentRecord>> {
    let selectors = PortalSelectors::new()?;
    let document = Html::parse_document(html);

    let body = document
        .select(&selectors.table_body)
        .next()
        .ok_or_else(|| AppError::parse("coursework page", "missing assignment table body"))?;

    let mut records = Vec::new();
    for row in body.select(&selectors.row) {
        let cells: Vec<ElementRef<'_>> = row.select(&selectors.cell).collect();
        if cells.len() < COLUMNS.len() {
            return Err(AppError::parse(
                "coursework page",
                format!("row has {} cells, expected {}", cells.len(), COLUMNS.len()),
            ));
        }

        records.push(parse_row(&cells, tool_url, &selectors)?);
    }

    Ok(records)
}

fn parse_row(
    cells: &[ElementRef<'_>],
    tool_url: &str,
    selectors: &PortalSelectors,
) -> Result<AssignmentRecord> {
    let mut name = String::new();
    let mut due_date = None;
    let mut feedback_date = None;
    let mut submitted_date = None;
    let mut submission_url = None;
    let mut feedback_urls = Vec::new();
    let mut grade = None;
    let mut weighting = None;
    let mut id = None;

    for (column, cell) in COLUMNS.iter().zip(cells) {
        match column.field {
            ColumnField::Name => name = cell_text(cell),
            ColumnField::DueDate => due_date = parse_datetime(column, &cell_text(cell))?,
            ColumnField::FeedbackDate => {
                feedback_date = parse_date(column, &cell_text(cell))?
            }
            ColumnField::SubmissionFile => {
                submission_url = cell
                    .select(&selectors.anchor)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .map(|href| resolve(tool_url, href));
            }
            ColumnField::SubmittedDate => {
                submitted_date = parse_datetime(column, &cell_text(cell))?
            }
            ColumnField::Feedback => {
                feedback_urls = parse_feedback_urls(cell, tool_url, selectors)
            }
            ColumnField::Grade => grade = parse_number(column, &cell_text(cell))?,
            ColumnField::Weighting => weighting = parse_weighting(&cell_text(cell)),
            ColumnField::Chart => {}
            ColumnField::Id => id = Some(parse_id(column, cell, selectors)?),
        }
    }

    Ok(AssignmentRecord {
        id: require(id, "id")?,
        name,
        due_date: require(due_date, "due date")?,
        feedback_date: require(feedback_date, "feedback date")?,
        submitted_date,
        submission_url,
        feedback_urls,
        grade,
        weighting,
    })
}

/// Guard for required columns. Unreachable while COLUMNS lists them.
fn require<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| AppError::parse("coursework page", format!("missing {name} column")))
}

/// Concatenated, whitespace-normalized text of a cell.
fn cell_text(cell: &ElementRef<'_>) -> String {
    cell.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a cell failure per the column's leniency.
fn lenient_or<T>(column: &Column, message: String) -> Result<Option<T>> {
    match column.leniency {
        Leniency::Required => Err(AppError::parse("coursework page", message)),
        Leniency::Lenient => Ok(None),
    }
}

/// Date-and-time cell: "30 Sep 10, 23:59".
fn parse_datetime(column: &Column, text: &str) -> Result<Option<NaiveDateTime>> {
    match NaiveDateTime::parse_from_str(text, DUE_DATE_FORMAT) {
        Ok(value) => Ok(Some(value)),
        Err(e) => lenient_or(column, format!("bad {} '{text}': {e}", column.name)),
    }
}

/// Date-only cell: "07 Oct 10".
fn parse_date(column: &Column, text: &str) -> Result<Option<NaiveDate>> {
    match NaiveDate::parse_from_str(text, FEEDBACK_DATE_FORMAT) {
        Ok(value) => Ok(Some(value)),
        Err(e) => lenient_or(column, format!("bad {} '{text}': {e}", column.name)),
    }
}

/// Plain numeric cell.
fn parse_number(column: &Column, text: &str) -> Result<Option<f64>> {
    match text.parse::<f64>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => lenient_or(column, format!("bad {} '{text}'", column.name)),
    }
}

/// Weighting cell, matched against "<digits> %". No match means unweighted.
fn parse_weighting(text: &str) -> Option<f64> {
    weighting_re()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Feedback cell: a list of links. Placeholder actions are excluded, and
/// each kept URL is suffixed with the JSON template parameter so the later
/// on-demand fetch gets a machine-readable response.
fn parse_feedback_urls(
    cell: &ElementRef<'_>,
    tool_url: &str,
    selectors: &PortalSelectors,
) -> Vec<String> {
    let Some(list) = cell.select(&selectors.feedback_list).next() else {
        return Vec::new();
    };

    let mut urls = Vec::new();
    for item in list.select(&selectors.list_item) {
        let Some(link) = item.select(&selectors.anchor).next() else {
            continue;
        };
        let text = cell_text(&link);
        if text == ADD_COMMENT_PLACEHOLDER {
            continue;
        }
        if let Some(href) = link.value().attr("href") {
            urls.push(format!("{}{}", resolve(tool_url, href), FEEDBACK_JSON_SUFFIX));
        }
    }
    urls
}

/// Hidden id input. Required; a missing or non-numeric id fails the page.
fn parse_id(column: &Column, cell: &ElementRef<'_>, selectors: &PortalSelectors) -> Result<u32> {
    let value = cell
        .select(&selectors.hidden_input)
        .next()
        .and_then(|input| input.value().attr("value"))
        .ok_or_else(|| {
            AppError::parse("coursework page", format!("missing hidden {} input", column.name))
        })?;

    value.parse::<u32>().map_err(|e| {
        AppError::parse("coursework page", format!("bad assignment {} '{value}': {e}", column.name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOOL_URL: &str = "https://mms.example.ac.uk/module/2013_4/S1/CS1001/coursework/";

    struct RowSpec {
        name: &'static str,
        due: &'static str,
        feedback_by: &'static str,
        submission_href: Option<&'static str>,
        submitted: &'static str,
        feedback_items: &'static str,
        grade: &'static str,
        weighting: &'static str,
        id: &'static str,
    }

    impl Default for RowSpec {
        fn default() -> Self {
            Self {
                name: "Practical 1",
                due: "30 Sep 10, 23:59",
                feedback_by: "07 Oct 10",
                submission_href: None,
                submitted: "",
                feedback_items: r#"<li><a href="?action=comment&id=101">[Add Comment]</a></li>"#,
                grade: "",
                weighting: "50 %",
                id: "101",
            }
        }
    }

    fn render_row(spec: &RowSpec) -> String {
        let submission = spec
            .submission_href
            .map(|href| format!(r#"<a href="{href}">file.pdf</a>"#))
            .unwrap_or_default();
        format!(
            "<tr>\
             <td>{name}</td>\
             <td>{due}</td>\
             <td>{feedback_by}</td>\
             <td>{submission}</td>\
             <td>{submitted}</td>\
             <td><ul class=\"horizontal\">{feedback}</ul></td>\
             <td>{grade}</td>\
             <td>{weighting}</td>\
             <td><a href=\"?action=chart&id={id}\">chart</a></td>\
             <td><input type=\"hidden\" name=\"assignment\" value=\"{id}\"/></td>\
             </tr>",
            name = spec.name,
            due = spec.due,
            feedback_by = spec.feedback_by,
            submitted = spec.submitted,
            feedback = spec.feedback_items,
            grade = spec.grade,
            weighting = spec.weighting,
            id = spec.id,
        )
    }

    fn render_page(rows: &[String]) -> String {
        format!(
            "<html><body><table><tbody>{}</tbody></table></body></html>",
            rows.join("")
        )
    }

    #[test]
    fn test_parse_minimal_row() {
        let page = render_page(&[render_row(&RowSpec::default())]);
        let records = parse_assignments(&page, TOOL_URL).unwrap();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.id, 101);
        assert_eq!(record.name, "Practical 1");
        assert_eq!(record.due_date.format(DUE_DATE_FORMAT).to_string(), "30 Sep 10, 23:59");
        assert_eq!(record.submitted_date, None);
        assert_eq!(record.submission_url, None);
        assert_eq!(record.grade, None);
        assert_eq!(record.weighting, Some(50.0));
        // The placeholder action is not feedback
        assert!(record.feedback_urls.is_empty());
    }

    #[test]
    fn test_parse_submitted_and_graded_row() {
        let spec = RowSpec {
            submission_href: Some("?action=download&id=101"),
            submitted: "29 Sep 10, 12:00",
            feedback_items: concat!(
                r#"<li><a href="?action=feedback&id=101&entry=1">Marker comments</a></li>"#,
                r#"<li><a href="?action=comment&id=101">[Add Comment]</a></li>"#,
            ),
            grade: "17.5",
            ..RowSpec::default()
        };
        let page = render_page(&[render_row(&spec)]);
        let records = parse_assignments(&page, TOOL_URL).unwrap();

        let record = &records[0];
        assert_eq!(
            record.submission_url.as_deref(),
            Some("https://mms.example.ac.uk/module/2013_4/S1/CS1001/coursework/?action=download&id=101")
        );
        assert!(record.submitted_date.is_some());
        assert_eq!(record.grade, Some(17.5));
        assert_eq!(
            record.feedback_urls,
            vec![
                "https://mms.example.ac.uk/module/2013_4/S1/CS1001/coursework/\
                 ?action=feedback&id=101&entry=1&template_format=application/json"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_lenient_fields_degrade_to_absent() {
        let spec = RowSpec {
            submitted: "Not submitted yet",
            grade: "N/A",
            weighting: "see handbook",
            ..RowSpec::default()
        };
        let page = render_page(&[render_row(&spec)]);
        let records = parse_assignments(&page, TOOL_URL).unwrap();

        let record = &records[0];
        assert_eq!(record.submitted_date, None);
        assert_eq!(record.grade, None);
        assert_eq!(record.weighting, None);
    }

    #[test]
    fn test_short_row_is_structural_error() {
        let page = render_page(&["<tr><td>Practical 1</td><td>30 Sep 10, 23:59</td></tr>".to_string()]);
        let err = parse_assignments(&page, TOOL_URL).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn test_missing_table_body_is_structural_error() {
        let err = parse_assignments("<html><body><p>Moved!</p></body></html>", TOOL_URL).unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn test_bad_due_date_is_structural_error() {
        let spec = RowSpec {
            due: "whenever",
            ..RowSpec::default()
        };
        let page = render_page(&[render_row(&spec)]);
        assert!(parse_assignments(&page, TOOL_URL).is_err());
    }

    #[test]
    fn test_rows_keep_page_order() {
        let second = RowSpec {
            name: "Practical 2",
            id: "102",
            ..RowSpec::default()
        };
        let page = render_page(&[render_row(&RowSpec::default()), render_row(&second)]);
        let records = parse_assignments(&page, TOOL_URL).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![101, 102]);
    }

    #[test]
    fn test_weighting_parser() {
        assert_eq!(parse_weighting("50 %"), Some(50.0));
        assert_eq!(parse_weighting("Weighting: 25 %"), Some(25.0));
        assert_eq!(parse_weighting("50%"), None);
        assert_eq!(parse_weighting(""), None);
    }

    #[test]
    fn test_grade_cell_degrades_per_schema() {
        let grade = COLUMNS
            .iter()
            .find(|c| c.field == ColumnField::Grade)
            .unwrap();
        assert_eq!(parse_number(grade, "72.5").unwrap(), Some(72.5));
        assert_eq!(parse_number(grade, "N/A").unwrap(), None);
        assert_eq!(parse_number(grade, "").unwrap(), None);
    }

    #[test]
    fn test_leniency_decides_cell_failure_handling() {
        let strict = Column {
            field: ColumnField::DueDate,
            name: "due date",
            leniency: Leniency::Required,
        };
        let lax = Column {
            leniency: Leniency::Lenient,
            ..strict
        };

        assert!(parse_datetime(&strict, "whenever").is_err());
        assert_eq!(parse_datetime(&lax, "whenever").unwrap(), None);
    }

    #[test]
    fn test_schema_leniency_contract() {
        let required: Vec<_> = COLUMNS
            .iter()
            .filter(|c| c.leniency == Leniency::Required)
            .map(|c| c.name)
            .collect();
        assert_eq!(required, vec!["name", "due date", "feedback date", "id"]);
    }
}

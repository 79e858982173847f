//! evalbee-report: score report rendering.
//!
//! Turns a [`ScoreReport`](evalbee_core::report::ScoreReport) into a
//! self-contained HTML page or a Markdown summary.

pub mod html;
pub mod markdown;

pub use html::{generate_html, write_html_report};
pub use markdown::to_markdown;

use evalbee_core::model::Subject;

/// Display name for a subject heading.
pub(crate) fn subject_label(subject: Subject) -> &'static str {
    match subject {
        Subject::Physics => "Physics",
        Subject::Chemistry => "Chemistry",
        Subject::Mathematics => "Mathematics",
    }
}

/// Comma-separated wrong question numbers, or "none".
pub(crate) fn wrong_list(questions: &[u32]) -> String {
    if questions.is_empty() {
        return "none".to_string();
    }
    questions
        .iter()
        .map(|q| q.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

//! Markdown summary of a score report.

use evalbee_core::report::ScoreReport;

use crate::{subject_label, wrong_list};

/// Render a report as a Markdown section with one row per subject.
pub fn to_markdown(report: &ScoreReport, title: &str) -> String {
    let mut md = format!("## {title}\n\n");
    md.push_str(&format!(
        "**Total: {} / {}**\n\n",
        report.total,
        ScoreReport::max_marks()
    ));
    md.push_str("| Subject | Marks | Correct | Wrong | Unattempted | Wrong questions |\n");
    md.push_str("|---|---:|---:|---:|---:|---|\n");
    for score in report.subjects() {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            subject_label(score.subject),
            score.marks,
            score.correct,
            score.wrong,
            score.unattempted,
            wrong_list(&score.wrong_questions),
        ));
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use evalbee_core::grade;
    use evalbee_core::model::{AnswerKey, AnswerSet, Sheet, Subject, SubjectSheet};

    #[test]
    fn markdown_table() {
        let mut key = Sheet::default();
        *key.subject_mut(Subject::Chemistry) = SubjectSheet::from_entries(&["A"], &["", "", "5"]);
        let mut answers = AnswerSet::default();
        answers.set_mcq(Subject::Chemistry, 0, "a");
        answers.set_numeric(Subject::Chemistry, 2, "4.9");

        let md = to_markdown(&grade(&AnswerKey::new(key), &answers), "Mock 2");

        assert!(md.starts_with("## Mock 2\n"));
        assert!(md.contains("**Total: 3 / 300**"));
        assert!(md.contains("| Chemistry | 3 | 1 | 1 | 23 | 23 |"));
        assert!(md.contains("| Physics | 0 | 0 | 0 | 25 | none |"));
    }
}

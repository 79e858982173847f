//! HTML report generator.
//!
//! Produces a self-contained HTML file with the CSS inlined.

use anyhow::Result;
use std::path::Path;

use evalbee_core::grading::{BlockScore, Outcome};
use evalbee_core::report::ScoreReport;

use crate::{subject_label, wrong_list};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page for a score report.
///
/// `title` names the attempt, e.g. "Priya / Mock Test 3".
pub fn generate_html(report: &ScoreReport, title: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>evalbee score: {}</title>\n",
        html_escape(title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Score report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\"><strong>{}</strong></p>\n",
        html_escape(title)
    ));
    html.push_str(&format!(
        "<p class=\"total {}\">Total: {} / {}</p>\n",
        if report.total < 0 { "fail" } else { "pass" },
        report.total,
        ScoreReport::max_marks()
    ));
    html.push_str("</header>\n");

    // Subject summary
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Subject</th><th>Marks</th><th>Correct</th><th>Wrong</th><th>Unattempted</th><th>Wrong questions</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for score in report.subjects() {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            subject_label(score.subject),
            score.marks,
            score.correct,
            score.wrong,
            score.unattempted,
            wrong_list(&score.wrong_questions),
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Per-question grids
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    for score in report.subjects() {
        html.push_str(&format!("<h3>{}</h3>\n", subject_label(score.subject)));
        html.push_str("<div class=\"grid\">\n");
        push_outcomes(&mut html, &score.mcq);
        push_outcomes(&mut html, &score.numeric);
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn push_outcomes(html: &mut String, block: &BlockScore) {
    for q in &block.outcomes {
        let class = match q.outcome {
            Outcome::Correct => "pass",
            Outcome::Wrong => "fail",
            Outcome::Unattempted => "skip",
        };
        html.push_str(&format!(
            "<span class=\"q {class}\" title=\"{}\">{}</span>\n",
            block.kind, q.number
        ));
    }
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ScoreReport, title: &str, path: &Path) -> Result<()> {
    let html = generate_html(report, title);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --skip: #f3f4f6; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --skip: #1f2937; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.total { font-size: 1.5rem; font-weight: bold; display: inline-block; padding: 0.25rem 0.75rem; border-radius: 8px; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.grid { display: flex; flex-wrap: wrap; gap: 0.25rem; }
.q { width: 2.5rem; text-align: center; padding: 0.25rem 0; border-radius: 4px; border: 1px solid var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
.skip { background: var(--skip); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

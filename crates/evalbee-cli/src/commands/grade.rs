//! The `evalbee grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use evalbee_core::report::ScoreReport;
use evalbee_core::sheet::{parse_answer_set, parse_sheet};
use evalbee_report::{generate_html, to_markdown};

use super::summary_table;

pub fn execute(
    key_path: PathBuf,
    answers_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
) -> Result<()> {
    let key_file = parse_sheet(&key_path)?;
    let title = key_file.name.clone().unwrap_or_else(|| {
        key_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "answer key".to_string())
    });
    let key = key_file.into_answer_key();
    let answers = parse_answer_set(&answers_path)?;

    let report = evalbee_core::grade(&key, &answers);
    tracing::debug!(total = report.total, "graded {}", answers_path.display());

    let rendered = render(&report, &title, &format)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            eprintln!("Report written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn render(report: &ScoreReport, title: &str, format: &str) -> Result<String> {
    match format {
        "text" => Ok(format!("{title}\n{}", summary_table(report))),
        "json" => Ok(serde_json::to_string_pretty(report)?),
        "markdown" | "md" => Ok(to_markdown(report, title)),
        "html" => Ok(generate_html(report, title)),
        other => anyhow::bail!("unknown format '{other}' (expected text, json, markdown, html)"),
    }
}

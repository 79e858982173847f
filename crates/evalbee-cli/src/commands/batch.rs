//! The `evalbee batch` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use evalbee_core::engine::{BatchConfig, BatchGrader, ProgressReporter, Submission};
use evalbee_core::records::ResultRecord;
use evalbee_core::report::ScoreReport;
use evalbee_core::sheet::load_sheet_directory;

use super::{open_store, resolve_test};

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_graded(&self, record: &ResultRecord) {
        eprintln!(
            "  Graded: {} ({} / {})",
            record.student_name,
            record.report.total,
            ScoreReport::max_marks()
        );
    }

    fn on_error(&self, student: &str, error: &str) {
        eprintln!("  ERROR: {student}: {error}");
    }

    fn on_batch_complete(&self, total: usize, saved: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {saved}/{total} saved, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

pub async fn execute(
    test: String,
    dir: PathBuf,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = open_store(config_path.as_deref()).await?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let test = resolve_test(store.as_ref(), &test).await?;

    let mut submissions = Vec::new();
    let mut skipped = 0usize;
    for (path, sheet) in load_sheet_directory(&dir)? {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Ok(id) = Uuid::parse_str(&stem) else {
            tracing::warn!("skipping {}: file name is not a student id", path.display());
            skipped += 1;
            continue;
        };
        match store.get_student(id).await {
            Ok(student) => submissions.push(Submission {
                student,
                answers: sheet.into_answer_set(),
            }),
            Err(e) => {
                tracing::warn!("skipping {}: {e}", path.display());
                skipped += 1;
            }
        }
    }

    anyhow::ensure!(
        !submissions.is_empty(),
        "no answer sheets named <student-id>.toml found in {}",
        dir.display()
    );

    eprintln!(
        "evalbee v{} - Grading {} answer sheet(s) for {}",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        test.name
    );

    let grader = BatchGrader::new(store, BatchConfig { parallelism });
    let mut summary = grader.run(&test, submissions, &ConsoleReporter).await;

    summary.saved.sort_by(|a, b| {
        b.report
            .total
            .cmp(&a.report.total)
            .then_with(|| a.student_name.cmp(&b.student_name))
    });

    let mut table = Table::new();
    table.set_header(vec!["Student", "Physics", "Chemistry", "Mathematics", "Total"]);
    for r in &summary.saved {
        table.add_row(vec![
            Cell::new(&r.student_name),
            Cell::new(r.report.physics.marks),
            Cell::new(r.report.chemistry.marks),
            Cell::new(r.report.mathematics.marks),
            Cell::new(r.report.total),
        ]);
    }
    println!("{table}");
    if skipped > 0 {
        println!("{skipped} file(s) skipped.");
    }

    anyhow::ensure!(
        summary.failed == 0,
        "{} result(s) could not be saved",
        summary.failed
    );
    Ok(())
}

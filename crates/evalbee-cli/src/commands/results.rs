//! The `evalbee results` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use uuid::Uuid;

use evalbee_core::records::ResultFilter;

use super::open_store;

pub async fn execute(
    student_id: Option<Uuid>,
    test_id: Option<Uuid>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path.as_deref()).await?;
    let results = store
        .list_results(&ResultFilter {
            student_id,
            test_id,
        })
        .await?;

    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Test",
        "Physics",
        "Chemistry",
        "Mathematics",
        "Total",
        "Saved",
    ]);
    for r in &results {
        table.add_row(vec![
            Cell::new(&r.student_name),
            Cell::new(&r.test_name),
            Cell::new(r.report.physics.marks),
            Cell::new(r.report.chemistry.marks),
            Cell::new(r.report.mathematics.marks),
            Cell::new(r.report.total),
            Cell::new(r.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }
    println!("{table}");
    println!("{} result(s)", results.len());
    Ok(())
}

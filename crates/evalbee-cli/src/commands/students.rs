//! The `evalbee students` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use evalbee_core::roster::parse_names_from_csv;

use super::open_store;

/// Import a CSV roster into a batch, in chunks.
pub async fn import(
    file: PathBuf,
    batch: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let text = std::fs::read_to_string(&file)
        .with_context(|| format!("failed to read roster: {}", file.display()))?;
    let names = parse_names_from_csv(&text);
    anyhow::ensure!(!names.is_empty(), "No names found in {}", file.display());

    let (config, store) = open_store(config_path.as_deref()).await?;
    let batch = batch.unwrap_or_else(|| config.default_batch.clone());

    let mut saved = 0;
    for chunk in names.chunks(config.import_chunk_size) {
        saved += store.add_students(chunk, &batch).await?.len();
        tracing::debug!(saved, total = names.len(), "roster chunk stored");
    }

    println!("Imported {saved} student(s) into batch {batch}");
    Ok(())
}

/// Search students by partial name.
pub async fn search(
    query: String,
    batch: Option<String>,
    limit: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = open_store(config_path.as_deref()).await?;
    let limit = limit.unwrap_or(config.search_limit);
    anyhow::ensure!(limit >= 1, "limit must be at least 1");

    let students = store
        .search_students(&query, batch.as_deref(), limit)
        .await?;

    if students.is_empty() {
        println!("No students match '{query}'");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Name", "Batch"]);
    for s in &students {
        table.add_row(vec![
            Cell::new(s.id),
            Cell::new(&s.name),
            Cell::new(&s.batch),
        ]);
    }
    println!("{table}");
    Ok(())
}

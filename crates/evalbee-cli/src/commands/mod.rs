pub mod batch;
pub mod check;
pub mod grade;
pub mod init;
pub mod results;
pub mod students;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};
use uuid::Uuid;

use evalbee_core::records::{Student, TestRecord};
use evalbee_core::report::ScoreReport;
use evalbee_core::traits::RecordStore;
use evalbee_store::{load_config_from, EvalbeeConfig, JsonFileStore};

/// Load the config and open the record store it points at.
pub async fn open_store(
    config_path: Option<&Path>,
) -> Result<(EvalbeeConfig, Arc<dyn RecordStore>)> {
    let config = load_config_from(config_path)?;
    let store = JsonFileStore::open(&config.data_dir)
        .await
        .with_context(|| format!("failed to open data directory {}", config.data_dir.display()))?;
    let store: Arc<dyn RecordStore> = Arc::new(store);
    Ok((config, store))
}

/// Find a student by id, or by a name that matches exactly one student.
///
/// An exact (case-insensitive) name match wins over partial matches, however
/// many partial matches there are. `limit` only bounds the names listed when
/// the query is ambiguous.
pub async fn resolve_student(
    store: &dyn RecordStore,
    query: &str,
    limit: usize,
) -> Result<Student> {
    let query = query.trim();
    if let Ok(id) = Uuid::parse_str(query) {
        return Ok(store.get_student(id).await?);
    }

    let mut hits = store.search_students(query, None, usize::MAX).await?;
    let needle = query.to_lowercase();
    let mut exact: Vec<Student> = hits
        .iter()
        .filter(|s| s.name.to_lowercase() == needle)
        .cloned()
        .collect();
    match exact.len() {
        1 => return Ok(exact.remove(0)),
        0 => {}
        _ => {
            let ids: Vec<String> = exact.iter().map(|s| s.id.to_string()).collect();
            anyhow::bail!(
                "several students are named '{query}' ({}); pass a student id instead",
                ids.join(", ")
            )
        }
    }

    match hits.len() {
        0 => anyhow::bail!("no student matches '{query}'"),
        1 => Ok(hits.remove(0)),
        n => {
            let names: Vec<&str> = hits.iter().take(limit).map(|s| s.name.as_str()).collect();
            let more = if n > names.len() {
                format!(", and {} more", n - names.len())
            } else {
                String::new()
            };
            anyhow::bail!(
                "'{query}' matches several students ({}{more}); pass a student id instead",
                names.join(", ")
            )
        }
    }
}

/// Find a test by id or exact name.
pub async fn resolve_test(store: &dyn RecordStore, query: &str) -> Result<TestRecord> {
    if let Ok(id) = Uuid::parse_str(query.trim()) {
        return Ok(store.get_test(id).await?);
    }
    store
        .list_tests(usize::MAX)
        .await?
        .into_iter()
        .find(|t| t.name == query.trim())
        .with_context(|| format!("no test named '{query}'"))
}

/// Per-subject summary table followed by the total line.
pub fn summary_table(report: &ScoreReport) -> String {
    let mut table = Table::new();
    table.set_header(vec![
        "Subject",
        "Marks",
        "Correct",
        "Wrong",
        "Unattempted",
        "Wrong questions",
    ]);

    for score in report.subjects() {
        let wrong = if score.wrong_questions.is_empty() {
            "-".to_string()
        } else {
            score
                .wrong_questions
                .iter()
                .map(|q| q.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![
            Cell::new(score.subject),
            Cell::new(score.marks),
            Cell::new(score.correct),
            Cell::new(score.wrong),
            Cell::new(score.unattempted),
            Cell::new(wrong),
        ]);
    }

    format!(
        "{table}\nTotal: {} / {}",
        report.total,
        ScoreReport::max_marks()
    )
}

#[cfg(test)]
mod lookup_tests {
    use super::*;
    use evalbee_core::memory::MemoryStore;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn exact_name_wins_past_the_search_limit() {
        let store = MemoryStore::new();
        let mut roster: Vec<String> = (0..10).map(|i| format!("Ali Khan {i}")).collect();
        roster.push("Ali".to_string());
        store.add_students(&roster, "JEE").await.unwrap();

        let student = resolve_student(&store, "Ali", 10).await.unwrap();
        assert_eq!(student.name, "Ali");

        let student = resolve_student(&store, "  ali ", 3).await.unwrap();
        assert_eq!(student.name, "Ali");
    }

    #[tokio::test]
    async fn exact_match_ignores_non_ascii_case() {
        let store = MemoryStore::new();
        store
            .add_students(&names(&["Élodie", "Élodie Martin"]), "JEE")
            .await
            .unwrap();

        let student = resolve_student(&store, "éLODIE", 10).await.unwrap();
        assert_eq!(student.name, "Élodie");
    }

    #[tokio::test]
    async fn ambiguous_and_missing_names_fail() {
        let store = MemoryStore::new();
        let roster: Vec<String> = (0..5).map(|i| format!("Rahul {i}")).collect();
        store.add_students(&roster, "JEE").await.unwrap();

        let err = resolve_student(&store, "rahul", 2).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("matches several students"));
        assert!(message.contains("and 3 more"));

        let err = resolve_student(&store, "Priya", 10).await.unwrap_err();
        assert!(err.to_string().contains("no student matches"));

        let student = resolve_student(&store, "Rahul 4", 10).await.unwrap();
        assert_eq!(student.name, "Rahul 4");
    }

    #[tokio::test]
    async fn duplicate_exact_names_are_ambiguous() {
        let store = MemoryStore::new();
        store.add_students(&names(&["Priya"]), "JEE").await.unwrap();
        store.add_students(&names(&["priya"]), "NEET").await.unwrap();

        let err = resolve_student(&store, "Priya", 10).await.unwrap_err();
        assert!(err.to_string().contains("several students are named"));
    }
}

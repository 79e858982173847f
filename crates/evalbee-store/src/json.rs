//! JSON-file record store.
//!
//! Students and tests each live in one pretty-printed JSON document under the
//! data directory. Those documents are rewritten through a temporary file
//! that is synced to disk and then renamed over the original.
//!
//! Results are append-only: `results.jsonl` holds one JSON object per line,
//! and saving a result appends and syncs a single line. A torn final line
//! left by a crash is dropped (with a warning) the next time the store is
//! opened. If a write fails, the in-memory collection is rolled back to match
//! the disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use evalbee_core::error::StoreError;
use evalbee_core::model::AnswerKey;
use evalbee_core::records::{Records, ResultFilter, ResultRecord, Student, TestRecord};
use evalbee_core::traits::RecordStore;

const STUDENTS_FILE: &str = "students.json";
const TESTS_FILE: &str = "tests.json";
const RESULTS_FILE: &str = "results.jsonl";

/// A record store persisted as JSON files in a directory.
pub struct JsonFileStore {
    dir: PathBuf,
    records: Mutex<Records>,
}

impl JsonFileStore {
    /// Open (or create) a store rooted at `dir`.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;

        let results_path = dir.join(RESULTS_FILE);
        let (results, torn) = load_results(&results_path).await?;
        if torn {
            tracing::warn!(
                path = %results_path.display(),
                kept = results.len(),
                "dropped a torn trailing result line"
            );
            write_atomic(&results_path, &result_lines(&results)?).await?;
        }

        let records = Records {
            students: load_collection(&dir.join(STUDENTS_FILE)).await?,
            tests: load_collection(&dir.join(TESTS_FILE)).await?,
            results,
        };
        tracing::debug!(
            dir = %dir.display(),
            students = records.students.len(),
            tests = records.tests.len(),
            results = records.results.len(),
            "opened record store"
        );

        Ok(Self {
            dir,
            records: Mutex::new(records),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn persist<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(value)?;
        write_atomic(&self.dir.join(file), &json).await
    }

    /// Append one result line. On failure the file is cut back to its
    /// previous length.
    async fn append_result_line(&self, record: &ResultRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join(RESULTS_FILE))
            .await?;
        let len = file.metadata().await?.len();

        let written = async {
            file.write_all(&line).await?;
            file.sync_data().await
        }
        .await;
        if let Err(e) = written {
            if let Err(trunc) = file.set_len(len).await {
                tracing::error!("failed to roll back partial result line: {trunc}");
            }
            return Err(e.into());
        }
        Ok(())
    }
}

/// Write `bytes` to a temporary sibling, sync it, then rename it over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn result_lines(results: &[ResultRecord]) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::new();
    for record in results {
        serde_json::to_writer(&mut out, record)?;
        out.push(b'\n');
    }
    Ok(out)
}

async fn load_collection<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Read `results.jsonl`. The flag is set when an unterminated, unparseable
/// last line was dropped; any other bad line is an error.
async fn load_results(path: &Path) -> Result<(Vec<ResultRecord>, bool), StoreError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok((Vec::new(), false)),
        Err(e) => return Err(e.into()),
    };

    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let mut results = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        match serde_json::from_str(line) {
            Ok(record) => results.push(record),
            Err(_) if i + 1 == lines.len() && !text.ends_with('\n') => {
                return Ok((results, true));
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok((results, false))
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn add_students(
        &self,
        names: &[String],
        batch: &str,
    ) -> Result<Vec<Student>, StoreError> {
        let mut records = self.records.lock().await;
        let before = records.students.len();
        let added = records.add_students(names, batch);
        if let Err(e) = self.persist(STUDENTS_FILE, &records.students).await {
            records.students.truncate(before);
            return Err(e);
        }
        tracing::info!(count = added.len(), batch, "students saved");
        Ok(added)
    }

    async fn search_students(
        &self,
        query: &str,
        batch: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Student>, StoreError> {
        Ok(self.records.lock().await.search_students(query, batch, limit))
    }

    async fn get_student(&self, id: Uuid) -> Result<Student, StoreError> {
        self.records.lock().await.get_student(id)
    }

    async fn add_test(&self, name: &str, key: AnswerKey) -> Result<TestRecord, StoreError> {
        let mut records = self.records.lock().await;
        let test = records.add_test(name, key)?;
        if let Err(e) = self.persist(TESTS_FILE, &records.tests).await {
            records.tests.pop();
            return Err(e);
        }
        tracing::info!(test = %test.name, id = %test.id, "test saved");
        Ok(test)
    }

    async fn list_tests(&self, limit: usize) -> Result<Vec<TestRecord>, StoreError> {
        Ok(self.records.lock().await.list_tests(limit))
    }

    async fn get_test(&self, id: Uuid) -> Result<TestRecord, StoreError> {
        self.records.lock().await.get_test(id)
    }

    async fn append_result(&self, record: ResultRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        self.append_result_line(&record).await?;
        records.append_result(record);
        Ok(())
    }

    async fn list_results(&self, filter: &ResultFilter) -> Result<Vec<ResultRecord>, StoreError> {
        Ok(self.records.lock().await.list_results(filter))
    }
}

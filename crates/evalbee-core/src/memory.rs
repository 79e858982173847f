//! In-memory record store for tests and embedding.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::AnswerKey;
use crate::records::{Records, ResultFilter, ResultRecord, Student, TestRecord};
use crate::traits::RecordStore;

/// A record store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records.
    pub fn with_records(records: Records) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Number of saved results.
    pub fn result_count(&self) -> usize {
        self.lock().results.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Records> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn add_students(
        &self,
        names: &[String],
        batch: &str,
    ) -> Result<Vec<Student>, StoreError> {
        Ok(self.lock().add_students(names, batch))
    }

    async fn search_students(
        &self,
        query: &str,
        batch: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Student>, StoreError> {
        Ok(self.lock().search_students(query, batch, limit))
    }

    async fn get_student(&self, id: Uuid) -> Result<Student, StoreError> {
        self.lock().get_student(id)
    }

    async fn add_test(&self, name: &str, key: AnswerKey) -> Result<TestRecord, StoreError> {
        self.lock().add_test(name, key)
    }

    async fn list_tests(&self, limit: usize) -> Result<Vec<TestRecord>, StoreError> {
        Ok(self.lock().list_tests(limit))
    }

    async fn get_test(&self, id: Uuid) -> Result<TestRecord, StoreError> {
        self.lock().get_test(id)
    }

    async fn append_result(&self, record: ResultRecord) -> Result<(), StoreError> {
        self.lock().append_result(record);
        Ok(())
    }

    async fn list_results(&self, filter: &ResultFilter) -> Result<Vec<ResultRecord>, StoreError> {
        Ok(self.lock().list_results(filter))
    }
}

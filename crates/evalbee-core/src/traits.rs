//! Trait seams for evalbee's collaborators.
//!
//! The grading engine itself is a set of free functions; these traits describe
//! where its inputs come from and where its results go. They are implemented
//! by [`crate::memory::MemoryStore`], the `evalbee-store` crate, and
//! [`TomlAnswerSheet`].

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{AnswerKey, AnswerSet};
use crate::records::{ResultFilter, ResultRecord, Student, TestRecord};

// ---------------------------------------------------------------------------
// Record store trait
// ---------------------------------------------------------------------------

/// Storage for students, tests, and graded results.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Register students under a batch label. Blank names are skipped.
    async fn add_students(&self, names: &[String], batch: &str)
        -> Result<Vec<Student>, StoreError>;

    /// Case-insensitive partial-name search, at most `limit` matches.
    async fn search_students(
        &self,
        query: &str,
        batch: Option<&str>,
        limit: usize,
    ) -> Result<Vec<Student>, StoreError>;

    async fn get_student(&self, id: Uuid) -> Result<Student, StoreError>;

    /// Create a test with its answer key. The name must not be blank.
    async fn add_test(&self, name: &str, key: AnswerKey) -> Result<TestRecord, StoreError>;

    /// Tests newest first, at most `limit`.
    async fn list_tests(&self, limit: usize) -> Result<Vec<TestRecord>, StoreError>;

    async fn get_test(&self, id: Uuid) -> Result<TestRecord, StoreError>;

    /// Append a graded result. Results are never deduplicated.
    async fn append_result(&self, record: ResultRecord) -> Result<(), StoreError>;

    async fn list_results(&self, filter: &ResultFilter) -> Result<Vec<ResultRecord>, StoreError>;
}

// ---------------------------------------------------------------------------
// Answer source trait
// ---------------------------------------------------------------------------

/// Anything that can produce a candidate's answer set: a typed-in sheet file
/// today, an optical mark reader later.
pub trait AnswerSource {
    fn read_answers(&self) -> anyhow::Result<AnswerSet>;
}

/// Answers read from a TOML answer sheet on disk.
#[derive(Debug, Clone)]
pub struct TomlAnswerSheet {
    pub path: PathBuf,
}

impl TomlAnswerSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl AnswerSource for TomlAnswerSheet {
    fn read_answers(&self) -> anyhow::Result<AnswerSet> {
        crate::sheet::parse_answer_set(&self.path)
    }
}

//! Stored records: students, tests, and saved results.
//!
//! [`Records`] holds the three collections and implements the store
//! operations synchronously; store backends wrap it in a lock and add
//! persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::{AnswerKey, AnswerSet};
use crate::report::ScoreReport;

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    /// Cohort label (e.g. "JEE").
    pub batch: String,
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub fn new(name: &str, batch: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            batch: batch.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

/// A test and its answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub id: Uuid,
    pub name: String,
    pub key: AnswerKey,
    pub created_at: DateTime<Utc>,
}

impl TestRecord {
    /// Create a test record. The name is trimmed and must not be blank.
    pub fn new(name: &str, key: AnswerKey) -> Result<Self, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyTestName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            key,
            created_at: Utc::now(),
        })
    }
}

/// A graded attempt, keyed by (student, test).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub student_name: String,
    pub test_id: Uuid,
    pub test_name: String,
    pub answers: AnswerSet,
    pub report: ScoreReport,
    pub created_at: DateTime<Utc>,
}

impl ResultRecord {
    pub fn new(
        student: &Student,
        test: &TestRecord,
        answers: AnswerSet,
        report: ScoreReport,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: student.id,
            student_name: student.name.clone(),
            test_id: test.id,
            test_name: test.name.clone(),
            answers,
            report,
            created_at: Utc::now(),
        }
    }
}

/// Filter for listing saved results. `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct ResultFilter {
    pub student_id: Option<Uuid>,
    pub test_id: Option<Uuid>,
}

impl ResultFilter {
    pub fn matches(&self, record: &ResultRecord) -> bool {
        self.student_id.map_or(true, |id| id == record.student_id)
            && self.test_id.map_or(true, |id| id == record.test_id)
    }
}

/// The record collections behind a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Records {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub tests: Vec<TestRecord>,
    #[serde(default)]
    pub results: Vec<ResultRecord>,
}

impl Records {
    /// Register students, skipping blank names.
    pub fn add_students(&mut self, names: &[String], batch: &str) -> Vec<Student> {
        let added: Vec<Student> = names
            .iter()
            .filter(|n| !n.trim().is_empty())
            .map(|n| Student::new(n, batch))
            .collect();
        self.students.extend(added.iter().cloned());
        added
    }

    /// Case-insensitive substring search on student names.
    ///
    /// A blank query matches nothing. At most `limit` students are returned,
    /// in registration order.
    pub fn search_students(&self, query: &str, batch: Option<&str>, limit: usize) -> Vec<Student> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.students
            .iter()
            .filter(|s| batch.map_or(true, |b| s.batch == b))
            .filter(|s| s.name.to_lowercase().contains(&query))
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn get_student(&self, id: Uuid) -> Result<Student, StoreError> {
        self.students
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(StoreError::StudentNotFound(id))
    }

    pub fn add_test(&mut self, name: &str, key: AnswerKey) -> Result<TestRecord, StoreError> {
        let test = TestRecord::new(name, key)?;
        self.tests.push(test.clone());
        Ok(test)
    }

    /// Tests newest first; among equal timestamps the later insert wins.
    pub fn list_tests(&self, limit: usize) -> Vec<TestRecord> {
        let mut tests: Vec<TestRecord> = self.tests.iter().rev().cloned().collect();
        tests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tests.truncate(limit);
        tests
    }

    pub fn get_test(&self, id: Uuid) -> Result<TestRecord, StoreError> {
        self.tests
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(StoreError::TestNotFound(id))
    }

    pub fn append_result(&mut self, record: ResultRecord) {
        self.results.push(record);
    }

    pub fn list_results(&self, filter: &ResultFilter) -> Vec<ResultRecord> {
        self.results
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }
}

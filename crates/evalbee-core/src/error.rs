//! Error types shared across evalbee.
//!
//! Grading itself never fails; these errors belong to the record store and
//! to the operator workflow around grading.

use thiserror::Error;
use uuid::Uuid;

/// Text that could not be parsed as a decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a decimal number: {input:?}")]
pub struct ParseDecimalError {
    input: String,
}

impl ParseDecimalError {
    pub(crate) fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }
}

/// Errors raised by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No student has the given id.
    #[error("student not found: {0}")]
    StudentNotFound(Uuid),

    /// No test has the given id.
    #[error("test not found: {0}")]
    TestNotFound(Uuid),

    /// Tests must be created with a non-blank name.
    #[error("test name must not be empty")]
    EmptyTestName,

    /// Reading or writing the backing storage failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Operator workflow errors raised by a grading session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("please select a student")]
    NoStudent,

    #[error("please select a test")]
    NoTest,

    #[error("compute the result before saving (and select a student and a test)")]
    NotComputed,

    #[error(transparent)]
    Store(#[from] StoreError),
}

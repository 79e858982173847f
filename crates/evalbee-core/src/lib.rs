//! evalbee-core: answer-key grading engine, data model, and store traits.
//!
//! The grading functions in [`grading`] are pure and infallible: they turn an
//! [`model::AnswerKey`] and an [`model::AnswerSet`] into a
//! [`report::ScoreReport`] under the +4 / −1 marking scheme. Everything else
//! in this crate is the workflow around them: sheet files, roster import,
//! record storage, operator sessions, and batch grading.

pub mod engine;
pub mod error;
pub mod grading;
pub mod memory;
pub mod model;
pub mod numeric;
pub mod records;
pub mod report;
pub mod roster;
pub mod session;
pub mod sheet;
pub mod traits;

pub use grading::grade;

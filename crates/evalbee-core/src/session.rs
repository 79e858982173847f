//! The operator's checking workflow: pick a student and a test, enter
//! answers, compute, save.
//!
//! Selection and "compute before save" are enforced here so the grading
//! functions never see incomplete input.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::SessionError;
use crate::grading::grade;
use crate::model::{AnswerSet, Subject};
use crate::records::{ResultRecord, Student, TestRecord};
use crate::report::ScoreReport;
use crate::traits::RecordStore;

/// One in-progress checking session.
pub struct GradingSession {
    store: Arc<dyn RecordStore>,
    student: Option<Student>,
    test: Option<TestRecord>,
    answers: AnswerSet,
    report: Option<ScoreReport>,
}

impl GradingSession {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            student: None,
            test: None,
            answers: AnswerSet::default(),
            report: None,
        }
    }

    pub fn student(&self) -> Option<&Student> {
        self.student.as_ref()
    }

    pub fn test(&self) -> Option<&TestRecord> {
        self.test.as_ref()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    /// The last computed report, if the inputs have not changed since.
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    pub fn select_student(&mut self, student: Student) {
        self.student = Some(student);
        self.report = None;
    }

    pub async fn select_student_by_id(&mut self, id: Uuid) -> Result<&Student, SessionError> {
        let student = self.store.get_student(id).await?;
        self.report = None;
        Ok(&*self.student.insert(student))
    }

    pub fn select_test(&mut self, test: TestRecord) {
        self.test = Some(test);
        self.report = None;
    }

    pub async fn select_test_by_id(&mut self, id: Uuid) -> Result<&TestRecord, SessionError> {
        let test = self.store.get_test(id).await?;
        self.report = None;
        Ok(&*self.test.insert(test))
    }

    /// Replace all entered answers.
    pub fn set_answers(&mut self, answers: AnswerSet) {
        self.answers = answers;
        self.report = None;
    }

    pub fn set_mcq(&mut self, subject: Subject, index: usize, value: &str) -> bool {
        self.report = None;
        self.answers.set_mcq(subject, index, value)
    }

    pub fn set_numeric(&mut self, subject: Subject, index: usize, value: &str) -> bool {
        self.report = None;
        self.answers.set_numeric(subject, index, value)
    }

    /// Grade the entered answers against the selected test.
    pub fn compute(&mut self) -> Result<&ScoreReport, SessionError> {
        if self.student.is_none() {
            return Err(SessionError::NoStudent);
        }
        let test = self.test.as_ref().ok_or(SessionError::NoTest)?;

        let report = grade(&test.key, &self.answers);
        tracing::debug!(test = %test.name, total = report.total, "computed score report");
        Ok(&*self.report.insert(report))
    }

    /// Save the computed report for the selected student and test.
    pub async fn save(&self) -> Result<ResultRecord, SessionError> {
        let (Some(student), Some(test), Some(report)) = (&self.student, &self.test, &self.report)
        else {
            return Err(SessionError::NotComputed);
        };

        let record = ResultRecord::new(student, test, self.answers.clone(), report.clone());
        self.store.append_result(record.clone()).await?;
        tracing::info!(
            student = %student.name,
            test = %test.name,
            total = report.total,
            "result saved"
        );
        Ok(record)
    }
}

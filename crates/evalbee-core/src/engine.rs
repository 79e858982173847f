//! Batch grading orchestrator.
//!
//! Grades many candidates' answer sets against one test and appends each
//! result to the record store, with bounded concurrency on store writes.
//! Grading itself is pure; only the store is shared.

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use crate::grading::grade;
use crate::model::AnswerSet;
use crate::records::{ResultRecord, Student, TestRecord};
use crate::traits::RecordStore;

/// Configuration for the batch grader.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum submissions graded and saved at once. A store may still
    /// serialize its own writes.
    pub parallelism: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// One candidate's submission.
#[derive(Debug, Clone)]
pub struct Submission {
    pub student: Student,
    pub answers: AnswerSet,
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_graded(&self, record: &ResultRecord);
    fn on_error(&self, student: &str, error: &str);
    fn on_batch_complete(&self, total: usize, saved: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_graded(&self, _: &ResultRecord) {}
    fn on_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Outcome of a batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Saved results, in completion order.
    pub saved: Vec<ResultRecord>,
    /// Submissions whose result could not be stored.
    pub failed: usize,
    pub duration_ms: u64,
}

/// Grades submissions for one test and stores the results.
pub struct BatchGrader {
    store: Arc<dyn RecordStore>,
    config: BatchConfig,
}

impl BatchGrader {
    pub fn new(store: Arc<dyn RecordStore>, config: BatchConfig) -> Self {
        Self { store, config }
    }

    /// Grade and store every submission.
    ///
    /// A failed store write is reported and counted; it never aborts the
    /// rest of the batch.
    pub async fn run(
        &self,
        test: &TestRecord,
        submissions: Vec<Submission>,
        progress: &dyn ProgressReporter,
    ) -> BatchSummary {
        let start = Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let total = submissions.len();

        let mut futures = FuturesUnordered::new();

        for submission in submissions {
            let store = Arc::clone(&self.store);
            let semaphore = Arc::clone(&semaphore);
            let test = test.clone();

            futures.push(async move {
                let student_name = submission.student.name.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                    let report = grade(&test.key, &submission.answers);
                    let record =
                        ResultRecord::new(&submission.student, &test, submission.answers, report);
                    store.append_result(record.clone()).await?;
                    anyhow::Ok(record)
                };
                (student_name, inner.await)
            });
        }

        let mut saved = Vec::with_capacity(total);
        let mut failed = 0usize;

        while let Some((student_name, result)) = futures.next().await {
            match result {
                Ok(record) => {
                    progress.on_graded(&record);
                    saved.push(record);
                }
                Err(e) => {
                    tracing::error!("saving result failed for {student_name}: {e:#}");
                    progress.on_error(&student_name, &e.to_string());
                    failed += 1;
                }
            }
        }

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, saved.len(), failed, elapsed);
        tracing::info!(test = %test.name, total, saved = saved.len(), failed, "batch graded");

        BatchSummary {
            saved,
            failed,
            duration_ms: elapsed.as_millis() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::error::StoreError;
    use crate::memory::MemoryStore;
    use crate::model::{AnswerKey, Sheet, Subject, SubjectSheet};
    use crate::records::ResultFilter;

    fn key() -> AnswerKey {
        let mut sheet = Sheet::default();
        *sheet.subject_mut(Subject::Physics) = SubjectSheet::from_entries(&["A"], &["3"]);
        AnswerKey::new(sheet)
    }

    fn answers(choice: &str) -> AnswerSet {
        let mut answers = AnswerSet::default();
        answers.set_mcq(Subject::Physics, 0, choice);
        answers
    }

    #[derive(Default)]
    struct CountingReporter {
        graded: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ProgressReporter for CountingReporter {
        fn on_graded(&self, _: &ResultRecord) {
            self.graded.fetch_add(1, Ordering::Relaxed);
        }
        fn on_error(&self, _: &str, _: &str) {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
    }

    /// Rejects results for one student.
    struct FlakyStore {
        inner: MemoryStore,
        reject: Uuid,
    }

    #[async_trait]
    impl RecordStore for FlakyStore {
        async fn add_students(
            &self,
            names: &[String],
            batch: &str,
        ) -> Result<Vec<Student>, StoreError> {
            self.inner.add_students(names, batch).await
        }
        async fn search_students(
            &self,
            query: &str,
            batch: Option<&str>,
            limit: usize,
        ) -> Result<Vec<Student>, StoreError> {
            self.inner.search_students(query, batch, limit).await
        }
        async fn get_student(&self, id: Uuid) -> Result<Student, StoreError> {
            self.inner.get_student(id).await
        }
        async fn add_test(&self, name: &str, key: AnswerKey) -> Result<TestRecord, StoreError> {
            self.inner.add_test(name, key).await
        }
        async fn list_tests(&self, limit: usize) -> Result<Vec<TestRecord>, StoreError> {
            self.inner.list_tests(limit).await
        }
        async fn get_test(&self, id: Uuid) -> Result<TestRecord, StoreError> {
            self.inner.get_test(id).await
        }
        async fn append_result(&self, record: ResultRecord) -> Result<(), StoreError> {
            if record.student_id == self.reject {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.append_result(record).await
        }
        async fn list_results(
            &self,
            filter: &ResultFilter,
        ) -> Result<Vec<ResultRecord>, StoreError> {
            self.inner.list_results(filter).await
        }
    }

    #[tokio::test]
    async fn grades_and_saves_every_submission() {
        let store = Arc::new(MemoryStore::new());
        let test = store.add_test("Mock", key()).await.unwrap();
        let students = store
            .add_students(&["A".into(), "B".into(), "C".into()], "JEE")
            .await
            .unwrap();
        let submissions: Vec<Submission> = students
            .into_iter()
            .zip(["A", "B", ""])
            .map(|(student, choice)| Submission {
                student,
                answers: answers(choice),
            })
            .collect();

        let grader = BatchGrader::new(store.clone(), BatchConfig { parallelism: 2 });
        let reporter = CountingReporter::default();
        let summary = grader.run(&test, submissions, &reporter).await;

        assert_eq!(summary.saved.len(), 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(reporter.graded.load(Ordering::Relaxed), 3);
        assert_eq!(store.result_count(), 3);

        let mut totals: Vec<i32> = summary.saved.iter().map(|r| r.report.total).collect();
        totals.sort();
        assert_eq!(totals, vec![-1, 0, 4]);
    }

    #[tokio::test]
    async fn store_failure_does_not_abort_batch() {
        let inner = MemoryStore::new();
        let students = inner
            .add_students(&["Ok".into(), "Rejected".into()], "JEE")
            .await
            .unwrap();
        let test = inner.add_test("Mock", key()).await.unwrap();
        let store = Arc::new(FlakyStore {
            inner,
            reject: students[1].id,
        });

        let submissions = students
            .into_iter()
            .map(|student| Submission {
                student,
                answers: answers("A"),
            })
            .collect();

        let reporter = CountingReporter::default();
        let summary = BatchGrader::new(store, BatchConfig::default())
            .run(&test, submissions, &reporter)
            .await;

        assert_eq!(summary.saved.len(), 1);
        assert_eq!(summary.saved[0].student_name, "Ok");
        assert_eq!(summary.failed, 1);
        assert_eq!(reporter.errors.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn empty_batch() {
        let store = Arc::new(MemoryStore::new());
        let test = store.add_test("Mock", key()).await.unwrap();
        let summary = BatchGrader::new(store, BatchConfig { parallelism: 0 })
            .run(&test, Vec::new(), &NoopReporter)
            .await;
        assert!(summary.saved.is_empty());
        assert_eq!(summary.failed, 0);
    }
}

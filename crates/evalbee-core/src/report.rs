//! Score report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grading::BlockScore;
use crate::model::{Subject, MARKS_CORRECT, QUESTIONS_PER_SUBJECT};

/// Marks and counts for one subject, combining its MCQ and numeric blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub subject: Subject,
    /// MCQ marks plus numeric marks.
    pub marks: i32,
    pub correct: u32,
    pub wrong: u32,
    pub unattempted: u32,
    /// MCQ misses (1–20) followed by numeric misses (21–25).
    pub wrong_questions: Vec<u32>,
    pub mcq: BlockScore,
    pub numeric: BlockScore,
}

impl SubjectScore {
    /// Combine a subject's two block results.
    pub fn from_blocks(subject: Subject, mcq: BlockScore, numeric: BlockScore) -> Self {
        let wrong_questions = mcq
            .wrong_questions
            .iter()
            .chain(&numeric.wrong_questions)
            .copied()
            .collect();
        Self {
            subject,
            marks: mcq.marks + numeric.marks,
            correct: mcq.correct + numeric.correct,
            wrong: mcq.wrong + numeric.wrong,
            unattempted: mcq.unattempted + numeric.unattempted,
            wrong_questions,
            mcq,
            numeric,
        }
    }
}

/// The result of grading one answer set against one answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub physics: SubjectScore,
    pub chemistry: SubjectScore,
    pub mathematics: SubjectScore,
    /// Sum of the three subject marks. May be negative.
    pub total: i32,
}

impl ScoreReport {
    pub fn from_subjects(
        physics: SubjectScore,
        chemistry: SubjectScore,
        mathematics: SubjectScore,
    ) -> Self {
        let total = physics.marks + chemistry.marks + mathematics.marks;
        Self {
            physics,
            chemistry,
            mathematics,
            total,
        }
    }

    pub fn subject(&self, subject: Subject) -> &SubjectScore {
        match subject {
            Subject::Physics => &self.physics,
            Subject::Chemistry => &self.chemistry,
            Subject::Mathematics => &self.mathematics,
        }
    }

    /// Subject scores in presentation order.
    pub fn subjects(&self) -> impl Iterator<Item = &SubjectScore> {
        Subject::ALL.into_iter().map(move |s| self.subject(s))
    }

    /// Highest attainable total (every question correct).
    pub fn max_marks() -> i32 {
        (Subject::ALL.len() * QUESTIONS_PER_SUBJECT) as i32 * MARKS_CORRECT
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ScoreReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}

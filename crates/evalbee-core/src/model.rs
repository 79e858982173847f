//! Core data model types for evalbee.
//!
//! An answer key and a candidate's answer set share the same shape: for each
//! of the three subjects, a block of 20 multiple-choice entries followed by a
//! block of 5 numeric entries. Blocks are fixed-size arrays so that a missing
//! entry is always an empty string, never an out-of-bounds read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of multiple-choice questions per subject (questions 1–20).
pub const MCQ_QUESTIONS: usize = 20;
/// Number of numeric-answer questions per subject (questions 21–25).
pub const NUMERIC_QUESTIONS: usize = 5;
/// Questions per subject across both blocks.
pub const QUESTIONS_PER_SUBJECT: usize = MCQ_QUESTIONS + NUMERIC_QUESTIONS;

/// Marks awarded for a correct answer.
pub const MARKS_CORRECT: i32 = 4;
/// Marks deducted for a wrong answer.
pub const MARKS_WRONG: i32 = 1;

/// An exam subject.
///
/// The declaration order (Physics, Chemistry, Mathematics) is the order used
/// when presenting subjects and when numbering questions across a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Physics,
    Chemistry,
    #[serde(alias = "maths")]
    Mathematics,
}

impl Subject {
    /// All subjects in presentation order.
    pub const ALL: [Subject; 3] = [Subject::Physics, Subject::Chemistry, Subject::Mathematics];
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Physics => write!(f, "physics"),
            Subject::Chemistry => write!(f, "chemistry"),
            Subject::Mathematics => write!(f, "mathematics"),
        }
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "physics" | "phy" => Ok(Subject::Physics),
            "chemistry" | "chem" => Ok(Subject::Chemistry),
            "mathematics" | "maths" | "math" => Ok(Subject::Mathematics),
            other => Err(format!("unknown subject: {other}")),
        }
    }
}

/// The two question blocks of a subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Mcq,
    Numeric,
}

impl BlockKind {
    /// Number of questions in this block.
    pub fn len(self) -> usize {
        match self {
            BlockKind::Mcq => MCQ_QUESTIONS,
            BlockKind::Numeric => NUMERIC_QUESTIONS,
        }
    }

    /// The 1-indexed question number of the block's first question.
    pub fn first_question(self) -> u32 {
        match self {
            BlockKind::Mcq => 1,
            BlockKind::Numeric => MCQ_QUESTIONS as u32 + 1,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockKind::Mcq => write!(f, "mcq"),
            BlockKind::Numeric => write!(f, "numeric"),
        }
    }
}

/// Copy up to `N` entries into a fixed-size block, padding with empty strings.
///
/// Entries beyond `N` are dropped.
pub fn fixed_block<const N: usize, S: AsRef<str>>(entries: &[S]) -> [String; N] {
    std::array::from_fn(|i| {
        entries
            .get(i)
            .map(|s| s.as_ref().to_string())
            .unwrap_or_default()
    })
}

/// One subject's entries: 20 MCQ choices and 5 numeric answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSheet {
    pub mcq: [String; MCQ_QUESTIONS],
    pub numeric: [String; NUMERIC_QUESTIONS],
}

impl SubjectSheet {
    /// Build a subject sheet from loosely-sized sequences.
    pub fn from_entries<M: AsRef<str>, N: AsRef<str>>(mcq: &[M], numeric: &[N]) -> Self {
        Self {
            mcq: fixed_block(mcq),
            numeric: fixed_block(numeric),
        }
    }

    /// Entries of the given block.
    pub fn block(&self, kind: BlockKind) -> &[String] {
        match kind {
            BlockKind::Mcq => &self.mcq,
            BlockKind::Numeric => &self.numeric,
        }
    }

    fn block_mut(&mut self, kind: BlockKind) -> &mut [String] {
        match kind {
            BlockKind::Mcq => &mut self.mcq,
            BlockKind::Numeric => &mut self.numeric,
        }
    }
}

/// Entries for all three subjects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sheet {
    pub physics: SubjectSheet,
    pub chemistry: SubjectSheet,
    #[serde(alias = "maths")]
    pub mathematics: SubjectSheet,
}

impl Sheet {
    pub fn subject(&self, subject: Subject) -> &SubjectSheet {
        match subject {
            Subject::Physics => &self.physics,
            Subject::Chemistry => &self.chemistry,
            Subject::Mathematics => &self.mathematics,
        }
    }

    pub fn subject_mut(&mut self, subject: Subject) -> &mut SubjectSheet {
        match subject {
            Subject::Physics => &mut self.physics,
            Subject::Chemistry => &mut self.chemistry,
            Subject::Mathematics => &mut self.mathematics,
        }
    }

    /// Set one entry. Returns `false` if `index` is outside the block.
    pub fn set(&mut self, subject: Subject, kind: BlockKind, index: usize, value: &str) -> bool {
        match self.subject_mut(subject).block_mut(kind).get_mut(index) {
            Some(slot) => {
                *slot = value.to_string();
                true
            }
            None => false,
        }
    }
}

/// The authoritative expected answers for one test.
///
/// Immutable once built: there are no mutating accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey {
    sheet: Sheet,
}

impl AnswerKey {
    pub fn new(sheet: Sheet) -> Self {
        Self { sheet }
    }

    pub fn subject(&self, subject: Subject) -> &SubjectSheet {
        self.sheet.subject(subject)
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }
}

/// One candidate's recorded responses for one test attempt.
///
/// Empty entries mean "unattempted".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    sheet: Sheet,
}

impl AnswerSet {
    pub fn new(sheet: Sheet) -> Self {
        Self { sheet }
    }

    pub fn subject(&self, subject: Subject) -> &SubjectSheet {
        self.sheet.subject(subject)
    }

    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Record a multiple-choice response (`index` is 0-based).
    pub fn set_mcq(&mut self, subject: Subject, index: usize, value: &str) -> bool {
        self.sheet.set(subject, BlockKind::Mcq, index, value)
    }

    /// Record a numeric response (`index` is 0-based within the numeric block).
    pub fn set_numeric(&mut self, subject: Subject, index: usize, value: &str) -> bool {
        self.sheet.set(subject, BlockKind::Numeric, index, value)
    }
}

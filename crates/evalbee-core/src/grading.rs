//! The answer-key grading engine.
//!
//! Every function here is pure: it reads its inputs, allocates a fresh
//! result, and never fails. Missing positions in either the key or the
//! response block are treated as empty.

use serde::{Deserialize, Serialize};

use crate::model::{
    AnswerKey, AnswerSet, BlockKind, Subject, SubjectSheet, MARKS_CORRECT, MARKS_WRONG,
};
use crate::numeric::{normalize, NumericValue};
use crate::report::{ScoreReport, SubjectScore};

/// How a single question was graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Correct,
    Wrong,
    Unattempted,
}

/// The outcome of one numbered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    /// 1-indexed question number within the subject.
    pub number: u32,
    pub outcome: Outcome,
}

/// Result of grading one block (MCQ or numeric) of one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockScore {
    pub kind: BlockKind,
    pub correct: u32,
    pub wrong: u32,
    pub unattempted: u32,
    /// `correct * 4 - wrong`.
    pub marks: i32,
    /// Question numbers graded wrong, ascending.
    pub wrong_questions: Vec<u32>,
    /// Per-question outcomes in question order.
    #[serde(default)]
    pub outcomes: Vec<QuestionOutcome>,
}

impl BlockScore {
    fn empty(kind: BlockKind) -> Self {
        Self {
            kind,
            correct: 0,
            wrong: 0,
            unattempted: 0,
            marks: 0,
            wrong_questions: Vec::new(),
            outcomes: Vec::with_capacity(kind.len()),
        }
    }

    fn record(&mut self, number: u32, outcome: Outcome) {
        match outcome {
            Outcome::Correct => {
                self.correct += 1;
                self.marks += MARKS_CORRECT;
            }
            Outcome::Wrong => {
                self.wrong += 1;
                self.marks -= MARKS_WRONG;
                self.wrong_questions.push(number);
            }
            Outcome::Unattempted => self.unattempted += 1,
        }
        self.outcomes.push(QuestionOutcome { number, outcome });
    }

    /// Number of questions graded in this block.
    pub fn total(&self) -> u32 {
        self.correct + self.wrong + self.unattempted
    }
}

fn entry<S: AsRef<str>>(entries: &[S], index: usize) -> &str {
    entries.get(index).map(|s| s.as_ref()).unwrap_or("")
}

/// Grade one multiple-choice question.
///
/// Comparison ignores case and surrounding whitespace. An empty key entry
/// matches nothing, so any attempt against it is wrong.
pub fn grade_mcq_question(key: &str, answer: &str) -> Outcome {
    let answer = answer.trim().to_uppercase();
    if answer.is_empty() {
        return Outcome::Unattempted;
    }
    if answer == key.trim().to_uppercase() {
        Outcome::Correct
    } else {
        Outcome::Wrong
    }
}

/// Grade one numeric question by value.
///
/// Unparseable text on either side is wrong, never an error.
pub fn grade_numeric_question(key: &str, answer: &str) -> Outcome {
    let answer = normalize(answer);
    if answer.is_blank() {
        return Outcome::Unattempted;
    }
    match (answer, normalize(key)) {
        (NumericValue::Numeric(a), NumericValue::Numeric(k)) if a == k => Outcome::Correct,
        _ => Outcome::Wrong,
    }
}

/// Grade a subject's 20-question multiple-choice block.
pub fn grade_mcq_block<K: AsRef<str>, A: AsRef<str>>(key: &[K], answers: &[A]) -> BlockScore {
    grade_block(BlockKind::Mcq, key, answers, grade_mcq_question)
}

/// Grade a subject's 5-question numeric block (questions 21–25).
pub fn grade_numeric_block<K: AsRef<str>, A: AsRef<str>>(key: &[K], answers: &[A]) -> BlockScore {
    grade_block(BlockKind::Numeric, key, answers, grade_numeric_question)
}

fn grade_block<K, A>(
    kind: BlockKind,
    key: &[K],
    answers: &[A],
    grade_question: fn(&str, &str) -> Outcome,
) -> BlockScore
where
    K: AsRef<str>,
    A: AsRef<str>,
{
    let mut score = BlockScore::empty(kind);
    let first = kind.first_question();
    for index in 0..kind.len() {
        let outcome = grade_question(entry(key, index), entry(answers, index));
        score.record(first + index as u32, outcome);
    }
    score
}

/// Grade both blocks of one subject.
pub fn grade_subject(subject: Subject, key: &SubjectSheet, answers: &SubjectSheet) -> SubjectScore {
    let mcq = grade_mcq_block(&key.mcq, &answers.mcq);
    let numeric = grade_numeric_block(&key.numeric, &answers.numeric);
    SubjectScore::from_blocks(subject, mcq, numeric)
}

/// Grade a candidate's answer set against a test's answer key.
pub fn grade(key: &AnswerKey, answers: &AnswerSet) -> ScoreReport {
    let [physics, chemistry, mathematics] = Subject::ALL
        .map(|subject| grade_subject(subject, key.subject(subject), answers.subject(subject)));
    ScoreReport::from_subjects(physics, chemistry, mathematics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Sheet;

    const LETTERS: [&str; 4] = ["A", "B", "C", "D"];

    fn mcq_key() -> Vec<String> {
        (0..20).map(|i| LETTERS[i % 4].to_string()).collect()
    }

    fn sheet_with(subject: Subject, mcq: &[String], numeric: &[&str]) -> Sheet {
        let mut sheet = Sheet::default();
        *sheet.subject_mut(subject) = SubjectSheet::from_entries(mcq, numeric);
        sheet
    }

    #[test]
    fn mcq_scenario_one_wrong_one_blank() {
        let key = mcq_key();
        let mut answers = key.clone();
        answers[5] = "A".into(); // key is "B"
        answers[10] = String::new();

        let score = grade_mcq_block(&key, &answers);
        assert_eq!(score.correct, 18);
        assert_eq!(score.wrong, 1);
        assert_eq!(score.unattempted, 1);
        assert_eq!(score.marks, 71);
        assert_eq!(score.wrong_questions, vec![6]);
    }

    #[test]
    fn numeric_scenario_mixed_outcomes() {
        let key = ["3", "-1.5", "0", "7.25", "10"];
        let answers = ["3.0", "-1.5", "", "7.25", "abc"];

        let score = grade_numeric_block(&key, &answers);
        assert_eq!(score.correct, 3);
        assert_eq!(score.wrong, 1);
        assert_eq!(score.unattempted, 1);
        assert_eq!(score.marks, 11);
        assert_eq!(score.wrong_questions, vec![25]);
        assert_eq!(
            score.outcomes[2],
            QuestionOutcome {
                number: 23,
                outcome: Outcome::Unattempted
            }
        );
    }

    #[test]
    fn mcq_is_case_and_whitespace_insensitive() {
        assert_eq!(grade_mcq_question("A", "a"), Outcome::Correct);
        assert_eq!(grade_mcq_question(" c ", "C "), Outcome::Correct);
        assert_eq!(grade_mcq_question("A", "b"), Outcome::Wrong);
    }

    #[test]
    fn empty_key_entry_scores_any_attempt_wrong() {
        assert_eq!(grade_mcq_question("", "A"), Outcome::Wrong);
        assert_eq!(grade_mcq_question("", ""), Outcome::Unattempted);
        assert_eq!(grade_numeric_question("", "3"), Outcome::Wrong);
    }

    #[test]
    fn numeric_equivalence_is_symmetric() {
        assert_eq!(grade_numeric_question("3.0", "3"), Outcome::Correct);
        assert_eq!(grade_numeric_question("3", "3.0"), Outcome::Correct);
        assert_eq!(grade_numeric_question("03", "3"), Outcome::Correct);
        assert_eq!(grade_numeric_question("0", "-0"), Outcome::Correct);
        assert_eq!(grade_numeric_question("3", "-3"), Outcome::Wrong);
    }

    #[test]
    fn invalid_text_on_either_side_is_wrong() {
        assert_eq!(grade_numeric_question("abc", "abc"), Outcome::Wrong);
        assert_eq!(grade_numeric_question("x", "3"), Outcome::Wrong);
        assert_eq!(grade_numeric_question("3", "three"), Outcome::Wrong);
    }

    #[test]
    fn blank_answers_are_never_flagged() {
        for blank in ["", " ", "\t\n"] {
            assert_eq!(grade_numeric_question("abc", blank), Outcome::Unattempted);
            assert_eq!(grade_mcq_question("A", blank), Outcome::Unattempted);
        }
        let score = grade_numeric_block(&["x"; 5], &["  "; 5]);
        assert_eq!(score.unattempted, 5);
        assert!(score.wrong_questions.is_empty());
    }

    #[test]
    fn short_sequences_are_padded_with_blanks() {
        let key = mcq_key();
        let score = grade_mcq_block(&key, &["A", "B"]);
        assert_eq!(score.correct, 2);
        assert_eq!(score.unattempted, 18);
        assert_eq!(score.total(), 20);

        let empty: [&str; 0] = [];
        let score = grade_numeric_block(&empty, &["1", "2"]);
        assert_eq!(score.wrong, 2);
        assert_eq!(score.wrong_questions, vec![21, 22]);
        assert_eq!(score.total(), 5);
    }

    #[test]
    fn block_counts_and_marks_are_consistent() {
        let key = mcq_key();
        let answers: Vec<String> = (0..20)
            .map(|i| match i % 3 {
                0 => String::new(),
                1 => LETTERS[i % 4].to_lowercase(),
                _ => "D".into(),
            })
            .collect();
        let score = grade_mcq_block(&key, &answers);
        assert_eq!(score.total(), 20);
        assert_eq!(
            score.marks,
            score.correct as i32 * MARKS_CORRECT - score.wrong as i32 * MARKS_WRONG
        );
        assert_eq!(score.wrong_questions.len(), score.wrong as usize);
        assert_eq!(score.outcomes.len(), 20);
    }

    #[test]
    fn physics_numeric_miss_at_index_two_is_question_23() {
        let key = AnswerKey::new(sheet_with(
            Subject::Physics,
            &mcq_key(),
            &["1", "2", "3", "4", "5"],
        ));
        let mut answers = AnswerSet::default();
        answers.set_numeric(Subject::Physics, 2, "4");

        let report = grade(&key, &answers);
        assert_eq!(report.physics.wrong_questions, vec![23]);
        assert_eq!(report.physics.marks, -1);
    }

    #[test]
    fn subject_wrong_list_puts_mcq_before_numeric() {
        let key = AnswerKey::new(sheet_with(
            Subject::Chemistry,
            &mcq_key(),
            &["1", "2", "3", "4", "5"],
        ));
        let mut answers = AnswerSet::default();
        answers.set_numeric(Subject::Chemistry, 0, "9");
        answers.set_mcq(Subject::Chemistry, 19, "A"); // key is "D"
        answers.set_mcq(Subject::Chemistry, 0, "A");

        let report = grade(&key, &answers);
        let chem = &report.chemistry;
        assert_eq!(chem.wrong_questions, vec![20, 21]);
        assert_eq!(chem.marks, chem.mcq.marks + chem.numeric.marks);
        assert_eq!(chem.marks, 4 - 1 - 1);
        assert_eq!(report.total, 2);
    }

    #[test]
    fn full_marks_and_negative_totals() {
        let mut sheet = Sheet::default();
        for subject in Subject::ALL {
            *sheet.subject_mut(subject) =
                SubjectSheet::from_entries(&mcq_key(), &["1", "2", "3", "4", "5"]);
        }
        let key = AnswerKey::new(sheet.clone());

        let perfect = grade(&key, &AnswerSet::new(sheet));
        assert_eq!(perfect.total, 300);
        assert_eq!(perfect.total, ScoreReport::max_marks());

        let mut all_wrong = Sheet::default();
        for subject in Subject::ALL {
            *all_wrong.subject_mut(subject) = SubjectSheet::from_entries(&["Z"; 20], &["?"; 5]);
        }
        let worst = grade(&key, &AnswerSet::new(all_wrong));
        assert_eq!(worst.total, -75);
        assert_eq!(worst.mathematics.wrong_questions, (1..=25).collect::<Vec<_>>());
    }

    #[test]
    fn grading_is_idempotent() {
        let key = AnswerKey::new(sheet_with(
            Subject::Mathematics,
            &mcq_key(),
            &["3", "-1.5", "0", "7.25", "10"],
        ));
        let answers = AnswerSet::new(sheet_with(
            Subject::Mathematics,
            &mcq_key()[..12],
            &["3.0", "-1.5", "", "7.25", "abc"],
        ));
        assert_eq!(grade(&key, &answers), grade(&key, &answers));
    }
}

//! TOML answer-sheet parser.
//!
//! Answer keys, answer sets and test definitions share one file format:
//!
//! ```toml
//! [test]              # only for test definitions
//! name = "Mock Test 1"
//!
//! [mcq]
//! physics = ["A", "B", "C"]
//! maths = ["D"]
//!
//! [numeric]
//! physics = ["3", "-1.5"]
//! ```
//!
//! Missing subjects and entries are empty. Entries past the block length are
//! dropped and reported by [`validate_sheet`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{AnswerKey, AnswerSet, BlockKind, Sheet, Subject, SubjectSheet};
use crate::numeric::{normalize, NumericValue};

#[derive(Debug, Deserialize)]
struct TomlSheetFile {
    #[serde(default)]
    test: Option<TomlTestHeader>,
    #[serde(default)]
    mcq: TomlBlocks,
    #[serde(default)]
    numeric: TomlBlocks,
}

#[derive(Debug, Deserialize)]
struct TomlTestHeader {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct TomlBlocks {
    #[serde(default)]
    physics: Vec<String>,
    #[serde(default)]
    chemistry: Vec<String>,
    #[serde(default, alias = "maths")]
    mathematics: Vec<String>,
}

impl TomlBlocks {
    fn subject(&self, subject: Subject) -> &[String] {
        match subject {
            Subject::Physics => &self.physics,
            Subject::Chemistry => &self.chemistry,
            Subject::Mathematics => &self.mathematics,
        }
    }
}

/// A block that listed more entries than it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overflow {
    pub subject: Subject,
    pub kind: BlockKind,
    /// Number of entries present in the file.
    pub found: usize,
}

/// A parsed sheet file.
#[derive(Debug, Clone)]
pub struct SheetFile {
    /// `[test] name`, trimmed, if the file has a test header.
    pub name: Option<String>,
    pub sheet: Sheet,
    pub overflow: Vec<Overflow>,
}

impl SheetFile {
    pub fn into_answer_key(self) -> AnswerKey {
        AnswerKey::new(self.sheet)
    }

    pub fn into_answer_set(self) -> AnswerSet {
        AnswerSet::new(self.sheet)
    }
}

/// A named test together with its answer key.
#[derive(Debug, Clone)]
pub struct TestDefinition {
    pub name: String,
    pub key: AnswerKey,
}

/// Parse a sheet file from disk.
pub fn parse_sheet(path: &Path) -> Result<SheetFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sheet file: {}", path.display()))?;

    parse_sheet_str(&content, path)
}

/// Parse a TOML string into a `SheetFile` (useful for testing).
pub fn parse_sheet_str(content: &str, source_path: &Path) -> Result<SheetFile> {
    let parsed: TomlSheetFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut sheet = Sheet::default();
    let mut overflow = Vec::new();
    for subject in Subject::ALL {
        let mcq = parsed.mcq.subject(subject);
        let numeric = parsed.numeric.subject(subject);
        for (kind, entries) in [(BlockKind::Mcq, mcq), (BlockKind::Numeric, numeric)] {
            if entries.len() > kind.len() {
                overflow.push(Overflow {
                    subject,
                    kind,
                    found: entries.len(),
                });
            }
        }
        *sheet.subject_mut(subject) = SubjectSheet::from_entries(mcq, numeric);
    }

    Ok(SheetFile {
        name: parsed.test.map(|t| t.name.trim().to_string()),
        sheet,
        overflow,
    })
}

/// Load an answer key (a test definition's `[test]` header is ignored).
pub fn parse_answer_key(path: &Path) -> Result<AnswerKey> {
    Ok(parse_sheet(path)?.into_answer_key())
}

/// Load a candidate's answer set.
pub fn parse_answer_set(path: &Path) -> Result<AnswerSet> {
    Ok(parse_sheet(path)?.into_answer_set())
}

/// Load a test definition. The `[test] name` must be present and non-blank.
pub fn parse_test_definition(path: &Path) -> Result<TestDefinition> {
    let file = parse_sheet(path)?;
    let name = file
        .name
        .clone()
        .filter(|n| !n.is_empty())
        .with_context(|| format!("{}: please enter a test name ([test] name)", path.display()))?;
    Ok(TestDefinition {
        name,
        key: file.into_answer_key(),
    })
}

/// Recursively load all `.toml` sheet files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_sheet_directory(dir: &Path) -> Result<Vec<(PathBuf, SheetFile)>> {
    let mut sheets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            sheets.extend(load_sheet_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_sheet(&path) {
                Ok(sheet) => sheets.push((path, sheet)),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sheets)
}

/// A warning from answer-key validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub subject: Option<Subject>,
    /// Question number (1–25), if the warning concerns one question.
    pub question: Option<u32>,
    pub message: String,
}

/// Check an answer key for entries that will grade surprisingly.
///
/// None of these stop grading: an empty or malformed key entry simply makes
/// every attempt at that question wrong.
pub fn validate_answer_key(key: &AnswerKey) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for subject in Subject::ALL {
        let sheet = key.subject(subject);

        for (i, choice) in sheet.mcq.iter().enumerate() {
            let number = BlockKind::Mcq.first_question() + i as u32;
            let choice = choice.trim().to_uppercase();
            let message = if choice.is_empty() {
                "no answer recorded; any attempt will be marked wrong".to_string()
            } else if !matches!(choice.as_str(), "A" | "B" | "C" | "D") {
                format!("choice {choice:?} is not one of A, B, C, D")
            } else {
                continue;
            };
            warnings.push(ValidationWarning {
                subject: Some(subject),
                question: Some(number),
                message,
            });
        }

        for (i, value) in sheet.numeric.iter().enumerate() {
            let number = BlockKind::Numeric.first_question() + i as u32;
            let message = match normalize(value) {
                NumericValue::Blank => {
                    "no answer recorded; any attempt will be marked wrong".to_string()
                }
                NumericValue::Invalid => {
                    format!("{:?} is not a number; any attempt will be marked wrong", value.trim())
                }
                NumericValue::Numeric(_) => continue,
            };
            warnings.push(ValidationWarning {
                subject: Some(subject),
                question: Some(number),
                message,
            });
        }
    }

    warnings
}

/// Validate a parsed key file: oversized blocks plus [`validate_answer_key`].
pub fn validate_sheet(file: &SheetFile) -> Vec<ValidationWarning> {
    let mut warnings: Vec<ValidationWarning> = file
        .overflow
        .iter()
        .map(|o| ValidationWarning {
            subject: Some(o.subject),
            question: None,
            message: format!(
                "{} block lists {} entries, only the first {} are used",
                o.kind,
                o.found,
                o.kind.len()
            ),
        })
        .collect();

    warnings.extend(validate_answer_key(&AnswerKey::new(file.sheet.clone())));
    warnings
}

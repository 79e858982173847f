//! The `evalbee check` command: one student, one test, one answer sheet.

use std::path::PathBuf;

use anyhow::Result;

use evalbee_core::session::GradingSession;
use evalbee_core::traits::{AnswerSource, TomlAnswerSheet};

use super::{open_store, resolve_student, resolve_test, summary_table};

pub async fn execute(
    student: String,
    test: String,
    answers: PathBuf,
    save: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, store) = open_store(config_path.as_deref()).await?;

    let student = resolve_student(store.as_ref(), &student, config.search_limit).await?;
    let test = resolve_test(store.as_ref(), &test).await?;
    let answers = TomlAnswerSheet::new(answers).read_answers()?;

    let title = format!("{} / {}", student.name, test.name);

    let mut session = GradingSession::new(store);
    session.select_student(student);
    session.select_test(test);
    session.set_answers(answers);

    let report = session.compute()?;
    println!("{title}\n{}", summary_table(report));

    if save {
        let record = session.save().await?;
        println!("Saved result {}", record.id);
    }

    Ok(())
}

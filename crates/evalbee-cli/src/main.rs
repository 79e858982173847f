//! evalbee CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use uuid::Uuid;

mod commands;

#[derive(Parser)]
#[command(name = "evalbee", version, about = "Exam answer-key grading")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example answer key
    Init,

    /// Manage the student roster
    Students {
        #[command(subcommand)]
        action: StudentsCommand,
    },

    /// Manage tests and their answer keys
    Tests {
        #[command(subcommand)]
        action: TestsCommand,
    },

    /// Grade an answer sheet against a key file, without touching the store
    Grade {
        /// Answer key or test definition (.toml)
        #[arg(long)]
        key: PathBuf,

        /// Candidate answer sheet (.toml)
        #[arg(long)]
        answers: PathBuf,

        /// Output format: text, json, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write the rendered report to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Grade one student's answers for a stored test
    Check {
        /// Student id, or a name matching exactly one student
        #[arg(long)]
        student: String,

        /// Test id or exact test name
        #[arg(long)]
        test: String,

        /// Candidate answer sheet (.toml)
        #[arg(long)]
        answers: PathBuf,

        /// Save the result to the store
        #[arg(long)]
        save: bool,
    },

    /// Grade a directory of `<student-id>.toml` answer sheets and save the results
    Batch {
        /// Test id or exact test name
        #[arg(long)]
        test: String,

        /// Directory of answer sheets
        #[arg(long)]
        dir: PathBuf,

        /// Max submissions graded at once (default: from config)
        #[arg(long)]
        parallelism: Option<usize>,
    },

    /// List saved results
    Results {
        /// Only results for this student id
        #[arg(long)]
        student: Option<Uuid>,

        /// Only results for this test id
        #[arg(long)]
        test: Option<Uuid>,
    },
}

#[derive(Subcommand)]
enum StudentsCommand {
    /// Import student names from a CSV roster (first column)
    Import {
        /// Roster file
        #[arg(long)]
        file: PathBuf,

        /// Batch label (default: from config)
        #[arg(long)]
        batch: Option<String>,
    },

    /// Search students by name
    Search {
        /// Case-insensitive name fragment
        query: String,

        /// Only students in this batch
        #[arg(long)]
        batch: Option<String>,

        /// Maximum matches (default: from config)
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Subcommand)]
enum TestsCommand {
    /// Add a test from a definition file with a `[test] name`
    Add {
        #[arg(long)]
        file: PathBuf,
    },

    /// List tests, newest first
    List {
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Check answer key files for blank or malformed entries
    Validate {
        /// Path to a key file or directory
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("evalbee=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Students { action } => match action {
            StudentsCommand::Import { file, batch } => {
                commands::students::import(file, batch, config).await
            }
            StudentsCommand::Search {
                query,
                batch,
                limit,
            } => commands::students::search(query, batch, limit, config).await,
        },
        Commands::Tests { action } => match action {
            TestsCommand::Add { file } => commands::tests::add(file, config).await,
            TestsCommand::List { limit } => commands::tests::list(limit, config).await,
            TestsCommand::Validate { file } => commands::tests::validate(file),
        },
        Commands::Grade {
            key,
            answers,
            format,
            output,
        } => commands::grade::execute(key, answers, format, output),
        Commands::Check {
            student,
            test,
            answers,
            save,
        } => commands::check::execute(student, test, answers, save, config).await,
        Commands::Batch {
            test,
            dir,
            parallelism,
        } => commands::batch::execute(test, dir, parallelism, config).await,
        Commands::Results { student, test } => {
            commands::results::execute(student, test, config).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! The `evalbee init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("evalbee.toml").exists() {
        println!("evalbee.toml already exists, skipping.");
    } else {
        std::fs::write("evalbee.toml", SAMPLE_CONFIG)?;
        println!("Created evalbee.toml");
    }

    std::fs::create_dir_all("sheets")?;
    let example_path = std::path::Path::new("sheets/example-key.toml");
    if example_path.exists() {
        println!("sheets/example-key.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_KEY)?;
        println!("Created sheets/example-key.toml");
    }

    println!("\nNext steps:");
    println!("  1. Fill in the answer key in sheets/example-key.toml");
    println!("  2. Run: evalbee tests validate --file sheets/example-key.toml");
    println!("  3. Run: evalbee tests add --file sheets/example-key.toml");
    println!("  4. Run: evalbee students import --file roster.csv");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# evalbee configuration

data_dir = "./evalbee-data"
default_batch = "JEE"
search_limit = 10
parallelism = 4
import_chunk_size = 200
"#;

const EXAMPLE_KEY: &str = r#"# Each subject has 20 multiple-choice questions (1-20)
# and 5 numeric-answer questions (21-25).

[test]
name = "Example Mock Test"

[mcq]
physics = ["A", "B", "C", "D", "A", "B", "C", "D", "A", "B",
           "C", "D", "A", "B", "C", "D", "A", "B", "C", "D"]
chemistry = ["B", "C", "D", "A", "B", "C", "D", "A", "B", "C",
             "D", "A", "B", "C", "D", "A", "B", "C", "D", "A"]
mathematics = ["C", "D", "A", "B", "C", "D", "A", "B", "C", "D",
               "A", "B", "C", "D", "A", "B", "C", "D", "A", "B"]

[numeric]
physics = ["12", "0.5", "-3", "2.25", "100"]
chemistry = ["7", "1.5e2", "0", "3.14", "-0.25"]
mathematics = ["1", "2", "3", "4", "5"]
"#;

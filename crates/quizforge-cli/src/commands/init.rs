//! The `quizforge init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    let path = Path::new("quizforge.toml");
    if path.exists() {
        println!("quizforge.toml already exists, skipping.");
    } else {
        std::fs::write(path, SAMPLE_CONFIG).context("failed to write quizforge.toml")?;
        println!("Created quizforge.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizforge.toml to choose the data directory and time limit");
    println!("  2. Run: quizforge questions");
    println!("  3. Run: quizforge take --student <name>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizforge configuration

# Questions drawn from each difficulty level (easy, medium, hard).
questions_per_level = 5

# Default time limit in minutes. Remove for unlimited exams.
exam_minutes = 15

# Where `quizforge report --format html` writes its files.
report_dir = "./quizforge-reports"

[store]
type = "json"
data_dir = "./quizforge-data"
"#;

//! The `quizforge students` command.

use std::path::PathBuf;

use anyhow::Result;

use quizforge_report::text::NO_STUDENTS;

use super::open_engine;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_, engine) = open_engine(config_path)?;
    let repository = engine.repository();

    let students = repository.sorted_students();
    if students.is_empty() {
        println!("{NO_STUDENTS}");
        return Ok(());
    }

    for student in students {
        let exams = repository.history(student).map_or(0, <[_]>::len);
        let noun = if exams == 1 { "exam" } else { "exams" };
        println!("{student} ({exams} {noun})");
    }
    Ok(())
}

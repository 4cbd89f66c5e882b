//! The `quizforge student` command.

use std::path::PathBuf;

use anyhow::{bail, Result};

use quizforge_report::json::render_json;
use quizforge_report::text::render_student_detail;

use super::open_engine;

pub fn execute(config_path: Option<PathBuf>, student_id: String, format: String) -> Result<()> {
    let (_, engine) = open_engine(config_path)?;
    let detail = engine.student_detail(student_id.trim());

    match format.as_str() {
        "text" => println!("{}", render_student_detail(&detail)),
        "json" => println!("{}", render_json(&detail)?),
        other => bail!("unknown format: {other} (expected text or json)"),
    }
    Ok(())
}

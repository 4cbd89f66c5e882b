pub mod add_question;
pub mod init;
pub mod questions;
pub mod report;
pub mod student;
pub mod students;
pub mod take;

use std::path::PathBuf;

use anyhow::Result;

use quizforge_core::engine::ExamEngine;
use quizforge_store::{create_store, load_config_from, QuizforgeConfig};

/// Load the config and open an engine over its store.
pub fn open_engine(config_path: Option<PathBuf>) -> Result<(QuizforgeConfig, ExamEngine)> {
    let config = load_config_from(config_path.as_deref())?;
    let engine = ExamEngine::open(create_store(&config.store), config.engine_config());
    Ok((config, engine))
}

//! The `quizforge add-question` command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use quizforge_core::bank::NewQuestion;
use quizforge_core::model::{Difficulty, CHOICE_COUNT};

use super::open_engine;

pub fn execute(
    config_path: Option<PathBuf>,
    level: String,
    text: String,
    choices: Vec<String>,
    answer: usize,
) -> Result<()> {
    let difficulty: Difficulty = level
        .parse()
        .map_err(anyhow::Error::msg)
        .context("invalid --level")?;
    if !(1..=CHOICE_COUNT).contains(&answer) {
        bail!("--answer must be between 1 and {CHOICE_COUNT}, got {answer}");
    }

    let (_, mut engine) = open_engine(config_path)?;
    engine.add_question(
        difficulty,
        &NewQuestion {
            text,
            choices,
            answer_index: answer - 1,
        },
    )?;

    let total = engine.bank().tier(difficulty).len();
    println!("Added {difficulty} question ({total} {difficulty} questions in the bank).");
    Ok(())
}

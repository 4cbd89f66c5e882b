//! The `quizforge questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::open_engine;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (config, engine) = open_engine(config_path)?;

    let mut table = Table::new();
    table.set_header(vec!["Level", "Weight", "Built-in", "Custom", "Total"]);

    let bank = engine.bank();
    for (difficulty, total) in bank.counts() {
        table.add_row(vec![
            Cell::new(difficulty),
            Cell::new(difficulty.weight()),
            Cell::new(bank.builtin_count(difficulty)),
            Cell::new(bank.custom_count(difficulty)),
            Cell::new(total),
        ]);
    }
    println!("{table}");

    for (difficulty, skipped) in engine.skipped_custom_counts() {
        if skipped > 0 {
            println!("Skipped {skipped} invalid custom {difficulty} question(s).");
        }
    }
    println!(
        "Each exam draws {} question(s) per level from the {} store.",
        config.questions_per_level,
        engine.store_name()
    );
    Ok(())
}

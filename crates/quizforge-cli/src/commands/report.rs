//! The `quizforge report` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use comfy_table::{Cell, Table};

use quizforge_core::report::{AggregateReport, Leaderboard};
use quizforge_report::html::write_html_report;
use quizforge_report::json::render_json;
use quizforge_report::text::{render_aggregate_report, NO_STUDENTS};

use super::open_engine;

pub fn execute(config_path: Option<PathBuf>, format: String, output: Option<PathBuf>) -> Result<()> {
    let (config, engine) = open_engine(config_path)?;
    let report = engine.aggregate_report();

    match format.as_str() {
        "text" => println!("{}", render_aggregate_report(&report)),
        "table" => match &report {
            AggregateReport::NoStudents => println!("{NO_STUDENTS}"),
            AggregateReport::Leaderboard(board) => print_table(board),
        },
        "json" => println!("{}", render_json(&report)?),
        "html" => {
            let now = chrono::Utc::now();
            let path = output.unwrap_or_else(|| {
                config
                    .report_dir
                    .join(format!("report-{}.html", now.format("%Y-%m-%dT%H%M%S")))
            });
            write_html_report(&report, now, &path)?;
            println!("HTML report: {}", path.display());
        }
        other => bail!("unknown format: {other} (expected text, table, json or html)"),
    }

    Ok(())
}

fn print_table(board: &Leaderboard) {
    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Exams",
        "Last exam",
        "Best points",
        "Average %",
        "Last level",
    ]);

    for s in &board.by_best_points {
        table.add_row(vec![
            Cell::new(&s.student_id),
            Cell::new(s.total_exams),
            Cell::new(s.last_exam_at.format("%Y-%m-%d %H:%M")),
            Cell::new(s.best_points),
            Cell::new(format!("{:.1}%", s.avg_percent)),
            Cell::new(&s.last_level_label),
        ]);
    }
    println!("{table}");

    let distribution: Vec<String> = board
        .level_distribution
        .buckets()
        .iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect();
    println!("Levels: {}", distribution.join(", "));
}

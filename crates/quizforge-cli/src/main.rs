//! quizforge CLI: timed exams, scoring and teacher reports.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "Timed multiple-choice exams with scoring and reports")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config file
    Init,

    /// Take an exam interactively
    Take {
        /// Student taking the exam
        #[arg(long)]
        student: String,

        /// Supervising teacher
        #[arg(long)]
        teacher: Option<String>,

        /// Time limit in minutes (empty for none); overrides the config
        #[arg(long)]
        minutes: Option<String>,

        /// Questions per difficulty level; overrides the config
        #[arg(long)]
        per_level: Option<usize>,

        /// Seed for question sampling
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Report across all students
    Report {
        /// Output format: text, table, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Output file for the html format
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show every exam of one student
    Student {
        /// Student id
        id: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List students with recorded exams
    Students,

    /// Show question counts per level
    Questions,

    /// Add a custom question to the bank
    AddQuestion {
        /// Difficulty level: easy, medium, hard
        #[arg(long)]
        level: String,

        /// Question text
        #[arg(long)]
        text: String,

        /// Answer choice (exactly four, in order)
        #[arg(long = "choice")]
        choices: Vec<String>,

        /// Number of the correct choice (1-4)
        #[arg(long)]
        answer: usize,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizforge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Take {
            student,
            teacher,
            minutes,
            per_level,
            seed,
        } => commands::take::execute(config, student, teacher, minutes, per_level, seed),
        Commands::Report { format, output } => commands::report::execute(config, format, output),
        Commands::Student { id, format } => commands::student::execute(config, id, format),
        Commands::Students => commands::students::execute(config),
        Commands::Questions => commands::questions::execute(config),
        Commands::AddQuestion {
            level,
            text,
            choices,
            answer,
        } => commands::add_question::execute(config, level, text, choices, answer),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

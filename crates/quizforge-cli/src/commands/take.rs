//! The `quizforge take` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizforge_core::engine::{ExamDuration, ExamEngine};
use quizforge_core::session::{AnswerOutcome, ExamSession, Rejection};
use quizforge_report::text::render_exam_outcome;
use quizforge_store::{create_store, load_config_from};

pub fn execute(
    config_path: Option<PathBuf>,
    student: String,
    teacher: Option<String>,
    minutes: Option<String>,
    per_level: Option<usize>,
    seed: Option<u64>,
) -> Result<()> {
    let student = student.trim();
    if student.is_empty() {
        bail!("student name must not be empty");
    }

    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(n) = per_level {
        config.questions_per_level = n;
    }
    let mut engine_config = config.engine_config();
    if let Some(m) = minutes {
        engine_config.exam_duration = ExamDuration::parse(&m)?;
    }
    let duration = engine_config.exam_duration;
    let mut engine = ExamEngine::open(create_store(&config.store), engine_config);

    tracing::debug!(student, ?seed, per_level = config.questions_per_level, "starting exam");
    let started = match seed {
        Some(seed) => engine.start_exam_with(&mut StdRng::seed_from_u64(seed), Utc::now()),
        None => engine.start_exam(),
    };
    let mut session = started.map_err(|e| {
        if e.is_recoverable() {
            anyhow::anyhow!("{e}; add more with `quizforge add-question`")
        } else {
            e.into()
        }
    })?;

    println!(
        "Exam for {student}: {} questions, {duration}.",
        session.total_questions()
    );
    println!("Answer with 1-4, or q to finish early.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(&mut session, stdin.lock(), &mut stdout)?;

    let outcome = engine.complete_exam(student, teacher.as_deref(), &mut session)?;
    println!("\n{}", render_exam_outcome(student, &outcome));
    Ok(())
}

/// Drive a session from line-based input until it runs out of questions,
/// the deadline passes, the student quits, or input ends.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut ExamSession,
    mut input: R,
    out: &mut W,
) -> Result<()> {
    let mut line = String::new();
    loop {
        if session.is_expired() {
            writeln!(out, "\nTime is up.")?;
            break;
        }
        let Some(question) = session.current_question() else {
            break;
        };

        let (position, total) = session.position();
        writeln!(
            out,
            "\nQuestion {position}/{total} [{}] (time left: {})",
            question.difficulty(),
            session.remaining_time()
        )?;
        writeln!(out, "{}", question.text())?;
        for (i, choice) in question.choices().iter().enumerate() {
            writeln!(out, "  {}) {choice}", i + 1)?;
        }
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).context("failed to read answer")? == 0 {
            writeln!(out)?;
            break;
        }

        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            writeln!(out, "Finishing early.")?;
            break;
        }
        let choice = match answer.parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                writeln!(out, "Please enter a number from 1 to 4, or q.")?;
                continue;
            }
        };

        match session.submit_answer(choice)? {
            AnswerOutcome::Correct => writeln!(out, "Correct!")?,
            AnswerOutcome::Incorrect { correct_answer } => {
                writeln!(out, "Wrong. The correct answer is: {correct_answer}")?
            }
            AnswerOutcome::Rejected(Rejection::ChoiceOutOfRange { .. }) => {
                writeln!(out, "Please enter a number from 1 to 4, or q.")?
            }
            AnswerOutcome::Rejected(Rejection::Expired) => {
                writeln!(out, "\nTime is up.")?;
                break;
            }
            AnswerOutcome::Rejected(Rejection::NoQuestionRemaining) => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use chrono::Duration;
    use quizforge_core::model::{Difficulty, Question};

    fn questions() -> Vec<Question> {
        [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
            .into_iter()
            .map(|d| {
                Question::new(
                    format!("{d} question"),
                    ["right", "wrong", "nope", "never"].map(String::from),
                    "right",
                    d,
                )
                .unwrap()
            })
            .collect()
    }

    fn run(session: &mut ExamSession, input: &str) -> String {
        let mut out = Vec::new();
        run_session(session, Cursor::new(input), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn answers_every_question() {
        let mut session = ExamSession::new(questions(), None);
        let out = run(&mut session, "1\n2\n1\n");

        assert_eq!(session.answered(), 3);
        assert_eq!(session.correct(), 2);
        assert_eq!(session.points_earned(), 4);
        assert!(out.contains("Question 1/3 [easy] (time left: unlimited)"));
        assert!(out.contains("  4) never"));
        assert!(out.contains("Wrong. The correct answer is: right"));
        assert!(!session.has_more_questions());
    }

    #[test]
    fn invalid_input_is_reprompted() {
        let mut session = ExamSession::new(questions(), None);
        let out = run(&mut session, "abc\n0\n7\n1\n");

        assert_eq!(session.answered(), 1);
        assert_eq!(out.matches("Please enter a number from 1 to 4").count(), 3);
    }

    #[test]
    fn quit_stops_early() {
        let mut session = ExamSession::new(questions(), None);
        let out = run(&mut session, "1\nq\n");

        assert_eq!(session.answered(), 1);
        assert!(session.has_more_questions());
        assert!(out.contains("Finishing early."));
    }

    #[test]
    fn end_of_input_stops() {
        let mut session = ExamSession::new(questions(), None);
        run(&mut session, "1\n");
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn expired_session_asks_nothing() {
        let past = Utc::now() - Duration::minutes(5);
        let mut session = ExamSession::started_at(questions(), past, Some(past));
        let out = run(&mut session, "1\n1\n1\n");

        assert!(out.contains("Time is up."));
        assert!(!out.contains("Question 1/3"));
        assert_eq!(session.answered(), 0);
        assert!(session.early_terminated());
    }
}

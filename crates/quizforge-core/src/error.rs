//! Error types for exam sessions and question authoring.
//!
//! Rejected answers (out-of-range choice, submission after the deadline)
//! are not errors; they come back as [`crate::session::AnswerOutcome::Rejected`].

use thiserror::Error;

use crate::model::Difficulty;
use crate::session::SessionState;

/// Errors raised by the exam pipeline.
#[derive(Debug, Error)]
pub enum ExamError {
    /// A difficulty tier holds fewer questions than the exam needs.
    #[error("not enough {difficulty} questions: {available} available, {required} required")]
    InsufficientQuestions {
        difficulty: Difficulty,
        available: usize,
        required: usize,
    },

    /// A mutator was called on a session that is no longer active.
    #[error("session is {state}, operation not allowed")]
    InvalidState { state: SessionState },

    /// An exam duration that is neither empty nor a positive whole number
    /// of minutes.
    #[error("invalid exam duration {input:?}: expected a positive number of minutes")]
    InvalidDuration { input: String },
}

impl ExamError {
    /// Returns `true` if the caller can recover (e.g. by adding questions
    /// and retrying).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ExamError::InsufficientQuestions { .. })
    }
}

/// Errors raised when a question fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuestionError {
    #[error("question text is empty")]
    EmptyText,

    #[error("expected 4 choices, found {found}")]
    WrongChoiceCount { found: usize },

    #[error("choice {} is empty", .position + 1)]
    EmptyChoice { position: usize },

    #[error("answer {answer:?} is not one of the choices")]
    AnswerNotAmongChoices { answer: String },

    #[error("answer index {index} is out of range (expected 0..4)")]
    AnswerIndexOutOfRange { index: usize },
}

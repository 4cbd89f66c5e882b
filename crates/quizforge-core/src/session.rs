//! The exam session state machine.
//!
//! A session starts `Active` at the first question and ends `Completed`
//! after exactly one call to [`ExamSession::finalize`]. The deadline is
//! never enforced by a timer: callers poll [`ExamSession::is_expired`] or
//! [`ExamSession::remaining_time`] from their own loop, and every
//! time-dependent method has an `*_at` form taking the instant explicitly.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ExamError;
use crate::model::{DifficultyBreakdown, Question, CHOICE_COUNT};

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Active,
    Completed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Active => write!(f, "active"),
            SessionState::Completed => write!(f, "completed"),
        }
    }
}

/// Time left before the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingTime {
    /// No deadline configured.
    Unlimited,
    /// Whole seconds left, zero once the deadline has passed.
    Seconds(u64),
}

impl RemainingTime {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RemainingTime::Seconds(0))
    }
}

impl fmt::Display for RemainingTime {
    /// `mm:ss`, or `unlimited`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemainingTime::Unlimited => write!(f, "unlimited"),
            RemainingTime::Seconds(s) => write!(f, "{:02}:{:02}", s / 60, s % 60),
        }
    }
}

/// Why a submission was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The deadline has passed.
    Expired,
    /// Every question has already been answered or skipped.
    NoQuestionRemaining,
    /// The choice index does not name one of the question's choices.
    ChoiceOutOfRange { index: usize },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Expired => write!(f, "time is up"),
            Rejection::NoQuestionRemaining => write!(f, "no question remaining"),
            Rejection::ChoiceOutOfRange { index } => write!(
                f,
                "choice {} is out of range (1-{CHOICE_COUNT})",
                index + 1
            ),
        }
    }
}

/// Result of a single answer submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect { correct_answer: String },
    /// Nothing was scored and the session did not change.
    Rejected(Rejection),
}

impl AnswerOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerOutcome::Correct)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, AnswerOutcome::Rejected(_))
    }
}

/// Immutable record of a finalized session, the input to scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub total_questions: u32,
    pub answered: u32,
    pub correct: u32,
    pub points_earned: u32,
    pub max_points: u32,
    pub stats: DifficultyBreakdown,
    pub early_terminated: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionSnapshot {
    pub fn wrong(&self) -> u32 {
        self.answered - self.correct
    }

    pub fn unanswered(&self) -> u32 {
        self.total_questions - self.answered
    }
}

/// A single timed exam attempt.
#[derive(Debug, Clone)]
pub struct ExamSession {
    id: Uuid,
    questions: Vec<Question>,
    current_index: usize,
    answered: u32,
    correct: u32,
    points_earned: u32,
    max_points: u32,
    stats: DifficultyBreakdown,
    started_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
    early_terminated: bool,
    state: SessionState,
}

impl ExamSession {
    /// Start a session now, with an optional absolute deadline.
    pub fn new(questions: Vec<Question>, deadline: Option<DateTime<Utc>>) -> Self {
        Self::started_at(questions, Utc::now(), deadline)
    }

    /// Start a session now that must end `duration` from now.
    pub fn with_duration(questions: Vec<Question>, duration: Duration) -> Self {
        let now = Utc::now();
        Self::started_at(questions, now, Some(now + duration))
    }

    /// Start a session at an explicit instant.
    pub fn started_at(
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
        deadline: Option<DateTime<Utc>>,
    ) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            questions,
            current_index: 0,
            answered: 0,
            correct: 0,
            points_earned: 0,
            max_points: 0,
            stats: DifficultyBreakdown::default(),
            started_at,
            deadline,
            early_terminated: false,
            state: SessionState::Active,
        };
        tracing::info!(
            session = %session.id,
            questions = session.questions.len(),
            deadline = ?session.deadline,
            "exam session started"
        );
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answered(&self) -> u32 {
        self.answered
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn points_earned(&self) -> u32 {
        self.points_earned
    }

    pub fn max_points(&self) -> u32 {
        self.max_points
    }

    pub fn stats(&self) -> &DifficultyBreakdown {
        &self.stats
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn early_terminated(&self) -> bool {
        self.early_terminated
    }

    pub fn has_more_questions(&self) -> bool {
        self.current_index < self.questions.len()
    }

    /// The question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// 1-based position of the current question and the total.
    pub fn position(&self) -> (usize, usize) {
        (self.current_index + 1, self.questions.len())
    }

    pub fn remaining_time(&self) -> RemainingTime {
        self.remaining_time_at(Utc::now())
    }

    pub fn remaining_time_at(&self, now: DateTime<Utc>) -> RemainingTime {
        match self.deadline {
            None => RemainingTime::Unlimited,
            Some(deadline) => {
                RemainingTime::Seconds((deadline - now).num_seconds().max(0) as u64)
            }
        }
    }

    pub fn is_expired(&mut self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// True once `now` has reached the deadline. The first time this is
    /// observed on an active session, the remaining questions are skipped
    /// and the session is marked early-terminated; it stays `Active` until
    /// finalized.
    pub fn is_expired_at(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self.deadline.is_some_and(|deadline| now >= deadline);
        if expired && self.state == SessionState::Active {
            if !self.early_terminated || self.has_more_questions() {
                tracing::info!(
                    session = %self.id,
                    answered = self.answered,
                    total = self.questions.len(),
                    "exam deadline reached"
                );
            }
            self.early_terminated = true;
            self.current_index = self.questions.len();
        }
        expired
    }

    pub fn submit_answer(&mut self, choice_index: usize) -> Result<AnswerOutcome, ExamError> {
        self.submit_answer_at(choice_index, Utc::now())
    }

    /// Score an answer for the current question and advance.
    ///
    /// Errors only when the session is already completed. Expiry is checked
    /// before anything else; rejected submissions leave the session as is.
    pub fn submit_answer_at(
        &mut self,
        choice_index: usize,
        now: DateTime<Utc>,
    ) -> Result<AnswerOutcome, ExamError> {
        self.ensure_active()?;

        if self.is_expired_at(now) {
            return Ok(AnswerOutcome::Rejected(Rejection::Expired));
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return Ok(AnswerOutcome::Rejected(Rejection::NoQuestionRemaining));
        };
        if choice_index >= question.choices().len() {
            return Ok(AnswerOutcome::Rejected(Rejection::ChoiceOutOfRange {
                index: choice_index,
            }));
        }

        let weight = question.weight();
        let tier = self.stats.get_mut(question.difficulty());
        self.max_points += weight;

        let outcome = if question.is_correct_choice(choice_index) {
            self.correct += 1;
            self.points_earned += weight;
            tier.correct += 1;
            AnswerOutcome::Correct
        } else {
            tier.wrong += 1;
            AnswerOutcome::Incorrect {
                correct_answer: question.correct_answer().to_string(),
            }
        };

        self.answered += 1;
        self.current_index += 1;
        Ok(outcome)
    }

    pub fn finalize(&mut self) -> Result<SessionSnapshot, ExamError> {
        self.finalize_at(Utc::now())
    }

    /// Stop the session and freeze its counters.
    ///
    /// Unanswered questions are skipped and count as early termination.
    /// Allowed exactly once.
    pub fn finalize_at(&mut self, now: DateTime<Utc>) -> Result<SessionSnapshot, ExamError> {
        self.ensure_active()?;

        if self.has_more_questions() {
            self.early_terminated = true;
            self.current_index = self.questions.len();
        }
        self.state = SessionState::Completed;

        let snapshot = SessionSnapshot {
            session_id: self.id,
            total_questions: self.questions.len() as u32,
            answered: self.answered,
            correct: self.correct,
            points_earned: self.points_earned,
            max_points: self.max_points,
            stats: self.stats,
            early_terminated: self.early_terminated,
            started_at: self.started_at,
            finished_at: now,
        };

        tracing::info!(
            session = %self.id,
            answered = snapshot.answered,
            correct = snapshot.correct,
            points = snapshot.points_earned,
            max_points = snapshot.max_points,
            early_terminated = snapshot.early_terminated,
            "exam session finalized"
        );
        Ok(snapshot)
    }

    fn ensure_active(&self) -> Result<(), ExamError> {
        match self.state {
            SessionState::Active => Ok(()),
            state => Err(ExamError::InvalidState { state }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;

    fn question(text: &str, difficulty: Difficulty) -> Question {
        Question::new(
            text,
            ["right".into(), "wrong".into(), "nope".into(), "never".into()],
            "right",
            difficulty,
        )
        .unwrap()
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn mixed_session(deadline: Option<DateTime<Utc>>) -> ExamSession {
        ExamSession::started_at(
            vec![
                question("e", Difficulty::Easy),
                question("m", Difficulty::Medium),
                question("h", Difficulty::Hard),
            ],
            t0(),
            deadline,
        )
    }

    #[test]
    fn correct_answer_scores_weight() {
        let mut session = mixed_session(None);
        let outcome = session.submit_answer_at(0, t0()).unwrap();
        assert!(outcome.is_correct());
        assert_eq!(session.correct(), 1);
        assert_eq!(session.points_earned(), 1);
        assert_eq!(session.max_points(), 1);
        assert_eq!(session.stats().easy.correct, 1);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn incorrect_answer_only_counts_tier_wrong() {
        let mut session = mixed_session(None);
        session.submit_answer_at(0, t0()).unwrap();
        let outcome = session.submit_answer_at(2, t0()).unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome::Incorrect {
                correct_answer: "right".into()
            }
        );
        assert_eq!(session.correct(), 1);
        assert_eq!(session.points_earned(), 1);
        assert_eq!(session.max_points(), 3);
        assert_eq!(session.stats().medium.wrong, 1);
        assert_eq!(session.stats().medium.correct, 0);
        assert_eq!(session.answered(), 2);
    }

    #[test]
    fn out_of_range_choice_is_rejected_without_mutation() {
        let mut session = mixed_session(None);
        let outcome = session.submit_answer_at(4, t0()).unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome::Rejected(Rejection::ChoiceOutOfRange { index: 4 })
        );
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.answered(), 0);
        assert_eq!(session.max_points(), 0);
    }

    #[test]
    fn submissions_after_last_question_are_rejected() {
        let mut session = mixed_session(None);
        for _ in 0..3 {
            session.submit_answer_at(0, t0()).unwrap();
        }
        assert!(!session.has_more_questions());
        assert_eq!(
            session.submit_answer_at(0, t0()).unwrap(),
            AnswerOutcome::Rejected(Rejection::NoQuestionRemaining)
        );
        assert_eq!(session.answered(), 3);
    }

    #[test]
    fn remaining_time_without_deadline_is_unlimited() {
        let session = mixed_session(None);
        assert_eq!(session.remaining_time_at(t0()), RemainingTime::Unlimited);
    }

    #[test]
    fn remaining_time_counts_down_and_clamps() {
        let session = mixed_session(Some(t0() + Duration::seconds(90)));
        assert_eq!(session.remaining_time_at(t0()), RemainingTime::Seconds(90));
        assert_eq!(
            session.remaining_time_at(t0() + Duration::milliseconds(30_500)),
            RemainingTime::Seconds(59)
        );
        assert_eq!(
            session.remaining_time_at(t0() + Duration::seconds(600)),
            RemainingTime::Seconds(0)
        );
        assert_eq!(RemainingTime::Seconds(90).to_string(), "01:30");
    }

    #[test]
    fn expiry_skips_remaining_questions() {
        let deadline = t0() + Duration::minutes(1);
        let mut session = mixed_session(Some(deadline));
        session.submit_answer_at(0, t0()).unwrap();

        assert!(!session.is_expired_at(deadline - Duration::seconds(1)));
        assert!(!session.early_terminated());

        assert!(session.is_expired_at(deadline));
        assert!(session.early_terminated());
        assert_eq!(session.current_index(), session.total_questions());
        assert_eq!(session.state(), SessionState::Active);

        let outcome = session.submit_answer_at(0, deadline).unwrap();
        assert_eq!(outcome, AnswerOutcome::Rejected(Rejection::Expired));
        assert_eq!(session.answered(), 1);
    }

    #[test]
    fn expired_submission_checks_expiry_first() {
        let deadline = t0() + Duration::seconds(10);
        let mut session = mixed_session(Some(deadline));
        let outcome = session
            .submit_answer_at(9, deadline + Duration::seconds(1))
            .unwrap();
        assert_eq!(outcome, AnswerOutcome::Rejected(Rejection::Expired));
        assert!(session.early_terminated());
    }

    #[test]
    fn finalize_early_marks_termination() {
        let mut session = mixed_session(None);
        session.submit_answer_at(0, t0()).unwrap();
        let snapshot = session.finalize_at(t0()).unwrap();

        assert!(snapshot.early_terminated);
        assert_eq!(snapshot.answered, 1);
        assert_eq!(snapshot.unanswered(), 2);
        assert_eq!(snapshot.answered + snapshot.unanswered(), snapshot.total_questions);
        assert_eq!(session.current_index(), 3);
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn finalize_after_all_answers_is_not_early() {
        let mut session = mixed_session(None);
        for choice in [0, 1, 0] {
            session.submit_answer_at(choice, t0()).unwrap();
        }
        let snapshot = session.finalize_at(t0()).unwrap();
        assert!(!snapshot.early_terminated);
        assert_eq!(snapshot.correct, 2);
        assert_eq!(snapshot.wrong(), 1);
        assert_eq!(snapshot.points_earned, 4);
        assert_eq!(snapshot.max_points, 6);
        assert!(snapshot.points_earned <= snapshot.max_points);
    }

    #[test]
    fn finalize_after_expiry_is_allowed() {
        let deadline = t0() + Duration::seconds(5);
        let mut session = mixed_session(Some(deadline));
        assert!(session.is_expired_at(deadline));
        let snapshot = session.finalize_at(deadline).unwrap();
        assert!(snapshot.early_terminated);
        assert_eq!(snapshot.answered, 0);
    }

    #[test]
    fn completed_session_rejects_mutation() {
        let mut session = mixed_session(None);
        session.finalize_at(t0()).unwrap();

        assert!(matches!(
            session.submit_answer_at(0, t0()),
            Err(ExamError::InvalidState {
                state: SessionState::Completed
            })
        ));
        assert!(matches!(
            session.finalize_at(t0()),
            Err(ExamError::InvalidState { .. })
        ));
    }

    #[test]
    fn position_is_one_based() {
        let mut session = mixed_session(None);
        assert_eq!(session.position(), (1, 3));
        session.submit_answer_at(0, t0()).unwrap();
        assert_eq!(session.position(), (2, 3));
        assert_eq!(session.current_question().unwrap().text(), "m");
    }
}

//! Exam engine: the single coordinator between the bank, sessions and the
//! result history.
//!
//! Owns the store handle and the in-memory repository, so every append and
//! save goes through `&mut ExamEngine`.

use std::fmt;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::bank::{CustomQuestions, NewQuestion, QuestionBank, DEFAULT_PER_LEVEL};
use crate::error::ExamError;
use crate::model::Difficulty;
use crate::report::{aggregate_report, student_detail, AggregateReport, StudentDetail};
use crate::repository::ResultsRepository;
use crate::scoring::{score_session, ExamOutcome};
use crate::session::ExamSession;
use crate::traits::DocumentStore;

/// Time limit of an exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExamDuration {
    #[default]
    Unlimited,
    Minutes(u32),
}

impl ExamDuration {
    /// Parse user input: empty means no limit, otherwise a positive whole
    /// number of minutes.
    pub fn parse(input: &str) -> Result<Self, ExamError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::Unlimited);
        }
        match trimmed.parse::<u32>() {
            Ok(minutes) if minutes > 0 => Ok(Self::Minutes(minutes)),
            _ => Err(ExamError::InvalidDuration {
                input: input.to_string(),
            }),
        }
    }

    /// From an optional configured minute count; zero means no limit.
    pub fn from_minutes(minutes: Option<u32>) -> Self {
        match minutes {
            Some(m) if m > 0 => Self::Minutes(m),
            _ => Self::Unlimited,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Self::Unlimited => None,
            Self::Minutes(m) => Some(Duration::minutes(i64::from(*m))),
        }
    }
}

impl fmt::Display for ExamDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("no time limit"),
            Self::Minutes(1) => f.write_str("1 minute"),
            Self::Minutes(m) => write!(f, "{m} minutes"),
        }
    }
}

/// Configuration for the exam engine.
#[derive(Debug, Clone)]
pub struct ExamEngineConfig {
    /// Questions drawn from each difficulty tier.
    pub questions_per_level: usize,
    /// Time limit applied to new sessions.
    pub exam_duration: ExamDuration,
}

impl Default for ExamEngineConfig {
    fn default() -> Self {
        Self {
            questions_per_level: DEFAULT_PER_LEVEL,
            exam_duration: ExamDuration::Unlimited,
        }
    }
}

/// The exam engine.
pub struct ExamEngine {
    store: Box<dyn DocumentStore>,
    config: ExamEngineConfig,
    bank: QuestionBank,
    custom: CustomQuestions,
    repository: ResultsRepository,
}

impl ExamEngine {
    /// Load the custom questions and result history from `store`.
    pub fn open(store: Box<dyn DocumentStore>, config: ExamEngineConfig) -> Self {
        let custom = CustomQuestions::load(store.as_ref());
        let bank = QuestionBank::with_custom(&custom);
        let repository = ResultsRepository::load(store.as_ref());
        tracing::debug!(
            store = store.name(),
            students = repository.len(),
            "exam engine opened"
        );
        Self {
            store,
            config,
            bank,
            custom,
            repository,
        }
    }

    pub fn config(&self) -> &ExamEngineConfig {
        &self.config
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn repository(&self) -> &ResultsRepository {
        &self.repository
    }

    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    /// Sample a fresh exam and start its session now.
    pub fn start_exam(&self) -> Result<ExamSession, ExamError> {
        self.start_exam_with(&mut rand::thread_rng(), Utc::now())
    }

    /// Sample with the given RNG and start the session at `now`.
    pub fn start_exam_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        now: DateTime<Utc>,
    ) -> Result<ExamSession, ExamError> {
        let questions = self
            .bank
            .sample_exam_with(rng, self.config.questions_per_level)?;
        let deadline = self.config.exam_duration.as_duration().map(|d| now + d);
        Ok(ExamSession::started_at(questions, now, deadline))
    }

    /// Finalize, score, append and save.
    pub fn complete_exam(
        &mut self,
        student_id: &str,
        teacher_id: Option<&str>,
        session: &mut ExamSession,
    ) -> Result<ExamOutcome> {
        self.complete_exam_at(student_id, teacher_id, session, Utc::now())
    }

    pub fn complete_exam_at(
        &mut self,
        student_id: &str,
        teacher_id: Option<&str>,
        session: &mut ExamSession,
        now: DateTime<Utc>,
    ) -> Result<ExamOutcome> {
        let student_id = student_id.trim();
        if student_id.is_empty() {
            bail!("student id must not be empty");
        }

        let snapshot = session.finalize_at(now)?;
        let outcome = score_session(&snapshot, teacher_id, now);

        self.repository.append(student_id, outcome.record.clone());
        self.repository
            .save(self.store.as_ref())
            .with_context(|| format!("failed to record exam for {student_id}"))?;

        tracing::info!(
            student = student_id,
            session = %snapshot.session_id,
            points = outcome.summary.points_earned,
            max_points = outcome.summary.max_points,
            level = %outcome.summary.level,
            "exam result saved"
        );
        Ok(outcome)
    }

    /// Validate and persist a custom question, then make it available for
    /// sampling.
    pub fn add_question(&mut self, difficulty: Difficulty, question: &NewQuestion) -> Result<()> {
        let (entry, validated) = question
            .validate(difficulty)
            .context("invalid question")?;

        let mut custom = self.custom.clone();
        custom.push(difficulty, entry);
        custom.save(self.store.as_ref())?;

        self.custom = custom;
        self.bank.push(validated);
        tracing::info!(
            %difficulty,
            custom = self.bank.custom_count(difficulty),
            "custom question added"
        );
        Ok(())
    }

    /// Custom questions loaded into the bank per tier, in canonical order.
    pub fn custom_counts(&self) -> [(Difficulty, usize); 3] {
        Difficulty::ALL.map(|d| (d, self.bank.custom_count(d)))
    }

    /// Stored custom questions per tier that failed validation on load.
    pub fn skipped_custom_counts(&self) -> [(Difficulty, usize); 3] {
        Difficulty::ALL.map(|d| {
            (
                d,
                self.custom
                    .count(d)
                    .saturating_sub(self.bank.custom_count(d)),
            )
        })
    }

    pub fn aggregate_report(&self) -> AggregateReport {
        aggregate_report(&self.repository)
    }

    pub fn student_detail(&self, student_id: &str) -> StudentDetail {
        student_detail(&self.repository, student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;

    use crate::session::AnswerOutcome;
    use crate::traits::{MemoryStore, QUESTIONS_COLLECTION, RESULTS_COLLECTION};

    /// Lets a test keep a handle on the store the engine owns.
    struct Shared(Arc<MemoryStore>);

    impl DocumentStore for Shared {
        fn name(&self) -> &str {
            self.0.name()
        }

        fn load(&self, collection: &str) -> Result<Option<Value>> {
            self.0.load(collection)
        }

        fn save(&self, collection: &str, document: &Value) -> Result<()> {
            self.0.save(collection, document)
        }
    }

    fn engine(config: ExamEngineConfig) -> (ExamEngine, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let engine = ExamEngine::open(Box::new(Shared(store.clone())), config);
        (engine, store)
    }

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-02T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn answer_key(session: &ExamSession) -> usize {
        let question = session.current_question().unwrap();
        question
            .choices()
            .iter()
            .position(|c| c == question.correct_answer())
            .unwrap()
    }

    #[test]
    fn parse_duration() {
        assert_eq!(ExamDuration::parse("").unwrap(), ExamDuration::Unlimited);
        assert_eq!(ExamDuration::parse("  ").unwrap(), ExamDuration::Unlimited);
        assert_eq!(ExamDuration::parse("15").unwrap(), ExamDuration::Minutes(15));
        assert_eq!(ExamDuration::parse(" 3 ").unwrap(), ExamDuration::Minutes(3));
        for bad in ["0", "-5", "1.5", "ten"] {
            assert!(
                matches!(
                    ExamDuration::parse(bad),
                    Err(ExamError::InvalidDuration { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn duration_conversions() {
        assert_eq!(ExamDuration::from_minutes(None), ExamDuration::Unlimited);
        assert_eq!(ExamDuration::from_minutes(Some(0)), ExamDuration::Unlimited);
        assert_eq!(
            ExamDuration::Minutes(2).as_duration(),
            Some(Duration::minutes(2))
        );
        assert_eq!(ExamDuration::Minutes(2).to_string(), "2 minutes");
        assert_eq!(ExamDuration::Unlimited.to_string(), "no time limit");
    }

    #[test]
    fn start_exam_applies_config() {
        let (engine, _) = engine(ExamEngineConfig {
            questions_per_level: 3,
            exam_duration: ExamDuration::Minutes(10),
        });
        let mut rng = StdRng::seed_from_u64(7);
        let session = engine.start_exam_with(&mut rng, t0()).unwrap();
        assert_eq!(session.total_questions(), 9);
        assert_eq!(session.deadline(), Some(t0() + Duration::minutes(10)));
    }

    #[test]
    fn start_exam_fails_when_tier_too_small() {
        let (engine, _) = engine(ExamEngineConfig {
            questions_per_level: 100,
            ..Default::default()
        });
        let err = engine.start_exam().unwrap_err();
        assert!(err.is_recoverable());
    }

    #[test]
    fn complete_exam_records_and_saves() {
        let (mut engine, store) = engine(ExamEngineConfig::default());
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = engine.start_exam_with(&mut rng, t0()).unwrap();

        let key = answer_key(&session);
        assert_eq!(
            session.submit_answer_at(key, t0()).unwrap(),
            AnswerOutcome::Correct
        );

        let outcome = engine
            .complete_exam_at("ada", Some("mr-smith"), &mut session, t0())
            .unwrap();
        assert_eq!(outcome.summary.answered, 1);
        assert!(outcome.record.early_terminated);
        assert_eq!(outcome.record.teacher_id.as_deref(), Some("mr-smith"));

        assert_eq!(engine.repository().history("ada").unwrap().len(), 1);
        let saved = store.document(RESULTS_COLLECTION).unwrap();
        assert_eq!(saved["ada"].as_array().unwrap().len(), 1);

        let reopened = ExamEngine::open(Box::new(Shared(store)), ExamEngineConfig::default());
        assert_eq!(reopened.repository(), engine.repository());
    }

    #[test]
    fn complete_exam_rejects_blank_student() {
        let (mut engine, store) = engine(ExamEngineConfig::default());
        let mut session = engine.start_exam().unwrap();
        assert!(engine.complete_exam("  ", None, &mut session).is_err());
        assert!(store.document(RESULTS_COLLECTION).is_none());
    }

    #[test]
    fn completing_twice_is_an_error() {
        let (mut engine, _) = engine(ExamEngineConfig::default());
        let mut session = engine.start_exam().unwrap();
        engine.complete_exam("ada", None, &mut session).unwrap();
        assert!(engine.complete_exam("ada", None, &mut session).is_err());
        assert_eq!(engine.repository().total_records(), 1);
    }

    #[test]
    fn add_question_persists_and_extends_bank() {
        let (mut engine, store) = engine(ExamEngineConfig::default());
        let before = engine.bank().tier(Difficulty::Hard).len();

        engine
            .add_question(
                Difficulty::Hard,
                &NewQuestion {
                    text: " What does `yield` create? ".into(),
                    choices: vec![
                        "A generator".into(),
                        "A list".into(),
                        "A tuple".into(),
                        "A thread".into(),
                    ],
                    answer_index: 0,
                },
            )
            .unwrap();

        assert_eq!(engine.bank().tier(Difficulty::Hard).len(), before + 1);
        assert_eq!(
            engine.custom_counts(),
            [
                (Difficulty::Easy, 0),
                (Difficulty::Medium, 0),
                (Difficulty::Hard, 1)
            ]
        );
        let saved = store.document(QUESTIONS_COLLECTION).unwrap();
        assert_eq!(saved["hard"][0]["text"], "What does `yield` create?");
        assert_eq!(saved["hard"][0]["answer"], "A generator");
    }

    #[test]
    fn malformed_custom_question_is_not_counted_as_loaded() {
        let store = MemoryStore::with_document(
            QUESTIONS_COLLECTION,
            serde_json::json!({
                "easy": [{"text": "bad", "choices": ["a", "b"], "answer": "a"}]
            }),
        );
        let engine = ExamEngine::open(Box::new(store), ExamEngineConfig::default());

        let (_, total) = engine.bank().counts()[0];
        assert_eq!(total, engine.bank().builtin_count(Difficulty::Easy));
        assert_eq!(engine.custom_counts()[0], (Difficulty::Easy, 0));
        assert_eq!(engine.skipped_custom_counts()[0], (Difficulty::Easy, 1));
        assert_eq!(engine.skipped_custom_counts()[1], (Difficulty::Medium, 0));
    }

    #[test]
    fn invalid_question_changes_nothing() {
        let (mut engine, store) = engine(ExamEngineConfig::default());
        let before = engine.bank().counts();
        let result = engine.add_question(
            Difficulty::Easy,
            &NewQuestion {
                text: "Pick one".into(),
                choices: vec!["a".into(), " ".into(), "c".into(), "d".into()],
                answer_index: 0,
            },
        );
        assert!(result.is_err());
        assert_eq!(engine.bank().counts(), before);
        assert!(store.document(QUESTIONS_COLLECTION).is_none());
    }

    #[test]
    fn reports_reflect_repository() {
        let (mut engine, _) = engine(ExamEngineConfig::default());
        assert_eq!(engine.aggregate_report(), AggregateReport::NoStudents);

        let mut session = engine.start_exam().unwrap();
        engine.complete_exam("ada", None, &mut session).unwrap();

        assert!(matches!(
            engine.aggregate_report(),
            AggregateReport::Leaderboard(_)
        ));
        assert!(matches!(
            engine.student_detail("ada"),
            StudentDetail::Records { .. }
        ));
        assert!(matches!(
            engine.student_detail("bob"),
            StudentDetail::NoExams { .. }
        ));
    }
}

//! Question bank: built-in curriculum plus teacher-authored questions.
//!
//! Loads the custom question collection from a [`DocumentStore`], validates
//! each entry at the load boundary, and samples exam sets.

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::curriculum::builtin_questions;
use crate::error::{ExamError, QuestionError};
use crate::model::{Difficulty, Question, CHOICE_COUNT};
use crate::traits::{DocumentStore, QUESTIONS_COLLECTION};

/// Default number of questions drawn from each tier.
pub const DEFAULT_PER_LEVEL: usize = 5;

/// A custom question as persisted in the `questions` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomQuestion {
    pub text: String,
    pub choices: Vec<String>,
    pub answer: String,
}

impl CustomQuestion {
    /// Validate into a [`Question`] of the given tier.
    pub fn to_question(&self, difficulty: Difficulty) -> Result<Question, QuestionError> {
        Question::from_parts(
            self.text.clone(),
            self.choices.clone(),
            self.answer.clone(),
            difficulty,
        )
    }
}

/// The persisted custom question collection, one list per tier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomQuestions {
    #[serde(default)]
    pub easy: Vec<CustomQuestion>,
    #[serde(default)]
    pub medium: Vec<CustomQuestion>,
    #[serde(default)]
    pub hard: Vec<CustomQuestion>,
}

impl CustomQuestions {
    pub fn tier(&self, difficulty: Difficulty) -> &[CustomQuestion] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn tier_mut(&mut self, difficulty: Difficulty) -> &mut Vec<CustomQuestion> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Parse the collection document. Entries that are not well-formed
    /// objects are skipped; a document that is not an object yields an
    /// empty collection.
    pub fn from_document(document: &Value) -> Self {
        let mut custom = CustomQuestions::default();
        let Some(map) = document.as_object() else {
            tracing::warn!("custom question collection is not an object, ignoring it");
            return custom;
        };

        for difficulty in Difficulty::ALL {
            let Some(entries) = map.get(difficulty.as_str()) else {
                continue;
            };
            let Some(entries) = entries.as_array() else {
                tracing::warn!("custom {difficulty} questions are not a list, ignoring them");
                continue;
            };
            for (i, entry) in entries.iter().enumerate() {
                match serde_json::from_value::<CustomQuestion>(entry.clone()) {
                    Ok(q) => custom.tier_mut(difficulty).push(q),
                    Err(e) => {
                        tracing::warn!("skipping malformed custom {difficulty} question #{i}: {e}")
                    }
                }
            }
        }

        custom
    }

    /// Load from the store; a missing or unreadable collection is empty.
    pub fn load(store: &dyn DocumentStore) -> Self {
        match store.load(QUESTIONS_COLLECTION) {
            Ok(Some(document)) => Self::from_document(&document),
            Ok(None) => Self::default(),
            Err(e) => {
                tracing::warn!("failed to load custom questions from {}: {e:#}", store.name());
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &dyn DocumentStore) -> Result<()> {
        let document = serde_json::to_value(self).context("failed to serialize custom questions")?;
        store
            .save(QUESTIONS_COLLECTION, &document)
            .with_context(|| format!("failed to save custom questions to {}", store.name()))
    }

    pub fn push(&mut self, difficulty: Difficulty, question: CustomQuestion) {
        self.tier_mut(difficulty).push(question);
    }

    pub fn count(&self, difficulty: Difficulty) -> usize {
        self.tier(difficulty).len()
    }
}

/// A question authored through the teacher panel, before validation.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub choices: Vec<String>,
    /// Zero-based index of the correct choice.
    pub answer_index: usize,
}

impl NewQuestion {
    /// Trim and validate the input, producing the persisted form and the
    /// bank question.
    pub fn validate(
        &self,
        difficulty: Difficulty,
    ) -> Result<(CustomQuestion, Question), QuestionError> {
        let text = self.text.trim().to_string();
        let choices: Vec<String> = self.choices.iter().map(|c| c.trim().to_string()).collect();

        if choices.len() != CHOICE_COUNT {
            return Err(QuestionError::WrongChoiceCount {
                found: choices.len(),
            });
        }
        if self.answer_index >= CHOICE_COUNT {
            return Err(QuestionError::AnswerIndexOutOfRange {
                index: self.answer_index,
            });
        }

        let answer = choices[self.answer_index].clone();
        let question = Question::from_parts(text.clone(), choices.clone(), answer.clone(), difficulty)?;
        Ok((
            CustomQuestion {
                text,
                choices,
                answer,
            },
            question,
        ))
    }
}

/// The candidate question pool, separated by tier.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    easy: Vec<Question>,
    medium: Vec<Question>,
    hard: Vec<Question>,
    /// Leading built-in questions per tier, in canonical order.
    builtin: [usize; 3],
}

impl QuestionBank {
    /// Build a bank directly from per-tier question lists.
    pub fn from_parts(easy: Vec<Question>, medium: Vec<Question>, hard: Vec<Question>) -> Self {
        Self {
            easy,
            medium,
            hard,
            builtin: [0; 3],
        }
    }

    /// Built-in curriculum followed by the given custom questions.
    /// Custom entries that fail validation are skipped.
    pub fn with_custom(custom: &CustomQuestions) -> Self {
        let mut bank = Self::from_parts(
            builtin_questions(Difficulty::Easy),
            builtin_questions(Difficulty::Medium),
            builtin_questions(Difficulty::Hard),
        );
        bank.builtin = Difficulty::ALL.map(|d| bank.tier(d).len());

        for difficulty in Difficulty::ALL {
            for entry in custom.tier(difficulty) {
                match entry.to_question(difficulty) {
                    Ok(q) => bank.push(q),
                    Err(e) => tracing::warn!(
                        "skipping invalid custom {difficulty} question {:?}: {e}",
                        entry.text
                    ),
                }
            }
        }

        bank
    }

    /// Built-in curriculum merged with the custom questions in `store`.
    pub fn load(store: &dyn DocumentStore) -> Self {
        let bank = Self::with_custom(&CustomQuestions::load(store));
        tracing::debug!(
            easy = bank.easy.len(),
            medium = bank.medium.len(),
            hard = bank.hard.len(),
            "question bank loaded"
        );
        bank
    }

    /// Append a question to its tier.
    pub fn push(&mut self, question: Question) {
        self.tier_mut(question.difficulty()).push(question);
    }

    pub fn tier(&self, difficulty: Difficulty) -> &[Question] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn tier_mut(&mut self, difficulty: Difficulty) -> &mut Vec<Question> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Question counts per tier, in canonical order.
    pub fn counts(&self) -> [(Difficulty, usize); 3] {
        Difficulty::ALL.map(|d| (d, self.tier(d).len()))
    }

    /// Built-in curriculum questions loaded into `difficulty`.
    pub fn builtin_count(&self, difficulty: Difficulty) -> usize {
        self.builtin[slot(difficulty)]
    }

    /// Custom questions that passed validation and sit in `difficulty`.
    pub fn custom_count(&self, difficulty: Difficulty) -> usize {
        self.tier(difficulty).len() - self.builtin_count(difficulty)
    }

    /// Sample an exam using the thread-local RNG.
    pub fn sample_exam(&self, per_level: usize) -> Result<Vec<Question>, ExamError> {
        self.sample_exam_with(&mut rand::thread_rng(), per_level)
    }

    /// Draw `per_level` questions per tier without replacement, then shuffle
    /// the combined set so the tier is not inferable from position.
    ///
    /// All tiers are checked before anything is drawn.
    pub fn sample_exam_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        per_level: usize,
    ) -> Result<Vec<Question>, ExamError> {
        for difficulty in Difficulty::ALL {
            let available = self.tier(difficulty).len();
            if available < per_level {
                return Err(ExamError::InsufficientQuestions {
                    difficulty,
                    available,
                    required: per_level,
                });
            }
        }

        let mut questions = Vec::with_capacity(per_level * Difficulty::ALL.len());
        for difficulty in Difficulty::ALL {
            questions.extend(
                self.tier(difficulty)
                    .choose_multiple(&mut *rng, per_level)
                    .cloned(),
            );
        }
        questions.shuffle(&mut *rng);

        tracing::debug!(per_level, total = questions.len(), "sampled exam");
        Ok(questions)
    }
}

fn slot(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Easy => 0,
        Difficulty::Medium => 1,
        Difficulty::Hard => 2,
    }
}

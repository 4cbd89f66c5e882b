//! Core data model types for quizforge.
//!
//! Difficulty tiers, questions and per-tier answer statistics. Everything
//! else in the system (sessions, scoring, reports) is built on these.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuestionError;

/// Number of choices every question carries.
pub const CHOICE_COUNT: usize = 4;

/// Difficulty tier of a question.
///
/// The derived ordering is the canonical order `easy < medium < hard`, which
/// is also the tie-break order used by weak-area analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All tiers in canonical order.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Point weight of a question in this tier.
    pub fn weight(self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// An immutable multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    text: String,
    choices: [String; CHOICE_COUNT],
    correct_answer: String,
    difficulty: Difficulty,
}

impl Question {
    /// Build a question, checking that the text and every choice are
    /// non-empty and that the answer is one of the choices.
    pub fn new(
        text: impl Into<String>,
        choices: [String; CHOICE_COUNT],
        correct_answer: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let correct_answer = correct_answer.into();

        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if let Some(position) = choices.iter().position(|c| c.trim().is_empty()) {
            return Err(QuestionError::EmptyChoice { position });
        }
        if !choices.contains(&correct_answer) {
            return Err(QuestionError::AnswerNotAmongChoices {
                answer: correct_answer,
            });
        }

        Ok(Self {
            text,
            choices,
            correct_answer,
            difficulty,
        })
    }

    /// Build a question from a loosely-typed choice list, as found in
    /// persisted custom question collections.
    pub fn from_parts(
        text: impl Into<String>,
        choices: Vec<String>,
        correct_answer: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let found = choices.len();
        let choices: [String; CHOICE_COUNT] = choices
            .try_into()
            .map_err(|_| QuestionError::WrongChoiceCount { found })?;
        Self::new(text, choices, correct_answer, difficulty)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn choices(&self) -> &[String; CHOICE_COUNT] {
        &self.choices
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Point weight of this question.
    pub fn weight(&self) -> u32 {
        self.difficulty.weight()
    }

    /// Whether the choice at `index` is the correct answer. Out-of-range
    /// indices are never correct.
    pub fn is_correct_choice(&self, index: usize) -> bool {
        self.choices
            .get(index)
            .is_some_and(|choice| *choice == self.correct_answer)
    }
}

/// Correct/wrong tallies for one difficulty tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyStats {
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub wrong: u32,
}

impl DifficultyStats {
    pub fn answered(&self) -> u32 {
        self.correct + self.wrong
    }

    /// Accuracy in percent, or `None` when nothing was answered.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.answered();
        if total == 0 {
            None
        } else {
            Some(self.correct as f64 / total as f64 * 100.0)
        }
    }
}

/// Per-tier statistics for a session or a stored result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyBreakdown {
    #[serde(default)]
    pub easy: DifficultyStats,
    #[serde(default)]
    pub medium: DifficultyStats,
    #[serde(default)]
    pub hard: DifficultyStats,
}

impl DifficultyBreakdown {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyStats {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    pub fn get_mut(&mut self, difficulty: Difficulty) -> &mut DifficultyStats {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Tiers and their stats in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, &DifficultyStats)> + '_ {
        Difficulty::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    pub fn total_answered(&self) -> u32 {
        self.iter().map(|(_, s)| s.answered()).sum()
    }
}

/// Coarse competency bucket derived from the weighted point percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelLabel {
    Beginner,
    Intermediate,
    Advanced,
}

impl LevelLabel {
    /// `Beginner` below 40%, `Intermediate` below 70%, `Advanced` otherwise.
    pub fn from_point_percent(point_percent: f64) -> Self {
        if point_percent < 40.0 {
            LevelLabel::Beginner
        } else if point_percent < 70.0 {
            LevelLabel::Intermediate
        } else {
            LevelLabel::Advanced
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LevelLabel::Beginner => "Beginner",
            LevelLabel::Intermediate => "Intermediate",
            LevelLabel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for LevelLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LevelLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(LevelLabel::Beginner),
            "Intermediate" => Ok(LevelLabel::Intermediate),
            "Advanced" => Ok(LevelLabel::Advanced),
            other => Err(format!("unknown level label: {other}")),
        }
    }
}

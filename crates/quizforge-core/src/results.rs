//! Persisted exam results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{DifficultyBreakdown, LevelLabel};

/// One finalized exam, as appended to a student's history.
///
/// Every field is defaulted on load so that older or hand-edited histories
/// still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultRecord {
    /// Session that produced this record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<Uuid>,
    /// When the exam was finalized.
    pub timestamp: DateTime<Utc>,
    pub correct_count: u32,
    pub wrong_count: u32,
    /// Share of answered questions that were correct.
    pub percent_correct: f64,
    pub answered_count: u32,
    pub total_questions: u32,
    pub points_earned: u32,
    pub max_points_possible: u32,
    /// Share of achievable weighted points that were earned.
    pub point_percent: f64,
    /// Stored as text so unknown labels survive a load/save cycle.
    pub level_label: String,
    pub difficulty_stats: DifficultyBreakdown,
    pub study_suggestions: Vec<String>,
    pub early_terminated: bool,
    /// Teacher supervising the exam.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<String>,
}

impl ResultRecord {
    /// The level label, if it is one of the known buckets.
    pub fn level(&self) -> Option<LevelLabel> {
        self.level_label.parse().ok()
    }
}

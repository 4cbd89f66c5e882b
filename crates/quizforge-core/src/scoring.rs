//! Scoring, weak-area analysis and study suggestions.
//!
//! Pure functions over a finalized [`SessionSnapshot`]. Nothing here fails:
//! empty denominators yield 0.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, DifficultyBreakdown, LevelLabel};
use crate::results::ResultRecord;
use crate::session::SessionSnapshot;

/// Headline numbers for a finalized session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub correct: u32,
    pub wrong: u32,
    pub answered: u32,
    pub total_questions: u32,
    pub percent_correct: f64,
    pub points_earned: u32,
    pub max_points: u32,
    pub point_percent: f64,
    pub level: LevelLabel,
}

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Percentages and level label for a snapshot.
pub fn compute_summary(snapshot: &SessionSnapshot) -> ScoreSummary {
    let point_percent = percent(snapshot.points_earned, snapshot.max_points);
    ScoreSummary {
        correct: snapshot.correct,
        wrong: snapshot.wrong(),
        answered: snapshot.answered,
        total_questions: snapshot.total_questions,
        percent_correct: percent(snapshot.correct, snapshot.answered),
        points_earned: snapshot.points_earned,
        max_points: snapshot.max_points,
        point_percent,
        level: LevelLabel::from_point_percent(point_percent),
    }
}

/// Outcome of weak-area analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeakArea {
    /// Nothing answered, or every answered tier scored the same.
    NoData,
    /// The answered tier with the lowest accuracy.
    Weakest {
        difficulty: Difficulty,
        accuracy: f64,
        answered: u32,
    },
}

impl WeakArea {
    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            WeakArea::NoData => None,
            WeakArea::Weakest { difficulty, .. } => Some(*difficulty),
        }
    }
}

fn remediation_hint(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "It would help to reinforce the fundamentals.",
        Difficulty::Medium => {
            "Practice intermediate topics (loops, functions, collections) a bit more."
        }
        Difficulty::Hard => {
            "Struggling with advanced topics (OOP, generators, async, higher-order functions) is normal; it comes with time."
        }
    }
}

impl fmt::Display for WeakArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeakArea::NoData => write!(
                f,
                "No level analysis is possible: no questions were answered or every level scored the same."
            ),
            WeakArea::Weakest {
                difficulty,
                accuracy,
                answered,
            } => write!(
                f,
                "Your weakest level: {difficulty} (accuracy: {accuracy:.2}%, {answered} questions). {}",
                remediation_hint(*difficulty)
            ),
        }
    }
}

/// Find the answered tier with the lowest accuracy.
///
/// Ties go to the first tier in canonical order (easy, medium, hard). When
/// two or more tiers were answered and all share one accuracy there is no
/// weak area.
pub fn analyze_weak_area(stats: &DifficultyBreakdown) -> WeakArea {
    let answered: Vec<(Difficulty, f64, u32)> = stats
        .iter()
        .filter_map(|(d, s)| s.accuracy().map(|acc| (d, acc, s.answered())))
        .collect();

    let Some(&first) = answered.first() else {
        return WeakArea::NoData;
    };
    if answered.len() > 1 && answered.iter().all(|(_, acc, _)| *acc == first.1) {
        return WeakArea::NoData;
    }

    let (difficulty, accuracy, answered) = answered
        .into_iter()
        .fold(first, |weakest, tier| if tier.1 < weakest.1 { tier } else { weakest });

    WeakArea::Weakest {
        difficulty,
        accuracy,
        answered,
    }
}

fn level_topics(level: LevelLabel) -> &'static [&'static str] {
    match level {
        LevelLabel::Beginner => &[
            "Basic data types: int, float, str, bool",
            "Comparison and logical operators",
            "Conditionals: if / elif / else",
            "Basic loops: for and while",
            "List and dict basics",
        ],
        LevelLabel::Intermediate => &[
            "Writing functions and parameters (including defaults)",
            "Practice with list, dict, set and tuple",
            "List comprehensions and basic lambdas",
            "Error handling with try / except",
            "File I/O and the with statement",
        ],
        LevelLabel::Advanced => &[
            "Object-oriented programming: class, __init__, inheritance",
            "Generators and iterators, using yield",
            "Decorators and advanced functional programming",
            "Asynchronous programming: async / await",
            "Virtual environments and package management (pip)",
        ],
    }
}

fn tier_topics(difficulty: Difficulty) -> &'static [&'static str] {
    match difficulty {
        Difficulty::Easy => &[
            "Variable declaration and naming rules",
            "Basic arithmetic and operator precedence",
            "Practice with simple loop examples",
        ],
        Difficulty::Medium => &[
            "List/dict operations (append, pop, insert, keys, ...)",
            "Review range, enumerate, map and filter",
            "String slicing and formatting (format, f-strings)",
        ],
        Difficulty::Hard => &[
            "Study decorator and context manager examples",
            "Review the PEP 8 style guide",
            "Look at OOP design in real projects",
        ],
    }
}

/// Topics for the level, then topics for the weak tier; duplicates keep
/// their first position.
pub fn build_study_suggestions(level: LevelLabel, stats: &DifficultyBreakdown) -> Vec<String> {
    let weak_topics = analyze_weak_area(stats)
        .difficulty()
        .map(tier_topics)
        .unwrap_or_default();

    let mut seen = HashSet::new();
    level_topics(level)
        .iter()
        .chain(weak_topics)
        .filter(|topic| seen.insert(**topic))
        .map(|topic| topic.to_string())
        .collect()
}

/// Everything the caller shows once an exam ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamOutcome {
    pub summary: ScoreSummary,
    pub weak_area: WeakArea,
    pub record: ResultRecord,
}

/// Score a snapshot into the record that gets appended to the history.
pub fn score_session(
    snapshot: &SessionSnapshot,
    teacher_id: Option<&str>,
    timestamp: DateTime<Utc>,
) -> ExamOutcome {
    let summary = compute_summary(snapshot);
    let weak_area = analyze_weak_area(&snapshot.stats);
    let study_suggestions = build_study_suggestions(summary.level, &snapshot.stats);

    let record = ResultRecord {
        session_id: Some(snapshot.session_id),
        timestamp,
        correct_count: summary.correct,
        wrong_count: summary.wrong,
        percent_correct: summary.percent_correct,
        answered_count: summary.answered,
        total_questions: summary.total_questions,
        points_earned: summary.points_earned,
        max_points_possible: summary.max_points,
        point_percent: summary.point_percent,
        level_label: summary.level.to_string(),
        difficulty_stats: snapshot.stats,
        study_suggestions,
        early_terminated: snapshot.early_terminated,
        teacher_id: teacher_id.map(str::to_string),
    };

    ExamOutcome {
        summary,
        weak_area,
        record,
    }
}

//! Cross-student aggregation: summaries, leaderboards and level counts.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::LevelLabel;
use crate::repository::ResultsRepository;
use crate::results::ResultRecord;

/// Headline numbers for one student's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSummary {
    pub student_id: String,
    pub total_exams: usize,
    pub last_exam_at: DateTime<Utc>,
    pub best_points: u32,
    /// Mean of `percent_correct` across all exams.
    pub avg_percent: f64,
    pub last_level_label: String,
}

/// Summarize a history; `None` when it is empty.
pub fn student_summary(student_id: &str, history: &[ResultRecord]) -> Option<StudentSummary> {
    let last = history.last()?;
    let total_exams = history.len();
    let best_points = history.iter().map(|r| r.points_earned).max().unwrap_or(0);
    let avg_percent =
        history.iter().map(|r| r.percent_correct).sum::<f64>() / total_exams as f64;

    Some(StudentSummary {
        student_id: student_id.to_string(),
        total_exams,
        last_exam_at: last.timestamp,
        best_points,
        avg_percent,
        last_level_label: last.level_label.clone(),
    })
}

/// How many students sit in each level bucket, by their latest exam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDistribution {
    pub beginner: usize,
    pub intermediate: usize,
    pub advanced: usize,
    /// Labels that are not one of the known buckets.
    pub other: usize,
}

impl LevelDistribution {
    pub fn record(&mut self, label: &str) {
        match label.parse::<LevelLabel>() {
            Ok(LevelLabel::Beginner) => self.beginner += 1,
            Ok(LevelLabel::Intermediate) => self.intermediate += 1,
            Ok(LevelLabel::Advanced) => self.advanced += 1,
            Err(_) => self.other += 1,
        }
    }

    /// Bucket names and counts, in display order.
    pub fn buckets(&self) -> [(&'static str, usize); 4] {
        [
            ("Beginner", self.beginner),
            ("Intermediate", self.intermediate),
            ("Advanced", self.advanced),
            ("Other", self.other),
        ]
    }

    pub fn total(&self) -> usize {
        self.beginner + self.intermediate + self.advanced + self.other
    }
}

/// Summaries plus three independently sorted rankings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    /// Repository order.
    pub summaries: Vec<StudentSummary>,
    pub by_best_points: Vec<StudentSummary>,
    pub by_avg_percent: Vec<StudentSummary>,
    pub by_total_exams: Vec<StudentSummary>,
    pub level_distribution: LevelDistribution,
}

/// Result of aggregating the whole repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregateReport {
    NoStudents,
    Leaderboard(Leaderboard),
}

fn ranked<F>(summaries: &[StudentSummary], compare: F) -> Vec<StudentSummary>
where
    F: Fn(&StudentSummary, &StudentSummary) -> Ordering,
{
    let mut ranking = summaries.to_vec();
    // `sort_by` is stable, so equal keys keep repository order.
    ranking.sort_by(|a, b| compare(b, a));
    ranking
}

/// Build the teacher-facing report across every student.
pub fn aggregate_report(repository: &ResultsRepository) -> AggregateReport {
    let summaries: Vec<StudentSummary> = repository
        .histories()
        .iter()
        .filter_map(|h| student_summary(&h.student_id, &h.records))
        .collect();

    if summaries.is_empty() {
        return AggregateReport::NoStudents;
    }

    let mut level_distribution = LevelDistribution::default();
    for summary in &summaries {
        level_distribution.record(&summary.last_level_label);
    }

    AggregateReport::Leaderboard(Leaderboard {
        by_best_points: ranked(&summaries, |a, b| a.best_points.cmp(&b.best_points)),
        by_avg_percent: ranked(&summaries, |a, b| a.avg_percent.total_cmp(&b.avg_percent)),
        by_total_exams: ranked(&summaries, |a, b| a.total_exams.cmp(&b.total_exams)),
        level_distribution,
        summaries,
    })
}

/// Full record list for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StudentDetail {
    NoExams {
        student_id: String,
    },
    Records {
        student_id: String,
        records: Vec<ResultRecord>,
    },
}

pub fn student_detail(repository: &ResultsRepository, student_id: &str) -> StudentDetail {
    match repository.history(student_id) {
        Some(records) if !records.is_empty() => StudentDetail::Records {
            student_id: student_id.to_string(),
            records: records.to_vec(),
        },
        _ => StudentDetail::NoExams {
            student_id: student_id.to_string(),
        },
    }
}

//! Plain-text rendering of reports and exam results.

use chrono::{DateTime, Utc};

use quizforge_core::report::{AggregateReport, Leaderboard, StudentDetail, StudentSummary};
use quizforge_core::results::ResultRecord;
use quizforge_core::scoring::ExamOutcome;

const RULE_WIDE: usize = 60;
const RULE_NARROW: usize = 50;

pub const NO_STUDENTS: &str = "No students have taken an exam yet.";

fn format_time(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn rule(width: usize) -> String {
    "-".repeat(width)
}

/// Teacher overview: per-student blocks, three rankings and the level
/// distribution.
pub fn render_aggregate_report(report: &AggregateReport) -> String {
    match report {
        AggregateReport::NoStudents => NO_STUDENTS.to_string(),
        AggregateReport::Leaderboard(board) => render_leaderboard(board),
    }
}

fn render_leaderboard(board: &Leaderboard) -> String {
    let mut out = String::new();
    out.push_str("TEACHER REPORT\n\n");

    out.push_str("[Student summaries]\n");
    out.push_str(&rule(RULE_WIDE));
    out.push('\n');
    for s in &board.summaries {
        out.push_str(&format!("Student: {}\n", s.student_id));
        out.push_str(&format!("  Exams taken    : {}\n", s.total_exams));
        out.push_str(&format!("  Last exam      : {}\n", format_time(&s.last_exam_at)));
        out.push_str(&format!("  Best points    : {}\n", s.best_points));
        out.push_str(&format!("  Average score  : {:.2}%\n", s.avg_percent));
        out.push_str(&format!("  Last level     : {}\n", s.last_level_label));
        out.push_str(&rule(RULE_WIDE));
        out.push('\n');
    }

    render_ranking(&mut out, "Ranking by best points", &board.by_best_points, |s| {
        format!("Best points: {}", s.best_points)
    });
    render_ranking(&mut out, "Ranking by average score", &board.by_avg_percent, |s| {
        format!("Average: {:.2}%", s.avg_percent)
    });
    render_ranking(&mut out, "Most exams taken", &board.by_total_exams, |s| {
        format!("Exams: {}", s.total_exams)
    });

    out.push_str("\n[Level distribution by latest exam]\n");
    out.push_str(&rule(RULE_WIDE));
    out.push('\n');
    for (label, count) in board.level_distribution.buckets() {
        let noun = if count == 1 { "student" } else { "students" };
        out.push_str(&format!("{label:<12}: {count} {noun}\n"));
    }

    out.trim_end().to_string()
}

fn render_ranking<F>(out: &mut String, title: &str, ranking: &[StudentSummary], metric: F)
where
    F: Fn(&StudentSummary) -> String,
{
    out.push_str(&format!("\n[{title}]\n"));
    out.push_str(&rule(RULE_WIDE));
    out.push('\n');
    for (i, s) in ranking.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}) {:<20}  {}  | Last level: {}\n",
            i + 1,
            s.student_id,
            metric(s),
            s.last_level_label
        ));
    }
}

/// One student's full history as numbered exam blocks.
pub fn render_student_detail(detail: &StudentDetail) -> String {
    let (student_id, records) = match detail {
        StudentDetail::NoExams { student_id } => {
            return format!("{student_id} has no recorded exams.");
        }
        StudentDetail::Records {
            student_id,
            records,
        } => (student_id, records),
    };

    let mut out = String::new();
    out.push_str(&format!("STUDENT REPORT - {student_id}\n"));
    out.push_str(&"=".repeat(RULE_NARROW));
    out.push('\n');
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!("\n--- Exam #{} ---\n", i + 1));
        render_record(&mut out, record);
        out.push_str(&rule(RULE_NARROW));
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn render_record(out: &mut String, r: &ResultRecord) {
    out.push_str(&format!("Date            : {}\n", format_time(&r.timestamp)));
    out.push_str(&format!("Correct / wrong : {} / {}\n", r.correct_count, r.wrong_count));
    out.push_str(&format!("Answered        : {} / {}\n", r.answered_count, r.total_questions));
    out.push_str(&format!("Score           : {:.2}%\n", r.percent_correct));
    out.push_str(&format!(
        "Points          : {}/{} ({:.2}%)\n",
        r.points_earned, r.max_points_possible, r.point_percent
    ));
    if !r.level_label.is_empty() {
        out.push_str(&format!("Level           : {}\n", r.level_label));
    }
    if r.early_terminated {
        out.push_str("Note            : this exam ended early.\n");
    }
    if let Some(teacher) = r.teacher_id.as_deref().filter(|t| !t.is_empty()) {
        out.push_str(&format!("Teacher         : {teacher}\n"));
    }
}

/// Result screen shown to the student after an exam.
pub fn render_exam_outcome(student_id: &str, outcome: &ExamOutcome) -> String {
    let summary = &outcome.summary;
    let record = &outcome.record;
    let mut out = String::new();

    out.push_str("EXAM SUMMARY\n");
    out.push_str(&format!(
        "Student: {student_id} | Date: {} | Level: {}\n",
        format_time(&record.timestamp),
        summary.level
    ));
    out.push_str(&format!(
        "Questions: {}/{} | Correct: {} | Wrong: {} | Score: {:.2}% | Points: {}/{} ({:.2}%)\n",
        summary.answered,
        summary.total_questions,
        summary.correct,
        summary.wrong,
        summary.percent_correct,
        summary.points_earned,
        summary.max_points,
        summary.point_percent
    ));
    if record.early_terminated {
        out.push_str("The exam ended before every question was answered.\n");
    }

    out.push_str("\nPer-level statistics:\n");
    let mut any = false;
    for (difficulty, stats) in record.difficulty_stats.iter() {
        if let Some(accuracy) = stats.accuracy() {
            any = true;
            out.push_str(&format!(
                "{:<6} -> correct: {}, wrong: {} (accuracy: {accuracy:.2}%)\n",
                difficulty.as_str(),
                stats.correct,
                stats.wrong
            ));
        }
    }
    if !any {
        out.push_str("No data.\n");
    }

    out.push_str("\nWeak area:\n");
    out.push_str(&format!("{}\n", outcome.weak_area));

    out.push_str("\nSuggested topics:\n");
    for suggestion in &record.study_suggestions {
        out.push_str(&format!("- {suggestion}\n"));
    }

    out.trim_end().to_string()
}

//! HTML report generator.
//!
//! Produces a self-contained HTML leaderboard page with all CSS/JS inlined.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use quizforge_core::report::{AggregateReport, LevelDistribution, StudentSummary};

use crate::text::NO_STUDENTS;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML leaderboard page.
pub fn generate_html(report: &AggregateReport, generated_at: DateTime<Utc>) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>quizforge report</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    let board = match report {
        AggregateReport::NoStudents => {
            html.push_str("<header>\n<h1>quizforge report</h1>\n");
            html.push_str(&format!(
                "<p class=\"meta\">{}</p>\n</header>\n",
                generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            html.push_str(&format!("<p class=\"empty\">{}</p>\n", html_escape(NO_STUDENTS)));
            html.push_str("</body>\n</html>");
            return html;
        }
        AggregateReport::Leaderboard(board) => board,
    };

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>quizforge report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} students | {} exams | {}</p>\n",
        board.summaries.len(),
        board.summaries.iter().map(|s| s.total_exams).sum::<usize>(),
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Student summary table
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Students</h2>\n");
    html.push_str("<table class=\"summary\" id=\"students\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Student</th><th onclick=\"sortTable(1)\">Exams</th><th onclick=\"sortTable(2)\">Last exam</th><th onclick=\"sortTable(3)\">Best points</th><th onclick=\"sortTable(4)\">Average</th><th onclick=\"sortTable(5)\">Last level</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for s in &board.summaries {
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
            level_class(&s.last_level_label),
            html_escape(&s.student_id),
            s.total_exams,
            s.last_exam_at.format("%Y-%m-%d %H:%M"),
            s.best_points,
            s.avg_percent,
            html_escape(&s.last_level_label),
        ));
    }
    html.push_str("</tbody></table>\n");

    // SVG bar chart of average scores, in ranking order
    html.push_str(&generate_bar_chart(&board.by_avg_percent));
    html.push_str("</section>\n");

    // Rankings
    html.push_str("<section class=\"rankings\">\n");
    html.push_str("<h2>Rankings</h2>\n");
    html.push_str(&ranking_list("Best points", &board.by_best_points, |s| {
        s.best_points.to_string()
    }));
    html.push_str(&ranking_list("Average score", &board.by_avg_percent, |s| {
        format!("{:.2}%", s.avg_percent)
    }));
    html.push_str(&ranking_list("Most exams", &board.by_total_exams, |s| {
        s.total_exams.to_string()
    }));
    html.push_str("</section>\n");

    html.push_str(&distribution_table(&board.level_distribution));

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(
    report: &AggregateReport,
    generated_at: DateTime<Utc>,
    path: &Path,
) -> Result<()> {
    let html = generate_html(report, generated_at);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn level_class(label: &str) -> &'static str {
    match label {
        "Advanced" => "advanced",
        "Intermediate" => "intermediate",
        "Beginner" => "beginner",
        _ => "other",
    }
}

fn ranking_list<F>(title: &str, ranking: &[StudentSummary], metric: F) -> String
where
    F: Fn(&StudentSummary) -> String,
{
    let mut html = format!("<h3>{}</h3>\n<ol>\n", html_escape(title));
    for s in ranking {
        html.push_str(&format!(
            "  <li><strong>{}</strong> {} <span class=\"meta\">({})</span></li>\n",
            html_escape(&s.student_id),
            html_escape(&metric(s)),
            html_escape(&s.last_level_label),
        ));
    }
    html.push_str("</ol>\n");
    html
}

fn distribution_table(distribution: &LevelDistribution) -> String {
    let mut html = String::from("<section class=\"distribution\">\n<h2>Level distribution</h2>\n");
    html.push_str("<table>\n<thead><tr><th>Level</th><th>Students</th></tr></thead>\n<tbody>\n");
    for (label, count) in distribution.buckets() {
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{label}</td><td>{count}</td></tr>\n",
            level_class(label)
        ));
    }
    html.push_str("</tbody></table>\n</section>\n");
    html
}

fn generate_bar_chart(ranking: &[StudentSummary]) -> String {
    let bar_height = 30;
    let max_width = 400;
    let padding = 10;
    let label_width = 200;

    let total_height = ranking.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, s) in ranking.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let score = (s.avg_percent / 100.0).clamp(0.0, 1.0);
        let width = (score * max_width as f64) as usize;

        let color = if s.avg_percent >= 70.0 {
            "#22c55e"
        } else if s.avg_percent >= 40.0 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&s.student_id)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            s.avg_percent
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --advanced: #dcfce7; --intermediate: #fef9c3; --beginner: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --advanced: #064e3b; --intermediate: #713f12; --beginner: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.empty { font-style: italic; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.advanced { background: var(--advanced); }
.intermediate { background: var(--intermediate); }
.beginner { background: var(--beginner); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('students');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

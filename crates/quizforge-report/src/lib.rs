//! quizforge-report: Report rendering.
//!
//! Plain-text result screens and teacher reports, JSON export, and a
//! self-contained HTML leaderboard page.

pub mod html;
pub mod json;
pub mod text;

pub use html::{generate_html, write_html_report};
pub use json::{render_json, write_json_report};
pub use text::{render_aggregate_report, render_exam_outcome, render_student_detail};

//! quizforge-core: Exam sessions, scoring and result reporting.
//!
//! This crate defines the data model, the question bank, the timed exam
//! session state machine, scoring and weak-area analysis, the append-only
//! result history, and cross-student aggregation. Persistence goes through
//! the [`traits::DocumentStore`] seam.

pub mod bank;
pub mod curriculum;
pub mod engine;
pub mod error;
pub mod model;
pub mod report;
pub mod repository;
pub mod results;
pub mod scoring;
pub mod session;
pub mod traits;

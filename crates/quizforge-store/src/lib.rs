//! quizforge-store: Configuration and file-backed persistence.
//!
//! Loads `quizforge.toml` and builds the [`DocumentStore`] the exam engine
//! reads questions and results from.
//!
//! [`DocumentStore`]: quizforge_core::traits::DocumentStore

pub mod config;
pub mod json_file;

pub use config::{create_store, load_config, load_config_from, QuizforgeConfig, StoreConfig};
pub use json_file::JsonFileStore;

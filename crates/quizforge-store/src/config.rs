//! Configuration loading and store factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizforge_core::bank::DEFAULT_PER_LEVEL;
use quizforge_core::engine::{ExamDuration, ExamEngineConfig};
use quizforge_core::traits::{DocumentStore, MemoryStore};

use crate::json_file::JsonFileStore;

/// Environment variable overriding the JSON data directory.
pub const DATA_DIR_ENV: &str = "QUIZFORGE_DATA_DIR";

/// Where questions and results are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// One pretty-printed `<collection>.json` file per collection.
    Json {
        #[serde(default = "default_data_dir")]
        data_dir: PathBuf,
    },
    /// Nothing survives the process.
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Json {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./quizforge-data")
}

/// Top-level quizforge configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizforgeConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Questions drawn from each difficulty tier.
    #[serde(default = "default_per_level")]
    pub questions_per_level: usize,
    /// Default exam time limit in minutes; absent or 0 means unlimited.
    #[serde(default)]
    pub exam_minutes: Option<u32>,
    /// Output directory for HTML reports.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
}

fn default_per_level() -> usize {
    DEFAULT_PER_LEVEL
}
fn default_report_dir() -> PathBuf {
    PathBuf::from("./quizforge-reports")
}

impl Default for QuizforgeConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            questions_per_level: default_per_level(),
            exam_minutes: None,
            report_dir: default_report_dir(),
        }
    }
}

impl QuizforgeConfig {
    /// Engine settings derived from this config.
    pub fn engine_config(&self) -> ExamEngineConfig {
        ExamEngineConfig {
            questions_per_level: self.questions_per_level,
            exam_duration: ExamDuration::from_minutes(self.exam_minutes),
        }
    }

    /// Apply a data directory override and resolve `${VAR}` references.
    fn finish(mut self, data_dir_override: Option<String>) -> Self {
        if let Some(dir) = data_dir_override.filter(|d| !d.is_empty()) {
            self.store = StoreConfig::Json {
                data_dir: PathBuf::from(dir),
            };
        }
        if let StoreConfig::Json { data_dir } = &mut self.store {
            *data_dir = PathBuf::from(resolve_env_vars(&data_dir.to_string_lossy()));
        }
        self
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables resolve to the empty string. Substituted values are
/// inserted as-is and never expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizforge.toml` in the current directory
/// 2. `~/.config/quizforge/config.toml`
///
/// `QUIZFORGE_DATA_DIR` overrides the store with a JSON store in that directory.
pub fn load_config() -> Result<QuizforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizforgeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config_file(&path)?
        }
        None => QuizforgeConfig::default(),
    };

    Ok(config.finish(std::env::var(DATA_DIR_ENV).ok()))
}

fn parse_config_file(path: &Path) -> Result<QuizforgeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<QuizforgeConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizforge"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Box<dyn DocumentStore> {
    match config {
        StoreConfig::Json { data_dir } => Box::new(JsonFileStore::new(data_dir)),
        StoreConfig::Memory => Box::new(MemoryStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZFORGE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZFORGE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZFORGE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_${unterminated"), "no_${unterminated");
        std::env::remove_var("_QUIZFORGE_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_expand_values() {
        std::env::set_var("_QUIZFORGE_SELF_REF", "${_QUIZFORGE_SELF_REF}");
        assert_eq!(
            resolve_env_vars("/data/${_QUIZFORGE_SELF_REF}/x"),
            "/data/${_QUIZFORGE_SELF_REF}/x"
        );
        assert_eq!(
            resolve_env_vars("${_QUIZFORGE_SELF_REF}${_QUIZFORGE_UNSET_VAR}"),
            "${_QUIZFORGE_SELF_REF}"
        );
        std::env::remove_var("_QUIZFORGE_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = QuizforgeConfig::default();
        assert_eq!(config.questions_per_level, 5);
        assert_eq!(config.exam_minutes, None);
        assert_eq!(
            config.store,
            StoreConfig::Json {
                data_dir: PathBuf::from("./quizforge-data")
            }
        );
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
questions_per_level = 3
exam_minutes = 20
report_dir = "out"

[store]
type = "json"
data_dir = "/srv/quiz"
"#;
        let config: QuizforgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.questions_per_level, 3);
        assert_eq!(config.report_dir, PathBuf::from("out"));
        assert_eq!(
            config.store,
            StoreConfig::Json {
                data_dir: PathBuf::from("/srv/quiz")
            }
        );

        let engine = config.engine_config();
        assert_eq!(engine.questions_per_level, 3);
        assert_eq!(engine.exam_duration, ExamDuration::Minutes(20));
    }

    #[test]
    fn parse_memory_store_and_defaults() {
        let config: QuizforgeConfig = toml::from_str("[store]\ntype = \"memory\"\n").unwrap();
        assert_eq!(config.store, StoreConfig::Memory);
        assert_eq!(config.questions_per_level, 5);
        assert_eq!(config.engine_config().exam_duration, ExamDuration::Unlimited);
    }

    #[test]
    fn json_store_without_dir_uses_default() {
        let config: QuizforgeConfig = toml::from_str("[store]\ntype = \"json\"\n").unwrap();
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn data_dir_override_replaces_store() {
        let config = QuizforgeConfig {
            store: StoreConfig::Memory,
            ..Default::default()
        }
        .finish(Some("/tmp/elsewhere".into()));
        assert_eq!(
            config.store,
            StoreConfig::Json {
                data_dir: PathBuf::from("/tmp/elsewhere")
            }
        );
    }

    #[test]
    fn empty_override_is_ignored() {
        let config = QuizforgeConfig::default().finish(Some(String::new()));
        assert_eq!(config.store, StoreConfig::default());
    }

    #[test]
    fn data_dir_resolves_env_vars() {
        std::env::set_var("_QUIZFORGE_TEST_ROOT", "/var/lib");
        let config = QuizforgeConfig {
            store: StoreConfig::Json {
                data_dir: PathBuf::from("${_QUIZFORGE_TEST_ROOT}/quiz"),
            },
            ..Default::default()
        }
        .finish(None);
        assert_eq!(
            config.store,
            StoreConfig::Json {
                data_dir: PathBuf::from("/var/lib/quiz")
            }
        );
        std::env::remove_var("_QUIZFORGE_TEST_ROOT");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizforge.toml");
        std::fs::write(&path, "questions_per_level = 2\n[store]\ntype = \"memory\"\n").unwrap();

        let config = parse_config_file(&path).unwrap();
        assert_eq!(config.questions_per_level, 2);
        assert_eq!(config.store, StoreConfig::Memory);
    }

    #[test]
    fn malformed_config_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "questions_per_level = \"many\"").unwrap();

        let err = parse_config_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config"));
    }

    #[test]
    fn create_store_by_type() {
        assert_eq!(create_store(&StoreConfig::Memory).name(), "memory");
        let dir = tempfile::tempdir().unwrap();
        let store = create_store(&StoreConfig::Json {
            data_dir: dir.path().to_path_buf(),
        });
        assert_eq!(store.name(), "json");
    }
}

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::analysis::AnalysisConfig;

/// Application configuration loaded from TOML config file.
/// All fields have sensible defaults — the config file is optional.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Takeout export to parse when `load` has no CLI argument.
    pub history_path: Option<PathBuf>,
    /// Custom event-cache path (overrides XDG default).
    pub cache_path: Option<PathBuf>,
    /// Maximum keywords returned by topic extraction. The analyzers reject
    /// 0 rather than clamping it.
    pub keyword_limit: usize,
    /// Default number of prompt variants (1-5).
    pub prompt_count: usize,
    /// Language share above which the two leading languages count as mixed.
    pub mood_closeness_threshold: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_path: None,
            cache_path: None,
            keyword_limit: 20,
            prompt_count: 3,
            mood_closeness_threshold: 0.30,
        }
    }
}

impl AppConfig {
    /// Load config from `~/.config/rewind/config.toml`.
    /// Returns default config if file doesn't exist.
    /// Logs a warning if the file exists but can't be parsed.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match config_path {
            Some(path) if path.exists() => {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => {
                        match toml::from_str::<AppConfig>(&contents) {
                            Ok(config) => {
                                log::info!("Loaded config from {}", path.display());
                                config
                            }
                            Err(e) => {
                                log::warn!(
                                    "Failed to parse {}: {}. Using defaults.",
                                    path.display(),
                                    e
                                );
                                Self::default()
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!(
                            "Failed to read {}: {}. Using defaults.",
                            path.display(),
                            e
                        );
                        Self::default()
                    }
                }
            }
            _ => {
                log::debug!("No config file found, using defaults");
                Self::default()
            }
        }
    }

    /// The analyzer-facing view of this config.
    pub fn analysis(&self) -> AnalysisConfig {
        AnalysisConfig {
            keyword_limit: self.keyword_limit,
            prompt_count: self.prompt_count,
            mood_closeness_threshold: self.mood_closeness_threshold,
        }
    }

    /// Get the config file path.
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", crate::APP_NAME)
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

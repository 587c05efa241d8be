//! Process-wide session: the loaded event sequence plus memoized derived
//! results, with a plain serde_json cache on disk.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

use crate::analysis::{self, AnalysisError};
use crate::models::{TopicAnalysis, WatchEvent};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cache format error: {0}")]
    Format(#[from] serde_json::Error),
}

/// Owns the currently loaded sequence. Analyzers never see this type —
/// they take immutable event slices — so the session is the single place
/// where mutation happens.
#[derive(Debug, Default)]
pub struct Session {
    events: Vec<WatchEvent>,
    // Topic extraction feeds several downstream views; memoized per limit.
    topics: Option<(usize, TopicAnalysis)>,
}

impl Session {
    pub fn new(events: Vec<WatchEvent>) -> Self {
        Self {
            events,
            topics: None,
        }
    }

    pub fn events(&self) -> &[WatchEvent] {
        &self.events
    }

    /// Replace the loaded sequence, dropping all memoized results.
    pub fn load(&mut self, events: Vec<WatchEvent>) {
        self.events = events;
        self.topics = None;
    }

    /// Explicit reset: empty sequence, no derived artifacts.
    pub fn clear(&mut self) {
        self.load(Vec::new());
    }

    /// Topic analysis for the loaded sequence, recomputed only when the
    /// keyword limit changes or after a load/clear.
    pub fn topics(&mut self, limit: usize) -> Result<TopicAnalysis, AnalysisError> {
        if let Some((memo_limit, memo)) = &self.topics {
            if *memo_limit == limit {
                return Ok(memo.clone());
            }
        }
        let topics = analysis::topics::extract(&self.events, limit)?;
        self.topics = Some((limit, topics.clone()));
        Ok(topics)
    }

    /// Persist the event sequence as JSON. The round trip reproduces the
    /// identical sequence.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.events)?;
        fs::write(path, json)?;
        log::info!("cached {} events to {}", self.events.len(), path.display());
        Ok(())
    }

    /// Load a session from a cache file written by [`Session::save`].
    pub fn load_from(path: &Path) -> Result<Self, CacheError> {
        let contents = fs::read_to_string(path)?;
        let events: Vec<WatchEvent> = serde_json::from_str(&contents)?;
        log::info!("loaded {} events from {}", events.len(), path.display());
        Ok(Self::new(events))
    }
}

/// Resolve the default cache path using the XDG data directory.
pub fn default_cache_path() -> PathBuf {
    if let Some(dirs) = ProjectDirs::from("", "", crate::APP_NAME) {
        dirs.data_dir().join("history.json")
    } else {
        // Fallback: current directory
        PathBuf::from("history.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn ev(title: &str, ts: &str) -> WatchEvent {
        WatchEvent {
            title: title.to_string(),
            channel: Some("Channel".to_string()),
            timestamp: ts.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    fn temp_cache(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rewind-test-{}-{name}.json", std::process::id()))
    }

    #[test]
    fn cache_round_trip_is_identity() {
        let events = vec![
            ev("lofi beats", "2024-01-01T23:00:00Z"),
            ev("재즈 피아노", "2024-01-02T00:30:00Z"),
        ];
        let path = temp_cache("roundtrip");
        Session::new(events.clone()).save(&path).unwrap();
        let reloaded = Session::load_from(&path).unwrap();
        assert_eq!(reloaded.events(), events.as_slice());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn topics_memoized_until_limit_changes() {
        let mut session = Session::new(vec![ev("lofi beats", "2024-01-01T23:00:00Z")]);
        let first = session.topics(20).unwrap();
        let second = session.topics(20).unwrap();
        assert_eq!(first.keywords, second.keywords);

        let narrower = session.topics(1).unwrap();
        assert_eq!(narrower.keywords.len(), 1);
    }

    #[test]
    fn clear_resets_events_and_memo() {
        let mut session = Session::new(vec![ev("lofi beats", "2024-01-01T23:00:00Z")]);
        session.topics(20).unwrap();
        session.clear();
        assert!(session.events().is_empty());
        assert!(session.topics(20).unwrap().keywords.is_empty());
    }

    #[test]
    fn load_replaces_previous_sequence() {
        let mut session = Session::new(vec![ev("lofi beats", "2024-01-01T23:00:00Z")]);
        session.topics(20).unwrap();
        session.load(vec![ev("elden ring gameplay", "2024-02-01T20:00:00Z")]);
        let topics = session.topics(20).unwrap();
        assert!(topics.keywords.iter().any(|(k, _)| k == "gameplay"));
        assert!(!topics.keywords.iter().any(|(k, _)| k == "lofi"));
    }

    #[test]
    fn missing_cache_is_an_io_error() {
        assert!(matches!(
            Session::load_from(Path::new("/nonexistent/history.json")),
            Err(CacheError::Io(_))
        ));
    }
}

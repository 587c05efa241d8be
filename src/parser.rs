//! Google Takeout watch-history.json parser.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::WatchEvent;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Export-specific framing on every video title.
const TITLE_PREFIX: &str = "Watched ";

/// Raw Takeout record. Unknown fields (titleUrl, products, ...) are ignored.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    header: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    subtitles: Vec<RawSubtitle>,
    #[serde(default)]
    time: String,
}

#[derive(Debug, Deserialize)]
struct RawSubtitle {
    #[serde(default)]
    name: String,
}

fn to_event(entry: RawEntry) -> Option<WatchEvent> {
    // YouTube Music shares the export format; anything else is a different product
    if entry.header != "YouTube" && entry.header != "YouTube Music" {
        return None;
    }
    let timestamp = match DateTime::parse_from_rfc3339(&entry.time) {
        Ok(t) => t.with_timezone(&Utc),
        Err(e) => {
            log::debug!("skipping entry with bad timestamp {:?}: {}", entry.time, e);
            return None;
        }
    };
    let title = entry
        .title
        .strip_prefix(TITLE_PREFIX)
        .unwrap_or(&entry.title)
        .to_string();
    let channel = entry
        .subtitles
        .into_iter()
        .next()
        .map(|s| s.name)
        .filter(|name| !name.is_empty());
    Some(WatchEvent {
        title,
        channel,
        timestamp,
    })
}

/// Parse a watch-history.json document already in memory.
pub fn parse_history_str(contents: &str) -> Result<Vec<WatchEvent>, ParseError> {
    let raw: Vec<RawEntry> = serde_json::from_str(contents)?;
    let total = raw.len();
    let events: Vec<WatchEvent> = raw.into_iter().filter_map(to_event).collect();
    log::info!("parsed {} events ({} entries skipped)", events.len(), total - events.len());
    Ok(events)
}

/// Parse a Google Takeout watch-history.json file.
pub fn parse_history(path: &Path) -> Result<Vec<WatchEvent>, ParseError> {
    let contents = fs::read_to_string(path)?;
    parse_history_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "header": "YouTube",
            "title": "Watched lofi beats to study to",
            "titleUrl": "https://www.youtube.com/watch?v=abc123",
            "subtitles": [{"name": "ChillHop", "url": "https://www.youtube.com/channel/x"}],
            "time": "2024-01-01T23:00:00Z",
            "products": ["YouTube"]
        },
        {
            "header": "YouTube Music",
            "title": "Watched 재즈 피아노",
            "time": "2024-01-02T00:30:00.123Z"
        },
        {
            "header": "Google Search",
            "title": "Searched for rust",
            "time": "2024-01-02T01:00:00Z"
        },
        {
            "header": "YouTube",
            "title": "Watched deleted video",
            "time": "not-a-timestamp"
        }
    ]"#;

    #[test]
    fn strips_watched_prefix_and_takes_first_subtitle() {
        let events = parse_history_str(SAMPLE).unwrap();
        assert_eq!(events[0].title, "lofi beats to study to");
        assert_eq!(events[0].channel.as_deref(), Some("ChillHop"));
    }

    #[test]
    fn keeps_youtube_music_and_skips_other_products() {
        let events = parse_history_str(SAMPLE).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].title, "재즈 피아노");
        assert_eq!(events[1].channel, None);
    }

    #[test]
    fn bad_timestamps_are_skipped_not_fatal() {
        let events = parse_history_str(SAMPLE).unwrap();
        assert!(events.iter().all(|e| e.title != "deleted video"));
    }

    #[test]
    fn title_without_prefix_passes_through() {
        let doc = r#"[{"header": "YouTube", "title": "raw title", "time": "2024-01-01T10:00:00Z"}]"#;
        let events = parse_history_str(doc).unwrap();
        assert_eq!(events[0].title, "raw title");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            parse_history_str("not json"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            parse_history(Path::new("/nonexistent/watch-history.json")),
            Err(ParseError::Io(_))
        ));
    }
}

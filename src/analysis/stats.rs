use std::collections::HashMap;

use crate::models::{ChannelStats, WatchEvent, WatchStats};

use super::temporal;

/// Overall history statistics, or None for an empty sequence.
pub fn watch_stats(events: &[WatchEvent]) -> Option<WatchStats> {
    let first = events.first()?;

    let mut channel_counts: HashMap<&str, usize> = HashMap::new();
    for event in events {
        if let Some(channel) = &event.channel {
            *channel_counts.entry(channel.as_str()).or_insert(0) += 1;
        }
    }
    let unique_channels = channel_counts.len();

    let mut top_channels: Vec<(&str, usize)> = channel_counts.into_iter().collect();
    top_channels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    top_channels.truncate(20);

    let mut start = first.timestamp;
    let mut end = first.timestamp;
    for event in events {
        start = start.min(event.timestamp);
        end = end.max(event.timestamp);
    }

    let days_span = (end - start).num_days().max(1);
    Some(WatchStats {
        total_videos: events.len(),
        unique_channels,
        date_range_start: start,
        date_range_end: end,
        top_channels: top_channels
            .into_iter()
            .map(|(ch, count)| (ch.to_string(), count))
            .collect(),
        videos_per_day_avg: events.len() as f64 / days_span as f64,
    })
}

/// Statistics for one channel, matched by case-insensitive substring.
/// Returns None when no attributed event matches.
pub fn channel_stats(events: &[WatchEvent], name: &str) -> Option<ChannelStats> {
    let needle = name.to_lowercase();
    let matched: Vec<WatchEvent> = events
        .iter()
        .filter(|event| {
            event
                .channel
                .as_deref()
                .is_some_and(|ch| ch.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    let channel = matched.first()?.channel.clone()?;

    let mut first_watched = matched.first()?.timestamp;
    let mut last_watched = first_watched;
    for event in &matched {
        first_watched = first_watched.min(event.timestamp);
        last_watched = last_watched.max(event.timestamp);
    }

    Some(ChannelStats {
        channel,
        total_videos: matched.len(),
        first_watched,
        last_watched,
        viewing_period_days: (last_watched - first_watched).num_days(),
        time_pattern: temporal::time_pattern(&matched),
    })
}

use std::collections::HashMap;

use crate::models::{DiversityMetric, WatchEvent};

// Concentration is always measured over the 5 highest-count channels.
const TOP_CHANNEL_CAP: usize = 5;

fn interpret(score: f64) -> &'static str {
    if score >= 70.0 {
        "Highly diverse"
    } else if score >= 50.0 {
        "Moderately diverse"
    } else if score >= 30.0 {
        "Focused viewer"
    } else {
        "Very focused"
    }
}

/// Shannon-entropy diversity over channel attribution. Events without a
/// channel are excluded from the computation, not treated as a channel.
///
/// The score is entropy normalized by its maximum for the observed number
/// of distinct channels, on a 0-100 scale. With fewer than two distinct
/// channels the score is 0 rather than undefined.
pub fn score(events: &[WatchEvent]) -> DiversityMetric {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for event in events {
        if let Some(channel) = &event.channel {
            *counts.entry(channel.as_str()).or_insert(0) += 1;
        }
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return DiversityMetric {
            overall_score: 0.0,
            channel_entropy: 0.0,
            top_channel_concentration: 0.0,
            unique_ratio: 0.0,
            interpretation: "insufficient data".to_string(),
        };
    }

    let distinct = counts.len();
    let entropy: f64 = counts
        .values()
        .map(|&count| {
            let p = count as f64 / total as f64;
            -p * p.log2()
        })
        .sum();

    let overall_score = if distinct > 1 {
        (entropy / (distinct as f64).log2() * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    let mut sorted: Vec<usize> = counts.values().copied().collect();
    sorted.sort_by(|a, b| b.cmp(a));
    let top_sum: usize = sorted.iter().take(TOP_CHANNEL_CAP).sum();
    let top_channel_concentration = top_sum as f64 / total as f64 * 100.0;

    let singletons = counts.values().filter(|&&c| c == 1).count();
    let unique_ratio = singletons as f64 / distinct as f64;

    DiversityMetric {
        overall_score,
        channel_entropy: entropy,
        top_channel_concentration,
        unique_ratio,
        interpretation: interpret(overall_score).to_string(),
    }
}

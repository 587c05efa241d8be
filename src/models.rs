use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One watched-video event, as produced by the Takeout parser.
/// The ordered sequence of these is the sole input to every analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchEvent {
    pub title: String,
    pub channel: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Script-based language classification of a single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Korean,
    English,
    Unknown,
}

/// A normalized (lowercased, synonym-folded) token from a video title.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedToken {
    pub text: String,
    pub language: Language,
}

/// Fixed content-category vocabulary. Categories are only ever produced by
/// the static keyword lookup table — never invented dynamically.
///
/// Variants are declared in alphabetical order of their display name so the
/// derived `Ord` matches the alphabetical tie-break used everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Education,
    Entertainment,
    Gaming,
    Music,
    Other,
    Tech,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Entertainment => "entertainment",
            Self::Gaming => "gaming",
            Self::Music => "music",
            Self::Other => "other",
            Self::Tech => "tech",
        }
    }

    /// Display name used when a phase is dominated by this category.
    pub fn phase_label(&self) -> &'static str {
        match self {
            Self::Education => "Study Period",
            Self::Entertainment => "Entertainment Binge",
            Self::Gaming => "Gaming Focus",
            Self::Music => "Music Exploration",
            Self::Other => "Mixed Viewing",
            Self::Tech => "Tech Learning",
        }
    }
}

/// Ranked keywords, per-language token counts, and inferred categories.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TopicAnalysis {
    /// (keyword, count) descending by count, ties lexicographic.
    pub keywords: Vec<(String, usize)>,
    pub language_breakdown: BTreeMap<Language, usize>,
    /// Top categories (at most 5), ranked by summed keyword frequency.
    pub categories: Vec<Category>,
}

/// Hour-of-day / day-of-week viewing pattern.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TimePattern {
    /// Top 3 hours by count, ties broken by ascending hour.
    pub peak_hours: Vec<u32>,
    /// Top 3 weekdays by count, ties broken by weekday order from Monday.
    pub peak_days: Vec<String>,
    /// Counts per hour of day, index 0-23.
    pub hourly_distribution: Vec<usize>,
    /// Counts per weekday, index 0 = Monday.
    pub daily_distribution: Vec<usize>,
    /// Fraction of events with hour in [0, 5).
    pub late_night_ratio: f64,
    /// Fraction of events on Saturday or Sunday.
    pub weekend_ratio: f64,
}

/// One calendar month of viewing.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrend {
    /// "YYYY-MM"
    pub month: String,
    pub video_count: usize,
    pub top_categories: Vec<Category>,
    pub top_channels: Vec<String>,
    /// Videos per day with at least one event in that month.
    pub avg_daily_videos: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

/// Monthly buckets plus the overall first-half/second-half trend.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub months: Vec<MonthlyTrend>,
    pub trend: Trend,
    /// Relative change of the second-half mean vs the first-half mean, in %.
    pub growth_percent: f64,
}

/// Fixed time-of-day slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    LateNight,
    Morning,
    Afternoon,
    Evening,
}

impl TimeSlot {
    pub const ALL: [TimeSlot; 4] = [
        Self::LateNight,
        Self::Morning,
        Self::Afternoon,
        Self::Evening,
    ];

    /// Slot containing the given hour of day (0-23).
    pub fn of_hour(hour: u32) -> Self {
        match hour {
            0..5 => Self::LateNight,
            5..12 => Self::Morning,
            12..18 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    pub fn hour_range(&self) -> &'static str {
        match self {
            Self::LateNight => "00:00-05:00",
            Self::Morning => "05:00-12:00",
            Self::Afternoon => "12:00-18:00",
            Self::Evening => "18:00-24:00",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LateNight => "late_night",
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }
}

/// What gets watched within one time-of-day slot.
#[derive(Debug, Clone, Serialize)]
pub struct SlotProfile {
    pub slot: TimeSlot,
    pub hour_range: &'static str,
    pub video_count: usize,
    pub top_categories: Vec<Category>,
    pub top_keywords: Vec<String>,
}

/// A maximal run of consecutive ISO weeks sharing the same dominant category.
#[derive(Debug, Clone, Serialize)]
pub struct Phase {
    /// First ISO week of the phase, "YYYY-Www".
    pub start_week: String,
    /// Last ISO week of the phase, "YYYY-Www".
    pub end_week: String,
    /// Empty when no week content was classifiable.
    pub dominant_categories: Vec<Category>,
    pub video_count: usize,
    pub label: String,
    pub description: String,
}

/// Shannon-entropy channel diversity metrics.
#[derive(Debug, Clone, Serialize)]
pub struct DiversityMetric {
    /// Normalized entropy on a 0-100 scale; 0 with fewer than two channels.
    pub overall_score: f64,
    pub channel_entropy: f64,
    /// Percentage of attributed videos from the 5 highest-count channels.
    pub top_channel_concentration: f64,
    /// Channels with exactly one video / total distinct channels.
    pub unique_ratio: f64,
    pub interpretation: String,
}

/// Per-channel statistics for the events matching one channel query.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelStats {
    /// Channel name of the first matching event.
    pub channel: String,
    pub total_videos: usize,
    pub first_watched: DateTime<Utc>,
    pub last_watched: DateTime<Utc>,
    /// Whole days between first and last watch; 0 for a single day.
    pub viewing_period_days: i64,
    pub time_pattern: TimePattern,
}

/// Overall watch-history statistics.
#[derive(Debug, Clone, Serialize)]
pub struct WatchStats {
    pub total_videos: usize,
    pub unique_channels: usize,
    pub date_range_start: DateTime<Utc>,
    pub date_range_end: DateTime<Utc>,
    /// Top 20 channels by video count.
    pub top_channels: Vec<(String, usize)>,
    pub videos_per_day_avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    Low,
    Medium,
    High,
}

impl Energy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguagePreference {
    Korean,
    English,
    Mixed,
}

impl LanguagePreference {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Korean => "korean",
            Self::English => "english",
            Self::Mixed => "mixed",
        }
    }
}

/// Compact categorical summary fused from topics, time patterns, and
/// diversity. Built once per analysis run; immutable.
#[derive(Debug, Clone, Serialize)]
pub struct TasteProfile {
    /// At most 3 genres, most frequent first.
    pub primary_genres: Vec<String>,
    /// At most 5 moods, ordered by source keyword frequency.
    pub mood_keywords: Vec<String>,
    pub energy_level: Energy,
    pub time_context: TimeSlot,
    pub language_preference: LanguagePreference,
}

/// One rendered music prompt. `full_prompt` never exceeds 200 characters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptVariant {
    pub label: String,
    pub style: String,
    pub mood: String,
    pub tempo_range: String,
    pub instruments: String,
    pub full_prompt: String,
}

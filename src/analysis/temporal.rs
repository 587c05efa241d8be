use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Timelike};

use crate::models::{
    MonthlyTrend, Phase, SlotProfile, TimePattern, TimeSlot, Trend, TrendReport, WatchEvent,
};

use super::topics;

const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// Relative change of the second-half monthly mean vs the first-half mean
// beyond which the trend stops being "stable".
const TREND_THRESHOLD: f64 = 0.10;

/// Sorted working copy. Input order is assumed chronological but not
/// guaranteed, so every time-windowed view sorts defensively first.
fn sorted_by_time(events: &[WatchEvent]) -> Vec<WatchEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.timestamp);
    sorted
}

/// Indices of `counts` with the highest values: descending by count, ties
/// broken by ascending index, zero-count entries never included.
fn top_indices(counts: &[usize], n: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..counts.len()).filter(|&i| counts[i] > 0).collect();
    indices.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));
    indices.truncate(n);
    indices
}

/// Hour-of-day and day-of-week histograms with peaks and ratios.
pub fn time_pattern(events: &[WatchEvent]) -> TimePattern {
    let mut hourly = vec![0usize; 24];
    let mut daily = vec![0usize; 7];
    let mut late_night = 0usize;
    let mut weekend = 0usize;

    for event in events {
        let hour = event.timestamp.hour();
        let day = event.timestamp.weekday().num_days_from_monday() as usize;
        hourly[hour as usize] += 1;
        daily[day] += 1;
        if hour < 5 {
            late_night += 1;
        }
        if day >= 5 {
            weekend += 1;
        }
    }

    let total = events.len();
    let ratio = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        }
    };

    TimePattern {
        peak_hours: top_indices(&hourly, 3).into_iter().map(|h| h as u32).collect(),
        peak_days: top_indices(&daily, 3)
            .into_iter()
            .map(|d| WEEKDAY_NAMES[d].to_string())
            .collect(),
        hourly_distribution: hourly,
        daily_distribution: daily,
        late_night_ratio: ratio(late_night),
        weekend_ratio: ratio(weekend),
    }
}

/// Bucket events by calendar month and compare the first half of the months
/// against the second half for the overall trend.
pub fn monthly_trends(events: &[WatchEvent]) -> TrendReport {
    let sorted = sorted_by_time(events);

    let mut buckets: BTreeMap<String, Vec<WatchEvent>> = BTreeMap::new();
    for event in sorted {
        let key = event.timestamp.format("%Y-%m").to_string();
        buckets.entry(key).or_default().push(event);
    }

    let months: Vec<MonthlyTrend> = buckets
        .into_iter()
        .map(|(month, bucket)| {
            let mut channel_counts: HashMap<&str, usize> = HashMap::new();
            for event in &bucket {
                if let Some(ch) = &event.channel {
                    *channel_counts.entry(ch.as_str()).or_insert(0) += 1;
                }
            }
            let mut channels: Vec<(&str, usize)> = channel_counts.into_iter().collect();
            channels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
            channels.truncate(3);

            let active_days: usize = {
                let mut days: Vec<_> = bucket.iter().map(|e| e.timestamp.date_naive()).collect();
                days.sort();
                days.dedup();
                days.len()
            };

            MonthlyTrend {
                video_count: bucket.len(),
                top_categories: topics::top_categories(&bucket, 3),
                top_channels: channels.into_iter().map(|(ch, _)| ch.to_string()).collect(),
                avg_daily_videos: bucket.len() as f64 / active_days.max(1) as f64,
                month,
            }
        })
        .collect();

    let (trend, growth_percent) = overall_trend(&months);
    TrendReport {
        months,
        trend,
        growth_percent,
    }
}

fn overall_trend(months: &[MonthlyTrend]) -> (Trend, f64) {
    if months.len() < 2 {
        return (Trend::Stable, 0.0);
    }
    let mid = months.len() / 2;
    let mean = |slice: &[MonthlyTrend]| {
        slice.iter().map(|m| m.video_count).sum::<usize>() as f64 / slice.len() as f64
    };
    let first = mean(&months[..mid]);
    let second = mean(&months[mid..]);
    if first == 0.0 {
        return (Trend::Stable, 0.0);
    }
    let relative = (second - first) / first;
    let trend = if relative > TREND_THRESHOLD {
        Trend::Increasing
    } else if relative < -TREND_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    };
    (trend, relative * 100.0)
}

/// Partition events into the four fixed time-of-day slots and profile each
/// non-empty slot. Output is in slot order (late_night first).
pub fn content_by_slot(events: &[WatchEvent]) -> Vec<SlotProfile> {
    let mut by_slot: HashMap<TimeSlot, Vec<WatchEvent>> = HashMap::new();
    for event in events {
        by_slot
            .entry(TimeSlot::of_hour(event.timestamp.hour()))
            .or_default()
            .push(event.clone());
    }

    TimeSlot::ALL
        .into_iter()
        .filter_map(|slot| {
            let bucket = by_slot.remove(&slot)?;
            Some(SlotProfile {
                slot,
                hour_range: slot.hour_range(),
                video_count: bucket.len(),
                top_categories: topics::top_categories(&bucket, 5),
                top_keywords: topics::top_keywords(&bucket, 5),
            })
        })
        .collect()
}

struct OpenPhase {
    start: (i32, u32),
    end: (i32, u32),
    dominant: Option<crate::models::Category>,
    video_count: usize,
    weeks: usize,
}

impl OpenPhase {
    fn close(self) -> Phase {
        let label = match self.dominant {
            Some(cat) => cat.phase_label().to_string(),
            None => "Mixed Viewing".to_string(),
        };
        let week_word = if self.weeks == 1 { "week" } else { "weeks" };
        let description = format!(
            "{} {} of {} ({} videos)",
            self.weeks,
            week_word,
            label.to_lowercase(),
            self.video_count
        );
        Phase {
            start_week: week_key(self.start),
            end_week: week_key(self.end),
            dominant_categories: self.dominant.into_iter().collect(),
            video_count: self.video_count,
            label,
            description,
        }
    }
}

fn week_key((year, week): (i32, u32)) -> String {
    format!("{year:04}-W{week:02}")
}

/// Segment the timeline into phases: bucket by ISO week, compute each
/// week's dominant category, and walk weeks chronologically with a single
/// state machine — a new phase begins whenever the dominant category
/// differs from the previous week's; equal dominants merge.
pub fn detect_phases(events: &[WatchEvent]) -> Vec<Phase> {
    if events.is_empty() {
        return Vec::new();
    }
    let sorted = sorted_by_time(events);

    let mut weeks: BTreeMap<(i32, u32), Vec<WatchEvent>> = BTreeMap::new();
    for event in sorted {
        let iso = event.timestamp.iso_week();
        weeks.entry((iso.year(), iso.week())).or_default().push(event);
    }

    let mut phases = Vec::new();
    let mut open: Option<OpenPhase> = None;

    for (key, bucket) in weeks {
        let dominant = topics::dominant_category(&bucket);
        match open.as_mut() {
            Some(phase) if phase.dominant == dominant => {
                phase.end = key;
                phase.video_count += bucket.len();
                phase.weeks += 1;
            }
            _ => {
                if let Some(phase) = open.take() {
                    phases.push(phase.close());
                }
                open = Some(OpenPhase {
                    start: key,
                    end: key,
                    dominant,
                    video_count: bucket.len(),
                    weeks: 1,
                });
            }
        }
    }

    // Terminal state: close the last open phase.
    if let Some(phase) = open {
        phases.push(phase.close());
    }

    phases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{DateTime, Duration, Utc};

    fn ev(title: &str, channel: Option<&str>, ts: &str) -> WatchEvent {
        WatchEvent {
            title: title.to_string(),
            channel: channel.map(str::to_string),
            timestamp: ts.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[test]
    fn late_night_ratio_counts_hours_before_five() {
        let events = vec![
            ev("lofi beats", Some("A"), "2024-01-01T23:00:00Z"),
            ev("lofi chill", Some("A"), "2024-01-02T00:30:00Z"),
            ev("jazz night", Some("B"), "2024-01-08T21:00:00Z"),
        ];
        let pattern = time_pattern(&events);
        // Only the 00:30 event falls in [0, 5)
        assert!((pattern.late_night_ratio - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn peak_hours_tie_broken_by_ascending_hour() {
        let events = vec![
            ev("a", None, "2024-01-01T09:00:00Z"),
            ev("b", None, "2024-01-01T21:00:00Z"),
            ev("c", None, "2024-01-02T21:00:00Z"),
            ev("d", None, "2024-01-02T14:00:00Z"),
        ];
        let pattern = time_pattern(&events);
        assert_eq!(pattern.peak_hours, vec![21, 9, 14]);
    }

    #[test]
    fn weekend_ratio_counts_saturday_and_sunday() {
        let events = vec![
            ev("a", None, "2024-01-06T12:00:00Z"), // Saturday
            ev("b", None, "2024-01-07T12:00:00Z"), // Sunday
            ev("c", None, "2024-01-08T12:00:00Z"), // Monday
            ev("d", None, "2024-01-09T12:00:00Z"), // Tuesday
        ];
        let pattern = time_pattern(&events);
        assert!((pattern.weekend_ratio - 0.5).abs() < 1e-9);
        assert_eq!(pattern.daily_distribution[5], 1);
        assert_eq!(pattern.daily_distribution[6], 1);
    }

    #[test]
    fn empty_input_yields_zeroed_pattern() {
        let pattern = time_pattern(&[]);
        assert!(pattern.peak_hours.is_empty());
        assert!(pattern.peak_days.is_empty());
        assert_eq!(pattern.late_night_ratio, 0.0);
        assert_eq!(pattern.weekend_ratio, 0.0);
    }

    fn month_burst(month: &str, count: usize) -> Vec<WatchEvent> {
        (0..count)
            .map(|i| {
                ev(
                    "lofi playlist",
                    Some("ChillHop"),
                    &format!("{month}-{:02}T12:00:00Z", (i % 27) + 1),
                )
            })
            .collect()
    }

    #[test]
    fn growing_history_is_increasing() {
        let mut events = month_burst("2024-01", 5);
        events.extend(month_burst("2024-02", 5));
        events.extend(month_burst("2024-03", 10));
        events.extend(month_burst("2024-04", 12));
        let report = monthly_trends(&events);
        assert_eq!(report.months.len(), 4);
        assert_eq!(report.trend, Trend::Increasing);
        // first-half mean 5, second-half mean 11 → +120%
        assert!((report.growth_percent - 120.0).abs() < 1e-9);
    }

    #[test]
    fn shrinking_history_is_decreasing() {
        let mut events = month_burst("2024-01", 20);
        events.extend(month_burst("2024-02", 4));
        let report = monthly_trends(&events);
        assert_eq!(report.trend, Trend::Decreasing);
    }

    #[test]
    fn exact_threshold_change_is_stable() {
        // 10 → 11 is exactly +10%, which must not count as increasing
        let mut events = month_burst("2024-01", 10);
        events.extend(month_burst("2024-02", 11));
        let report = monthly_trends(&events);
        assert_eq!(report.trend, Trend::Stable);
        assert!((report.growth_percent - 10.0).abs() < 1e-9);
    }

    #[test]
    fn single_month_is_stable() {
        let report = monthly_trends(&month_burst("2024-05", 7));
        assert_eq!(report.trend, Trend::Stable);
        assert_eq!(report.growth_percent, 0.0);
        assert_eq!(report.months[0].month, "2024-05");
        assert_eq!(report.months[0].top_categories, vec![Category::Music]);
        assert_eq!(report.months[0].top_channels, vec!["ChillHop".to_string()]);
    }

    #[test]
    fn avg_daily_uses_active_days_only() {
        let events = vec![
            ev("a", None, "2024-03-01T10:00:00Z"),
            ev("b", None, "2024-03-01T11:00:00Z"),
            ev("c", None, "2024-03-15T11:00:00Z"),
        ];
        let report = monthly_trends(&events);
        assert!((report.months[0].avg_daily_videos - 1.5).abs() < 1e-9);
    }

    #[test]
    fn slots_partition_events_in_slot_order() {
        let events = vec![
            ev("lofi beats", None, "2024-01-01T02:00:00Z"),
            ev("news update", None, "2024-01-01T08:00:00Z"),
            ev("jazz night", None, "2024-01-01T22:00:00Z"),
        ];
        let slots = content_by_slot(&events);
        let names: Vec<&str> = slots.iter().map(|s| s.slot.name()).collect();
        assert_eq!(names, vec!["late_night", "morning", "evening"]);
        let total: usize = slots.iter().map(|s| s.video_count).sum();
        assert_eq!(total, events.len());
        assert!(slots[0].top_keywords.contains(&"lofi".to_string()));
    }

    fn weekly_run(start: &str, weeks: usize, title: &str, per_week: usize) -> Vec<WatchEvent> {
        let base: DateTime<Utc> = start.parse().unwrap();
        let mut events = Vec::new();
        for w in 0..weeks {
            for d in 0..per_week {
                events.push(WatchEvent {
                    title: title.to_string(),
                    channel: None,
                    timestamp: base + Duration::weeks(w as i64) + Duration::days(d as i64),
                });
            }
        }
        events
    }

    #[test]
    fn category_change_starts_a_new_phase() {
        // 10 weeks of gaming, then 10 weeks of music
        let mut events = weekly_run("2024-01-01T12:00:00Z", 10, "elden ring gameplay", 3);
        events.extend(weekly_run("2024-03-11T12:00:00Z", 10, "lofi jazz playlist", 3));
        let total = events.len();

        let phases = detect_phases(&events);
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].dominant_categories, vec![Category::Gaming]);
        assert_eq!(phases[1].dominant_categories, vec![Category::Music]);
        assert_eq!(phases[0].start_week, "2024-W01");
        assert_eq!(phases[0].end_week, "2024-W10");
        assert_eq!(phases[1].start_week, "2024-W11");
        assert_eq!(phases[1].end_week, "2024-W20");
        assert_eq!(
            phases.iter().map(|p| p.video_count).sum::<usize>(),
            total,
            "phase video counts must sum to the total event count"
        );
    }

    #[test]
    fn consecutive_weeks_with_same_dominant_merge() {
        let events = weekly_run("2024-01-01T12:00:00Z", 4, "lofi playlist", 2);
        let phases = detect_phases(&events);
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].video_count, 8);
        assert_eq!(phases[0].label, "Music Exploration");
        assert!(phases[0].description.contains("4 weeks"));
    }

    #[test]
    fn single_week_yields_exactly_one_phase() {
        let events = vec![ev("lofi beats", None, "2024-01-03T12:00:00Z")];
        let phases = detect_phases(&events);
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].start_week, phases[0].end_week);
        assert!(phases[0].description.contains("1 week "));
    }

    #[test]
    fn empty_input_yields_zero_phases() {
        assert!(detect_phases(&[]).is_empty());
    }

    #[test]
    fn unclassifiable_weeks_carry_the_none_sentinel() {
        let mut events = weekly_run("2024-01-01T12:00:00Z", 2, "zebra okapi giraffe", 2);
        events.extend(weekly_run("2024-01-15T12:00:00Z", 2, "lofi playlist", 2));
        let phases = detect_phases(&events);
        assert_eq!(phases.len(), 2);
        assert!(phases[0].dominant_categories.is_empty());
        assert_eq!(phases[0].label, "Mixed Viewing");
        assert_eq!(phases[1].dominant_categories, vec![Category::Music]);
    }

    #[test]
    fn unsorted_input_is_sorted_defensively() {
        let mut events = weekly_run("2024-01-01T12:00:00Z", 3, "lofi playlist", 1);
        events.reverse();
        let phases = detect_phases(&events);
        assert_eq!(phases.len(), 1);
        assert_eq!(phases[0].start_week, "2024-W01");
        assert_eq!(phases[0].end_week, "2024-W03");
    }
}

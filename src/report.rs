//! Markdown rendering of the combined analysis report.

use crate::analysis::AnalysisOutput;
use crate::models::{
    DiversityMetric, Phase, SlotProfile, TimePattern, TopicAnalysis, TrendReport, WatchStats,
};

// Keywords shown in the report, independent of the analyzer's limit.
const KEYWORD_CAP: usize = 10;

/// Render analyzer outputs as one markdown document, in the given order.
pub fn markdown(sections: &[(&str, AnalysisOutput)]) -> String {
    let mut md = String::from("# Watch History Analysis Report\n");
    for (_, output) in sections {
        match output {
            AnalysisOutput::Stats(stats) => overview(&mut md, stats.as_ref()),
            AnalysisOutput::Topics(topics) => keywords(&mut md, topics),
            AnalysisOutput::Time(pattern) => patterns(&mut md, pattern),
            AnalysisOutput::Trends(report) => trends(&mut md, report),
            AnalysisOutput::Slots(slots) => time_slots(&mut md, slots),
            AnalysisOutput::Phases(phases) => viewing_phases(&mut md, phases),
            AnalysisOutput::Diversity(metric) => diversity(&mut md, metric),
        }
    }
    md
}

fn overview(md: &mut String, stats: Option<&WatchStats>) {
    md.push_str("\n## Overview\n");
    let Some(stats) = stats else {
        md.push_str("No events loaded.\n");
        return;
    };
    md.push_str(&format!("- **Total Videos**: {}\n", stats.total_videos));
    md.push_str(&format!("- **Unique Channels**: {}\n", stats.unique_channels));
    md.push_str(&format!(
        "- **Date Range**: {} to {}\n",
        stats.date_range_start.format("%Y-%m-%d"),
        stats.date_range_end.format("%Y-%m-%d")
    ));
    md.push_str(&format!(
        "- **Average Videos/Day**: {:.1}\n",
        stats.videos_per_day_avg
    ));
}

fn keywords(md: &mut String, topics: &TopicAnalysis) {
    md.push_str("\n## Top Keywords\n");
    for (word, count) in topics.keywords.iter().take(KEYWORD_CAP) {
        md.push_str(&format!("- {}: {}\n", word, count));
    }

    md.push_str("\n## Categories\n");
    let names: Vec<&str> = topics.categories.iter().map(|c| c.name()).collect();
    md.push_str(&format!("{}\n", names.join(", ")));
}

fn patterns(md: &mut String, pattern: &TimePattern) {
    md.push_str("\n## Viewing Patterns\n");
    let hours: Vec<String> = pattern
        .peak_hours
        .iter()
        .map(|h| format!("{:02}:00", h))
        .collect();
    md.push_str(&format!("- **Peak Hours**: {}\n", hours.join(", ")));
    md.push_str(&format!("- **Peak Days**: {}\n", pattern.peak_days.join(", ")));
    md.push_str(&format!(
        "- **Late Night Ratio**: {:.1}%\n",
        pattern.late_night_ratio * 100.0
    ));
    md.push_str(&format!(
        "- **Weekend Ratio**: {:.1}%\n",
        pattern.weekend_ratio * 100.0
    ));
}

fn trends(md: &mut String, report: &TrendReport) {
    md.push_str("\n## Monthly Trends\n");
    if report.months.is_empty() {
        md.push_str("No monthly data.\n");
        return;
    }
    md.push_str("| Month | Videos | Avg/day | Top categories |\n");
    md.push_str("|---|---|---|---|\n");
    for month in &report.months {
        let categories: Vec<&str> = month.top_categories.iter().map(|c| c.name()).collect();
        md.push_str(&format!(
            "| {} | {} | {:.1} | {} |\n",
            month.month,
            month.video_count,
            month.avg_daily_videos,
            categories.join(", ")
        ));
    }
    md.push_str(&format!(
        "\nOverall trend: {} ({:+.1}%)\n",
        report.trend.name(),
        report.growth_percent
    ));
}

fn time_slots(md: &mut String, slots: &[SlotProfile]) {
    md.push_str("\n## Time Slots\n");
    if slots.is_empty() {
        md.push_str("No events loaded.\n");
        return;
    }
    for slot in slots {
        let categories: Vec<&str> = slot.top_categories.iter().map(|c| c.name()).collect();
        md.push_str(&format!(
            "- **{}** ({}): {} videos, top: {}\n",
            slot.slot.name(),
            slot.hour_range,
            slot.video_count,
            categories.join(", ")
        ));
    }
}

fn viewing_phases(md: &mut String, phases: &[Phase]) {
    md.push_str("\n## Viewing Phases\n");
    if phases.is_empty() {
        md.push_str("No phases detected.\n");
        return;
    }
    md.push_str("| From | To | Label | Videos |\n");
    md.push_str("|---|---|---|---|\n");
    for phase in phases {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            phase.start_week, phase.end_week, phase.label, phase.video_count
        ));
    }
}

fn diversity(md: &mut String, metric: &DiversityMetric) {
    md.push_str("\n## Channel Diversity\n");
    md.push_str(&format!("- **Score**: {:.1}/100\n", metric.overall_score));
    md.push_str(&format!("- **Interpretation**: {}\n", metric.interpretation));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{registry, AnalysisConfig};
    use crate::models::WatchEvent;
    use chrono::{DateTime, Utc};

    fn ev(title: &str, channel: &str, ts: &str) -> WatchEvent {
        WatchEvent {
            title: title.to_string(),
            channel: Some(channel.to_string()),
            timestamp: ts.parse::<DateTime<Utc>>().unwrap(),
        }
    }

    #[test]
    fn full_report_renders_every_section() {
        let events = vec![
            ev("lofi beats to study to", "ChillHop", "2024-01-01T23:00:00Z"),
            ev("재즈 피아노 모음", "JazzKorea", "2024-01-02T00:30:00Z"),
            ev("Elden Ring gameplay part 3", "GameDen", "2024-02-08T21:00:00Z"),
        ];
        let cfg = AnalysisConfig::default();
        let sections: Vec<(&str, AnalysisOutput)> = registry()
            .into_iter()
            .map(|(name, run)| (name, run(&events, &cfg).unwrap()))
            .collect();
        let md = markdown(&sections);

        for heading in [
            "# Watch History Analysis Report",
            "## Overview",
            "## Top Keywords",
            "## Categories",
            "## Viewing Patterns",
            "## Monthly Trends",
            "## Time Slots",
            "## Viewing Phases",
            "## Channel Diversity",
        ] {
            assert!(md.contains(heading), "missing section {heading}");
        }
        assert!(md.contains("- **Total Videos**: 3"));
        assert!(md.contains("| 2024-01 |"));
        assert!(md.contains("- lofi: 1"));
    }

    #[test]
    fn keywords_capped_at_ten() {
        let topics = TopicAnalysis {
            keywords: (0..15).map(|i| (format!("word{i:02}"), 15 - i)).collect(),
            ..TopicAnalysis::default()
        };
        let md = markdown(&[("topics", AnalysisOutput::Topics(topics))]);
        assert_eq!(md.matches("\n- ").count(), 10);
    }

    #[test]
    fn empty_history_renders_placeholders() {
        let md = markdown(&[
            ("stats", AnalysisOutput::Stats(None)),
            ("slots", AnalysisOutput::Slots(Vec::new())),
            ("phases", AnalysisOutput::Phases(Vec::new())),
        ]);
        assert!(md.contains("No events loaded."));
        assert!(md.contains("No phases detected."));
    }
}

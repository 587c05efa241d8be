use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rewind::analysis::{diversity, stats, temporal, AnalysisOutput};
use rewind::models::{
    ChannelStats, DiversityMetric, Phase, PromptVariant, SlotProfile, TasteProfile, TimePattern,
    TopicAnalysis, TrendReport, WatchStats,
};
use rewind::session::Session;

#[derive(Parser)]
#[command(name = "rewind", version, about = "YouTube watch-history analyzer")]
struct Cli {
    /// Path to the event cache
    #[arg(long, global = true)]
    cache_path: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a Google Takeout watch-history.json and cache the events
    Load {
        /// Path to watch-history.json (defaults to config file history_path)
        path: Option<PathBuf>,
    },

    /// Show overall history statistics
    Stats,

    /// Show statistics for one channel
    Channel {
        /// Channel name (case-insensitive substring match)
        name: String,
    },

    /// Extract ranked keywords, languages, and content categories
    Topics {
        /// Maximum number of keywords
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show hour-of-day and day-of-week viewing patterns
    Time,

    /// Show month-over-month viewing trends
    Trends,

    /// Show what gets watched in each time-of-day slot
    Slots,

    /// Detect interest phases (consecutive weeks sharing a dominant category)
    Phases,

    /// Score channel diversity (Shannon entropy)
    Diversity,

    /// Build the taste profile from topics, time patterns, and diversity
    Profile,

    /// Generate music-generation prompts from the taste profile
    Prompt {
        /// Number of prompt variants (1-5)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Seed for deterministic variant generation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run every analyzer and print a combined report
    Report {
        /// Render the report as markdown
        #[arg(long, conflicts_with = "json")]
        markdown: bool,
    },

    /// Delete the cached event sequence
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = rewind::config::AppConfig::load();

    // Resolve cache path: CLI > config > XDG default
    let cache_path = cli
        .cache_path
        .or(config.cache_path.clone())
        .unwrap_or_else(rewind::session::default_cache_path);
    log::info!("Cache: {}", cache_path.display());

    let cfg = config.analysis();

    match cli.command {
        Commands::Load { path } => {
            // Resolve history path: CLI arg > config history_path
            let history_path = match path.or(config.history_path.clone()) {
                Some(p) => p,
                None => anyhow::bail!(
                    "No history file to load. Pass a path or set history_path in config."
                ),
            };

            let events = rewind::parser::parse_history(&history_path)
                .with_context(|| format!("Failed to parse {}", history_path.display()))?;
            let count = events.len();
            Session::new(events)
                .save(&cache_path)
                .context("Failed to write event cache")?;
            println!("Loaded {} events from {}", count, history_path.display());
        }

        Commands::Stats => {
            let session = open_session(&cache_path)?;
            let result = stats::watch_stats(session.events());
            if cli.json {
                print_json(&result)?;
            } else {
                print_stats(result.as_ref());
            }
        }

        Commands::Channel { name } => {
            let session = open_session(&cache_path)?;
            match stats::channel_stats(session.events(), &name) {
                Some(channel) => {
                    if cli.json {
                        print_json(&channel)?;
                    } else {
                        print_channel(&channel);
                    }
                }
                None => println!("No videos found for channel: {}", name),
            }
        }

        Commands::Topics { limit } => {
            let mut session = open_session(&cache_path)?;
            let analysis = session
                .topics(limit.unwrap_or(cfg.keyword_limit))
                .context("Topic extraction failed")?;
            if cli.json {
                print_json(&analysis)?;
            } else {
                print_topics(&analysis);
            }
        }

        Commands::Time => {
            let session = open_session(&cache_path)?;
            let pattern = temporal::time_pattern(session.events());
            if cli.json {
                print_json(&pattern)?;
            } else {
                print_time(&pattern);
            }
        }

        Commands::Trends => {
            let session = open_session(&cache_path)?;
            let report = temporal::monthly_trends(session.events());
            if cli.json {
                print_json(&report)?;
            } else {
                print_trends(&report);
            }
        }

        Commands::Slots => {
            let session = open_session(&cache_path)?;
            let slots = temporal::content_by_slot(session.events());
            if cli.json {
                print_json(&slots)?;
            } else {
                print_slots(&slots);
            }
        }

        Commands::Phases => {
            let session = open_session(&cache_path)?;
            let phases = temporal::detect_phases(session.events());
            if cli.json {
                print_json(&phases)?;
            } else {
                print_phases(&phases);
            }
        }

        Commands::Diversity => {
            let session = open_session(&cache_path)?;
            let metric = diversity::score(session.events());
            if cli.json {
                print_json(&metric)?;
            } else {
                print_diversity(&metric);
            }
        }

        Commands::Profile => {
            let mut session = open_session(&cache_path)?;
            let profile = build_profile(&mut session, &cfg)?;
            if cli.json {
                print_json(&profile)?;
            } else {
                print_profile(&profile);
            }
        }

        Commands::Prompt { count, seed } => {
            let mut session = open_session(&cache_path)?;
            let profile = build_profile(&mut session, &cfg)?;
            let variants =
                rewind::prompt::synthesize(&profile, count.unwrap_or(cfg.prompt_count), seed)
                    .context("Prompt synthesis failed")?;
            if cli.json {
                print_json(&variants)?;
            } else {
                print_prompts(&variants);
            }
        }

        Commands::Report { markdown } => {
            let session = open_session(&cache_path)?;
            if markdown {
                let mut sections = Vec::new();
                for (name, run) in rewind::analysis::registry() {
                    let output = run(session.events(), &cfg)
                        .with_context(|| format!("Analyzer {name} failed"))?;
                    sections.push((name, output));
                }
                println!("{}", rewind::report::markdown(&sections));
            } else if cli.json {
                let mut report = serde_json::Map::new();
                for (name, run) in rewind::analysis::registry() {
                    let output = run(session.events(), &cfg)
                        .with_context(|| format!("Analyzer {name} failed"))?;
                    report.insert(name.to_string(), serde_json::to_value(&output)?);
                }
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for (name, run) in rewind::analysis::registry() {
                    let output = run(session.events(), &cfg)
                        .with_context(|| format!("Analyzer {name} failed"))?;
                    print_output(name, &output);
                    println!();
                }
            }
        }

        Commands::Clear => {
            match std::fs::remove_file(&cache_path) {
                Ok(()) => println!("Cleared cache at {}", cache_path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    println!("No cache at {}", cache_path.display());
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to remove {}", cache_path.display()));
                }
            }
        }
    }

    Ok(())
}

fn open_session(cache_path: &std::path::Path) -> Result<Session> {
    Session::load_from(cache_path).with_context(|| {
        format!(
            "No event cache at {}. Run `rewind load <watch-history.json>` first.",
            cache_path.display()
        )
    })
}

fn build_profile(
    session: &mut Session,
    cfg: &rewind::analysis::AnalysisConfig,
) -> Result<TasteProfile> {
    let analysis = session
        .topics(cfg.keyword_limit)
        .context("Topic extraction failed")?;
    let pattern = temporal::time_pattern(session.events());
    let metric = diversity::score(session.events());
    Ok(rewind::profile::build(
        &analysis,
        &pattern,
        &metric,
        cfg.mood_closeness_threshold,
    ))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_output(name: &str, output: &AnalysisOutput) {
    println!("=== {} ===", name);
    match output {
        AnalysisOutput::Stats(s) => print_stats(s.as_ref()),
        AnalysisOutput::Topics(t) => print_topics(t),
        AnalysisOutput::Time(t) => print_time(t),
        AnalysisOutput::Trends(t) => print_trends(t),
        AnalysisOutput::Slots(s) => print_slots(s),
        AnalysisOutput::Phases(p) => print_phases(p),
        AnalysisOutput::Diversity(d) => print_diversity(d),
    }
}

fn print_stats(stats: Option<&WatchStats>) {
    let Some(stats) = stats else {
        println!("No events loaded.");
        return;
    };
    println!("Watch History Statistics");
    println!("========================");
    println!("Total videos:     {}", stats.total_videos);
    println!("Unique channels:  {}", stats.unique_channels);
    println!(
        "Date range:       {} to {}",
        stats.date_range_start.format("%Y-%m-%d"),
        stats.date_range_end.format("%Y-%m-%d")
    );
    println!("Videos per day:   {:.1}", stats.videos_per_day_avg);
    println!();

    if !stats.top_channels.is_empty() {
        println!("Top channels:");
        for (channel, count) in &stats.top_channels {
            println!("  {:<30} {}", channel, count);
        }
    }
}

fn print_channel(stats: &ChannelStats) {
    println!("Channel Statistics");
    println!("==================");
    println!("Channel:         {}", stats.channel);
    println!("Total videos:    {}", stats.total_videos);
    println!(
        "First watched:   {}",
        stats.first_watched.format("%Y-%m-%d")
    );
    println!(
        "Last watched:    {}",
        stats.last_watched.format("%Y-%m-%d")
    );
    println!("Viewing period:  {} days", stats.viewing_period_days);
    println!();
    print_time(&stats.time_pattern);
}

fn print_topics(analysis: &TopicAnalysis) {
    if analysis.keywords.is_empty() {
        println!("No keywords found.");
        return;
    }

    println!("{:<25} {:>10}", "Keyword", "Count");
    println!("{}", "-".repeat(36));
    for (keyword, count) in &analysis.keywords {
        println!("{:<25} {:>10}", keyword, count);
    }
    println!();

    let categories: Vec<&str> = analysis.categories.iter().map(|c| c.name()).collect();
    println!("Categories: {}", categories.join(", "));

    let total: usize = analysis.language_breakdown.values().sum();
    if total > 0 {
        let parts: Vec<String> = analysis
            .language_breakdown
            .iter()
            .map(|(lang, count)| {
                format!("{:?} {:.0}%", lang, *count as f64 / total as f64 * 100.0)
            })
            .collect();
        println!("Languages:  {}", parts.join(", "));
    }
}

fn print_time(pattern: &TimePattern) {
    let peak_hours: Vec<String> = pattern
        .peak_hours
        .iter()
        .map(|h| format!("{:02}:00", h))
        .collect();
    println!("Peak hours:       {}", peak_hours.join(", "));
    println!("Peak days:        {}", pattern.peak_days.join(", "));
    println!(
        "Late night ratio: {:.0}%",
        pattern.late_night_ratio * 100.0
    );
    println!("Weekend ratio:    {:.0}%", pattern.weekend_ratio * 100.0);
    println!();

    println!("Hourly distribution:");
    for (hour, count) in pattern.hourly_distribution.iter().enumerate() {
        if *count > 0 {
            println!("  {:02}:00  {:>5}  {}", hour, count, "#".repeat((*count).min(60)));
        }
    }
}

fn print_trends(report: &TrendReport) {
    if report.months.is_empty() {
        println!("No monthly data.");
        return;
    }

    println!(
        "{:<10} {:>8} {:>10}  {}",
        "Month", "Videos", "Avg/day", "Top categories"
    );
    println!("{}", "-".repeat(60));
    for month in &report.months {
        let categories: Vec<&str> = month.top_categories.iter().map(|c| c.name()).collect();
        println!(
            "{:<10} {:>8} {:>10.1}  {}",
            month.month,
            month.video_count,
            month.avg_daily_videos,
            categories.join(", ")
        );
    }
    println!();
    println!(
        "Overall trend: {} ({:+.1}%)",
        report.trend.name(),
        report.growth_percent
    );
}

fn print_slots(slots: &[SlotProfile]) {
    if slots.is_empty() {
        println!("No events loaded.");
        return;
    }

    for slot in slots {
        println!(
            "{} ({}) — {} videos",
            slot.slot.name(),
            slot.hour_range,
            slot.video_count
        );
        let categories: Vec<&str> = slot.top_categories.iter().map(|c| c.name()).collect();
        if !categories.is_empty() {
            println!("  categories: {}", categories.join(", "));
        }
        if !slot.top_keywords.is_empty() {
            println!("  keywords:   {}", slot.top_keywords.join(", "));
        }
        println!();
    }
}

fn print_phases(phases: &[Phase]) {
    if phases.is_empty() {
        println!("No phases detected.");
        return;
    }

    println!(
        "{:<10} {:<10} {:<22} {:>7}  {}",
        "From", "To", "Label", "Videos", "Description"
    );
    println!("{}", "-".repeat(90));
    for phase in phases {
        println!(
            "{:<10} {:<10} {:<22} {:>7}  {}",
            phase.start_week, phase.end_week, phase.label, phase.video_count, phase.description
        );
    }
}

fn print_diversity(metric: &DiversityMetric) {
    println!("Channel Diversity");
    println!("=================");
    println!("Overall score:   {:.1} / 100", metric.overall_score);
    println!("Entropy:         {:.2} bits", metric.channel_entropy);
    println!("Top-5 share:     {:.1}%", metric.top_channel_concentration);
    println!("Unique ratio:    {:.2}", metric.unique_ratio);
    println!();
    println!("{}", metric.interpretation);
}

fn print_profile(profile: &TasteProfile) {
    println!("Taste Profile");
    println!("=============");
    println!("Genres:    {}", profile.primary_genres.join(", "));
    println!("Moods:     {}", profile.mood_keywords.join(", "));
    println!("Energy:    {}", profile.energy_level.name());
    println!("Context:   {}", profile.time_context.name());
    println!("Language:  {}", profile.language_preference.name());
}

fn print_prompts(variants: &[PromptVariant]) {
    for variant in variants {
        println!("[{}]", variant.label);
        println!("  style:       {}", variant.style);
        println!("  mood:        {}", variant.mood);
        println!("  tempo:       {}", variant.tempo_range);
        if !variant.instruments.is_empty() {
            println!("  instruments: {}", variant.instruments);
        }
        println!("  prompt:      {}", variant.full_prompt);
        println!();
    }
}

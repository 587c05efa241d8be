pub mod diversity;
pub mod stats;
pub mod temporal;
pub mod topics;

use serde::Serialize;
use thiserror::Error;

use crate::models::{
    DiversityMetric, Phase, SlotProfile, TimePattern, TopicAnalysis, TrendReport, WatchEvent,
    WatchStats,
};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Knobs consumed by the analyzers. Mirrors the `[analysis]`-relevant
/// fields of the app config so the core never reads config files itself.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub keyword_limit: usize,
    pub prompt_count: usize,
    pub mood_closeness_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            keyword_limit: 20,
            prompt_count: 3,
            mood_closeness_threshold: 0.30,
        }
    }
}

/// Typed result of one registered analyzer.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisOutput {
    Stats(Option<WatchStats>),
    Topics(TopicAnalysis),
    Time(TimePattern),
    Trends(TrendReport),
    Slots(Vec<SlotProfile>),
    Phases(Vec<Phase>),
    Diversity(DiversityMetric),
}

/// Uniform analyzer signature: a pure function of the event sequence and
/// the config. New analyses register here without touching existing ones.
pub type AnalyzerFn = fn(&[WatchEvent], &AnalysisConfig) -> Result<AnalysisOutput, AnalysisError>;

fn run_stats(events: &[WatchEvent], _cfg: &AnalysisConfig) -> Result<AnalysisOutput, AnalysisError> {
    Ok(AnalysisOutput::Stats(stats::watch_stats(events)))
}

fn run_topics(events: &[WatchEvent], cfg: &AnalysisConfig) -> Result<AnalysisOutput, AnalysisError> {
    Ok(AnalysisOutput::Topics(topics::extract(events, cfg.keyword_limit)?))
}

fn run_time(events: &[WatchEvent], _cfg: &AnalysisConfig) -> Result<AnalysisOutput, AnalysisError> {
    Ok(AnalysisOutput::Time(temporal::time_pattern(events)))
}

fn run_trends(events: &[WatchEvent], _cfg: &AnalysisConfig) -> Result<AnalysisOutput, AnalysisError> {
    Ok(AnalysisOutput::Trends(temporal::monthly_trends(events)))
}

fn run_slots(events: &[WatchEvent], _cfg: &AnalysisConfig) -> Result<AnalysisOutput, AnalysisError> {
    Ok(AnalysisOutput::Slots(temporal::content_by_slot(events)))
}

fn run_phases(events: &[WatchEvent], _cfg: &AnalysisConfig) -> Result<AnalysisOutput, AnalysisError> {
    Ok(AnalysisOutput::Phases(temporal::detect_phases(events)))
}

fn run_diversity(
    events: &[WatchEvent],
    _cfg: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalysisError> {
    Ok(AnalysisOutput::Diversity(diversity::score(events)))
}

/// All registered analyzers in report order.
pub fn registry() -> Vec<(&'static str, AnalyzerFn)> {
    vec![
        ("stats", run_stats as AnalyzerFn),
        ("topics", run_topics),
        ("time", run_time),
        ("trends", run_trends),
        ("slots", run_slots),
        ("phases", run_phases),
        ("diversity", run_diversity),
    ]
}

use std::collections::{BTreeMap, HashMap};

use crate::models::{Category, Language, TopicAnalysis, WatchEvent};
use crate::text;

use super::AnalysisError;

/// Static keyword → category lookup. Each keyword maps to at most one
/// category; tokens are already synonym-folded when they get here.
pub fn keyword_category(word: &str) -> Option<Category> {
    Some(match word {
        "music" | "song" | "songs" | "cover" | "live" | "concert" | "playlist" | "lofi"
        | "jazz" | "rock" | "pop" | "hiphop" | "edm" | "classical" | "acoustic" | "indie"
        | "rnb" | "ballad" | "kpop" | "piano" | "guitar" | "ambient" | "synthwave" | "remix"
        | "음악" | "노래" | "뮤비" | "커버" | "라이브" | "콘서트" => Category::Music,
        "game" | "games" | "gaming" | "gameplay" | "stream" | "twitch" | "walkthrough"
        | "speedrun" | "스트리밍" => Category::Gaming,
        "tech" | "unboxing" | "coding" | "programming" | "python" | "javascript" | "react"
        | "rust" | "linux" | "hardware" | "review" | "개발" | "코딩" | "프로그래밍" => {
            Category::Tech
        }
        "vlog" | "funny" | "comedy" | "mukbang" | "asmr" | "reaction" | "예능" | "리액션" => {
            Category::Entertainment
        }
        "tutorial" | "learn" | "lecture" | "course" | "class" | "lesson" | "documentary"
        | "공부" | "배우기" => Category::Education,
        _ => return None,
    })
}

/// Per-keyword counts over all events: tokens normalized, stopwords and
/// unclassifiable (digit-only) tokens excluded.
fn keyword_counts(events: &[WatchEvent]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for event in events {
        for token in text::normalize_title(&event.title) {
            if token.language == Language::Unknown {
                continue;
            }
            if text::synonyms::is_stopword(&token.text) {
                continue;
            }
            *counts.entry(token.text).or_insert(0) += 1;
        }
    }
    counts
}

/// Rank descending by count, ties broken lexicographically, truncated.
fn rank(counts: HashMap<String, usize>, limit: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

/// Summed keyword frequency per category.
pub fn category_weights(events: &[WatchEvent]) -> HashMap<Category, usize> {
    let mut weights: HashMap<Category, usize> = HashMap::new();
    for (word, count) in keyword_counts(events) {
        if let Some(cat) = keyword_category(&word) {
            *weights.entry(cat).or_insert(0) += count;
        }
    }
    weights
}

fn ranked_categories(weights: HashMap<Category, usize>) -> Vec<Category> {
    let mut ranked: Vec<(Category, usize)> = weights.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.name().cmp(b.0.name())));
    ranked.into_iter().map(|(c, _)| c).collect()
}

/// Top `n` categories by summed keyword frequency, ties alphabetical.
pub fn top_categories(events: &[WatchEvent], n: usize) -> Vec<Category> {
    let mut cats = ranked_categories(category_weights(events));
    cats.truncate(n);
    cats
}

/// Dominant category of a window, or None when nothing is classifiable.
pub fn dominant_category(events: &[WatchEvent]) -> Option<Category> {
    ranked_categories(category_weights(events)).into_iter().next()
}

/// Top `n` keywords of a window, names only.
pub fn top_keywords(events: &[WatchEvent], n: usize) -> Vec<String> {
    rank(keyword_counts(events), n)
        .into_iter()
        .map(|(word, _)| word)
        .collect()
}

/// Extract ranked keywords, the per-language token breakdown, and inferred
/// categories. `limit` must be positive; it is never silently clamped.
pub fn extract(events: &[WatchEvent], limit: usize) -> Result<TopicAnalysis, AnalysisError> {
    if limit == 0 {
        return Err(AnalysisError::Config(
            "keyword_limit must be greater than zero".to_string(),
        ));
    }

    let mut breakdown: BTreeMap<Language, usize> = BTreeMap::new();
    for event in events {
        for token in text::normalize_title(&event.title) {
            if token.language == Language::Unknown {
                continue;
            }
            *breakdown.entry(token.language).or_insert(0) += 1;
        }
    }

    let counts = keyword_counts(events);
    let mut categories = ranked_categories(category_weights(events));
    categories.truncate(5);

    let keywords = rank(counts, limit);
    if categories.is_empty() && !keywords.is_empty() {
        categories.push(Category::Other);
    }

    Ok(TopicAnalysis {
        keywords,
        language_breakdown: breakdown,
        categories,
    })
}

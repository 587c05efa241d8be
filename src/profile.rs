//! Fuses topic, time-pattern, and diversity results into a taste profile.

use crate::models::{
    Category, DiversityMetric, Energy, Language, LanguagePreference, TasteProfile, TimePattern,
    TimeSlot, TopicAnalysis,
};

/// Genre vocabulary entry for a (folded) keyword: (genre, mood).
fn keyword_genre(word: &str) -> Option<(&'static str, &'static str)> {
    Some(match word {
        "ballad" => ("Ballad", "emotional"),
        "hiphop" => ("Hip-hop", "energetic"),
        "kpop" => ("K-pop", "upbeat"),
        "jazz" => ("Jazz", "smooth"),
        "classical" => ("Classical", "elegant"),
        "lofi" => ("Lo-fi", "chill"),
        "indie" => ("Indie", "dreamy"),
        "rock" => ("Rock", "powerful"),
        "pop" => ("Pop", "catchy"),
        "rnb" => ("R&B", "soulful"),
        "edm" => ("EDM", "energetic"),
        "acoustic" => ("Acoustic", "warm"),
        "ambient" => ("Ambient", "atmospheric"),
        "synthwave" => ("Synthwave", "retro"),
        "chill" => ("Chill", "relaxed"),
        "piano" => ("Piano", "melodic"),
        "guitar" => ("Acoustic", "warm"),
        _ => return None,
    })
}

/// Moods suggested by the dominant listening time.
fn slot_moods(slot: TimeSlot) -> &'static [&'static str] {
    match slot {
        TimeSlot::LateNight => &["melancholic", "dreamy", "introspective"],
        TimeSlot::Morning => &["fresh", "uplifting"],
        TimeSlot::Afternoon => &["focused", "steady"],
        TimeSlot::Evening => &["relaxed", "warm", "nostalgic"],
    }
}

// Energy rules in priority order: first (time context, dominant category)
// match wins; anything unmatched is Medium.
const ENERGY_RULES: &[(TimeSlot, Category, Energy)] = &[
    (TimeSlot::LateNight, Category::Music, Energy::Low),
    (TimeSlot::LateNight, Category::Education, Energy::Low),
    (TimeSlot::LateNight, Category::Entertainment, Energy::Low),
    (TimeSlot::Morning, Category::Gaming, Energy::High),
    (TimeSlot::Afternoon, Category::Gaming, Energy::High),
    (TimeSlot::Evening, Category::Gaming, Energy::High),
    (TimeSlot::Morning, Category::Music, Energy::High),
    (TimeSlot::Evening, Category::Music, Energy::Low),
];

/// Slot with the largest share of the hourly distribution, ties going to
/// the earlier slot. Defaults to Afternoon when the histogram is empty.
fn dominant_slot(time: &TimePattern) -> TimeSlot {
    let mut best = TimeSlot::Afternoon;
    let mut best_count = 0usize;
    for slot in TimeSlot::ALL {
        let count: usize = time
            .hourly_distribution
            .iter()
            .enumerate()
            .filter(|(hour, _)| TimeSlot::of_hour(*hour as u32) == slot)
            .map(|(_, c)| *c)
            .sum();
        if count > best_count {
            best = slot;
            best_count = count;
        }
    }
    best
}

fn energy_level(time_context: TimeSlot, dominant: Option<Category>) -> Energy {
    let Some(category) = dominant else {
        return Energy::Medium;
    };
    ENERGY_RULES
        .iter()
        .find(|(slot, cat, _)| *slot == time_context && *cat == category)
        .map(|(_, _, energy)| *energy)
        .unwrap_or(Energy::Medium)
}

/// Majority language by classified-token share; Mixed when both leading
/// languages each reach the closeness threshold.
fn language_preference(topics: &TopicAnalysis, closeness_threshold: f64) -> LanguagePreference {
    let korean = *topics.language_breakdown.get(&Language::Korean).unwrap_or(&0);
    let english = *topics.language_breakdown.get(&Language::English).unwrap_or(&0);
    let total = korean + english;
    if total == 0 {
        return LanguagePreference::Mixed;
    }
    let korean_share = korean as f64 / total as f64;
    let english_share = english as f64 / total as f64;
    if korean_share >= closeness_threshold && english_share >= closeness_threshold {
        LanguagePreference::Mixed
    } else if korean > english {
        LanguagePreference::Korean
    } else if english > korean {
        LanguagePreference::English
    } else {
        LanguagePreference::Mixed
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Build the taste profile. Pure function of the three analysis results
/// and the closeness threshold; recomputed fresh on each run.
pub fn build(
    topics: &TopicAnalysis,
    time: &TimePattern,
    diversity: &DiversityMetric,
    closeness_threshold: f64,
) -> TasteProfile {
    let time_context = dominant_slot(time);

    // Genres and moods from the ranked keywords, most frequent first.
    let mut genres: Vec<String> = Vec::new();
    let mut moods: Vec<String> = Vec::new();
    for (word, _) in &topics.keywords {
        if let Some((genre, mood)) = keyword_genre(word) {
            push_unique(&mut genres, genre);
            push_unique(&mut moods, mood);
        }
    }
    genres.truncate(3);

    if genres.is_empty() {
        if topics.categories.contains(&Category::Music) {
            genres = vec!["Pop".to_string(), "Indie".to_string()];
        } else {
            genres = vec!["Lo-fi".to_string(), "Ambient".to_string()];
        }
    }

    for mood in slot_moods(time_context) {
        push_unique(&mut moods, mood);
    }
    if diversity.overall_score >= 70.0 {
        push_unique(&mut moods, "eclectic");
    }
    moods.truncate(5);
    if moods.is_empty() {
        moods.push("balanced".to_string());
    }

    TasteProfile {
        energy_level: energy_level(time_context, topics.categories.first().copied()),
        language_preference: language_preference(topics, closeness_threshold),
        primary_genres: genres,
        mood_keywords: moods,
        time_context,
    }
}

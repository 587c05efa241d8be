//! Renders a taste profile into short music prompts under a hard length
//! budget, with deterministic variation strategies.

use crate::analysis::AnalysisError;
use crate::models::{Energy, PromptVariant, TasteProfile};

/// Hard character budget for a rendered prompt.
const MAX_PROMPT_LEN: usize = 200;

fn tempo_range(energy: Energy) -> &'static str {
    match energy {
        Energy::Low => "60-85 BPM",
        Energy::Medium => "90-110 BPM",
        Energy::High => "120-140 BPM",
    }
}

/// Default instrument cluster for a genre.
fn instruments_for(genre: &str) -> &'static str {
    match genre {
        "Lo-fi" => "vinyl crackle, mellow piano, soft drums",
        "Jazz" => "piano, upright bass, brushed drums, saxophone",
        "Hip-hop" => "808 bass, trap hi-hats, synth pads",
        "K-pop" => "synth, punchy drums, bass drops, vocal layers",
        "EDM" => "synth leads, side-chain compression, build-ups",
        "Indie" => "acoustic guitar, soft synths, ambient pads",
        "Pop" => "piano, guitar, modern drums, vocal harmonies",
        "Ballad" => "piano, strings, soft percussion",
        "Rock" => "electric guitar, bass, drums, distortion",
        "Classical" => "orchestra, strings, piano",
        "Acoustic" => "acoustic guitar, soft percussion, warm bass",
        "R&B" => "smooth bass, Rhodes piano, soft drums",
        "Ambient" => "synthesizer pads, reverb, atmospheric textures",
        "Synthwave" => "analog synths, arpeggios, retro drums",
        "Chill" => "soft piano, ambient pads, gentle percussion",
        "Piano" => "grand piano, soft strings, minimal percussion",
        _ => "piano, guitar, drums",
    }
}

/// Alternate instrument clusters tagged to the same genre, for the
/// instrument-substitution strategy.
fn alternate_instruments(genre: &str) -> &'static [&'static str] {
    match genre {
        "Lo-fi" => &[
            "warm synth pads, gentle guitar, subtle percussion",
            "tape hiss, muted keys, brushed snare",
        ],
        "Jazz" => &[
            "electric piano, acoustic bass, brushes, trumpet",
            "vibraphone, walking bass, ride cymbal",
        ],
        "Hip-hop" => &[
            "deep bass, minimal drums, vocal chops",
            "boom-bap drums, dusty samples, sub bass",
        ],
        "K-pop" => &[
            "guitar riffs, live drums, bass groove, harmonies",
            "bright synths, claps, layered hooks",
        ],
        "Indie" => &[
            "piano, strings, gentle electronic elements",
            "jangly guitar, tambourine, warm bass",
        ],
        "Rock" => &["acoustic guitar, organ, live drums"],
        "Pop" => &["synth bass, electronic drums, vocal stacks"],
        _ => &["piano, soft synths, ambient textures, gentle percussion"],
    }
}

/// Hybrid style and mood for the genre-fusion strategy.
fn fusion_for(genre: &str) -> (String, &'static str) {
    let (style, mood) = match genre {
        "Lo-fi" => ("Lo-fi Jazz", "smooth, sophisticated"),
        "Jazz" => ("Jazz Fusion", "groovy, experimental"),
        "Hip-hop" => ("Hip-hop Soul", "soulful, rhythmic"),
        "K-pop" => ("K-pop R&B", "smooth, melodic"),
        "Pop" => ("Electropop", "modern, synth-driven"),
        "Indie" => ("Indie Electronic", "atmospheric, textured"),
        "EDM" => ("Future Bass", "melodic, emotional"),
        "Rock" => ("Alternative Rock", "atmospheric, dynamic"),
        "Classical" => ("Neoclassical", "cinematic, epic"),
        "Ballad" => ("Soul Ballad", "deep, expressive"),
        other => return (format!("{other} Fusion"), "fresh, unique"),
    };
    (style.to_string(), mood)
}

/// Opposite-valence mood pairing for the mood-contrast strategy.
fn contrast_mood(mood: &str) -> Option<&'static str> {
    Some(match mood {
        "chill" => "upbeat",
        "upbeat" => "chill",
        "energetic" => "mellow",
        "mellow" => "energetic",
        "emotional" => "confident",
        "confident" => "emotional",
        "smooth" => "edgy",
        "edgy" => "smooth",
        "dreamy" => "grounded",
        "grounded" => "dreamy",
        "melancholic" => "hopeful",
        "hopeful" => "melancholic",
        "relaxed" => "driving",
        "driving" => "relaxed",
        "warm" => "crisp",
        "crisp" => "warm",
        "introspective" => "outgoing",
        "outgoing" => "introspective",
        _ => return None,
    })
}

/// One-step tempo shift with its replacement mood pair.
fn energy_shifted(energy: Energy) -> (Energy, &'static str) {
    match energy {
        Energy::Low => (Energy::Medium, "uplifting, energetic"),
        Energy::Medium => (Energy::High, "powerful, intense"),
        Energy::High => (Energy::Low, "calm, peaceful"),
    }
}

/// Assemble a variant, enforcing the length budget. Segments are joined
/// with ", "; when the budget is exceeded, trailing segments are dropped
/// in fixed priority — instruments first, then mood, then surplus genres.
/// The leading style segment and the tempo segment are never dropped; the
/// style is character-truncated as a last resort so the budget always
/// holds.
fn assemble(label: &str, style: &str, mood: &str, tempo: &str, instruments: &str) -> PromptVariant {
    let mut head = style.to_string();
    let mut keep_mood = !mood.is_empty();
    let mut keep_instruments = !instruments.is_empty();

    let render = |head: &str, keep_mood: bool, keep_instruments: bool| {
        let mut parts: Vec<&str> = vec![head];
        if keep_mood {
            parts.push(mood);
        }
        parts.push(tempo);
        if keep_instruments {
            parts.push(instruments);
        }
        parts.join(", ")
    };

    let over = |s: &str| s.chars().count() > MAX_PROMPT_LEN;

    let mut full = render(&head, keep_mood, keep_instruments);
    if over(&full) && keep_instruments {
        keep_instruments = false;
        full = render(&head, keep_mood, keep_instruments);
    }
    if over(&full) && keep_mood {
        keep_mood = false;
        full = render(&head, keep_mood, keep_instruments);
    }
    if over(&full) {
        if let Some(first) = head.split(", ").next() {
            head = first.to_string();
        }
        full = render(&head, keep_mood, keep_instruments);
    }
    if over(&full) {
        // ", " + tempo must still fit after the truncated style
        let budget = MAX_PROMPT_LEN.saturating_sub(tempo.chars().count() + 2);
        head = head.chars().take(budget).collect();
        full = render(&head, keep_mood, keep_instruments);
    }

    PromptVariant {
        label: label.to_string(),
        style: style.to_string(),
        mood: mood.to_string(),
        tempo_range: tempo.to_string(),
        instruments: instruments.to_string(),
        full_prompt: full,
    }
}

fn primary_genre(profile: &TasteProfile) -> &str {
    profile
        .primary_genres
        .first()
        .map(String::as_str)
        .unwrap_or("Pop")
}

fn base_variant(profile: &TasteProfile) -> PromptVariant {
    let style = profile.primary_genres.join(", ");
    let mood = profile
        .mood_keywords
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    let tempo = tempo_range(profile.energy_level);
    let instruments = instruments_for(primary_genre(profile));
    assemble("Main Style", &style, &mood, tempo, instruments)
}

fn energy_shift(profile: &TasteProfile, base: &PromptVariant, _salt: u64) -> PromptVariant {
    let (shifted, mood) = energy_shifted(profile.energy_level);
    assemble(
        "Energy Shift",
        &base.style,
        mood,
        tempo_range(shifted),
        &base.instruments,
    )
}

fn mood_contrast(_profile: &TasteProfile, base: &PromptVariant, _salt: u64) -> PromptVariant {
    let contrasted: Vec<&str> = base
        .mood
        .split(", ")
        .filter(|m| !m.is_empty())
        .map(|m| contrast_mood(m).unwrap_or(m))
        .take(2)
        .collect();
    assemble(
        "Mood Contrast",
        &base.style,
        &contrasted.join(", "),
        &base.tempo_range,
        &base.instruments,
    )
}

fn instrument_substitution(
    profile: &TasteProfile,
    base: &PromptVariant,
    salt: u64,
) -> PromptVariant {
    let clusters = alternate_instruments(primary_genre(profile));
    let pick = clusters[(salt as usize) % clusters.len()];
    assemble(
        "Instrument Substitution",
        &base.style,
        &base.mood,
        &base.tempo_range,
        pick,
    )
}

fn genre_fusion(profile: &TasteProfile, base: &PromptVariant, _salt: u64) -> PromptVariant {
    let (style, mood) = fusion_for(primary_genre(profile));
    assemble(
        "Genre Fusion",
        &style,
        mood,
        &base.tempo_range,
        &base.instruments,
    )
}

/// Generate `count` prompt variants (1-5). The base "Main Style" variant
/// comes first; additional variants follow the fixed strategy order.
/// Pure function of the profile, the variant index, and the optional seed:
/// the seed deterministically rotates alternate-cluster choices, and the
/// same seed always yields the same variant set.
pub fn synthesize(
    profile: &TasteProfile,
    count: usize,
    seed: Option<u64>,
) -> Result<Vec<PromptVariant>, AnalysisError> {
    if !(1..=5).contains(&count) {
        return Err(AnalysisError::Config(format!(
            "prompt_count must be between 1 and 5, got {count}"
        )));
    }

    let strategies: [fn(&TasteProfile, &PromptVariant, u64) -> PromptVariant; 4] = [
        energy_shift,
        mood_contrast,
        instrument_substitution,
        genre_fusion,
    ];
    let salt = seed.unwrap_or(0);

    let base = base_variant(profile);
    let mut variants = vec![base.clone()];
    for strategy in strategies.iter().take(count - 1) {
        variants.push(strategy(profile, &base, salt));
    }
    Ok(variants)
}

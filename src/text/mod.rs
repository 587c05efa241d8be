pub mod synonyms;

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Language, NormalizedToken};

// Hangul runs of 2+ syllables. Single-syllable particles carry no topical
// signal and would swamp the keyword counts.
static HANGUL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[가-힣]{2,}").unwrap());

// Latin runs, keeping internal hyphens/ampersands/apostrophes so compound
// spellings like "lo-fi" and "r&b" survive as single tokens for the
// synonym fold. Minimum 3 characters.
static LATIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z][a-z0-9]*(?:[-&'][a-z0-9]+)*").unwrap());

// Digit runs (years, episode numbers). Kept as tokens but classified
// Unknown and excluded from language statistics and keyword counts.
static DIGIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{3,}\b").unwrap());

/// Tokenization strategy. The default splits on whitespace and script
/// boundaries; a richer Korean segmenter can be swapped in at configuration
/// time without changing the synonym or classification contract.
pub trait Tokenizer {
    fn tokenize(&self, title: &str) -> Vec<String>;
}

/// Default tokenizer: lowercase, then extract Hangul runs, Latin runs, and
/// digit runs as separate tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScriptTokenizer;

impl Tokenizer for ScriptTokenizer {
    fn tokenize(&self, title: &str) -> Vec<String> {
        let lower = title.to_lowercase();
        let mut tokens = Vec::new();
        for m in HANGUL_RE.find_iter(&lower) {
            tokens.push(m.as_str().to_string());
        }
        for m in LATIN_RE.find_iter(&lower) {
            if m.as_str().chars().count() >= 3 {
                tokens.push(m.as_str().to_string());
            }
        }
        for m in DIGIT_RE.find_iter(&lower) {
            tokens.push(m.as_str().to_string());
        }
        tokens
    }
}

/// Script test for a single token: any Hangul code point means Korean,
/// otherwise any alphabetic content means English, otherwise Unknown.
pub fn classify(token: &str) -> Language {
    if token.chars().any(|c| ('가'..='힣').contains(&c)) {
        Language::Korean
    } else if token.chars().any(|c| c.is_alphabetic()) {
        Language::English
    } else {
        Language::Unknown
    }
}

/// Normalize a title with an explicit tokenizer: tokenize, synonym-fold,
/// classify. Folding is idempotent, so normalizing an already-normalized
/// token is a no-op.
pub fn normalize_with<T: Tokenizer>(tokenizer: &T, title: &str) -> Vec<NormalizedToken> {
    tokenizer
        .tokenize(title)
        .iter()
        .map(|t| {
            let text = synonyms::fold(t);
            let language = classify(&text);
            NormalizedToken { text, language }
        })
        .collect()
}

/// Normalize a title with the default script tokenizer.
pub fn normalize_title(title: &str) -> Vec<NormalizedToken> {
    normalize_with(&ScriptTokenizer, title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(title: &str) -> Vec<String> {
        normalize_title(title).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn splits_on_script_boundaries() {
        let tokens = normalize_title("BTS 노래 모음 playlist");
        let korean: Vec<_> = tokens
            .iter()
            .filter(|t| t.language == Language::Korean)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(korean, vec!["노래", "모음"]);
        assert!(tokens.iter().any(|t| t.text == "bts" && t.language == Language::English));
        assert!(tokens.iter().any(|t| t.text == "playlist"));
    }

    #[test]
    fn folds_compound_spellings() {
        assert!(texts("lo-fi hip hop radio").contains(&"lofi".to_string()));
        assert!(texts("Best R&B mix").contains(&"rnb".to_string()));
        assert!(texts("케이팝 모음").contains(&"kpop".to_string()));
    }

    #[test]
    fn short_tokens_dropped() {
        // "tv" has only 2 letters, "fi" alone never appears (kept inside lo-fi)
        let tokens = texts("tv on lo-fi");
        assert!(!tokens.contains(&"tv".to_string()));
        assert_eq!(tokens, vec!["lofi".to_string()]);
    }

    #[test]
    fn digit_runs_are_unknown() {
        let tokens = normalize_title("top 2024 songs");
        let year = tokens.iter().find(|t| t.text == "2024").unwrap();
        assert_eq!(year.language, Language::Unknown);
    }

    #[test]
    fn korean_folded_token_stays_korean_classified_on_canonical() {
        // 재즈 folds to the canonical "jazz", which then classifies as English.
        // Classification runs on the folded form so counts stay consistent.
        let tokens = normalize_title("재즈 연주");
        let jazz = tokens.iter().find(|t| t.text == "jazz").unwrap();
        assert_eq!(jazz.language, Language::English);
        let other = tokens.iter().find(|t| t.text == "연주").unwrap();
        assert_eq!(other.language, Language::Korean);
    }

    #[test]
    fn normalize_is_idempotent() {
        for title in ["lo-fi beats", "케이팝 플레이리스트", "Jazz Night Live 2024"] {
            let once = normalize_title(title);
            for token in &once {
                let again = normalize_title(&token.text);
                if let Some(t) = again.first() {
                    assert_eq!(t.text, token.text, "re-normalizing {:?} changed it", token.text);
                }
            }
        }
    }
}

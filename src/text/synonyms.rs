/// Canonical form for a keyword, if it is a known surface variant.
///
/// Covers bilingual spellings of the same concept (`k-pop` / `케이팝` /
/// `kpop` → `kpop`). Every canonical form maps to itself, which makes the
/// fold idempotent by construction.
fn canonical(word: &str) -> Option<&'static str> {
    Some(match word {
        "kpop" | "k-pop" | "k pop" | "korean pop" | "케이팝" => "kpop",
        "lofi" | "lo-fi" | "lo fi" | "lofi hip hop" | "로파이" => "lofi",
        "hiphop" | "hip-hop" | "hip hop" | "힙합" | "랩" => "hiphop",
        "rnb" | "r&b" | "rhythm and blues" | "알앤비" | "알엔비" => "rnb",
        "edm" | "electronic" | "electronica" | "electronic dance" | "일렉트로닉" => "edm",
        "jazz" | "jaz" | "재즈" => "jazz",
        "rock" | "록" | "락" => "rock",
        "pop" | "팝" | "팝송" => "pop",
        "classical" | "클래식" | "클래시컬" | "클랙식" => "classical",
        "indie" | "인디" | "인디음악" => "indie",
        "acoustic" | "어쿠스틱" => "acoustic",
        "ballad" | "발라드" | "발라드곡" => "ballad",
        "piano" | "피아노" => "piano",
        "guitar" | "기타" | "통기타" | "일렉기타" => "guitar",
        "asmr" | "에이에스엠알" => "asmr",
        "vlog" | "브이로그" | "일상" | "daily" => "vlog",
        "gaming" | "게임" | "겜" | "플레이" => "gaming",
        "tutorial" | "강의" | "튜토리얼" | "강좌" => "tutorial",
        "review" | "리뷰" | "후기" => "review",
        "mukbang" | "먹방" | "eating show" => "mukbang",
        _ => return None,
    })
}

/// Fold a token to its canonical keyword. Unmapped tokens pass through
/// lowercased unchanged.
pub fn fold(word: &str) -> String {
    let lower = word.to_lowercase();
    match canonical(&lower) {
        Some(c) => c.to_string(),
        None => lower,
    }
}

// Function words and title boilerplate excluded from keyword counting.
const STOPWORDS_EN: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "shall", "can", "need",
    "this", "that", "these", "those", "it", "its", "my", "your", "our", "their", "his", "her",
    "what", "which", "who", "whom", "how", "when", "where", "why", "all", "each", "every",
    "both", "few", "more", "most", "other", "some", "such", "no", "not", "only", "own", "same",
    "so", "than", "too", "very", "just", "also", "now", "here", "there", "then", "watched",
    "official", "video", "full", "new", "hd", "feat",
];

const STOPWORDS_KR: &[&str] = &[
    "그", "이", "저", "것", "수", "등", "및", "더", "를", "을", "에", "의", "가", "는", "은",
    "로", "으로", "에서", "까지", "부터", "와", "과", "하다", "되다", "있다", "없다", "같다",
    "위해", "통해", "대한",
];

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS_EN.contains(&word) || STOPWORDS_KR.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_fold_to_canonical() {
        assert_eq!(fold("lo-fi"), "lofi");
        assert_eq!(fold("로파이"), "lofi");
        assert_eq!(fold("K-POP"), "kpop");
        assert_eq!(fold("케이팝"), "kpop");
        assert_eq!(fold("r&b"), "rnb");
        assert_eq!(fold("먹방"), "mukbang");
    }

    #[test]
    fn unmapped_words_pass_through_lowercased() {
        assert_eq!(fold("Beats"), "beats");
        assert_eq!(fold("노래방"), "노래방");
    }

    #[test]
    fn fold_is_idempotent() {
        for word in ["lo-fi", "케이팝", "Jazz", "beats", "힙합", "randomword"] {
            let once = fold(word);
            assert_eq!(fold(&once), once, "fold not idempotent for {word:?}");
        }
    }

    #[test]
    fn stopwords_both_languages() {
        assert!(is_stopword("the"));
        assert!(is_stopword("watched"));
        assert!(is_stopword("하다"));
        assert!(!is_stopword("lofi"));
    }
}

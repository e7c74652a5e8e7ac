/// Phrases treated as a self-harm signal. Matched as plain lower-case substrings.
pub const CRISIS_PHRASES: [&str; 6] = [
    "suicide",
    "kill myself",
    "self harm",
    "end it all",
    "want to die",
    "no reason to live",
];

pub fn detect_crisis(text: &str) -> bool {
    let lower = text.to_lowercase();
    CRISIS_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_phrase_regardless_of_case() {
        assert!(detect_crisis("I want to DIE"));
        assert!(detect_crisis("Sometimes I think about Suicide"));
        assert!(detect_crisis("there is no reason to live anymore"));
    }

    #[test]
    fn ignores_text_without_phrases() {
        assert!(!detect_crisis("I love my life"));
        assert!(!detect_crisis(""));
        assert!(!detect_crisis("I'm tired of this homework"));
    }

    #[test]
    fn matches_inside_longer_words() {
        assert!(detect_crisis("antisuicidepledge"));
        assert!(detect_crisis("I could just end it allright"));
    }

    #[test]
    fn every_phrase_triggers() {
        for phrase in CRISIS_PHRASES {
            assert!(detect_crisis(&format!("... {} ...", phrase.to_uppercase())));
        }
    }

    #[test]
    fn word_boundaries_are_not_required_but_spacing_is() {
        assert!(!detect_crisis("selfharm"));
        assert!(!detect_crisis("kill  myself"));
    }
}

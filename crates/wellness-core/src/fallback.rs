//! Offline replies used when the completion endpoint cannot answer.
//!
//! Categories overlap ("I feel down and lonely" fits two), so rules are tried in
//! [`Category::ORDERED`] order and the first match wins.

use std::sync::LazyLock;

use regex::Regex;

pub const OFFLINE_NOTICE: &str =
    "\n\n*(Note: Using offline mode. To enable AI responses, configure an Anthropic API key.)*";

pub const DEFAULT_REPLY: &str = "Thank you for sharing that with me. I'm here to listen and support you. Remember, if you're dealing with serious mental health concerns, please reach out to a professional counselor or therapist. How else can I help you today?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Anxiety,
    Sadness,
    Anger,
    Fatigue,
    Joy,
    Loneliness,
}

impl Category {
    pub const ORDERED: [Category; 6] = [
        Category::Anxiety,
        Category::Sadness,
        Category::Anger,
        Category::Fatigue,
        Category::Joy,
        Category::Loneliness,
    ];

    fn pattern(self) -> &'static str {
        match self {
            Category::Anxiety => "anxious|worried|stress|nervous",
            Category::Sadness => "sad|depressed|down|low|unhappy",
            Category::Anger => "angry|mad|frustrated|irritated",
            Category::Fatigue => "tired|exhausted|fatigue|sleepy",
            Category::Joy => "happy|good|great|wonderful|excited",
            Category::Loneliness => "lonely|alone|isolated",
        }
    }

    pub fn reply(self) -> &'static str {
        match self {
            Category::Anxiety => "I hear that you're feeling anxious. Try the 4-7-8 breathing technique: breathe in for 4 counts, hold for 7, exhale for 8. This activates your body's relaxation response. Would you like to talk about what's causing the stress?",
            Category::Sadness => "I'm sorry you're feeling this way. Your feelings are valid. Sometimes it helps to write down what you're feeling or talk to someone you trust. Have you considered speaking with a counselor or therapist? They can provide professional support.",
            Category::Anger => "It sounds like you're dealing with some frustration. It's okay to feel angry. Try taking a few deep breaths or going for a short walk. What's making you feel this way?",
            Category::Fatigue => "Fatigue can really affect our mood. Are you getting enough sleep? Aim for 7-9 hours, keep a consistent schedule, and avoid screens before bed. If tiredness persists, consider talking to a doctor.",
            Category::Joy => "That's wonderful to hear! It's important to celebrate the good moments. What's making you feel good today?",
            Category::Loneliness => "Feeling lonely is difficult. Remember that reaching out is a sign of strength. Consider connecting with a friend, family member, or joining a support group. You don't have to go through this alone.",
        }
    }
}

static RULES: LazyLock<Vec<(Category, Regex)>> = LazyLock::new(|| {
    Category::ORDERED
        .iter()
        .map(|category| {
            let re = Regex::new(&format!("(?i){}", category.pattern()))
                .expect("fallback patterns are static and valid");
            (*category, re)
        })
        .collect()
});

/// First category whose keywords occur anywhere in `text`.
pub fn classify(text: &str) -> Option<Category> {
    RULES
        .iter()
        .find(|(_, re)| re.is_match(text))
        .map(|(category, _)| *category)
}

/// Canned reply for `text` with the offline disclosure appended.
pub fn fallback_reply(text: &str) -> String {
    let base = classify(text).map_or(DEFAULT_REPLY, Category::reply);
    format!("{base}{OFFLINE_NOTICE}")
}

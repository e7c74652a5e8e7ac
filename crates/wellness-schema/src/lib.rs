use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// One of the five fixed self-ratings a user can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MoodLevel {
    VerySad = 1,
    Sad = 2,
    Neutral = 3,
    Good = 4,
    Great = 5,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mood value out of range 1..=5: {0}")]
pub struct InvalidMoodValue(pub u8);

impl MoodLevel {
    pub const ALL: [MoodLevel; 5] = [
        MoodLevel::VerySad,
        MoodLevel::Sad,
        MoodLevel::Neutral,
        MoodLevel::Good,
        MoodLevel::Great,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            MoodLevel::VerySad => "Very Sad",
            MoodLevel::Sad => "Sad",
            MoodLevel::Neutral => "Neutral",
            MoodLevel::Good => "Good",
            MoodLevel::Great => "Great",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MoodLevel::VerySad => "😢",
            MoodLevel::Sad => "😔",
            MoodLevel::Neutral => "😐",
            MoodLevel::Good => "🙂",
            MoodLevel::Great => "😊",
        }
    }
}

impl TryFrom<u8> for MoodLevel {
    type Error = InvalidMoodValue;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MoodLevel::VerySad),
            2 => Ok(MoodLevel::Sad),
            3 => Ok(MoodLevel::Neutral),
            4 => Ok(MoodLevel::Good),
            5 => Ok(MoodLevel::Great),
            other => Err(InvalidMoodValue(other)),
        }
    }
}

impl From<MoodLevel> for u8 {
    fn from(level: MoodLevel) -> Self {
        level.value()
    }
}

/// A logged mood. Never mutated after capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date_label: String,
    pub time_label: String,
    pub mood: MoodLevel,
    pub captured_at_epoch_ms: i64,
}

impl MoodEntry {
    /// Builds an entry stamped with `at`, labelled in the wall-clock of its zone.
    pub fn capture<Tz>(mood: MoodLevel, at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            date_label: at.format("%-m/%-d/%Y").to_string(),
            time_label: at.format("%-I:%M:%S %p").to_string(),
            mood,
            captured_at_epoch_ms: at.timestamp_millis(),
        }
    }

    pub fn value(&self) -> u8 {
        self.mood.value()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
    SystemNotice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Self {
            role: Role::SystemNotice,
            text: text.into(),
        }
    }
}

/// Screen currently shown. Starts at the disclaimer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Disclaimer,
    Chat,
    Mood,
    Resources,
}

impl ViewState {
    /// The header tab for this screen; the disclaimer has none.
    pub fn tab(self) -> Option<Tab> {
        match self {
            ViewState::Disclaimer => None,
            ViewState::Chat => Some(Tab::Chat),
            ViewState::Mood => Some(Tab::Mood),
            ViewState::Resources => Some(Tab::Resources),
        }
    }
}

/// Header tabs reachable once the disclaimer has been acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Chat,
    Mood,
    Resources,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Chat, Tab::Mood, Tab::Resources];

    pub fn next(self) -> Self {
        match self {
            Tab::Chat => Tab::Mood,
            Tab::Mood => Tab::Resources,
            Tab::Resources => Tab::Chat,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Chat => Tab::Resources,
            Tab::Mood => Tab::Chat,
            Tab::Resources => Tab::Mood,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Chat => "💬 Chat",
            Tab::Mood => "📊 Mood",
            Tab::Resources => "🆘 Resources",
        }
    }
}

impl From<Tab> for ViewState {
    fn from(tab: Tab) -> Self {
        match tab {
            Tab::Chat => ViewState::Chat,
            Tab::Mood => ViewState::Mood,
            Tab::Resources => ViewState::Resources,
        }
    }
}

//! Session state and the reducer that drives it.
//!
//! Every user action goes through [`reduce`], which returns the next state and,
//! for chat submissions, the side effect the caller must run. Frontends own the
//! effect execution and feed the outcome back as [`Action::ReplyReceived`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use wellness_schema::{ChatMessage, MoodLevel, Tab, ViewState};

use crate::crisis::detect_crisis;
use crate::insight::generate_insight;
use crate::mood::MoodLog;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub view: ViewState,
    pub messages: Vec<ChatMessage>,
    pub moods: MoodLog,
    pub crisis_alert: bool,
    /// A chat reply is outstanding; submissions are refused until it lands.
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AcknowledgeDisclaimer,
    SelectTab(Tab),
    Submit(String),
    ReplyReceived(String),
    LogMood { mood: MoodLevel, at: DateTime<Local> },
    DismissCrisisAlert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Resolve a reply for this (trimmed) user text.
    RequestReply(String),
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submit of `input` would be accepted.
    pub fn can_submit(&self, input: &str) -> bool {
        self.view == ViewState::Chat && !self.loading && !input.trim().is_empty()
    }

    pub fn insight(&self) -> String {
        generate_insight(self.moods.entries())
    }
}

pub fn mood_notice(mood: MoodLevel) -> String {
    format!(
        "Mood logged: {}. Keep tracking to see your patterns!",
        mood.label()
    )
}

pub fn reduce(mut state: AppState, action: Action) -> (AppState, Option<Effect>) {
    match action {
        Action::AcknowledgeDisclaimer => {
            if state.view == ViewState::Disclaimer {
                state.view = ViewState::Chat;
            }
        }
        Action::SelectTab(tab) => {
            if state.view != ViewState::Disclaimer {
                state.view = tab.into();
            }
        }
        Action::Submit(input) => {
            if !state.can_submit(&input) {
                return (state, None);
            }
            let text = input.trim().to_string();
            if detect_crisis(&text) {
                tracing::info!("crisis phrase detected, showing crisis resources");
                state.crisis_alert = true;
            }
            state.messages.push(ChatMessage::user(text.clone()));
            state.loading = true;
            return (state, Some(Effect::RequestReply(text)));
        }
        Action::ReplyReceived(text) => {
            if state.loading {
                state.messages.push(ChatMessage::assistant(text));
                state.loading = false;
            } else {
                tracing::debug!("dropping reply with no request outstanding");
            }
        }
        Action::LogMood { mood, at } => {
            if state.view != ViewState::Disclaimer {
                state.moods.log(mood, at);
                state.messages.push(ChatMessage::notice(mood_notice(mood)));
            }
        }
        Action::DismissCrisisAlert => {
            state.crisis_alert = false;
        }
    }
    (state, None)
}

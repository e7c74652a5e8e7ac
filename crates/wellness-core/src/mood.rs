use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use wellness_schema::{MoodEntry, MoodLevel};

/// Entries plotted in the trend chart.
pub const CHART_WINDOW: usize = 10;
/// Entries listed under "Recent Entries".
pub const RECENT_WINDOW: usize = 5;

/// Session mood history, oldest first. Entries are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodLog {
    entries: Vec<MoodEntry>,
}

impl MoodLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log<Tz>(&mut self, mood: MoodLevel, at: DateTime<Tz>) -> &MoodEntry
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let entry = MoodEntry::capture(mood, at);
        tracing::debug!(mood = entry.value(), "mood entry logged");
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> &[MoodEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn chart_window(&self) -> &[MoodEntry] {
        self.tail(CHART_WINDOW)
    }

    /// The last few entries, newest first.
    pub fn recent_newest_first(&self) -> impl Iterator<Item = &MoodEntry> {
        self.tail(RECENT_WINDOW).iter().rev()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn log_values(values: &[u8]) -> MoodLog {
        let mut log = MoodLog::new();
        for (i, value) in values.iter().enumerate() {
            let at = Utc.timestamp_opt(1_700_000_000 + i as i64 * 60, 0).unwrap();
            log.log(MoodLevel::try_from(*value).unwrap(), at);
        }
        log
    }

    #[test]
    fn log_appends_in_order() {
        let log = log_values(&[3, 1, 5]);
        let values: Vec<u8> = log.entries().iter().map(|e| e.value()).collect();
        assert_eq!(values, vec![3, 1, 5]);
        assert!(log
            .entries()
            .windows(2)
            .all(|w| w[0].captured_at_epoch_ms < w[1].captured_at_epoch_ms));
    }

    #[test]
    fn log_returns_the_new_entry() {
        let mut log = MoodLog::new();
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let entry = log.log(MoodLevel::Good, at).clone();
        assert_eq!(entry.mood, MoodLevel::Good);
        assert_eq!(entry.captured_at_epoch_ms, 1_700_000_000_000);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn chart_window_keeps_last_ten() {
        let values: Vec<u8> = (0..12).map(|i| (i % 5 + 1) as u8).collect();
        let log = log_values(&values);
        let window = log.chart_window();
        assert_eq!(window.len(), CHART_WINDOW);
        assert_eq!(window[0].captured_at_epoch_ms, log.entries()[2].captured_at_epoch_ms);
    }

    #[test]
    fn recent_is_newest_first_and_bounded() {
        let log = log_values(&[1, 2, 3, 4, 5, 1, 2]);
        let recent: Vec<u8> = log.recent_newest_first().map(|e| e.value()).collect();
        assert_eq!(recent, vec![2, 1, 5, 4, 3]);
    }

    #[test]
    fn tail_of_short_log_is_whole_log() {
        let log = log_values(&[4, 4]);
        assert_eq!(log.tail(5).len(), 2);
        assert!(MoodLog::new().tail(5).is_empty());
    }
}

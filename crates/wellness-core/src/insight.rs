use wellness_schema::MoodEntry;

pub const MIN_ENTRIES_FOR_INSIGHT: usize = 3;
/// The trend compares the first and last entry of this many most recent entries.
pub const TREND_WINDOW: usize = 5;

pub const LOG_MORE_PROMPT: &str = "Log at least 3 mood entries to see personalized insights!";
pub const POSITIVE_INSIGHT: &str = "🌟 You've been feeling mostly positive lately! Keep up the good work with your self-care routines.";
pub const MIXED_INSIGHT: &str = "You've had some ups and downs. Remember to practice self-compassion and reach out for support when needed.";
pub const CONCERN_INSIGHT: &str = "It looks like you've been struggling. Please consider talking to a mental health professional who can provide personalized support.";
pub const IMPROVING_CLAUSE: &str =
    " Your mood has been improving recently - that's great progress!";
pub const DIPPING_CLAUSE: &str =
    " Your mood has dipped recently. What self-care activities have helped you before?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoodBand {
    Positive,
    Mixed,
    Concern,
}

impl MoodBand {
    pub fn from_mean(mean: f64) -> Self {
        if mean >= 4.0 {
            MoodBand::Positive
        } else if mean >= 3.0 {
            MoodBand::Mixed
        } else {
            MoodBand::Concern
        }
    }

    fn sentence(self) -> &'static str {
        match self {
            MoodBand::Positive => POSITIVE_INSIGHT,
            MoodBand::Mixed => MIXED_INSIGHT,
            MoodBand::Concern => CONCERN_INSIGHT,
        }
    }
}

/// Mean over every entry, not only the recent window.
pub fn mean_mood(entries: &[MoodEntry]) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: u32 = entries.iter().map(|e| u32::from(e.value())).sum();
    Some(f64::from(sum) / entries.len() as f64)
}

/// Last minus first over the trailing window; zero for an empty log.
pub fn recent_trend(entries: &[MoodEntry]) -> i32 {
    let window = &entries[entries.len().saturating_sub(TREND_WINDOW)..];
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => i32::from(last.value()) - i32::from(first.value()),
        _ => 0,
    }
}

pub fn generate_insight(entries: &[MoodEntry]) -> String {
    let Some(mean) = mean_mood(entries).filter(|_| entries.len() >= MIN_ENTRIES_FOR_INSIGHT)
    else {
        return LOG_MORE_PROMPT.to_string();
    };

    let mut insight = MoodBand::from_mean(mean).sentence().to_string();
    match recent_trend(entries) {
        t if t > 0 => insight.push_str(IMPROVING_CLAUSE),
        t if t < 0 => insight.push_str(DIPPING_CLAUSE),
        _ => {}
    }
    insight
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wellness_schema::MoodLevel;

    fn entries(values: &[u8]) -> Vec<MoodEntry> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let at = Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap();
                MoodEntry::capture(MoodLevel::try_from(*v).unwrap(), at)
            })
            .collect()
    }

    #[test]
    fn fewer_than_three_entries_asks_for_more() {
        assert_eq!(generate_insight(&[]), LOG_MORE_PROMPT);
        assert_eq!(generate_insight(&entries(&[1])), LOG_MORE_PROMPT);
        assert_eq!(generate_insight(&entries(&[5, 1])), LOG_MORE_PROMPT);
    }

    #[test]
    fn steady_high_mood_is_positive_without_trend() {
        assert_eq!(generate_insight(&entries(&[5, 5, 5])), POSITIVE_INSIGHT);
    }

    #[test]
    fn mixed_band_with_improvement() {
        let list = entries(&[3, 3, 3, 2, 5]);
        assert!((mean_mood(&list).unwrap() - 3.2).abs() < 1e-9);
        assert_eq!(recent_trend(&list), 2);
        assert_eq!(
            generate_insight(&list),
            format!("{MIXED_INSIGHT}{IMPROVING_CLAUSE}")
        );
    }

    #[test]
    fn late_jump_improves_but_mean_stays_low() {
        // Mean is 13 / 5 = 2.6, so the band is concern even though the trend is +3.
        let list = entries(&[2, 2, 2, 2, 5]);
        assert!((mean_mood(&list).unwrap() - 2.6).abs() < 1e-9);
        assert_eq!(recent_trend(&list), 3);
        assert_eq!(
            generate_insight(&list),
            format!("{CONCERN_INSIGHT}{IMPROVING_CLAUSE}")
        );
    }

    #[test]
    fn low_mood_with_dip_recommends_professional() {
        let list = entries(&[3, 2, 1]);
        assert_eq!(
            generate_insight(&list),
            format!("{CONCERN_INSIGHT}{DIPPING_CLAUSE}")
        );
    }

    #[test]
    fn trend_uses_only_last_five_entries() {
        // Whole-history first is 1, but the window starts at the second 4.
        let list = entries(&[1, 4, 4, 4, 4, 4]);
        assert_eq!(recent_trend(&list), 0);
        assert_eq!(generate_insight(&list), MIXED_INSIGHT);
    }

    #[test]
    fn mean_uses_all_entries() {
        // Last five average 4, but the early 1s pull the mean into the concern band.
        let list = entries(&[1, 1, 1, 1, 1, 4, 4, 4, 4, 4]);
        assert_eq!(MoodBand::from_mean(mean_mood(&list).unwrap()), MoodBand::Concern);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(MoodBand::from_mean(4.0), MoodBand::Positive);
        assert_eq!(MoodBand::from_mean(3.99), MoodBand::Mixed);
        assert_eq!(MoodBand::from_mean(3.0), MoodBand::Mixed);
        assert_eq!(MoodBand::from_mean(2.99), MoodBand::Concern);
    }

    #[test]
    fn insight_is_deterministic() {
        let list = entries(&[4, 2, 5, 3]);
        assert_eq!(generate_insight(&list), generate_insight(&list));
    }
}

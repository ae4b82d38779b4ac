use std::collections::BTreeMap;

use crate::db::models::MoodEntry;

/// Aggregate view over a set of mood entries (a class, a user's history, or
/// a teacher's whole roster).
#[derive(Debug, Clone, PartialEq)]
pub struct MoodSummary {
    pub total_entries: usize,
    /// Arithmetic mean of the scores, rounded to 2 decimal places.
    pub average_score: f64,
    /// Count per mood label, keyed by label string.
    pub histogram: BTreeMap<String, i64>,
    /// Label with the highest count. Ties break toward the lexicographically
    /// smallest label via the comparator in `summarize`.
    pub most_common_mood: String,
}

/// Summarize a non-empty set of entries; returns None when there is nothing
/// to aggregate so callers can surface their own empty-state response.
pub fn summarize(entries: &[MoodEntry]) -> Option<MoodSummary> {
    if entries.is_empty() {
        return None;
    }

    let sum: i64 = entries.iter().map(|e| e.score).sum();
    let average_score = round2(sum as f64 / entries.len() as f64);

    let mut histogram: BTreeMap<String, i64> = BTreeMap::new();
    for entry in entries {
        *histogram.entry(entry.mood.clone()).or_insert(0) += 1;
    }

    let most_common_mood = histogram
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(mood, _)| mood.clone())?;

    Some(MoodSummary {
        total_entries: entries.len(),
        average_score,
        histogram,
        most_common_mood,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: i64, mood: &str) -> MoodEntry {
        MoodEntry {
            id: 0,
            user_id: 1,
            class_id: 1,
            score,
            mood: mood.to_string(),
            timestamp: "2025-01-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn empty_set_has_no_summary() {
        assert_eq!(summarize(&[]), None);
    }

    #[test]
    fn average_of_5_15_25_is_15() {
        let entries = vec![
            entry(5, "Tired"),
            entry(15, "Normal"),
            entry(25, "Energetic"),
        ];
        let summary = summarize(&entries).unwrap();
        assert_eq!(summary.average_score, 15.0);
        assert_eq!(summary.total_entries, 3);
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let entries = vec![entry(1, "Tired"), entry(1, "Tired"), entry(2, "Tired")];
        let summary = summarize(&entries).unwrap();
        assert_eq!(summary.average_score, 1.33);
    }

    #[test]
    fn histogram_counts_sum_to_total() {
        let entries = vec![
            entry(5, "Tired"),
            entry(6, "Tired"),
            entry(15, "Normal"),
            entry(25, "Energetic"),
        ];
        let summary = summarize(&entries).unwrap();
        let total: i64 = summary.histogram.values().sum();
        assert_eq!(total as usize, entries.len());
        assert_eq!(summary.histogram["Tired"], 2);
    }

    #[test]
    fn most_common_mood_has_max_count() {
        let entries = vec![
            entry(15, "Normal"),
            entry(16, "Normal"),
            entry(25, "Energetic"),
        ];
        let summary = summarize(&entries).unwrap();
        assert_eq!(summary.most_common_mood, "Normal");
    }

    #[test]
    fn ties_break_lexicographically() {
        let entries = vec![entry(15, "Normal"), entry(25, "Energetic")];
        let summary = summarize(&entries).unwrap();
        // Both moods appear once; "Energetic" sorts before "Normal".
        assert_eq!(summary.most_common_mood, "Energetic");
    }
}

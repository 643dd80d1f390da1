//! Count-derived presentation: background hue, emoji and message.
//!
//! All functions here are pure functions of the count.
//!
//! # Threshold selection
//!
//! A [`ThresholdTable`] is an ordered list of `(threshold, value)` pairs.
//! Entries are stable-sorted by ascending threshold when the table is built,
//! and [`ThresholdTable::select`] returns the value of the **last** entry
//! whose threshold is at or below the count. Two entries with the same
//! threshold therefore resolve to the one declared later. A count below every
//! threshold selects the first entry.

use crate::color::Hsl;
use serde::{Deserialize, Serialize, Serializer};

/// Hue at the low end of the color range (green).
pub const LOW_HUE: f32 = 120.0;
/// Hue at the high end of the color range (red).
pub const HIGH_HUE: f32 = 0.0;
/// Default half-width of the color range.
pub const DEFAULT_COLOR_RANGE: i64 = 100;

/// Background color for a count.
///
/// The count is clamped to `[-range, range]` and mapped linearly onto hues
/// from green (`-range`) to red (`+range`).
#[must_use]
pub fn count_color(count: i64, range: i64) -> Hsl {
    let range = range.clamp(1, i64::MAX / 2);
    let clamped = count.clamp(-range, range);
    let t = (clamped + range) as f32 / (2 * range) as f32;
    Hsl::new((HIGH_HUE - LOW_HUE).mul_add(t, LOW_HUE), 70.0, 45.0)
}

/// One `(threshold, value)` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold<T> {
    /// Smallest count this row applies to
    pub at: i64,
    /// Value shown
    pub value: T,
}

/// Ordered threshold lookup. See the module docs for the selection rule.
///
/// Serializes as a plain list of rows, the same shape it deserializes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Threshold<T>>")]
pub struct ThresholdTable<T> {
    entries: Vec<Threshold<T>>,
}

impl<T: Serialize> Serialize for ThresholdTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<T> ThresholdTable<T> {
    /// Build a table. Returns `None` when `entries` is empty.
    pub fn new(entries: impl IntoIterator<Item = (i64, T)>) -> Option<Self> {
        let rows: Vec<Threshold<T>> = entries
            .into_iter()
            .map(|(at, value)| Threshold { at, value })
            .collect();
        Self::try_from(rows).ok()
    }

    /// Stable-sort rows by threshold; equal thresholds keep declaration order.
    fn sorted(mut entries: Vec<Threshold<T>>) -> Self {
        entries.sort_by_key(|e| e.at);
        Self { entries }
    }

    /// Value for `count`.
    #[must_use]
    pub fn select(&self, count: i64) -> &T {
        let idx = self.entries.partition_point(|e| e.at <= count);
        &self.entries[idx.saturating_sub(1)].value
    }

    /// Rows in ascending threshold order.
    #[must_use]
    pub fn entries(&self) -> &[Threshold<T>] {
        &self.entries
    }
}

/// Default emoji table.
#[must_use]
pub fn default_emoji() -> ThresholdTable<String> {
    table([
        (-100, "🥶"),
        (-50, "😱"),
        (-10, "😟"),
        (0, "🙂"),
        (10, "😀"),
        (50, "🤩"),
        (100, "🚀"),
    ])
}

/// Default message table.
#[must_use]
pub fn default_messages() -> ThresholdTable<String> {
    table([
        (-100, "Deep freeze."),
        (-50, "Way below zero."),
        (-10, "Slipping under."),
        (0, "Ready to count."),
        (10, "Nice start!"),
        (50, "Halfway to the top!"),
        (100, "Off the charts!"),
    ])
}

impl<T> TryFrom<Vec<Threshold<T>>> for ThresholdTable<T> {
    type Error = &'static str;

    fn try_from(entries: Vec<Threshold<T>>) -> Result<Self, Self::Error> {
        if entries.is_empty() {
            return Err("threshold table needs at least one row");
        }
        Ok(Self::sorted(entries))
    }
}

// Built-in tables are literal and never empty.
fn table<const N: usize>(rows: [(i64, &str); N]) -> ThresholdTable<String> {
    ThresholdTable::sorted(
        rows.into_iter()
            .map(|(at, s)| Threshold {
                at,
                value: s.to_string(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_color_endpoints_and_midpoint() {
        assert_eq!(count_color(-100, 100).h, 120.0);
        assert_eq!(count_color(0, 100).h, 60.0);
        assert_eq!(count_color(100, 100).h, 0.0);
    }

    #[test]
    fn test_color_clamps_outside_range() {
        assert_eq!(count_color(-5000, 100), count_color(-100, 100));
        assert_eq!(count_color(i64::MAX, 100), count_color(100, 100));
        assert_eq!(count_color(i64::MIN, 100), count_color(-100, 100));
    }

    #[test]
    fn test_color_css() {
        assert_eq!(count_color(0, 100).to_css(), "hsl(60, 70%, 45%)");
    }

    #[test]
    fn test_select_last_at_or_below() {
        let t = ThresholdTable::new([(0, "zero"), (10, "ten"), (-10, "minus ten")]).unwrap();
        assert_eq!(*t.select(0), "zero");
        assert_eq!(*t.select(9), "zero");
        assert_eq!(*t.select(10), "ten");
        assert_eq!(*t.select(-1), "minus ten");
        assert_eq!(*t.select(1000), "ten");
    }

    #[test]
    fn test_select_below_everything_uses_first() {
        let t = ThresholdTable::new([(0, "a"), (5, "b")]).unwrap();
        assert_eq!(*t.select(-99), "a");
    }

    #[test]
    fn test_duplicate_threshold_later_declaration_wins() {
        let t = ThresholdTable::new([(0, "first"), (5, "five"), (0, "second")]).unwrap();
        assert_eq!(*t.select(0), "second");
        assert_eq!(*t.select(3), "second");
        assert_eq!(*t.select(5), "five");
    }

    #[test]
    fn test_entries_sorted() {
        let t = ThresholdTable::new([(3, 'c'), (1, 'a'), (2, 'b')]).unwrap();
        let ats: Vec<i64> = t.entries().iter().map(|e| e.at).collect();
        assert_eq!(ats, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(ThresholdTable::<u8>::new([]).is_none());
        assert!(serde_json::from_str::<ThresholdTable<String>>("[]").is_err());
    }

    #[test]
    fn test_table_from_json_sorts() {
        let t: ThresholdTable<String> =
            serde_json::from_str(r#"[{"at": 5, "value": "hi"}, {"at": -5, "value": "lo"}]"#)
                .unwrap();
        assert_eq!(t.select(0), "lo");
        assert_eq!(t.select(5), "hi");
    }

    #[test]
    fn test_table_serializes_as_row_list() {
        let t = ThresholdTable::new([(5, "hi".to_string()), (-5, "lo".to_string())]).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"[{"at":-5,"value":"lo"},{"at":5,"value":"hi"}]"#);
        let back: ThresholdTable<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_default_tables() {
        assert_eq!(default_emoji().select(0), "🙂");
        assert_eq!(default_emoji().select(-10), "😟");
        assert_eq!(default_emoji().select(250), "🚀");
        assert_eq!(default_messages().select(49), "Nice start!");
        assert_eq!(default_messages().select(-1000), "Deep freeze.");
    }

    proptest! {
        #[test]
        fn prop_hue_in_range_and_monotonic(a in -300i64..300, b in -300i64..300) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let h_lo = count_color(lo, 100).h;
            let h_hi = count_color(hi, 100).h;
            prop_assert!((0.0..=120.0).contains(&h_lo));
            prop_assert!(h_hi <= h_lo);
        }

        #[test]
        fn prop_select_matches_linear_scan(
            rows in prop::collection::vec((-50i64..50, 0u32..1000), 1..20),
            count in -80i64..80,
        ) {
            let table = ThresholdTable::new(rows.clone()).unwrap();
            let mut sorted = rows.clone();
            sorted.sort_by_key(|r| r.0);
            let expected = sorted
                .iter()
                .filter(|r| r.0 <= count)
                .last()
                .unwrap_or(&sorted[0])
                .1;
            prop_assert_eq!(*table.select(count), expected);
        }
    }
}

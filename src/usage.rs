//! Color usage aggregation.
//!
//! A [`UsageTable`] counts how often each [`CanonicalColor`] was set. Counts
//! only grow; tables from separate passes can be merged.

use crate::color::CanonicalColor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Occurrence count per canonical color.
///
/// Iteration follows first-seen order. Equality ignores order.
///
/// ```
/// use pdf_chroma::usage::UsageTable;
/// use pdf_chroma::color::CanonicalColor;
///
/// let mut table = UsageTable::new();
/// table.record(CanonicalColor::BLACK);
/// table.record(CanonicalColor::BLACK);
/// assert_eq!(table.count(CanonicalColor::BLACK), 2);
/// assert_eq!(table.total(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsageTable {
    counts: IndexMap<CanonicalColor, u64>,
}

/// One row of a ranked usage listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorUsage {
    /// The color
    pub color: CanonicalColor,
    /// Number of times it was set
    pub count: u64,
    /// Fraction of all recorded uses, 0.0 to 1.0
    pub share: f64,
    /// Nearest CSS3 color keyword
    pub name: &'static str,
}

impl UsageTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one use of `color`.
    pub fn record(&mut self, color: CanonicalColor) {
        *self.counts.entry(color).or_insert(0) += 1;
    }

    /// Count `n` uses of `color`.
    pub fn record_n(&mut self, color: CanonicalColor, n: u64) {
        if n > 0 {
            *self.counts.entry(color).or_insert(0) += n;
        }
    }

    /// Uses of `color`, 0 when never seen.
    pub fn count(&self, color: CanonicalColor) -> u64 {
        self.counts.get(&color).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct colors.
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Colors and counts in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalColor, u64)> + '_ {
        self.counts.iter().map(|(&color, &count)| (color, count))
    }

    /// Add every count of `other` to this table.
    pub fn merge(&mut self, other: &UsageTable) {
        for (color, count) in other.iter() {
            self.record_n(color, count);
        }
    }

    /// Fraction of all uses that went to `color`. 0.0 for an empty table.
    pub fn share(&self, color: CanonicalColor) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.count(color) as f64 / total as f64
    }

    /// All colors, most used first. Equal counts are ordered by color.
    pub fn ranked(&self) -> Vec<ColorUsage> {
        let total = self.total();
        let mut rows: Vec<(CanonicalColor, u64)> = self.iter().collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        rows.into_iter()
            .map(|(color, count)| ColorUsage {
                color,
                count,
                share: if total == 0 { 0.0 } else { count as f64 / total as f64 },
                name: color.css_name(),
            })
            .collect()
    }

    /// The `n` most used colors.
    pub fn top(&self, n: usize) -> Vec<ColorUsage> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }

    /// The underlying color to count mapping.
    pub fn as_map(&self) -> &IndexMap<CanonicalColor, u64> {
        &self.counts
    }

    /// Consume the table, returning the mapping.
    pub fn into_map(self) -> IndexMap<CanonicalColor, u64> {
        self.counts
    }
}

impl Extend<CanonicalColor> for UsageTable {
    fn extend<I: IntoIterator<Item = CanonicalColor>>(&mut self, iter: I) {
        for color in iter {
            self.record(color);
        }
    }
}

impl FromIterator<CanonicalColor> for UsageTable {
    fn from_iter<I: IntoIterator<Item = CanonicalColor>>(iter: I) -> Self {
        let mut table = UsageTable::new();
        table.extend(iter);
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: CanonicalColor = CanonicalColor::new(255, 0, 0);

    #[test]
    fn test_record_inserts_then_increments() {
        let mut table = UsageTable::new();
        assert_eq!(table.count(RED), 0);
        table.record(RED);
        assert_eq!(table.count(RED), 1);
        table.record(RED);
        assert_eq!(table.count(RED), 2);
        assert_eq!(table.distinct(), 1);
    }

    #[test]
    fn test_total_and_share() {
        let table: UsageTable = [RED, RED, RED, CanonicalColor::BLACK].into_iter().collect();
        assert_eq!(table.total(), 4);
        assert!((table.share(RED) - 0.75).abs() < f64::EPSILON);
        assert_eq!(UsageTable::new().share(RED), 0.0);
    }

    #[test]
    fn test_ranked_order() {
        let table: UsageTable = [
            CanonicalColor::WHITE,
            RED,
            CanonicalColor::BLACK,
            RED,
        ]
        .into_iter()
        .collect();

        let ranked = table.ranked();
        let order: Vec<_> = ranked.iter().map(|row| row.color).collect();
        // RED first; BLACK and WHITE tie and sort by channels.
        assert_eq!(order, vec![RED, CanonicalColor::BLACK, CanonicalColor::WHITE]);
        assert_eq!(ranked[0].name, "red");
        assert!((ranked[0].share - 0.5).abs() < f64::EPSILON);

        assert_eq!(table.top(1).len(), 1);
        assert_eq!(table.top(10).len(), 3);
    }

    #[test]
    fn test_merge() {
        let mut a: UsageTable = [RED].into_iter().collect();
        let b: UsageTable = [RED, CanonicalColor::BLACK].into_iter().collect();
        a.merge(&b);
        assert_eq!(a.count(RED), 2);
        assert_eq!(a.count(CanonicalColor::BLACK), 1);
        assert_eq!(a.total(), 3);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a: UsageTable = [RED, CanonicalColor::BLACK].into_iter().collect();
        let b: UsageTable = [CanonicalColor::BLACK, RED].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_serializes_as_hex_map() {
        let table: UsageTable = [RED, RED].into_iter().collect();
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r##"{"#FF0000":2}"##);
        let back: UsageTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}

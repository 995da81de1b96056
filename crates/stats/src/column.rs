use std::collections::HashMap;

use serde::Serialize;

/// Label used for SQL NULLs in the frequency table.
pub const NULL_LABEL: &str = "(null)";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Frequency summary of one result column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ColumnStats {
    total: usize,
    nulls: usize,
    empty: usize,
    values: Vec<ValueCount>,
}

impl ColumnStats {
    /// Counts every value; `None` is a NULL and is tabulated as [`NULL_LABEL`].
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut total = 0;
        let mut nulls = 0;
        let mut empty = 0;

        for value in values {
            total += 1;
            let key = match &value {
                None => {
                    nulls += 1;
                    NULL_LABEL
                }
                Some(value) => {
                    if value.as_ref().is_empty() {
                        empty += 1;
                    }
                    value.as_ref()
                }
            };
            *counts.entry(key.to_string()).or_insert(0) += 1;
        }

        let mut values: Vec<ValueCount> = counts
            .into_iter()
            .map(|(value, count)| ValueCount { value, count })
            .collect();
        values.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

        Self {
            total,
            nulls,
            empty,
            values,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn null_count(&self) -> usize {
        self.nulls
    }

    pub fn empty_count(&self) -> usize {
        self.empty
    }

    /// Number of distinct values, NULL included.
    pub fn distinct_count(&self) -> usize {
        self.values.len()
    }

    /// Values that occur exactly once.
    pub fn singleton_count(&self) -> usize {
        self.values.iter().filter(|v| v.count == 1).count()
    }

    /// Every distinct value, most frequent first.
    pub fn values(&self) -> &[ValueCount] {
        &self.values
    }

    pub fn top_values(&self, n: usize) -> &[ValueCount] {
        &self.values[..n.min(self.values.len())]
    }

    /// Percentage of all rows, 0 when the column is empty.
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(values: &[Option<&str>]) -> ColumnStats {
        ColumnStats::from_values(values.iter().copied())
    }

    #[test]
    fn counts_and_orders_by_frequency() {
        let stats = stats(&[Some("b"), Some("a"), Some("b"), Some("c"), Some("a"), Some("b")]);
        assert_eq!(stats.total(), 6);
        assert_eq!(stats.distinct_count(), 3);
        assert_eq!(
            stats.values(),
            &[
                ValueCount { value: "b".into(), count: 3 },
                ValueCount { value: "a".into(), count: 2 },
                ValueCount { value: "c".into(), count: 1 },
            ]
        );
        assert_eq!(stats.singleton_count(), 1);
    }

    #[test]
    fn ties_break_alphabetically() {
        let stats = stats(&[Some("z"), Some("m"), Some("a")]);
        let order: Vec<_> = stats.values().iter().map(|v| v.value.as_str()).collect();
        assert_eq!(order, vec!["a", "m", "z"]);
    }

    #[test]
    fn nulls_and_empty_strings_are_tracked() {
        let stats = stats(&[None, Some(""), None, Some("x")]);
        assert_eq!(stats.null_count(), 2);
        assert_eq!(stats.empty_count(), 1);
        assert_eq!(stats.values()[0].value, NULL_LABEL);
        assert_eq!(stats.distinct_count(), 3);
    }

    #[test]
    fn top_values_and_percent() {
        let stats = stats(&[Some("a"), Some("a"), Some("b"), Some("c")]);
        assert_eq!(stats.top_values(2).len(), 2);
        assert_eq!(stats.top_values(10).len(), 3);
        assert_eq!(stats.percent(2), 50.0);
        assert_eq!(ColumnStats::default().percent(3), 0.0);
    }

    #[test]
    fn serializes_for_host() {
        let json = serde_json::to_value(stats(&[Some("a")])).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["values"][0]["value"], "a");
    }
}

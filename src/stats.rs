//! Grouping and summary statistics over loaded records.

use crate::dataset::{Density, Method, Record};
use std::collections::BTreeMap;

/// Categorical or ordinal field usable as a grouping key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    Method,
    Density,
    VertexCount,
}

/// One component of a group key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Key {
    Method(Method),
    Density(Density),
    VertexCount(u32),
}

impl KeyField {
    fn extract(self, record: &Record) -> Key {
        match self {
            KeyField::Method => Key::Method(record.method.clone()),
            KeyField::Density => Key::Density(record.density.clone()),
            KeyField::VertexCount => Key::VertexCount(record.vertex_count),
        }
    }
}

/// Numeric field to summarize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    ElapsedMs,
    IterationCount,
}

impl Metric {
    pub fn value(self, record: &Record) -> f64 {
        match self {
            Metric::ElapsedMs => record.elapsed_ms,
            Metric::IterationCount => record.iteration_count as f64,
        }
    }
}

/// Which statistics to compute per group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatSet {
    pub mean: bool,
    pub std: bool,
}

impl StatSet {
    pub const MEAN: StatSet = StatSet { mean: true, std: false };
    pub const MEAN_STD: StatSet = StatSet { mean: true, std: true };
}

/// Summary of one group. `None` means undefined, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GroupStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

impl GroupStats {
    /// Summarize a slice of values with the requested statistics.
    ///
    /// The standard deviation uses the sample (n-1) convention and is undefined
    /// for fewer than two values.
    pub fn from_values(values: &[f64], stats: StatSet) -> Self {
        let count = values.len();
        if count == 0 {
            return Self::default();
        }

        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if stats.std && count >= 2 {
            let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            Some(var.sqrt())
        } else {
            None
        };

        Self {
            count,
            mean: stats.mean.then_some(mean),
            std,
        }
    }
}

/// Group records by the given key fields and summarize `metric` per group.
///
/// Groups are returned in key order, so the result does not depend on row order.
pub fn aggregate(
    records: &[Record],
    keys: &[KeyField],
    metric: Metric,
    stats: StatSet,
) -> BTreeMap<Vec<Key>, GroupStats> {
    let mut groups: BTreeMap<Vec<Key>, Vec<f64>> = BTreeMap::new();
    for record in records {
        let key = keys.iter().map(|k| k.extract(record)).collect();
        groups.entry(key).or_default().push(metric.value(record));
    }

    groups
        .into_iter()
        .map(|(key, values)| (key, GroupStats::from_values(&values, stats)))
        .collect()
}

/// Summarize `metric` over the records matching `filter`
pub fn summarize<F>(records: &[Record], metric: Metric, stats: StatSet, filter: F) -> GroupStats
where
    F: Fn(&Record) -> bool,
{
    let values: Vec<f64> = records
        .iter()
        .filter(|r| filter(r))
        .map(|r| metric.value(r))
        .collect();
    GroupStats::from_values(&values, stats)
}

/// Ratio of two means. Undefined when either side is missing or the denominator
/// is not strictly positive.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d <= 0.0 {
        return None;
    }
    let r = n / d;
    r.is_finite().then_some(r)
}

/// Distinct vertex counts present in the table, ascending
pub fn vertex_counts(records: &[Record]) -> Vec<u32> {
    let mut counts: Vec<u32> = records.iter().map(|r| r.vertex_count).collect();
    counts.sort_unstable();
    counts.dedup();
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(method: Method, density: Density, vertex_count: u32, elapsed_ms: f64) -> Record {
        Record {
            method,
            density,
            vertex_count,
            elapsed_ms,
            iteration_count: (elapsed_ms * 10.0) as u64,
        }
    }

    #[test]
    fn test_single_member_group() {
        let stats = GroupStats::from_values(&[4.0], StatSet::MEAN_STD);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, Some(4.0));
        assert_eq!(stats.std, None);
    }

    #[test]
    fn test_empty_group_is_undefined() {
        let stats = GroupStats::from_values(&[], StatSet::MEAN_STD);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.std, None);
    }

    #[test]
    fn test_sample_standard_deviation() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = GroupStats::from_values(&values, StatSet::MEAN_STD);
        assert_eq!(stats.mean, Some(5.0));
        let std = stats.std.unwrap();
        assert!((std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_mean_only_skips_std() {
        let stats = GroupStats::from_values(&[1.0, 3.0], StatSet::MEAN);
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.std, None);
    }

    #[test]
    fn test_aggregate_groups_by_key_tuple() {
        let records = vec![
            record(Method::PlainSearch, Density::Dense, 20, 8.0),
            record(Method::PlainSearch, Density::Sparse, 10, 1.0),
            record(Method::PlainSearch, Density::Dense, 20, 4.0),
            record(Method::PrunedSearch, Density::Dense, 20, 2.0),
        ];
        let groups = aggregate(
            &records,
            &[KeyField::Method, KeyField::VertexCount],
            Metric::ElapsedMs,
            StatSet::MEAN_STD,
        );

        assert_eq!(groups.len(), 3);
        let plain_20 = groups[&vec![Key::Method(Method::PlainSearch), Key::VertexCount(20)]];
        assert_eq!(plain_20.count, 2);
        assert_eq!(plain_20.mean, Some(6.0));

        let keys: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(keys[0], vec![Key::Method(Method::PlainSearch), Key::VertexCount(10)]);
    }

    #[test]
    fn test_aggregate_ignores_row_order() {
        let mut records = vec![
            record(Method::PlainSearch, Density::Dense, 10, 1.0),
            record(Method::PlainSearch, Density::Dense, 10, 2.0),
            record(Method::PlainSearch, Density::Sparse, 30, 7.0),
        ];
        let keys = [KeyField::Density, KeyField::VertexCount];
        let forward = aggregate(&records, &keys, Metric::IterationCount, StatSet::MEAN_STD);
        records.reverse();
        let backward = aggregate(&records, &keys, Metric::IterationCount, StatSet::MEAN_STD);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_speedup_ratio() {
        assert_eq!(ratio(Some(100.0), Some(50.0)), Some(2.0));
        assert_eq!(ratio(Some(100.0), Some(0.0)), None);
        assert_eq!(ratio(Some(100.0), None), None);
        assert_eq!(ratio(None, Some(50.0)), None);
    }

    #[test]
    fn test_summarize_with_filter() {
        let records = vec![
            record(Method::PlainSearch, Density::Dense, 10, 3.0),
            record(Method::PrunedSearch, Density::Dense, 10, 9.0),
        ];
        let stats = summarize(&records, Metric::ElapsedMs, StatSet::MEAN, |r| {
            r.method == Method::PrunedSearch
        });
        assert_eq!(stats.mean, Some(9.0));

        let none = summarize(&records, Metric::ElapsedMs, StatSet::MEAN, |r| r.vertex_count == 99);
        assert_eq!(none.mean, None);
    }

    #[test]
    fn test_vertex_counts_sorted_distinct() {
        let records = vec![
            record(Method::PlainSearch, Density::Dense, 30, 1.0),
            record(Method::PlainSearch, Density::Dense, 10, 1.0),
            record(Method::PlainSearch, Density::Sparse, 30, 1.0),
        ];
        assert_eq!(vertex_counts(&records), vec![10, 30]);
    }
}

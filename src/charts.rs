//! Data behind each of the five comparison charts.
//!
//! Every function here is pure: records in, plot-ready points out. Rendering
//! lives in `plot`.

use crate::dataset::{Density, Method, Record};
use crate::stats::{self, GroupStats, Key, KeyField, Metric, StatSet};

/// What a series represents, used to pick its style
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesKey {
    Density(Density),
    Method(Method),
}

/// One plotted point: vertex count, mean value and optional spread
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub std: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub key: SeriesKey,
    pub points: Vec<Point>,
}

impl Series {
    /// Points that can be placed on a logarithmic axis
    pub fn log_points(&self) -> Vec<Point> {
        self.points.iter().copied().filter(|p| p.y > 0.0).collect()
    }
}

/// Fixed arrow annotation on the search-space chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub target: (f64, f64),
    pub text_at: (f64, f64),
    pub text: &'static str,
}

/// Plain search at V=30 on dense graphs, the first run to pass four million iterations
pub const EXPONENTIAL_GROWTH: Annotation = Annotation {
    target: (30.0, 4_392_118.0),
    text_at: (25.0, 1e6),
    text: "Exponential growth",
};

/// Mean (and optionally std) of `metric` per vertex count for the filtered rows.
/// Groups without a defined mean are skipped, never plotted as zero.
fn by_vertex_count<F>(records: &[Record], metric: Metric, stats: StatSet, filter: F) -> Vec<Point>
where
    F: Fn(&Record) -> bool,
{
    let subset: Vec<Record> = records.iter().filter(|r| filter(r)).cloned().collect();
    stats::aggregate(&subset, &[KeyField::VertexCount], metric, stats)
        .into_iter()
        .filter_map(|(key, group)| match (key.as_slice(), group) {
            ([Key::VertexCount(v)], GroupStats { mean: Some(mean), std, .. }) => Some(Point {
                x: f64::from(*v),
                y: mean,
                std,
            }),
            _ => None,
        })
        .collect()
}

/// Chart 1: elapsed time per vertex count for one method, one series per density class
pub fn time_by_density(records: &[Record], method: &Method) -> Vec<Series> {
    Density::COMPARED
        .into_iter()
        .map(|density| {
            let points = by_vertex_count(records, Metric::ElapsedMs, StatSet::MEAN_STD, |r| {
                &r.method == method && r.density == density
            });
            Series {
                key: SeriesKey::Density(density),
                points,
            }
        })
        .collect()
}

/// Chart 2: plain/pruned mean-time ratio per density class and vertex count.
/// A point exists only when both means exist and the pruned mean is positive.
pub fn pruning_speedup(records: &[Record]) -> Vec<Series> {
    let vertex_counts = stats::vertex_counts(records);

    Density::COMPARED
        .into_iter()
        .map(|density| {
            let points = vertex_counts
                .iter()
                .filter_map(|&v| {
                    let mean_of = |method: Method| {
                        stats::summarize(records, Metric::ElapsedMs, StatSet::MEAN, |r| {
                            r.method == method && r.density == density && r.vertex_count == v
                        })
                        .mean
                    };
                    let speedup =
                        stats::ratio(mean_of(Method::PlainSearch), mean_of(Method::PrunedSearch))?;
                    Some(Point {
                        x: f64::from(v),
                        y: speedup,
                        std: None,
                    })
                })
                .collect();
            Series {
                key: SeriesKey::Density(density),
                points,
            }
        })
        .collect()
}

/// Chart 3: mean iteration count per vertex count for one method, per density class
pub fn search_space(records: &[Record], method: &Method) -> Vec<Series> {
    Density::COMPARED
        .into_iter()
        .map(|density| {
            let points = by_vertex_count(records, Metric::IterationCount, StatSet::MEAN, |r| {
                &r.method == method && r.density == density
            });
            Series {
                key: SeriesKey::Density(density),
                points,
            }
        })
        .collect()
}

/// Chart 4: elapsed time of every known method on one density class.
/// Methods without rows are left out.
pub fn method_comparison(records: &[Record], density: &Density) -> Vec<Series> {
    Method::KNOWN
        .into_iter()
        .filter(|method| {
            records
                .iter()
                .any(|r| &r.method == method && &r.density == density)
        })
        .map(|method| {
            let points = by_vertex_count(records, Metric::ElapsedMs, StatSet::MEAN_STD, |r| {
                r.method == method && &r.density == density
            });
            Series {
                key: SeriesKey::Method(method),
                points,
            }
        })
        .collect()
}

/// One panel of the grouped bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarPanel {
    pub metric: Metric,
    pub vertex_counts: Vec<u32>,
    /// Per density class, one optional mean per vertex count
    pub groups: Vec<(Density, Vec<Option<f64>>)>,
}

/// Chart 5: sparse vs dense means at a few vertex counts, for time and iterations
pub fn grouped_bars(records: &[Record], method: &Method, vertex_counts: &[u32]) -> [BarPanel; 2] {
    let panel = |metric: Metric| BarPanel {
        metric,
        vertex_counts: vertex_counts.to_vec(),
        groups: Density::COMPARED
            .into_iter()
            .map(|density| {
                let means = vertex_counts
                    .iter()
                    .map(|&v| {
                        stats::summarize(records, metric, StatSet::MEAN, |r| {
                            &r.method == method && r.density == density && r.vertex_count == v
                        })
                        .mean
                    })
                    .collect();
                (density, means)
            })
            .collect(),
    };

    [panel(Metric::ElapsedMs), panel(Metric::IterationCount)]
}

/// Split a series into contiguous runs of points that carry a spread.
/// Each run of two or more points becomes one shaded band.
pub fn band_runs(points: &[Point]) -> Vec<Vec<(f64, f64, f64)>> {
    let mut runs = Vec::new();
    let mut current: Vec<(f64, f64, f64)> = Vec::new();

    for p in points {
        match p.std {
            Some(std) => current.push((p.x, p.y - std, p.y + std)),
            None => {
                if current.len() >= 2 {
                    runs.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
        }
    }
    if current.len() >= 2 {
        runs.push(current);
    }
    runs
}

//! Text summary tables and JSON export of aggregated results.

use crate::dataset::{Density, Method, Record};
use crate::stats::{self, GroupStats, Key, KeyField, Metric, StatSet};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use num_format::{Locale, ToFormattedString};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Aggregated measurements of one (method, density, vertex count) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub method: String,
    pub density_class: String,
    pub vertex_count: u32,
    pub samples: usize,
    pub elapsed_mean: Option<f64>,
    pub elapsed_std: Option<f64>,
    pub iteration_mean: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Export<'a> {
    pub generated_at: DateTime<Utc>,
    pub source: &'a str,
    pub records: usize,
    pub groups: Vec<GroupRow>,
}

/// Per-cell statistics in key order
pub fn group_rows(records: &[Record]) -> Vec<GroupRow> {
    let keys = [KeyField::Method, KeyField::Density, KeyField::VertexCount];
    let elapsed = stats::aggregate(records, &keys, Metric::ElapsedMs, StatSet::MEAN_STD);
    let iterations = stats::aggregate(records, &keys, Metric::IterationCount, StatSet::MEAN);

    elapsed
        .into_iter()
        .filter_map(|(key, time)| {
            let iter_mean = iterations.get(&key).and_then(|g| g.mean);
            match key.as_slice() {
                [Key::Method(m), Key::Density(d), Key::VertexCount(v)] => Some(GroupRow {
                    method: m.to_string(),
                    density_class: d.to_string(),
                    vertex_count: *v,
                    samples: time.count,
                    elapsed_mean: time.mean,
                    elapsed_std: time.std,
                    iteration_mean: iter_mean,
                }),
                _ => None,
            }
        })
        .collect()
}

/// Write the aggregated groups as pretty-printed JSON
pub fn export_json(records: &[Record], source: &Path, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON export: {}", path.display()))?;
    let source = source.to_string_lossy();
    let export = Export {
        generated_at: Utc::now(),
        source: &source,
        records: records.len(),
        groups: group_rows(records),
    };
    serde_json::to_writer_pretty(BufWriter::new(file), &export)
        .with_context(|| format!("Failed to write JSON export: {}", path.display()))?;
    Ok(())
}

fn cell_stats(
    records: &[Record],
    metric: Metric,
    stats: StatSet,
    density: &Density,
    v: u32,
    method: &Method,
) -> GroupStats {
    stats::summarize(records, metric, stats, |r| {
        &r.density == density && r.vertex_count == v && &r.method == method
    })
}

/// Iteration reduction of the pruned search relative to plain search, in percent
pub fn iteration_reduction(plain: Option<f64>, pruned: Option<f64>) -> Option<f64> {
    stats::ratio(pruned, plain).map(|r| 100.0 * (1.0 - r))
}

/// Render the analysis tables as text
pub fn summary(records: &[Record]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let densities: BTreeSet<&Density> = records.iter().map(|r| &r.density).collect();
    let sizes = stats::vertex_counts(records);
    let sizes_for = |density: &Density| -> Vec<u32> {
        sizes
            .iter()
            .copied()
            .filter(|&v| records.iter().any(|r| &r.density == density && r.vertex_count == v))
            .collect()
    };

    writeln!(out, "TABLE 1: MEAN RUNNING TIME (ms)")?;
    writeln!(out, "{}", "-".repeat(70))?;
    for &density in &densities {
        writeln!(out, "\n{}:", density)?;
        write!(out, "  {:>3} |", "V")?;
        for method in &Method::KNOWN {
            write!(out, " {:>24} |", method.to_string())?;
        }
        writeln!(out)?;
        for v in sizes_for(density) {
            write!(out, "  {:>3} |", v)?;
            for method in &Method::KNOWN {
                let cell =
                    cell_stats(records, Metric::ElapsedMs, StatSet::MEAN_STD, density, v, method);
                let text = match (cell.mean, cell.std) {
                    (Some(mean), Some(std)) => format!("{:.2} ± {:.2}", mean, std),
                    (Some(mean), None) => format!("{:.2}", mean),
                    _ => "-".to_string(),
                };
                write!(out, " {:>24} |", text)?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "\n\nTABLE 2: MEAN ITERATION COUNT")?;
    writeln!(out, "{}", "-".repeat(70))?;
    for &density in &densities {
        writeln!(out, "\n{}:", density)?;
        for v in sizes_for(density) {
            write!(out, "  {:>3} |", v)?;
            for method in &Method::KNOWN {
                let cell =
                    cell_stats(records, Metric::IterationCount, StatSet::MEAN, density, v, method);
                let text = cell
                    .mean
                    .map(|m| (m.round() as u64).to_formatted_string(&Locale::en))
                    .unwrap_or_else(|| "-".to_string());
                write!(out, " {:>20} |", text)?;
            }
            writeln!(out)?;
        }
    }

    writeln!(out, "\n\nTABLE 3: PRUNING SPEEDUP (plain / pruned)")?;
    writeln!(out, "{}", "-".repeat(70))?;
    for &density in &densities {
        writeln!(out, "\n{}:", density)?;
        writeln!(out, "  {:>3} | {:>7} | {:>20}", "V", "Speedup", "Iteration reduction")?;
        for v in sizes_for(density) {
            let mean = |metric: Metric, method: &Method| {
                cell_stats(records, metric, StatSet::MEAN, density, v, method).mean
            };
            let speedup = stats::ratio(
                mean(Metric::ElapsedMs, &Method::PlainSearch),
                mean(Metric::ElapsedMs, &Method::PrunedSearch),
            );
            let reduction = iteration_reduction(
                mean(Metric::IterationCount, &Method::PlainSearch),
                mean(Metric::IterationCount, &Method::PrunedSearch),
            );
            if speedup.is_none() && reduction.is_none() {
                continue;
            }
            writeln!(
                out,
                "  {:>3} | {:>7} | {:>19}%",
                v,
                speedup.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string()),
                reduction.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string()),
            )?;
        }
    }

    if let Some(slowest) = records
        .iter()
        .max_by(|a, b| a.elapsed_ms.total_cmp(&b.elapsed_ms))
    {
        writeln!(out, "\nSlowest recorded run:")?;
        writeln!(
            out,
            "  {}, V={}, {}: {:.2} ms",
            slowest.density, slowest.vertex_count, slowest.method, slowest.elapsed_ms
        )?;
    }

    Ok(out)
}

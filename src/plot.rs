//! Rendering of the five comparison charts to SVG files.

use crate::charts::{self, Annotation, BarPanel, Point, Series};
use crate::dataset::{Density, Method, Record};
use crate::error::RenderError;
use crate::stats::{self, Metric};
use crate::style::{self, ChartStyle, Marker, SeriesStyle};
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// One output image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    TimeByDensity,
    PruningSpeedup,
    SearchSpace,
    MethodComparison,
    GroupedBars,
}

impl Artifact {
    /// Generation order
    pub const ALL: [Artifact; 5] = [
        Artifact::TimeByDensity,
        Artifact::PruningSpeedup,
        Artifact::SearchSpace,
        Artifact::MethodComparison,
        Artifact::GroupedBars,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::TimeByDensity => "chart1_time_by_density.svg",
            Artifact::PruningSpeedup => "chart2_pruning_speedup.svg",
            Artifact::SearchSpace => "chart3_search_space.svg",
            Artifact::MethodComparison => "chart4_method_comparison.svg",
            Artifact::GroupedBars => "chart5_grouped_bars.svg",
        }
    }

    pub fn number(self) -> usize {
        match self {
            Artifact::TimeByDensity => 1,
            Artifact::PruningSpeedup => 2,
            Artifact::SearchSpace => 3,
            Artifact::MethodComparison => 4,
            Artifact::GroupedBars => 5,
        }
    }
}

/// Create the output directory if needed
pub fn prepare_output_dir(dir: &Path) -> Result<(), RenderError> {
    std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Render one artifact into `output_dir`, returning the written path
pub fn render(
    artifact: Artifact,
    records: &[Record],
    style: &ChartStyle,
    output_dir: &Path,
) -> Result<PathBuf, RenderError> {
    let path = output_dir.join(artifact.file_name());

    let result = match artifact {
        Artifact::TimeByDensity => plot_time_by_density(records, style, &path),
        Artifact::PruningSpeedup => plot_pruning_speedup(records, style, &path),
        Artifact::SearchSpace => plot_search_space(records, style, &path),
        Artifact::MethodComparison => plot_method_comparison(records, style, &path),
        Artifact::GroupedBars => plot_grouped_bars(records, style, &path),
    };
    result.map_err(|e| RenderError::draw(artifact.file_name(), e))?;

    log::info!("Wrote {}", path.display());
    Ok(path)
}

/// Line chart over vertex counts with a logarithmic Y axis
struct LogLines<'a> {
    caption: &'a str,
    y_desc: &'a str,
    ticks: Vec<u32>,
    series: &'a [Series],
    bands: bool,
    annotation: Option<Annotation>,
}

fn plot_time_by_density(records: &[Record], style: &ChartStyle, path: &Path) -> Result<()> {
    let series = charts::time_by_density(records, &Method::PlainSearch);
    draw_log_lines(
        path,
        style,
        &LogLines {
            caption: "Density impact on running time (plain backtracking)",
            y_desc: "Mean time (ms)",
            ticks: style.canonical_ticks.clone(),
            series: &series,
            bands: true,
            annotation: None,
        },
    )
}

fn plot_search_space(records: &[Record], style: &ChartStyle, path: &Path) -> Result<()> {
    let series = charts::search_space(records, &Method::PlainSearch);
    draw_log_lines(
        path,
        style,
        &LogLines {
            caption: "Search space growth (plain backtracking)",
            y_desc: "Iterations (mean)",
            ticks: stats::vertex_counts(records),
            series: &series,
            bands: false,
            annotation: Some(charts::EXPONENTIAL_GROWTH),
        },
    )
}

fn plot_method_comparison(records: &[Record], style: &ChartStyle, path: &Path) -> Result<()> {
    let series = charts::method_comparison(records, &Density::Dense);
    draw_log_lines(
        path,
        style,
        &LogLines {
            caption: "Method comparison on dense graphs",
            y_desc: "Mean time (ms)",
            ticks: style.canonical_ticks.clone(),
            series: &series,
            bands: true,
            annotation: None,
        },
    )
}

fn draw_log_lines(path: &Path, style: &ChartStyle, def: &LogLines) -> Result<()> {
    let plotted: Vec<(SeriesStyle, Vec<Point>)> = def
        .series
        .iter()
        .map(|s| {
            let points = s.log_points();
            let series_style = style.series(&s.key);
            if points.len() < s.points.len() {
                log::warn!(
                    "{}: {} non-positive value(s) left off the log axis",
                    series_style.label,
                    s.points.len() - points.len()
                );
            }
            (series_style, points)
        })
        .collect();

    let x_range = padded_range(
        def.ticks
            .iter()
            .map(|&v| f64::from(v))
            .chain(plotted.iter().flat_map(|(_, pts)| pts.iter().map(|p| p.x))),
    );
    let y_range = log_range(plotted.iter().flat_map(|(_, pts)| {
        pts.iter()
            .flat_map(|p| [p.y, p.y + p.std.unwrap_or(0.0)])
    }));
    let y_floor = y_range.start;

    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(def.caption, (style.font, style.caption_size))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), y_range.clone().log_scale())?;

    let ticks = ticks_f64(&def.ticks);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(label_count(&x_range))
        .x_desc("Number of vertices (V)")
        .y_desc(def.y_desc)
        .axis_desc_style((style.font, style.axis_desc_size))
        .label_style((style.font, style.label_size))
        .x_label_formatter(&|x| {
            tick_index(&ticks, *x)
                .map(|i| def.ticks[i].to_string())
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| log_label(*y))
        .draw()?;
    draw_vertical_guides(&mut chart, &ticks, y_range.start, y_range.end)?;

    let mut drawn = 0;
    for (series_style, points) in &plotted {
        if points.is_empty() {
            log::debug!("{}: nothing to plot", series_style.label);
            continue;
        }
        let color = series_style.color;

        if def.bands {
            for run in charts::band_runs(points) {
                let mut outline: Vec<(f64, f64)> = run.iter().map(|&(x, _, hi)| (x, hi)).collect();
                outline.extend(run.iter().rev().map(|&(x, lo, _)| (x, lo.max(y_floor))));
                chart.draw_series(std::iter::once(Polygon::new(
                    outline,
                    color.mix(style.band_opacity).filled(),
                )))?;
            }
        }

        let coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();
        chart
            .draw_series(LineSeries::new(
                coords.iter().copied(),
                color.stroke_width(style.line_width),
            ))?
            .label(series_style.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });
        draw_markers(&mut chart, &coords, series_style, style.marker_size)?;
        drawn += 1;
    }

    if let Some(note) = def.annotation {
        let inside = |(x, y): (f64, f64)| x_range.contains(&x) && y_range.contains(&y);
        if inside(note.target) && inside(note.text_at) {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![note.text_at, note.target],
                style::RED.stroke_width(2),
            )))?;
            chart.draw_series(std::iter::once(Circle::new(
                note.target,
                style.marker_size + 2,
                style::RED.stroke_width(2),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                note.text,
                note.text_at,
                (style.font, style.label_size).into_font().color(&style::RED),
            )))?;
        } else {
            log::debug!("Annotation '{}' outside the plotted range", note.text);
        }
    }

    if drawn > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((style.font, style.label_size))
            .background_style(WHITE.mix(0.9))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn plot_pruning_speedup(records: &[Record], style: &ChartStyle, path: &Path) -> Result<()> {
    let series = charts::pruning_speedup(records);
    let ticks = stats::vertex_counts(records);

    let x_range = padded_range(ticks.iter().map(|&v| f64::from(v)));
    let y_max = series
        .iter()
        .flat_map(|s| s.points.iter().map(|p| p.y))
        .fold(1.0_f64, f64::max)
        * 1.15;

    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Pruning speedup by density (values below 1.0 are slowdowns)",
            (style.font, style.caption_size),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), 0f64..y_max)?;

    let tick_xs = ticks_f64(&ticks);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(label_count(&x_range))
        .x_desc("Number of vertices (V)")
        .y_desc("Speedup (plain / pruned)")
        .axis_desc_style((style.font, style.axis_desc_size))
        .label_style((style.font, style.label_size))
        .x_label_formatter(&|x| {
            tick_index(&tick_xs, *x)
                .map(|i| ticks[i].to_string())
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| format!("{:.1}", y))
        .draw()?;
    draw_vertical_guides(&mut chart, &tick_xs, 0.0, y_max)?;

    // Regression region below break-even
    chart.draw_series(std::iter::once(Rectangle::new(
        [(x_range.start, 0.0), (x_range.end, 1.0)],
        style::RED.mix(0.1).filled(),
    )))?;
    chart.draw_series(std::iter::once(Text::new(
        "PERFORMANCE REGRESSION",
        (x_range.start + (x_range.end - x_range.start) * 0.05, 0.5),
        (style.font, style.label_size).into_font().color(&style::RED.mix(0.6)),
    )))?;

    chart
        .draw_series(LineSeries::new(
            [(x_range.start, 1.0), (x_range.end, 1.0)],
            style::GREEN.mix(0.7).stroke_width(2),
        ))?
        .label("Break-even (1.0x)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style::GREEN.stroke_width(2)));

    for s in &series {
        if s.points.is_empty() {
            continue;
        }
        let mut series_style = style.series(&s.key);
        if let charts::SeriesKey::Density(density) = &s.key {
            series_style.label = style.density_short(density);
        }
        let color = series_style.color;
        let coords: Vec<(f64, f64)> = s.points.iter().map(|p| (p.x, p.y)).collect();

        chart
            .draw_series(LineSeries::new(
                coords.iter().copied(),
                color.stroke_width(style.line_width),
            ))?
            .label(series_style.label.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3))
            });
        draw_markers(&mut chart, &coords, &series_style, style.marker_size)?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .label_font((style.font, style.label_size))
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

fn plot_grouped_bars(records: &[Record], style: &ChartStyle, path: &Path) -> Result<()> {
    let panels = charts::grouped_bars(records, &Method::PlainSearch, &style.bar_vertex_counts);

    let root = SVGBackend::new(path, (style.wide_width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((1, 2));
    for (area, panel) in areas.iter().zip(panels.iter()) {
        draw_bar_panel(area, panel, style)?;
    }

    root.present()?;
    Ok(())
}

fn draw_bar_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    panel: &BarPanel,
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (caption, y_desc) = match panel.metric {
        Metric::ElapsedMs => ("Plain backtracking", "Mean time (ms)"),
        Metric::IterationCount => ("Number of iterations", "Iterations (mean)"),
    };

    let y_range = log_range(
        panel
            .groups
            .iter()
            .flat_map(|(_, means)| means.iter().flatten().copied()),
    );
    let y_floor = y_range.start;
    let slots: Vec<f64> = (0..panel.vertex_counts.len()).map(|i| i as f64).collect();
    let x_range = -0.5..slots.len() as f64 - 0.5;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, (style.font, style.caption_size))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range.clone(), y_range.log_scale())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(label_count(&x_range))
        .x_desc("Number of vertices")
        .y_desc(y_desc)
        .axis_desc_style((style.font, style.axis_desc_size))
        .label_style((style.font, style.label_size))
        .x_label_formatter(&|x| {
            tick_index(&slots, *x)
                .map(|i| panel.vertex_counts[i].to_string())
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| log_label(*y))
        .draw()?;

    let group_count = panel.groups.len() as f64;
    for (k, (density, means)) in panel.groups.iter().enumerate() {
        let color = style.density(density).color;
        let fill = color.mix(style.bar_opacity).filled();
        let left = (k as f64 - group_count / 2.0) * style.bar_width;

        let mut bars = Vec::new();
        for (slot, (mean, v)) in means.iter().zip(&panel.vertex_counts).enumerate() {
            match mean {
                Some(m) if *m > 0.0 => {
                    let x0 = slot as f64 + left;
                    let corners = [(x0, y_floor), (x0 + style.bar_width, *m)];
                    bars.push(Rectangle::new(corners, fill));
                }
                Some(_) => {
                    log::warn!("{} at V={}: non-positive mean left off the log axis", density, v)
                }
                None => log::warn!("{} at V={}: no measurements, bar omitted", density, v),
            }
        }

        chart
            .draw_series(bars)?
            .label(style.density_short(density))
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], fill));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((style.font, style.label_size))
        .background_style(WHITE.mix(0.9))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_markers<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    coords: &[(f64, f64)],
    series: &SeriesStyle,
    size: u32,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let fill = series.color.filled();
    match series.marker {
        Marker::Circle => {
            chart.draw_series(coords.iter().map(|&c| Circle::new(c, size, fill)))?;
        }
        Marker::Square => {
            let s = size as i32;
            chart.draw_series(
                coords
                    .iter()
                    .map(|&c| EmptyElement::at(c) + Rectangle::new([(-s, -s), (s, s)], fill)),
            )?;
        }
        Marker::Triangle => {
            chart.draw_series(
                coords
                    .iter()
                    .map(|&c| TriangleMarker::new(c, size as i32 + 2, fill)),
            )?;
        }
    }
    Ok(())
}

/// Thin vertical gridlines at the labelled vertex counts
fn draw_vertical_guides<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    xs: &[f64],
    y_min: f64,
    y_max: f64,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    for &x in xs {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(x, y_min), (x, y_max)],
            BLACK.mix(0.15),
        )))?;
    }
    Ok(())
}

/// Label budget for an axis over vertex counts. Twice the span keeps the key
/// point step at or below one, so every integer tick lands on a key point.
fn label_count(range: &Range<f64>) -> usize {
    ((range.end - range.start) * 2.0).ceil().max(0.0) as usize + 10
}

/// Index of the fixed tick sitting at `x`, if any
fn tick_index(ticks: &[f64], x: f64) -> Option<usize> {
    ticks.iter().position(|t| (t - x).abs() < 1e-6)
}

fn ticks_f64(ticks: &[u32]) -> Vec<f64> {
    ticks.iter().map(|&v| f64::from(v)).collect()
}

/// Span of the values with a little breathing room on both sides
fn padded_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(1.0);
    (lo - pad)..(hi + pad)
}

/// Positive span for a log axis; non-positive values are ignored
fn log_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return 1.0..10.0;
    }
    (lo / 2.0)..(hi * 2.0)
}

fn log_label(v: f64) -> String {
    if v >= 1e4 || v < 1e-2 {
        format!("{:.0e}", v)
    } else if v >= 10.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

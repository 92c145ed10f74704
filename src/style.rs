//! Fixed chart styling, built once and passed to every renderer.

use crate::charts::SeriesKey;
use crate::dataset::{Density, Method};
use plotters::style::RGBColor;

pub const RED: RGBColor = RGBColor(214, 39, 40);
pub const BLUE: RGBColor = RGBColor(31, 119, 180);
pub const ORANGE: RGBColor = RGBColor(255, 127, 14);
pub const GREEN: RGBColor = RGBColor(44, 160, 44);
pub const GRAY: RGBColor = RGBColor(127, 127, 127);

/// Point marker drawn on top of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Circle,
    Square,
    Triangle,
}

/// Color, marker and legend text for one series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStyle {
    pub color: RGBColor,
    pub marker: Marker,
    pub label: String,
}

/// Immutable styling configuration shared by all charts
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    /// Canvas width of the two-panel bar chart
    pub wide_width: u32,
    pub font: &'static str,
    pub caption_size: u32,
    pub axis_desc_size: u32,
    pub label_size: u32,
    pub line_width: u32,
    pub marker_size: u32,
    pub band_opacity: f64,
    pub bar_width: f64,
    pub bar_opacity: f64,
    /// Vertex counts used as x ticks on the time charts
    pub canonical_ticks: Vec<u32>,
    /// Vertex counts compared in the grouped bar chart
    pub bar_vertex_counts: Vec<u32>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::with_size(1000, 600)
    }
}

impl ChartStyle {
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            wide_width: u32::try_from(u64::from(width) * 7 / 5).unwrap_or(u32::MAX),
            font: "serif",
            caption_size: 28,
            axis_desc_size: 20,
            label_size: 16,
            line_width: 3,
            marker_size: 5,
            band_opacity: 0.2,
            bar_width: 0.35,
            bar_opacity: 0.7,
            canonical_ticks: vec![10, 20, 30, 40, 50],
            bar_vertex_counts: vec![10, 20, 30],
        }
    }

    pub fn series(&self, key: &SeriesKey) -> SeriesStyle {
        match key {
            SeriesKey::Density(density) => self.density(density),
            SeriesKey::Method(method) => self.method(method),
        }
    }

    pub fn density(&self, density: &Density) -> SeriesStyle {
        let (color, label) = match density {
            Density::Sparse => (RED, "Sparse (E ≈ 1.5V)".to_string()),
            Density::Dense => (BLUE, "Dense (E ≈ 85% Emax)".to_string()),
            Density::Other(name) => (GRAY, name.clone()),
        };
        SeriesStyle {
            color,
            marker: Marker::Circle,
            label,
        }
    }

    pub fn method(&self, method: &Method) -> SeriesStyle {
        let (color, marker, label) = match method {
            Method::PlainSearch => (BLUE, Marker::Circle, "Backtracking".to_string()),
            Method::PrunedSearch => (ORANGE, Marker::Square, "Backtracking + pruning".to_string()),
            Method::DynamicProgramming => {
                (GREEN, Marker::Triangle, "Dynamic programming".to_string())
            }
            Method::Other(name) => (GRAY, Marker::Circle, name.clone()),
        };
        SeriesStyle { color, marker, label }
    }

    /// Short density label used where the edge-count detail would clutter
    pub fn density_short(&self, density: &Density) -> String {
        match density {
            Density::Sparse => "Sparse".to_string(),
            Density::Dense => "Dense".to_string(),
            Density::Other(name) => name.clone(),
        }
    }
}

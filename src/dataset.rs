//! Loading experiment results from the CSV table written by the experiment runner.

use crate::error::LoadError;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fmt;
use std::path::Path;

/// Solver variant that produced a measurement
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    PlainSearch,
    PrunedSearch,
    DynamicProgramming,
    Other(String),
}

impl Method {
    /// The three solver variants, in plotting order
    pub const KNOWN: [Method; 3] = [
        Method::PlainSearch,
        Method::PrunedSearch,
        Method::DynamicProgramming,
    ];

    pub fn parse(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "backtracking" | "plain-search" => Method::PlainSearch,
            "backtracking+poda" | "pruned-search" => Method::PrunedSearch,
            "prog_dinamica" | "dynamic-programming" => Method::DynamicProgramming,
            _ => Method::Other(token.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::PlainSearch => write!(f, "plain-search"),
            Method::PrunedSearch => write!(f, "pruned-search"),
            Method::DynamicProgramming => write!(f, "dynamic-programming"),
            Method::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Graph density category of the input instance
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Density {
    Sparse,
    Dense,
    Other(String),
}

impl Density {
    /// The two classes compared side by side in the charts
    pub const COMPARED: [Density; 2] = [Density::Sparse, Density::Dense];

    pub fn parse(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "esparso" | "sparse" => Density::Sparse,
            "denso" | "dense" => Density::Dense,
            _ => Density::Other(token.to_string()),
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Density::Sparse => write!(f, "sparse"),
            Density::Dense => write!(f, "dense"),
            Density::Other(name) => write!(f, "{}", name),
        }
    }
}

/// One measured solver run
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub method: Method,
    pub density: Density,
    pub vertex_count: u32,
    pub elapsed_ms: f64,
    pub iteration_count: u64,
}

/// A required column and the header names accepted for it
struct Column {
    name: &'static str,
    aliases: &'static [&'static str],
}

const METHOD: Column = Column {
    name: "method",
    aliases: &["metodo", "method"],
};
const DENSITY: Column = Column {
    name: "density_class",
    aliases: &["tipo", "density_class", "density"],
};
const VERTICES: Column = Column {
    name: "vertex_count",
    aliases: &["vertices", "vertex_count"],
};
const ELAPSED: Column = Column {
    name: "elapsed_ms",
    aliases: &["tempo_ms", "elapsed_ms"],
};
const ITERATIONS: Column = Column {
    name: "iteration_count",
    aliases: &["iteracoes", "iteration_count"],
};

/// Resolved column positions in the header
struct Layout {
    method: usize,
    density: usize,
    vertices: usize,
    elapsed: usize,
    iterations: usize,
}

impl Layout {
    fn resolve(headers: &StringRecord, path: &Path) -> Result<Self, LoadError> {
        let find = |column: &Column| {
            headers
                .iter()
                .position(|h| column.aliases.iter().any(|a| h.eq_ignore_ascii_case(a)))
                .ok_or_else(|| LoadError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.name,
                })
        };

        Ok(Self {
            method: find(&METHOD)?,
            density: find(&DENSITY)?,
            vertices: find(&VERTICES)?,
            elapsed: find(&ELAPSED)?,
            iterations: find(&ITERATIONS)?,
        })
    }
}

/// Load all records from a results table, preserving row order
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, LoadError> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers = reader.headers().map_err(|source| LoadError::Header {
        path: path.to_path_buf(),
        source,
    })?;
    let layout = Layout::resolve(headers, path)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        // Header occupies line 1
        let line = idx as u64 + 2;
        let row = row.map_err(|source| LoadError::Row { line, source })?;
        records.push(parse_row(&row, &layout, line)?);
    }

    log::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn parse_row(row: &StringRecord, layout: &Layout, line: u64) -> Result<Record, LoadError> {
    let field = |idx: usize| row.get(idx).unwrap_or("");

    // A graph without vertices is not a measurement
    let vertex_token = field(layout.vertices);
    let vertex_count: u32 = parse_count(vertex_token, line, VERTICES.name)?;
    if vertex_count == 0 {
        return Err(invalid(vertex_token, line, VERTICES.name));
    }

    Ok(Record {
        method: Method::parse(field(layout.method)),
        density: Density::parse(field(layout.density)),
        vertex_count,
        elapsed_ms: parse_real(field(layout.elapsed), line, ELAPSED.name)?,
        iteration_count: parse_count(field(layout.iterations), line, ITERATIONS.name)?,
    })
}

fn invalid(token: &str, line: u64, column: &'static str) -> LoadError {
    LoadError::InvalidField {
        line,
        column,
        value: token.to_string(),
    }
}

fn parse_real(token: &str, line: u64, column: &'static str) -> Result<f64, LoadError> {
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(invalid(token, line, column)),
    }
}

/// Integer field, also accepting integral floats such as `10.0` or `1e3`
fn parse_count<T>(token: &str, line: u64, column: &'static str) -> Result<T, LoadError>
where
    T: TryFrom<u64> + std::str::FromStr,
{
    if let Ok(v) = token.parse::<T>() {
        return Ok(v);
    }
    let v = parse_real(token, line, column)?;
    if v.fract() != 0.0 || v > u64::MAX as f64 {
        return Err(invalid(token, line, column));
    }
    T::try_from(v as u64).map_err(|_| invalid(token, line, column))
}

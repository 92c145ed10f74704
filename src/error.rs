//! Error types for loading results and rendering charts.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while reading the experiment results table
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open results file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read header of {}", path.display())]
    Header {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("malformed row at line {line}")]
    Row {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: column '{column}' has invalid value '{value}'")]
    InvalidField {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Failure while producing a chart artifact
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot prepare output path {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to draw {artifact}")]
    Draw {
        artifact: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl RenderError {
    /// Wrap a drawing failure for the named artifact
    pub fn draw(artifact: &'static str, source: anyhow::Error) -> Self {
        RenderError::Draw { artifact, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = LoadError::InvalidField {
            line: 4,
            column: "elapsed_ms",
            value: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "line 4: column 'elapsed_ms' has invalid value 'abc'"
        );

        let err = LoadError::MissingColumn {
            path: PathBuf::from("r.csv"),
            column: "elapsed_ms",
        };
        assert!(err.to_string().contains("elapsed_ms"));
    }

    #[test]
    fn test_draw_error_keeps_its_cause() {
        let err = RenderError::draw("chart1.svg", anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "failed to draw chart1.svg");

        let cause = std::error::Error::source(&err).expect("draw error has a source");
        assert_eq!(cause.to_string(), "disk full");
    }
}

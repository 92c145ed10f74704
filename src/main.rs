//! hamplot - comparison charts for Hamiltonian-cycle solver experiments.
//!
//! Reads the results table written by the experiment runner and renders five
//! fixed charts comparing plain backtracking, backtracking with pruning and
//! dynamic programming over sparse and dense graphs.

mod charts;
mod dataset;
mod error;
mod plot;
mod report;
mod stats;
mod style;

use anyhow::{Context, Result};
use clap::Parser;
use plot::Artifact;
use std::path::PathBuf;
use std::process::ExitCode;
use style::ChartStyle;

/// Upper bound for either image dimension
const MAX_PIXELS: i64 = 20_000;

/// Render comparison charts from experiment results
#[derive(Parser, Debug)]
#[command(name = "hamplot")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Results table written by the experiment runner
    #[arg(default_value = "resultados_experimento.csv")]
    input: PathBuf,

    /// Directory receiving the chart images
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Chart width in pixels (the two-panel bar chart is 1.4x wider)
    #[arg(
        long,
        default_value = "1000",
        value_parser = clap::value_parser!(u32).range(1..=MAX_PIXELS)
    )]
    width: u32,

    /// Chart height in pixels
    #[arg(
        long,
        default_value = "600",
        value_parser = clap::value_parser!(u32).range(1..=MAX_PIXELS)
    )]
    height: u32,

    /// Print mean time, iteration and speedup tables after plotting
    #[arg(long)]
    summary: bool,

    /// Write aggregated groups to a JSON file
    #[arg(long)]
    export_json: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    println!("{}", "=".repeat(70));
    println!("{:^70}", "CHART GENERATOR");
    println!("{}", "=".repeat(70));

    match run(&args) {
        Ok(generated) => {
            println!("\n{}", "=".repeat(70));
            println!("CHARTS GENERATED SUCCESSFULLY");
            println!("{}", "=".repeat(70));
            println!("\nFiles created:");
            for (artifact, path) in generated {
                println!("  {}. {}", artifact.number(), path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("\nERROR: {}", e);
            eprintln!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load once, then render every artifact in order. The first failure aborts the run.
fn run(args: &Args) -> Result<Vec<(Artifact, PathBuf)>> {
    let records = dataset::load_records(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    println!("\nLoaded {} rows from {}\n", records.len(), args.input.display());

    let style = ChartStyle::with_size(args.width, args.height);
    plot::prepare_output_dir(&args.output_dir)?;

    println!("Generating charts...");
    let mut generated = Vec::with_capacity(Artifact::ALL.len());
    for artifact in Artifact::ALL {
        let path = plot::render(artifact, &records, &style, &args.output_dir)
            .with_context(|| format!("Chart {} failed", artifact.number()))?;
        println!("✓ Chart {} saved: {}", artifact.number(), path.display());
        generated.push((artifact, path));
    }

    if let Some(ref json_path) = args.export_json {
        report::export_json(&records, &args.input, json_path)?;
        println!("✓ Aggregates exported: {}", json_path.display());
    }

    if args.summary {
        println!("\n{}", report::summary(&records)?);
    }

    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["hamplot"]);
        assert_eq!(args.input, PathBuf::from("resultados_experimento.csv"));
        assert_eq!(args.output_dir, PathBuf::from("."));
        assert_eq!((args.width, args.height), (1000, 600));
        assert!(!args.summary);
        assert!(args.export_json.is_none());
    }

    #[test]
    fn test_positional_input_and_flags() {
        let args = Args::parse_from(["hamplot", "runs.csv", "-o", "out", "--summary"]);
        assert_eq!(args.input, PathBuf::from("runs.csv"));
        assert_eq!(args.output_dir, PathBuf::from("out"));
        assert!(args.summary);
    }

    #[test]
    fn test_image_size_is_bounded() {
        let args = Args::parse_from(["hamplot", "--width", "20000", "--height", "1"]);
        assert_eq!((args.width, args.height), (20_000, 1));

        assert!(Args::try_parse_from(["hamplot", "--width", "0"]).is_err());
        assert!(Args::try_parse_from(["hamplot", "--width", "50000"]).is_err());
        assert!(Args::try_parse_from(["hamplot", "--height", "4294967295"]).is_err());
    }
}

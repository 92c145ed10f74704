//! End-to-end runs of the hamplot binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ARTIFACTS: [&str; 5] = [
    "chart1_time_by_density.svg",
    "chart2_pruning_speedup.svg",
    "chart3_search_space.svg",
    "chart4_method_comparison.svg",
    "chart5_grouped_bars.svg",
];

fn run(dir: &Path, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hamplot"))
        .current_dir(dir)
        .args(extra)
        .output()
        .expect("failed to run hamplot")
}

/// Two density classes, one method, V in {10, 20, 30}, two samples each
fn two_class_table(iterations: impl Fn(u32) -> u64) -> String {
    let mut csv =
        String::from("tipo,vertices,instancia,metodo,resultado,tempo_ms,iteracoes,memoria_kb\n");
    for tipo in ["esparso", "denso"] {
        for v in [10, 20, 30] {
            for inst in 1..=2 {
                let t = f64::from(v) * 0.1 + f64::from(inst);
                csv.push_str(&format!(
                    "{},{},{},Backtracking,SIM,{},{},0\n",
                    tipo,
                    v,
                    inst,
                    t,
                    iterations(v)
                ));
            }
        }
    }
    csv
}

#[test]
fn test_all_artifacts_written() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("results.csv"), two_class_table(|v| u64::from(v) * 1000)).unwrap();

    let output = run(dir.path(), &["results.csv"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Loaded 12 rows"));
    for name in ARTIFACTS {
        assert!(dir.path().join(name).exists(), "{} missing", name);
        assert!(stdout.contains(name));
    }
}

#[test]
fn test_missing_column_fails_before_any_chart() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("results.csv"),
        "tipo,vertices,metodo,iteracoes\ndenso,10,Backtracking,5\n",
    )
    .unwrap();

    let output = run(dir.path(), &["results.csv"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("elapsed_ms"));
    for name in ARTIFACTS {
        assert!(!dir.path().join(name).exists());
    }
}

#[test]
fn test_missing_input_file_fails() {
    let dir = TempDir::new().unwrap();
    let output = run(dir.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("resultados_experimento.csv"));
}

#[test]
fn test_all_zero_iterations_still_plotted() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("results.csv"), two_class_table(|_| 0)).unwrap();

    let output = run(dir.path(), &["results.csv", "--output-dir", "charts"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(dir.path().join("charts").join("chart3_search_space.svg").exists());
}

#[test]
fn test_summary_and_json_export() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("results.csv"), two_class_table(|v| u64::from(v) * 1000)).unwrap();

    let output = run(
        dir.path(),
        &["results.csv", "--summary", "--export-json", "groups.json"],
    );
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("TABLE 1"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("groups.json")).unwrap()).unwrap();
    // One method, two densities, three sizes
    assert_eq!(json["groups"].as_array().unwrap().len(), 6);
    assert_eq!(json["records"], 12);
}

#[test]
fn test_repeated_runs_produce_same_artifacts() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("results.csv"), two_class_table(|v| u64::from(v) * 1000)).unwrap();

    assert!(run(dir.path(), &["results.csv"]).status.success());
    let first = fs::read_to_string(dir.path().join(ARTIFACTS[0])).unwrap();
    assert!(run(dir.path(), &["results.csv"]).status.success());
    let second = fs::read_to_string(dir.path().join(ARTIFACTS[0])).unwrap();
    assert_eq!(first, second);
}

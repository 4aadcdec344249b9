use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "chsh-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_list_strategies_writes_json() {
    let exe = env!("CARGO_BIN_EXE_chsh-cli");
    let output_path = temp_path("list");
    let status = Command::new(exe)
        .args(["--list-strategies", "--report", "json", "--output"])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let names: Vec<&str> = value["strategies"]
        .as_array()
        .expect("strategies array")
        .iter()
        .filter_map(|s| s["name"].as_str())
        .collect();
    assert_eq!(names[0], "always_zero");
    assert!(names.contains(&"copy_input"));
}

#[test]
fn cli_health_reports_ok() {
    let exe = env!("CARGO_BIN_EXE_chsh-cli");
    let output = Command::new(exe)
        .args(["--health", "--report", "json"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("valid health json");
    assert_eq!(value["status"], "ok");
}

#[test]
fn cli_seeded_classical_run_is_reproducible() {
    let exe = env!("CARGO_BIN_EXE_chsh-cli");
    let run = || {
        Command::new(exe)
            .args([
                "--mode",
                "classical",
                "--strategy",
                "copy_input",
                "--rounds",
                "1000",
                "--seeds",
                "42",
                "--report",
                "json",
            ])
            .output()
            .expect("run cli")
    };
    let first = run();
    assert!(first.status.success());
    let value: serde_json::Value = serde_json::from_slice(&first.stdout).expect("valid json");
    assert_eq!(value["mode"], "classical");
    assert_eq!(value["strategy"], "copy_input");
    assert_eq!(value["total"], 1000);
    assert_eq!(first.stdout, run().stdout);
}

#[test]
fn cli_rejects_invalid_input_with_distinct_codes() {
    let exe = env!("CARGO_BIN_EXE_chsh-cli");
    let bogus_mode = Command::new(exe)
        .args(["--mode", "bogus", "--seeds", "1", "--report", "json"])
        .output()
        .expect("run cli");
    assert_eq!(bogus_mode.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&bogus_mode.stderr).contains("bogus"));

    let unknown_strategy = Command::new(exe)
        .args([
            "--mode",
            "classical",
            "--strategy",
            "nonexistent",
            "--seeds",
            "1",
            "--report",
            "json",
        ])
        .output()
        .expect("run cli");
    assert_eq!(unknown_strategy.status.code(), Some(4));

    let too_few = Command::new(exe)
        .args(["--rounds", "10", "--seeds", "1", "--report", "json"])
        .output()
        .expect("run cli");
    assert_eq!(too_few.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&too_few.stderr).contains("between 100 and 100000"));
}

#[test]
fn cli_compare_sweep_emits_csv() {
    let exe = env!("CARGO_BIN_EXE_chsh-cli");
    let output_path = temp_path("compare.csv");
    let status = Command::new(exe)
        .args([
            "--mode", "compare", "--rounds", "500", "--seeds", "1,2", "--report", "csv",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(output_path).expect("read output");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "seed,mode,strategy,wins,total,win_rate");
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("1,quantum,,"));
    assert!(lines[2].starts_with("1,classical,always_zero,"));
}

#[test]
fn cli_acceptance_passes_for_quantum() {
    let exe = env!("CARGO_BIN_EXE_chsh-cli");
    let output = Command::new(exe)
        .args(["--acceptance", "--seeds", "7", "--report", "json"])
        .output()
        .expect("run cli");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn cli_single_seed_compare_json_has_both_sides() {
    let exe = env!("CARGO_BIN_EXE_chsh-cli");
    let output = Command::new(exe)
        .args([
            "--mode", "compare", "--rounds", "1000", "--seeds", "3", "--report", "json",
        ])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(value["quantum"]["mode"], "quantum");
    assert_eq!(value["quantum"]["total"], 1000);
    assert_eq!(value["classical"]["strategy"], "always_zero");
    assert!(value.get("runs").is_none());
}

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use chsh_game::{ComparisonReport, GameMode, TSIRELSON_WIN_RATE};

use super::api::{HealthStatus, StrategyCatalogResponse};
use super::sweep::{SweepAggregate, SweepRecord, SweepRequest};

pub const CSV_HEADER: &str = "seed,mode,strategy,wins,total,win_rate";

/// Full machine-readable report payload.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    runs: &'a [SweepRecord],
    aggregates: &'a [SweepAggregate],
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[SweepRecord],
    aggregates: &[SweepAggregate],
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 CHSH Simulation Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==========================".cyan())?;
    writeln!(out, "Runs: {}", records.len())?;
    writeln!(out)?;

    for aggregate in aggregates {
        let icon = match aggregate.mode {
            GameMode::Quantum => "⚛️ ",
            GameMode::Classical => "🎲",
        };
        writeln!(out, "{icon} {}", aggregate.label.bold())?;
        writeln!(
            out,
            "   Wins: {}/{} ({:.2}%)",
            aggregate.total_wins,
            aggregate.total_rounds,
            aggregate.pooled_win_rate * 100.0
        )?;
        writeln!(
            out,
            "   Expected: {:.2}%  deviation {:+.2}%",
            aggregate.expected_win_rate * 100.0,
            aggregate.deviation() * 100.0
        )?;
        if aggregate.runs > 1 {
            writeln!(
                out,
                "   Across {} seeds: mean {:.4} ± {:.4} (min {:.4}, max {:.4})",
                aggregate.runs,
                aggregate.mean_win_rate,
                aggregate.std_win_rate,
                aggregate.min_win_rate,
                aggregate.max_win_rate
            )?;
        }
        writeln!(out)?;
    }

    let quantum = aggregates.iter().find(|a| a.mode == GameMode::Quantum);
    let best_classical = aggregates
        .iter()
        .filter(|a| a.mode == GameMode::Classical)
        .max_by(|a, b| a.pooled_win_rate.total_cmp(&b.pooled_win_rate));
    if let (Some(quantum), Some(classical)) = (quantum, best_classical) {
        let advantage = quantum.pooled_win_rate - classical.pooled_win_rate;
        let line = format!(
            "Quantum advantage over {}: {:+.2}%",
            classical.label,
            advantage * 100.0
        );
        if advantage > 0.0 {
            writeln!(out, "{}", line.green())?;
        } else {
            writeln!(out, "{}", line.red())?;
        }
        writeln!(
            out,
            "Tsirelson bound: {:.4}, classical limit: {:.4}",
            TSIRELSON_WIN_RATE,
            chsh_game::CLASSICAL_WIN_LIMIT
        )?;
    }
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    request: &SweepRequest,
    records: &[SweepRecord],
    aggregates: &[SweepAggregate],
) -> Result<()> {
    // Single-seed runs keep the flat payload shapes callers of the API expect.
    match (request, records) {
        (SweepRequest::Simulate { .. }, [record]) => {
            serde_json::to_writer_pretty(&mut *out, &record.result)?;
        }
        (SweepRequest::Compare { .. }, [quantum, classical]) => {
            let report = ComparisonReport {
                quantum: quantum.result.clone(),
                classical: classical.result.clone(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
        }
        _ => {
            let report = JsonReport {
                runs: records,
                aggregates,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
        }
    }
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    records: &[SweepRecord],
    aggregates: &[SweepAggregate],
) -> Result<()> {
    writeln!(out, "# CHSH Simulation Results\n")?;
    writeln!(out, "## Summary\n")?;
    writeln!(
        out,
        "| Label | Mode | Seeds | Wins | Rounds | Win rate | Expected |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for aggregate in aggregates {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {:.4} | {:.4} |",
            aggregate.label,
            aggregate.mode,
            aggregate.runs,
            aggregate.total_wins,
            aggregate.total_rounds,
            aggregate.pooled_win_rate,
            aggregate.expected_win_rate
        )?;
    }
    writeln!(out)?;

    writeln!(out, "## Runs\n")?;
    for record in records {
        writeln!(
            out,
            "- **{}** seed `{}`: {}/{} ({:.4})",
            record.result.label(),
            record.seed,
            record.result.wins,
            record.result.total,
            record.result.win_rate
        )?;
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, records: &[SweepRecord]) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    for record in records {
        writeln!(
            out,
            "{},{},{},{},{},{:.6}",
            record.seed,
            record.result.mode,
            record.result.strategy.as_deref().unwrap_or(""),
            record.result.wins,
            record.result.total,
            record.result.win_rate
        )?;
    }
    Ok(())
}

pub fn generate_strategy_listing(
    out: &mut dyn Write,
    catalog: &StrategyCatalogResponse,
    as_json: bool,
) -> Result<()> {
    if as_json {
        serde_json::to_writer_pretty(&mut *out, catalog)?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(out, "Available strategies:")?;
    for strategy in &catalog.strategies {
        writeln!(
            out,
            "  {:16} - {}: {}",
            strategy.name, strategy.display_name, strategy.description
        )?;
        writeln!(out, "  {:16}   Alice: {}", "", strategy.alice_strategy)?;
        writeln!(out, "  {:16}   Bob:   {}", "", strategy.bob_strategy)?;
    }
    Ok(())
}

pub fn generate_health_report(
    out: &mut dyn Write,
    health: &HealthStatus,
    as_json: bool,
) -> Result<()> {
    if as_json {
        serde_json::to_writer(&mut *out, health)?;
        writeln!(out)?;
    } else {
        writeln!(out, "{}: {}", health.status, health.message)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::api::ChshApi;
    use crate::logic::sweep::aggregate_sweep;
    use chsh_game::{SimulationResult, Tally, catalog};

    fn sample_records() -> Vec<SweepRecord> {
        vec![
            SweepRecord {
                seed: 1,
                result: SimulationResult::from_tally(
                    GameMode::Quantum,
                    None,
                    Tally {
                        wins: 853,
                        total: 1_000,
                    },
                ),
            },
            SweepRecord {
                seed: 1,
                result: SimulationResult::from_tally(
                    GameMode::Classical,
                    Some(catalog::get("always_zero").unwrap()),
                    Tally {
                        wins: 748,
                        total: 1_000,
                    },
                ),
            },
        ]
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut buffer = Vec::new();
        f(&mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn csv_has_header_and_one_row_per_record() {
        let records = sample_records();
        let text = render(|out| generate_csv_report(out, &records));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "1,quantum,,853,1000,0.853000");
        assert_eq!(lines[2], "1,classical,always_zero,748,1000,0.748000");
    }

    fn simulate_request() -> SweepRequest {
        SweepRequest::Simulate {
            mode: "quantum".to_string(),
            strategy: None,
            rounds: None,
        }
    }

    #[test]
    fn json_single_run_is_flat() {
        let mut records = sample_records();
        records.truncate(1);
        let aggregates = aggregate_sweep(&records);
        let request = simulate_request();
        let text = render(|out| generate_json_report(out, &request, &records, &aggregates));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["mode"], "quantum");
        assert_eq!(value["wins"], 853);
    }

    #[test]
    fn json_single_compare_has_quantum_and_classical() {
        let records = sample_records();
        let aggregates = aggregate_sweep(&records);
        let request = SweepRequest::Compare { rounds: None };
        let text = render(|out| generate_json_report(out, &request, &records, &aggregates));
        let report: ComparisonReport = serde_json::from_str(&text).unwrap();
        assert_eq!(report.quantum.mode, GameMode::Quantum);
        assert_eq!(report.classical.strategy.as_deref(), Some("always_zero"));
        assert_eq!(report.classical.wins, 748);
    }

    #[test]
    fn json_sweep_includes_runs_and_aggregates() {
        let mut records = sample_records();
        records.extend(sample_records().into_iter().map(|record| SweepRecord {
            seed: 2,
            ..record
        }));
        let aggregates = aggregate_sweep(&records);
        let request = SweepRequest::Compare { rounds: None };
        let text = render(|out| generate_json_report(out, &request, &records, &aggregates));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["runs"].as_array().unwrap().len(), 4);
        assert_eq!(value["aggregates"].as_array().unwrap().len(), 2);
        assert!(value.get("quantum").is_none());
    }

    #[test]
    fn markdown_and_console_mention_every_label() {
        let records = sample_records();
        let aggregates = aggregate_sweep(&records);
        let markdown = render(|out| generate_markdown_report(out, &records, &aggregates));
        assert!(markdown.starts_with("# CHSH Simulation Results"));
        assert!(markdown.contains("| always_zero | classical |"));
        let console = render(|out| generate_console_report(out, &records, &aggregates));
        assert!(console.contains("quantum"));
        assert!(console.contains("Quantum advantage over always_zero"));
    }

    #[test]
    fn listing_and_health_render_both_formats() {
        let api = ChshApi::default();
        let listing = api.list_strategies();
        let text = render(|out| generate_strategy_listing(out, &listing, false));
        assert!(text.contains("copy_input"));
        let json = render(|out| generate_strategy_listing(out, &listing, true));
        assert!(json.contains("\"strategies\""));
        let health = render(|out| generate_health_report(out, &api.health(), true));
        assert_eq!(
            health.trim(),
            r#"{"status":"ok","message":"CHSH Game API is running"}"#
        );
    }
}

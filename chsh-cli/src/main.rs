mod config;
mod logic;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use config::BoundaryConfig;
use logic::{
    BoundaryError, ChshApi, SweepAggregate, SweepRecord, SweepRequest, aggregate_sweep,
    resolve_seed_inputs, run_sweep, validate_acceptance_targets,
};
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "chsh-cli", version = "0.1.0")]
#[command(about = "CHSH nonlocal game simulator - classical strategies against a shared Bell pair")]
struct Args {
    /// Simulation mode: classical, quantum, or compare (runs both)
    #[arg(long, default_value = "quantum")]
    mode: String,

    /// Classical strategy name (defaults to the best strategy)
    #[arg(long)]
    strategy: Option<String>,

    /// Rounds per run (defaults to the configured default)
    #[arg(long)]
    rounds: Option<String>,

    /// Seeds to run (comma-separated; decimal, 0x hex, or `random`)
    #[arg(long)]
    seeds: Option<String>,

    /// List all classical strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Report service health and exit
    #[arg(long)]
    health: bool,

    /// Check pooled win rates against their theoretical values
    #[arg(long)]
    acceptance: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional JSON file overriding round limits and acceptance tolerance
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Args {
    fn is_json(&self) -> bool {
        self.report == "json"
    }

    /// Human-oriented chatter only goes to stdout when it cannot corrupt a report.
    fn chatty(&self) -> bool {
        self.report == "console" || self.output.is_some()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = BoundaryConfig::load(args.config.as_deref())?;
    let api = ChshApi::new(config);

    if maybe_list_strategies(&args, &api)? || maybe_report_health(&args, &api)? {
        return Ok(());
    }

    if args.chatty() {
        announce_banner();
    }

    let start_time = Instant::now();
    let seed_tokens = args.seeds.as_deref().map(split_csv).unwrap_or_default();
    let seed_infos = resolve_seed_inputs(&seed_tokens)?;
    if args.verbose && args.chatty() {
        for info in seed_infos.iter().filter(|info| info.generated) {
            println!("🌱 Generated seed {}", info.seed);
        }
    }
    let request = build_request(&args, &api);

    let records = match run_sweep(&api, &request, &seed_infos, args.verbose && args.chatty()) {
        Ok(records) => records,
        Err(err) => exit_with(&err),
    };
    let aggregates = aggregate_sweep(&records);

    write_reports(&args, &request, &records, &aggregates, start_time)?;

    if args.acceptance {
        validate_acceptance_targets(&aggregates, api.config().acceptance_tolerance)?;
        if args.chatty() {
            println!("{}", "✅ Acceptance targets met".green());
        }
    }

    Ok(())
}

fn exit_with(err: &BoundaryError) -> ! {
    eprintln!("{} {err}", "error:".red().bold());
    std::process::exit(err.exit_code());
}

fn maybe_list_strategies(args: &Args, api: &ChshApi) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    logic::reports::generate_strategy_listing(
        output_target.writer(),
        &api.list_strategies(),
        args.is_json(),
    )?;
    output_target.flush_inner()?;
    Ok(true)
}

fn maybe_report_health(args: &Args, api: &ChshApi) -> Result<bool> {
    if !args.health {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    logic::reports::generate_health_report(output_target.writer(), &api.health(), args.is_json())?;
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "⚛️  CHSH Game Simulator".bright_cyan().bold());
    println!("{}", "=======================".cyan());
}

/// Acceptance sweeps without an explicit round count run at the window maximum.
fn resolve_rounds_arg(args: &Args, api: &ChshApi) -> Option<String> {
    if args.rounds.is_some() || !args.acceptance {
        return args.rounds.clone();
    }
    let rounds = api.config().max_rounds;
    if args.chatty() {
        println!("🔁 Acceptance mode enabled: running {rounds} rounds per seed");
    }
    Some(rounds.to_string())
}

fn build_request(args: &Args, api: &ChshApi) -> SweepRequest {
    let rounds = resolve_rounds_arg(args, api);
    if args.mode.trim().eq_ignore_ascii_case("compare") {
        SweepRequest::Compare { rounds }
    } else {
        SweepRequest::Simulate {
            mode: args.mode.clone(),
            strategy: args.strategy.clone(),
            rounds,
        }
    }
}

fn write_reports(
    args: &Args,
    request: &SweepRequest,
    records: &[SweepRecord],
    aggregates: &[SweepAggregate],
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(
                output_target.writer(),
                request,
                records,
                aggregates,
            )?;
        }
        "markdown" => {
            logic::reports::generate_markdown_report(output_target.writer(), records, aggregates)?;
        }
        "csv" => {
            logic::reports::generate_csv_report(output_target.writer(), records)?;
        }
        _ => {
            logic::reports::generate_console_report(output_target.writer(), records, aggregates)?;
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

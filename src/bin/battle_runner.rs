//! Headless Battle Runner
//!
//! Runs a TOML scenario once (optionally printing every event) or many
//! times over consecutive seeds in parallel, and reports the results as
//! JSON or text.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use hex_skirmish::battle::{BattleReport, BattleState, Scenario};
use hex_skirmish::core::{Result, Side};
use rayon::prelude::*;
use serde::Serialize;

/// Headless Battle Runner - resolve auto-battler fights from a scenario file
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Resolve hex auto-battler scenarios and report outcomes")]
struct Args {
    /// Scenario file (seed, config and both rosters)
    #[arg(long, default_value = "data/scenarios/demo.toml")]
    scenario: PathBuf,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the tick bound
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Number of battles to run on consecutive seeds
    #[arg(long, default_value_t = 1)]
    runs: u64,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print every battle event (single run only)
    #[arg(long)]
    events: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output for a single battle
#[derive(Serialize)]
struct SingleResult {
    seed: u64,
    report: BattleReport,
}

/// JSON output for a batch of battles
#[derive(Serialize)]
struct BatchResult {
    first_seed: u64,
    runs: u64,
    home_wins: u64,
    away_wins: u64,
    draws: u64,
    home_win_rate: f32,
    mean_ticks: f32,
    mean_survivors: f32,
}

fn run_once(scenario: &Scenario, seed: u64, print_events: bool) -> Result<BattleReport> {
    let mut scenario = scenario.clone();
    scenario.seed = seed;
    let mut state = BattleState::from_scenario(&scenario)?;

    if !print_events {
        return Ok(state.run_to_completion());
    }
    while !state.is_finished() {
        for event in state.run_tick().iter() {
            eprintln!("  [{}] {}", event.tick, event.description);
        }
    }
    Ok(state.report())
}

fn summarize(first_seed: u64, reports: &[BattleReport]) -> BatchResult {
    let runs = reports.len() as u64;
    let count = |side: Option<Side>| reports.iter().filter(|r| r.winning_side == side).count() as u64;
    let denom = runs.max(1) as f32;
    BatchResult {
        first_seed,
        runs,
        home_wins: count(Some(Side::Home)),
        away_wins: count(Some(Side::Away)),
        draws: count(None),
        home_win_rate: count(Some(Side::Home)) as f32 / denom,
        mean_ticks: reports.iter().map(|r| r.ticks as f32).sum::<f32>() / denom,
        mean_survivors: reports.iter().map(|r| r.surviving_units as f32).sum::<f32>() / denom,
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn print_json<T: Serialize>(value: &T) {
    match to_json(value) {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("Failed to serialize result: {}", err);
            process::exit(1);
        }
    }
}

fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "hex_skirmish=debug" } else { "hex_skirmish=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut scenario = match Scenario::load(&args.scenario) {
        Ok(scenario) => scenario,
        Err(err) => {
            eprintln!("Failed to load scenario '{}': {}", args.scenario.display(), err);
            process::exit(1);
        }
    };
    if let Some(max_ticks) = args.max_ticks {
        scenario.config.max_ticks = max_ticks;
    }
    let seed = args.seed.unwrap_or(scenario.seed);

    if args.runs <= 1 {
        let report = match run_once(&scenario, seed, args.events) {
            Ok(report) => report,
            Err(err) => {
                eprintln!("Battle failed: {}", err);
                process::exit(1);
            }
        };
        match args.format.as_str() {
            "text" => {
                println!("Battle Result");
                println!("=============");
                match (report.winning_side, report.winner) {
                    (Some(side), Some(player)) => println!("Winner: {:?} (player {})", side, player.0),
                    _ => println!("Winner: none (draw)"),
                }
                println!("Surviving units: {}", report.surviving_units);
                println!("Surviving summons: {}", report.surviving_summons);
                println!("Ticks: {} ({:?})", report.ticks, report.end_reason);
                for grant in &report.bench_grants {
                    println!("Bench grant: {} for player {}", grant.unit, grant.player.0);
                }
                println!("Seed: {}", seed);
            }
            "json" => print_json(&SingleResult { seed, report }),
            other => {
                eprintln!("Unknown format '{}', defaulting to json", other);
                print_json(&SingleResult { seed, report });
            }
        }
        return;
    }

    let results: Vec<Result<BattleReport>> = (seed..seed + args.runs)
        .into_par_iter()
        .map(|s| run_once(&scenario, s, false))
        .collect();
    let mut reports = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(err) => {
                eprintln!("Battle failed: {}", err);
                process::exit(1);
            }
        }
    }
    let batch = summarize(seed, &reports);

    match args.format.as_str() {
        "text" => {
            println!("Batch Result ({} runs from seed {})", batch.runs, batch.first_seed);
            println!("=============");
            println!("Home wins: {}", batch.home_wins);
            println!("Away wins: {}", batch.away_wins);
            println!("Draws: {}", batch.draws);
            println!("Home win rate: {:.1}%", batch.home_win_rate * 100.0);
            println!("Mean ticks: {:.1}", batch.mean_ticks);
            println!("Mean survivors: {:.2}", batch.mean_survivors);
        }
        _ => print_json(&batch),
    }
}

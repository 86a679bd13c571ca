//! Dining Philosophers DST CLI
//!
//! Run deterministic simulation scenarios across one or many seeds.

use clap::Parser;
use dine_sim::{init_tracing, ScenarioId, ScenarioResult, ScenarioRunner};
use std::time::Duration;
use tracing::{error, info, Level};

/// Dining Philosophers Deterministic Simulation Testing CLI
#[derive(Parser, Debug)]
#[command(name = "dine-dst")]
#[command(about = "Run deterministic simulation tests for the dining philosophers", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Scenario to run (classic, pair, odd_ring, sweep, crowd, timeout_retry, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Number of consecutive seeds to test (for CI mode)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Per-table deadline in seconds before a deadlock is assumed
    #[arg(short, long, default_value = "10")]
    timeout_secs: u64,

    /// Longest single meal in milliseconds
    #[arg(long, default_value = "5")]
    max_eat_ms: u64,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Export every recorded update to a JSON file
    #[arg(long)]
    export: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    init_tracing(Level::INFO, args.verbose);

    if !args.json {
        info!("Dining Philosophers DST v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    // Parse scenarios
    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        match args.scenario.parse() {
            Ok(scenario) => vec![scenario],
            Err(e) => {
                eprintln!("Error: {}", e);
                eprintln!("Available scenarios: classic, pair, odd_ring, sweep, crowd, timeout_retry, all");
                std::process::exit(1);
            }
        }
    };

    if args.export.is_some() && scenarios.len() > 1 {
        eprintln!("Error: --export only supports a single scenario, not 'all'");
        std::process::exit(1);
    }

    // Determine base seed
    let base_seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as u64
    } else {
        args.seed
    };

    let mut all_results: Vec<ScenarioResult> = Vec::new();
    let mut failed_count = 0;

    for seed_offset in 0..args.seeds.max(1) {
        let seed = base_seed.wrapping_add(seed_offset as u64);

        let runner = ScenarioRunner::new(seed)
            .with_max_eat(Duration::from_millis(args.max_eat_ms))
            .with_timeout(Duration::from_secs(args.timeout_secs));

        for scenario in &scenarios {
            let result = runner.run(*scenario).await;

            if !args.json {
                if result.passed {
                    info!(
                        "✓ {} (seed={}) PASSED: {} tables, {} meals in {:.2}s",
                        scenario.name(),
                        seed,
                        result.tables_run,
                        result.metrics.meals,
                        result.elapsed_secs
                    );
                } else {
                    error!(
                        "✗ {} (seed={}) FAILED: {}",
                        scenario.name(),
                        seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }

            if !result.passed {
                failed_count += 1;
            }

            all_results.push(result);
        }
    }

    if let Some(export_path) = &args.export {
        // Last seed's run of the single requested scenario
        if let Some(result) = all_results.last() {
            match result.export.write_to_file(export_path) {
                Ok(()) => info!(
                    "Exported {} updates to {}",
                    result.export.event_count(),
                    export_path
                ),
                Err(e) => {
                    error!("Failed to write export: {:?}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    // Summary
    let total = all_results.len();
    let passed = total - failed_count;

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": passed,
            "failed": failed_count,
            "results": all_results.iter().map(|r| {
                serde_json::json!({
                    "scenario": r.scenario.name(),
                    "seed": r.seed,
                    "passed": r.passed,
                    "tables": r.tables_run,
                    "updates": r.metrics.updates,
                    "meals": r.metrics.meals,
                    "fork_acquisitions": r.metrics.fork_acquisitions,
                    "fork_violations": r.metrics.fork_violations,
                    "time_secs": r.elapsed_secs,
                    "failure_reason": r.failure_reason,
                })
            }).collect::<Vec<_>>(),
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        if failed_count == 0 {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed_count, total);

            for result in &all_results {
                if !result.passed {
                    error!(
                        "  - {} seed={}: {}",
                        result.scenario.name(),
                        result.seed,
                        result.failure_reason.as_deref().unwrap_or("unknown")
                    );
                }
            }
        }
    }

    // Exit with proper code for CI
    if failed_count > 0 {
        std::process::exit(1);
    }
}

//! Dining Philosophers CLI
//!
//! `dine <philosophers> <hunger>` seats the philosophers, redraws the table
//! after every status change and exits once everyone has eaten.

use dine_core::{ConsoleRenderer, DineConfig, DineError, DineManager, DineReport, NullRenderer, Renderer};
use dine_env::{DineContext, TokioContext};
use dine_sim::cli::{init_tracing, Args};
use dine_sim::SimContext;
use std::sync::Arc;
use tracing::{info, Level};

/// Runs the dinner on any context with any renderer.
async fn serve<Ctx, R>(config: DineConfig, context: Arc<Ctx>, renderer: R) -> Result<DineReport, DineError>
where
    Ctx: DineContext,
    R: Renderer + Send,
{
    let manager = DineManager::new(config, context)?;

    // Ctrl-C lets every philosopher finish the current meal, then stops
    let shutdown = manager.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, clearing the table");
            shutdown.shutdown();
        }
    });

    let (report, _state, _renderer) = manager.run_observed(renderer).await?;
    Ok(report)
}

async fn serve_with<Ctx: DineContext>(
    config: DineConfig,
    context: Arc<Ctx>,
    quiet: bool,
) -> Result<DineReport, DineError> {
    if quiet {
        serve(config, context, NullRenderer).await
    } else {
        serve(config, context, ConsoleRenderer::stdout()).await
    }
}

#[tokio::main]
async fn main() {
    let args = match Args::parse_from_args(std::env::args_os()) {
        Ok(args) => args,
        Err(e) => {
            println!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    // Initialize logging
    init_tracing(Level::WARN, args.verbose);

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", e);
            std::process::exit(e.exit_code());
        }
    };

    let result = match args.seed {
        Some(seed) => serve_with(config, SimContext::shared(seed), args.quiet).await,
        None => serve_with(config, TokioContext::shared(), args.quiet).await,
    };

    match result {
        Ok(report) if report.cancelled => {
            println!(
                "Interrupted after {} meals ({:.2}s)",
                report.total_meals(),
                report.elapsed.as_secs_f64()
            );
        }
        Ok(report) => {
            println!(
                "All {} philosophers finished: {} meals in {:.2}s",
                report.outcomes.len(),
                report.total_meals(),
                report.elapsed.as_secs_f64()
            );
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

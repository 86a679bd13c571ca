//! Scenario runner - executes liveness and safety scenarios.

use crate::context::SimContext;
use crate::exporter::{SimExport, TableExport};
use crate::oracle::SequenceOracle;
use crate::rng::DeterministicRngProvider;
use crate::scenarios::ScenarioId;

use dine_core::{DineConfig, DineManager, DineReport, Renderer, TableState};
use dine_env::Update;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: ScenarioId,

    /// Seed used
    pub seed: u64,

    /// Whether scenario passed all assertions
    pub passed: bool,

    /// Tables executed (stops at the first failing table)
    pub tables_run: usize,

    /// Total wall time in seconds
    pub elapsed_secs: f64,

    /// Failure message if any
    pub failure_reason: Option<String>,

    /// Metrics collected during run
    pub metrics: ScenarioMetrics,

    /// Recorded updates of every table
    pub export: SimExport,
}

/// Metrics collected during scenario execution.
#[derive(Debug, Clone, Default)]
pub struct ScenarioMetrics {
    /// Updates delivered to the observer
    pub updates: u64,

    /// Meals eaten
    pub meals: u64,

    /// Fork pick-ups
    pub fork_acquisitions: u64,

    /// Exclusivity violations (must be 0)
    pub fork_violations: u64,

    /// Largest table run
    pub max_philosophers: usize,
}

/// Renderer that keeps every update instead of drawing it.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    events: Vec<Update>,
}

impl RecordingRenderer {
    /// Returns the recorded updates.
    pub fn events(&self) -> &[Update] {
        &self.events
    }

    /// Consumes the renderer, returning the updates.
    pub fn into_events(self) -> Vec<Update> {
        self.events
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, state: &TableState) -> std::io::Result<()> {
        if let Some(update) = state.last_update() {
            self.events.push(update);
        }
        Ok(())
    }
}

/// One executed table.
#[derive(Debug)]
struct TableRun {
    report: DineReport,
    state: TableState,
    events: Vec<Update>,
}

/// Runs scenarios.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Longest single meal
    max_eat: Duration,

    /// Per-table deadline before a deadlock is assumed
    table_timeout: Duration,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_eat: Duration::from_millis(5),
            table_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the longest single meal.
    pub fn with_max_eat(mut self, max_eat: Duration) -> Self {
        self.max_eat = max_eat;
        self
    }

    /// Sets the per-table deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.table_timeout = timeout;
        self
    }

    /// Runs a scenario and returns the result.
    pub async fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        debug!("  {}", scenario.description());

        let seeds = DeterministicRngProvider::new(self.seed);
        let mut metrics = ScenarioMetrics::default();
        let mut export = SimExport::new(scenario.name(), self.seed);
        let mut failure_reason = None;
        let mut tables_run = 0;
        let mut elapsed = Duration::ZERO;

        for (index, config) in scenario.tables(self.max_eat).into_iter().enumerate() {
            let table_seed = seeds.table_seed(index as u64);
            let philosophers = config.philosophers;
            let starting_hunger = config.starting_hunger;
            tables_run += 1;
            metrics.max_philosophers = metrics.max_philosophers.max(philosophers);

            let (events, table_elapsed, verdict) = match self.run_table(config, table_seed).await {
                Ok(run) => {
                    metrics.updates += run.events.len() as u64;
                    metrics.meals += run.report.total_meals();
                    metrics.fork_acquisitions += run.report.fork_acquisitions;
                    metrics.fork_violations += run.report.fork_violations;
                    let verdict = Self::check(&run, starting_hunger);
                    (run.events, run.report.elapsed, verdict)
                }
                Err(reason) => (Vec::new(), self.table_timeout, Err(reason)),
            };
            elapsed += table_elapsed;

            let failure = verdict
                .err()
                .map(|reason| format!("table of {} (seed={}): {}", philosophers, table_seed, reason));

            export.add_table(TableExport {
                seed: table_seed,
                philosophers,
                starting_hunger,
                elapsed_ms: table_elapsed.as_millis() as u64,
                events,
                failure_reason: failure.clone(),
            });

            if let Some(reason) = failure {
                warn!("{}", reason);
                failure_reason = Some(reason);
                break;
            }
        }

        let passed = failure_reason.is_none();
        export.finalize(passed);

        ScenarioResult {
            scenario,
            seed: self.seed,
            passed,
            tables_run,
            elapsed_secs: elapsed.as_secs_f64(),
            failure_reason,
            metrics,
            export,
        }
    }

    /// Runs one table under the deadline.
    async fn run_table(&self, config: DineConfig, seed: u64) -> Result<TableRun, String> {
        let philosophers = config.philosophers;
        let context = SimContext::shared(seed);
        let manager = DineManager::new(config, Arc::clone(&context)).map_err(|e| e.to_string())?;
        let shutdown = manager.shutdown_handle();

        match tokio::time::timeout(self.table_timeout, manager.run_observed(RecordingRenderer::default())).await {
            Ok(Ok((report, state, recorder))) => {
                debug!(
                    philosophers,
                    meals = report.total_meals(),
                    slept_ms = context.total_slept().as_millis() as u64,
                    "table done"
                );
                Ok(TableRun {
                    report,
                    state,
                    events: recorder.into_events(),
                })
            }
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => {
                // Best effort: let whoever is still able to move leave the table
                shutdown.shutdown();
                Err(format!(
                    "no progress within {:?}, deadlock suspected",
                    self.table_timeout
                ))
            }
        }
    }

    /// Checks a finished table against every safety and liveness property.
    fn check(run: &TableRun, starting_hunger: u32) -> Result<(), String> {
        let philosophers = run.state.len();

        if run.report.fork_violations > 0 {
            return Err(format!(
                "{} fork exclusivity violation(s)",
                run.report.fork_violations
            ));
        }

        if !run.report.all_finished() {
            let hungry: Vec<usize> = run
                .report
                .outcomes
                .iter()
                .filter(|o| !o.finished)
                .map(|o| o.id.index())
                .collect();
            return Err(format!("philosophers still hungry: {:?}", hungry));
        }

        let expected_meals = philosophers as u64 * u64::from(starting_hunger);
        if run.report.total_meals() != expected_meals {
            return Err(format!(
                "{} meals eaten, expected {}",
                run.report.total_meals(),
                expected_meals
            ));
        }

        if !run.state.all_finished() {
            return Err("final snapshot shows unfinished philosophers".to_string());
        }

        let mut oracle = SequenceOracle::new(philosophers, starting_hunger);
        oracle.observe_all(&run.events);
        oracle.verdict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dine_env::{PhilosopherId, Status};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_classic_passes() {
        let result = ScenarioRunner::new(42).run(ScenarioId::Classic).await;

        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.tables_run, 1);
        assert_eq!(result.metrics.meals, 15);
        assert_eq!(result.metrics.updates, 35);
        assert_eq!(result.metrics.fork_violations, 0);
        assert_eq!(result.export.event_count(), 35);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_pair_passes() {
        let result = ScenarioRunner::new(7).run(ScenarioId::Pair).await;
        assert!(result.passed, "{:?}", result.failure_reason);
        assert_eq!(result.metrics.meals, 20);
    }

    #[test]
    fn test_recording_renderer_keeps_last_update() {
        let mut state = TableState::new(2, 1);
        let mut recorder = RecordingRenderer::default();

        recorder.render(&state).unwrap();
        assert!(recorder.events().is_empty());

        let update = Update::new(PhilosopherId(1), 1, Status::Thinking);
        state.apply(update).unwrap();
        recorder.render(&state).unwrap();
        assert_eq!(recorder.events(), &[update]);
    }

    #[test]
    fn test_check_rejects_violations() {
        let run = TableRun {
            report: DineReport {
                outcomes: Vec::new(),
                fork_acquisitions: 2,
                fork_violations: 1,
                elapsed: Duration::ZERO,
                cancelled: false,
            },
            state: TableState::new(2, 1),
            events: Vec::new(),
        };

        let err = ScenarioRunner::check(&run, 1).unwrap_err();
        assert!(err.contains("exclusivity"));
    }

    #[test]
    fn test_check_rejects_missing_meals() {
        let run = TableRun {
            report: DineReport {
                outcomes: Vec::new(),
                fork_acquisitions: 0,
                fork_violations: 0,
                elapsed: Duration::ZERO,
                cancelled: false,
            },
            state: TableState::new(2, 1),
            events: Vec::new(),
        };

        let err = ScenarioRunner::check(&run, 1).unwrap_err();
        assert!(err.contains("0 meals eaten, expected 2"));
    }
}

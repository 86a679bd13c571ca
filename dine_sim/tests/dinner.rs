//! End-to-end dinners through the public API.

use dine_core::{ConsoleRenderer, DineConfig, DineManager, Philosopher};
use dine_env::{DineContext, PhilosopherId, Status, TokioContext};
use dine_sim::{RecordingRenderer, ScenarioId, ScenarioRunner, SequenceOracle, SimContext};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn five_philosophers_finish_on_the_console() {
    let config = DineConfig::new(5, 3);
    let manager = DineManager::new(config, TokioContext::shared()).unwrap();

    let (report, state, console) = tokio::time::timeout(
        Duration::from_secs(5),
        manager.run_observed(ConsoleRenderer::new(Vec::new())),
    )
    .await
    .expect("dinner deadlocked")
    .unwrap();

    assert!(report.all_finished());
    assert_eq!(report.fork_violations, 0);
    assert!(state.all_finished());
    assert_eq!(console.frames(), 35);

    let screen = String::from_utf8(console.into_inner()).unwrap();
    let last_frame = screen.rsplit("Philosopher   0").next().unwrap();
    assert!(last_frame.contains("finished"));
    assert!(screen.contains("100%"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn seeded_dinner_satisfies_the_oracle() {
    let config = DineConfig::new(9, 4).with_eat_range(Duration::ZERO, Duration::from_millis(3));
    let manager = DineManager::new(config, SimContext::shared(2024)).unwrap();

    let (report, state, recorder) = manager
        .run_observed(RecordingRenderer::default())
        .await
        .unwrap();

    assert_eq!(report.total_meals(), 36);
    assert_eq!(state.count(Status::Finished), 9);

    let mut oracle = SequenceOracle::new(9, 4);
    oracle.observe_all(recorder.events());
    assert_eq!(oracle.verdict(), Ok(()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn odd_ring_and_timeout_scenarios_pass() {
    let runner = ScenarioRunner::new(3).with_timeout(Duration::from_secs(10));

    for scenario in [ScenarioId::OddRing, ScenarioId::TimeoutRetry] {
        let result = runner.run(scenario).await;
        assert!(result.passed, "{}: {:?}", scenario, result.failure_reason);
        assert_eq!(result.metrics.fork_violations, 0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sweep_covers_every_ring_size() {
    let result = ScenarioRunner::new(11)
        .with_max_eat(Duration::from_millis(1))
        .run(ScenarioId::Sweep)
        .await;

    assert!(result.passed, "{:?}", result.failure_reason);
    assert_eq!(result.tables_run, 19);
    assert_eq!(result.metrics.max_philosophers, 20);
    // sum of n*3 for n in 2..=20
    assert_eq!(result.metrics.meals, 627);
}

fn meals_for(seed: u64, seat: usize) -> Vec<Duration> {
    let config = DineConfig::new(4, 1);
    let forks = dine_core::fork::lay_forks(4);
    let (_tx, shutdown) = tokio::sync::watch::channel(false);
    let mut philosopher =
        Philosopher::new(PhilosopherId(seat), &config, forks, SimContext::shared(seed), shutdown);
    (0..8).map(|_| philosopher.meal_duration()).collect()
}

proptest! {
    #[test]
    fn meal_durations_follow_the_seed(seed in any::<u64>(), seat in 0usize..4) {
        let first = meals_for(seed, seat);
        prop_assert_eq!(&first, &meals_for(seed, seat));
        prop_assert!(first.iter().all(|d| *d >= Duration::from_millis(1)));
        prop_assert!(first.iter().all(|d| *d <= Duration::from_millis(100)));
    }

    #[test]
    fn contexts_share_a_seed(seed in any::<u64>()) {
        let context = SimContext::new(seed);
        prop_assert_eq!(context.seed(), seed);
        prop_assert_eq!(Arc::new(context.clone()).seed(), seed);
    }
}

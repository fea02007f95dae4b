//! Remote run controller: start, bounded poll, best-effort abort.
//!
//! The run lifecycle is `RUNNING -> SUCCEEDED | FAILED | ABORTED`, observed
//! from outside. The controller polls on a fixed interval until it sees a
//! terminal status or its wall-clock watchdog cap elapses, whichever comes
//! first. Total wait is bounded to roughly the cap plus one poll interval
//! plus one abort call, regardless of how long the remote run takes.

use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::{ScrapeJobConfig, WatchdogConfig};
use crate::error::EngineError;
use crate::registry::RunRegistry;
use crate::traits::engine::ScrapeEngine;
use crate::types::run::{RunStatus, ScrapeRun};

/// What the poll loop observed before handing off to collection.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Last observed status. `Running` when the watchdog acted first.
    pub final_status: RunStatus,
    /// True when no terminal status was observed and an abort was issued.
    pub timed_out: bool,
    /// Status polls performed.
    pub polls: u32,
}

/// Drives one remote run's lifecycle against the engine.
pub struct RunController {
    engine: Arc<dyn ScrapeEngine>,
    registry: Arc<RunRegistry>,
    config: WatchdogConfig,
}

impl RunController {
    pub fn new(
        engine: Arc<dyn ScrapeEngine>,
        registry: Arc<RunRegistry>,
        config: WatchdogConfig,
    ) -> Self {
        Self {
            engine,
            registry,
            config,
        }
    }

    /// Start a run and register it as in-flight.
    pub async fn start(&self, config: &ScrapeJobConfig) -> Result<ScrapeRun, EngineError> {
        let run_id = self.engine.start_run(config).await?;
        self.registry
            .register(&run_id, config.source_urls.clone());
        info!(%run_id, sources = config.source_urls.len(), "Scrape run started");
        Ok(ScrapeRun::started(run_id))
    }

    /// Poll until terminal status or watchdog cap, whichever comes first.
    ///
    /// A transport error during polling ends the loop early: the status is
    /// treated as non-terminal and control proceeds to abort-and-collect
    /// rather than retrying indefinitely. On any non-terminal exit the run
    /// is aborted best-effort; abort failure is logged, never propagated.
    pub async fn await_terminal(&self, run: &mut ScrapeRun) -> RunOutcome {
        let run_id = run.run_id.clone();
        let deadline = Instant::now() + self.config.watchdog_cap;
        let mut polls = 0u32;

        loop {
            let now = Instant::now();
            if now >= deadline {
                warn!(%run_id, polls, "Watchdog cap elapsed, aborting run");
                break;
            }
            sleep(self.config.poll_interval.min(deadline - now)).await;

            polls += 1;
            match self.engine.run_status(&run_id).await {
                Ok(status) if status.is_terminal() => {
                    run.complete(status);
                    self.registry.deregister(&run_id);
                    info!(%run_id, %status, polls, "Run reached terminal status");
                    return RunOutcome {
                        final_status: status,
                        timed_out: false,
                        polls,
                    };
                }
                Ok(status) => {
                    debug!(%run_id, %status, polls, "Run still in progress");
                }
                Err(e) => {
                    warn!(%run_id, error = %e, "Status poll failed, proceeding to abort-and-collect");
                    break;
                }
            }
        }

        self.abort_best_effort(&run_id).await;
        RunOutcome {
            final_status: run.status,
            timed_out: true,
            polls,
        }
    }

    /// Abort a run and stop tracking it.
    pub async fn abort(&self, run_id: &str) -> Result<(), EngineError> {
        self.engine.abort_run(run_id).await?;
        self.registry.deregister(run_id);
        info!(run_id, "Run aborted");
        Ok(())
    }

    /// Two-stage best-effort abort: the controller's own abort path first,
    /// and only if that call itself fails, one direct call to the engine's
    /// run-abort operation. Neither failure stops result collection.
    async fn abort_best_effort(&self, run_id: &str) {
        if let Err(primary) = self.abort(run_id).await {
            warn!(run_id, error = %primary, "Abort failed, retrying via direct engine abort");
            if let Err(fallback) = self.engine.abort_run(run_id).await {
                warn!(run_id, error = %fallback, "Direct abort also failed, collecting anyway");
            }
            self.registry.deregister(run_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EngineCall, MockEngine};
    use std::time::Duration;

    fn fast_watchdog() -> WatchdogConfig {
        WatchdogConfig::default()
            .with_poll_interval(Duration::from_millis(10))
            .with_watchdog_cap(Duration::from_millis(60))
    }

    fn controller(engine: MockEngine) -> (RunController, Arc<RunRegistry>) {
        let registry = Arc::new(RunRegistry::new());
        (
            RunController::new(Arc::new(engine), registry.clone(), fast_watchdog()),
            registry,
        )
    }

    #[tokio::test]
    async fn start_registers_run() {
        let engine = MockEngine::new();
        let (controller, registry) = controller(engine);

        let run = controller
            .start(&ScrapeJobConfig::new(["https://a"]))
            .await
            .unwrap();
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(registry.active().len(), 1);
        assert_eq!(registry.active()[0].run_id, run.run_id);
    }

    #[tokio::test]
    async fn poll_until_terminal_deregisters() {
        let engine = MockEngine::new().with_statuses([
            RunStatus::Running,
            RunStatus::Running,
            RunStatus::Succeeded,
        ]);
        let (controller, registry) = controller(engine);

        let mut run = controller
            .start(&ScrapeJobConfig::new(["https://a"]))
            .await
            .unwrap();
        let outcome = controller.await_terminal(&mut run).await;

        assert_eq!(outcome.final_status, RunStatus::Succeeded);
        assert_eq!(run.status, RunStatus::Succeeded);
        assert!(run.finished_at.is_some());
        assert!(!outcome.timed_out);
        assert_eq!(outcome.polls, 3);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn watchdog_cap_triggers_single_abort() {
        // Statuses never leave Running; the cap must fire.
        let engine = MockEngine::new();
        let calls = engine.calls_handle();
        let (controller, registry) = controller(engine);

        let mut run = controller
            .start(&ScrapeJobConfig::new(["https://a"]))
            .await
            .unwrap();
        let started = std::time::Instant::now();
        let outcome = controller.await_terminal(&mut run).await;

        assert!(outcome.timed_out);
        assert_eq!(outcome.final_status, RunStatus::Running);
        assert!(registry.is_empty());
        // Bounded: cap + one poll interval, with scheduling slack.
        assert!(started.elapsed() < Duration::from_millis(300));

        let aborts = calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, EngineCall::Abort))
            .count();
        assert_eq!(aborts, 1);
    }

    #[tokio::test]
    async fn failed_primary_abort_falls_back_to_direct_abort() {
        let engine = MockEngine::new().with_abort_results([
            Err(EngineError::Api {
                status: 500,
                message: "abort rejected".into(),
            }),
            Ok(()),
        ]);
        let calls = engine.calls_handle();
        let (controller, registry) = controller(engine);

        let mut run = controller
            .start(&ScrapeJobConfig::new(["https://a"]))
            .await
            .unwrap();
        let outcome = controller.await_terminal(&mut run).await;

        assert!(outcome.timed_out);
        assert!(registry.is_empty());
        let aborts = calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, EngineCall::Abort))
            .count();
        assert_eq!(aborts, 2);
    }

    #[tokio::test]
    async fn transport_error_ends_poll_loop_early() {
        let engine = MockEngine::new().with_status_results([
            Ok(RunStatus::Running),
            Err(EngineError::Transport("connection reset".into())),
        ]);
        let (controller, _registry) = controller(engine);

        let mut run = controller
            .start(&ScrapeJobConfig::new(["https://a"]))
            .await
            .unwrap();
        let started = std::time::Instant::now();
        let outcome = controller.await_terminal(&mut run).await;

        assert!(outcome.timed_out);
        assert_eq!(run.status, RunStatus::Running);
        assert_eq!(outcome.polls, 2);
        // Exited well before the 60ms cap would have forced it.
        assert!(started.elapsed() < Duration::from_millis(50));
    }
}

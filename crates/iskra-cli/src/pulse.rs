//! Fixed-period tick scheduler around a [`StateEngine`].
//!
//! One mutex guards the engine (live snapshot, pending target and EMA pair)
//! together with its RNG, so a tick and an override never interleave and
//! readers only ever see a fully published snapshot.

use std::sync::Arc;
use std::time::Duration;

use iskra_core::{
    DerivedMetrics, EngineReport, MetricsPatch, MetricsState, Phase, Ritual, StateEngine,
    TargetState,
};
use rand::rngs::SmallRng;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

struct Core {
    engine: StateEngine,
    rng: SmallRng,
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct PulseLoop {
    core: Arc<Mutex<Core>>,
    period: Duration,
    worker: Option<Worker>,
}

impl PulseLoop {
    /// Wrap `engine`; the tick period comes from its config. Not started.
    pub fn new(engine: StateEngine, rng: SmallRng) -> Self {
        let period = engine.config().tick_period();
        Self {
            core: Arc::new(Mutex::new(Core { engine, rng })),
            period,
            worker: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    /// Start ticking. No-op when already running. The first tick fires one
    /// period from now.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_ticks(self.core.clone(), self.period, cancel.clone()));
        tracing::info!(period_ms = self.period.as_millis() as u64, "pulse started");
        self.worker = Some(Worker { cancel, handle });
    }

    /// Stop ticking and wait for the task to finish. Idempotent; state is
    /// kept, so a later `start` resumes where this left off.
    pub async fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        worker.cancel.cancel();
        if let Err(e) = worker.handle.await {
            tracing::warn!("pulse task ended abnormally: {e}");
        }
        tracing::info!("pulse stopped");
    }

    /// Feed one input event and make sure the scheduler is running.
    /// Returns the number of axes the text addressed.
    pub async fn on_user_input(&mut self, text: &str) -> usize {
        let addressed = self.core.lock().await.engine.on_user_input(text);
        tracing::debug!(addressed, "input scored");
        self.start();
        addressed
    }

    pub async fn force_state(&self, patch: &MetricsPatch, target: TargetState) {
        self.core.lock().await.engine.force_state(patch, target);
    }

    /// Apply a ritual and make sure the scheduler is running.
    pub async fn perform(&mut self, ritual: Ritual) {
        self.core.lock().await.engine.perform(ritual);
        tracing::info!(%ritual, "ritual performed");
        self.start();
    }

    pub async fn snapshot(&self) -> MetricsState {
        self.core.lock().await.engine.snapshot()
    }

    pub async fn phase(&self) -> Phase {
        self.core.lock().await.engine.phase()
    }

    pub async fn derived(&self) -> DerivedMetrics {
        self.core.lock().await.engine.derived()
    }

    pub async fn target(&self) -> TargetState {
        self.core.lock().await.engine.target().clone()
    }

    pub async fn report(&self) -> EngineReport {
        self.core.lock().await.engine.report()
    }
}

impl Drop for PulseLoop {
    fn drop(&mut self) {
        if let Some(worker) = &self.worker {
            worker.cancel.cancel();
        }
    }
}

async fn run_ticks(core: Arc<Mutex<Core>>, period: Duration, cancel: CancellationToken) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_phase: Option<Phase> = None;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let mut guard = core.lock().await;
                let Core { engine, rng } = &mut *guard;
                let outcome = engine.tick(rng);
                let phase = engine.phase();
                tracing::trace!(snapshot = ?engine.snapshot(), "tick");
                if outcome.converged {
                    tracing::debug!(tick = engine.ticks(), "target reached");
                }
                if let Some(prev) = last_phase
                    && prev != phase
                {
                    tracing::info!(from = %prev, to = %phase, "phase transition");
                }
                last_phase = Some(phase);
            }
        }
    }
}

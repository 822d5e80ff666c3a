//! Synchronous convergence state machine.
//!
//! `StateEngine` exclusively owns the live snapshot, the pending target and
//! the chaos/drift EMA pair. Input events merge new targets; each call to
//! [`StateEngine::tick`] interpolates the live state one step toward the
//! target (or toward the neutral attractor when nothing is pending),
//! injects bounded noise, recomputes rhythm and mirror sync, and clears the
//! target once every targeted field is within tolerance.
//!
//! Scheduling is the caller's concern: the engine never sleeps and never
//! stops itself.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::derived::{DerivedMetrics, mirror_sync};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::metrics::{Axis, EmaPair, MetricsPatch, MetricsState, TargetState};
use crate::phase::Phase;
use crate::rhythm::compute_rhythm;
use crate::ritual::Ritual;
use crate::scorer::score;

/// What a single tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    /// No target was pending; the neutral attractor was used.
    pub attractor: bool,
    /// A pending target was reached and cleared.
    pub converged: bool,
}

/// Serializable view of the engine for hosts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineReport {
    pub ticks: u64,
    pub phase: Phase,
    pub snapshot: MetricsState,
    pub derived: DerivedMetrics,
    pub target: TargetState,
}

#[derive(Clone, Debug)]
pub struct StateEngine {
    config: EngineConfig,
    lexicon: Lexicon,
    neutral: TargetState,
    live: MetricsState,
    target: TargetState,
    ema: EmaPair,
    ticks: u64,
}

impl Default for StateEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default(), Lexicon::default())
    }
}

impl StateEngine {
    /// Validate `config` and `lexicon`, then start from the default snapshot.
    pub fn new(config: EngineConfig, lexicon: Lexicon) -> Result<Self> {
        config.validate()?;
        lexicon.validate()?;
        Ok(Self::build(config, lexicon))
    }

    fn build(config: EngineConfig, lexicon: Lexicon) -> Self {
        let live = MetricsState::default();
        let ema = EmaPair::new(
            lexicon.base(Axis::Chaos).unwrap_or(live.chaos),
            lexicon.base(Axis::Drift).unwrap_or(live.drift),
        );
        Self {
            neutral: config.neutral_target(),
            config,
            lexicon,
            live,
            target: TargetState::new(),
            ema,
            ticks: 0,
        }
    }

    /// Replace the starting snapshot (clamped into bounds).
    pub fn with_snapshot(mut self, snapshot: MetricsState) -> Self {
        self.live = MetricsState::default();
        let patch = Axis::ALL
            .iter()
            .fold(MetricsPatch::new(), |p, a| p.with(*a, snapshot.get(*a)))
            .with_rhythm(f64::from(snapshot.rhythm))
            .with_interrupt(snapshot.interrupt)
            .with_ctx_switch(snapshot.ctx_switch);
        patch.apply(&mut self.live);
        self.live.mirror_sync = mirror_sync(&self.live);
        self
    }

    /// Score `text` and merge the addressed axes into the pending target.
    /// Returns the number of axes the text addressed.
    pub fn on_user_input(&mut self, text: &str) -> usize {
        let scores = score(&self.lexicon, text);
        self.target.merge(&scores);
        scores.len()
    }

    /// Overwrite named live fields and replace the pending target.
    pub fn force_state(&mut self, patch: &MetricsPatch, target: TargetState) {
        patch.apply(&mut self.live);
        self.target = target;
    }

    pub fn perform(&mut self, ritual: Ritual) {
        self.force_state(&ritual.patch(), ritual.target());
    }

    /// Advance the live state by one step.
    pub fn tick(&mut self, rng: &mut impl Rng) -> TickOutcome {
        let cfg = &self.config;
        let attractor = self.target.is_empty();
        let target = if attractor { &self.neutral } else { &self.target };

        let prev = self.live;
        let mut next = prev;
        for axis in Axis::ALL {
            let current = prev.get(axis);
            let goal = target.get(axis).unwrap_or(current);
            let noise = (rng.random::<f64>() - 0.5) * cfg.noise;
            next.set(axis, current + (goal - current) * cfg.lerp + noise);
        }

        next.interrupt = rng.random::<f64>() * cfg.interrupt_max;
        next.ctx_switch = rng.random::<f64>() * cfg.ctx_switch_max;

        self.ema.update(next.chaos, next.drift, cfg.rhythm.ema.beta);
        next.rhythm = compute_rhythm(&next, f64::from(prev.rhythm), &self.ema, &cfg.rhythm);
        next.mirror_sync = mirror_sync(&next);

        self.live = next;
        self.ticks += 1;

        let converged = !attractor && self.target.is_reached(&self.live, cfg.tolerance);
        if converged {
            self.target.clear();
        }

        TickOutcome {
            attractor,
            converged,
        }
    }

    pub fn snapshot(&self) -> MetricsState {
        self.live
    }

    pub fn phase(&self) -> Phase {
        Phase::classify(&self.live)
    }

    pub fn derived(&self) -> DerivedMetrics {
        DerivedMetrics::compute(&self.live)
    }

    pub fn target(&self) -> &TargetState {
        &self.target
    }

    pub fn ema(&self) -> EmaPair {
        self.ema
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn report(&self) -> EngineReport {
        EngineReport {
            ticks: self.ticks,
            phase: self.phase(),
            snapshot: self.live,
            derived: self.derived(),
            target: self.target.clone(),
        }
    }
}

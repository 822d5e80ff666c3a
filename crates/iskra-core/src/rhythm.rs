//! ∆-rhythm index: a weighted aggregate of the positive components of the
//! state, minus a capped turbulence penalty, exponentially smoothed against
//! the previous value.

use serde::{Deserialize, Serialize};

use crate::constants::{
    EMA_BETA, PENALTY_CONTEXT, PENALTY_G_CHAOS, PENALTY_G_DRIFT, PENALTY_INTERRUPT, PENALTY_MAX,
    RHYTHM_ALPHA, RHYTHM_VERSION, RHYTHM_WEIGHTS, WEIGHT_SUM_EPSILON,
};
use crate::error::{ConfigError, Result, check_unit};
use crate::metrics::{EmaPair, MetricsState, clamp};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    pub max: f64,
    pub g_chaos: f64,
    pub g_drift: f64,
    pub interrupt: f64,
    pub context: f64,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            max: PENALTY_MAX,
            g_chaos: PENALTY_G_CHAOS,
            g_drift: PENALTY_G_DRIFT,
            interrupt: PENALTY_INTERRUPT,
            context: PENALTY_CONTEXT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmaConfig {
    /// Smoothing of the rhythm index itself.
    pub alpha: f64,
    /// Smoothing of the chaos/drift trailing averages.
    pub beta: f64,
}

impl Default for EmaConfig {
    fn default() -> Self {
        Self {
            alpha: RHYTHM_ALPHA,
            beta: EMA_BETA,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RhythmConfig {
    pub version: String,
    /// [trust, clarity, 1-pain, 1-drift, 1-chaos], summing to 1.
    pub weights: [f64; 5],
    pub penalty: PenaltyConfig,
    pub ema: EmaConfig,
}

impl Default for RhythmConfig {
    fn default() -> Self {
        Self {
            version: RHYTHM_VERSION.to_string(),
            weights: RHYTHM_WEIGHTS,
            penalty: PenaltyConfig::default(),
            ema: EmaConfig::default(),
        }
    }
}

impl RhythmConfig {
    pub fn validate(&self) -> Result<()> {
        for (i, w) in self.weights.iter().enumerate() {
            check_unit(&format!("rhythm.weights[{i}]"), *w, 0.0, 1.0, "[0, 1]")?;
        }
        let sum: f64 = self.weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSum(sum));
        }

        let p = &self.penalty;
        check_unit("rhythm.penalty.max", p.max, 0.0, 1.0, "[0, 1]")?;
        for (name, v) in [
            ("rhythm.penalty.g_chaos", p.g_chaos),
            ("rhythm.penalty.g_drift", p.g_drift),
            ("rhythm.penalty.interrupt", p.interrupt),
            ("rhythm.penalty.context", p.context),
        ] {
            check_unit(name, v, 0.0, f64::MAX, ">= 0")?;
        }

        check_unit("rhythm.ema.alpha", self.ema.alpha, f64::MIN_POSITIVE, 1.0, "(0, 1]")?;
        check_unit("rhythm.ema.beta", self.ema.beta, f64::MIN_POSITIVE, 1.0, "(0, 1]")?;
        Ok(())
    }

    /// Weighted positive base score in [0, 1].
    pub fn base_score(&self, m: &MetricsState) -> f64 {
        let [w_trust, w_clarity, w_pain_inv, w_drift_inv, w_chaos_inv] = self.weights;
        w_trust * m.trust
            + w_clarity * m.clarity
            + w_pain_inv * (1.0 - m.pain)
            + w_drift_inv * (1.0 - m.drift)
            + w_chaos_inv * (1.0 - m.chaos)
    }

    /// Turbulence penalty. Only increases of chaos/drift over their trailing
    /// averages are penalized; the total is capped at `penalty.max`.
    pub fn penalty(&self, m: &MetricsState, ema: &EmaPair) -> f64 {
        let chaos_gradient = (m.chaos - ema.chaos).max(0.0);
        let drift_gradient = (m.drift - ema.drift).max(0.0);
        let p = &self.penalty;
        let raw = p.g_chaos * chaos_gradient
            + p.g_drift * drift_gradient
            + p.interrupt * m.interrupt
            + p.context * m.ctx_switch;
        raw.min(p.max)
    }
}

/// Compute the next rhythm percentage from a raw snapshot, the previous
/// rhythm percentage and the current chaos/drift EMAs.
///
/// Pure: the caller persists `prev_percent` and the EMA pair across calls.
pub fn compute_rhythm(
    m: &MetricsState,
    prev_percent: f64,
    ema: &EmaPair,
    config: &RhythmConfig,
) -> u8 {
    let prev = clamp(prev_percent / 100.0, 0.0, 1.0);
    let raw_delta = clamp(config.base_score(m) - config.penalty(m, ema), 0.0, 1.0);
    let alpha = config.ema.alpha;
    let smooth_delta = (1.0 - alpha) * prev + alpha * raw_delta;
    clamp((100.0 * smooth_delta).round(), 0.0, 100.0) as u8
}

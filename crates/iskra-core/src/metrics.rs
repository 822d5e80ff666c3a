use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Clamp into `[lo, hi]`, mapping NaN to `lo` so no non-finite value can
/// enter the live state.
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() { lo } else { x.clamp(lo, hi) }
}

/// One primary dimension of the affective state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Trust,
    Clarity,
    Pain,
    Drift,
    Chaos,
    Echo,
    SilenceMass,
}

impl Axis {
    pub const ALL: [Axis; 7] = [
        Axis::Trust,
        Axis::Clarity,
        Axis::Pain,
        Axis::Drift,
        Axis::Chaos,
        Axis::Echo,
        Axis::SilenceMass,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Axis::Trust => "trust",
            Axis::Clarity => "clarity",
            Axis::Pain => "pain",
            Axis::Drift => "drift",
            Axis::Chaos => "chaos",
            Axis::Echo => "echo",
            Axis::SilenceMass => "silence_mass",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-axis values produced by the text scorer. Only addressed axes are present.
pub type AxisScores = BTreeMap<Axis, f64>;

/// Complete affective snapshot.
///
/// Every field lies in [0, 1] except `rhythm`, an integer percentage in
/// [0, 100]. Mutation goes through [`MetricsState::set`], which clamps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricsState {
    pub rhythm: u8,
    pub trust: f64,
    pub clarity: f64,
    pub pain: f64,
    pub drift: f64,
    pub chaos: f64,
    pub echo: f64,
    pub silence_mass: f64,
    pub mirror_sync: f64,
    pub interrupt: f64,
    pub ctx_switch: f64,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self {
            rhythm: 75,
            trust: 0.8,
            clarity: 0.7,
            pain: 0.1,
            drift: 0.2,
            chaos: 0.3,
            echo: 0.5,
            silence_mass: 0.1,
            mirror_sync: 0.55,
            interrupt: 0.1,
            ctx_switch: 0.2,
        }
    }
}

impl MetricsState {
    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Trust => self.trust,
            Axis::Clarity => self.clarity,
            Axis::Pain => self.pain,
            Axis::Drift => self.drift,
            Axis::Chaos => self.chaos,
            Axis::Echo => self.echo,
            Axis::SilenceMass => self.silence_mass,
        }
    }

    /// Set a primary axis, clamped to [0, 1].
    pub fn set(&mut self, axis: Axis, value: f64) {
        let v = clamp(value, 0.0, 1.0);
        match axis {
            Axis::Trust => self.trust = v,
            Axis::Clarity => self.clarity = v,
            Axis::Pain => self.pain = v,
            Axis::Drift => self.drift = v,
            Axis::Chaos => self.chaos = v,
            Axis::Echo => self.echo = v,
            Axis::SilenceMass => self.silence_mass = v,
        }
    }

    /// Set rhythm from an arbitrary percentage, rounded and clamped to [0, 100].
    pub fn set_rhythm(&mut self, percent: f64) {
        self.rhythm = clamp(percent, 0.0, 100.0).round() as u8;
    }

    /// Rhythm on the 0-1 scale.
    pub fn rhythm_unit(&self) -> f64 {
        f64::from(self.rhythm) / 100.0
    }

    /// True when every field is inside its declared bound.
    pub fn in_bounds(&self) -> bool {
        let unit = |x: f64| (0.0..=1.0).contains(&x);
        self.rhythm <= 100
            && Axis::ALL.iter().all(|a| unit(self.get(*a)))
            && unit(self.mirror_sync)
            && unit(self.interrupt)
            && unit(self.ctx_switch)
    }
}

/// Where the live state should converge: a subset of primary axes and,
/// optionally, rhythm.
///
/// An axis absent from `axes` is not targeted. Rhythm targets are never
/// interpolated (rhythm is always computed) but take part in the
/// convergence check.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    #[serde(default)]
    axes: BTreeMap<Axis, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rhythm: Option<f64>,
}

impl TargetState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: target `axis` at `value` (clamped to [0, 1]).
    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.set(axis, value);
        self
    }

    /// Builder: target rhythm at `percent` (clamped to [0, 100]).
    pub fn with_rhythm(mut self, percent: f64) -> Self {
        self.rhythm = Some(clamp(percent, 0.0, 100.0));
        self
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        self.axes.insert(axis, clamp(value, 0.0, 1.0));
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        self.axes.get(&axis).copied()
    }

    pub fn rhythm(&self) -> Option<f64> {
        self.rhythm
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty() && self.rhythm.is_none()
    }

    /// Number of targeted fields, rhythm included.
    pub fn len(&self) -> usize {
        self.axes.len() + usize::from(self.rhythm.is_some())
    }

    pub fn clear(&mut self) {
        self.axes.clear();
        self.rhythm = None;
    }

    /// Overwrite the axes present in `scores`; other axes keep their targets.
    pub fn merge(&mut self, scores: &AxisScores) {
        for (&axis, &value) in scores {
            self.set(axis, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        self.axes.iter().map(|(a, v)| (*a, *v))
    }

    /// True when every targeted field of `state` is within `tolerance`.
    /// Rhythm is compared on the 0-1 scale.
    pub fn is_reached(&self, state: &MetricsState, tolerance: f64) -> bool {
        let axes_close = self
            .iter()
            .all(|(axis, target)| (state.get(axis) - target).abs() < tolerance);
        let rhythm_close = self
            .rhythm
            .is_none_or(|target| (state.rhythm_unit() - target / 100.0).abs() < tolerance);
        axes_close && rhythm_close
    }
}

/// A partial overwrite of the live snapshot used by external interventions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsPatch {
    #[serde(default)]
    pub axes: BTreeMap<Axis, f64>,
    #[serde(default)]
    pub rhythm: Option<f64>,
    #[serde(default)]
    pub interrupt: Option<f64>,
    #[serde(default)]
    pub ctx_switch: Option<f64>,
}

impl MetricsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, axis: Axis, value: f64) -> Self {
        self.axes.insert(axis, value);
        self
    }

    pub fn with_rhythm(mut self, percent: f64) -> Self {
        self.rhythm = Some(percent);
        self
    }

    pub fn with_interrupt(mut self, value: f64) -> Self {
        self.interrupt = Some(value);
        self
    }

    pub fn with_ctx_switch(mut self, value: f64) -> Self {
        self.ctx_switch = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
            && self.rhythm.is_none()
            && self.interrupt.is_none()
            && self.ctx_switch.is_none()
    }

    /// Overwrite the named fields of `state`, clamping each to its bound.
    pub fn apply(&self, state: &mut MetricsState) {
        for (&axis, &value) in &self.axes {
            state.set(axis, value);
        }
        if let Some(r) = self.rhythm {
            state.set_rhythm(r);
        }
        if let Some(v) = self.interrupt {
            state.interrupt = clamp(v, 0.0, 1.0);
        }
        if let Some(v) = self.ctx_switch {
            state.ctx_switch = clamp(v, 0.0, 1.0);
        }
    }
}

/// Trailing averages of chaos and drift, the baseline for turbulence penalties.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmaPair {
    pub chaos: f64,
    pub drift: f64,
}

impl EmaPair {
    pub fn new(chaos: f64, drift: f64) -> Self {
        Self { chaos, drift }
    }

    /// Standard exponential smoothing with factor `beta`.
    pub fn update(&mut self, chaos: f64, drift: f64, beta: f64) {
        self.chaos = (1.0 - beta) * self.chaos + beta * chaos;
        self.drift = (1.0 - beta) * self.drift + beta * drift;
    }
}

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{CTX_SWITCH_MAX, INTERRUPT_MAX, LERP, NOISE, TICK_MS, TOLERANCE};
use crate::error::{ConfigError, Result, check_unit};
use crate::metrics::{Axis, TargetState};
use crate::rhythm::RhythmConfig;

/// Tunable parameters of the convergence loop. Every field has a default,
/// so a partial TOML/JSON document deserializes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tick_ms: u64,
    /// Interpolation factor λ.
    pub lerp: f64,
    /// Noise magnitude n; noise is uniform in [-n/2, +n/2].
    pub noise: f64,
    pub tolerance: f64,
    pub interrupt_max: f64,
    pub ctx_switch_max: f64,
    /// Attractor used on ticks where no target is pending. Must cover every
    /// axis; a partial table on input is laid over the defaults.
    #[serde(deserialize_with = "neutral_over_defaults")]
    pub neutral: BTreeMap<Axis, f64>,
    pub rhythm: RhythmConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: TICK_MS,
            lerp: LERP,
            noise: NOISE,
            tolerance: TOLERANCE,
            interrupt_max: INTERRUPT_MAX,
            ctx_switch_max: CTX_SWITCH_MAX,
            neutral: default_neutral(),
            rhythm: RhythmConfig::default(),
        }
    }
}

fn default_neutral() -> BTreeMap<Axis, f64> {
    BTreeMap::from([
        (Axis::Trust, 0.8),
        (Axis::Clarity, 0.7),
        (Axis::Pain, 0.1),
        (Axis::Drift, 0.2),
        (Axis::Chaos, 0.3),
        (Axis::Echo, 0.5),
        (Axis::SilenceMass, 0.1),
    ])
}

fn neutral_over_defaults<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<Axis, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = BTreeMap::<Axis, f64>::deserialize(deserializer)?;
    let mut neutral = default_neutral();
    neutral.extend(overrides);
    Ok(neutral)
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms == 0 {
            return Err(ConfigError::out_of_range("tick_ms", 0.0, "> 0"));
        }
        check_unit("lerp", self.lerp, 0.0, 1.0, "[0, 1]")?;
        check_unit("noise", self.noise, 0.0, 1.0, "[0, 1]")?;
        check_unit("tolerance", self.tolerance, f64::MIN_POSITIVE, 1.0, "(0, 1]")?;
        check_unit("interrupt_max", self.interrupt_max, 0.0, 1.0, "[0, 1]")?;
        check_unit("ctx_switch_max", self.ctx_switch_max, 0.0, 1.0, "[0, 1]")?;
        for axis in Axis::ALL {
            let Some(v) = self.neutral.get(&axis) else {
                return Err(ConfigError::MissingAxis {
                    field: "neutral",
                    axis,
                });
            };
            check_unit(&format!("neutral.{axis}"), *v, 0.0, 1.0, "[0, 1]")?;
        }
        self.rhythm.validate()
    }

    /// The neutral attractor as a target.
    pub fn neutral_target(&self) -> TargetState {
        self.neutral
            .iter()
            .fold(TargetState::new(), |t, (axis, v)| t.with(*axis, *v))
    }

    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.tick_ms)
    }
}

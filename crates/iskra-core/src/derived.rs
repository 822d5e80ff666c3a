//! Secondary indices computed from a single snapshot. Stateless.

use serde::{Deserialize, Serialize};

use crate::constants::DERIVED_EPSILON;
use crate::metrics::{MetricsState, clamp};

/// Alignment of clarity and trust, reduced by drift. The only derived value
/// stored back into the live state.
pub fn mirror_sync(m: &MetricsState) -> f64 {
    clamp((m.clarity + m.trust) / 2.0 - m.drift, 0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub mirror_sync: f64,
    pub trust_seal: f64,
    /// In [-1, 1]; negative when pain outweighs clarity.
    pub clarity_pain_index: f64,
    /// clarity × flow / comfort, with flow = rhythm/100 and comfort = 1 - pain.
    pub integrity: f64,
    pub resonance: f64,
    /// integrity × resonance.
    pub fractality: f64,
}

impl DerivedMetrics {
    pub fn compute(m: &MetricsState) -> Self {
        let trust_seal = clamp(m.trust * (1.0 - m.drift), 0.0, 1.0);
        let clarity_pain_index = clamp(m.clarity - m.pain, -1.0, 1.0);
        let integrity = m.clarity * m.rhythm_unit() / (1.0 - m.pain + DERIVED_EPSILON);
        let resonance = (m.trust * m.pain) / (m.drift + DERIVED_EPSILON);

        Self {
            mirror_sync: mirror_sync(m),
            trust_seal,
            clarity_pain_index,
            integrity,
            resonance,
            fractality: integrity * resonance,
        }
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricsState;

/// Discrete label derived from a snapshot. Carries no state of its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Clarity,
    Darkness,
    Transition,
    Echo,
    Silence,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Clarity => "CLARITY",
            Phase::Darkness => "DARKNESS",
            Phase::Transition => "TRANSITION",
            Phase::Echo => "ECHO",
            Phase::Silence => "SILENCE",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Phase::Clarity => "Structure. Understanding. Transparency.",
            Phase::Darkness => "Pain. Primordial chaos. Depth.",
            Phase::Transition => "Threshold. Uncertainty. Shift.",
            Phase::Echo => "Resonance. Repetition. Fading.",
            Phase::Silence => "Holding. Pause. Gravitas.",
        }
    }

    /// Classify a snapshot. Rules are evaluated in order and the first match
    /// wins; they overlap, so the order is part of the contract.
    pub fn classify(m: &MetricsState) -> Phase {
        if m.pain > 0.7 || (m.chaos > 0.6 && m.clarity < 0.4) {
            return Phase::Darkness;
        }
        if m.chaos > 0.7 {
            return Phase::Transition;
        }
        if m.drift > 0.6 {
            return Phase::Echo;
        }
        if m.trust < 0.5 {
            return Phase::Silence;
        }
        if m.clarity > 0.8 && m.trust > 0.8 && m.pain < 0.2 {
            return Phase::Clarity;
        }
        // softer versions of the chaos/drift rules
        if m.chaos > 0.5 {
            return Phase::Transition;
        }
        if m.drift > 0.4 {
            return Phase::Echo;
        }
        Phase::Clarity
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

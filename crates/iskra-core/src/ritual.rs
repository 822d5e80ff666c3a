//! Named interventions that jolt the live state and install a new target.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::{Axis, MetricsPatch, TargetState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ritual {
    /// Break an echo loop: an immediate shock toward TRANSITION, then a
    /// settled mid-range target.
    Shatter,
    /// End of onboarding: no shock, a bright target.
    Awaken,
}

impl Ritual {
    pub const ALL: [Ritual; 2] = [Ritual::Shatter, Ritual::Awaken];

    pub fn name(self) -> &'static str {
        match self {
            Ritual::Shatter => "shatter",
            Ritual::Awaken => "awaken",
        }
    }

    pub fn from_name(name: &str) -> Option<Ritual> {
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Fields overwritten on the live snapshot.
    pub fn patch(self) -> MetricsPatch {
        match self {
            Ritual::Shatter => MetricsPatch::new()
                .with(Axis::Chaos, 0.8)
                .with(Axis::Clarity, 0.4)
                .with(Axis::Pain, 0.5),
            Ritual::Awaken => MetricsPatch::new(),
        }
    }

    /// Replacement target.
    pub fn target(self) -> TargetState {
        match self {
            Ritual::Shatter => TargetState::new()
                .with_rhythm(50.0)
                .with(Axis::Trust, 0.6)
                .with(Axis::Clarity, 0.5)
                .with(Axis::Pain, 0.4)
                .with(Axis::Drift, 0.5)
                .with(Axis::Chaos, 0.6)
                .with(Axis::Echo, 0.2),
            Ritual::Awaken => TargetState::new()
                .with(Axis::Trust, 0.9)
                .with(Axis::Clarity, 0.9)
                .with_rhythm(100.0),
        }
    }
}

impl fmt::Display for Ritual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricsState;
    use crate::phase::Phase;

    #[test]
    fn test_from_name() {
        assert_eq!(Ritual::from_name("shatter"), Some(Ritual::Shatter));
        assert_eq!(Ritual::from_name(" Awaken "), Some(Ritual::Awaken));
        assert_eq!(Ritual::from_name("phoenix"), None);
    }

    #[test]
    fn test_shatter_shock_lands_in_turbulent_phase() {
        let mut s = MetricsState::default();
        Ritual::Shatter.patch().apply(&mut s);
        assert_eq!(s.chaos, 0.8);
        assert_eq!(Phase::classify(&s), Phase::Transition);
    }

    #[test]
    fn test_awaken_has_no_shock() {
        assert!(Ritual::Awaken.patch().is_empty());
        assert_eq!(Ritual::Awaken.target().rhythm(), Some(100.0));
    }
}

//! Iskra affective-state simulation engine.
//!
//! Converts free-text input into a smoothed multi-dimensional emotional and
//! rhythm state: a keyword lexicon scores text into per-axis targets, a
//! fixed-period tick interpolates the live state toward them with bounded
//! noise, a ∆-rhythm index and secondary indices are derived from each
//! snapshot, and an ordered rule list maps the snapshot to a discrete phase.
//!
//! Zero I/O: pure computation with no opinions about scheduling, transport
//! or persistence. Randomness is injected by the caller.

pub mod config;
pub mod constants;
pub mod derived;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod metrics;
pub mod phase;
pub mod rhythm;
pub mod ritual;
pub mod scorer;

pub use config::EngineConfig;
pub use derived::{DerivedMetrics, mirror_sync};
pub use engine::{EngineReport, StateEngine, TickOutcome};
pub use error::{ConfigError, Result};
pub use lexicon::{AxisLexicon, Lexicon, Pattern, Signal};
pub use metrics::{Axis, AxisScores, EmaPair, MetricsPatch, MetricsState, TargetState, clamp};
pub use phase::Phase;
pub use rhythm::{EmaConfig, PenaltyConfig, RhythmConfig, compute_rhythm};
pub use ritual::Ritual;
pub use scorer::{score, score_builtin};

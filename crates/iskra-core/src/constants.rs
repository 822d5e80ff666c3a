/// Tick period of the convergence loop in milliseconds.
pub const TICK_MS: u64 = 200;

/// Interpolation factor λ: fraction of the remaining distance covered per tick.
pub const LERP: f64 = 0.1;

/// Noise magnitude n: each axis receives uniform noise in [-n/2, +n/2] per tick.
pub const NOISE: f64 = 0.01;

/// Convergence tolerance: a targeted axis is settled once |value - target| < TOLERANCE.
pub const TOLERANCE: f64 = 0.02;

/// Upper bound of the per-tick `interrupt` resample range.
pub const INTERRUPT_MAX: f64 = 0.2;

/// Upper bound of the per-tick `ctx_switch` resample range.
pub const CTX_SWITCH_MAX: f64 = 0.3;

/// Guard added to denominators of the derived indices (integrity, resonance).
pub const DERIVED_EPSILON: f64 = 0.1;

/// Rhythm base-score weights: [trust, clarity, 1-pain, 1-drift, 1-chaos].
pub const RHYTHM_WEIGHTS: [f64; 5] = [0.35, 0.25, 0.15, 0.12, 0.13];

/// Hard cap on the rhythm turbulence penalty.
pub const PENALTY_MAX: f64 = 0.40;

/// Penalty multiplier for a chaos increase over its EMA.
pub const PENALTY_G_CHAOS: f64 = 0.5;

/// Penalty multiplier for a drift increase over its EMA.
pub const PENALTY_G_DRIFT: f64 = 0.3;

/// Penalty multiplier for the interrupt signal.
pub const PENALTY_INTERRUPT: f64 = 0.1;

/// Penalty multiplier for the context-switch signal.
pub const PENALTY_CONTEXT: f64 = 0.1;

/// Smoothing factor α for the rhythm index.
pub const RHYTHM_ALPHA: f64 = 0.35;

/// Smoothing factor β for the chaos/drift EMAs.
pub const EMA_BETA: f64 = 0.30;

/// Version tag of the rhythm calibration.
pub const RHYTHM_VERSION: &str = "1.1.0";

/// Tolerance when checking that the rhythm weights sum to one.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

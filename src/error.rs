//! Input validation errors.
//!
//! Every caller-contract violation is detected once, at engine
//! construction, and surfaced as [`InputError`]. Downstream stages assume
//! validated input. Degenerate numerics (no suprathreshold samples,
//! all-equal data, an empty statistic trace) are normal results and never
//! produce an error.
use thiserror::Error;

/// A caller-contract violation, rejected before any computation runs.
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    /// The engine compares exactly two conditions.
    #[error("expected exactly 2 condition arrays, got {0}")]
    ConditionCount(usize),

    /// Condition arrays need a trailing trial axis:
    /// (samples, trials) or (samples, channels, trials).
    #[error("condition array has {0} dimension(s); need at least 2 (…, trials)")]
    MissingTrialAxis(usize),

    /// A condition without trials cannot be compared.
    #[error("condition {0} has an empty trial axis")]
    NoTrials(usize),

    /// Sample/channel shape must agree between conditions; only the trial
    /// counts may differ.
    #[error("condition shapes disagree outside the trial axis: {a:?} vs {b:?}")]
    ShapeMismatch { a: Vec<usize>, b: Vec<usize> },

    /// The null distribution needs at least one surrogate.
    #[error("num_surrogates must be at least 1")]
    NoSurrogates,
}

//! Error types for grammar growth and tube interpretation.

use thiserror::Error;

/// Errors that can occur while growing a grammar or building a tube mesh.
///
/// Every error is local to the `grow`/`build` call that raised it; no state
/// survives between calls, so retrying the same input fails the same way.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ArborError {
    /// An iteration count below zero was requested.
    #[error("iteration count must be non-negative, got {0}")]
    NegativeIterations(i64),

    /// Growth produced a string longer than the caller's cap.
    #[error("growth exceeded {limit} symbols at iteration {iteration} (length {len})")]
    GrowthBudgetExceeded {
        /// The 1-based iteration that crossed the cap.
        iteration: u32,
        /// Length of the string produced by that iteration.
        len: usize,
        /// The cap supplied by the caller.
        limit: usize,
    },

    /// A `]` was reached while the branch stack was empty.
    #[error("unbalanced branch: `]` at symbol {index} has no matching `[`")]
    StackUnderflow {
        /// Index of the offending symbol in the interpreted sequence.
        index: usize,
    },

    /// A `[` would push the branch stack past its configured depth.
    #[error("branch depth limit {limit} exceeded at symbol {index}")]
    StackOverflow {
        /// Index of the offending symbol in the interpreted sequence.
        index: usize,
        /// The configured maximum depth.
        limit: usize,
    },

    /// An iteration count too large to run.
    #[error("iteration count {0} exceeds u32::MAX")]
    TooManyIterations(i64),

    /// The starting orientation is not a usable rotation.
    #[error("initial rotation must be finite and non-zero, got {0:?}")]
    DegenerateRotation([f32; 4]),

    /// A ring needs at least three sides to enclose anything.
    #[error("tube cross-section needs at least 3 sides, got {0}")]
    TooFewSides(usize),

    /// A growth parameter is NaN or infinite.
    #[error("growth parameter `{name}` must be finite, got {value}")]
    NonFiniteParameter {
        /// Field name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The mesh has more vertices than a `u32` index can address.
    #[error("vertex count {0} does not fit in a 32-bit index buffer")]
    IndexOverflow(usize),
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, ArborError>;

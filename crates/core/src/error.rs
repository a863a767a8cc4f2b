//! Error types for the reaction-diffusion engine.

use thiserror::Error;

/// Errors produced by engine operations.
///
/// Out-of-domain parameter values never produce an error; they are clamped
/// where they are stored. Errors are reserved for configuration failures and
/// lookups by name.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Resolution was zero or its square overflowed `usize`.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The grid buffers for the requested resolution could not be allocated.
    #[error("failed to allocate grid buffers at resolution {resolution}x{resolution}")]
    AllocationFailed { resolution: usize },

    /// Two fields had incompatible dimensions for an element-wise operation.
    #[error("dimension mismatch: ({lhs_w}, {lhs_h}) vs ({rhs_w}, {rhs_h})")]
    DimensionMismatch {
        lhs_w: usize,
        lhs_h: usize,
        rhs_w: usize,
        rhs_h: usize,
    },

    /// A kinetics model name was not recognized.
    #[error("unknown model: {0}")]
    UnknownModel(String),

    /// A journey name was not recognized.
    #[error("unknown journey: {0}")]
    UnknownJourney(String),

    /// A seed pattern name was not recognized.
    #[error("unknown seed pattern: {0}")]
    UnknownPattern(String),

    /// A preset name did not exist in the given model's table.
    #[error("unknown preset '{name}' for model {model}")]
    UnknownPreset { model: String, name: String },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// An I/O failure in a collaborator (snapshot writing).
    #[error("i/o error: {0}")]
    Io(String),
}

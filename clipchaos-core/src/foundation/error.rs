use std::path::PathBuf;

/// Convenience result type used across clipchaos.
pub type ChaosResult<T> = Result<T, ChaosError>;

/// Top-level error taxonomy.
///
/// Configuration *warnings* (ignored overrides, unknown keys) are not errors:
/// they are returned as values by the resolver and logged, never raised.
#[derive(thiserror::Error, Debug)]
pub enum ChaosError {
    /// Invalid caller-provided input (paths, plan limits misuse).
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed settings document (unparseable JSON, wrong root type).
    #[error("configuration error: {0}")]
    Config(String),

    /// Corrupt settings or limits discovered while planning a chain.
    #[error("planning failure: {0}")]
    Planning(String),

    /// External tool failed for one step: non-zero exit, missing or empty
    /// declared output, or an unspawnable binary.
    #[error("execution failure in step {step} ({effect}): {detail}")]
    Execution {
        /// Zero-based index of the failed step within the plan.
        step: usize,
        /// Identifier and chosen level of the failed effect.
        effect: String,
        /// Underlying subprocess error text.
        detail: String,
    },

    /// An overlay/SFX asset referenced by a step does not exist.
    #[error("missing asset for {effect}: '{}'", .path.display())]
    AssetMissing {
        /// Identifier of the effect that referenced the asset.
        effect: String,
        /// The asset path that was looked up.
        path: PathBuf,
    },

    /// Frame extraction failed (malformed media or unavailable codec).
    #[error("decode failure: {0}")]
    Decode(String),

    /// Frame reassembly or finalize re-encode failed.
    #[error("encode failure: {0}")]
    Encode(String),

    /// A step's subprocess exceeded the configured per-step timeout.
    #[error("step {step} ({effect}) timed out after {secs}s")]
    Timeout {
        /// Zero-based index of the timed-out step.
        step: usize,
        /// Identifier and chosen level of the timed-out effect.
        effect: String,
        /// The timeout that was exceeded, in seconds.
        secs: u64,
    },

    /// The run's cancellation token was triggered between steps.
    #[error("run cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChaosError {
    /// Build a [`ChaosError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChaosError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ChaosError::Planning`] value.
    pub fn planning(msg: impl Into<String>) -> Self {
        Self::Planning(msg.into())
    }

    /// Build a [`ChaosError::Execution`] value.
    pub fn execution(step: usize, effect: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Execution {
            step,
            effect: effect.into(),
            detail: detail.into(),
        }
    }

    /// Build a [`ChaosError::AssetMissing`] value.
    pub fn asset_missing(effect: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::AssetMissing {
            effect: effect.into(),
            path: path.into(),
        }
    }

    /// Build a [`ChaosError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`ChaosError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

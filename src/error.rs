use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse simulation config JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Invalid simulation config: {0}")]
    ConfigError(#[from] ConfigError),

    /// The simulation's own bookkeeping is broken, e.g. a bandwidth release overflowing its pool.
    #[error("Simulation invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Failed to write report: {0}")]
    ReportError(#[from] csv::Error),
}

/// Errors detected while turning the configuration document into a runnable simulation.
/// All of them are reported before any simulation state exists.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("Missing '{0}' section in config.")]
    MissingSection(String),

    #[error("Unknown distribution '{0}'")]
    UnknownDistribution(String),

    #[error("Distribution '{name}' expects {expected} parameter(s), got {got}")]
    DistributionArity { name: String, expected: String, got: usize },

    #[error("Invalid parameters for distribution '{name}': {reason}")]
    InvalidDistribution { name: String, reason: String },

    #[error("Weights of '{section}' must sum to 1, got {sum}")]
    InvalidWeights { section: String, sum: f64 },

    #[error("Base station {base_station} has no capacity ratio for slice '{slice}'")]
    MissingSliceRatio { base_station: usize, slice: String },

    #[error("Base station {base_station} references unknown slice '{slice}' in its ratios")]
    UnknownSliceRatio { base_station: usize, slice: String },

    #[error("Slice ratios of base station {base_station} sum to {sum}, which exceeds its capacity")]
    SliceRatiosExceedCapacity { base_station: usize, sum: f64 },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

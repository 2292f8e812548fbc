use thiserror::Error;

/// Error type for invalid sizing inputs.
///
/// Validation failures are raised before any formula evaluation; the
/// computation never proceeds on partial data. Engineering outcomes that are
/// merely suboptimal (incompatible pairings, out-of-band power ratios,
/// non-compliant devices) are returned as data in the result, never as
/// errors.
#[derive(Error, Debug)]
pub enum DesignError {
    #[error("{field} must be a positive value, got {value}")]
    NonPositiveValue { field: &'static str, value: f64 },
    #[error("{field} must be a finite number")]
    NonFiniteValue { field: &'static str },
    #[error("{field} range is inverted: min {min} is not below max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("failed to parse equipment catalog: {0}")]
    Catalog(#[from] toml::de::Error),
    #[error("no {kind} named {model:?} in the catalog")]
    UnknownEquipment { kind: &'static str, model: String },
}

/// Convenience type for `Result<T, DesignError>`.
pub type DesignResult<T> = Result<T, DesignError>;

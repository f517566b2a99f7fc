//! Error taxonomy for the statutory engine
//!
//! Three failure classes matter to callers: bad reference tables (caught at
//! load time), structurally inconsistent tax profiles, and invalid monetary
//! inputs. A calculation either produces a complete result or fails as a
//! whole; no variant is ever folded into a zero amount.

use thiserror::Error;

/// Errors produced by table loading, profile resolution, and calculation
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or incomplete wage-band / tax-bracket table, or no table
    /// version in force for a requested date. Detected at load time.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Structurally inconsistent tax profile (e.g. KB without a resolved
    /// spouse flag, child counts that cannot add up).
    #[error("invalid tax profile: {0}")]
    InvalidProfile(String),

    /// Negative gross salary or YTD amount, month outside 1-12, EPF rates
    /// outside [0, 1].
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::Configuration("tier table is empty".to_string());
        assert_eq!(err.to_string(), "configuration error: tier table is empty");

        let err = EngineError::InvalidInput("month must be 1-12, got 13".to_string());
        assert!(err.to_string().contains("month must be 1-12"));
    }
}

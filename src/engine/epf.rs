//! EPF contribution calculator
//!
//! Percentage-based with a salary-threshold switch on the employer side:
//! 13% at or below RM5,000, 12% above. Rates are configurable per employer;
//! the defaults are the statutory standard rates.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::money::round2;
use crate::tables::Contribution;

/// EPF contribution rates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EpfRates {
    /// Employee share of gross salary
    pub employee_rate: f64,

    /// Employer share when gross salary is at or below the threshold
    pub employer_rate_below_threshold: f64,

    /// Employer share when gross salary is above the threshold
    pub employer_rate_above_threshold: f64,

    /// Salary threshold for the employer rate switch, inclusive on the
    /// lower (higher-rate) side
    pub salary_threshold: f64,
}

impl Default for EpfRates {
    fn default() -> Self {
        Self {
            employee_rate: 0.11,
            employer_rate_below_threshold: 0.13,
            employer_rate_above_threshold: 0.12,
            salary_threshold: 5_000.0,
        }
    }
}

impl EpfRates {
    /// Check rates are within [0, 1] and the threshold is non-negative.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, rate) in [
            ("employee_rate", self.employee_rate),
            ("employer_rate_below_threshold", self.employer_rate_below_threshold),
            ("employer_rate_above_threshold", self.employer_rate_above_threshold),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                return Err(EngineError::InvalidInput(format!(
                    "EPF {} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }
        if self.salary_threshold < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "EPF salary threshold must be non-negative, got {}",
                self.salary_threshold
            )));
        }
        Ok(())
    }
}

/// Compute EPF contributions for a gross monthly salary.
///
/// Zero or negative gross yields zero contributions; amounts round half-up
/// to the cent.
pub fn compute_epf(gross_salary: f64, rates: &EpfRates) -> Contribution {
    if gross_salary <= 0.0 {
        return Contribution::zero();
    }

    let employer_rate = if gross_salary <= rates.salary_threshold {
        rates.employer_rate_below_threshold
    } else {
        rates.employer_rate_above_threshold
    };

    Contribution {
        employee: round2(gross_salary * rates.employee_rate),
        employer: round2(gross_salary * employer_rate),
    }
}

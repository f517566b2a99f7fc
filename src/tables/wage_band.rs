//! Generic wage-band tier lookup shared by SOCSO and EIS
//!
//! A schedule is an ordered sequence of contiguous tiers; the final tier is
//! open-ended and carries the capped amounts for every wage at or above the
//! ceiling. Validation happens once at construction so `lookup` is total
//! for any non-negative wage and can never fail mid-payroll.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// An employee/employer contribution amount pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub employee: f64,
    pub employer: f64,
}

impl Contribution {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// A single wage band with fixed contribution amounts
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WageBandTier {
    /// Lower wage bound, inclusive
    pub lower: f64,

    /// Upper wage bound, exclusive. `None` marks the open-ended top tier.
    pub upper: Option<f64>,

    /// Employee contribution for wages in this band
    pub employee: f64,

    /// Employer contribution for wages in this band
    pub employer: f64,
}

/// A validated, versioned contribution schedule
#[derive(Debug, Clone)]
pub struct WageBandTable {
    name: String,
    effective_from: NaiveDate,
    tiers: Vec<WageBandTier>,
}

impl WageBandTable {
    /// Build a table from tiers, validating the sequence.
    ///
    /// The sequence must be non-empty, start at wage 0, be contiguous and
    /// non-overlapping, end with exactly one open-ended tier, and carry
    /// non-negative amounts. Any violation is a configuration error.
    pub fn from_tiers(
        name: &str,
        effective_from: NaiveDate,
        tiers: Vec<WageBandTier>,
    ) -> Result<Self, EngineError> {
        let table = Self {
            name: name.to_string(),
            effective_from,
            tiers,
        };
        table.validate()?;
        Ok(table)
    }

    /// Internal constructor for compiled-in schedules; validity is asserted
    /// by the schedule modules' tests rather than re-checked per process.
    pub(crate) fn from_builtin(
        name: &str,
        effective_from: NaiveDate,
        tiers: Vec<WageBandTier>,
    ) -> Self {
        Self {
            name: name.to_string(),
            effective_from,
            tiers,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.tiers.is_empty() {
            return Err(EngineError::Configuration(format!(
                "{}: tier table is empty",
                self.name
            )));
        }

        let first = &self.tiers[0];
        if first.lower != 0.0 {
            return Err(EngineError::Configuration(format!(
                "{}: first tier must start at 0, starts at {}",
                self.name, first.lower
            )));
        }

        for (i, pair) in self.tiers.windows(2).enumerate() {
            let (cur, next) = (&pair[0], &pair[1]);
            match cur.upper {
                None => {
                    return Err(EngineError::Configuration(format!(
                        "{}: tier {} is open-ended but not last",
                        self.name, i
                    )));
                }
                Some(upper) => {
                    if upper <= cur.lower {
                        return Err(EngineError::Configuration(format!(
                            "{}: tier {} has non-positive width [{}, {})",
                            self.name, i, cur.lower, upper
                        )));
                    }
                    if (next.lower - upper).abs() > 1e-9 {
                        return Err(EngineError::Configuration(format!(
                            "{}: gap between tier {} ending {} and tier {} starting {}",
                            self.name,
                            i,
                            upper,
                            i + 1,
                            next.lower
                        )));
                    }
                }
            }
        }

        if let Some(last) = self.tiers.last() {
            if last.upper.is_some() {
                return Err(EngineError::Configuration(format!(
                    "{}: final tier must be open-ended",
                    self.name
                )));
            }
        }

        for (i, tier) in self.tiers.iter().enumerate() {
            if tier.employee < 0.0 || tier.employer < 0.0 {
                return Err(EngineError::Configuration(format!(
                    "{}: tier {} has a negative contribution amount",
                    self.name, i
                )));
            }
        }

        Ok(())
    }

    /// Look up the contribution amounts for a wage.
    ///
    /// Total over [0, inf): wages at or beyond the ceiling fall into the
    /// open-ended final tier and receive the capped amounts.
    pub fn lookup(&self, wage: f64) -> Contribution {
        for tier in &self.tiers {
            let in_band = match tier.upper {
                Some(upper) => wage >= tier.lower && wage < upper,
                None => wage >= tier.lower,
            };
            if in_band {
                return Contribution {
                    employee: tier.employee,
                    employer: tier.employer,
                };
            }
        }
        // Unreachable for wage >= 0 on a validated table; negative wages
        // are rejected upstream, but map them to the first band regardless
        // rather than panic.
        Contribution {
            employee: self.tiers[0].employee,
            employer: self.tiers[0].employer,
        }
    }

    /// Wage ceiling: the lower bound of the open-ended top tier.
    pub fn ceiling(&self) -> f64 {
        self.tiers.last().map(|t| t.lower).unwrap_or(0.0)
    }

    /// Date from which this version of the schedule applies
    pub fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    /// Schedule name (for diagnostics)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of tiers
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Run the construction-time validation (used by schedule module tests)
    #[cfg(test)]
    pub(crate) fn assert_valid(&self) {
        self.validate().expect("built-in schedule failed validation");
    }
}

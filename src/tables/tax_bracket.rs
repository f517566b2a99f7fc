//! Progressive tax bracket schedules for the monthly deduction formula
//!
//! Each bracket carries its lower bound, the marginal rate above that bound,
//! and the cumulative tax accrued at the bound. Two assessment-year versions
//! ship; like the contribution schedules they are selected by effective date
//! so historical periods recompute with the schedule then in force.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use super::ymd;

/// One bracket of the progressive schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Chargeable income at which this bracket starts
    pub lower_bound: f64,

    /// Marginal rate applied above the lower bound, in percent
    pub rate_pct: f64,

    /// Cumulative tax on income exactly at the lower bound
    pub cumulative_tax: f64,
}

/// A validated, versioned bracket schedule
#[derive(Debug, Clone)]
pub struct TaxBracketTable {
    effective_from: NaiveDate,
    brackets: Vec<TaxBracket>,
}

impl TaxBracketTable {
    /// Build a table from brackets, validating the sequence: non-empty,
    /// starting at 0, strictly increasing, non-negative rates and amounts.
    pub fn from_brackets(
        effective_from: NaiveDate,
        brackets: Vec<TaxBracket>,
    ) -> Result<Self, EngineError> {
        let table = Self {
            effective_from,
            brackets,
        };
        table.validate()?;
        Ok(table)
    }

    pub(crate) fn from_builtin(effective_from: NaiveDate, brackets: Vec<TaxBracket>) -> Self {
        Self {
            effective_from,
            brackets,
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.brackets.is_empty() {
            return Err(EngineError::Configuration(
                "tax bracket table is empty".to_string(),
            ));
        }
        if self.brackets[0].lower_bound != 0.0 {
            return Err(EngineError::Configuration(format!(
                "tax brackets must start at 0, start at {}",
                self.brackets[0].lower_bound
            )));
        }
        for pair in self.brackets.windows(2) {
            if pair[1].lower_bound <= pair[0].lower_bound {
                return Err(EngineError::Configuration(format!(
                    "tax bracket bounds must be strictly increasing ({} then {})",
                    pair[0].lower_bound, pair[1].lower_bound
                )));
            }
            if pair[1].cumulative_tax < pair[0].cumulative_tax {
                return Err(EngineError::Configuration(
                    "cumulative tax must be non-decreasing".to_string(),
                ));
            }
        }
        for bracket in &self.brackets {
            if bracket.rate_pct < 0.0 || bracket.cumulative_tax < 0.0 {
                return Err(EngineError::Configuration(format!(
                    "negative rate or cumulative tax at bound {}",
                    bracket.lower_bound
                )));
            }
        }
        Ok(())
    }

    /// Bracket for a chargeable income: the one with the largest lower bound
    /// not exceeding it.
    pub fn lookup(&self, chargeable_income: f64) -> &TaxBracket {
        self.brackets
            .iter()
            .rev()
            .find(|b| b.lower_bound <= chargeable_income)
            .unwrap_or(&self.brackets[0])
    }

    pub fn effective_from(&self) -> NaiveDate {
        self.effective_from
    }

    pub fn bracket_count(&self) -> usize {
        self.brackets.len()
    }

    #[cfg(test)]
    pub(crate) fn assert_valid(&self) {
        self.validate().expect("built-in schedule failed validation");
    }
}

/// Assessment year 2023 onwards (current), effective 2023-01-01
pub fn ya_2023() -> TaxBracketTable {
    TaxBracketTable::from_builtin(
        ymd(2023, 1, 1),
        vec![
            TaxBracket { lower_bound: 0.0, rate_pct: 0.0, cumulative_tax: 0.0 },
            TaxBracket { lower_bound: 5_000.0, rate_pct: 1.0, cumulative_tax: 0.0 },
            TaxBracket { lower_bound: 20_000.0, rate_pct: 3.0, cumulative_tax: 150.0 },
            TaxBracket { lower_bound: 35_000.0, rate_pct: 6.0, cumulative_tax: 600.0 },
            TaxBracket { lower_bound: 50_000.0, rate_pct: 11.0, cumulative_tax: 1_500.0 },
            TaxBracket { lower_bound: 70_000.0, rate_pct: 19.0, cumulative_tax: 3_700.0 },
            TaxBracket { lower_bound: 100_000.0, rate_pct: 25.0, cumulative_tax: 9_400.0 },
            TaxBracket { lower_bound: 400_000.0, rate_pct: 26.0, cumulative_tax: 84_400.0 },
            TaxBracket { lower_bound: 600_000.0, rate_pct: 28.0, cumulative_tax: 136_400.0 },
            TaxBracket { lower_bound: 2_000_000.0, rate_pct: 30.0, cumulative_tax: 528_400.0 },
        ],
    )
}

/// Assessment years 2021-2022 (legacy), effective 2021-01-01
pub fn ya_2021() -> TaxBracketTable {
    TaxBracketTable::from_builtin(
        ymd(2021, 1, 1),
        vec![
            TaxBracket { lower_bound: 0.0, rate_pct: 0.0, cumulative_tax: 0.0 },
            TaxBracket { lower_bound: 5_000.0, rate_pct: 1.0, cumulative_tax: 0.0 },
            TaxBracket { lower_bound: 20_000.0, rate_pct: 3.0, cumulative_tax: 150.0 },
            TaxBracket { lower_bound: 35_000.0, rate_pct: 8.0, cumulative_tax: 600.0 },
            TaxBracket { lower_bound: 50_000.0, rate_pct: 13.0, cumulative_tax: 1_800.0 },
            TaxBracket { lower_bound: 70_000.0, rate_pct: 21.0, cumulative_tax: 4_400.0 },
            TaxBracket { lower_bound: 100_000.0, rate_pct: 24.0, cumulative_tax: 10_700.0 },
            TaxBracket { lower_bound: 250_000.0, rate_pct: 24.5, cumulative_tax: 46_700.0 },
            TaxBracket { lower_bound: 400_000.0, rate_pct: 25.0, cumulative_tax: 83_450.0 },
            TaxBracket { lower_bound: 600_000.0, rate_pct: 26.0, cumulative_tax: 133_450.0 },
            TaxBracket { lower_bound: 1_000_000.0, rate_pct: 28.0, cumulative_tax: 237_450.0 },
            TaxBracket { lower_bound: 2_000_000.0, rate_pct: 30.0, cumulative_tax: 517_450.0 },
        ],
    )
}

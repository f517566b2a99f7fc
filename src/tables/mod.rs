//! Statutory reference tables: contribution schedules and tax brackets
//!
//! Tables are versioned by effective date. A payroll run for a historical
//! period selects the versions in force for that period, so recalculation
//! reproduces period-correct amounts after a schedule change (e.g. the
//! October 2024 SOCSO/EIS ceiling move from RM5,000 to RM6,000).

pub mod eis;
pub mod loader;
pub mod socso;
mod tax_bracket;
mod wage_band;

pub use tax_bracket::{TaxBracket, TaxBracketTable};
pub use wage_band::{Contribution, WageBandTable, WageBandTier};

use chrono::NaiveDate;
use log::debug;

use crate::error::EngineError;

/// Calendar date for compiled-in schedule constants.
pub(crate) fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date constant")
}

/// The full set of reference tables one calculation needs
#[derive(Debug, Clone)]
pub struct StatutoryTables {
    pub socso: WageBandTable,
    pub eis: WageBandTable,
    pub tax_brackets: TaxBracketTable,
}

impl StatutoryTables {
    /// Tables in force today: RM6,000 contribution ceiling, YA2023 brackets
    pub fn current() -> Self {
        Self {
            socso: socso::current(),
            eis: eis::current(),
            tax_brackets: tax_bracket::ya_2023(),
        }
    }

    /// Pre-October-2024 tables: RM5,000 ceiling; brackets stay YA2023
    pub fn legacy() -> Self {
        Self {
            socso: socso::legacy(),
            eis: eis::legacy(),
            tax_brackets: tax_bracket::ya_2023(),
        }
    }

    /// Tables in force on a given pay-period date
    pub fn for_period(date: NaiveDate) -> Result<Self, EngineError> {
        TableRegistry::standard().for_date(date)
    }
}

/// Version store resolving tables by effective date
///
/// Versions are held sorted ascending by effective date; `for_date` picks
/// the latest version effective on or before the requested date. Custom
/// versions (e.g. loaded from reference-data CSV) can be registered on top
/// of the standard set.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    socso_versions: Vec<WageBandTable>,
    eis_versions: Vec<WageBandTable>,
    bracket_versions: Vec<TaxBracketTable>,
}

impl TableRegistry {
    /// Empty registry; versions must be registered before use
    pub fn new() -> Self {
        Self {
            socso_versions: Vec::new(),
            eis_versions: Vec::new(),
            bracket_versions: Vec::new(),
        }
    }

    /// Registry pre-loaded with the compiled-in schedule versions
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register_socso(socso::legacy());
        registry.register_socso(socso::current());
        registry.register_eis(eis::legacy());
        registry.register_eis(eis::current());
        registry.register_brackets(tax_bracket::ya_2021());
        registry.register_brackets(tax_bracket::ya_2023());
        registry
    }

    pub fn register_socso(&mut self, table: WageBandTable) {
        Self::insert_by_date(&mut self.socso_versions, table, |t| t.effective_from());
    }

    pub fn register_eis(&mut self, table: WageBandTable) {
        Self::insert_by_date(&mut self.eis_versions, table, |t| t.effective_from());
    }

    pub fn register_brackets(&mut self, table: TaxBracketTable) {
        Self::insert_by_date(&mut self.bracket_versions, table, |t| t.effective_from());
    }

    fn insert_by_date<T>(versions: &mut Vec<T>, table: T, date_of: impl Fn(&T) -> NaiveDate) {
        let date = date_of(&table);
        let pos = versions
            .iter()
            .position(|t| date_of(t) > date)
            .unwrap_or(versions.len());
        versions.insert(pos, table);
    }

    /// Resolve the table set in force on `date`.
    ///
    /// A date earlier than every registered version is a configuration
    /// error; falling back silently would misstate historical deductions.
    pub fn for_date(&self, date: NaiveDate) -> Result<StatutoryTables, EngineError> {
        let socso = Self::pick(&self.socso_versions, date, |t| t.effective_from())
            .ok_or_else(|| no_version("SOCSO", date))?;
        let eis = Self::pick(&self.eis_versions, date, |t| t.effective_from())
            .ok_or_else(|| no_version("EIS", date))?;
        let tax_brackets = Self::pick(&self.bracket_versions, date, |t| t.effective_from())
            .ok_or_else(|| no_version("tax bracket", date))?;

        debug!(
            "tables for {}: socso={} eis={} brackets effective {}",
            date,
            socso.name(),
            eis.name(),
            tax_brackets.effective_from()
        );

        Ok(StatutoryTables {
            socso: socso.clone(),
            eis: eis.clone(),
            tax_brackets: tax_brackets.clone(),
        })
    }

    fn pick<T>(versions: &[T], date: NaiveDate, date_of: impl Fn(&T) -> NaiveDate) -> Option<&T> {
        versions.iter().rev().find(|t| date_of(t) <= date)
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

fn no_version(kind: &str, date: NaiveDate) -> EngineError {
    EngineError::Configuration(format!("no {} table version in force on {}", kind, date))
}

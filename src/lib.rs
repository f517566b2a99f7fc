//! Statutory Engine - Malaysian payroll deduction calculations
//!
//! This library provides:
//! - EPF contribution calculation with configurable rates
//! - SOCSO and EIS wage-band contribution lookups with versioned schedules
//! - PCB (monthly tax deduction) with self-correcting YTD projection
//! - Per-period aggregation across all four statutory components
//! - Effective-date table selection for historical recalculation

pub mod employee;
pub mod engine;
pub mod error;
pub mod money;
pub mod runner;
pub mod tables;

// Re-export commonly used types
pub use employee::{Employee, TaxProfile, TaxProfileInput};
pub use engine::{PeriodInput, StatutoryEngine, StatutoryResult, YtdSnapshot};
pub use error::EngineError;
pub use runner::PayrollRunner;
pub use tables::{StatutoryTables, TableRegistry};

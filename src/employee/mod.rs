//! Employee records and tax profiles

mod data;
pub mod loader;

pub use data::{Employee, ResidentStatus, TaxCategory, TaxProfile, TaxProfileInput};
pub use loader::{load_employees, load_employees_from_reader};

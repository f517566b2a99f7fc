//! CSV loaders for externally maintained reference tables
//!
//! Reference data lives outside the engine (statutory schedules change by
//! gazette, not by release). Loaded tables pass through the same validating
//! constructors as the compiled-in versions, so a malformed file fails at
//! load time and never reaches a payroll calculation.
//!
//! Wage-band CSV columns: Lower,Upper,Employee,Employer (empty Upper marks
//! the open-ended top tier). Tax-bracket CSV columns:
//! LowerBound,RatePct,CumulativeTax.

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use log::info;

use crate::error::EngineError;
use super::{TaxBracket, TaxBracketTable, WageBandTable, WageBandTier};

/// Load a wage-band contribution schedule from CSV.
pub fn load_wage_band_table(
    path: &Path,
    name: &str,
    effective_from: NaiveDate,
) -> Result<WageBandTable, EngineError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut tiers = Vec::new();
    for result in reader.records() {
        let record = result?;
        let lower = parse_field(&record, 0, name, "Lower")?;
        let upper = match record.get(1).map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_raw(raw, name, "Upper")?),
        };
        let employee = parse_field(&record, 2, name, "Employee")?;
        let employer = parse_field(&record, 3, name, "Employer")?;
        tiers.push(WageBandTier {
            lower,
            upper,
            employee,
            employer,
        });
    }

    let table = WageBandTable::from_tiers(name, effective_from, tiers)?;
    info!(
        "loaded wage-band table {} ({} tiers, effective {})",
        name,
        table.tier_count(),
        effective_from
    );
    Ok(table)
}

/// Load a tax bracket schedule from CSV.
pub fn load_tax_bracket_table(
    path: &Path,
    effective_from: NaiveDate,
) -> Result<TaxBracketTable, EngineError> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut brackets = Vec::new();
    for result in reader.records() {
        let record = result?;
        brackets.push(TaxBracket {
            lower_bound: parse_field(&record, 0, "tax brackets", "LowerBound")?,
            rate_pct: parse_field(&record, 1, "tax brackets", "RatePct")?,
            cumulative_tax: parse_field(&record, 2, "tax brackets", "CumulativeTax")?,
        });
    }

    let table = TaxBracketTable::from_brackets(effective_from, brackets)?;
    info!(
        "loaded tax bracket table ({} brackets, effective {})",
        table.bracket_count(),
        effective_from
    );
    Ok(table)
}

fn parse_field(
    record: &csv::StringRecord,
    index: usize,
    table: &str,
    column: &str,
) -> Result<f64, EngineError> {
    let raw = record.get(index).ok_or_else(|| {
        EngineError::Configuration(format!("{}: missing column {}", table, column))
    })?;
    parse_raw(raw, table, column)
}

fn parse_raw(raw: &str, table: &str, column: &str) -> Result<f64, EngineError> {
    raw.trim().parse::<f64>().map_err(|_| {
        EngineError::Configuration(format!(
            "{}: column {} has non-numeric value {:?}",
            table, column, raw
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_wage_band_csv() {
        let path = write_temp(
            "statutory_engine_wage_band_ok.csv",
            "Lower,Upper,Employee,Employer\n\
             0,100,0.50,1.75\n\
             100,200,0.75,2.60\n\
             200,,1.00,3.50\n",
        );

        let table = load_wage_band_table(&path, "test", ymd(2024, 10, 1)).unwrap();
        assert_eq!(table.tier_count(), 3);
        assert_eq!(table.lookup(150.0).employee, 0.75);
        assert_eq!(table.lookup(500.0).employer, 3.50);
    }

    #[test]
    fn test_gapped_csv_rejected_at_load() {
        let path = write_temp(
            "statutory_engine_wage_band_gap.csv",
            "Lower,Upper,Employee,Employer\n\
             0,100,0.50,1.75\n\
             150,,1.00,3.50\n",
        );

        let result = load_wage_band_table(&path, "gapped", ymd(2024, 10, 1));
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_non_numeric_rejected() {
        let path = write_temp(
            "statutory_engine_wage_band_bad.csv",
            "Lower,Upper,Employee,Employer\n\
             0,100,abc,1.75\n",
        );

        let result = load_wage_band_table(&path, "bad", ymd(2024, 10, 1));
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[test]
    fn test_load_tax_brackets_csv() {
        let path = write_temp(
            "statutory_engine_brackets_ok.csv",
            "LowerBound,RatePct,CumulativeTax\n\
             0,0,0\n\
             5000,1,0\n\
             20000,3,150\n",
        );

        let table = load_tax_bracket_table(&path, ymd(2023, 1, 1)).unwrap();
        assert_eq!(table.bracket_count(), 3);
        assert_eq!(table.lookup(21_000.0).rate_pct, 3.0);
    }
}

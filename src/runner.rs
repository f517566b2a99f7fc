//! Payroll runner for batch statutory calculations
//!
//! Pre-loads tables once, then computes many periods or employees without
//! re-selecting table versions. The full-year schedule rolls the YTD
//! snapshot forward month to month, which is exactly the sequencing a
//! payroll orchestration layer performs against persisted YTD.

use crate::employee::Employee;
use crate::engine::{
    ComponentToggles, EngineConfig, PeriodInput, StatutoryEngine, StatutoryResult, YtdSnapshot,
};
use crate::error::EngineError;
use crate::tables::StatutoryTables;

/// One computed month of a yearly schedule
#[derive(Debug, Clone)]
pub struct ScheduleRow {
    pub month: u32,
    pub result: StatutoryResult,
    /// YTD snapshot going into the next month
    pub ytd_after: YtdSnapshot,
}

/// Pre-loaded runner for batch statutory calculations
#[derive(Debug, Clone)]
pub struct PayrollRunner {
    tables: StatutoryTables,
    config: EngineConfig,
}

impl PayrollRunner {
    /// Runner over the current tables with default configuration
    pub fn new() -> Self {
        Self {
            tables: StatutoryTables::current(),
            config: EngineConfig::default(),
        }
    }

    /// Runner over a specific table set
    pub fn with_tables(tables: StatutoryTables) -> Self {
        Self {
            tables,
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn tables(&self) -> &StatutoryTables {
        &self.tables
    }

    /// Compute one employee's deductions for one period.
    ///
    /// Applies the age-gating policy on top of the configured toggles.
    pub fn run(
        &self,
        employee: &Employee,
        period: &PeriodInput,
        ytd: &YtdSnapshot,
    ) -> Result<StatutoryResult, EngineError> {
        let engine = StatutoryEngine::new(self.tables.clone(), self.config_for(employee));
        engine.calculate(period, &employee.profile, ytd)
    }

    /// Compute one period for a batch of employees, all starting from the
    /// given YTD snapshots (paired by index).
    pub fn run_batch(
        &self,
        employees: &[Employee],
        month: u32,
        snapshots: &[YtdSnapshot],
    ) -> Vec<Result<StatutoryResult, EngineError>> {
        employees
            .iter()
            .zip(snapshots.iter())
            .map(|(employee, ytd)| {
                let period = PeriodInput::monthly(employee.monthly_salary, month);
                self.run(employee, &period, ytd)
            })
            .collect()
    }

    /// Compute a full January-to-December schedule at the employee's
    /// monthly salary, rolling the YTD snapshot forward each month.
    pub fn run_year(&self, employee: &Employee) -> Result<Vec<ScheduleRow>, EngineError> {
        let mut rows = Vec::with_capacity(12);
        let mut ytd = YtdSnapshot::default();

        for month in 1..=12 {
            let period = PeriodInput::monthly(employee.monthly_salary, month);
            let result = self.run(employee, &period, &ytd)?;
            ytd = ytd.advanced_by(&period, &result);
            rows.push(ScheduleRow {
                month,
                result,
                ytd_after: ytd,
            });
        }

        Ok(rows)
    }

    fn config_for(&self, employee: &Employee) -> EngineConfig {
        let age_toggles = ComponentToggles::for_employee_age(employee.age);
        let configured = self.config.toggles;
        EngineConfig {
            toggles: ComponentToggles {
                has_epf: configured.has_epf && age_toggles.has_epf,
                has_socso: configured.has_socso && age_toggles.has_socso,
                has_eis: configured.has_eis && age_toggles.has_eis,
                has_pcb: configured.has_pcb && age_toggles.has_pcb,
            },
            epf_rates: self.config.epf_rates,
        }
    }
}

impl Default for PayrollRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::TaxProfile;
    use approx::assert_abs_diff_eq;

    fn employee(salary: f64, age: u8) -> Employee {
        Employee {
            employee_id: 1,
            age,
            monthly_salary: salary,
            profile: TaxProfile::single_resident(),
        }
    }

    #[test]
    fn test_run_year_rolls_ytd_forward() {
        let runner = PayrollRunner::new();
        let rows = runner.run_year(&employee(5_000.0, 35)).unwrap();
        assert_eq!(rows.len(), 12);

        let last = rows.last().unwrap();
        assert_abs_diff_eq!(last.ytd_after.gross_ytd, 60_000.0);

        let total_epf: f64 = rows.iter().map(|r| r.result.epf.employee).sum();
        assert_abs_diff_eq!(last.ytd_after.epf_ytd, total_epf, epsilon = 1e-9);
    }

    #[test]
    fn test_year_schedule_matches_independent_recomputation() {
        // Recomputing any month directly from the accumulated YTD must give
        // the same amount as the sequential schedule.
        let runner = PayrollRunner::new();
        let employee = employee(5_432.10, 40);
        let rows = runner.run_year(&employee).unwrap();

        let mut ytd = YtdSnapshot::default();
        for row in &rows {
            let period = PeriodInput::monthly(employee.monthly_salary, row.month);
            let direct = runner.run(&employee, &period, &ytd).unwrap();
            assert_abs_diff_eq!(direct.pcb, row.result.pcb, epsilon = 1e-9);
            assert_abs_diff_eq!(
                direct.total_employee_deduction,
                row.result.total_employee_deduction,
                epsilon = 1e-9
            );
            ytd = ytd.advanced_by(&period, &direct);
        }
    }

    #[test]
    fn test_year_of_deductions_reconciles_to_annual_liability() {
        // The self-correcting projection keeps the withheld total within
        // rounding distance of the December view of the annual liability.
        let runner = PayrollRunner::new();
        let rows = runner.run_year(&employee(5_000.0, 35)).unwrap();

        let withheld: f64 = rows.iter().map(|r| r.result.pcb).sum();
        // 12 months of 5-sen rounding can each add at most 5 sen.
        assert!((withheld - 1_320.0).abs() < 0.60, "withheld {}", withheld);
    }

    #[test]
    fn test_age_gating_applied_per_employee() {
        let runner = PayrollRunner::new();
        let period = PeriodInput::monthly(3_500.0, 1);
        let ytd = YtdSnapshot::default();

        let senior = runner.run(&employee(3_500.0, 61), &period, &ytd).unwrap();
        assert_eq!(senior.socso.employee, 0.0);
        assert_eq!(senior.eis.employee, 0.0);
        assert_abs_diff_eq!(senior.epf.employee, 385.0);

        let adult = runner.run(&employee(3_500.0, 30), &period, &ytd).unwrap();
        assert_abs_diff_eq!(adult.socso.employee, 17.25);
        assert_abs_diff_eq!(adult.eis.employee, 6.90);
    }

    #[test]
    fn test_run_batch_pairs_snapshots() {
        let runner = PayrollRunner::new();
        let employees = vec![employee(3_500.0, 30), employee(6_000.0, 45)];
        let snapshots = vec![YtdSnapshot::default(), YtdSnapshot::default()];

        let results = runner.run_batch(&employees, 1, &snapshots);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }
}

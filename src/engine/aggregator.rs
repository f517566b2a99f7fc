//! Statutory aggregator: one pay period, all four deductions
//!
//! Invokes the calculators in fixed order (EPF first, since PCB consumes
//! the EPF employee amount), sums the result, and leaves YTD roll-forward
//! to an explicit helper so period ordering stays the caller's
//! transactional concern. Identical inputs always produce identical
//! output; tables, profile and YTD are all passed in.

use serde::{Deserialize, Serialize};

use crate::employee::TaxProfile;
use crate::error::EngineError;
use crate::money::round2;
use crate::tables::{Contribution, StatutoryTables};
use super::epf::{compute_epf, EpfRates};
use super::pcb::{compute_pcb_detailed, PcbBreakdown};

/// Inputs describing the pay period being calculated
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodInput {
    /// Base gross salary for the period, excluding additional remuneration
    pub gross_salary: f64,

    /// Calendar month of the period, 1-12
    pub month: u32,

    /// Bonus / arrears paid in this period, taxed marginally
    pub additional_remuneration: f64,

    /// Per-call EPF rate override; `None` uses the engine's configured rates
    pub epf_rates: Option<EpfRates>,
}

impl PeriodInput {
    /// A plain salary period with no additional remuneration
    pub fn monthly(gross_salary: f64, month: u32) -> Self {
        Self {
            gross_salary,
            month,
            additional_remuneration: 0.0,
            epf_rates: None,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.gross_salary.is_finite() || self.gross_salary < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "gross salary must be non-negative, got {}",
                self.gross_salary
            )));
        }
        if !self.additional_remuneration.is_finite() || self.additional_remuneration < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "additional remuneration must be non-negative, got {}",
                self.additional_remuneration
            )));
        }
        if !(1..=12).contains(&self.month) {
            return Err(EngineError::InvalidInput(format!(
                "month must be 1-12, got {}",
                self.month
            )));
        }
        if let Some(rates) = &self.epf_rates {
            rates.validate()?;
        }
        Ok(())
    }
}

/// Year-to-date totals accumulated from the periods before this one
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct YtdSnapshot {
    pub gross_ytd: f64,
    pub epf_ytd: f64,
    pub pcb_deducted_ytd: f64,
    pub zakat_ytd: f64,
}

impl YtdSnapshot {
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("gross_ytd", self.gross_ytd),
            ("epf_ytd", self.epf_ytd),
            ("pcb_deducted_ytd", self.pcb_deducted_ytd),
            ("zakat_ytd", self.zakat_ytd),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Snapshot for the period after this result, with the period's gross
    /// (including additional remuneration), EPF employee contribution and
    /// PCB folded in. Zakat accumulates outside the engine.
    pub fn advanced_by(&self, period: &PeriodInput, result: &StatutoryResult) -> YtdSnapshot {
        YtdSnapshot {
            gross_ytd: self.gross_ytd + period.gross_salary + period.additional_remuneration,
            epf_ytd: self.epf_ytd + result.epf.employee,
            pcb_deducted_ytd: self.pcb_deducted_ytd + result.pcb,
            zakat_ytd: self.zakat_ytd,
        }
    }
}

/// Which statutory components apply to the employee
///
/// A disabled component contributes zero to every field of the result but
/// keeps its place in the shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComponentToggles {
    pub has_epf: bool,
    pub has_socso: bool,
    pub has_eis: bool,
    pub has_pcb: bool,
}

impl Default for ComponentToggles {
    fn default() -> Self {
        Self {
            has_epf: true,
            has_socso: true,
            has_eis: true,
            has_pcb: true,
        }
    }
}

impl ComponentToggles {
    /// Applicability by age under the standard policy: SOCSO Category 1
    /// below age 60, EIS from 18 through 60.
    pub fn for_employee_age(age: u8) -> Self {
        Self {
            has_epf: true,
            has_socso: age < 60,
            has_eis: (18..=60).contains(&age),
            has_pcb: true,
        }
    }
}

/// Engine configuration: toggles plus default EPF rates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub toggles: ComponentToggles,
    pub epf_rates: EpfRates,
}

/// Consolidated statutory deductions for one pay period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatutoryResult {
    pub epf: Contribution,
    pub socso: Contribution,
    pub eis: Contribution,
    pub pcb: f64,

    /// epf.employee + socso.employee + eis.employee + pcb
    pub total_employee_deduction: f64,

    /// epf.employer + socso.employer + eis.employer
    pub total_employer_contribution: f64,
}

/// The statutory calculation engine
pub struct StatutoryEngine {
    tables: StatutoryTables,
    config: EngineConfig,
}

impl StatutoryEngine {
    /// Create an engine over a table set with the given configuration
    pub fn new(tables: StatutoryTables, config: EngineConfig) -> Self {
        Self { tables, config }
    }

    /// Engine over the current tables with default configuration
    pub fn with_current_tables() -> Self {
        Self::new(StatutoryTables::current(), EngineConfig::default())
    }

    pub fn tables(&self) -> &StatutoryTables {
        &self.tables
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute all statutory deductions for one pay period.
    ///
    /// Either every enabled component computes or the call fails as a
    /// whole; there is no partial result.
    pub fn calculate(
        &self,
        period: &PeriodInput,
        profile: &TaxProfile,
        ytd: &YtdSnapshot,
    ) -> Result<StatutoryResult, EngineError> {
        self.calculate_detailed(period, profile, ytd)
            .map(|(result, _)| result)
    }

    /// As `calculate`, also returning the PCB breakdown when PCB is enabled.
    pub fn calculate_detailed(
        &self,
        period: &PeriodInput,
        profile: &TaxProfile,
        ytd: &YtdSnapshot,
    ) -> Result<(StatutoryResult, Option<PcbBreakdown>), EngineError> {
        period.validate()?;
        ytd.validate()?;

        let epf_rates = period.epf_rates.unwrap_or(self.config.epf_rates);
        epf_rates.validate()?;

        let toggles = self.config.toggles;

        let epf = if toggles.has_epf {
            compute_epf(period.gross_salary, &epf_rates)
        } else {
            Contribution::zero()
        };

        let socso = if toggles.has_socso {
            self.tables.socso.lookup(period.gross_salary)
        } else {
            Contribution::zero()
        };

        let eis = if toggles.has_eis {
            self.tables.eis.lookup(period.gross_salary)
        } else {
            Contribution::zero()
        };

        let pcb_breakdown = if toggles.has_pcb {
            Some(compute_pcb_detailed(
                period,
                profile,
                ytd,
                epf.employee,
                &self.tables.tax_brackets,
            )?)
        } else {
            None
        };
        let pcb = pcb_breakdown.as_ref().map(|b| b.pcb).unwrap_or(0.0);

        let result = StatutoryResult {
            epf,
            socso,
            eis,
            pcb,
            total_employee_deduction: round2(
                epf.employee + socso.employee + eis.employee + pcb,
            ),
            total_employer_contribution: round2(epf.employer + socso.employer + eis.employer),
        };

        Ok((result, pcb_breakdown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn engine() -> StatutoryEngine {
        StatutoryEngine::with_current_tables()
    }

    fn ka() -> TaxProfile {
        TaxProfile::single_resident()
    }

    #[test]
    fn test_mid_range_salary() {
        // 3,500/month KA, June, no YTD.
        let result = engine()
            .calculate(&PeriodInput::monthly(3_500.0, 6), &ka(), &YtdSnapshot::default())
            .unwrap();

        assert_abs_diff_eq!(result.epf.employee, 385.0);
        assert_abs_diff_eq!(result.epf.employer, 455.0);
        assert_abs_diff_eq!(result.socso.employee, 17.25);
        assert_abs_diff_eq!(result.socso.employer, 60.35);
        assert_abs_diff_eq!(result.eis.employee, 6.90);
        assert_abs_diff_eq!(result.eis.employer, 6.90);
        assert_abs_diff_eq!(result.pcb, 11.15);
        assert_abs_diff_eq!(result.total_employee_deduction, 420.30);
        assert_abs_diff_eq!(result.total_employer_contribution, 522.25);
    }

    #[test]
    fn test_salary_at_contribution_ceiling() {
        let result = engine()
            .calculate(&PeriodInput::monthly(6_000.0, 1), &ka(), &YtdSnapshot::default())
            .unwrap();

        assert_abs_diff_eq!(result.socso.employee, 29.75);
        assert_abs_diff_eq!(result.socso.employer, 104.15);
        assert_abs_diff_eq!(result.eis.employee, 11.90);
        assert_abs_diff_eq!(result.eis.employer, 11.90);
        // Above the EPF threshold: employer drops to 12%.
        assert_abs_diff_eq!(result.epf.employee, 660.0);
        assert_abs_diff_eq!(result.epf.employer, 720.0);
    }

    #[test]
    fn test_salary_above_ceiling_stays_capped() {
        let at_ceiling = engine()
            .calculate(&PeriodInput::monthly(6_000.0, 1), &ka(), &YtdSnapshot::default())
            .unwrap();
        let above = engine()
            .calculate(&PeriodInput::monthly(8_000.0, 1), &ka(), &YtdSnapshot::default())
            .unwrap();

        assert_eq!(above.socso, at_ceiling.socso);
        assert_eq!(above.eis, at_ceiling.eis);
        // EPF keeps scaling linearly.
        assert_abs_diff_eq!(above.epf.employee, 880.0);
        assert_abs_diff_eq!(above.epf.employer, 960.0);
    }

    #[test]
    fn test_totals_equal_component_sums() {
        let engine = engine();
        for gross in [0.0, 29.5, 450.0, 1_234.56, 3_500.0, 5_000.0, 6_000.0, 9_750.25] {
            for month in [1, 6, 12] {
                let result = engine
                    .calculate(&PeriodInput::monthly(gross, month), &ka(), &YtdSnapshot::default())
                    .unwrap();

                let employee_sum =
                    result.epf.employee + result.socso.employee + result.eis.employee + result.pcb;
                let employer_sum =
                    result.epf.employer + result.socso.employer + result.eis.employer;

                assert_abs_diff_eq!(
                    result.total_employee_deduction,
                    round2(employee_sum),
                    epsilon = 1e-9
                );
                assert_abs_diff_eq!(
                    result.total_employer_contribution,
                    round2(employer_sum),
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_disabled_component_reports_zero_but_stays_in_shape() {
        let config = EngineConfig {
            toggles: ComponentToggles {
                has_socso: false,
                has_eis: false,
                ..ComponentToggles::default()
            },
            epf_rates: EpfRates::default(),
        };
        let engine = StatutoryEngine::new(StatutoryTables::current(), config);

        let result = engine
            .calculate(&PeriodInput::monthly(3_500.0, 6), &ka(), &YtdSnapshot::default())
            .unwrap();

        assert_eq!(result.socso, Contribution::zero());
        assert_eq!(result.eis, Contribution::zero());
        assert_abs_diff_eq!(result.epf.employee, 385.0);
        assert_abs_diff_eq!(result.pcb, 11.15);
        assert_abs_diff_eq!(result.total_employee_deduction, 396.15);
    }

    #[test]
    fn test_disabled_epf_removes_pcb_relief() {
        let config = EngineConfig {
            toggles: ComponentToggles {
                has_epf: false,
                ..ComponentToggles::default()
            },
            epf_rates: EpfRates::default(),
        };
        let engine = StatutoryEngine::new(StatutoryTables::current(), config);

        let with_epf = StatutoryEngine::with_current_tables()
            .calculate(&PeriodInput::monthly(6_000.0, 1), &ka(), &YtdSnapshot::default())
            .unwrap();
        let without_epf = engine
            .calculate(&PeriodInput::monthly(6_000.0, 1), &ka(), &YtdSnapshot::default())
            .unwrap();

        assert_eq!(without_epf.epf, Contribution::zero());
        // No EPF relief means a higher chargeable income and a higher PCB.
        assert!(without_epf.pcb > with_epf.pcb);
    }

    #[test]
    fn test_per_call_epf_override_wins() {
        let mut period = PeriodInput::monthly(2_000.0, 1);
        period.epf_rates = Some(EpfRates {
            employee_rate: 0.09,
            ..EpfRates::default()
        });

        let result = engine()
            .calculate(&period, &ka(), &YtdSnapshot::default())
            .unwrap();
        assert_abs_diff_eq!(result.epf.employee, 180.0);
    }

    #[test]
    fn test_invalid_inputs_rejected_whole() {
        let engine = engine();
        let ytd = YtdSnapshot::default();

        let negative = PeriodInput::monthly(-1.0, 1);
        assert!(matches!(
            engine.calculate(&negative, &ka(), &ytd),
            Err(EngineError::InvalidInput(_))
        ));

        let bad_month = PeriodInput::monthly(3_000.0, 0);
        assert!(matches!(
            engine.calculate(&bad_month, &ka(), &ytd),
            Err(EngineError::InvalidInput(_))
        ));

        let bad_ytd = YtdSnapshot {
            gross_ytd: -5.0,
            ..YtdSnapshot::default()
        };
        assert!(matches!(
            engine.calculate(&PeriodInput::monthly(3_000.0, 1), &ka(), &bad_ytd),
            Err(EngineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_age_gating_policy() {
        let under_18 = ComponentToggles::for_employee_age(17);
        assert!(under_18.has_socso && !under_18.has_eis);

        let mid = ComponentToggles::for_employee_age(35);
        assert!(mid.has_socso && mid.has_eis);

        let at_60 = ComponentToggles::for_employee_age(60);
        assert!(!at_60.has_socso && at_60.has_eis);

        let over_60 = ComponentToggles::for_employee_age(61);
        assert!(!over_60.has_socso && !over_60.has_eis);
    }

    #[test]
    fn test_ytd_roll_forward() {
        let engine = engine();
        let period = PeriodInput {
            gross_salary: 5_000.0,
            month: 1,
            additional_remuneration: 1_000.0,
            epf_rates: None,
        };
        let result = engine.calculate(&period, &ka(), &YtdSnapshot::default()).unwrap();

        let next = YtdSnapshot::default().advanced_by(&period, &result);
        assert_abs_diff_eq!(next.gross_ytd, 6_000.0);
        assert_abs_diff_eq!(next.epf_ytd, result.epf.employee);
        assert_abs_diff_eq!(next.pcb_deducted_ytd, result.pcb);
        assert_abs_diff_eq!(next.zakat_ytd, 0.0);
    }
}

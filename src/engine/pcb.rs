//! PCB (monthly tax deduction) engine
//!
//! The withholding amount is re-derived every month from year-to-date
//! totals: project the annual position from YTD plus the current month
//! repeated over the remaining months, compute the annual liability on the
//! progressive schedule, subtract what has already been deducted, and
//! spread the remainder over the months left. Rounding drift from earlier
//! months is absorbed automatically.
//!
//! The steps form a strict pipeline; each value feeds the next and the
//! order is load-bearing. Additional remuneration (bonus/arrears) is taxed
//! marginally: the annual liability is recomputed with the additional
//! amount included once, and the difference is withheld on top of the
//! normal monthly amount.

use serde::{Deserialize, Serialize};

use crate::employee::{ResidentStatus, TaxProfile};
use crate::error::EngineError;
use crate::money::{round_up_to_5_sen, truncate2};
use crate::tables::TaxBracketTable;
use super::aggregator::{PeriodInput, YtdSnapshot};

/// Annual individual relief, applied to every resident
const INDIVIDUAL_RELIEF: f64 = 9_000.0;
/// Spouse relief, category KB only
const SPOUSE_RELIEF: f64 = 4_000.0;
/// Additional relief for a disabled taxpayer
const DISABLED_SELF_RELIEF: f64 = 6_000.0;
/// Additional relief for a disabled spouse, KB only
const DISABLED_SPOUSE_RELIEF: f64 = 5_000.0;
/// Relief per child
const CHILD_RELIEF: f64 = 2_000.0;
/// Relief per child in higher education, replacing the normal child relief
const CHILD_HIGHER_EDUCATION_RELIEF: f64 = 8_000.0;
/// Relief per disabled child, on top of the normal/higher-education relief
const DISABLED_CHILD_RELIEF: f64 = 6_000.0;
/// Annual cap on the EPF contribution relief
const EPF_RELIEF_CAP: f64 = 4_000.0;
/// Individual rebate, doubled for KB, applicable below the income limit
const INDIVIDUAL_REBATE: f64 = 400.0;
/// Chargeable income limit for the rebate
const REBATE_INCOME_LIMIT: f64 = 35_000.0;
/// Flat rate for non-residents
const NON_RESIDENT_RATE: f64 = 0.30;
/// Monthly amounts below this are not withheld at all
const DE_MINIMIS: f64 = 10.0;

/// Intermediate values of one PCB computation, for payslip-style output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcbBreakdown {
    /// Month being computed (1-12)
    pub month: u32,

    /// Future months in the year, excluding the current one
    pub remaining_months: u32,

    /// YTD gross plus the current base gross projected to year end
    pub projected_annual_gross: f64,

    /// Projected annual EPF employee contribution, relief-capped
    pub projected_annual_epf: f64,

    /// Projected gross net of capped EPF
    pub net_income: f64,

    /// Total personal reliefs (zero for non-residents)
    pub total_reliefs: f64,

    /// Chargeable income after reliefs
    pub chargeable_income: f64,

    /// Annual tax on normal remuneration
    pub annual_tax: f64,

    /// Annual tax with additional remuneration included
    pub annual_tax_with_additional: f64,

    /// Monthly deduction on normal remuneration before rounding
    pub pcb_normal: f64,

    /// Deduction attributable to additional remuneration
    pub pcb_additional: f64,

    /// Final rounded monthly deduction
    pub pcb: f64,
}

/// Compute the monthly tax deduction amount.
pub fn compute_pcb(
    period: &PeriodInput,
    profile: &TaxProfile,
    ytd: &YtdSnapshot,
    epf_employee_current: f64,
    brackets: &TaxBracketTable,
) -> Result<f64, EngineError> {
    compute_pcb_detailed(period, profile, ytd, epf_employee_current, brackets).map(|b| b.pcb)
}

/// Compute the monthly tax deduction with its intermediate values.
pub fn compute_pcb_detailed(
    period: &PeriodInput,
    profile: &TaxProfile,
    ytd: &YtdSnapshot,
    epf_employee_current: f64,
    brackets: &TaxBracketTable,
) -> Result<PcbBreakdown, EngineError> {
    period.validate()?;
    ytd.validate()?;
    if epf_employee_current < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "EPF employee contribution must be non-negative, got {}",
            epf_employee_current
        )));
    }

    let remaining_months = 12 - period.month;
    let months_left = (remaining_months + 1) as f64; // current month included

    let projected_gross = ytd.gross_ytd + period.gross_salary * months_left;
    let projected_epf =
        (ytd.epf_ytd + epf_employee_current * months_left).min(EPF_RELIEF_CAP);

    let normal = annual_tax(projected_gross, projected_epf, profile, brackets);

    let (with_additional, pcb_additional) = if period.additional_remuneration > 0.0 {
        // The additional amount lands in this year exactly once; it is not
        // repeated over the remaining months.
        let augmented = annual_tax(
            projected_gross + period.additional_remuneration,
            projected_epf,
            profile,
            brackets,
        );
        let extra = (augmented.tax - normal.tax).max(0.0);
        (augmented.tax, extra)
    } else {
        (normal.tax, 0.0)
    };

    let pcb_normal =
        ((normal.tax - ytd.zakat_ytd - ytd.pcb_deducted_ytd) / months_left).max(0.0);

    let total = pcb_normal + pcb_additional;
    let pcb = if total < DE_MINIMIS {
        0.0
    } else {
        round_up_to_5_sen(truncate2(total))
    };

    Ok(PcbBreakdown {
        month: period.month,
        remaining_months,
        projected_annual_gross: projected_gross,
        projected_annual_epf: projected_epf,
        net_income: normal.net_income,
        total_reliefs: normal.reliefs,
        chargeable_income: normal.chargeable_income,
        annual_tax: normal.tax,
        annual_tax_with_additional: with_additional,
        pcb_normal,
        pcb_additional,
        pcb,
    })
}

struct AnnualTax {
    net_income: f64,
    reliefs: f64,
    chargeable_income: f64,
    tax: f64,
}

/// Annual tax liability for a projected annual gross and capped EPF.
fn annual_tax(
    annual_gross: f64,
    annual_epf: f64,
    profile: &TaxProfile,
    brackets: &TaxBracketTable,
) -> AnnualTax {
    let net_income = annual_gross - annual_epf;

    if profile.resident_status == ResidentStatus::NonResident {
        // Flat rate on net income, no reliefs, no rebate.
        return AnnualTax {
            net_income,
            reliefs: 0.0,
            chargeable_income: net_income,
            tax: (net_income * NON_RESIDENT_RATE).max(0.0),
        };
    }

    let reliefs = total_reliefs(profile);
    let chargeable = (net_income - reliefs).max(0.0);

    let bracket = brackets.lookup(chargeable);
    let base = if chargeable <= REBATE_INCOME_LIMIT {
        (bracket.cumulative_tax - rebate(profile)).max(0.0)
    } else {
        bracket.cumulative_tax
    };

    let tax =
        ((chargeable - bracket.lower_bound) * bracket.rate_pct / 100.0 + base).max(0.0);

    AnnualTax {
        net_income,
        reliefs,
        chargeable_income: chargeable,
        tax,
    }
}

fn total_reliefs(profile: &TaxProfile) -> f64 {
    let mut reliefs = INDIVIDUAL_RELIEF;

    if profile.category.spouse_reliefs_apply() {
        reliefs += SPOUSE_RELIEF;
        if profile.disabled_spouse {
            reliefs += DISABLED_SPOUSE_RELIEF;
        }
    }
    if profile.disabled_self {
        reliefs += DISABLED_SELF_RELIEF;
    }

    let normal_children = profile.number_of_children - profile.children_in_higher_education;
    reliefs += CHILD_RELIEF * normal_children as f64;
    reliefs += CHILD_HIGHER_EDUCATION_RELIEF * profile.children_in_higher_education as f64;
    reliefs += DISABLED_CHILD_RELIEF * profile.disabled_children as f64;

    reliefs
}

fn rebate(profile: &TaxProfile) -> f64 {
    if profile.category.spouse_reliefs_apply() {
        INDIVIDUAL_REBATE * 2.0
    } else {
        INDIVIDUAL_REBATE
    }
}

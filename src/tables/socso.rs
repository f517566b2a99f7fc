//! SOCSO (Category 1) contribution schedules
//!
//! Contribution amounts are fixed per wage band. Bands below RM300 carry the
//! published amounts directly; the RM100-wide bands from RM300 up follow the
//! percentage-of-assumed-wage rules (employment injury 1.75% split 1.25%
//! employer-only, invalidity 0.5% per side), each scheme rounded
//! half-to-even to 5 sen. Generated in integer sen so every row lands on the
//! published value.
//!
//! Two versions ship: the RM6,000-ceiling schedule effective October 2024
//! and the RM5,000-ceiling schedule in force before it.

use chrono::NaiveDate;

use crate::money::round_to_5_sen_half_even;
use super::wage_band::{WageBandTable, WageBandTier};
use super::ymd;

/// Current schedule: RM6,000 ceiling, 65 tiers, effective 2024-10-01
pub fn current() -> WageBandTable {
    WageBandTable::from_builtin("socso-cat1-2024-10", effective_current(), build_tiers(6_000))
}

/// Legacy schedule: RM5,000 ceiling, 55 tiers, effective 2022-09-01
pub fn legacy() -> WageBandTable {
    WageBandTable::from_builtin("socso-cat1-2022-09", effective_legacy(), build_tiers(5_000))
}

pub fn effective_current() -> NaiveDate {
    ymd(2024, 10, 1)
}

pub fn effective_legacy() -> NaiveDate {
    ymd(2022, 9, 1)
}

/// Published amounts for the irregular bands below RM300.
///
/// Band boundaries are the official "RMx.01 - RMy" ranges expressed as
/// half-open [lower, upper) intervals, so a wage of exactly RMy falls in
/// the band that names it.
fn low_band_tiers() -> Vec<WageBandTier> {
    vec![
        WageBandTier { lower: 0.0, upper: Some(30.01), employee: 0.10, employer: 0.40 },
        WageBandTier { lower: 30.01, upper: Some(50.01), employee: 0.20, employer: 0.70 },
        WageBandTier { lower: 50.01, upper: Some(70.01), employee: 0.30, employer: 1.10 },
        WageBandTier { lower: 70.01, upper: Some(100.01), employee: 0.40, employer: 1.50 },
        WageBandTier { lower: 100.01, upper: Some(140.01), employee: 0.60, employer: 2.10 },
        WageBandTier { lower: 140.01, upper: Some(200.01), employee: 0.85, employer: 2.95 },
        WageBandTier { lower: 200.01, upper: Some(300.01), employee: 1.25, employer: 4.35 },
    ]
}

/// Contribution amounts in sen for the RM100 band starting at `lower` ringgit.
fn band_amounts_sen(lower: i64) -> (i64, i64) {
    let mid_sen = (lower + 50) * 100;
    // Invalidity scheme: 0.5% of assumed wage, each side.
    let invalidity_sen = round_to_5_sen_half_even(mid_sen * 5, 1_000);
    // Employment injury scheme: 1.25% of assumed wage, employer only.
    let injury_sen = round_to_5_sen_half_even(mid_sen * 125, 10_000);
    (invalidity_sen, injury_sen + invalidity_sen)
}

fn build_tiers(ceiling: i64) -> Vec<WageBandTier> {
    let mut tiers = low_band_tiers();

    let mut lower = 300;
    while lower < ceiling {
        let (employee_sen, employer_sen) = band_amounts_sen(lower);
        tiers.push(WageBandTier {
            lower: lower as f64 + 0.01,
            upper: Some((lower + 100) as f64 + 0.01),
            employee: employee_sen as f64 / 100.0,
            employer: employer_sen as f64 / 100.0,
        });
        lower += 100;
    }

    // Capped top tier: every wage above the ceiling contributes the ceiling
    // band's amounts.
    let (employee_sen, employer_sen) = band_amounts_sen(ceiling - 100);
    tiers.push(WageBandTier {
        lower: ceiling as f64 + 0.01,
        upper: None,
        employee: employee_sen as f64 / 100.0,
        employer: employer_sen as f64 / 100.0,
    });

    tiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedules_are_valid() {
        current().assert_valid();
        legacy().assert_valid();
    }

    #[test]
    fn test_tier_counts() {
        assert_eq!(current().tier_count(), 65);
        assert_eq!(legacy().tier_count(), 55);
    }

    #[test]
    fn test_published_mid_band() {
        // 3,400.01 - 3,500.00 band, assumed wage 3,450
        let c = current().lookup(3_500.0);
        assert_eq!(c.employee, 17.25);
        assert_eq!(c.employer, 60.35);

        // A wage one cent into the next band moves up
        let c = current().lookup(3_500.01);
        assert_eq!(c.employee, 17.75);
    }

    #[test]
    fn test_current_cap() {
        let at_ceiling = current().lookup(6_000.0);
        assert_eq!(at_ceiling.employee, 29.75);
        assert_eq!(at_ceiling.employer, 104.15);

        // One cent above and far above the ceiling stay capped
        assert_eq!(current().lookup(6_000.01), at_ceiling);
        assert_eq!(current().lookup(8_000.0), at_ceiling);
    }

    #[test]
    fn test_legacy_cap() {
        let at_ceiling = legacy().lookup(5_000.0);
        assert_eq!(at_ceiling.employee, 24.75);
        assert_eq!(at_ceiling.employer, 86.65);
        assert_eq!(legacy().lookup(9_999.0), at_ceiling);
    }

    #[test]
    fn test_low_bands() {
        let c = current().lookup(25.0);
        assert_eq!(c.employee, 0.10);
        assert_eq!(c.employer, 0.40);

        let c = current().lookup(30.0);
        assert_eq!(c.employee, 0.10);

        let c = current().lookup(30.01);
        assert_eq!(c.employee, 0.20);

        let c = current().lookup(250.0);
        assert_eq!(c.employee, 1.25);
        assert_eq!(c.employer, 4.35);
    }

    #[test]
    fn test_versions_diverge_above_legacy_ceiling() {
        let cur = current().lookup(5_600.0);
        let leg = legacy().lookup(5_600.0);
        assert!(cur.employee > leg.employee);
        assert_eq!(leg.employee, 24.75);
    }
}

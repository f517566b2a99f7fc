//! EIS contribution schedules
//!
//! Same band structure as SOCSO with 0.2% of the assumed wage contributed by
//! each side. From RM300 up the amounts fall exactly on the 5-sen grid; the
//! irregular published bands below RM300 are carried as literals.

use chrono::NaiveDate;

use crate::money::round_to_5_sen_half_even;
use super::wage_band::{WageBandTable, WageBandTier};
use super::ymd;

/// Current schedule: RM6,000 ceiling, 65 tiers, effective 2024-10-01
pub fn current() -> WageBandTable {
    WageBandTable::from_builtin("eis-2024-10", effective_current(), build_tiers(6_000))
}

/// Legacy schedule: RM5,000 ceiling, 55 tiers, effective 2022-09-01
pub fn legacy() -> WageBandTable {
    WageBandTable::from_builtin("eis-2022-09", effective_legacy(), build_tiers(5_000))
}

pub fn effective_current() -> NaiveDate {
    ymd(2024, 10, 1)
}

pub fn effective_legacy() -> NaiveDate {
    ymd(2022, 9, 1)
}

/// Published amounts for the bands below RM300 (same per side).
fn low_band_tiers() -> Vec<WageBandTier> {
    vec![
        WageBandTier { lower: 0.0, upper: Some(30.01), employee: 0.05, employer: 0.05 },
        WageBandTier { lower: 30.01, upper: Some(50.01), employee: 0.10, employer: 0.10 },
        WageBandTier { lower: 50.01, upper: Some(70.01), employee: 0.15, employer: 0.15 },
        WageBandTier { lower: 70.01, upper: Some(100.01), employee: 0.20, employer: 0.20 },
        WageBandTier { lower: 100.01, upper: Some(140.01), employee: 0.25, employer: 0.25 },
        WageBandTier { lower: 140.01, upper: Some(200.01), employee: 0.35, employer: 0.35 },
        WageBandTier { lower: 200.01, upper: Some(300.01), employee: 0.50, employer: 0.50 },
    ]
}

/// Per-side amount in sen for the RM100 band starting at `lower` ringgit:
/// 0.2% of the assumed wage (band midpoint).
fn band_amount_sen(lower: i64) -> i64 {
    let mid_sen = (lower + 50) * 100;
    round_to_5_sen_half_even(mid_sen * 2, 1_000)
}

fn build_tiers(ceiling: i64) -> Vec<WageBandTier> {
    let mut tiers = low_band_tiers();

    let mut lower = 300;
    while lower < ceiling {
        let sen = band_amount_sen(lower);
        let amount = sen as f64 / 100.0;
        tiers.push(WageBandTier {
            lower: lower as f64 + 0.01,
            upper: Some((lower + 100) as f64 + 0.01),
            employee: amount,
            employer: amount,
        });
        lower += 100;
    }

    let sen = band_amount_sen(ceiling - 100);
    let amount = sen as f64 / 100.0;
    tiers.push(WageBandTier {
        lower: ceiling as f64 + 0.01,
        upper: None,
        employee: amount,
        employer: amount,
    });

    tiers
}

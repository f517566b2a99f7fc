//! Cent-exact rounding helpers for monetary amounts
//!
//! All statutory amounts are carried as `f64` ringgit and rounded explicitly
//! at the boundaries defined by the deduction rules: contributions round
//! half-up to the cent, while PCB truncates to the cent and then rounds up
//! to the next 5-sen multiple.

/// Guard against binary representation noise around exact cent values
/// (e.g. 12.30 * 100.0 landing a hair below 1230.0).
const CENT_EPSILON: f64 = 1e-6;

/// Round to 2 decimal places, half-up ("nearest cent").
///
/// Intended for non-negative amounts; every statutory quantity is validated
/// non-negative before it reaches a rounding boundary.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0 + 0.5 + CENT_EPSILON).floor() / 100.0
}

/// Truncate to 2 decimal places, discarding any fraction of a cent.
pub fn truncate2(amount: f64) -> f64 {
    (amount * 100.0 + CENT_EPSILON).floor() / 100.0
}

/// Round up to the next multiple of 5 sen (0.05).
///
/// 12.31 becomes 12.35; 12.30 stays 12.30. This is the statutory PCB
/// rounding, not a nearest-value rounding.
pub fn round_up_to_5_sen(amount: f64) -> f64 {
    (amount * 20.0 - CENT_EPSILON).ceil() / 20.0
}

/// Round a rational amount (numerator/denominator, in sen) to the nearest
/// 5-sen multiple with ties going to the even multiple. Returns sen.
///
/// Used when generating contribution schedules from percentage-of-midpoint
/// rules, where every tie must land on the published value. Integer
/// arithmetic keeps the generated rows exact.
pub fn round_to_5_sen_half_even(numer_sen: i64, denom: i64) -> i64 {
    let d = 5 * denom;
    let q = numer_sen / d;
    let r = numer_sen % d;
    let q = if 2 * r > d {
        q + 1
    } else if 2 * r < d {
        q
    } else if q % 2 == 0 {
        q
    } else {
        q + 1
    };
    5 * q
}

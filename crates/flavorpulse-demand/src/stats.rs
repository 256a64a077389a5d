//! Numeric helpers shared by the scoring stages.

/// Arithmetic mean; `0.0` for an empty slice.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u128 = values.iter().map(|&v| u128::from(v)).sum();
    sum as f64 / values.len() as f64
}

/// Rounds half-up to a non-negative integer; negative and non-finite inputs give `0`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn round_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// Clamps to `[0, 100]` first, then rounds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a fraction; `0.0` when `whole` is zero.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn fraction(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// `log10(value)` floored at zero, so inputs at or below 1 contribute nothing.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn log10_floor0(value: u64) -> f64 {
    if value <= 1 {
        0.0
    } else {
        (value as f64).log10()
    }
}

//! Software square-root helpers.
//!
//! There is no hardware square root, so normalization uses a Newton-Raphson
//! inverse square root seeded from the leading-zero count of the input.

use super::fixed::FixedPoint;

/// `1/sqrt(2)` in 4.12.
const INV_SQRT_2: i32 = 2896;
/// `sqrt(2)` in 4.12.
const SQRT_2: i64 = 5793;

const THREE_HALVES: FixedPoint = FixedPoint::from_raw(6144);

/// Leading-zero count of a 32-bit value (the `LZCR` result for positive input).
#[inline]
pub const fn leading_zeros(value: i32) -> u32 {
    (value as u32).leading_zeros()
}

/// Power-of-two estimate of `1/sqrt(x)` for positive `x`.
///
/// The exponent of `x` comes from its leading-zero count and is rounded to
/// the nearest integer in log2 space. Odd exponents pick up a `1/sqrt(2)`
/// factor, so the seed is within about 19% of the true value and exact for
/// inputs near one.
pub fn inverse_sqrt_seed(x: FixedPoint) -> FixedPoint {
    let raw = x.raw();
    if raw <= 0 {
        return FixedPoint::ONE;
    }

    let bits = 32 - leading_zeros(raw) as i32;
    let mut exponent = bits - 1 - 12;
    if raw as i64 >= ((1i64 << (bits - 1)) * SQRT_2) >> 12 {
        exponent += 1;
    }

    let half = exponent.div_euclid(2);
    let base = if exponent.rem_euclid(2) == 1 {
        INV_SQRT_2
    } else {
        FixedPoint::<12>::SCALE
    };

    FixedPoint::from_raw(if half >= 0 { base >> half } else { base << -half })
}

/// One Newton-Raphson step: `y * (1.5 - x/2 * y^2)`.
#[inline]
pub fn inverse_sqrt_step(x: FixedPoint, y: FixedPoint) -> FixedPoint {
    let half_x = FixedPoint::from_raw(x.raw() >> 1);
    y * (THREE_HALVES - half_x * y * y)
}

/// Seed plus a single refinement.
///
/// Converges in one step for inputs near one, which is the per-frame
/// renormalization case.
pub fn inverse_sqrt(x: FixedPoint) -> FixedPoint {
    inverse_sqrt_step(x, inverse_sqrt_seed(x))
}

//! Fixed-point scalars.
//!
//! [`FixedPoint`] stores a signed 32-bit integer scaled by `2^F`. Arithmetic
//! wraps at 32 bits the same way the console's integer registers do, and
//! multiplication/division use a 64-bit intermediate followed by a shift, so
//! results match the hardware bit for bit.
//!
//! [`Short`] is the 16-bit, 4.12 storage format used by vertex registers and
//! quaternion components.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

/// Signed fixed-point number with `F` fractional bits and 32-bit storage.
///
/// # Rounding
///
/// - `a * b` is `(a * b) >> F` computed in 64 bits (rounds toward negative infinity)
/// - `a / b` is `(a << F) / b` computed in 64 bits (truncates toward zero)
/// - `+`, `-` and negation wrap at 32 bits
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct FixedPoint<const F: u32 = 12>(i32);

/// Angle in half-turns: `1.0` is pi radians, `2.0` a full turn.
pub type Angle = FixedPoint<10>;

impl<const F: u32> FixedPoint<F> {
    /// Number of fractional bits
    pub const FRACTIONAL_BITS: u32 = F;
    /// Raw value of `1.0`
    pub const SCALE: i32 = 1 << F;

    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(1 << F);
    pub const MIN: Self = Self(i32::MIN);
    pub const MAX: Self = Self(i32::MAX);

    /// Wrap a raw scaled integer.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// The raw scaled integer.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Integer value `v` (wraps if `v << F` does not fit).
    #[inline]
    pub const fn from_int(v: i32) -> Self {
        Self(v.wrapping_shl(F))
    }

    /// Convert from a float, truncating toward zero.
    pub const fn from_f64(v: f64) -> Self {
        Self((v * Self::SCALE as f64) as i32)
    }

    pub fn from_f32(v: f32) -> Self {
        Self::from_f64(v as f64)
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn to_f32(self) -> f32 {
        self.to_f64() as f32
    }

    /// Integer part, truncated toward zero.
    #[inline]
    pub const fn integer(self) -> i32 {
        self.0 / Self::SCALE
    }

    /// Fractional bits only (keeps the sign of the raw value).
    #[inline]
    pub const fn fractional(self) -> i32 {
        self.0 % Self::SCALE
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.wrapping_abs())
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Change the number of fractional bits, shifting the raw value.
    pub const fn convert<const G: u32>(self) -> FixedPoint<G> {
        if G >= F {
            FixedPoint::<G>(self.0.wrapping_shl(G.saturating_sub(F)))
        } else {
            FixedPoint::<G>(self.0 >> F.saturating_sub(G))
        }
    }
}

impl<const F: u32> Add for FixedPoint<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl<const F: u32> Sub for FixedPoint<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl<const F: u32> Mul for FixedPoint<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as i64 * rhs.0 as i64) >> F) as i32)
    }
}

/// # Panics
///
/// Panics on division by zero.
impl<const F: u32> Div for FixedPoint<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        Self((((self.0 as i64) << F) / rhs.0 as i64) as i32)
    }
}

impl<const F: u32> Mul<i32> for FixedPoint<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: i32) -> Self {
        Self(self.0.wrapping_mul(rhs))
    }
}

impl<const F: u32> Div<i32> for FixedPoint<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: i32) -> Self {
        Self(self.0.wrapping_div(rhs))
    }
}

impl<const F: u32> Neg for FixedPoint<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl<const F: u32> AddAssign for FixedPoint<F> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<const F: u32> SubAssign for FixedPoint<F> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<const F: u32> MulAssign for FixedPoint<F> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<const F: u32> DivAssign for FixedPoint<F> {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<const F: u32> fmt::Debug for FixedPoint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} (raw {})", self.to_f64(), self.0)
    }
}

impl<const F: u32> fmt::Display for FixedPoint<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.to_f64())
    }
}

// ============================================================================
// 16-bit storage
// ============================================================================

/// 4.12 fixed-point value with 16-bit storage.
///
/// This is the width of the vertex registers (V0..V2), the rotation matrix
/// registers and quaternion components. Converting from [`FixedPoint`]
/// truncates the raw value to 16 bits.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Short(i16);

impl Short {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(4096);

    #[inline]
    pub const fn from_raw(raw: i16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> i16 {
        self.0
    }

    pub const fn from_f64(v: f64) -> Self {
        Self((v * 4096.0) as i16)
    }

    /// Clamp into the 16-bit range instead of wrapping.
    pub const fn saturating_from(v: FixedPoint) -> Self {
        let raw = v.raw();
        Self(if raw > i16::MAX as i32 {
            i16::MAX
        } else if raw < i16::MIN as i32 {
            i16::MIN
        } else {
            raw as i16
        })
    }

    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 4096.0
    }
}

impl From<FixedPoint> for Short {
    #[inline]
    fn from(v: FixedPoint) -> Self {
        Self(v.raw() as i16)
    }
}

impl From<Short> for FixedPoint {
    #[inline]
    fn from(v: Short) -> Self {
        FixedPoint::from_raw(v.0 as i32)
    }
}

impl Add for Short {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Short {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Short {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(((self.0 as i32 * rhs.0 as i32) >> 12) as i16)
    }
}

impl Neg for Short {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl fmt::Debug for Short {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4} (raw {})", self.to_f32(), self.0)
    }
}

//! Fixed-point 3-vectors.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};

use super::fixed::{FixedPoint, Short};
use super::soft;

/// 3-vector of 20.12 fixed-point components.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Vec3 {
    pub x: FixedPoint,
    pub y: FixedPoint,
    pub z: FixedPoint,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(FixedPoint::ZERO, FixedPoint::ZERO, FixedPoint::ZERO);
    pub const X: Self = Self::new(FixedPoint::ONE, FixedPoint::ZERO, FixedPoint::ZERO);
    pub const Y: Self = Self::new(FixedPoint::ZERO, FixedPoint::ONE, FixedPoint::ZERO);
    pub const Z: Self = Self::new(FixedPoint::ZERO, FixedPoint::ZERO, FixedPoint::ONE);

    #[inline]
    pub const fn new(x: FixedPoint, y: FixedPoint, z: FixedPoint) -> Self {
        Self { x, y, z }
    }

    pub const fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self::new(FixedPoint::from_f64(x), FixedPoint::from_f64(y), FixedPoint::from_f64(z))
    }

    pub const fn from_raw(x: i32, y: i32, z: i32) -> Self {
        Self::new(FixedPoint::from_raw(x), FixedPoint::from_raw(y), FixedPoint::from_raw(z))
    }

    /// Dot product with per-product truncation.
    pub fn dot(self, rhs: Self) -> FixedPoint {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    pub fn length_squared(self) -> FixedPoint {
        self.dot(self)
    }

    /// Unit-length copy using the approximate inverse square root.
    ///
    /// Vectors are usually far from unit length, so this refines the seed
    /// twice. The zero vector is returned unchanged.
    pub fn normalized(self) -> Self {
        let len_sq = self.length_squared();
        if len_sq.raw() <= 0 {
            return self;
        }
        let seed = soft::inverse_sqrt_seed(len_sq);
        let r = soft::inverse_sqrt_step(len_sq, soft::inverse_sqrt_step(len_sq, seed));
        self * r
    }

    /// `a + (b - a) * t`, exact at `t == 0` and `t == 1`.
    /// `a * (1 - t) + b * t`, each end weighted and truncated on its own.
    pub fn lerp(a: Self, b: Self, t: FixedPoint) -> Self {
        a * (FixedPoint::ONE - t) + b * t
    }

    /// Truncate to the 16-bit vertex-register format.
    pub fn to_packed(self) -> PackedVec3 {
        PackedVec3 {
            x: self.x.into(),
            y: self.y.into(),
            z: self.z.into(),
            pad: 0,
        }
    }

    pub fn to_glam(self) -> glam::Vec3 {
        glam::Vec3::new(self.x.to_f32(), self.y.to_f32(), self.z.to_f32())
    }

    pub fn from_glam(v: glam::Vec3) -> Self {
        Self::new(FixedPoint::from_f32(v.x), FixedPoint::from_f32(v.y), FixedPoint::from_f32(v.z))
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<FixedPoint> for Vec3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: FixedPoint) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Vertex position in the 16-bit register format (8 bytes with padding).
///
/// Layout matches what `V0..V2` expect: `x`, `y`, `z` as 4.12 shorts followed
/// by a padding half-word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct PackedVec3 {
    pub x: Short,
    pub y: Short,
    pub z: Short,
    pub pad: i16,
}

impl PackedVec3 {
    pub const fn new(x: Short, y: Short, z: Short) -> Self {
        Self { x, y, z, pad: 0 }
    }

    pub const fn from_raw(x: i16, y: i16, z: i16) -> Self {
        Self::new(Short::from_raw(x), Short::from_raw(y), Short::from_raw(z))
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x.into(), self.y.into(), self.z.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_exact() {
        let a = Vec3::from_f64(1.0, -2.0, 0.5);
        let b = Vec3::from_f64(-3.0, 4.0, 0.25);
        assert_eq!(Vec3::lerp(a, b, FixedPoint::ZERO), a);
        assert_eq!(Vec3::lerp(a, b, FixedPoint::ONE), b);
        assert_eq!(
            Vec3::lerp(a, b, FixedPoint::from_f64(0.5)),
            Vec3::from_f64(-1.0, 1.0, 0.375)
        );
    }

    #[test]
    fn test_lerp_truncates_each_weighted_end() {
        let a = Vec3::from_raw(1, 100, 0);
        let b = Vec3::from_raw(3, -37, 0);
        assert_eq!(Vec3::lerp(a, b, FixedPoint::from_raw(2048)).x.raw(), 1);
        assert_eq!(Vec3::lerp(a, b, FixedPoint::from_raw(1365)).y.raw(), 53);
    }

    #[test]
    fn test_dot_and_length() {
        let v = Vec3::from_f64(1.0, 2.0, 2.0);
        assert_eq!(v.length_squared(), FixedPoint::from_int(9));
        assert_eq!(v.dot(Vec3::X), FixedPoint::ONE);
    }

    #[test]
    fn test_normalized_is_unit() {
        let v = Vec3::from_f64(0.0, 3.0, 4.0).normalized();
        let len_sq = v.length_squared().raw();
        assert!((len_sq - 4096).abs() <= 64, "len_sq = {len_sq}");
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    }

    #[test]
    fn test_packed_layout() {
        assert_eq!(std::mem::size_of::<PackedVec3>(), 8);
        let p = Vec3::from_f64(0.5, -1.0, 2.0).to_packed();
        assert_eq!(p, PackedVec3::from_raw(2048, -4096, 8192));
        assert_eq!(p.to_vec3(), Vec3::from_f64(0.5, -1.0, 2.0));
    }
}

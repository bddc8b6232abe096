//! Unit quaternions with 4.12 components.

use std::ops::Mul;

use super::fixed::{Angle, FixedPoint, Short};
use super::matrix::{Axis, Matrix33};
use super::soft;
use super::trig::Trig;
use super::vector::Vec3;

/// Rotation quaternion `(w, x, y, z)`, each component a 4.12 short.
///
/// Defaults to identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Quaternion {
    pub w: Short,
    pub x: Short,
    pub y: Short,
    pub z: Short,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(Short::ONE, Short::ZERO, Short::ZERO, Short::ZERO);

    pub const fn new(w: Short, x: Short, y: Short, z: Short) -> Self {
        Self { w, x, y, z }
    }

    pub const fn from_raw(w: i16, x: i16, y: i16, z: i16) -> Self {
        Self::new(
            Short::from_raw(w),
            Short::from_raw(x),
            Short::from_raw(y),
            Short::from_raw(z),
        )
    }

    pub const fn from_f64(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self::new(
            Short::from_f64(w),
            Short::from_f64(x),
            Short::from_f64(y),
            Short::from_f64(z),
        )
    }

    /// Rotation of `angle` about a principal axis.
    pub fn from_axis_angle(axis: Axis, angle: Angle, trig: &Trig) -> Self {
        let half = Angle::from_raw(angle.raw() >> 1);
        let s = Short::from(trig.sin(half));
        let c = Short::from(trig.cos(half));
        match axis {
            Axis::X => Self::new(c, s, Short::ZERO, Short::ZERO),
            Axis::Y => Self::new(c, Short::ZERO, s, Short::ZERO),
            Axis::Z => Self::new(c, Short::ZERO, Short::ZERO, s),
        }
    }

    pub fn conjugate(self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    /// Sum of squared components, in 20.12.
    pub fn length_squared(&self) -> FixedPoint {
        let sq = |v: Short| {
            let v = FixedPoint::from(v);
            v * v
        };
        sq(self.w) + sq(self.x) + sq(self.y) + sq(self.z)
    }

    /// Renormalize in place.
    ///
    /// Scales every component by an inverse square root seeded from the
    /// leading-zero count of the squared length and refined once. A zero
    /// quaternion is left untouched.
    pub fn normalize(&mut self) {
        let len_sq = self.length_squared();
        if len_sq.raw() <= 0 {
            return;
        }
        let r = soft::inverse_sqrt(len_sq);
        let scale = |v: Short| Short::from(FixedPoint::from(v) * r);
        self.w = scale(self.w);
        self.x = scale(self.x);
        self.y = scale(self.y);
        self.z = scale(self.z);
    }

    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Convert to a rotation matrix using 16-bit intermediate products.
    pub fn to_rotation_matrix(&self) -> Matrix33 {
        let one = Short::ONE;
        let two = Short::from_raw(8192);
        let Self { w, x, y, z } = *self;

        let x2 = x * x;
        let y2 = y * y;
        let z2 = z * z;
        let xy = x * y;
        let xz = x * z;
        let yz = y * z;
        let wx = w * x;
        let wy = w * y;
        let wz = w * z;

        let f = |v: Short| -> FixedPoint { v.into() };
        Matrix33::from_rows(
            Vec3::new(f(one - two * (y2 + z2)), f(two * (xy - wz)), f(two * (xz + wy))),
            Vec3::new(f(two * (xy + wz)), f(one - two * (x2 + z2)), f(two * (yz - wx))),
            Vec3::new(f(two * (xz - wy)), f(two * (yz + wx)), f(one - two * (x2 + y2))),
        )
    }

    /// Interpolate from `a` to `b` by `factor`.
    ///
    /// This is component-wise linear interpolation followed by
    /// renormalization (nlerp), which only tracks the true arc for small
    /// rotations. `factor == 0` returns `a` and `factor == 1` returns `b`
    /// exactly.
    pub fn slerp(a: &Self, b: &Self, factor: FixedPoint) -> Self {
        if factor == FixedPoint::ZERO {
            return *a;
        }
        if factor == FixedPoint::ONE {
            return *b;
        }
        let rest = FixedPoint::ONE - factor;
        let lerp = |p: Short, q: Short| Short::from(FixedPoint::from(p) * rest + FixedPoint::from(q) * factor);
        Self::new(lerp(a.w, b.w), lerp(a.x, b.x), lerp(a.y, b.y), lerp(a.z, b.z)).normalized()
    }

    pub fn to_glam(&self) -> glam::Quat {
        glam::Quat::from_xyzw(self.x.to_f32(), self.y.to_f32(), self.z.to_f32(), self.w.to_f32())
    }

    pub fn from_glam(q: glam::Quat) -> Self {
        Self::from_f64(q.w as f64, q.x as f64, q.y as f64, q.z as f64)
    }
}

/// Hamilton product: `a * b` applies `b` first, then `a`.
impl Mul for Quaternion {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let (a, b) = (self, rhs);
        Self::new(
            a.w * b.w - a.x * b.x - a.y * b.y - a.z * b.z,
            a.w * b.x + a.x * b.w + a.y * b.z - a.z * b.y,
            a.w * b.y - a.x * b.z + a.y * b.w + a.z * b.x,
            a.w * b.z + a.x * b.y - a.y * b.x + a.z * b.w,
        )
    }
}

//! 3x3 fixed-point rotation matrices.

use std::ops::Mul;

use super::fixed::{Angle, FixedPoint};
use super::trig::Trig;
use super::vector::Vec3;

/// Axis selector for [`Matrix33::rotation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Row-major 3x3 matrix of 20.12 values.
///
/// Used for pure rotations. The software products here truncate after every
/// multiply, the same as chaining [`FixedPoint`] operations; the geometry
/// kernel accumulates in 64 bits instead, so the two paths can differ by a
/// couple of ULP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Matrix33 {
    pub rows: [Vec3; 3],
}

impl Matrix33 {
    pub const IDENTITY: Self = Self {
        rows: [Vec3::X, Vec3::Y, Vec3::Z],
    };

    pub const ZERO: Self = Self {
        rows: [Vec3::ZERO; 3],
    };

    pub const fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self { rows: [r0, r1, r2] }
    }

    pub const fn from_f64(m: [[f64; 3]; 3]) -> Self {
        Self::from_rows(
            Vec3::from_f64(m[0][0], m[0][1], m[0][2]),
            Vec3::from_f64(m[1][0], m[1][1], m[1][2]),
            Vec3::from_f64(m[2][0], m[2][1], m[2][2]),
        )
    }

    pub fn column(&self, c: usize) -> Vec3 {
        let pick = |row: &Vec3| match c {
            0 => row.x,
            1 => row.y,
            _ => row.z,
        };
        Vec3::new(pick(&self.rows[0]), pick(&self.rows[1]), pick(&self.rows[2]))
    }

    pub fn transpose(&self) -> Self {
        Self::from_rows(self.column(0), self.column(1), self.column(2))
    }

    /// Software matrix product, three dot products per row.
    pub fn mul_matrix(&self, rhs: &Self) -> Self {
        let c0 = rhs.column(0);
        let c1 = rhs.column(1);
        let c2 = rhs.column(2);
        let row = |r: Vec3| Vec3::new(r.dot(c0), r.dot(c1), r.dot(c2));
        Self::from_rows(row(self.rows[0]), row(self.rows[1]), row(self.rows[2]))
    }

    /// Software matrix-vector product.
    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        Vec3::new(self.rows[0].dot(v), self.rows[1].dot(v), self.rows[2].dot(v))
    }

    /// Right-handed rotation about a principal axis.
    pub fn rotation(angle: Angle, axis: Axis, trig: &Trig) -> Self {
        let s = trig.sin(angle);
        let c = trig.cos(angle);
        let zero = FixedPoint::ZERO;
        let one = FixedPoint::ONE;
        match axis {
            Axis::X => Self::from_rows(
                Vec3::new(one, zero, zero),
                Vec3::new(zero, c, -s),
                Vec3::new(zero, s, c),
            ),
            Axis::Y => Self::from_rows(
                Vec3::new(c, zero, s),
                Vec3::new(zero, one, zero),
                Vec3::new(-s, zero, c),
            ),
            Axis::Z => Self::from_rows(
                Vec3::new(c, -s, zero),
                Vec3::new(s, c, zero),
                Vec3::new(zero, zero, one),
            ),
        }
    }

    pub fn to_glam(&self) -> glam::Mat3 {
        let t = self.transpose();
        glam::Mat3::from_cols(t.rows[0].to_glam(), t.rows[1].to_glam(), t.rows[2].to_glam())
    }

    pub fn from_glam(m: glam::Mat3) -> Self {
        Self::from_rows(
            Vec3::from_glam(m.row(0)),
            Vec3::from_glam(m.row(1)),
            Vec3::from_glam(m.row(2)),
        )
    }
}

impl Default for Matrix33 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for &Matrix33 {
    type Output = Matrix33;
    fn mul(self, rhs: Self) -> Matrix33 {
        self.mul_matrix(rhs)
    }
}

impl Mul<Vec3> for &Matrix33 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Vec3 {
        self.mul_vec3(rhs)
    }
}

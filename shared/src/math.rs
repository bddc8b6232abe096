//! Fixed-point math for the renderer and animation runtime
//!
//! Everything here is integer arithmetic with explicit fractional widths so
//! results are reproducible bit for bit. Float conversions exist only for
//! authoring, display and reference checks (`to_glam`/`from_glam`).
//!
//! # Types
//!
//! - [`FixedPoint`] - 32-bit storage, `F` fractional bits (default 12)
//! - [`Angle`] - 10-bit fixed-point half-turns
//! - [`Short`] - 16-bit 4.12 register format
//! - [`Vec3`], [`PackedVec3`], [`Matrix33`], [`Quaternion`]
//! - [`Trig`] - sine/cosine lookup table

mod fixed;
mod matrix;
mod quaternion;
pub mod soft;
mod trig;
mod vector;

pub use fixed::{Angle, FixedPoint, Short};
pub use matrix::{Axis, Matrix33};
pub use quaternion::Quaternion;
pub use trig::Trig;
pub use vector::{PackedVec3, Vec3};

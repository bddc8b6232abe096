//! Shared types for the psxrender crates.
//!
//! # Modules
//!
//! - [`math`] - fixed-point scalars, vectors, matrices, quaternions, trig
//! - [`string_hash`] - djb2 name hashes and the diagnostic name registry

pub mod math;
pub mod string_hash;

pub use math::{Angle, Axis, FixedPoint, Matrix33, PackedVec3, Quaternion, Short, Trig, Vec3};
pub use string_hash::StringHash;

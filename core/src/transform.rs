//! Rigid transforms and their composition.

use psxrender_shared::{Matrix33, Quaternion, Vec3};

use crate::gte::math::{matrix_vec_mul3_loaded, multiply_matrix33};
use crate::gte::{GeometryKernel, MatrixSelect};

/// Translation plus quaternion rotation; the form joints are animated in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quaternion,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quaternion::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quaternion) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quaternion::IDENTITY,
        }
    }

    pub fn to_matrix(&self) -> TransformMatrix {
        TransformMatrix {
            rotation: self.rotation.to_rotation_matrix(),
            translation: self.translation,
        }
    }
}

/// Resolved rotation matrix plus translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransformMatrix {
    pub rotation: Matrix33,
    pub translation: Vec3,
}

impl TransformMatrix {
    pub const IDENTITY: Self = Self {
        rotation: Matrix33::IDENTITY,
        translation: Vec3::ZERO,
    };

    pub fn new(rotation: Matrix33, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// `R * p + T`
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation.mul_vec3(p) + self.translation
    }
}

/// Parent matrix combined with a local quaternion transform.
///
/// `R = Rp * R(local)`, `T = Tp + Rp * local.translation`.
pub fn combine_transforms(parent: &TransformMatrix, local: &Transform) -> TransformMatrix {
    combine_transform_matrices(parent, &local.to_matrix())
}

/// Software composition of two resolved transforms.
pub fn combine_transform_matrices(parent: &TransformMatrix, local: &TransformMatrix) -> TransformMatrix {
    TransformMatrix {
        rotation: parent.rotation.mul_matrix(&local.rotation),
        translation: parent.translation + parent.rotation.mul_vec3(local.translation),
    }
}

/// [`combine_transform_matrices`] computed through the kernel.
///
/// Uploads `parent.rotation` into the rotation register unless the caller
/// says it is already there. The parent rotation stays loaded afterwards.
/// Translations must be within the 4.12 vertex range.
pub fn combine_transform_matrices_gte<K: GeometryKernel + ?Sized>(
    kernel: &mut K,
    parent: &TransformMatrix,
    local: &TransformMatrix,
    rotation_loaded: bool,
) -> TransformMatrix {
    let rotation = multiply_matrix33(
        kernel,
        MatrixSelect::Rotation,
        &parent.rotation,
        &local.rotation,
        rotation_loaded,
    );
    let offset = matrix_vec_mul3_loaded(kernel, MatrixSelect::Rotation, local.translation);
    TransformMatrix {
        rotation,
        translation: parent.translation + offset,
    }
}

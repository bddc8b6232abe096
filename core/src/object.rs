//! Placed drawables.

use std::sync::Arc;

use psxrender_shared::{Angle, Axis, FixedPoint, Matrix33, Trig, Vec3};

use crate::animation::SkeletonAnimator;
use crate::armature::Armature;
use crate::model::{Mesh, Model};
use crate::transform::TransformMatrix;

/// World placement: translation plus pitch and yaw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Object {
    /// World matrix, rotation derived by [`Object::calculate_world_matrix`]
    pub transform: TransformMatrix,
    pitch: Angle,
    yaw: Angle,
}

impl Object {
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: TransformMatrix::new(Matrix33::IDENTITY, position),
            ..Default::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.transform.translation = position;
    }

    pub fn pitch(&self) -> Angle {
        self.pitch
    }

    pub fn yaw(&self) -> Angle {
        self.yaw
    }

    /// Angles are wrapped into `[0, 2)` half-turns.
    pub fn set_pitch(&mut self, pitch: Angle) {
        self.pitch = normalize_angle(pitch);
    }

    pub fn set_yaw(&mut self, yaw: Angle) {
        self.yaw = normalize_angle(yaw);
    }

    pub fn has_rotation(&self) -> bool {
        self.pitch != Angle::ZERO || self.yaw != Angle::ZERO
    }

    /// Facing direction in the ground plane (pitch ignored).
    pub fn front(&self, trig: &Trig) -> Vec3 {
        Vec3::new(trig.sin(self.yaw), FixedPoint::ZERO, trig.cos(self.yaw))
    }

    pub fn right(&self, trig: &Trig) -> Vec3 {
        Vec3::new(trig.cos(self.yaw), FixedPoint::ZERO, -trig.sin(self.yaw))
    }

    /// Rebuild the world rotation as `RotY(yaw) * RotX(pitch)`.
    pub fn calculate_world_matrix(&mut self, trig: &Trig) {
        self.transform.rotation = match (self.pitch == Angle::ZERO, self.yaw == Angle::ZERO) {
            (true, true) => Matrix33::IDENTITY,
            (true, false) => Matrix33::rotation(self.yaw, Axis::Y, trig),
            _ => {
                let yaw = Matrix33::rotation(self.yaw, Axis::Y, trig);
                let pitch = Matrix33::rotation(self.pitch, Axis::X, trig);
                &yaw * &pitch
            }
        };
    }
}

fn normalize_angle(a: Angle) -> Angle {
    Angle::from_raw(a.raw().rem_euclid(2 * Angle::SCALE))
}

/// Object drawing every mesh of a shared model.
#[derive(Clone, Debug)]
pub struct ModelObject {
    pub object: Object,
    pub model: Arc<Model>,
}

impl ModelObject {
    pub fn new(object: Object, model: Arc<Model>) -> Self {
        Self { object, model }
    }
}

/// Object drawing one shared mesh.
#[derive(Clone, Debug)]
pub struct MeshObject {
    pub object: Object,
    pub mesh: Arc<Mesh>,
}

impl MeshObject {
    pub fn new(object: Object, mesh: Arc<Mesh>) -> Self {
        Self { object, mesh }
    }
}

/// Skinned model with its own posed armature.
#[derive(Clone, Debug)]
pub struct AnimatedModelObject {
    pub object: Object,
    pub model: Arc<Model>,
    /// Instance pose, seeded from the model's bind pose
    pub armature: Armature,
    pub animator: SkeletonAnimator,
}

impl AnimatedModelObject {
    pub fn new(object: Object, model: Arc<Model>, animator: SkeletonAnimator) -> Self {
        let mut armature = model.armature.clone();
        armature.calculate_transforms();
        Self {
            object,
            model,
            armature,
            animator,
        }
    }

    /// Per-tick update: world matrix, playback time, then the pose.
    pub fn update(&mut self, trig: &Trig) {
        self.object.calculate_world_matrix(trig);
        self.animator.update();
        self.animator.animate(&mut self.armature);
    }
}

//! Camera and view matrix.

use psxrender_shared::{Angle, FixedPoint, Matrix33, Trig, Vec3};

use crate::transform::TransformMatrix;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    pub position: Vec3,
    pub pitch: Angle,
    pub yaw: Angle,
    /// Derived by [`Camera::update_view`]
    pub view: TransformMatrix,
}

impl Camera {
    pub fn new(position: Vec3, pitch: Angle, yaw: Angle) -> Self {
        Self {
            position,
            pitch,
            yaw,
            view: TransformMatrix::IDENTITY,
        }
    }

    /// Recompute [`Camera::view`] from position, pitch and yaw.
    ///
    /// The rotation is `RotX(-pitch) * RotY(-yaw)` with the first two rows
    /// negated, which flips screen X and makes Y point down. The translation
    /// is the camera-space offset `V * -position`, so `view` maps world
    /// points straight into view space.
    pub fn update_view(&mut self, trig: &Trig) {
        let (sx, cx) = (trig.sin(self.pitch), trig.cos(self.pitch));
        let (sy, cy) = (trig.sin(self.yaw), trig.cos(self.yaw));
        let zero = FixedPoint::ZERO;

        self.view.rotation = Matrix33::from_rows(
            Vec3::new(-cy, zero, sy),
            Vec3::new(-(sx * sy), -cx, -(sx * cy)),
            Vec3::new(cx * sy, -sx, cx * cy),
        );
        self.view.translation = self.view.rotation.mul_vec3(-self.position);
    }

    /// Camera-relative position of a world point, rotated into view space.
    pub fn to_view_space(&self, world: Vec3) -> Vec3 {
        self.view.rotation.mul_vec3(world - self.position)
    }
}

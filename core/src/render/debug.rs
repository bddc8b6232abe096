//! Debug overlays: lines, points, boxes, circles, object axes and bones.
//!
//! Everything goes into bucket 0 so it draws over the scene.

use psxrender_shared::{Angle, FixedPoint, PackedVec3, Vec3};

use super::primitives::{Color, Line, Pixel};
use super::renderer::Renderer;
use crate::camera::Camera;
use crate::gte::math::matrix_vec_mul3_loaded;
use crate::gte::{GeometryKernel, MatrixSelect};
use crate::object::{AnimatedModelObject, Object};

/// Length of the axis gizmo lines.
const AXIS_LENGTH: f64 = 0.025;

const BONE_COLOR: Color = Color::rgb(255, 255, 128);

const CIRCLE_SEGMENTS: i32 = 16;

/// Axis-aligned box in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// Circle on the ground (XZ) plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Circle {
    pub center: Vec3,
    pub radius: FixedPoint,
}

impl Circle {
    pub fn new(center: Vec3, radius: FixedPoint) -> Self {
        Self { center, radius }
    }
}

impl<K: GeometryKernel> Renderer<K> {
    /// Project a segment through the loaded rotation and translation.
    ///
    /// `a` and `b` are in the space the kernel transform maps from, so after
    /// [`calculate_view_model_matrix`](Self::calculate_view_model_matrix)
    /// they are object-local.
    pub fn draw_line_local_space(&mut self, a: Vec3, b: Vec3, color: Color) {
        if !self.check_in_frame("draw_line_local_space") {
            return;
        }
        let (a, b) = (a.to_packed(), b.to_packed());
        let kernel = self.kernel_mut();
        kernel.set_triangle(a, b, b);
        kernel.rtpt();
        let points = [kernel.sxy(0), kernel.sxy(1)];
        self.submit(0, Line { points, color });
    }

    /// Red, green and blue lines along the object's X, Y and Z axes.
    pub fn draw_object_axes(&mut self, object: &Object, camera: &Camera) {
        if !self.check_in_frame("draw_object_axes") {
            return;
        }
        self.calculate_view_model_matrix(object, camera, true);
        let axes = [
            (Vec3::from_f64(AXIS_LENGTH, 0.0, 0.0), Color::rgb(255, 0, 0)),
            (Vec3::from_f64(0.0, AXIS_LENGTH, 0.0), Color::rgb(0, 255, 0)),
            (Vec3::from_f64(0.0, 0.0, AXIS_LENGTH), Color::rgb(0, 0, 255)),
        ];
        for (end, color) in axes {
            self.draw_line_local_space(Vec3::ZERO, end, color);
        }
    }

    /// One line per bone of the object's posed armature.
    pub fn draw_armature(&mut self, object: &AnimatedModelObject, camera: &Camera) {
        if !self.check_in_frame("draw_armature") {
            return;
        }
        self.calculate_view_model_matrix(&object.object, camera, true);
        for segment in object.armature.bone_segments() {
            self.draw_line_local_space(segment.start, segment.end, BONE_COLOR);
        }
    }

    /// Segment between two world points.
    ///
    /// The kernel translation is set to `a` in camera space and the segment
    /// is drawn from the origin to `b - a`. Pass `view_loaded` when the view
    /// rotation is already in the kernel.
    pub fn draw_line_world_space(&mut self, camera: &Camera, a: Vec3, b: Vec3, color: Color, view_loaded: bool) {
        if !self.check_in_frame("draw_line_world_space") {
            return;
        }
        if !view_loaded {
            self.load_view_rotation(camera);
        }
        let origin = camera.view.rotation.mul_vec3(a - camera.position);
        self.kernel_mut().set_translation(origin);
        self.draw_line_local_space(Vec3::ZERO, b - a, color);
    }

    /// Single pixel at a world position.
    pub fn draw_point_world_space(&mut self, camera: &Camera, p: Vec3, color: Color, view_loaded: bool) {
        if !self.check_in_frame("draw_point_world_space") {
            return;
        }
        if !view_loaded {
            self.load_view_rotation(camera);
        }
        let kernel = self.kernel_mut();
        let origin = matrix_vec_mul3_loaded(kernel, MatrixSelect::Rotation, p - camera.position);
        kernel.set_translation(origin);
        kernel.set_vertex(0, PackedVec3::default());
        kernel.rtps();
        let position = kernel.sxy(2);
        self.submit(0, Pixel { position, color });
    }

    /// The twelve edges of a box.
    pub fn draw_aabb(&mut self, camera: &Camera, aabb: &Aabb, color: Color) {
        if !self.check_in_frame("draw_aabb") {
            return;
        }
        self.load_world_origin(camera, aabb.min);

        let Vec3 { x, y, z } = aabb.size();
        let zero = FixedPoint::ZERO;
        let edges = [
            // bottom
            (Vec3::new(zero, zero, zero), Vec3::new(zero, zero, z)),
            (Vec3::new(zero, zero, zero), Vec3::new(x, zero, zero)),
            (Vec3::new(x, zero, zero), Vec3::new(x, zero, z)),
            (Vec3::new(zero, zero, z), Vec3::new(x, zero, z)),
            // top
            (Vec3::new(zero, y, zero), Vec3::new(zero, y, z)),
            (Vec3::new(zero, y, zero), Vec3::new(x, y, zero)),
            (Vec3::new(x, y, zero), Vec3::new(x, y, z)),
            (Vec3::new(zero, y, z), Vec3::new(x, y, z)),
            // sides
            (Vec3::new(zero, zero, zero), Vec3::new(zero, y, zero)),
            (Vec3::new(x, zero, zero), Vec3::new(x, y, zero)),
            (Vec3::new(zero, zero, z), Vec3::new(zero, y, z)),
            (Vec3::new(x, zero, z), Vec3::new(x, y, z)),
        ];
        for (a, b) in edges {
            self.draw_line_local_space(a, b, color);
        }
    }

    /// A 16-segment circle around `circle.center` in the XZ plane.
    pub fn draw_circle(&mut self, camera: &Camera, circle: &Circle, color: Color) {
        if !self.check_in_frame("draw_circle") {
            return;
        }
        self.load_world_origin(camera, circle.center);

        let step = Angle::from_raw(2 * Angle::ONE.raw() / CIRCLE_SEGMENTS);
        let mut angle = Angle::ZERO;
        for _ in 0..CIRCLE_SEGMENTS {
            let next = angle + step;
            let a = self.circle_point(circle.radius, angle);
            let b = self.circle_point(circle.radius, next);
            self.draw_line_local_space(a, b, color);
            angle = next;
        }
    }

    fn circle_point(&self, radius: FixedPoint, angle: Angle) -> Vec3 {
        let trig = self.trig();
        Vec3::new(radius * trig.sin(angle), FixedPoint::ZERO, radius * trig.cos(angle))
    }

    /// Load the view rotation and put the kernel origin at `origin`.
    fn load_world_origin(&mut self, camera: &Camera, origin: Vec3) {
        self.load_view_rotation(camera);
        let kernel = self.kernel_mut();
        let translation = matrix_vec_mul3_loaded(kernel, MatrixSelect::Rotation, origin - camera.position);
        kernel.set_translation(translation);
    }
}

//! Frame renderer.
//!
//! Drives the geometry kernel for every face of a drawable, rejects faces by
//! winding and depth, and links the surviving primitives into the current
//! frame's ordering table. Draw calls never fail: rejected and dropped
//! primitives are counted in [`FrameStats`].

use psxrender_shared::{FixedPoint, PackedVec3, Trig};
use tracing::{debug, error, trace, warn};

use super::fog::DepthCue;
use super::frame::{DisplaySink, DoubleBuffer, FrameStats};
use super::ordering_table::OT_SIZE;
use super::primitives::{
    Color, FastFill, FlatQuad, FlatTriangle, GouraudQuad, GouraudTexturedQuad, GouraudTexturedTriangle,
    GouraudTriangle, Primitive, ScreenPoint, TextureInfo,
};
use super::subdivision::{Quad, QuadCorner, SubdivisionLevel, split_2x2, split_4x4};
use crate::camera::Camera;
use crate::config::RendererConfig;
use crate::error::{ConfigError, RenderError};
use crate::gte::math::{matrix_vec_mul3_loaded, multiply_matrix33};
use crate::gte::{GeometryKernel, MatrixSelect, SoftGte};
use crate::model::{DOUBLE_SIDED, FaceGroup, Mesh, Model, Vertex};
use crate::object::{AnimatedModelObject, MeshObject, ModelObject, Object};
use crate::transform::combine_transform_matrices_gte;

/// Average-Z scale for triangles: three SZ values summed, result in 0..1024 per unit.
const ZSF3: i16 = 1024 / 3;
/// Average-Z scale for quads.
const ZSF4: i16 = 1024 / 4;

/// A quad that passed winding and depth checks.
struct ProjectedQuad {
    points: [ScreenPoint; 4],
    colors: [Color; 4],
    z: i32,
}

/// PS1-style renderer over a [`GeometryKernel`].
pub struct Renderer<K: GeometryKernel = SoftGte> {
    kernel: K,
    config: RendererConfig,
    trig: Trig,
    frames: DoubleBuffer,

    projection_distance: u16,
    fog_near: FixedPoint,
    fog_far: FixedPoint,
    depth_cue: DepthCue,
    far_color: Color,
    fog_enabled: bool,
    bias: i32,

    in_frame: bool,
    stats: FrameStats,
}

impl Renderer<SoftGte> {
    /// Renderer on the software kernel.
    pub fn new(config: RendererConfig) -> Result<Self, ConfigError> {
        Self::with_kernel(config, SoftGte::new())
    }
}

impl<K: GeometryKernel> Renderer<K> {
    /// Validate `config`, allocate both frame buffers and initialize the
    /// kernel.
    pub fn with_kernel(config: RendererConfig, kernel: K) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut renderer = Self {
            kernel,
            trig: Trig::new(),
            frames: DoubleBuffer::new(config.memory.primitive_buffer_bytes),
            projection_distance: config.projection.distance,
            fog_near: config.fog_near(),
            fog_far: config.fog_far(),
            depth_cue: DepthCue::default(),
            far_color: config.fog_color(),
            fog_enabled: config.fog.enabled,
            bias: 0,
            in_frame: false,
            stats: FrameStats::default(),
            config,
        };
        renderer.init();
        Ok(renderer)
    }

    /// Load screen offset, projection distance, Z scales, fog coefficients
    /// and far color into the kernel.
    pub fn init(&mut self) {
        let width = self.config.screen.width as i32;
        let height = self.config.screen.height as i32;
        self.kernel.set_screen_offset((width / 2) << 16, (height / 2) << 16);
        self.kernel.set_projection_distance(self.projection_distance);
        self.kernel.set_z_scale(ZSF3, ZSF4);
        self.set_fog_near_far(self.fog_near, self.fog_far);
        self.kernel.set_far_color(self.far_color);

        debug!(
            width,
            height,
            h = self.projection_distance,
            fog = self.fog_enabled,
            arena_bytes = self.config.memory.primitive_buffer_bytes,
            "renderer initialized"
        );
    }

    // ------------------------------------------------------------------
    // Parameters
    // ------------------------------------------------------------------

    /// Change the projection distance `H`. Fog coefficients depend on it
    /// and are recomputed.
    pub fn set_fov(&mut self, h: u16) {
        if h == 0 {
            warn!("ignoring zero projection distance");
            return;
        }
        self.projection_distance = h;
        self.kernel.set_projection_distance(h);
        self.set_fog_near_far(self.fog_near, self.fog_far);
    }

    pub fn projection_distance(&self) -> u16 {
        self.projection_distance
    }

    /// Fog is zero at `near` and full at `far` (view-space depth).
    pub fn set_fog_near_far(&mut self, near: FixedPoint, far: FixedPoint) {
        if far <= near {
            warn!(%near, %far, "ignoring fog range with far <= near");
            return;
        }
        self.fog_near = near;
        self.fog_far = far;
        self.depth_cue = DepthCue::from_near_far(near, far, self.projection_distance);
        self.kernel.set_depth_cue(self.depth_cue.dqa, self.depth_cue.dqb);
    }

    pub fn set_far_color(&mut self, color: Color) {
        self.far_color = color;
        self.kernel.set_far_color(color);
    }

    pub fn far_color(&self) -> Color {
        self.far_color
    }

    pub fn set_fog_enabled(&mut self, enabled: bool) {
        self.fog_enabled = enabled;
    }

    pub fn fog_enabled(&self) -> bool {
        self.fog_enabled
    }

    pub fn depth_cue(&self) -> DepthCue {
        self.depth_cue
    }

    /// Fog blend factor (0..=4096) the projection produces at depth `sz`.
    pub fn calc_interp_factor(&self, sz: u32) -> u32 {
        self.depth_cue.interp_factor(sz, self.projection_distance)
    }

    /// Offset added to every ordering depth. Positive values push
    /// subsequent draws back.
    pub fn set_bias(&mut self, bias: i32) {
        self.bias = bias;
    }

    pub fn bias(&self) -> i32 {
        self.bias
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    pub fn trig(&self) -> &Trig {
        &self.trig
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn frames(&self) -> &DoubleBuffer {
        &self.frames
    }

    /// Counters of the frame in progress (or the last one, between frames).
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    // ------------------------------------------------------------------
    // View setup
    // ------------------------------------------------------------------

    /// Load the camera's view rotation for a batch of unrotated objects.
    pub fn load_view_rotation(&mut self, camera: &Camera) {
        self.kernel.set_rotation(&camera.view.rotation);
    }

    pub fn should_cull_object(&self, object: &Object, camera: &Camera) -> bool {
        (object.position() - camera.position).length_squared() > self.config.cull_distance_squared()
    }

    /// Load the object's view-space transform.
    ///
    /// With `set_view_rot` the rotation becomes `V * M` and the translation
    /// is computed in software. Otherwise the loaded rotation (usually the
    /// view rotation from [`load_view_rotation`](Self::load_view_rotation))
    /// is kept and only the translation is computed, through the kernel.
    pub fn calculate_view_model_matrix(&mut self, object: &Object, camera: &Camera, set_view_rot: bool) {
        let offset = object.position() - camera.position;
        let translation = if set_view_rot {
            let rotation = multiply_matrix33(
                &mut self.kernel,
                MatrixSelect::Rotation,
                &camera.view.rotation,
                &object.transform.rotation,
                false,
            );
            self.kernel.set_rotation(&rotation);
            camera.view.rotation.mul_vec3(offset)
        } else {
            matrix_vec_mul3_loaded(&mut self.kernel, MatrixSelect::Rotation, offset)
        };
        self.kernel.set_translation(translation);
    }

    // ------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------

    /// Draw every mesh of a model object. Distant objects are culled.
    pub fn draw_model_object(&mut self, object: &ModelObject, camera: &Camera, set_view_rot: bool) {
        if !self.check_in_frame("draw_model_object") || self.cull(&object.object, camera) {
            return;
        }
        self.calculate_view_model_matrix(&object.object, camera, set_view_rot);
        self.draw_model_faces(&object.model);
    }

    pub fn draw_mesh_object(&mut self, object: &MeshObject, camera: &Camera, set_view_rot: bool) {
        if !self.check_in_frame("draw_mesh_object") || self.cull(&object.object, camera) {
            return;
        }
        self.calculate_view_model_matrix(&object.object, camera, set_view_rot);
        self.draw_mesh_faces(&object.mesh);
    }

    /// Draw a skinned model. Each mesh is placed by its joint's global
    /// transform in the object's armature instance.
    pub fn draw_animated_model_object(&mut self, object: &AnimatedModelObject, camera: &Camera) {
        if !self.check_in_frame("draw_animated_model_object") || self.cull(&object.object, camera) {
            return;
        }
        if object.armature.is_empty() {
            self.calculate_view_model_matrix(&object.object, camera, true);
            self.draw_model_faces(&object.model);
            return;
        }

        for mesh in &object.model.meshes {
            let Some(joint) = object.armature.global_transform(mesh.joint_id) else {
                warn!(joint = mesh.joint_id, "mesh skinned to a missing joint, skipped");
                continue;
            };
            let model =
                combine_transform_matrices_gte(&mut self.kernel, &object.object.transform, joint, false);
            // leaves the view rotation loaded for the translation below
            let rotation = multiply_matrix33(
                &mut self.kernel,
                MatrixSelect::Rotation,
                &camera.view.rotation,
                &model.rotation,
                false,
            );
            let translation = matrix_vec_mul3_loaded(
                &mut self.kernel,
                MatrixSelect::Rotation,
                model.translation - camera.position,
            );
            self.kernel.set_rotation(&rotation);
            self.kernel.set_translation(translation);
            self.draw_mesh_faces(mesh);
        }
    }

    /// Draw a model with whatever transform the kernel holds.
    pub fn draw_model(&mut self, model: &Model) {
        if self.check_in_frame("draw_model") {
            self.draw_model_faces(model);
        }
    }

    /// Draw a mesh with whatever transform the kernel holds.
    pub fn draw_mesh(&mut self, mesh: &Mesh) {
        if self.check_in_frame("draw_mesh") {
            self.draw_mesh_faces(mesh);
        }
    }

    fn draw_model_faces(&mut self, model: &Model) {
        for mesh in &model.meshes {
            self.draw_mesh_faces(mesh);
        }
    }

    fn draw_mesh_faces(&mut self, mesh: &Mesh) {
        for group in FaceGroup::ALL {
            for face in mesh.faces(group) {
                if group.vertices_per_face() == 3 {
                    self.draw_triangle(mesh, group.is_textured(), face);
                } else {
                    self.draw_quad(mesh, group.is_textured(), face);
                }
            }
        }
    }

    fn draw_triangle(&mut self, mesh: &Mesh, textured: bool, face: &[Vertex]) {
        let [v0, v1, v2] = [&face[0], &face[1], &face[2]];
        let face_bias = v2.face_bias;
        let mut colors = [v0.color, v1.color, v2.color];
        let positions = [v0.position, v1.position, v2.position];
        if !self.project_front_face(positions, &mut colors, false, face_bias == DOUBLE_SIDED) {
            return;
        }

        self.kernel.avsz3();
        let Some(z) = self.ordering_depth(false, face_bias) else {
            return;
        };

        let points = [self.kernel.sxy(0), self.kernel.sxy(1), self.kernel.sxy(2)];
        let primitive: Primitive = if textured {
            GouraudTexturedTriangle {
                points,
                colors,
                uvs: [v0.uv, v1.uv, v2.uv],
                texture: mesh.texture,
            }
            .into()
        } else if mesh.flat {
            FlatTriangle {
                points,
                color: colors[0],
            }
            .into()
        } else {
            GouraudTriangle { points, colors }.into()
        };
        self.submit(z, primitive);
    }

    fn draw_quad(&mut self, mesh: &Mesh, textured: bool, face: &[Vertex]) {
        let corners: Quad = std::array::from_fn(|i| QuadCorner::from(&face[i]));
        let face_bias = face[2].face_bias;
        let Some(quad) = self.project_quad(&corners, false, face_bias) else {
            return;
        };

        if textured && mesh.subdivide && self.config.subdivision.enabled {
            let level = SubdivisionLevel::for_depth(
                quad.z,
                self.config.subdivision.level1_distance,
                self.config.subdivision.level2_distance,
            );
            match level {
                SubdivisionLevel::Split2x2 => {
                    self.stats.subdivided += 1;
                    for sub in split_2x2(&corners) {
                        self.draw_sub_quad(&sub, mesh.texture, face_bias);
                    }
                    return;
                }
                SubdivisionLevel::Split4x4 => {
                    self.stats.subdivided += 1;
                    for sub in split_4x4(&corners) {
                        self.draw_sub_quad(&sub, mesh.texture, face_bias);
                    }
                    return;
                }
                SubdivisionLevel::None => {}
            }
        }

        let ProjectedQuad { points, colors, z } = quad;
        let primitive: Primitive = if textured {
            GouraudTexturedQuad {
                points,
                colors,
                uvs: corners.map(|c| c.uv),
                texture: mesh.texture,
            }
            .into()
        } else if mesh.flat {
            FlatQuad {
                points,
                color: colors[0],
            }
            .into()
        } else {
            GouraudQuad { points, colors }.into()
        };
        self.submit(z, primitive);
    }

    /// Sub-quads keep the face bias but are always single-sided.
    fn draw_sub_quad(&mut self, corners: &Quad, texture: TextureInfo, face_bias: i16) {
        let Some(ProjectedQuad { points, colors, z }) = self.project_quad(corners, true, face_bias) else {
            return;
        };
        self.submit(
            z,
            GouraudTexturedQuad {
                points,
                colors,
                uvs: corners.map(|c| c.uv),
                texture,
            },
        );
    }

    /// Project V0..V2 and test the winding. Fogged colors are depth-cued in
    /// place. Strict mode rejects anything but a positive area; otherwise
    /// only back faces of single-sided faces are rejected.
    fn project_front_face(
        &mut self,
        positions: [PackedVec3; 3],
        colors: &mut [Color],
        strict: bool,
        double_sided: bool,
    ) -> bool {
        if self.fog_enabled {
            for (position, color) in positions.into_iter().zip(colors.iter_mut()) {
                self.kernel.set_vertex(0, position);
                self.kernel.rtps();
                *color = self.depth_cue_color(*color);
            }
        } else {
            let [v0, v1, v2] = positions;
            self.kernel.set_triangle(v0, v1, v2);
            self.kernel.rtpt();
        }

        self.kernel.nclip();
        let area = self.kernel.mac0();
        let rejected = if strict { area <= 0 } else { area < 0 && !double_sided };
        if rejected {
            self.stats.backfaces += 1;
            return false;
        }
        true
    }

    /// Project all four corners: V0..V2 together, then V3 alone. Corner A is
    /// read before the fourth projection pushes it out of the SXY fifo.
    fn project_quad(&mut self, corners: &Quad, strict: bool, face_bias: i16) -> Option<ProjectedQuad> {
        let mut colors = corners.map(|c| c.color);
        let positions = [corners[0].position, corners[1].position, corners[2].position];
        if !self.project_front_face(positions, &mut colors[..3], strict, face_bias == DOUBLE_SIDED) {
            return None;
        }

        let a = self.kernel.sxy(0);
        self.kernel.set_vertex(0, corners[3].position);
        self.kernel.rtps();
        if self.fog_enabled {
            colors[3] = self.depth_cue_color(colors[3]);
        }

        self.kernel.avsz4();
        let z = self.ordering_depth(strict, face_bias)?;
        Some(ProjectedQuad {
            points: [a, self.kernel.sxy(0), self.kernel.sxy(1), self.kernel.sxy(2)],
            colors,
            z,
        })
    }

    /// Blend `color` toward the far color by the IR0 of the last projection.
    fn depth_cue_color(&mut self, color: Color) -> Color {
        self.kernel.set_rgb(color);
        self.kernel.dpcs();
        self.kernel.rgb2()
    }

    /// Ordering depth from OTZ plus the global and face biases, or `None`
    /// if the face is rejected.
    fn ordering_depth(&mut self, strict: bool, face_bias: i16) -> Option<i32> {
        let otz = self.kernel.otz();
        let z = otz as i32 + self.bias + face_bias as i32;
        let accepted = if strict {
            z > 0 && z < OT_SIZE as i32
        } else {
            otz != 0 && (0..OT_SIZE as i32).contains(&z)
        };
        if !accepted {
            self.stats.depth_rejected += 1;
            return None;
        }
        Some(z)
    }

    pub(super) fn submit(&mut self, z: i32, primitive: impl Into<Primitive>) {
        match self.frames.current_mut().insert(z, primitive) {
            Ok(_) => self.stats.submitted += 1,
            Err(RenderError::ArenaFull {
                used,
                capacity,
                requested,
            }) => {
                self.stats.dropped += 1;
                if self.stats.dropped == 1 {
                    warn!(used, capacity, requested, "primitive arena full, dropping primitives");
                }
            }
            Err(err) => {
                self.stats.depth_rejected += 1;
                trace!(%err, "primitive rejected");
            }
        }
    }

    fn cull(&mut self, object: &Object, camera: &Camera) -> bool {
        let culled = self.should_cull_object(object, camera);
        if culled {
            self.stats.culled_objects += 1;
        }
        culled
    }

    pub(super) fn check_in_frame(&self, call: &'static str) -> bool {
        if !self.in_frame {
            error!(call, "draw call outside begin_frame/end_frame ignored");
        }
        self.in_frame
    }

    // ------------------------------------------------------------------
    // Frame control
    // ------------------------------------------------------------------

    /// Reset the current parity's arena and ordering table.
    pub fn begin_frame(&mut self) {
        if self.in_frame {
            error!(frame = self.frames.frame_count(), "begin_frame called twice without end_frame, ignored");
            return;
        }
        self.frames.begin_frame();
        self.stats = FrameStats::default();
        self.in_frame = true;
        trace!(frame = self.frames.frame_count(), parity = self.frames.parity(), "begin frame");
    }

    /// Hand the screen clear and the finished frame to `sink`, then flip
    /// parity. Returns the frame's counters.
    pub fn end_frame<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) -> FrameStats {
        if !self.in_frame {
            error!("end_frame called without begin_frame, ignored");
            return FrameStats::default();
        }

        let clear = FastFill {
            origin: ScreenPoint::new(0, 0),
            width: self.config.screen.width,
            height: self.config.screen.height,
            color: self.clear_color(),
        };
        sink.submit(&clear, self.frames.current());
        self.frames.flip();
        self.in_frame = false;

        trace!(
            submitted = self.stats.submitted,
            backfaces = self.stats.backfaces,
            depth_rejected = self.stats.depth_rejected,
            dropped = self.stats.dropped,
            culled = self.stats.culled_objects,
            "end frame"
        );
        self.stats
    }

    /// Far color under fog, so fully fogged geometry blends into the
    /// background. The configured clear color otherwise.
    pub fn clear_color(&self) -> Color {
        if self.fog_enabled {
            self.far_color
        } else {
            self.config.clear_color()
        }
    }
}

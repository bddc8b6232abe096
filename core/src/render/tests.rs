use std::sync::Arc;

use psxrender_shared::{Angle, FixedPoint, Matrix33, PackedVec3, Trig, Vec3};

use super::*;
use crate::animation::SkeletonAnimator;
use crate::armature::Armature;
use crate::camera::Camera;
use crate::config::RendererConfig;
use crate::error::RenderError;
use crate::gte::GeometryKernel;
use crate::model::{DOUBLE_SIDED, FaceCounts, Mesh, Model, Vertex};
use crate::object::{AnimatedModelObject, ModelObject, Object};

const QUARTER: i16 = 1024;

/// Records what the renderer hands over at the end of each frame.
#[derive(Default)]
struct RecordingSink {
    frames: Vec<(FastFill, Vec<(usize, Primitive)>)>,
}

impl DisplaySink for RecordingSink {
    fn submit(&mut self, clear: &FastFill, frame: &FrameBuffer) {
        let primitives = frame.draw_order().map(|(z, p)| (z, *p)).collect();
        self.frames.push((*clear, primitives));
    }
}

fn renderer() -> Renderer {
    Renderer::new(RendererConfig::default()).unwrap()
}

fn renderer_with(configure: impl FnOnce(&mut RendererConfig)) -> Renderer {
    let mut config = RendererConfig::default();
    configure(&mut config);
    Renderer::new(config).unwrap()
}

/// Identity rotation with the model origin `z` units in front of the eye.
fn place_at_depth(renderer: &mut Renderer, z: f64) {
    let kernel = renderer.kernel_mut();
    kernel.set_rotation(&Matrix33::IDENTITY);
    kernel.set_translation(Vec3::from_f64(0.0, 0.0, z));
}

fn vertex(x: i16, y: i16) -> Vertex {
    Vertex::untextured(PackedVec3::from_raw(x, y, 0), Color::rgb(200, 100, 50))
}

fn textured_vertex(x: i16, y: i16) -> Vertex {
    let uv = Uv::new((x / 16) as u8, (y / 16) as u8);
    Vertex::new(PackedVec3::from_raw(x, y, 0), uv, Color::TEXTURE_NEUTRAL)
}

/// Front-facing triangle.
fn triangle_mesh() -> Mesh {
    let faces = FaceCounts {
        untextured_triangles: 1,
        ..Default::default()
    };
    Mesh::new(vec![vertex(0, 0), vertex(QUARTER, 0), vertex(0, QUARTER)], faces).unwrap()
}

fn triangles_mesh(count: u16) -> Mesh {
    let faces = FaceCounts {
        untextured_triangles: count,
        ..Default::default()
    };
    let vertices = (0..count)
        .flat_map(|_| [vertex(0, 0), vertex(QUARTER, 0), vertex(0, QUARTER)])
        .collect();
    Mesh::new(vertices, faces).unwrap()
}

fn quad_mesh(textured: bool) -> Mesh {
    let corners = [(0, 0), (QUARTER, 0), (0, QUARTER), (QUARTER, QUARTER)];
    let (vertices, faces) = if textured {
        let faces = FaceCounts {
            textured_quads: 1,
            ..Default::default()
        };
        (corners.map(|(x, y)| textured_vertex(x, y)).to_vec(), faces)
    } else {
        let faces = FaceCounts {
            untextured_quads: 1,
            ..Default::default()
        };
        (corners.map(|(x, y)| vertex(x, y)).to_vec(), faces)
    };
    let mut mesh = Mesh::new(vertices, faces).unwrap();
    mesh.subdivide = textured;
    mesh
}

fn camera_at_origin() -> Camera {
    let mut camera = Camera::new(Vec3::ZERO, Angle::ZERO, Angle::ZERO);
    camera.update_view(&Trig::new());
    camera
}

fn only_primitive(renderer: &Renderer) -> Primitive {
    let frame = renderer.frames().current();
    assert_eq!(frame.len(), 1);
    let (_, primitive) = frame.draw_order().next().unwrap();
    *primitive
}

// ============================================================================
// Ordering table
// ============================================================================

fn handles(count: usize) -> (PrimitiveArena, Vec<PrimHandle>) {
    let mut arena = PrimitiveArena::new(4096, 7);
    let handles = (0..count)
        .map(|_| arena.allocate(Line::default()).unwrap())
        .collect();
    (arena, handles)
}

#[test]
fn test_ordering_table_lifo_within_bucket() {
    let (_, h) = handles(3);
    let mut ot = OrderingTable::default();
    for &handle in &h {
        ot.insert(handle, 10).unwrap();
    }
    assert_eq!(ot.bucket(10).collect::<Vec<_>>(), vec![h[2], h[1], h[0]]);
}

#[test]
fn test_ordering_table_far_to_near() {
    let (_, h) = handles(3);
    let mut ot = OrderingTable::default();
    ot.insert(h[0], 5).unwrap();
    ot.insert(h[1], 4000).unwrap();
    ot.insert(h[2], 0).unwrap();
    let order: Vec<_> = ot.iter().collect();
    assert_eq!(order, vec![(4000, h[1]), (5, h[0]), (0, h[2])]);
}

#[test]
fn test_ordering_table_rejects_out_of_range() {
    let (_, h) = handles(1);
    let mut ot = OrderingTable::default();
    assert_eq!(
        ot.insert(h[0], -1),
        Err(RenderError::DepthOutOfRange { z: -1, size: OT_SIZE })
    );
    assert!(ot.insert(h[0], OT_SIZE as i32).is_err());
    assert!(ot.insert(h[0], OT_SIZE as i32 - 1).is_ok());
    assert_eq!(ot.len(), 1);

    ot.clear();
    assert!(ot.is_empty());
    assert_eq!(ot.iter().count(), 0);
}

// ============================================================================
// Arena
// ============================================================================

#[test]
fn test_arena_overflow_leaves_arena_unchanged() {
    // 28 bytes per gouraud triangle
    let mut arena = PrimitiveArena::new(60, 0);
    arena.allocate(GouraudTriangle::default()).unwrap();
    arena.allocate(GouraudTriangle::default()).unwrap();
    assert_eq!(
        arena.allocate(GouraudTriangle::default()),
        Err(RenderError::ArenaFull {
            used: 56,
            capacity: 60,
            requested: 28,
        })
    );
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.used_bytes(), 56);

    assert!(arena.allocate(Line::default()).is_err());

    // a smaller primitive can still use the tail
    let mut arena = PrimitiveArena::new(72, 0);
    arena.allocate(GouraudTriangle::default()).unwrap();
    arena.allocate(GouraudTriangle::default()).unwrap();
    assert!(arena.allocate(Line::default()).is_ok());
}

#[test]
fn test_stale_handle_detected() {
    let mut arena = PrimitiveArena::new(1024, 2);
    let handle = arena.allocate(FlatTriangle::default()).unwrap();
    assert!(arena.get(handle).is_ok());

    arena.reset(4);
    arena.allocate(FlatTriangle::default()).unwrap();
    assert_eq!(
        arena.get(handle),
        Err(RenderError::StaleHandle { handle: 2, current: 4 })
    );
}

#[test]
fn test_fragment_sizes() {
    assert_eq!(Primitive::from(FlatTriangle::default()).fragment_bytes(), 20);
    assert_eq!(Primitive::from(GouraudTexturedQuad::default()).fragment_bytes(), 52);
    assert_eq!(Primitive::from(Line::default()).fragment_bytes(), 16);
    assert_eq!(Primitive::from(Pixel::default()).fragment_bytes(), 12);
}

// ============================================================================
// Double buffering
// ============================================================================

#[test]
fn test_frame_buffer_checks_depth_before_allocating() {
    let mut frame = FrameBuffer::new(1024, 0);
    assert!(frame.insert(OT_SIZE as i32, Line::default()).is_err());
    assert!(frame.insert(-3, Line::default()).is_err());
    assert_eq!(frame.arena().used_bytes(), 0);
    assert!(frame.insert(3, Line::default()).is_ok());
    assert_eq!(frame.len(), 1);
}

#[test]
fn test_double_buffer_isolation() {
    let mut buffers = DoubleBuffer::new(1024);

    buffers.begin_frame();
    let first = buffers.current_mut().insert(10, Line::default()).unwrap();
    buffers.flip();

    // writing parity 1 leaves parity 0 intact
    buffers.begin_frame();
    assert_eq!(buffers.parity(), 1);
    buffers.current_mut().insert(20, FlatTriangle::default()).unwrap();
    assert_eq!(buffers.get(0).len(), 1);
    assert!(buffers.get(0).get(first).is_ok());
    buffers.flip();

    // only the parity being written is reset
    buffers.begin_frame();
    assert_eq!(buffers.parity(), 0);
    assert!(buffers.current().is_empty());
    assert_eq!(buffers.get(1).len(), 1);
    assert!(matches!(
        buffers.current().get(first),
        Err(RenderError::StaleHandle { .. })
    ));
}

#[test]
fn test_epochs_never_repeat() {
    let mut buffers = DoubleBuffer::new(64);
    let mut epochs = Vec::new();
    for _ in 0..6 {
        buffers.begin_frame();
        epochs.push(buffers.current().arena().epoch());
        buffers.flip();
    }
    let mut unique = epochs.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), epochs.len());
}

// ============================================================================
// Fog
// ============================================================================

#[test]
fn test_depth_cue_coefficients() {
    let cue = DepthCue::from_near_far(FixedPoint::from_int(2), FixedPoint::from_int(6), 250);
    assert_eq!(cue, DepthCue { dqa: -12582, dqb: 25_165_824 });
}

#[test]
fn test_interp_factor_spans_near_to_far() {
    let renderer = renderer();
    assert_eq!(renderer.calc_interp_factor(2 * 4096), 0);
    assert_eq!(renderer.calc_interp_factor(4 * 4096), 3072);
    assert_eq!(renderer.calc_interp_factor(6 * 4096), 4095);
    assert_eq!(renderer.calc_interp_factor(20 * 4096), 4096);
    assert_eq!(renderer.calc_interp_factor(0), 0);
}

#[test]
fn test_set_fov_recomputes_fog() {
    let mut renderer = renderer();
    let before = renderer.depth_cue();
    renderer.set_fov(500);
    assert_eq!(renderer.projection_distance(), 500);
    assert_eq!(renderer.depth_cue().dqb, before.dqb);
    assert_eq!(renderer.depth_cue().dqa, -6291);
    assert_eq!(renderer.kernel().depth_cue(), (-6291, before.dqb));
}

#[test]
fn test_inverted_fog_range_ignored() {
    let mut renderer = renderer();
    let before = renderer.depth_cue();
    renderer.set_fog_near_far(FixedPoint::from_int(5), FixedPoint::from_int(1));
    assert_eq!(renderer.depth_cue(), before);
}

#[test]
fn test_fog_blends_vertex_colors() {
    let far = Color::rgb(0, 0, 255);
    let mut renderer = renderer_with(|c| {
        c.fog.enabled = true;
        c.fog.color = [0, 0, 255];
    });
    let mesh = triangle_mesh();

    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&mesh);
    place_at_depth(&mut renderer, 7.0);
    renderer.draw_mesh(&mesh);

    let mut sink = RecordingSink::default();
    let stats = renderer.end_frame(&mut sink);
    assert_eq!(stats.submitted, 2);

    let (clear, primitives) = &sink.frames[0];
    assert_eq!(clear.color, far);
    let colors: Vec<_> = primitives
        .iter()
        .map(|(_, p)| match p {
            Primitive::GouraudTriangle(t) => t.colors,
            other => panic!("unexpected primitive {other:?}"),
        })
        .collect();
    // far to near: the fogged triangle first
    assert_eq!(colors[0], [far; 3]);
    assert_eq!(colors[1], [Color::rgb(200, 100, 50); 3]);
}

// ============================================================================
// Triangles and quads
// ============================================================================

#[test]
fn test_front_face_accepted() {
    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&triangle_mesh());

    assert_eq!(renderer.stats().submitted, 1);
    let (z, _) = renderer.frames().current().draw_order().next().unwrap();
    assert_eq!(z, 1023);
    assert_eq!(
        only_primitive(&renderer),
        Primitive::GouraudTriangle(GouraudTriangle {
            points: [
                ScreenPoint::new(160, 120),
                ScreenPoint::new(222, 120),
                ScreenPoint::new(160, 182),
            ],
            colors: [Color::rgb(200, 100, 50); 3],
        })
    );
}

#[test]
fn test_backface_rejected() {
    let faces = FaceCounts {
        untextured_triangles: 1,
        ..Default::default()
    };
    let mesh = Mesh::new(vec![vertex(0, 0), vertex(0, QUARTER), vertex(QUARTER, 0)], faces).unwrap();

    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&mesh);

    let stats = renderer.stats();
    assert_eq!(stats.backfaces, 1);
    assert_eq!(stats.submitted, 0);
    assert!(renderer.frames().current().is_empty());
}

#[test]
fn test_flat_mesh_uses_first_color() {
    let mut mesh = triangle_mesh();
    mesh.flat = true;
    mesh.vertices[1].color = Color::WHITE;

    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&mesh);
    assert!(matches!(
        only_primitive(&renderer),
        Primitive::FlatTriangle(FlatTriangle { color, .. }) if color == Color::rgb(200, 100, 50)
    ));
}

#[test]
fn test_zero_depth_rejected() {
    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 0.0);
    renderer.draw_mesh(&triangle_mesh());
    assert_eq!(renderer.stats().depth_rejected, 1);
    assert_eq!(renderer.stats().submitted, 0);
}

#[test]
fn test_negative_biased_depth_rejected() {
    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.set_bias(-2000);
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&triangle_mesh());
    assert_eq!(renderer.stats().depth_rejected, 1);

    renderer.set_bias(-1023);
    renderer.draw_mesh(&triangle_mesh());
    assert_eq!(renderer.stats().submitted, 1);
    let (z, _) = renderer.frames().current().draw_order().next().unwrap();
    assert_eq!(z, 0);
}

#[test]
fn test_depth_past_table_rejected() {
    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.set_bias(OT_SIZE as i32 - 1023);
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&triangle_mesh());
    assert_eq!(renderer.stats().depth_rejected, 1);
    assert!(renderer.frames().current().arena().is_empty());
}

#[test]
fn test_face_bias_read_from_third_vertex() {
    let mut mesh = triangle_mesh();
    mesh.vertices[0].face_bias = 500;
    mesh.vertices[2].face_bias = 100;

    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.set_bias(10);
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&mesh);

    let (z, _) = renderer.frames().current().draw_order().next().unwrap();
    assert_eq!(z, 1023 + 10 + 100);
}

#[test]
fn test_face_bias_counts_toward_range_check() {
    let mut mesh = triangle_mesh();
    mesh.vertices[2].face_bias = -1024;

    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&mesh);
    assert_eq!(renderer.stats().depth_rejected, 1);

    renderer.set_bias(1);
    renderer.draw_mesh(&mesh);
    assert_eq!(renderer.stats().submitted, 1);
    let (z, _) = renderer.frames().current().draw_order().next().unwrap();
    assert_eq!(z, 0);
}

#[test]
fn test_double_sided_triangle_keeps_back_face() {
    let faces = FaceCounts {
        untextured_triangles: 1,
        ..Default::default()
    };
    let vertices = vec![
        vertex(0, 0),
        vertex(0, QUARTER),
        vertex(QUARTER, 0).with_face_bias(DOUBLE_SIDED),
    ];
    let mesh = Mesh::new(vertices, faces).unwrap();

    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&mesh);

    let stats = renderer.stats();
    assert_eq!(stats.backfaces, 0);
    assert_eq!(stats.submitted, 1);
    let (z, primitive) = renderer.frames().current().draw_order().next().unwrap();
    // the double-sided marker is also a bias of 2
    assert_eq!(z, 1023 + 2);
    assert_eq!(
        primitive.points(),
        &[
            ScreenPoint::new(160, 120),
            ScreenPoint::new(160, 182),
            ScreenPoint::new(222, 120),
        ]
    );
}

#[test]
fn test_double_sided_quad_keeps_back_face() {
    let faces = FaceCounts {
        untextured_quads: 1,
        ..Default::default()
    };
    let corners = [(0, 0), (0, QUARTER), (QUARTER, 0), (QUARTER, QUARTER)];
    let mut mesh = Mesh::new(corners.map(|(x, y)| vertex(x, y)).to_vec(), faces).unwrap();

    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&mesh);
    assert_eq!(renderer.stats().backfaces, 1);
    assert!(renderer.frames().current().is_empty());

    mesh.vertices[2].face_bias = DOUBLE_SIDED;
    renderer.draw_mesh(&mesh);
    assert_eq!(renderer.stats().backfaces, 1);
    assert_eq!(renderer.stats().submitted, 1);
    let (z, primitive) = renderer.frames().current().draw_order().next().unwrap();
    assert_eq!(z, 1024 + 2);
    assert!(matches!(primitive, Primitive::GouraudQuad(_)));
}

#[test]
fn test_quad_corners_in_strip_order() {
    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&quad_mesh(false));

    let (z, primitive) = renderer.frames().current().draw_order().next().unwrap();
    assert_eq!(z, 1024);
    assert_eq!(
        primitive.points(),
        &[
            ScreenPoint::new(160, 120),
            ScreenPoint::new(222, 120),
            ScreenPoint::new(160, 182),
            ScreenPoint::new(222, 182),
        ]
    );
    assert!(matches!(primitive, Primitive::GouraudQuad(_)));
}

#[test]
fn test_arena_full_drops_and_counts() {
    let mut renderer = renderer_with(|c| c.memory.primitive_buffer_bytes = 60);
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&triangles_mesh(4));

    let stats = renderer.stats();
    assert_eq!(stats.submitted, 2);
    assert_eq!(stats.dropped, 2);
    assert_eq!(renderer.frames().current().len(), 2);

    // the next frame of the same parity starts empty again
    let mut sink = RecordingSink::default();
    renderer.end_frame(&mut sink);
    renderer.begin_frame();
    renderer.end_frame(&mut sink);
    renderer.begin_frame();
    assert_eq!(renderer.stats(), FrameStats::default());
    assert!(renderer.frames().current().is_empty());
}

// ============================================================================
// Subdivision
// ============================================================================

#[test]
fn test_near_quad_split_4x4() {
    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&quad_mesh(true));

    let stats = renderer.stats();
    assert_eq!(stats.subdivided, 1);
    assert_eq!(stats.submitted, 16);
    assert!(
        renderer
            .frames()
            .current()
            .draw_order()
            .all(|(_, p)| matches!(p, Primitive::GouraudTexturedQuad(_)))
    );
}

#[test]
fn test_mid_quad_split_2x2() {
    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 2.0);
    renderer.draw_mesh(&quad_mesh(true));

    let stats = renderer.stats();
    assert_eq!(stats.subdivided, 1);
    assert_eq!(stats.submitted, 4);
}

#[test]
fn test_far_quad_not_split() {
    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 3.0);
    renderer.draw_mesh(&quad_mesh(true));

    assert_eq!(renderer.stats().subdivided, 0);
    let Primitive::GouraudTexturedQuad(quad) = only_primitive(&renderer) else {
        panic!("expected a textured quad");
    };
    assert_eq!(quad.uvs, [Uv::new(0, 0), Uv::new(64, 0), Uv::new(0, 64), Uv::new(64, 64)]);
}

#[test]
fn test_subdivision_disabled() {
    let mut renderer = renderer_with(|c| c.subdivision.enabled = false);
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&quad_mesh(true));
    assert_eq!(renderer.stats().subdivided, 0);
    assert_eq!(renderer.stats().submitted, 1);
}

#[test]
fn test_sub_quads_inherit_face_bias() {
    let depths = |face_bias: i16| {
        let mut mesh = quad_mesh(true);
        mesh.vertices[2].face_bias = face_bias;
        let mut renderer = renderer();
        renderer.begin_frame();
        place_at_depth(&mut renderer, 2.0);
        renderer.draw_mesh(&mesh);
        assert_eq!(renderer.stats().submitted, 4);
        renderer.frames().current().draw_order().map(|(z, _)| z).collect::<Vec<_>>()
    };
    let shifted: Vec<_> = depths(0).into_iter().map(|z| z + 100).collect();
    assert_eq!(depths(100), shifted);
}

// ============================================================================
// Objects and camera
// ============================================================================

fn triangle_object(z: f64) -> ModelObject {
    let model = Model::new(vec![triangle_mesh()], Armature::default());
    ModelObject::new(Object::new(Vec3::from_f64(0.0, 0.0, z)), Arc::new(model))
}

#[test]
fn test_view_rotation_paths_agree() {
    let camera = camera_at_origin();
    let object = triangle_object(1.0);
    let expected = [
        ScreenPoint::new(160, 120),
        ScreenPoint::new(97, 120),
        ScreenPoint::new(160, 97),
    ];

    for set_view_rot in [true, false] {
        let mut renderer = renderer();
        renderer.begin_frame();
        if !set_view_rot {
            renderer.load_view_rotation(&camera);
        }
        renderer.draw_model_object(&object, &camera, set_view_rot);
        assert_eq!(only_primitive(&renderer).points(), &expected);
    }
}

#[test]
fn test_distant_objects_culled() {
    let camera = camera_at_origin();
    let renderer_ref = renderer();
    assert!(!renderer_ref.should_cull_object(&triangle_object(2.0).object, &camera));
    assert!(renderer_ref.should_cull_object(&triangle_object(3.0).object, &camera));

    let mut renderer = renderer_ref;
    renderer.begin_frame();
    renderer.draw_model_object(&triangle_object(3.0), &camera, true);
    assert_eq!(renderer.stats().culled_objects, 1);
    assert!(renderer.frames().current().is_empty());
}

#[test]
fn test_animated_mesh_follows_joint() {
    let camera = camera_at_origin();
    let mut mesh = triangle_mesh();
    mesh.joint_id = 2;
    let model = Arc::new(Model::new(vec![mesh], Armature::test_skeleton()));
    let object = AnimatedModelObject::new(
        Object::new(Vec3::from_f64(0.0, 0.0, 1.0)),
        model,
        SkeletonAnimator::default(),
    );

    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.draw_animated_model_object(&object, &camera);
    // head sits 0.375 above the object origin, screen Y points down
    assert_eq!(only_primitive(&renderer).points()[0], ScreenPoint::new(160, 26));
}

// ============================================================================
// Frame protocol
// ============================================================================

#[test]
fn test_draw_outside_frame_ignored() {
    let mut renderer = renderer();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&triangle_mesh());
    assert_eq!(renderer.stats(), FrameStats::default());
    assert!(renderer.frames().current().is_empty());
}

#[test]
fn test_end_without_begin_ignored() {
    let mut renderer = renderer();
    let mut sink = RecordingSink::default();
    assert_eq!(renderer.end_frame(&mut sink), FrameStats::default());
    assert!(sink.frames.is_empty());
    assert_eq!(renderer.frames().parity(), 0);
}

#[test]
fn test_double_begin_ignored() {
    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&triangle_mesh());
    renderer.begin_frame();

    assert_eq!(renderer.frames().frame_count(), 1);
    assert_eq!(renderer.stats().submitted, 1);
    assert_eq!(renderer.frames().current().len(), 1);
}

#[test]
fn test_end_frame_hands_over_and_flips() {
    let mut renderer = renderer_with(|c| c.screen.clear_color = [10, 20, 30]);
    let mut sink = RecordingSink::default();

    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_mesh(&triangle_mesh());
    let stats = renderer.end_frame(&mut sink);
    assert_eq!(stats.submitted, 1);
    assert_eq!(renderer.frames().parity(), 1);
    assert!(!renderer.in_frame());

    renderer.begin_frame();
    renderer.end_frame(&mut sink);

    assert_eq!(sink.frames.len(), 2);
    let (clear, primitives) = &sink.frames[0];
    assert_eq!(
        *clear,
        FastFill {
            origin: ScreenPoint::new(0, 0),
            width: 320,
            height: 240,
            color: Color::rgb(10, 20, 30),
        }
    );
    assert_eq!(primitives.len(), 1);
    assert!(sink.frames[1].1.is_empty());
    // the first frame's parity is untouched by the second frame
    assert_eq!(renderer.frames().get(0).len(), 1);
}

// ============================================================================
// Debug lines
// ============================================================================

#[test]
fn test_debug_line_drawn_last() {
    let mut renderer = renderer();
    renderer.begin_frame();
    place_at_depth(&mut renderer, 1.0);
    renderer.draw_line_local_space(Vec3::ZERO, Vec3::from_f64(0.25, 0.0, 0.0), Color::WHITE);
    renderer.draw_mesh(&triangle_mesh());

    let order: Vec<_> = renderer.frames().current().draw_order().collect();
    assert_eq!(order.len(), 2);
    assert!(matches!(order[0].1, Primitive::GouraudTriangle(_)));
    assert_eq!(order[1].0, 0);
    assert_eq!(
        *order[1].1,
        Primitive::Line(Line {
            points: [ScreenPoint::new(160, 120), ScreenPoint::new(222, 120)],
            color: Color::WHITE,
        })
    );
}

#[test]
fn test_object_axes_and_armature_lines() {
    let camera = camera_at_origin();
    let model = Arc::new(Model::new(Vec::new(), Armature::test_skeleton()));
    let object = AnimatedModelObject::new(
        Object::new(Vec3::from_f64(0.0, 0.0, 1.0)),
        model,
        SkeletonAnimator::default(),
    );

    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.draw_object_axes(&object.object, &camera);
    assert_eq!(renderer.stats().submitted, 3);

    renderer.draw_armature(&object, &camera);
    assert_eq!(renderer.stats().submitted, 8);
    assert!(renderer.frames().current().draw_order().all(|(z, p)| z == 0 && matches!(p, Primitive::Line(_))));
}

#[test]
fn test_world_space_line_in_debug_bucket() {
    let camera = camera_at_origin();
    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.draw_line_world_space(
        &camera,
        Vec3::from_f64(0.0, 0.0, 1.0),
        Vec3::from_f64(0.25, 0.0, 1.0),
        Color::WHITE,
        false,
    );

    let (z, primitive) = renderer.frames().current().draw_order().next().unwrap();
    assert_eq!(z, 0);
    assert_eq!(
        *primitive,
        Primitive::Line(Line {
            points: [ScreenPoint::new(160, 120), ScreenPoint::new(97, 120)],
            color: Color::WHITE,
        })
    );
}

#[test]
fn test_world_space_point_in_debug_bucket() {
    let camera = camera_at_origin();
    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.load_view_rotation(&camera);
    renderer.draw_point_world_space(&camera, Vec3::from_f64(0.25, 0.0, 1.0), Color::WHITE, true);

    let (z, primitive) = renderer.frames().current().draw_order().next().unwrap();
    assert_eq!(z, 0);
    assert_eq!(
        *primitive,
        Primitive::Pixel(Pixel {
            position: ScreenPoint::new(97, 120),
            color: Color::WHITE,
        })
    );
}

#[test]
fn test_aabb_draws_twelve_edges() {
    let camera = camera_at_origin();
    let aabb = Aabb::new(Vec3::from_f64(-0.25, -0.25, 1.0), Vec3::from_f64(0.25, 0.25, 1.5));
    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.draw_aabb(&camera, &aabb, Color::WHITE);

    let order: Vec<_> = renderer.frames().current().draw_order().collect();
    assert_eq!(order.len(), 12);
    assert!(order.iter().all(|(z, p)| *z == 0 && matches!(p, Primitive::Line(_))));
    // the first edge starts at the min corner and comes out of the bucket last
    let (_, first_edge) = order[11];
    assert_eq!(first_edge.points()[0], ScreenPoint::new(222, 182));
}

#[test]
fn test_circle_draws_sixteen_segments() {
    let camera = camera_at_origin();
    let circle = Circle::new(Vec3::from_f64(0.0, 0.0, 2.0), FixedPoint::from_f64(0.25));
    let mut renderer = renderer();
    renderer.begin_frame();
    renderer.draw_circle(&camera, &circle, Color::rgb(0, 255, 0));

    let order: Vec<_> = renderer.frames().current().draw_order().collect();
    assert_eq!(order.len(), 16);
    assert!(order.iter().all(|(z, p)| *z == 0 && matches!(p, Primitive::Line(_))));
    // angle zero sits straight ahead of the center
    let (_, first_segment) = order[15];
    assert_eq!(first_segment.points()[0], ScreenPoint::new(160, 120));
}

#[test]
fn test_world_space_overlays_need_open_frame() {
    let camera = camera_at_origin();
    let mut renderer = renderer();
    renderer.draw_point_world_space(&camera, Vec3::from_f64(0.0, 0.0, 1.0), Color::WHITE, false);
    renderer.draw_circle(&camera, &Circle::new(Vec3::ZERO, FixedPoint::ONE), Color::WHITE);
    assert_eq!(renderer.stats().submitted, 0);
}

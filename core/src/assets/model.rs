//! Model blob format.
//!
//! # Layout
//! ```text
//! u16 mesh_count
//! mesh_count × mesh:
//!   0x00: flags u16        bit 0 subdivide, bit 1 flat
//!   0x02: joint_id u8
//!   0x03: pad u8
//!   0x04: face counts 4 × u16 (tris, quads, textured tris, textured quads)
//!   0x0C: tpage u16
//!   0x0E: clut u16
//!   0x10: vertices (3·tris + 4·quads + 3·textured tris + 4·textured quads) × 16 bytes
//!         i16 x, y, z, pad | u8 u, v, i16 face_bias | u8 r, g, b, pad
//! u16 joint_count
//! joint_count × joint (20 bytes):
//!   i16 tx, ty, tz, pad | i16 w, x, y, z | u8 first_child, next_sibling, u16 pad
//! ```

use psxrender_shared::{FixedPoint, PackedVec3, Quaternion, Short, Vec3};

use super::reader::{ByteReader, ByteWriter};
use crate::armature::{Armature, Joint, JointId, MAX_JOINTS};
use crate::error::AssetError;
use crate::model::{FaceCounts, Mesh, Model, Vertex};
use crate::render::{ClutIndex, Color, TextureInfo, TexturePage, Uv};
use crate::transform::Transform;

const FLAG_SUBDIVIDE: u16 = 1 << 0;
const FLAG_FLAT: u16 = 1 << 1;

/// Parse and validate a model.
///
/// The armature is checked for a well-formed hierarchy and its bind-pose
/// global transforms are computed. Skinned meshes must reference existing
/// joints.
pub fn load_model(bytes: &[u8]) -> Result<Model, AssetError> {
    let mut r = ByteReader::new(bytes);

    let mesh_count = r.u16()? as usize;
    let mut meshes = Vec::with_capacity(mesh_count);
    for _ in 0..mesh_count {
        meshes.push(read_mesh(&mut r)?);
    }

    let joint_count = r.u16()? as usize;
    if joint_count > MAX_JOINTS {
        return Err(AssetError::TooManyJoints(joint_count));
    }
    let mut joints = Vec::with_capacity(joint_count);
    for id in 0..joint_count {
        joints.push(read_joint(&mut r, id as JointId)?);
    }
    r.finish()?;

    let mut armature = Armature::new(joints);
    armature.validate()?;
    if !armature.is_empty() {
        for (index, mesh) in meshes.iter().enumerate() {
            if mesh.joint_id as usize >= armature.len() {
                return Err(AssetError::MeshJointOutOfRange {
                    mesh: index,
                    joint: mesh.joint_id,
                    count: armature.len(),
                });
            }
        }
    }
    armature.calculate_transforms();

    tracing::debug!(meshes = meshes.len(), joints = armature.len(), "loaded model");
    Ok(Model::new(meshes, armature))
}

fn read_mesh(r: &mut ByteReader<'_>) -> Result<Mesh, AssetError> {
    let flags = r.u16()?;
    let joint_id = r.u8()?;
    r.skip(1)?;
    let faces = FaceCounts {
        untextured_triangles: r.u16()?,
        untextured_quads: r.u16()?,
        textured_triangles: r.u16()?,
        textured_quads: r.u16()?,
    };
    let texture = TextureInfo {
        tpage: TexturePage(r.u16()?),
        clut: ClutIndex(r.u16()?),
    };

    let vertex_count = faces.vertex_count();
    let mut vertices = Vec::with_capacity(vertex_count.min(r.remaining() / 16));
    for _ in 0..vertex_count {
        vertices.push(read_vertex(r)?);
    }

    Ok(Mesh {
        vertices,
        faces,
        joint_id,
        subdivide: flags & FLAG_SUBDIVIDE != 0,
        flat: flags & FLAG_FLAT != 0,
        texture,
    })
}

fn read_vertex(r: &mut ByteReader<'_>) -> Result<Vertex, AssetError> {
    let position = PackedVec3::from_raw(r.i16()?, r.i16()?, r.i16()?);
    r.skip(2)?;
    let uv = Uv::new(r.u8()?, r.u8()?);
    let face_bias = r.i16()?;
    let color = Color::rgb(r.u8()?, r.u8()?, r.u8()?);
    r.skip(1)?;
    Ok(Vertex::new(position, uv, color).with_face_bias(face_bias))
}

fn read_joint(r: &mut ByteReader<'_>, id: JointId) -> Result<Joint, AssetError> {
    let translation = PackedVec3::from_raw(r.i16()?, r.i16()?, r.i16()?).to_vec3();
    r.skip(2)?;
    let rotation = Quaternion::from_raw(r.i16()?, r.i16()?, r.i16()?, r.i16()?);
    let mut joint = Joint::new(id, Transform::new(translation, rotation));
    joint.first_child = r.u8()?;
    joint.next_sibling = r.u8()?;
    r.skip(2)?;
    Ok(joint)
}

/// Serialize a model. Joint translations are truncated to 4.12 shorts.
pub fn write_model(model: &Model) -> Vec<u8> {
    let mut w = ByteWriter::default();

    w.u16(model.meshes.len() as u16);
    for mesh in &model.meshes {
        let mut flags = 0;
        if mesh.subdivide {
            flags |= FLAG_SUBDIVIDE;
        }
        if mesh.flat {
            flags |= FLAG_FLAT;
        }
        w.u16(flags).u8(mesh.joint_id).u8(0);
        w.u16(mesh.faces.untextured_triangles)
            .u16(mesh.faces.untextured_quads)
            .u16(mesh.faces.textured_triangles)
            .u16(mesh.faces.textured_quads);
        w.u16(mesh.texture.tpage.0).u16(mesh.texture.clut.0);

        for v in &mesh.vertices {
            let p = v.position;
            w.i16(p.x.raw()).i16(p.y.raw()).i16(p.z.raw()).i16(0);
            w.u8(v.uv.u).u8(v.uv.v).i16(v.face_bias);
            w.u8(v.color.r).u8(v.color.g).u8(v.color.b).u8(0);
        }
    }

    w.u16(model.armature.len() as u16);
    for joint in &model.armature.joints {
        write_short_vec(&mut w, joint.local_transform.translation);
        let q = joint.local_transform.rotation;
        w.i16(q.w.raw()).i16(q.x.raw()).i16(q.y.raw()).i16(q.z.raw());
        w.u8(joint.first_child).u8(joint.next_sibling).u16(0);
    }

    w.into_bytes()
}

/// Three truncated shorts plus a zero pad.
pub(super) fn write_short_vec(w: &mut ByteWriter, v: Vec3) {
    let short = |c: FixedPoint| Short::from(c).raw();
    w.i16(short(v.x)).i16(short(v.y)).i16(short(v.z)).i16(0);
}

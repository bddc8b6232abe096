//! Mesh and model data.
//!
//! A mesh stores its vertices grouped by face kind in a fixed order:
//! untextured triangles, untextured quads, textured triangles, textured
//! quads. Each group contributes 3 or 4 consecutive vertices per face.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use psxrender_shared::PackedVec3;

use crate::armature::{Armature, JointId};
use crate::error::AssetError;
use crate::render::{Color, TextureInfo, Uv};

/// Face bias value that marks a face as double-sided.
pub const DOUBLE_SIDED: i16 = 2;

/// One mesh vertex, 16 bytes in the on-disk layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: PackedVec3,
    pub uv: Uv,
    /// Extra ordering depth for the face, read from the face's third
    /// vertex. [`DOUBLE_SIDED`] also disables backface rejection.
    pub face_bias: i16,
    pub color: Color,
    pub color_pad: u8,
}

impl Vertex {
    pub fn new(position: PackedVec3, uv: Uv, color: Color) -> Self {
        Self {
            position,
            uv,
            face_bias: 0,
            color,
            color_pad: 0,
        }
    }

    pub fn untextured(position: PackedVec3, color: Color) -> Self {
        Self::new(position, Uv::default(), color)
    }

    pub fn with_face_bias(mut self, face_bias: i16) -> Self {
        self.face_bias = face_bias;
        self
    }
}

/// Face group kinds in storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceGroup {
    UntexturedTriangles,
    UntexturedQuads,
    TexturedTriangles,
    TexturedQuads,
}

impl FaceGroup {
    pub const ALL: [Self; 4] = [
        Self::UntexturedTriangles,
        Self::UntexturedQuads,
        Self::TexturedTriangles,
        Self::TexturedQuads,
    ];

    pub const fn vertices_per_face(self) -> usize {
        match self {
            Self::UntexturedTriangles | Self::TexturedTriangles => 3,
            Self::UntexturedQuads | Self::TexturedQuads => 4,
        }
    }

    pub const fn is_textured(self) -> bool {
        matches!(self, Self::TexturedTriangles | Self::TexturedQuads)
    }
}

/// Face counts per group, in [`FaceGroup::ALL`] order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceCounts {
    pub untextured_triangles: u16,
    pub untextured_quads: u16,
    pub textured_triangles: u16,
    pub textured_quads: u16,
}

impl FaceCounts {
    pub fn get(&self, group: FaceGroup) -> usize {
        (match group {
            FaceGroup::UntexturedTriangles => self.untextured_triangles,
            FaceGroup::UntexturedQuads => self.untextured_quads,
            FaceGroup::TexturedTriangles => self.textured_triangles,
            FaceGroup::TexturedQuads => self.textured_quads,
        }) as usize
    }

    /// Vertices needed by all groups.
    pub fn vertex_count(&self) -> usize {
        FaceGroup::ALL
            .iter()
            .map(|&g| self.get(g) * g.vertices_per_face())
            .sum()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: FaceCounts,
    /// Joint this mesh follows in animated models
    pub joint_id: JointId,
    /// Split near textured quads into smaller quads
    pub subdivide: bool,
    /// Draw untextured faces with one color
    pub flat: bool,
    pub texture: TextureInfo,
}

impl Mesh {
    /// Build a mesh and check the vertex count against the face counts.
    pub fn new(vertices: Vec<Vertex>, faces: FaceCounts) -> Result<Self, AssetError> {
        let mesh = Self {
            vertices,
            faces,
            ..Default::default()
        };
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn validate(&self) -> Result<(), AssetError> {
        let expected = self.faces.vertex_count();
        if expected != self.vertices.len() {
            return Err(AssetError::VertexCountMismatch {
                expected,
                actual: self.vertices.len(),
            });
        }
        Ok(())
    }

    /// Vertex index range of a face group.
    pub fn group_range(&self, group: FaceGroup) -> Range<usize> {
        let mut start = 0;
        for g in FaceGroup::ALL {
            let len = self.faces.get(g) * g.vertices_per_face();
            if g == group {
                return start..start + len;
            }
            start += len;
        }
        start..start
    }

    /// Faces of a group as vertex slices.
    pub fn faces(&self, group: FaceGroup) -> impl Iterator<Item = &[Vertex]> + '_ {
        let range = self.group_range(group);
        self.vertices
            .get(range)
            .unwrap_or(&[])
            .chunks_exact(group.vertices_per_face())
    }

    pub fn face_count(&self) -> usize {
        FaceGroup::ALL.iter().map(|&g| self.faces.get(g)).sum()
    }
}

/// Meshes plus the bind-pose armature they are skinned to (possibly empty).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub armature: Armature,
}

impl Model {
    pub fn new(meshes: Vec<Mesh>, armature: Armature) -> Self {
        Self { meshes, armature }
    }

    pub fn is_animated(&self) -> bool {
        !self.armature.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(x: i16) -> Vertex {
        Vertex::untextured(PackedVec3::from_raw(x, 0, 0), Color::WHITE)
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 16);
        let v = Vertex::new(
            PackedVec3::from_raw(1, -2, 3),
            Uv::new(4, 5),
            Color::rgb(6, 7, 8),
        );
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        assert_eq!(&bytes[0..2], &1i16.to_le_bytes());
        assert_eq!(&bytes[2..4], &(-2i16).to_le_bytes());
        assert_eq!(bytes[8..10], [4, 5]);
        assert_eq!(bytes[12..15], [6, 7, 8]);
    }

    #[test]
    fn test_group_ranges_follow_storage_order() {
        let faces = FaceCounts {
            untextured_triangles: 1,
            untextured_quads: 2,
            textured_triangles: 0,
            textured_quads: 1,
        };
        let vertices = (0..faces.vertex_count() as i16).map(vertex).collect();
        let mesh = Mesh::new(vertices, faces).unwrap();

        assert_eq!(mesh.group_range(FaceGroup::UntexturedTriangles), 0..3);
        assert_eq!(mesh.group_range(FaceGroup::UntexturedQuads), 3..11);
        assert_eq!(mesh.group_range(FaceGroup::TexturedTriangles), 11..11);
        assert_eq!(mesh.group_range(FaceGroup::TexturedQuads), 11..15);

        let quads: Vec<_> = mesh.faces(FaceGroup::UntexturedQuads).collect();
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[1][0].position.x.raw(), 7);
        assert_eq!(mesh.face_count(), 4);
    }

    #[test]
    fn test_vertex_count_mismatch() {
        let faces = FaceCounts {
            untextured_triangles: 2,
            ..Default::default()
        };
        let err = Mesh::new(vec![vertex(0); 5], faces).unwrap_err();
        assert_eq!(err, AssetError::VertexCountMismatch { expected: 6, actual: 5 });
    }
}

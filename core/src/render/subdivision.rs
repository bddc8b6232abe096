//! Near-camera quad subdivision.
//!
//! Large textured quads close to the camera show affine texture warping.
//! Splitting them into smaller quads hides most of it. Corners use the
//! primitive ordering `A B / C D`: 0 top-left, 1 top-right, 2 bottom-left,
//! 3 bottom-right, so the center of a quad is the midpoint of its 0-3
//! diagonal.

use psxrender_shared::{PackedVec3, Short};

use super::primitives::{Color, Uv};
use crate::model::Vertex;

/// Model-space quad corner with its attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuadCorner {
    pub position: PackedVec3,
    pub uv: Uv,
    pub color: Color,
}

impl QuadCorner {
    /// Integer midpoint of every attribute.
    pub fn midpoint(&self, other: &Self) -> Self {
        let mid = |a: Short, b: Short| Short::from_raw(((a.raw() as i32 + b.raw() as i32) / 2) as i16);
        let (p, q) = (self.position, other.position);
        Self {
            position: PackedVec3::new(mid(p.x, q.x), mid(p.y, q.y), mid(p.z, q.z)),
            uv: self.uv.midpoint(other.uv),
            color: self.color.midpoint(other.color),
        }
    }
}

impl From<&Vertex> for QuadCorner {
    fn from(v: &Vertex) -> Self {
        Self {
            position: v.position,
            uv: v.uv,
            color: v.color,
        }
    }
}

pub type Quad = [QuadCorner; 4];

/// Split into four quads around the center.
///
/// Order: top-left, top-right, bottom-right, bottom-left.
pub fn split_2x2(q: &Quad) -> [Quad; 4] {
    let center = q[0].midpoint(&q[3]);
    let top = q[0].midpoint(&q[1]);
    let left = q[0].midpoint(&q[2]);
    let right = q[1].midpoint(&q[3]);
    let bottom = q[2].midpoint(&q[3]);
    [
        [q[0], top, left, center],
        [top, q[1], center, right],
        [center, right, bottom, q[3]],
        [left, center, q[2], bottom],
    ]
}

/// Split into sixteen quads: a 2x2 split of every 2x2 quarter.
pub fn split_4x4(q: &Quad) -> [Quad; 16] {
    let mut out = [[QuadCorner::default(); 4]; 16];
    for (quarter, chunk) in split_2x2(q).iter().zip(out.chunks_exact_mut(4)) {
        chunk.copy_from_slice(&split_2x2(quarter));
    }
    out
}

/// Subdivision level for a quad at ordering depth `z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubdivisionLevel {
    None,
    Split2x2,
    Split4x4,
}

impl SubdivisionLevel {
    pub fn for_depth(z: i32, level1_distance: u16, level2_distance: u16) -> Self {
        if z < level2_distance as i32 {
            Self::Split4x4
        } else if z < level1_distance as i32 {
            Self::Split2x2
        } else {
            Self::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(x: i16, y: i16, u: u8) -> QuadCorner {
        QuadCorner {
            position: PackedVec3::from_raw(x, y, 0),
            uv: Uv::new(u, u),
            color: Color::rgb(u, u, u),
        }
    }

    fn unit_quad() -> Quad {
        [corner(0, 0, 0), corner(64, 0, 64), corner(0, 64, 64), corner(64, 64, 128)]
    }

    #[test]
    fn test_2x2_shares_center() {
        let quads = split_2x2(&unit_quad());
        let center = PackedVec3::from_raw(32, 32, 0);
        assert_eq!(quads[0][3].position, center);
        assert_eq!(quads[1][2].position, center);
        assert_eq!(quads[2][0].position, center);
        assert_eq!(quads[3][1].position, center);
        assert_eq!(quads[0][3].uv, Uv::new(64, 64));
    }

    #[test]
    fn test_2x2_keeps_corner_layout() {
        for q in split_2x2(&unit_quad()) {
            // A is top-left and D bottom-right in every sub-quad
            assert!(q[0].position.x.raw() < q[3].position.x.raw());
            assert!(q[0].position.y.raw() < q[3].position.y.raw());
            assert_eq!(q[0].position.y, q[1].position.y);
            assert_eq!(q[0].position.x, q[2].position.x);
        }
    }

    #[test]
    fn test_4x4_covers_grid() {
        let quads = split_4x4(&unit_quad());
        let mut origins: Vec<_> = quads
            .iter()
            .map(|q| (q[0].position.x.raw(), q[0].position.y.raw()))
            .collect();
        origins.sort_unstable();
        origins.dedup();
        assert_eq!(origins.len(), 16);
        assert!(quads.iter().all(|q| q[3].position.x.raw() - q[0].position.x.raw() == 16));
    }

    #[test]
    fn test_midpoint_truncates_toward_zero() {
        let a = corner(-3, 0, 1);
        let b = corner(0, 0, 2);
        let m = a.midpoint(&b);
        assert_eq!(m.position.x.raw(), -1);
        assert_eq!(m.uv, Uv::new(1, 1));
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(SubdivisionLevel::for_depth(3000, 3000, 1500), SubdivisionLevel::None);
        assert_eq!(SubdivisionLevel::for_depth(2999, 3000, 1500), SubdivisionLevel::Split2x2);
        assert_eq!(SubdivisionLevel::for_depth(1499, 3000, 1500), SubdivisionLevel::Split4x4);
    }
}

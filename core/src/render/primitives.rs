//! Screen-space primitives.
//!
//! These are the records the renderer inserts into the ordering table. Their
//! byte sizes follow the GPU packet layout (one tag word plus the command
//! words) so arena accounting matches what the display hardware would need.

use bytemuck::{Pod, Zeroable};

/// 24-bit vertex or fill color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Unmodulated texture color
    pub const TEXTURE_NEUTRAL: Self = Self::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Per-channel integer midpoint.
    pub fn midpoint(self, other: Self) -> Self {
        let mid = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Self::rgb(mid(self.r, other.r), mid(self.g, other.g), mid(self.b, other.b))
    }
}

/// Projected vertex position in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct ScreenPoint {
    pub x: i16,
    pub y: i16,
}

impl ScreenPoint {
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }
}

/// Texel coordinate within a texture page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Uv {
    pub u: u8,
    pub v: u8,
}

impl Uv {
    pub const fn new(u: u8, v: u8) -> Self {
        Self { u, v }
    }

    pub fn midpoint(self, other: Self) -> Self {
        let mid = |a: u8, b: u8| ((a as u16 + b as u16) / 2) as u8;
        Self::new(mid(self.u, other.u), mid(self.v, other.v))
    }
}

/// Texture page attribute word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct TexturePage(pub u16);

/// Palette location for indexed textures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct ClutIndex(pub u16);

/// Texture binding shared by the corners of a textured primitive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureInfo {
    pub tpage: TexturePage,
    pub clut: ClutIndex,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatTriangle {
    pub points: [ScreenPoint; 3],
    pub color: Color,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GouraudTriangle {
    pub points: [ScreenPoint; 3],
    pub colors: [Color; 3],
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GouraudTexturedTriangle {
    pub points: [ScreenPoint; 3],
    pub colors: [Color; 3],
    pub uvs: [Uv; 3],
    pub texture: TextureInfo,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlatQuad {
    pub points: [ScreenPoint; 4],
    pub color: Color,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GouraudQuad {
    pub points: [ScreenPoint; 4],
    pub colors: [Color; 4],
}

/// Corners are in strip order: A, B, C, D with A-B-C and B-D-C triangles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GouraudTexturedQuad {
    pub points: [ScreenPoint; 4],
    pub colors: [Color; 4],
    pub uvs: [Uv; 4],
    pub texture: TextureInfo,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Line {
    pub points: [ScreenPoint; 2],
    pub color: Color,
}

/// Single-pixel dot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub position: ScreenPoint,
    pub color: Color,
}

/// Solid rectangle fill that ignores drawing state; used to clear the screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FastFill {
    pub origin: ScreenPoint,
    pub width: u16,
    pub height: u16,
    pub color: Color,
}

/// Any primitive that can live in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    FlatTriangle(FlatTriangle),
    GouraudTriangle(GouraudTriangle),
    GouraudTexturedTriangle(GouraudTexturedTriangle),
    FlatQuad(FlatQuad),
    GouraudQuad(GouraudQuad),
    GouraudTexturedQuad(GouraudTexturedQuad),
    Line(Line),
    Pixel(Pixel),
    FastFill(FastFill),
}

impl Primitive {
    /// GPU command words, excluding the ordering-table tag.
    pub const fn gpu_words(&self) -> usize {
        match self {
            Self::FlatTriangle(_) => 4,
            Self::GouraudTriangle(_) => 6,
            Self::GouraudTexturedTriangle(_) => 9,
            Self::FlatQuad(_) => 5,
            Self::GouraudQuad(_) => 8,
            Self::GouraudTexturedQuad(_) => 12,
            Self::Line(_) => 3,
            Self::Pixel(_) => 2,
            Self::FastFill(_) => 3,
        }
    }

    /// Arena footprint in bytes: tag word plus command words.
    pub const fn fragment_bytes(&self) -> usize {
        (self.gpu_words() + 1) * 4
    }

    pub fn points(&self) -> &[ScreenPoint] {
        match self {
            Self::FlatTriangle(p) => &p.points,
            Self::GouraudTriangle(p) => &p.points,
            Self::GouraudTexturedTriangle(p) => &p.points,
            Self::FlatQuad(p) => &p.points,
            Self::GouraudQuad(p) => &p.points,
            Self::GouraudTexturedQuad(p) => &p.points,
            Self::Line(p) => &p.points,
            Self::Pixel(p) => std::slice::from_ref(&p.position),
            Self::FastFill(p) => std::slice::from_ref(&p.origin),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($name:ident),* $(,)?) => {
        $(
            impl From<$name> for Primitive {
                fn from(p: $name) -> Self {
                    Self::$name(p)
                }
            }
        )*
    };
}

impl_from_primitive!(
    FlatTriangle,
    GouraudTriangle,
    GouraudTexturedTriangle,
    FlatQuad,
    GouraudQuad,
    GouraudTexturedQuad,
    Line,
    Pixel,
    FastFill,
);

//! Rendering: primitives, per-frame memory and the renderer pipeline.
//!
//! Each frame the [`Renderer`] projects faces through the geometry kernel
//! and links screen-space [`Primitive`]s into a depth-bucketed
//! [`OrderingTable`]. Finished frames go to a [`DisplaySink`].

mod arena;
mod debug;
mod fog;
mod frame;
mod ordering_table;
mod primitives;
mod renderer;
pub mod subdivision;

#[cfg(test)]
mod tests;

pub use arena::{PrimHandle, PrimitiveArena};
pub use debug::{Aabb, Circle};
pub use fog::DepthCue;
pub use frame::{DisplaySink, DoubleBuffer, FrameBuffer, FrameStats};
pub use ordering_table::{OT_SIZE, OrderingTable};
pub use primitives::{
    ClutIndex, Color, FastFill, FlatQuad, FlatTriangle, GouraudQuad, GouraudTexturedQuad,
    GouraudTexturedTriangle, GouraudTriangle, Line, Pixel, Primitive, ScreenPoint, TextureInfo, TexturePage, Uv,
};
pub use renderer::Renderer;

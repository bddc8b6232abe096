//! Geometry kernel
//!
//! The renderer never does perspective math itself. It loads matrices and
//! vertices into a [`GeometryKernel`], runs kernel operations, and reads the
//! screen coordinates, depths and colors back out. The register model is the
//! PS1 geometry coprocessor's, with every operation run at 4.12 precision
//! (`sf = 1`) and with negative IR values allowed (`lm = 0`).
//!
//! [`SoftGte`] is the software implementation used on every host.
//!
//! # Register units
//!
//! | Register | Format |
//! |---|---|
//! | rotation / light matrix | 4.12 shorts |
//! | translation | 20.12 (added to products before the shift) |
//! | V0..V2 | 4.12 shorts |
//! | screen offset | 16.16 pixels |
//! | SZ fifo, OTZ | unsigned 16-bit depth |
//! | IR0 | 0..=4096 depth-cue factor |

mod division;
pub mod math;
mod soft;


use psxrender_shared::{Matrix33, PackedVec3, Vec3};

use crate::render::{Color, ScreenPoint};

pub use division::{UNR_TABLE, unr_divide};
pub use soft::SoftGte;

/// Matrix operand of [`GeometryKernel::mvmva`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixSelect {
    Rotation,
    Light,
}

/// Vector operand of [`GeometryKernel::mvmva`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexSlot {
    V0,
    V1,
    V2,
    /// IR1..IR3 as a vector
    Ir,
}

/// Bits of the FLAG register the software model reports.
pub mod flag {
    /// Any error bit set
    pub const ERROR: u32 = 1 << 31;
    pub const IR1_SATURATED: u32 = 1 << 24;
    pub const IR2_SATURATED: u32 = 1 << 23;
    pub const IR3_SATURATED: u32 = 1 << 22;
    pub const COLOR_R_SATURATED: u32 = 1 << 21;
    pub const COLOR_G_SATURATED: u32 = 1 << 20;
    pub const COLOR_B_SATURATED: u32 = 1 << 19;
    /// SZ3 or OTZ clamped to 0..=0xFFFF
    pub const Z_SATURATED: u32 = 1 << 18;
    /// Projection divide overflowed (`H >= SZ3 * 2`)
    pub const DIVIDE_OVERFLOW: u32 = 1 << 17;
    pub const SX2_SATURATED: u32 = 1 << 14;
    pub const SY2_SATURATED: u32 = 1 << 13;
    pub const IR0_SATURATED: u32 = 1 << 12;

    /// Bits that feed [`ERROR`]
    pub(crate) const ERROR_MASK: u32 = 0x7F87_E000;
}

/// Register-level interface of the geometry coprocessor.
///
/// Load operations write registers, execute operations run one kernel
/// command, read operations return register contents. Reads never have side
/// effects.
pub trait GeometryKernel {
    // ------------------------------------------------------------------
    // Loads
    // ------------------------------------------------------------------

    /// Load the rotation matrix (each element truncated to 4.12 shorts).
    fn set_rotation(&mut self, m: &Matrix33);

    /// Load the light matrix. Used as a second matrix slot by [`math`].
    fn set_light(&mut self, m: &Matrix33);

    /// Load the translation vector.
    fn set_translation(&mut self, t: Vec3);

    /// Load the screen offset in 16.16 pixels.
    fn set_screen_offset(&mut self, ofx: i32, ofy: i32);

    /// Load the projection plane distance `H`.
    fn set_projection_distance(&mut self, h: u16);

    /// Load the depth-cue coefficients (`IR0 = (DQB + DQA * n) >> 12`).
    fn set_depth_cue(&mut self, dqa: i16, dqb: i32);

    /// Load the average-Z scale factors for [`avsz3`](Self::avsz3) and
    /// [`avsz4`](Self::avsz4).
    fn set_z_scale(&mut self, zsf3: i16, zsf4: i16);

    /// Load the far color that [`dpcs`](Self::dpcs) blends toward.
    fn set_far_color(&mut self, color: Color);

    /// Load one of V0..V2. `slot` is 0, 1 or 2.
    fn set_vertex(&mut self, slot: usize, v: PackedVec3);

    fn set_ir0(&mut self, ir0: i32);

    fn set_ir(&mut self, ir: [i32; 3]);

    fn set_rgb(&mut self, color: Color);

    /// Load the leading-zero-count source register.
    fn set_lzcs(&mut self, value: i32);

    // ------------------------------------------------------------------
    // Execute
    // ------------------------------------------------------------------

    /// Rotate, translate and project V0.
    fn rtps(&mut self);

    /// [`rtps`](Self::rtps) on V0, V1 and V2 in order.
    fn rtpt(&mut self);

    /// Signed doubled area of the three screen points into MAC0. Positive
    /// for clockwise winding on the y-down screen.
    fn nclip(&mut self);

    /// Average of SZ1..SZ3 into OTZ.
    fn avsz3(&mut self);

    /// Average of SZ0..SZ3 into OTZ.
    fn avsz4(&mut self);

    /// Matrix-vector multiply with optional translation.
    fn mvmva(&mut self, matrix: MatrixSelect, vertex: VertexSlot, translate: bool);

    /// Square IR1..IR3.
    fn sqr(&mut self);

    /// Scale IR1..IR3 by IR0.
    fn gpf(&mut self);

    /// Depth-cue the RGB register toward the far color by IR0.
    fn dpcs(&mut self);

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Entry `index` (0..=2) of the screen-XY fifo. SXY2 is the newest.
    fn sxy(&self, index: usize) -> ScreenPoint;

    /// Entry `index` (0..=3) of the screen-Z fifo. SZ3 is the newest.
    fn sz(&self, index: usize) -> u16;

    fn mac0(&self) -> i32;

    /// MAC1..MAC3. `index` is 1, 2 or 3.
    fn mac(&self, index: usize) -> i32;

    fn ir0(&self) -> i32;

    /// IR1..IR3. `index` is 1, 2 or 3.
    fn ir(&self, index: usize) -> i32;

    fn otz(&self) -> u16;

    /// Newest entry of the color fifo.
    fn rgb2(&self) -> Color;

    /// Leading zeros (or ones, for negative input) of LZCS.
    fn lzcr(&self) -> u32;

    fn flag(&self) -> u32;

    // ------------------------------------------------------------------
    // Provided
    // ------------------------------------------------------------------

    /// Load V0..V2 from three positions.
    fn set_triangle(&mut self, v0: PackedVec3, v1: PackedVec3, v2: PackedVec3) {
        self.set_vertex(0, v0);
        self.set_vertex(1, v1);
        self.set_vertex(2, v2);
    }

    /// IR1..IR3 as a vector.
    fn ir_vec3(&self) -> Vec3 {
        Vec3::from_raw(self.ir(1), self.ir(2), self.ir(3))
    }
}

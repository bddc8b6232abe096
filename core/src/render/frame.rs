//! Per-parity frame memory and the display hand-off.

use super::arena::{PrimHandle, PrimitiveArena};
use super::ordering_table::{OT_SIZE, OrderingTable};
use super::primitives::{FastFill, Primitive};
use crate::error::RenderError;

/// Ordering table plus the primitives it links, for one parity.
#[derive(Debug)]
pub struct FrameBuffer {
    ordering_table: OrderingTable,
    arena: PrimitiveArena,
}

impl FrameBuffer {
    pub fn new(arena_bytes: usize, epoch: u32) -> Self {
        Self {
            ordering_table: OrderingTable::new(OT_SIZE),
            arena: PrimitiveArena::new(arena_bytes, epoch),
        }
    }

    /// Allocate `primitive` and link it at depth `z`.
    ///
    /// The depth is checked first, so a rejected primitive never consumes
    /// arena space.
    pub fn insert(&mut self, z: i32, primitive: impl Into<Primitive>) -> Result<PrimHandle, RenderError> {
        if z < 0 || z as usize >= self.ordering_table.size() {
            return Err(RenderError::DepthOutOfRange {
                z,
                size: self.ordering_table.size(),
            });
        }
        let handle = self.arena.allocate(primitive)?;
        self.ordering_table.insert(handle, z)?;
        Ok(handle)
    }

    pub fn reset(&mut self, epoch: u32) {
        self.ordering_table.clear();
        self.arena.reset(epoch);
    }

    pub fn ordering_table(&self) -> &OrderingTable {
        &self.ordering_table
    }

    pub fn arena(&self) -> &PrimitiveArena {
        &self.arena
    }

    pub fn get(&self, handle: PrimHandle) -> Result<&Primitive, RenderError> {
        self.arena.get(handle)
    }

    /// Primitives in draw order (far to near) with their bucket.
    pub fn draw_order(&self) -> impl Iterator<Item = (usize, &Primitive)> + '_ {
        self.ordering_table
            .iter()
            .filter_map(move |(z, handle)| self.arena.get(handle).ok().map(|p| (z, p)))
    }

    pub fn len(&self) -> usize {
        self.ordering_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordering_table.is_empty()
    }
}

/// Two frame buffers used alternately.
///
/// While the display consumes one parity the renderer writes the other.
/// Resetting only touches the parity about to be written.
#[derive(Debug)]
pub struct DoubleBuffer {
    buffers: [FrameBuffer; 2],
    parity: usize,
    frame: u32,
}

impl DoubleBuffer {
    pub fn new(arena_bytes: usize) -> Self {
        Self {
            buffers: [FrameBuffer::new(arena_bytes, 0), FrameBuffer::new(arena_bytes, 1)],
            parity: 0,
            frame: 0,
        }
    }

    pub fn parity(&self) -> usize {
        self.parity
    }

    /// Frames started so far.
    pub fn frame_count(&self) -> u32 {
        self.frame
    }

    pub fn current(&self) -> &FrameBuffer {
        &self.buffers[self.parity]
    }

    pub fn current_mut(&mut self) -> &mut FrameBuffer {
        &mut self.buffers[self.parity]
    }

    pub fn get(&self, parity: usize) -> &FrameBuffer {
        &self.buffers[parity & 1]
    }

    /// Clear the current parity for a new frame.
    ///
    /// Each reset gets a fresh epoch, so handles from any earlier frame of
    /// either parity stop resolving.
    pub fn begin_frame(&mut self) {
        self.frame = self.frame.wrapping_add(1);
        let epoch = self.frame.wrapping_mul(2) | self.parity as u32;
        self.buffers[self.parity].reset(epoch);
    }

    pub fn flip(&mut self) {
        self.parity ^= 1;
    }
}

/// Consumer of finished frames (GPU chain submission on hardware).
pub trait DisplaySink {
    /// Receive the screen clear and the finished frame. Called once per
    /// frame before the parity flips.
    fn submit(&mut self, clear: &FastFill, frame: &FrameBuffer);
}

/// Per-frame pipeline counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Primitives linked into the ordering table
    pub submitted: u32,
    /// Faces rejected by winding
    pub backfaces: u32,
    /// Faces rejected by depth (zero, negative or past the table)
    pub depth_rejected: u32,
    /// Primitives lost to a full arena
    pub dropped: u32,
    /// Objects skipped by distance culling
    pub culled_objects: u32,
    /// Quads replaced by subdivided quads
    pub subdivided: u32,
}

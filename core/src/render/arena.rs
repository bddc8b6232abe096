//! Bump arena for one frame's primitives.

use super::primitives::Primitive;
use crate::error::RenderError;

/// Reference to a primitive in a [`PrimitiveArena`].
///
/// Carries the epoch the arena had when the primitive was allocated. After
/// the arena is reset the handle no longer resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrimHandle {
    index: u32,
    epoch: u32,
}

impl PrimHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }
}

/// Fixed-capacity primitive storage, reset in bulk once per frame.
///
/// Capacity is accounted in bytes using each primitive's GPU fragment size,
/// so a full arena here is a full primitive buffer on the console.
#[derive(Debug)]
pub struct PrimitiveArena {
    primitives: Vec<Primitive>,
    used_bytes: usize,
    capacity_bytes: usize,
    epoch: u32,
}

impl PrimitiveArena {
    pub fn new(capacity_bytes: usize, epoch: u32) -> Self {
        Self {
            primitives: Vec::with_capacity(capacity_bytes / 16),
            used_bytes: 0,
            capacity_bytes,
            epoch,
        }
    }

    /// Store a primitive.
    ///
    /// # Errors
    ///
    /// [`RenderError::ArenaFull`] if the fragment does not fit. The arena is
    /// left unchanged.
    pub fn allocate(&mut self, primitive: impl Into<Primitive>) -> Result<PrimHandle, RenderError> {
        let primitive = primitive.into();
        let requested = primitive.fragment_bytes();
        if self.used_bytes + requested > self.capacity_bytes {
            return Err(RenderError::ArenaFull {
                used: self.used_bytes,
                capacity: self.capacity_bytes,
                requested,
            });
        }

        let handle = PrimHandle {
            index: self.primitives.len() as u32,
            epoch: self.epoch,
        };
        self.primitives.push(primitive);
        self.used_bytes += requested;
        Ok(handle)
    }

    pub fn get(&self, handle: PrimHandle) -> Result<&Primitive, RenderError> {
        self.check(handle)?;
        self.primitives
            .get(handle.index as usize)
            .ok_or(RenderError::StaleHandle {
                handle: handle.epoch,
                current: self.epoch,
            })
    }

    pub fn get_mut(&mut self, handle: PrimHandle) -> Result<&mut Primitive, RenderError> {
        self.check(handle)?;
        let current = self.epoch;
        self.primitives
            .get_mut(handle.index as usize)
            .ok_or(RenderError::StaleHandle {
                handle: handle.epoch,
                current,
            })
    }

    fn check(&self, handle: PrimHandle) -> Result<(), RenderError> {
        if handle.epoch != self.epoch {
            return Err(RenderError::StaleHandle {
                handle: handle.epoch,
                current: self.epoch,
            });
        }
        Ok(())
    }

    /// Drop every primitive and start a new epoch.
    pub fn reset(&mut self, epoch: u32) {
        self.primitives.clear();
        self.used_bytes = 0;
        self.epoch = epoch;
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn capacity_bytes(&self) -> usize {
        self.capacity_bytes
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Primitives in allocation order.
    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }
}

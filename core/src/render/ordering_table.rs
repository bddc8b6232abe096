//! Depth-bucketed ordering table.

use super::arena::PrimHandle;
use crate::error::RenderError;

/// Number of depth buckets.
pub const OT_SIZE: usize = 8192;

const END: u32 = u32::MAX;

/// Array of singly linked lists, one per depth bucket.
///
/// Insertion pushes onto the bucket head. Iteration walks from the farthest
/// bucket to the nearest and, within a bucket, from the head, so the most
/// recent insertion at a depth is visited first.
#[derive(Debug)]
pub struct OrderingTable {
    heads: Box<[u32]>,
    entries: Vec<Link>,
}

#[derive(Clone, Copy, Debug)]
struct Link {
    handle: PrimHandle,
    next: u32,
}

impl OrderingTable {
    pub fn new(size: usize) -> Self {
        Self {
            heads: vec![END; size].into_boxed_slice(),
            entries: Vec::new(),
        }
    }

    /// Number of buckets.
    pub fn size(&self) -> usize {
        self.heads.len()
    }

    /// Number of inserted entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Link `handle` at the head of bucket `z`.
    ///
    /// # Errors
    ///
    /// [`RenderError::DepthOutOfRange`] unless `0 <= z < size`.
    pub fn insert(&mut self, handle: PrimHandle, z: i32) -> Result<(), RenderError> {
        let bucket = usize::try_from(z)
            .ok()
            .filter(|&b| b < self.heads.len())
            .ok_or(RenderError::DepthOutOfRange {
                z,
                size: self.heads.len(),
            })?;

        let index = self.entries.len() as u32;
        self.entries.push(Link {
            handle,
            next: self.heads[bucket],
        });
        self.heads[bucket] = index;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.heads.fill(END);
        self.entries.clear();
    }

    /// Entries of one bucket, head first.
    pub fn bucket(&self, z: usize) -> impl Iterator<Item = PrimHandle> + '_ {
        let mut cursor = self.heads.get(z).copied().unwrap_or(END);
        std::iter::from_fn(move || {
            let link = self.entries.get(cursor as usize)?;
            cursor = link.next;
            Some(link.handle)
        })
    }

    /// All entries as `(bucket, handle)`, far to near.
    pub fn iter(&self) -> impl Iterator<Item = (usize, PrimHandle)> + '_ {
        (0..self.heads.len())
            .rev()
            .filter(move |&z| self.heads[z] != END)
            .flat_map(move |z| self.bucket(z).map(move |h| (z, h)))
    }
}

impl Default for OrderingTable {
    fn default() -> Self {
        Self::new(OT_SIZE)
    }
}

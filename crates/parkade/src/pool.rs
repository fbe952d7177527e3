//! Free-slot pool for one vehicle category.
//!
//! Slots are numbered `1..=capacity`. The pool tracks which of those are free in an
//! ordered set so allocation always hands out the numerically lowest free slot.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A numbered parking space within one category's range. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slot(u32);

impl Slot {
    /// Returns `None` for zero; slot numbering starts at 1.
    pub fn new(number: u32) -> Option<Self> {
        (number > 0).then_some(Self(number))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReleaseError {
    #[error("slot {slot} is outside the pool range 1..={capacity}")]
    OutOfRange { slot: Slot, capacity: u32 },
    #[error("slot {0} is not currently allocated")]
    NotAllocated(Slot),
}

/// Free slots of a single category.
#[derive(Debug, Clone)]
pub struct LotPool {
    free: BTreeSet<Slot>,
    capacity: u32,
}

impl LotPool {
    /// Create a pool with every slot in `1..=capacity` free. A zero capacity is valid
    /// and yields a pool that never allocates.
    pub fn new(capacity: u32) -> Self {
        Self {
            free: (1..=capacity).map(Slot).collect(),
            capacity,
        }
    }

    /// Remove and return the lowest free slot, or `None` when exhausted.
    pub fn allocate_lowest(&mut self) -> Option<Slot> {
        self.free.pop_first()
    }

    /// Return an allocated slot to the pool.
    ///
    /// Slots outside the numbered range, or ones already free, are rejected and the
    /// pool is left untouched.
    pub fn release(&mut self, slot: Slot) -> Result<(), ReleaseError> {
        if slot.get() > self.capacity {
            return Err(ReleaseError::OutOfRange {
                slot,
                capacity: self.capacity,
            });
        }
        if !self.free.insert(slot) {
            return Err(ReleaseError::NotAllocated(slot));
        }
        Ok(())
    }

    pub fn is_free(&self, slot: Slot) -> bool {
        self.free.contains(&slot)
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn available(&self) -> u32 {
        // free never exceeds capacity, which is a u32
        self.free.len() as u32
    }

    pub fn in_use(&self) -> u32 {
        self.capacity - self.available()
    }

    /// Free slots in ascending order.
    pub fn free_slots(&self) -> impl Iterator<Item = Slot> + '_ {
        self.free.iter().copied()
    }
}

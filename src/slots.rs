//! Player slot allocation.
//!
//! Each [`InputController`](crate::controller::InputController) drives one
//! emulated player. Slots are handed out lowest-first by a [`SlotAllocator`]
//! owned by the application context and returned automatically when the
//! [`PlayerSlot`] guard is dropped.
//!
//! Running out of slots is a programming error (the frontend never opens more
//! sessions than it supports), so [`SlotAllocator::claim`] panics instead of
//! returning an error.

use parking_lot::Mutex;
use std::sync::Arc;

/// Maximum number of concurrently claimed players.
pub const MAX_PLAYERS: usize = 4;

/// Bitmask allocator for player slots.
#[derive(Debug)]
pub struct SlotAllocator {
    claimed: Mutex<u32>,
    capacity: usize,
}

impl SlotAllocator {
    pub fn new() -> Arc<Self> {
        Self::with_capacity(MAX_PLAYERS)
    }

    pub fn with_capacity(capacity: usize) -> Arc<Self> {
        assert!(capacity <= 32, "slot capacity {capacity} exceeds bitmask width");
        Arc::new(Self {
            claimed: Mutex::new(0),
            capacity,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Claim the lowest free slot, or `None` when all are taken.
    pub fn try_claim(self: &Arc<Self>) -> Option<PlayerSlot> {
        let mut claimed = self.claimed.lock();
        let id = (0..self.capacity).find(|i| *claimed & (1 << i) == 0)?;
        *claimed |= 1 << id;
        Some(PlayerSlot {
            id,
            allocator: Arc::clone(self),
        })
    }

    /// Claim the lowest free slot.
    ///
    /// # Panics
    /// When every slot is already claimed.
    pub fn claim(self: &Arc<Self>) -> PlayerSlot {
        match self.try_claim() {
            Some(slot) => slot,
            None => {
                log::error!("can't claim player {}: all slots in use", self.capacity + 1);
                panic!("can't claim player {}: all slots in use", self.capacity + 1);
            }
        }
    }

    pub fn is_claimed(&self, id: usize) -> bool {
        id < self.capacity && *self.claimed.lock() & (1 << id) != 0
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.lock().count_ones() as usize
    }

    fn free(&self, id: usize) {
        *self.claimed.lock() &= !(1 << id);
    }
}

/// A claimed player slot; freed on drop.
#[derive(Debug)]
pub struct PlayerSlot {
    id: usize,
    allocator: Arc<SlotAllocator>,
}

impl PlayerSlot {
    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }
}

impl Drop for PlayerSlot {
    fn drop(&mut self) {
        self.allocator.free(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_lowest_free_slot() {
        let slots = SlotAllocator::new();
        let a = slots.claim();
        let b = slots.claim();
        assert_eq!((a.id(), b.id()), (0, 1));
        drop(a);
        assert!(!slots.is_claimed(0));
        assert_eq!(slots.claim().id(), 0);
    }

    #[test]
    fn freed_slot_is_reused() {
        let slots = SlotAllocator::new();
        let held: Vec<_> = (0..MAX_PLAYERS).map(|_| slots.claim()).collect();
        assert!(slots.try_claim().is_none());
        let freed = held[2].id();
        drop(held);
        assert_eq!(slots.claimed_count(), 0);
        let again: Vec<_> = (0..MAX_PLAYERS).map(|_| slots.claim()).collect();
        assert_eq!(again[freed].id(), freed);
    }

    #[test]
    #[should_panic(expected = "all slots in use")]
    fn claiming_past_capacity_is_fatal() {
        let slots = SlotAllocator::with_capacity(2);
        let _a = slots.claim();
        let _b = slots.claim();
        let _c = slots.claim();
    }
}

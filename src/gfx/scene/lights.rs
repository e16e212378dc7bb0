//! Fixed-size pool of light slots.

use crate::error::{EditorError, Result};

/// Index of an acquired light slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightSlot(pub usize);

/// Shading data of one active light, handed to the renderer each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub slot: LightSlot,
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
    pub direction: [f32; 3],
}

/// Hands out at most `capacity` light slots, lowest free index first.
#[derive(Debug, Clone)]
pub struct LightPool {
    capacity: usize,
    free: Vec<usize>,
}

impl LightPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: (0..capacity).rev().collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_use(&self) -> usize {
        self.capacity - self.free.len()
    }

    pub fn acquire(&mut self) -> Result<LightSlot> {
        self.free
            .pop()
            .map(LightSlot)
            .ok_or(EditorError::LightSlotsExhausted {
                capacity: self.capacity,
            })
    }

    pub fn release(&mut self, slot: LightSlot) {
        if slot.0 >= self.capacity || self.free.contains(&slot.0) {
            log::warn!("Ignoring release of light slot {} not in use", slot.0);
            return;
        }
        self.free.push(slot.0);
        // Keep lowest index on top
        self.free.sort_unstable_by(|a, b| b.cmp(a));
    }

    /// Returns every slot to the pool.
    pub fn reset(&mut self) {
        self.free = (0..self.capacity).rev().collect();
    }
}

impl Default for LightPool {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_until_exhausted() {
        let mut pool = LightPool::new(8);
        let slots: Vec<_> = (0..8).map(|_| pool.acquire().unwrap()).collect();
        assert_eq!(slots[0], LightSlot(0));
        assert_eq!(slots[7], LightSlot(7));

        match pool.acquire() {
            Err(EditorError::LightSlotsExhausted { capacity }) => assert_eq!(capacity, 8),
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn released_slot_is_reused_first() {
        let mut pool = LightPool::new(3);
        let a = pool.acquire().unwrap();
        let b = pool.acquire().unwrap();
        let _c = pool.acquire().unwrap();

        pool.release(b);
        pool.release(a);
        assert_eq!(pool.in_use(), 1);
        assert_eq!(pool.acquire().unwrap(), LightSlot(0));
        assert_eq!(pool.acquire().unwrap(), LightSlot(1));
    }

    #[test]
    fn double_release_is_ignored() {
        let mut pool = LightPool::new(2);
        let a = pool.acquire().unwrap();
        pool.release(a);
        pool.release(a);
        assert_eq!(pool.in_use(), 0);
        pool.acquire().unwrap();
        pool.acquire().unwrap();
        assert!(pool.acquire().is_err());
    }
}

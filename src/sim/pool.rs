//! Fixed-capacity entity pools
//!
//! One pool per entity kind (rocks, lasers, pipes, ...). Capacity never
//! changes after construction: "removing" an entity deactivates its slot in
//! place and slot index doubles as entity identity within a tick. This is
//! what caps concurrent objects (e.g. five lasers on screen, never more).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ConfigError;

/// Every slot in the pool is active. A normal outcome, not a fault: firing
/// with a full projectile pool just drops the shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no inactive slot available (capacity {capacity})")]
pub struct AllocationExhausted {
    pub capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Slot<T> {
    active: bool,
    value: T,
}

/// Bounded, index-stable collection of entity slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixedPool<T> {
    slots: Vec<Slot<T>>,
}

impl<T> FixedPool<T> {
    /// Build a pool of `capacity` inactive slots, each initialized by `init`.
    pub fn new(capacity: usize, mut init: impl FnMut(usize) -> T) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        let slots = (0..capacity)
            .map(|i| Slot {
                active: false,
                value: init(i),
            })
            .collect();
        Ok(Self { slots })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn is_active(&self, idx: usize) -> bool {
        self.slots.get(idx).map(|s| s.active).unwrap_or(false)
    }

    /// Active entity at `idx`, if any.
    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).filter(|s| s.active).map(|s| &s.value)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots
            .get_mut(idx)
            .filter(|s| s.active)
            .map(|s| &mut s.value)
    }

    /// Index-ordered iteration over active slots. Restartable each tick;
    /// collision resolution depends on this order being stable.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (i, &s.value))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, s)| s.active)
            .map(|(i, s)| (i, &mut s.value))
    }

    /// First inactive slot index, or `None` when the pool is saturated.
    pub fn find_inactive(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.active)
    }

    /// Claim the first inactive slot for `value`.
    pub fn allocate(&mut self, value: T) -> Result<usize, AllocationExhausted> {
        let idx = self.find_inactive().ok_or(AllocationExhausted {
            capacity: self.capacity(),
        })?;
        self.slots[idx] = Slot {
            active: true,
            value,
        };
        Ok(idx)
    }

    /// Activate `idx` in place, overwriting its value.
    pub fn activate(&mut self, idx: usize, value: T) {
        self.slots[idx] = Slot {
            active: true,
            value,
        };
    }

    pub fn deactivate(&mut self, idx: usize) {
        if let Some(slot) = self.slots.get_mut(idx) {
            slot.active = false;
        }
    }
}

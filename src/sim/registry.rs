//! Dense registry of alive entities
//!
//! Entities live contiguously in a `Vec`. Each handle maps to a slot that
//! records the entity's current dense index. Removal swaps the last entity
//! into the freed position and updates its slot, so both insert and remove
//! are O(1). Slots carry a generation so stale handles are rejected.

use crate::error::{Result, SimError};

/// Stable reference to a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryHandle {
    slot: u32,
    generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    dense: Option<usize>,
}

/// Whether an entity survives the current iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

#[derive(Debug, Clone)]
pub struct Registry<T> {
    dense: Vec<(RegistryHandle, T)>,
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            dense: Vec::new(),
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Append at the end of the dense storage
    pub fn register(&mut self, value: T) -> RegistryHandle {
        let dense_index = self.dense.len();
        let handle = match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.slots[slot as usize];
                entry.dense = Some(dense_index);
                RegistryHandle {
                    slot,
                    generation: entry.generation,
                }
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    dense: Some(dense_index),
                });
                RegistryHandle {
                    slot,
                    generation: 0,
                }
            }
        };
        self.dense.push((handle, value));
        handle
    }

    /// Remove by swapping the last entity into the freed position
    pub fn unregister(&mut self, handle: RegistryHandle) -> Result<T> {
        let dense_index = self
            .dense_index(handle)
            .ok_or(SimError::RegistryCorruption(handle))?;

        let (_, value) = self.dense.swap_remove(dense_index);
        if let Some((moved, _)) = self.dense.get(dense_index) {
            self.slots[moved.slot as usize].dense = Some(dense_index);
        }

        let slot = &mut self.slots[handle.slot as usize];
        slot.dense = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot);
        Ok(value)
    }

    pub fn contains(&self, handle: RegistryHandle) -> bool {
        self.dense_index(handle).is_some()
    }

    pub fn get(&self, handle: RegistryHandle) -> Option<&T> {
        let index = self.dense_index(handle)?;
        Some(&self.dense[index].1)
    }

    pub fn get_mut(&mut self, handle: RegistryHandle) -> Option<&mut T> {
        let index = self.dense_index(handle)?;
        Some(&mut self.dense[index].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegistryHandle, &T)> {
        self.dense.iter().map(|(h, v)| (*h, v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RegistryHandle, &mut T)> {
        self.dense.iter_mut().map(|(h, v)| (*h, v))
    }

    /// Visit every alive entity exactly once.
    ///
    /// Iterates from the back, so an entity reported `Dead` can be
    /// swap-removed immediately without skipping or revisiting anyone.
    /// Removed entities are returned to the caller.
    pub fn for_each_alive(
        &mut self,
        mut f: impl FnMut(RegistryHandle, &mut T) -> Liveness,
    ) -> Vec<(RegistryHandle, T)> {
        let mut removed = Vec::new();
        for index in (0..self.dense.len()).rev() {
            let (handle, value) = &mut self.dense[index];
            let handle = *handle;
            if f(handle, value) == Liveness::Dead {
                // Slot bookkeeping is in sync, so this cannot fail
                if let Ok(value) = self.unregister(handle) {
                    removed.push((handle, value));
                }
            }
        }
        removed
    }

    /// Unregister everything, returning entities in dense order
    pub fn drain(&mut self) -> Vec<(RegistryHandle, T)> {
        for (handle, _) in &self.dense {
            let slot = &mut self.slots[handle.slot as usize];
            slot.dense = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(handle.slot);
        }
        std::mem::take(&mut self.dense)
    }

    fn dense_index(&self, handle: RegistryHandle) -> Option<usize> {
        let slot = self.slots.get(handle.slot as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.dense
    }

    #[cfg(test)]
    fn check_bookkeeping(&self) {
        for (index, (handle, _)) in self.dense.iter().enumerate() {
            assert_eq!(self.dense_index(*handle), Some(index));
        }
        let live_slots = self.slots.iter().filter(|s| s.dense.is_some()).count();
        assert_eq!(live_slots, self.dense.len());
    }
}

//! Generic object pool
//!
//! Instances live in a slot arena and are addressed by [`PoolHandle`], an index
//! plus a generation counter. Releasing a slot bumps its generation, so a handle
//! kept past its release can never reach the next occupant.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::error::PoolError;

/// Generation-checked reference to a checked-out instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    index: u32,
    generation: u32,
}

impl PoolHandle {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

struct Slot<T> {
    value: T,
    generation: u32,
    in_use: bool,
}

type Factory<T> = Box<dyn FnMut() -> T>;
type Reset<T> = Box<dyn FnMut(&mut T)>;

/// Fixed-size pool that may optionally grow one slot at a time. It never shrinks.
pub struct ObjectPool<T> {
    slots: Vec<Slot<T>>,
    /// Indices of available slots (used as a stack)
    available: Vec<u32>,
    /// Checked-out indices in acquisition order
    in_use: Vec<u32>,
    factory: Factory<T>,
    reset: Option<Reset<T>>,
    allow_growth: bool,
}

impl<T> ObjectPool<T> {
    /// Pre-allocate `size` instances via `factory`
    pub fn new(size: usize, factory: impl FnMut() -> T + 'static, allow_growth: bool) -> Self {
        let mut factory: Factory<T> = Box::new(factory);
        let slots: Vec<Slot<T>> = (0..size)
            .map(|_| Slot {
                value: factory(),
                generation: 0,
                in_use: false,
            })
            .collect();
        // Reverse so the first acquire hands out slot 0
        let available = (0..size as u32).rev().collect();

        log::debug!("ObjectPool created with {} objects (growth: {})", size, allow_growth);

        Self {
            slots,
            available,
            in_use: Vec::with_capacity(size),
            factory,
            reset: None,
            allow_growth,
        }
    }

    /// Install a callback run on every instance as it returns to the pool
    pub fn with_reset(mut self, reset: impl FnMut(&mut T) + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Check out an available instance, growing by one slot if allowed
    pub fn acquire(&mut self) -> Result<PoolHandle, PoolError> {
        let index = match self.available.pop() {
            Some(index) => index,
            None if self.allow_growth => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    value: (self.factory)(),
                    generation: 0,
                    in_use: false,
                });
                log::debug!("ObjectPool grew to {} objects", self.slots.len());
                index
            }
            None => {
                return Err(PoolError::Exhausted {
                    capacity: self.slots.len(),
                });
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.in_use = true;
        self.in_use.push(index);

        Ok(PoolHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Check out an instance that returns itself to the pool when the guard drops
    pub fn acquire_scoped(&mut self) -> Result<Pooled<'_, T>, PoolError> {
        let handle = self.acquire()?;
        Ok(Pooled {
            pool: self,
            handle: Some(handle),
        })
    }

    /// Return an instance. Unknown or stale handles are reported and ignored.
    pub fn release(&mut self, handle: PoolHandle) -> Result<(), PoolError> {
        if !self.is_checked_out(handle) {
            log::warn!(
                "Attempted to release handle {}:{} not in use by this pool",
                handle.index,
                handle.generation
            );
            return Err(PoolError::NotInUse {
                index: handle.index,
                generation: handle.generation,
            });
        }

        if let Some(pos) = self.in_use.iter().position(|&i| i == handle.index) {
            self.in_use.remove(pos);
        }
        self.recycle(handle.index);
        self.available.push(handle.index);
        Ok(())
    }

    /// Return every checked-out instance
    pub fn release_all(&mut self) {
        let in_use = std::mem::take(&mut self.in_use);
        for index in in_use {
            self.recycle(index);
            self.available.push(index);
        }
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        if self.is_checked_out(handle) {
            Some(&self.slots[handle.index()].value)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if self.is_checked_out(handle) {
            Some(&mut self.slots[handle.index()].value)
        } else {
            None
        }
    }

    /// True while `handle` refers to a live checkout
    pub fn is_checked_out(&self, handle: PoolHandle) -> bool {
        self.slots
            .get(handle.index())
            .is_some_and(|slot| slot.in_use && slot.generation == handle.generation)
    }

    /// Checked-out instances in acquisition order
    pub fn iter_in_use(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.in_use.iter().map(|&index| {
            let slot = &self.slots[index as usize];
            (
                PoolHandle {
                    index,
                    generation: slot.generation,
                },
                &slot.value,
            )
        })
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn in_use_count(&self) -> usize {
        self.in_use.len()
    }

    pub fn total_size(&self) -> usize {
        self.slots.len()
    }

    pub fn allows_growth(&self) -> bool {
        self.allow_growth
    }

    fn recycle(&mut self, index: u32) {
        let slot = &mut self.slots[index as usize];
        if let Some(reset) = self.reset.as_mut() {
            reset(&mut slot.value);
        }
        slot.in_use = false;
        slot.generation = slot.generation.wrapping_add(1);
    }
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("total", &self.total_size())
            .field("in_use", &self.in_use_count())
            .field("available", &self.available_count())
            .field("allow_growth", &self.allow_growth)
            .finish()
    }
}

/// Scoped checkout; releases back to the pool on drop
pub struct Pooled<'p, T> {
    pool: &'p mut ObjectPool<T>,
    handle: Option<PoolHandle>,
}

impl<T> Pooled<'_, T> {
    pub fn handle(&self) -> PoolHandle {
        self.live_handle()
    }

    /// Keep the instance checked out past the guard's scope
    pub fn detach(mut self) -> PoolHandle {
        let handle = self.live_handle();
        self.handle = None;
        handle
    }

    fn live_handle(&self) -> PoolHandle {
        // Only `detach` clears the handle, and it consumes the guard
        self.handle.unwrap_or(PoolHandle {
            index: u32::MAX,
            generation: u32::MAX,
        })
    }
}

impl<T> Deref for Pooled<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.pool.slots[self.live_handle().index()].value
    }
}

impl<T> DerefMut for Pooled<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        let index = self.live_handle().index();
        &mut self.pool.slots[index].value
    }
}

impl<T> Drop for Pooled<'_, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            // Guard holds the only borrow of the pool, so the handle is still live
            let _ = self.pool.release(handle);
        }
    }
}

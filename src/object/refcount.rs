//! Atomic Reference Count
//!
//! Increments may be relaxed: a new reference can only be made from an
//! existing one, which already keeps the object alive. The decrement that
//! reaches zero must observe every write made through other references
//! before the object is destroyed, hence the release/acquire pairing.

use core::sync::atomic::{fence, AtomicU32, Ordering};

/// Per-object reference count.
#[derive(Debug)]
#[repr(transparent)]
pub struct RefCount(AtomicU32);

impl RefCount {
    /// Create a count starting at `initial`.
    #[inline]
    pub const fn new(initial: u32) -> Self {
        Self(AtomicU32::new(initial))
    }

    /// Current value.
    ///
    /// Only meaningful while the caller holds a reference; other threads
    /// may change it at any time.
    #[inline]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }

    /// Add one reference, returning the new count.
    ///
    /// # Panics
    /// Panics if the count would wrap.
    #[inline]
    pub fn increment(&self) -> u32 {
        let previous = self.0.fetch_add(1, Ordering::Relaxed);
        if previous == u32::MAX {
            panic!("reference count overflow");
        }
        previous + 1
    }

    /// Drop one reference, returning the new count.
    ///
    /// A return value of zero means the caller performed the final release
    /// and now has exclusive access for destruction.
    #[inline]
    pub fn decrement(&self) -> u32 {
        let previous = self.0.fetch_sub(1, Ordering::Release);
        debug_assert!(previous != 0, "release on an object with no references");
        if previous == 1 {
            fence(Ordering::Acquire);
        }
        previous.wrapping_sub(1)
    }
}

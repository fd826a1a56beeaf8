//! Identifier Registry
//!
//! Interface identifiers are hand-written literals, so nothing in the
//! language stops two interfaces from claiming the same value. The
//! registry records every resolved identifier together with the name of
//! the interface that claimed it and reports any second claimant.
//!
//! # Design
//! - Linear table behind a spinlock (interfaces number in the dozens)
//! - One global instance fed by the `interface!` macro
//! - Checked in debug builds, or always with the `strict-ids` feature

use alloc::vec::Vec;
use core::fmt;

use spin::Mutex;

use super::guid::Guid;

/// Whether resolved identifiers are checked against the global registry.
pub const CHECK_UNIQUE: bool = cfg!(any(debug_assertions, feature = "strict-ids"));

/// Two interfaces claimed the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdCollision {
    /// The contested identifier.
    pub id: Guid,
    /// Interface that registered first.
    pub existing: &'static str,
    /// Interface that tried to register second.
    pub claimant: &'static str,
}

impl fmt::Display for IdCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interface identifier {} claimed by both {} and {}",
            self.id, self.existing, self.claimant
        )
    }
}

/// Table of identifiers and the interfaces that own them.
#[derive(Debug)]
pub struct IdRegistry {
    entries: Mutex<Vec<(Guid, &'static str)>>,
}

impl IdRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Record that `name` owns `id`.
    ///
    /// Registering the same pair twice is accepted.
    pub fn register(&self, name: &'static str, id: Guid) -> Result<(), IdCollision> {
        let mut entries = self.entries.lock();

        if let Some(&(_, existing)) = entries.iter().find(|(known, _)| *known == id) {
            if existing == name {
                return Ok(());
            }
            return Err(IdCollision {
                id,
                existing,
                claimant: name,
            });
        }

        entries.push((id, name));
        Ok(())
    }

    /// Name of the interface that owns `id`, if registered.
    pub fn lookup(&self, id: &Guid) -> Option<&'static str> {
        self.entries
            .lock()
            .iter()
            .find(|(known, _)| known == id)
            .map(|&(_, name)| name)
    }

    /// Number of registered identifiers.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry fed by every interface declared with `interface!`.
static GLOBAL: IdRegistry = IdRegistry::new();

/// Get the process-wide registry.
pub fn global() -> &'static IdRegistry {
    &GLOBAL
}

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

use super::identifier::MacType;

/// Lifecycle of a model resolver.
///
/// State transitions:
/// - Uninitialized -> Resolving (first resolve() call)
/// - Resolving -> Resolved (probes finished)
///
/// Resolved is terminal. There is no way back to Uninitialized, so the
/// probes run at most once per resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ResolverState {
    Uninitialized = 0,
    Resolving = 1,
    Resolved = 2,
}

impl ResolverState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, ResolverState::Resolved)
    }
}

impl From<u8> for ResolverState {
    fn from(value: u8) -> Self {
        match value {
            0 => ResolverState::Uninitialized,
            1 => ResolverState::Resolving,
            _ => ResolverState::Resolved,
        }
    }
}

impl From<ResolverState> for u8 {
    fn from(state: ResolverState) -> Self {
        state as u8
    }
}

/// Atomic wrapper for ResolverState for lock-free reads.
#[derive(Debug)]
pub struct AtomicResolverState(AtomicU8);

impl AtomicResolverState {
    pub fn new(state: ResolverState) -> Self {
        Self(AtomicU8::new(state.into()))
    }

    pub fn load(&self) -> ResolverState {
        self.0.load(Ordering::Acquire).into()
    }

    pub fn store(&self, state: ResolverState) {
        self.0.store(state.into(), Ordering::Release);
    }
}

impl Default for AtomicResolverState {
    fn default() -> Self {
        Self::new(ResolverState::Uninitialized)
    }
}

/// Final result of model resolution, fixed for the lifetime of the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedModel {
    /// Canonical model identifier used for the catalog lookup.
    pub identifier: String,
    /// Human-readable product name, possibly refined by an OS probe.
    pub product_name: String,
    /// Built-in display size from the catalog, 0 when none.
    pub display_size_inches: f32,
    /// Desktop or laptop.
    pub mac_type: MacType,
}

impl ResolvedModel {
    /// Whether the machine has a built-in display.
    pub fn has_builtin_display(&self) -> bool {
        self.display_size_inches > 0.0
    }
}

//! Capabilities a domain object exposes to the guard
//!
//! The guard never looks inside a payload. It only asks whether an object is
//! still valid, tells it to become invalid, and (when a cloner is configured)
//! asks for an independent copy.

use crate::errors::{GuardError, Result};
use std::rc::Rc;

/// Validity query and invalidation.
pub trait Consumable {
    /// Whether the object may still be used directly.
    fn is_valid(&self) -> bool;

    /// Transition to invalid. Calling it again is a no-op.
    fn invalidate(&mut self);
}

/// Optional clone capability.
///
/// The copy must start valid and be independent of `self`: driving one must
/// not change what the other yields afterwards. It reflects the state at the
/// moment of the call.
pub trait Replicate {
    /// Produce an independent copy of the current state.
    fn replicate(&self) -> Self;
}

/// Cloning strategy used by the repeat detector.
pub type Cloner<T> = Rc<dyn Fn(&T) -> T>;

/// Cloner backed by [`Replicate`].
pub fn cloner_from_replicate<T: Replicate + 'static>() -> Cloner<T> {
    Rc::new(T::replicate)
}

/// Whether a direct consumption call honours validity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    /// Fail with `ConsumedObject` on an invalid object.
    #[default]
    Checked,
    /// Read regardless of validity; for diagnostics and tests.
    IgnoreValidity,
}

impl Access {
    /// Returns `true` for the bypass.
    pub fn ignores_validity(self) -> bool {
        matches!(self, Self::IgnoreValidity)
    }
}

/// Validity state embedded in domain types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidityFlag {
    invalid: bool,
}

impl ValidityFlag {
    /// A valid flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the owner may still be used directly.
    pub fn is_valid(&self) -> bool {
        !self.invalid
    }

    /// Mark the owner consumed.
    pub fn invalidate(&mut self) {
        self.invalid = true;
    }

    /// Gate a direct consumption call.
    pub fn ensure_usable(&self, access: Access) -> Result<()> {
        if self.invalid && !access.ignores_validity() {
            return Err(GuardError::consumed());
        }
        Ok(())
    }
}

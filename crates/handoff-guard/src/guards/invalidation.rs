//! Invalidation Controller
//!
//! Second stage of the transfer guard. Runs after the repeat detector has
//! resolved aliasing, so every tracked slot it sees holds a distinct object.
//!
//! # Guard Chain Position
//!
//! ```text
//! RepeatDetector → InvalidationController → Operation
//!                  ^^^^^^^^^^^^^^^^^^^^^^
//!                  (this guard)
//! ```
//!
//! ## Execution
//!
//! 1. Pre-check: every tracked slot (survivor or consumed) must be valid
//! 2. Invoke the operation exactly once
//! 3. On success, invalidate every consumed slot
//!
//! An operation error is returned unchanged and nothing is invalidated.
//! Survivor slots are never invalidated by the controller.

use super::policy::{ArgumentPolicy, SlotRole};
use crate::capability::Consumable;
use crate::errors::GuardError;
use crate::handle::{ArgVector, Handle};
use tracing::{debug, warn};

/// Validity pre-check and post-call invalidation.
#[derive(Debug, Clone, Copy)]
pub struct InvalidationController<'a> {
    policy: &'a ArgumentPolicy,
}

impl<'a> InvalidationController<'a> {
    /// Controller enforcing `policy`.
    pub fn new(policy: &'a ArgumentPolicy) -> Self {
        Self { policy }
    }

    /// Fail with `ConsumedObject` if any tracked slot is already invalid.
    ///
    /// Returns the per-slot roles for the call.
    pub fn precheck<T: Consumable>(
        &self,
        args: &ArgVector<T>,
    ) -> Result<Vec<SlotRole>, GuardError> {
        let roles = self.policy.roles(args.len())?;
        for (position, (role, slot)) in roles.iter().zip(args).enumerate() {
            if role.is_tracked() && !slot.borrow().is_valid() {
                warn!(
                    position,
                    object = %slot.id(),
                    "Consumed object passed to a guarded operation"
                );
                return Err(GuardError::consumed_at(position));
            }
        }
        Ok(roles)
    }

    /// Run `op` under the pre-check and invalidate consumed slots afterwards.
    ///
    /// Returns the operation's value and the positions that were invalidated.
    pub fn run<T, R, E, F>(&self, args: &ArgVector<T>, op: F) -> Result<(R, Vec<usize>), E>
    where
        T: Consumable,
        E: From<GuardError>,
        F: FnOnce(&Handle<T>, &[Handle<T>]) -> Result<R, E>,
    {
        let roles = self.precheck(args)?;

        let value = op(args.receiver(), args.others())?;

        let mut invalidated = Vec::new();
        for (position, (role, slot)) in roles.iter().zip(args).enumerate() {
            if role.is_consumed() {
                slot.borrow_mut().invalidate();
                invalidated.push(position);
                debug!(position, object = %slot.id(), "Invalidated consumed argument");
            }
        }

        Ok((value, invalidated))
    }
}

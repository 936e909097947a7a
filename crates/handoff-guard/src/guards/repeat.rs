//! Repeat/Alias Detector
//!
//! First stage of the transfer guard. Scans the tracked slots of an argument
//! vector left to right and resolves every repeated object identity before
//! anything else runs.
//!
//! # Guard Chain Position
//!
//! ```text
//! RepeatDetector → InvalidationController → Operation
//! ^^^^^^^^^^^^^^
//! (this guard)
//! ```
//!
//! The first occurrence of an object is kept. Each later occurrence is either
//! replaced by a fresh copy of the object's state *at that point in the scan*
//! (when a cloner is configured) or rejected with `AliasWithoutCloner`.
//! Copies are always taken from the original, never from an earlier copy.

use super::policy::ArgumentPolicy;
use crate::capability::Cloner;
use crate::errors::{GuardError, Result};
use crate::handle::{ArgVector, Handle, ObjectId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A repeated argument replaced by a fresh copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Substitution {
    /// Slot that received the copy
    pub position: usize,
    /// Identity of the repeated object
    pub original: ObjectId,
    /// Identity of the copy now occupying the slot
    pub replacement: ObjectId,
}

/// Argument vector with all tracked aliasing resolved.
#[derive(Debug)]
pub struct Resolution<T> {
    /// Arguments to hand to the invalidation controller
    pub args: ArgVector<T>,
    /// Copies made during the scan, in scan order
    pub substitutions: Vec<Substitution>,
}

/// Detects and resolves repeated objects among tracked slots.
pub struct RepeatDetector<'a, T> {
    policy: &'a ArgumentPolicy,
    cloner: Option<&'a Cloner<T>>,
}

impl<'a, T> RepeatDetector<'a, T> {
    /// Detector for `policy`, cloning with `cloner` when present.
    pub fn new(policy: &'a ArgumentPolicy, cloner: Option<&'a Cloner<T>>) -> Self {
        Self { policy, cloner }
    }

    /// Resolve aliasing in `args`.
    ///
    /// Fails without mutating anything when an alias is found and no cloner
    /// is configured. Copies made before a later failure are not undone.
    pub fn resolve(&self, mut args: ArgVector<T>) -> Result<Resolution<T>> {
        let roles = self.policy.roles(args.len())?;
        let mut seen: HashMap<ObjectId, usize> = HashMap::with_capacity(args.len());
        let mut substitutions = Vec::new();

        for (position, role) in roles.into_iter().enumerate() {
            if !role.is_tracked() {
                continue;
            }
            let id = args.slot(position).id();
            let Some(&first_seen) = seen.get(&id) else {
                seen.insert(id, position);
                continue;
            };

            let Some(cloner) = self.cloner else {
                warn!(
                    position,
                    first_seen,
                    object = %id,
                    "Same object passed more than once without a cloner"
                );
                return Err(GuardError::alias(position, first_seen));
            };

            let fresh = {
                let current = args.slot(position).borrow();
                Handle::new(cloner(&*current))
            };
            let replacement = fresh.id();
            args.replace(position, fresh);
            seen.insert(replacement, position);
            debug!(
                position,
                first_seen,
                original = %id,
                replacement = %replacement,
                "Replaced repeated argument with a fresh copy"
            );
            substitutions.push(Substitution {
                position,
                original: id,
                replacement,
            });
        }

        Ok(Resolution {
            args,
            substitutions,
        })
    }
}

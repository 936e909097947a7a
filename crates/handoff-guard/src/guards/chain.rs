//! Transfer guard chain wrapping combine operations
//!
//! Composes the two guard stages in their fixed order around a caller
//! supplied operation:
//!
//! ```text
//! call(args) → RepeatDetector → InvalidationController → op(receiver, others)
//!                 resolve          pre-check                 merge
//!                 aliasing         validity                  logic
//!                                  invalidate on Ok
//! ```
//!
//! Guard errors are converted into the caller's error type through
//! `From<GuardError>`; errors raised by the operation itself pass through
//! unchanged.

use super::invalidation::InvalidationController;
use super::policy::ArgumentPolicy;
use super::repeat::{RepeatDetector, Substitution};
use crate::capability::{cloner_from_replicate, Cloner, Consumable, Replicate};
use crate::errors::{GuardError, Result};
use crate::handle::{ArgVector, Handle};
use std::fmt;
use tracing::{debug, instrument};

/// What the guard did around one successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Name of the guarded operation
    pub operation: String,
    /// Repeated arguments replaced by copies
    pub substitutions: Vec<Substitution>,
    /// Positions invalidated after the call
    pub invalidated: Vec<usize>,
}

/// Operation result together with the guard's report.
#[derive(Debug)]
pub struct GuardedOutcome<R> {
    /// Value returned by the wrapped operation
    pub result: R,
    /// Guard activity for this call
    pub report: TransferReport,
}

/// Statically configured guard for one combine operation.
pub struct TransferGuard<T> {
    name: String,
    policy: ArgumentPolicy,
    cloner: Option<Cloner<T>>,
}

impl<T> TransferGuard<T> {
    /// Guard for operation `name`, rejecting aliases until a cloner is set.
    pub fn new(name: impl Into<String>, policy: ArgumentPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            name: name.into(),
            policy,
            cloner: None,
        })
    }

    /// Resolve aliases by cloning with `cloner`.
    pub fn with_cloner(mut self, cloner: Cloner<T>) -> Self {
        self.cloner = Some(cloner);
        self
    }

    /// Resolve aliases by cloning through [`Replicate`].
    pub fn replicating(self) -> Self
    where
        T: Replicate + 'static,
    {
        self.with_cloner(cloner_from_replicate())
    }

    /// Operation name used in logs and reports.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The argument policy.
    pub fn policy(&self) -> &ArgumentPolicy {
        &self.policy
    }

    /// Whether aliases are cloned rather than rejected.
    pub fn clones_aliases(&self) -> bool {
        self.cloner.is_some()
    }

    /// Wrap `op` into a reusable guarded operation.
    pub fn wrap<F>(self, op: F) -> GuardedOperation<T, F> {
        GuardedOperation { guard: self, op }
    }
}

impl<T: Consumable> TransferGuard<T> {
    /// Run `op` under the guard and return its value.
    pub fn call<R, E, F>(&self, args: ArgVector<T>, op: F) -> std::result::Result<R, E>
    where
        E: From<GuardError>,
        F: FnOnce(&Handle<T>, &[Handle<T>]) -> std::result::Result<R, E>,
    {
        self.call_with_report(args, op).map(|outcome| outcome.result)
    }

    /// Run `op` under the guard and describe what the guard did.
    #[instrument(skip_all, fields(operation = %self.name, args = args.len()))]
    pub fn call_with_report<R, E, F>(
        &self,
        args: ArgVector<T>,
        op: F,
    ) -> std::result::Result<GuardedOutcome<R>, E>
    where
        E: From<GuardError>,
        F: FnOnce(&Handle<T>, &[Handle<T>]) -> std::result::Result<R, E>,
    {
        let resolution = RepeatDetector::new(&self.policy, self.cloner.as_ref()).resolve(args)?;
        let (result, invalidated) =
            InvalidationController::new(&self.policy).run(&resolution.args, op)?;

        debug!(
            substitutions = resolution.substitutions.len(),
            invalidated = invalidated.len(),
            "Guarded transfer completed"
        );

        Ok(GuardedOutcome {
            result,
            report: TransferReport {
                operation: self.name.clone(),
                substitutions: resolution.substitutions,
                invalidated,
            },
        })
    }
}

impl<T> fmt::Debug for TransferGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferGuard")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("clones_aliases", &self.clones_aliases())
            .finish()
    }
}

/// A combine operation bundled with its guard.
pub struct GuardedOperation<T, F> {
    guard: TransferGuard<T>,
    op: F,
}

impl<T, F> GuardedOperation<T, F> {
    /// The guard applied on every invocation.
    pub fn guard(&self) -> &TransferGuard<T> {
        &self.guard
    }
}

impl<T: Consumable, F> GuardedOperation<T, F> {
    /// Invoke the wrapped operation under the guard.
    pub fn invoke<R, E>(&self, args: ArgVector<T>) -> std::result::Result<R, E>
    where
        E: From<GuardError>,
        F: Fn(&Handle<T>, &[Handle<T>]) -> std::result::Result<R, E>,
    {
        self.guard.call(args, &self.op)
    }

    /// Invoke and return the guard's report alongside the value.
    pub fn invoke_with_report<R, E>(
        &self,
        args: ArgVector<T>,
    ) -> std::result::Result<GuardedOutcome<R>, E>
    where
        E: From<GuardError>,
        F: Fn(&Handle<T>, &[Handle<T>]) -> std::result::Result<R, E>,
    {
        self.guard.call_with_report(args, &self.op)
    }
}

impl<T, F> fmt::Debug for GuardedOperation<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedOperation")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

//! Iterator-sequence payload
//!
//! A container holding a lazy cursor over integers. Combining chains the
//! other container's cursor onto the receiver's, sharing it: whoever drives
//! either cursor moves both views. The guard makes sure only the receiver is
//! left to drive it.

use handoff_guard::{
    Access, ArgVector, ArgumentPolicy, Consumable, Handle, Replicate, Result, TransferGuard,
    ValidityFlag,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::debug;

type Cursor = Rc<RefCell<Box<dyn Iterator<Item = i64>>>>;

fn new_cursor<I>(iter: I) -> Cursor
where
    I: Iterator<Item = i64> + 'static,
{
    Rc::new(RefCell::new(Box::new(iter)))
}

fn drain(cursor: &Cursor) -> Vec<i64> {
    cursor.borrow_mut().by_ref().collect()
}

/// Pulls from a cursor shared with another container.
struct Shared(Cursor);

impl Iterator for Shared {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        self.0.borrow_mut().next()
    }
}

/// State behind a [`SequenceContainer`].
pub struct SequenceState {
    cursor: Cursor,
    validity: ValidityFlag,
}

impl SequenceState {
    fn from_values(values: Vec<i64>) -> Self {
        Self {
            cursor: new_cursor(values.into_iter()),
            validity: ValidityFlag::new(),
        }
    }

    /// Chain `tail` after the current cursor.
    fn append(&mut self, tail: Cursor) {
        let head = Shared(Rc::clone(&self.cursor));
        self.cursor = new_cursor(head.chain(Shared(tail)));
    }
}

impl fmt::Debug for SequenceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceState")
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

impl Consumable for SequenceState {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&mut self) {
        self.validity.invalidate();
    }
}

impl Replicate for SequenceState {
    /// Materializes the remaining values and refills the original cursor in
    /// place, so the original and anything sharing it still see them.
    fn replicate(&self) -> Self {
        let values = drain(&self.cursor);
        *self.cursor.borrow_mut() = Box::new(values.clone().into_iter());
        Self::from_values(values)
    }
}

fn chain_others(receiver: &Handle<SequenceState>, others: &[Handle<SequenceState>]) -> Result<()> {
    for other in others {
        let tail = Rc::clone(&other.borrow().cursor);
        receiver.borrow_mut().append(tail);
    }
    Ok(())
}

/// How a container's combine methods treat a repeated argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasPolicy {
    /// Fail with `AliasWithoutCloner`.
    #[default]
    Reject,
    /// Substitute an independent copy.
    AutoClone,
}

/// Container whose combine methods are guarded.
#[derive(Debug)]
pub struct SequenceContainer {
    handle: Handle<SequenceState>,
    aliasing: AliasPolicy,
}

impl SequenceContainer {
    /// Container rejecting repeated arguments.
    pub fn new(values: impl IntoIterator<Item = i64>) -> Self {
        Self::with_alias_policy(values, AliasPolicy::Reject)
    }

    /// Container cloning repeated arguments.
    pub fn auto_clone(values: impl IntoIterator<Item = i64>) -> Self {
        Self::with_alias_policy(values, AliasPolicy::AutoClone)
    }

    /// Container with an explicit alias policy.
    pub fn with_alias_policy(values: impl IntoIterator<Item = i64>, aliasing: AliasPolicy) -> Self {
        Self {
            handle: Handle::new(SequenceState::from_values(values.into_iter().collect())),
            aliasing,
        }
    }

    /// Underlying handle.
    pub fn handle(&self) -> &Handle<SequenceState> {
        &self.handle
    }

    /// Alias policy used when this container is the receiver.
    pub fn alias_policy(&self) -> AliasPolicy {
        self.aliasing
    }

    /// Whether the container may still be used directly.
    pub fn is_valid(&self) -> bool {
        self.handle.borrow().is_valid()
    }

    /// Next value, if any.
    pub fn consume_one(&self, access: Access) -> Result<Option<i64>> {
        let cursor = {
            let state = self.handle.borrow();
            state.validity.ensure_usable(access)?;
            Rc::clone(&state.cursor)
        };
        let next = cursor.borrow_mut().next();
        Ok(next)
    }

    /// Every remaining value; the container is left empty.
    pub fn consume_to_list(&self, access: Access) -> Result<Vec<i64>> {
        let taken = {
            let mut state = self.handle.borrow_mut();
            state.validity.ensure_usable(access)?;
            std::mem::replace(&mut state.cursor, new_cursor(std::iter::empty()))
        };
        Ok(drain(&taken))
    }

    /// `self` then `other`; `other` is consumed.
    pub fn combine(&self, other: &SequenceContainer) -> Result<()> {
        self.guard("combine", ArgumentPolicy::pair())?.call(
            ArgVector::with_others(self.handle.clone(), [other.handle.clone()]),
            chain_others,
        )
    }

    /// `self` then each of `others` in order; all of `others` are consumed.
    pub fn combine_many(&self, others: &[&SequenceContainer]) -> Result<()> {
        self.guard("combine_many", ArgumentPolicy::variadic())?.call(
            ArgVector::with_others(
                self.handle.clone(),
                others.iter().map(|other| other.handle.clone()),
            ),
            chain_others,
        )
    }

    /// Combine without the guard; `other` keeps driving the shared cursor.
    pub fn combine_unguarded(&self, other: &SequenceContainer) {
        debug!(other = %other.handle.id(), "Combining sequences without guard");
        let tail = Rc::clone(&other.handle.borrow().cursor);
        self.handle.borrow_mut().append(tail);
    }

    /// Independent copy of the remaining values, with the same alias policy.
    pub fn replicate(&self) -> SequenceContainer {
        SequenceContainer {
            handle: Handle::new(self.handle.borrow().replicate()),
            aliasing: self.aliasing,
        }
    }

    fn guard(
        &self,
        operation: &str,
        policy: ArgumentPolicy,
    ) -> Result<TransferGuard<SequenceState>> {
        let guard = TransferGuard::new(operation, policy)?;
        Ok(match self.aliasing {
            AliasPolicy::Reject => guard,
            AliasPolicy::AutoClone => guard.replicating(),
        })
    }
}

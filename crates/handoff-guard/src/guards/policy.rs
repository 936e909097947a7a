//! Argument Policy
//!
//! Static, per-operation description of which argument slots the guard
//! tracks and what happens to them. A policy is expressed in roles rather
//! than raw indices so that fixed-arity and variadic operations share one
//! shape:
//!
//! ```text
//! slot 0        slots 1..=fixed.len()     remaining slots
//! receiver      fixed[i]                  tail (variadic)
//! ```

use crate::errors::{GuardError, Result};
use serde::{Deserialize, Serialize};

/// Role of one argument slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRole {
    /// Tracked for aliasing and validity, left valid after the call.
    Survivor,
    /// Tracked for aliasing and validity, invalidated after a successful call.
    Consumed,
    /// Not looked at by the guard.
    Passthrough,
}

impl SlotRole {
    /// Whether the slot takes part in alias detection and the validity pre-check.
    pub fn is_tracked(self) -> bool {
        !matches!(self, Self::Passthrough)
    }

    /// Whether the slot is invalidated after success.
    pub fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Per-operation argument policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentPolicy {
    /// Role of the receiver (slot 0)
    pub receiver: SlotRole,
    /// Roles of the fixed explicit arguments, in order
    #[serde(default)]
    pub fixed: Vec<SlotRole>,
    /// Role shared by every variadic argument; `None` forbids extra arguments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tail: Option<SlotRole>,
}

impl ArgumentPolicy {
    /// Policy with only a receiver; add slots with the `with_*` builders.
    pub fn new(receiver: SlotRole) -> Self {
        Self {
            receiver,
            fixed: Vec::new(),
            tail: None,
        }
    }

    /// `receiver.combine(other)`: receiver survives, `other` is consumed.
    pub fn pair() -> Self {
        Self::new(SlotRole::Survivor).with_fixed(SlotRole::Consumed)
    }

    /// `receiver.combine_many(others...)`: receiver survives, every other is consumed.
    pub fn variadic() -> Self {
        Self::new(SlotRole::Survivor).with_tail(SlotRole::Consumed)
    }

    /// Append a fixed explicit argument.
    pub fn with_fixed(mut self, role: SlotRole) -> Self {
        self.fixed.push(role);
        self
    }

    /// Accept a variadic tail with the given role.
    pub fn with_tail(mut self, role: SlotRole) -> Self {
        self.tail = Some(role);
        self
    }

    /// Reject policies that could never consume anything.
    pub fn validate(&self) -> Result<()> {
        let consumes = self.receiver.is_consumed()
            || self.fixed.iter().any(|role| role.is_consumed())
            || self.tail.is_some_and(SlotRole::is_consumed);
        if !consumes {
            return Err(GuardError::invalid_policy(
                "policy has no consumed argument slot",
            ));
        }
        Ok(())
    }

    /// Minimum argument count, receiver included.
    pub fn min_len(&self) -> usize {
        1 + self.fixed.len()
    }

    /// Check an argument count (receiver included) against the policy.
    pub fn check_arity(&self, len: usize) -> Result<()> {
        let min = self.min_len();
        match self.tail {
            Some(_) if len >= min => Ok(()),
            None if len == min => Ok(()),
            Some(_) => Err(GuardError::arity(format!("at least {min}"), len)),
            None => Err(GuardError::arity(format!("exactly {min}"), len)),
        }
    }

    /// Role of the slot at `position`, or `None` if the policy has no such slot.
    pub fn role_at(&self, position: usize) -> Option<SlotRole> {
        match position {
            0 => Some(self.receiver),
            p if p <= self.fixed.len() => Some(self.fixed[p - 1]),
            _ => self.tail,
        }
    }

    /// Roles for a call with `len` arguments, after checking arity.
    pub fn roles(&self, len: usize) -> Result<Vec<SlotRole>> {
        self.check_arity(len)?;
        Ok((0..len)
            .map(|position| self.role_at(position).unwrap_or(SlotRole::Passthrough))
            .collect())
    }
}

impl Default for ArgumentPolicy {
    fn default() -> Self {
        Self::pair()
    }
}

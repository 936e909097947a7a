//! Closure-style counter payload
//!
//! Each counter owns a count and a progression. A fresh counter's progression
//! increments its own count and returns it (1, 2, 3, ...). Combining `x` with
//! `y` makes `x`'s progression the sum of its previous progression and `y`'s,
//! holding on to `y` itself. Afterwards two places can drive `y`, which is
//! exactly what the guard turns into an error.
//!
//! Within a merged step the previous (old-self) progression is evaluated
//! before the other counter's.

use handoff_guard::{
    Access, ArgVector, ArgumentPolicy, Consumable, Handle, Replicate, Result, TransferGuard,
    ValidityFlag,
};
use tracing::debug;

#[derive(Debug)]
enum Progression {
    Own,
    Merged {
        prior: Box<Progression>,
        other: Handle<CounterState>,
    },
}

impl Progression {
    fn replicate(&self) -> Self {
        match self {
            Progression::Own => Progression::Own,
            Progression::Merged { prior, other } => Progression::Merged {
                prior: Box::new(prior.replicate()),
                other: Handle::new(other.borrow().replicate()),
            },
        }
    }
}

/// State behind a [`ClosureCounter`].
#[derive(Debug)]
pub struct CounterState {
    count: u64,
    progression: Progression,
    validity: ValidityFlag,
}

impl CounterState {
    fn new() -> Self {
        Self {
            count: 0,
            progression: Progression::Own,
            validity: ValidityFlag::new(),
        }
    }

    /// Current value of the counter's own count.
    pub fn count(&self) -> u64 {
        self.count
    }

    fn step(&mut self) -> u64 {
        advance(&mut self.count, &mut self.progression)
    }

    fn absorb(&mut self, other: Handle<CounterState>) {
        let prior = std::mem::replace(&mut self.progression, Progression::Own);
        self.progression = Progression::Merged {
            prior: Box::new(prior),
            other,
        };
    }
}

fn advance(count: &mut u64, progression: &mut Progression) -> u64 {
    match progression {
        Progression::Own => {
            *count += 1;
            *count
        }
        Progression::Merged { prior, other } => {
            let from_self = advance(count, prior);
            let from_other = other.borrow_mut().step();
            from_self + from_other
        }
    }
}

impl Consumable for CounterState {
    fn is_valid(&self) -> bool {
        self.validity.is_valid()
    }

    fn invalidate(&mut self) {
        self.validity.invalidate();
    }
}

impl Replicate for CounterState {
    /// Deep copy: merged counters are copied too, so the copy never drives
    /// anything the original drives.
    fn replicate(&self) -> Self {
        Self {
            count: self.count,
            progression: self.progression.replicate(),
            validity: ValidityFlag::new(),
        }
    }
}

fn merge_progressions(
    receiver: &Handle<CounterState>,
    others: &[Handle<CounterState>],
) -> Result<()> {
    let mut state = receiver.borrow_mut();
    for other in others {
        state.absorb(other.clone());
    }
    Ok(())
}

/// Counter whose `combine` is guarded and clones aliased arguments.
#[derive(Debug)]
pub struct ClosureCounter {
    handle: Handle<CounterState>,
}

impl ClosureCounter {
    /// Fresh counter; its first step yields 1.
    pub fn new() -> Self {
        Self {
            handle: Handle::new(CounterState::new()),
        }
    }

    /// Underlying handle.
    pub fn handle(&self) -> &Handle<CounterState> {
        &self.handle
    }

    /// Whether the counter may still be used directly.
    pub fn is_valid(&self) -> bool {
        self.handle.borrow().is_valid()
    }

    /// Advance once and return the value.
    pub fn consume_one(&self, access: Access) -> Result<u64> {
        let mut state = self.handle.borrow_mut();
        state.validity.ensure_usable(access)?;
        Ok(state.step())
    }

    /// `self + other`: afterwards each step of `self` also steps `other`.
    ///
    /// `other` is consumed. Combining with itself steps an independent copy.
    pub fn combine(&self, other: &ClosureCounter) -> Result<()> {
        let guard = TransferGuard::new("combine", ArgumentPolicy::pair())?.replicating();
        guard.call(
            ArgVector::with_others(self.handle.clone(), [other.handle.clone()]),
            merge_progressions,
        )
    }

    /// Combine without the guard; `other` stays usable and shares its
    /// progression with `self`.
    ///
    /// # Panics
    ///
    /// Stepping a counter combined with itself this way re-enters its own
    /// state and panics.
    pub fn combine_unguarded(&self, other: &ClosureCounter) {
        debug!(other = %other.handle.id(), "Combining counters without guard");
        self.handle.borrow_mut().absorb(other.handle.clone());
    }

    /// Independent copy of the current state.
    pub fn replicate(&self) -> ClosureCounter {
        ClosureCounter {
            handle: Handle::new(self.handle.borrow().replicate()),
        }
    }
}

impl Default for ClosureCounter {
    fn default() -> Self {
        Self::new()
    }
}

//! # Handoff Guard - Ownership Transfer Guard
//!
//! Wraps "combine" operations, which merge the state of one object into
//! another, with detection of two usage bugs:
//!
//! - the same object passed into one call more than once
//! - an object used after its state was transferred away by such a call
//!
//! A [`TransferGuard`] is configured once per operation with an
//! [`ArgumentPolicy`] and an optional cloner. Each call resolves aliasing,
//! checks validity, runs the operation and invalidates the consumed
//! arguments.
//!
//! ```rust,ignore
//! use handoff_guard::prelude::*;
//!
//! let guard = TransferGuard::new("combine", ArgumentPolicy::pair())?.replicating();
//! guard.call(ArgVector::with_others(x.clone(), [y.clone()]), |receiver, others| {
//!     receiver.borrow_mut().absorb(&others[0]);
//!     Ok::<_, GuardError>(())
//! })?;
//! assert!(!y.borrow().is_valid());
//! ```

pub mod capability;
pub mod config;
pub mod errors;
pub mod guards;
pub mod handle;
pub mod prelude;

pub use capability::{cloner_from_replicate, Access, Cloner, Consumable, Replicate, ValidityFlag};
pub use config::GuardConfig;
pub use errors::{GuardError, Result};
pub use guards::*;
pub use handle::{ArgVector, Handle, ObjectId};

//! Transfer guard stages and their composition
//!
//! ```text
//! RepeatDetector → InvalidationController → Operation
//! ```

pub mod chain;
pub mod invalidation;
pub mod policy;
pub mod repeat;

pub use chain::{GuardedOperation, GuardedOutcome, TransferGuard, TransferReport};
pub use invalidation::InvalidationController;
pub use policy::{ArgumentPolicy, SlotRole};
pub use repeat::{RepeatDetector, Resolution, Substitution};

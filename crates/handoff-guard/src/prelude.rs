//! Handoff Guard prelude.
//!
//! Curated re-exports for guarding combine operations.

pub use crate::capability::{Access, Cloner, Consumable, Replicate, ValidityFlag};
pub use crate::config::GuardConfig;
pub use crate::errors::GuardError;
pub use crate::guards::{ArgumentPolicy, GuardedOperation, SlotRole, TransferGuard, TransferReport};
pub use crate::handle::{ArgVector, Handle};

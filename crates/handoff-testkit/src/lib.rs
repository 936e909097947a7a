//! Handoff Testing Infrastructure
//!
//! Example payload types for exercising the transfer guard, plus assertion
//! macros, proptest strategies and a tracing initializer shared by the
//! integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
//!
//! # Usage
//!
//! ```rust,no_run
//! use handoff_testkit::*;
//!
//! let x = SequenceContainer::new([1, 2, 3]);
//! let y = SequenceContainer::new([4, 5, 6]);
//! x.combine(&y).unwrap();
//! assert_consumed!(y);
//! ```

pub mod assertions;
pub mod counter;
pub mod sequence;
pub mod strategies;

pub use counter::{ClosureCounter, CounterState};
pub use handoff_guard::{Access, GuardError};
pub use sequence::{AliasPolicy, SequenceContainer, SequenceState};

use tracing_subscriber::EnvFilter;

/// Install a test-friendly tracing subscriber.
///
/// Honours `RUST_LOG`, defaulting to `warn`. Safe to call from every test.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

//! Property test strategies for guarded combine calls
//!
//! # Example
//!
//! ```rust
//! use handoff_testkit::strategies::arb_combine_layout;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn picks_are_in_range(layout in arb_combine_layout()) {
//!         prop_assert!(layout.picks.iter().all(|&i| i < layout.pool.len()));
//!     }
//! }
//! ```

use proptest::prelude::*;

// Re-export proptest for convenience
pub use proptest;

/// Contents of one sequence container.
pub fn arb_values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-100i64..100, 0..6)
}

/// A pool of containers and the arguments of one `combine_many` call.
///
/// Index 0 of the pool is the receiver. `picks` index into the pool and may
/// repeat, including the receiver.
#[derive(Debug, Clone)]
pub struct CombineLayout {
    /// Initial contents per container
    pub pool: Vec<Vec<i64>>,
    /// Pool indices passed as the variadic arguments, in order
    pub picks: Vec<usize>,
}

impl CombineLayout {
    /// Whether any container appears twice among receiver and picks.
    pub fn has_repeats(&self) -> bool {
        let mut seen = vec![false; self.pool.len()];
        seen[0] = true;
        for &pick in &self.picks {
            if seen[pick] {
                return true;
            }
            seen[pick] = true;
        }
        false
    }

    /// Values the receiver yields after an auto-cloning `combine_many`.
    pub fn expected_concatenation(&self) -> Vec<i64> {
        let mut expected = self.pool[0].clone();
        for &pick in &self.picks {
            expected.extend(self.pool[pick].iter().copied());
        }
        expected
    }
}

/// Strategy for [`CombineLayout`] with 1 to 4 containers and up to 8 picks.
pub fn arb_combine_layout() -> impl Strategy<Value = CombineLayout> {
    (1usize..5).prop_flat_map(|size| {
        (
            prop::collection::vec(arb_values(), size),
            prop::collection::vec(0..size, 0..8),
        )
            .prop_map(|(pool, picks)| CombineLayout { pool, picks })
    })
}

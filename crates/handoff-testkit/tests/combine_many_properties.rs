//! Property tests for `combine_many` over arbitrary argument layouts.
#![allow(missing_docs)]

use handoff_testkit::strategies::{arb_combine_layout, CombineLayout};
use handoff_testkit::{Access, AliasPolicy, GuardError, SequenceContainer};
use proptest::prelude::*;

fn build(layout: &CombineLayout, aliasing: AliasPolicy) -> Vec<SequenceContainer> {
    layout
        .pool
        .iter()
        .map(|values| SequenceContainer::with_alias_policy(values.iter().copied(), aliasing))
        .collect()
}

fn run(pool: &[SequenceContainer], picks: &[usize]) -> Result<(), GuardError> {
    let others: Vec<&SequenceContainer> = picks.iter().map(|&i| &pool[i]).collect();
    pool[0].combine_many(&others)
}

proptest! {
    #[test]
    fn auto_clone_concatenates_and_consumes_picked(layout in arb_combine_layout()) {
        let pool = build(&layout, AliasPolicy::AutoClone);
        prop_assert!(run(&pool, &layout.picks).is_ok());

        for (index, container) in pool.iter().enumerate() {
            let picked = index != 0 && layout.picks.contains(&index);
            prop_assert_eq!(container.is_valid(), !picked);
        }
        prop_assert_eq!(
            pool[0].consume_to_list(Access::Checked).unwrap(),
            layout.expected_concatenation()
        );
    }

    #[test]
    fn reject_succeeds_only_without_repeats(layout in arb_combine_layout()) {
        let pool = build(&layout, AliasPolicy::Reject);
        let outcome = run(&pool, &layout.picks);

        if layout.has_repeats() {
            prop_assert!(
                matches!(outcome, Err(GuardError::AliasWithoutCloner { .. })),
                "expected alias error, got {:?}",
                outcome
            );
            for (container, values) in pool.iter().zip(&layout.pool) {
                prop_assert!(container.is_valid());
                prop_assert_eq!(&container.consume_to_list(Access::Checked).unwrap(), values);
            }
        } else {
            prop_assert!(outcome.is_ok());
            prop_assert_eq!(
                pool[0].consume_to_list(Access::Checked).unwrap(),
                layout.expected_concatenation()
            );
        }
    }
}

//! Guarded combine on iterator-backed sequence containers.
#![allow(missing_docs)]

use assert_matches::assert_matches;
use handoff_testkit::{
    assert_consumed, assert_guard_error, assert_usable, init_test_tracing, Access, GuardError,
    SequenceContainer,
};

fn combined_pair() -> (SequenceContainer, SequenceContainer) {
    init_test_tracing();
    let x = SequenceContainer::new([1, 2, 3]);
    let y = SequenceContainer::new([4, 5, 6]);
    assert_usable!(x);
    assert_usable!(y);
    x.combine(&y).expect("combine should succeed");
    assert_usable!(x);
    assert_consumed!(y);
    (x, y)
}

#[test]
fn receiver_yields_both_contents() {
    let (x, y) = combined_pair();

    assert_eq!(x.consume_to_list(Access::Checked).unwrap(), vec![1, 2, 3, 4, 5, 6]);
    assert_guard_error!(
        y.consume_to_list(Access::Checked),
        GuardError::ConsumedObject { position: None }
    );
    assert!(y.consume_to_list(Access::IgnoreValidity).unwrap().is_empty());
}

#[test]
fn bypass_on_consumed_drains_the_shared_tail() {
    let (x, y) = combined_pair();

    assert_eq!(y.consume_to_list(Access::IgnoreValidity).unwrap(), vec![4, 5, 6]);
    assert_eq!(x.consume_to_list(Access::Checked).unwrap(), vec![1, 2, 3]);
}

#[test]
fn bypass_consume_one_moves_both_views() {
    let (x, y) = combined_pair();

    assert_eq!(y.consume_one(Access::IgnoreValidity).unwrap(), Some(4));
    assert_eq!(x.consume_to_list(Access::Checked).unwrap(), vec![1, 2, 3, 5, 6]);
    assert_guard_error!(
        y.consume_to_list(Access::Checked),
        GuardError::ConsumedObject { .. }
    );
    assert!(y.consume_to_list(Access::IgnoreValidity).unwrap().is_empty());
}

#[test]
fn checked_consume_one_on_consumed_fails() {
    let (x, y) = combined_pair();

    assert_guard_error!(y.consume_one(Access::Checked), GuardError::ConsumedObject { .. });
    assert_eq!(y.consume_one(Access::IgnoreValidity).unwrap(), Some(4));
    assert_eq!(y.consume_to_list(Access::IgnoreValidity).unwrap(), vec![5, 6]);
    assert_eq!(x.consume_to_list(Access::Checked).unwrap(), vec![1, 2, 3]);
}

#[test]
fn self_combine_without_cloner_is_rejected_untouched() {
    init_test_tracing();
    let x = SequenceContainer::new([1, 2, 3]);

    assert_matches!(
        x.combine(&x),
        Err(GuardError::AliasWithoutCloner {
            position: 1,
            first_seen: 0
        })
    );
    assert_usable!(x);
    assert_eq!(x.consume_to_list(Access::Checked).unwrap(), vec![1, 2, 3]);
}

#[test]
fn self_combine_with_cloner_appends_a_copy() {
    init_test_tracing();
    let x = SequenceContainer::auto_clone([1, 2, 3]);

    x.combine(&x).expect("repeat is cloned");
    assert_usable!(x);
    assert_eq!(
        x.consume_to_list(Access::Checked).unwrap(),
        vec![1, 2, 3, 1, 2, 3]
    );
}

#[test]
fn self_combine_clones_the_remaining_values() {
    init_test_tracing();
    let x = SequenceContainer::auto_clone([1, 2, 3]);
    assert_eq!(x.consume_one(Access::Checked).unwrap(), Some(1));

    x.combine(&x).unwrap();
    assert_eq!(x.consume_to_list(Access::Checked).unwrap(), vec![2, 3, 2, 3]);
}

#[test]
fn auto_clone_pair_still_consumes_other() {
    init_test_tracing();
    let x = SequenceContainer::auto_clone([1, 2, 3]);
    let y = SequenceContainer::auto_clone([4, 5, 6]);
    x.combine(&y).unwrap();

    assert_consumed!(y);
    assert_eq!(y.consume_to_list(Access::IgnoreValidity).unwrap(), vec![4, 5, 6]);
    assert_eq!(x.consume_to_list(Access::Checked).unwrap(), vec![1, 2, 3]);
    assert_guard_error!(y.consume_to_list(Access::Checked), GuardError::ConsumedObject { .. });
}

#[test]
fn combine_many_rejects_every_repeat_layout() {
    init_test_tracing();
    let x = SequenceContainer::new([1, 2, 3]);
    let y = SequenceContainer::new([4, 5, 6]);

    assert_matches!(
        x.combine_many(&[&y, &x, &x, &y]),
        Err(GuardError::AliasWithoutCloner {
            position: 2,
            first_seen: 0
        })
    );
    assert_matches!(
        x.combine_many(&[&y, &y]),
        Err(GuardError::AliasWithoutCloner {
            position: 2,
            first_seen: 1
        })
    );
    assert_guard_error!(x.combine_many(&[&x, &x, &x]), GuardError::AliasWithoutCloner { .. });
    assert_guard_error!(x.combine_many(&[&x]), GuardError::AliasWithoutCloner { .. });

    // nothing above mutated or consumed anything
    assert_usable!(x);
    assert_usable!(y);
    x.combine_many(&[&y]).unwrap();
    assert_consumed!(y);
    assert_eq!(
        x.consume_to_list(Access::Checked).unwrap(),
        vec![1, 2, 3, 4, 5, 6]
    );
}

#[test]
fn combine_many_clones_each_repeat_at_scan_time() {
    init_test_tracing();
    let x = SequenceContainer::auto_clone([1, 2, 3]);
    let y = SequenceContainer::auto_clone([4, 5, 6]);
    let z = SequenceContainer::auto_clone([7]);
    let w = SequenceContainer::auto_clone([8]);

    x.combine_many(&[&y, &x, &x, &y, &z, &z]).unwrap();

    assert_usable!(x);
    assert_consumed!(y);
    assert_consumed!(z);
    assert_usable!(w);
    assert_eq!(
        x.consume_to_list(Access::Checked).unwrap(),
        vec![1, 2, 3, 4, 5, 6, 1, 2, 3, 1, 2, 3, 4, 5, 6, 7, 7]
    );
    assert_eq!(w.consume_to_list(Access::Checked).unwrap(), vec![8]);
}

#[test]
fn combine_many_without_arguments_is_a_no_op() {
    init_test_tracing();
    let x = SequenceContainer::new([1, 2]);
    x.combine_many(&[]).unwrap();
    assert_usable!(x);
    assert_eq!(x.consume_to_list(Access::Checked).unwrap(), vec![1, 2]);
}

#[test]
fn consumed_receiver_is_rejected() {
    let (_x, y) = combined_pair();
    let z = SequenceContainer::new([7]);

    assert_matches!(y.combine(&z), Err(GuardError::ConsumedObject { position: Some(0) }));
    assert_usable!(z);
    assert_eq!(z.consume_to_list(Access::Checked).unwrap(), vec![7]);
}

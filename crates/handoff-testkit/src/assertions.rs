//! Standard assertion helpers for guard tests
//!
//! The macros work on any value exposing `is_valid(&self) -> bool`, which
//! covers both payload types in this crate.

/// Assert that an object has been consumed by a guarded call
#[macro_export]
macro_rules! assert_consumed {
    ($object:expr) => {
        assert!(
            !$object.is_valid(),
            "Expected {} to be consumed, but it is still valid",
            stringify!($object)
        )
    };
}

/// Assert that an object is still valid
#[macro_export]
macro_rules! assert_usable {
    ($object:expr) => {
        assert!(
            $object.is_valid(),
            "Expected {} to be valid, but it has been consumed",
            stringify!($object)
        )
    };
}

/// Assert that an expression fails with a guard error matching `$pattern`
#[macro_export]
macro_rules! assert_guard_error {
    ($result:expr, $pattern:pat) => {
        match $result {
            Ok(_) => panic!("Expected {} to fail", stringify!($result)),
            Err(err) => assert!(
                matches!(err, $pattern),
                "Unexpected error from {}: {}",
                stringify!($result),
                err
            ),
        }
    };
}

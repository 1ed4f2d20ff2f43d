#![allow(dead_code)]

use super::fixtures::Point;
use proptest::prelude::*;

/// Strategy for generating dotted type names like `com.example.Widget`
pub fn type_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}(\\.[a-z][a-z0-9]{0,7}){0,3}\\.[A-Z][a-zA-Z0-9]{0,15}"
}

/// Strategy for generating plugin scope names
pub fn scope_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,23}"
}

/// Strategy for generating arbitrary UTF-8 strings, including empty ones
pub fn any_string_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-zA-Z0-9 ._-]{1,64}",
        any::<String>(),
    ]
}

pub fn point_strategy() -> impl Strategy<Value = Point> {
    (any::<i32>(), any::<i32>()).prop_map(|(x, y)| Point::new(x, y))
}

/// Sequence of (scope index, name index) lookups over small pools
pub fn lookup_sequence_strategy(
    scopes: usize,
    names: usize,
) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..scopes, 0..names), 1..64)
}

//! Common utilities for integration tests

#![allow(dead_code, unused_imports)]

pub mod test_helpers;

// Re-export commonly used items
pub use test_helpers::{
    assert_vectors_close,
    exponential_source_profile,
    homogeneous_scenario,
    max_abs_diff,
    relative_error,
};

//! Common utilities for integration tests

#![allow(dead_code)]

pub mod mock_models;
pub mod test_helpers;

// Re-export commonly used items
pub use mock_models::{ConstantDrift, HarmonicOscillator};
pub use test_helpers::{
    ThresholdGuard,
    assert_states_close,
    compute_l2_error,
    l4_scenario,
    relative_error,
};

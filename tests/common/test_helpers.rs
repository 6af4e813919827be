//! Helper functions for integration tests

use trojan_rs::models::{EquationsOfMotion, FrameModel};
use trojan_rs::physics::{PhaseChannel, PhaseState};
use trojan_rs::solver::{Scenario, parallel_threshold, set_parallel_threshold};

/// Assert that two batched states are close (within tolerance)
pub fn assert_states_close(
    state1: &PhaseState,
    state2: &PhaseState,
    tolerance: f64,
    message: &str,
) {
    assert_eq!(
        state1.particles(),
        state2.particles(),
        "{}: particle count mismatch",
        message
    );

    for channel in PhaseChannel::ALL {
        for (i, (v1, v2)) in state1
            .get(channel)
            .iter()
            .zip(state2.get(channel).iter())
            .enumerate()
        {
            let diff = (v1 - v2).abs();
            assert!(
                diff < tolerance,
                "{}: {}[{}] differs by {} (tolerance {})",
                message, channel, i, diff, tolerance
            );
        }
    }
}

/// Root-mean-square difference over every channel of two states
pub fn compute_l2_error(state1: &PhaseState, state2: &PhaseState) -> f64 {
    let a = state1.to_flat();
    let b = state2.to_flat();
    if a.is_empty() {
        return 0.0;
    }

    let sum_squared_diff: f64 = a.iter().zip(&b).map(|(v1, v2)| (v1 - v2).powi(2)).sum();
    (sum_squared_diff / a.len() as f64).sqrt()
}

/// Relative error |computed - exact| / |exact|
pub fn relative_error(computed: f64, exact: f64) -> f64 {
    if exact.abs() < 1e-15 {
        computed.abs()
    } else {
        (computed - exact).abs() / exact.abs()
    }
}

/// One particle at rest exactly at L4 of `frame`
pub fn l4_scenario(frame: FrameModel) -> Scenario {
    let (lx, ly) = frame.l4();
    Scenario::new(
        Box::new(EquationsOfMotion::new(frame)),
        PhaseState::single(lx, ly, 0.0, 0.0),
    )
}

/// Sets the parallel threshold and restores the previous value on drop
pub struct ThresholdGuard {
    previous: usize,
}

impl ThresholdGuard {
    pub fn save(threshold: usize) -> Self {
        let previous = parallel_threshold();
        set_parallel_threshold(threshold);
        Self { previous }
    }
}

impl Drop for ThresholdGuard {
    fn drop(&mut self) {
        set_parallel_threshold(self.previous);
    }
}

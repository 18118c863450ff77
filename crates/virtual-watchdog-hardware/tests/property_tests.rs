//! Property-based tests for run-state and range invariants.

use proptest::prelude::*;
use virtual_watchdog_hardware::prelude::*;

proptest! {
    #[test]
    fn test_kick_count_matches_kicks(kicks in 0u32..500) {
        let state = RunState::new();
        state.start().expect("start should succeed");

        for _ in 0..kicks {
            state.kick().expect("kick should succeed");
        }
        prop_assert_eq!(state.kick_count(), kicks);
        prop_assert_eq!(state.status(), HardwareStatus::Running);
    }

    #[test]
    fn test_range_validation_is_exact(
        min in 1u32..10_000,
        span in 0u32..10_000,
        requested in 0u32..40_000,
    ) {
        let max = min + span;
        let watchdog = SoftwareWatchdog::with_range(min, max).expect("valid range");

        let in_range = (min..=max).contains(&requested);
        prop_assert_eq!(watchdog.supports_timeout(requested), in_range);
    }

    #[test]
    fn test_empty_or_zero_ranges_rejected(min in 1u32..1000, below in 0u32..1000) {
        prop_assume!(below < min);
        prop_assert!(SoftwareWatchdogConfig::new(min, below).is_err());
        prop_assert!(SoftwareWatchdogConfig::new(0, min).is_err());
    }

    #[test]
    fn test_start_kick_stop_leaves_stopped(kicks in 0u32..50) {
        let mut watchdog = SoftwareWatchdog::with_default_range();
        watchdog.start(30_000).expect("start should succeed");
        for _ in 0..kicks {
            watchdog.kick().expect("kick should succeed");
        }
        watchdog.stop().expect("stop should succeed");
        prop_assert_eq!(watchdog.status(), HardwareStatus::Stopped);
    }
}

//! Unit tests for the hardware watchdog adapter seam.

use virtual_watchdog_hardware::prelude::*;

mod run_state {
    use super::*;

    #[test]
    fn test_initial_state_is_stopped() -> Result<(), Box<dyn std::error::Error>> {
        let watchdog = SoftwareWatchdog::with_default_range();
        assert_eq!(watchdog.status(), HardwareStatus::Stopped);
        assert!(!watchdog.is_running());
        Ok(())
    }

    #[test]
    fn test_start_stop_cycle() -> Result<(), Box<dyn std::error::Error>> {
        let mut watchdog = SoftwareWatchdog::with_default_range();
        watchdog.start(1000)?;
        assert!(watchdog.is_running());

        watchdog.stop()?;
        assert_eq!(watchdog.status(), HardwareStatus::Stopped);
        Ok(())
    }

    #[test]
    fn test_cannot_start_twice() -> Result<(), Box<dyn std::error::Error>> {
        let mut watchdog = SoftwareWatchdog::with_default_range();
        watchdog.start(1000)?;

        let result = watchdog.start(1000);
        assert!(matches!(result, Err(HardwareWatchdogError::AlreadyRunning)));
        Ok(())
    }

    #[test]
    fn test_cannot_stop_when_stopped() {
        let mut watchdog = SoftwareWatchdog::with_default_range();
        let result = watchdog.stop();
        assert!(matches!(result, Err(HardwareWatchdogError::NotRunning)));
    }
}

mod range_validation {
    use super::*;

    #[test]
    fn test_start_rejects_out_of_range_timeout() -> Result<(), Box<dyn std::error::Error>> {
        let mut watchdog = SoftwareWatchdog::with_range(100, 5000)?;

        assert!(matches!(
            watchdog.start(50),
            Err(HardwareWatchdogError::TimeoutOutOfRange {
                requested_ms: 50,
                min_ms: 100,
                max_ms: 5000,
            })
        ));
        assert!(matches!(
            watchdog.start(10_000),
            Err(HardwareWatchdogError::TimeoutOutOfRange { .. })
        ));
        assert!(!watchdog.is_running());
        Ok(())
    }

    #[test]
    fn test_supports_timeout_matches_range() -> Result<(), Box<dyn std::error::Error>> {
        let watchdog = SoftwareWatchdog::with_range(100, 5000)?;
        assert!(watchdog.supports_timeout(100));
        assert!(watchdog.supports_timeout(5000));
        assert!(!watchdog.supports_timeout(99));
        assert!(!watchdog.supports_timeout(5001));
        Ok(())
    }
}

mod expiry {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_unfed_watchdog_expires() -> Result<(), Box<dyn std::error::Error>> {
        let mut watchdog = SoftwareWatchdog::with_default_range();
        watchdog.start(10)?;

        thread::sleep(Duration::from_millis(30));

        assert_eq!(watchdog.status(), HardwareStatus::Expired);
        assert!(matches!(
            watchdog.kick(),
            Err(HardwareWatchdogError::Expired)
        ));
        Ok(())
    }

    #[test]
    fn test_fed_watchdog_survives() -> Result<(), Box<dyn std::error::Error>> {
        let mut watchdog = SoftwareWatchdog::with_default_range();
        watchdog.start(100)?;

        for _ in 0..5 {
            thread::sleep(Duration::from_millis(20));
            watchdog.kick()?;
        }
        assert!(watchdog.is_running());
        Ok(())
    }
}

mod probe {
    use super::*;

    #[test]
    fn test_probe_counts_survive_boxing() -> Result<(), Box<dyn std::error::Error>> {
        let watchdog = SoftwareWatchdog::with_default_range();
        let probe = watchdog.probe();

        let mut boxed: Box<dyn HardwareWatchdog> = Box::new(watchdog);
        boxed.start(2000)?;
        for _ in 0..3 {
            boxed.kick()?;
        }
        boxed.stop()?;

        assert_eq!(probe.start_count(), 1);
        assert_eq!(probe.kick_count(), 3);
        assert_eq!(probe.stop_count(), 1);
        assert_eq!(probe.expire_count(), 0);
        assert_eq!(probe.armed_timeout_ms(), Some(2000));
        Ok(())
    }
}

//! Concurrency tests with a real timer thread and kicking workers.

use std::thread;
use std::time::Duration;
use virtual_watchdog::prelude::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn test_many_threads_keep_the_feed_alive() -> TestResult {
    let hardware = SoftwareWatchdog::with_default_range();
    let probe = hardware.probe();
    let config = SupervisorConfig::builder()
        .hardware_timeout_ms(10_000)
        .tick_period(Duration::from_millis(5))
        .build()?;
    let supervisor =
        WatchdogSupervisor::new(config, Box::new(hardware), Box::new(ThreadTicker::new()))?;

    let mut workers = Vec::new();
    for worker in 0..8 {
        let mut client = supervisor.client(Duration::from_millis(500), format!("worker-{worker}"))?;
        client.start()?;
        workers.push(thread::spawn(move || -> VirtualWatchdogResult<()> {
            // Kick well inside the 500ms timeout for ~200ms.
            for _ in 0..40 {
                client.kick()?;
                thread::sleep(Duration::from_millis(5));
            }
            client.stop()?;
            Ok(())
        }));
    }
    assert!(supervisor.is_armed());

    for worker in workers {
        worker.join().expect("worker thread panicked")?;
    }

    let stats = supervisor.stats();
    assert_eq!(stats.active_clients, 0);
    assert!(!stats.armed);
    assert_eq!(stats.starved_ticks, 0);
    assert!(stats.feeds > 0);
    assert_eq!(stats.feeds, stats.ticks);
    assert_eq!(probe.expire_count(), 0);
    assert_eq!(probe.status(), HardwareStatus::Stopped);
    Ok(())
}

#[test]
fn test_start_stop_churn_settles_clean() -> TestResult {
    let hardware = SoftwareWatchdog::with_default_range();
    let probe = hardware.probe();
    let config = SupervisorConfig::builder()
        .hardware_timeout_ms(10_000)
        .tick_period(Duration::from_millis(5))
        .build()?;
    let supervisor =
        WatchdogSupervisor::new(config, Box::new(hardware), Box::new(ThreadTicker::new()))?;

    let mut churners = Vec::new();
    for worker in 0..4 {
        let supervisor = supervisor.clone();
        churners.push(thread::spawn(move || -> VirtualWatchdogResult<()> {
            for round in 0..20 {
                let mut client =
                    supervisor.client(Duration::from_millis(200), format!("churn-{worker}-{round}"))?;
                client.start()?;
                client.kick()?;
                thread::sleep(Duration::from_millis(1));
                client.stop()?;
            }
            Ok(())
        }));
    }

    for churner in churners {
        churner.join().expect("churn thread panicked")?;
    }

    assert_eq!(supervisor.active_clients(), 0);
    assert!(!supervisor.is_armed());
    assert_eq!(probe.status(), HardwareStatus::Stopped);
    assert_eq!(probe.expire_count(), 0);
    // Arm/release cycles stay paired.
    assert_eq!(probe.start_count(), probe.stop_count());
    Ok(())
}

#[test]
fn test_supervisor_clones_share_state() -> TestResult {
    let config = SupervisorConfig::builder()
        .hardware_timeout_ms(10_000)
        .tick_period(Duration::from_millis(5))
        .build()?;
    let supervisor = WatchdogSupervisor::new(
        config,
        Box::new(SoftwareWatchdog::with_default_range()),
        Box::new(ThreadTicker::new()),
    )?;
    let observer = supervisor.clone();

    let mut client = supervisor.client(Duration::from_millis(100), "shared")?;
    client.start()?;
    assert!(observer.is_armed());
    assert_eq!(observer.active_clients(), 1);

    client.stop()?;
    assert!(!observer.is_armed());
    Ok(())
}

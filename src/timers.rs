//! Timing utilities for the processing phases.
//!
//! A [`PhaseTimer`] adds the time elapsed between its creation and its drop
//! to a `Duration` slot, so the phase is accounted for even when it exits
//! early through `?`.

use std::time::{Duration, Instant};

/// RAII timer that records elapsed time to a mutable slot on Drop.
pub struct PhaseTimer<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}

/// Time spent in each phase of one processing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseTimings {
    /// Collecting input files and scanning them for markers
    pub scan: Duration,
    /// Validating, grouping and consolidating markers into documents
    pub build: Duration,
    /// Writing policy and documentation files
    pub write: Duration,
}

impl PhaseTimings {
    pub fn total(&self) -> Duration {
        self.scan + self.build + self.write
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_phase_timer_records_elapsed() {
        let mut duration = Duration::ZERO;
        {
            let _timer = PhaseTimer::new(&mut duration);
            thread::sleep(Duration::from_millis(10));
        }
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_phase_timer_records_on_early_return() {
        fn fails(slot: &mut Duration) -> Result<(), ()> {
            let _timer = PhaseTimer::new(slot);
            thread::sleep(Duration::from_millis(5));
            Err(())
        }

        let mut duration = Duration::ZERO;
        assert!(fails(&mut duration).is_err());
        assert!(duration.as_millis() >= 5);
    }

    #[test]
    fn test_phase_timings_total() {
        let timings = PhaseTimings {
            scan: Duration::from_millis(3),
            build: Duration::from_millis(4),
            write: Duration::from_millis(5),
        };
        assert_eq!(timings.total(), Duration::from_millis(12));
    }
}

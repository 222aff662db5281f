use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

/// Single source of wall-clock reads for sessions and metrics.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

/// Production clock backed by the OS.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Hand-driven clock. Clones share the same instant, so a test can keep one
/// handle and advance time under an `App` that owns another.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Rc<Cell<SystemTime>>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(SystemTime::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}

/// Elapsed time between two readings, zero if the clock went backwards.
pub fn elapsed_between(start: SystemTime, end: SystemTime) -> Duration {
    end.duration_since(start).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::default();
        let handle = clock.clone();

        handle.advance(Duration::from_secs(3));

        assert_eq!(
            clock.now(),
            SystemTime::UNIX_EPOCH + Duration::from_secs(3)
        );
    }

    #[test]
    fn test_elapsed_between_backwards_is_zero() {
        let later = SystemTime::UNIX_EPOCH + Duration::from_secs(10);

        assert_eq!(
            elapsed_between(later, SystemTime::UNIX_EPOCH),
            Duration::ZERO
        );
        assert_eq!(
            elapsed_between(SystemTime::UNIX_EPOCH, later),
            Duration::from_secs(10)
        );
    }
}

//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Mock clock for testing.
///
/// Allows tests to control time progression explicitly, enabling deterministic
/// testing of interval windows.
///
/// # Examples
///
/// ```ignore
/// use throttle_gate::infrastructure::mocks::MockClock;
/// use throttle_gate::application::ports::Clock;
/// use std::time::Duration;
///
/// let clock = MockClock::new(1_000);
///
/// // Time starts at the specified epoch millis
/// assert_eq!(clock.now_millis(), 1_000);
///
/// // Advance time explicitly
/// clock.advance(Duration::from_secs(10));
/// assert_eq!(clock.now_millis(), 11_000);
///
/// // Or set to a specific time, including backwards
/// clock.set(500);
/// assert_eq!(clock.now_millis(), 500);
/// ```
///
/// # Thread Safety
///
/// `MockClock` is thread-safe and can be cloned to share across threads.
/// All clones share the same underlying time value.
#[derive(Debug, Clone)]
pub struct MockClock {
    current_millis: Arc<Mutex<u64>>,
}

impl MockClock {
    /// Create a mock clock starting at `start_millis` since the epoch.
    pub fn new(start_millis: u64) -> Self {
        Self {
            current_millis: Arc::new(Mutex::new(start_millis)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let step = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        let mut time = self.lock();
        *time = time.saturating_add(step);
    }

    /// Set the clock to a specific time.
    pub fn set(&self, millis: u64) {
        *self.lock() = millis;
    }

    fn lock(&self) -> MutexGuard<'_, u64> {
        self.current_millis
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
    }
}

impl Clock for MockClock {
    fn now_millis(&self) -> u64 {
        *self.lock()
    }
}

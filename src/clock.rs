use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

/// A source of wall-clock time.
///
/// Wall-clock time is not monotonic, so readings may go backwards.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<F> Clock for F
where
    F: Fn() -> SystemTime,
{
    fn now(&self) -> SystemTime {
        self()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a caller can keep a handle while the
/// stopwatch owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    time: Arc<RwLock<SystemTime>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(SystemTime::UNIX_EPOCH)
    }
}

impl ManualClock {
    pub fn new(time: SystemTime) -> Self {
        Self {
            time: Arc::new(RwLock::new(time)),
        }
    }

    pub fn set(&self, time: SystemTime) {
        let mut guard = self.time.write().unwrap_or_else(|e| e.into_inner());
        *guard = time;
    }

    /// Moves the clock forwards.
    ///
    /// A step past the largest representable time leaves the clock unchanged.
    pub fn advance(&self, duration: Duration) {
        let mut guard = self.time.write().unwrap_or_else(|e| e.into_inner());
        match guard.checked_add(duration) {
            Some(time) => *guard = time,
            None => tracing::warn!(?duration, "Ignoring a clock advance that overflows"),
        }
    }

    /// Moves the clock backwards, as a wall clock adjustment would.
    ///
    /// A step past the smallest representable time leaves the clock unchanged.
    pub fn rewind(&self, duration: Duration) {
        let mut guard = self.time.write().unwrap_or_else(|e| e.into_inner());
        match guard.checked_sub(duration) {
            Some(time) => *guard = time,
            None => tracing::warn!(?duration, "Ignoring a clock rewind that overflows"),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        match self.time.read() {
            Ok(guard) => *guard,
            Err(e) => *e.into_inner(),
        }
    }
}

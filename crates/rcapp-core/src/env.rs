//! Clock abstraction for deterministic testing.
//!
//! The engine's only dependency on the outside world is the wall clock used
//! to stamp outbound commands. Production uses [`SystemClock`]; tests pin the
//! time with [`FixedClock`] so envelopes are byte-for-byte reproducible.

use chrono::{DateTime, Utc};

/// Source of send-time timestamps.
pub trait Clock: Clone + Send + Sync + 'static {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Clock frozen at the Unix epoch.
    #[must_use]
    pub fn epoch() -> Self {
        Self(DateTime::<Utc>::default())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

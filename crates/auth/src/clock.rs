//! Injectable time source for token expiry computation.

use chrono::{DateTime, Utc};

/// Current time provider.
///
/// Token issuance and verification take their notion of "now" from here, so
/// tests can pin time instead of racing the wall clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation used outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

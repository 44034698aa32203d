//! Process-wide throttle signalled by the server.

use std::sync::{Mutex, PoisonError};
use tokio::time::Instant;
use tracing::warn;

/// Global halt shared by every bucket of one limiter.
///
/// While set, no bucket may start an operation until the halt expires.
#[derive(Debug, Default)]
pub struct GlobalHalt {
    until: Mutex<Option<Instant>>,
}

impl GlobalHalt {
    /// Create a cleared halt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Halt every bucket until `until`. An earlier deadline never shortens a
    /// halt already in force.
    pub fn halt_until(&self, until: Instant) {
        let mut guard = self.until.lock().unwrap_or_else(PoisonError::into_inner);
        let until = match *guard {
            Some(current) if current > until => current,
            _ => until,
        };
        warn!(
            halt_ms = until.saturating_duration_since(Instant::now()).as_millis(),
            "Global rate limit hit, halting all buckets"
        );
        *guard = Some(until);
    }

    /// When buckets may run again, or `None` if no halt is in force.
    ///
    /// An expired halt is cleared.
    pub fn ready_at(&self, now: Instant) -> Option<Instant> {
        let mut guard = self.until.lock().unwrap_or_else(PoisonError::into_inner);
        match *guard {
            Some(until) if until > now => Some(until),
            Some(_) => {
                *guard = None;
                None
            }
            None => None,
        }
    }

    /// Whether a halt is currently in force.
    pub fn is_halted(&self) -> bool {
        self.ready_at(Instant::now()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_halt_expires() {
        let halt = GlobalHalt::new();
        let now = Instant::now();
        halt.halt_until(now + Duration::from_millis(100));

        assert_eq!(halt.ready_at(now), Some(now + Duration::from_millis(100)));
        assert_eq!(halt.ready_at(now + Duration::from_millis(100)), None);
        assert_eq!(halt.ready_at(now), None);
    }

    #[test]
    fn test_shorter_halt_does_not_override_longer() {
        let halt = GlobalHalt::new();
        let now = Instant::now();
        halt.halt_until(now + Duration::from_secs(5));
        halt.halt_until(now + Duration::from_secs(1));
        assert_eq!(halt.ready_at(now), Some(now + Duration::from_secs(5)));
    }
}

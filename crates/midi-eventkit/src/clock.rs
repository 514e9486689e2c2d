//! Timestamps and the monotonic time source used to resolve them.
//!
//! Ticks are microseconds on the clock's own timeline. `TimeStamp::Now`
//! resolves to the transport's "send immediately" sentinel of 0 without
//! reading the clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::error::{ClockError, ConfigurationError};

/// Transport tick value, in microseconds.
pub type MidiTimestamp = u64;

/// Ticks per second of offset.
pub const TICKS_PER_SECOND: f64 = 1_000_000.0;

/// When a message should go out. Only resolved at encode time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TimeStamp {
    Absolute(MidiTimestamp),
    Now,
    OffsetSeconds(f64),
}

impl TimeStamp {
    /// Offset from the moment the event is encoded.
    pub fn seconds_from_now(seconds: f64) -> Result<Self, ConfigurationError> {
        let stamp = TimeStamp::OffsetSeconds(seconds);
        stamp.validate()?;
        Ok(stamp)
    }

    /// Offsets must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        match *self {
            TimeStamp::OffsetSeconds(seconds) if !seconds.is_finite() || seconds < 0.0 => {
                Err(ConfigurationError::InvalidTimeOffset(seconds))
            }
            _ => Ok(()),
        }
    }

    /// Resolve to a transport tick, reading `clock` only for offsets.
    pub fn resolve<C>(&self, clock: &C) -> Result<MidiTimestamp, ClockError>
    where
        C: MonotonicClock + ?Sized,
    {
        match *self {
            TimeStamp::Absolute(tick) => Ok(tick),
            TimeStamp::Now => Ok(0),
            TimeStamp::OffsetSeconds(seconds) => {
                let now = clock.now_micros()?;
                // Float-to-int casts saturate, so huge offsets clamp to u64::MAX.
                let offset = (seconds * TICKS_PER_SECOND).floor() as u64;
                Ok(now.saturating_add(offset))
            }
        }
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        TimeStamp::Now
    }
}

/// Source of monotonic time in microseconds.
pub trait MonotonicClock: Send + Sync {
    fn now_micros(&self) -> Result<MidiTimestamp, ClockError>;
}

impl<F> MonotonicClock for F
where
    F: Fn() -> Result<MidiTimestamp, ClockError> + Send + Sync,
{
    fn now_micros(&self) -> Result<MidiTimestamp, ClockError> {
        self()
    }
}

/// Microseconds elapsed since the clock was created.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_micros(&self) -> Result<MidiTimestamp, ClockError> {
        u64::try_from(self.epoch.elapsed().as_micros())
            .map_err(|_| ClockError::Unavailable("elapsed time overflowed u64".into()))
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: AtomicU64,
}

impl ManualClock {
    pub fn new(micros: MidiTimestamp) -> Self {
        Self {
            micros: AtomicU64::new(micros),
        }
    }

    pub fn set(&self, micros: MidiTimestamp) {
        self.micros.store(micros, Ordering::Release);
    }

    pub fn advance(&self, micros: MidiTimestamp) {
        self.micros.fetch_add(micros, Ordering::AcqRel);
    }
}

impl MonotonicClock for ManualClock {
    fn now_micros(&self) -> Result<MidiTimestamp, ClockError> {
        Ok(self.micros.load(Ordering::Acquire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_resolves_to_sentinel_without_reading_clock() {
        let broken = || -> Result<MidiTimestamp, ClockError> {
            Err(ClockError::Unavailable("unplugged".into()))
        };
        assert_eq!(TimeStamp::Now.resolve(&broken), Ok(0));
        assert_eq!(TimeStamp::Absolute(42).resolve(&broken), Ok(42));
        assert!(matches!(
            TimeStamp::OffsetSeconds(1.0).resolve(&broken),
            Err(ClockError::Unavailable(_))
        ));
    }

    #[test]
    fn offsets_are_read_at_resolution_time() {
        let clock = ManualClock::new(1_000);
        let stamp = TimeStamp::seconds_from_now(0.5).unwrap();
        assert_eq!(stamp.resolve(&clock), Ok(501_000));

        clock.advance(250);
        assert_eq!(stamp.resolve(&clock), Ok(501_250));
    }

    #[test]
    fn offsets_floor_to_whole_ticks() {
        let clock = ManualClock::new(0);
        let stamp = TimeStamp::OffsetSeconds(0.000_001_9);
        assert_eq!(stamp.resolve(&clock), Ok(1));
    }

    #[test]
    fn huge_offsets_saturate() {
        let clock = ManualClock::new(10);
        assert_eq!(TimeStamp::OffsetSeconds(1e30).resolve(&clock), Ok(u64::MAX));
    }

    #[test]
    fn invalid_offsets_are_rejected() {
        assert!(TimeStamp::seconds_from_now(-0.1).is_err());
        assert!(TimeStamp::seconds_from_now(f64::NAN).is_err());
        assert!(TimeStamp::seconds_from_now(f64::INFINITY).is_err());
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now_micros().unwrap();
        let second = clock.now_micros().unwrap();
        assert!(second >= first);
    }
}

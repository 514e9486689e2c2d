use serde::{Deserialize, Serialize};

use crate::clock::{MidiTimestamp, MonotonicClock, TimeStamp};
use crate::describe::StringId;
use crate::error::{ClockError, ConfigurationError};
use crate::message::{MidiStatus, StatusEvent};

/// A message paired with the time it should be sent.
///
/// Construction validates the timestamp; the message types validate their own
/// ranges, so every `Event` can be encoded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EventRepr", into = "EventRepr")]
pub struct Event {
    category: MidiStatus,
    timestamp: TimeStamp,
}

/// Result of encoding a single event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedEvent {
    pub payload: [u8; 3],
    pub timestamp: MidiTimestamp,
}

impl Event {
    pub fn new(
        category: impl Into<MidiStatus>,
        timestamp: TimeStamp,
    ) -> Result<Self, ConfigurationError> {
        timestamp.validate()?;
        Ok(Self {
            category: category.into(),
            timestamp,
        })
    }

    /// Event sent as soon as the transport receives it.
    pub fn now(category: impl Into<MidiStatus>) -> Self {
        Self {
            category: category.into(),
            timestamp: TimeStamp::Now,
        }
    }

    pub fn category(&self) -> &MidiStatus {
        &self.category
    }

    pub fn timestamp(&self) -> TimeStamp {
        self.timestamp
    }

    pub fn string_id(&self) -> StringId {
        self.category.string_id()
    }

    /// Resolve the timestamp against `clock` and pack the message bytes.
    pub fn encode<C>(&self, clock: &C) -> Result<EncodedEvent, ClockError>
    where
        C: MonotonicClock + ?Sized,
    {
        Ok(EncodedEvent {
            payload: self.category.wire_bytes(),
            timestamp: self.timestamp.resolve(clock)?,
        })
    }
}

#[derive(Serialize, Deserialize)]
struct EventRepr {
    category: MidiStatus,
    #[serde(default)]
    timestamp: TimeStamp,
}

impl TryFrom<EventRepr> for Event {
    type Error = ConfigurationError;

    fn try_from(repr: EventRepr) -> Result<Self, Self::Error> {
        Event::new(repr.category, repr.timestamp)
    }
}

impl From<Event> for EventRepr {
    fn from(event: Event) -> Self {
        Self {
            category: event.category,
            timestamp: event.timestamp,
        }
    }
}

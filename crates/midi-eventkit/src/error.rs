use thiserror::Error;

/// A value handed to a constructor falls outside the MIDI 1.0 table.
///
/// Every range check in the crate happens when a message or event is built, so
/// encoding a constructed [`crate::Event`] never fails on range grounds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// MIDI channels are numbered 0-15 on the wire.
    #[error("MIDI channel {0} is outside 0..=15")]
    InvalidChannel(u8),
    /// A data field exceeded its bit width.
    #[error("{field} value {value} exceeds {max}")]
    DataOutOfRange {
        field: &'static str,
        value: u16,
        max: u16,
    },
    /// The number is assigned in the controller table, or is a channel mode number.
    #[error("controller number {0} is not an undefined controller")]
    InvalidControllerNumber(u8),
    /// The byte is not one of the reserved system status bytes.
    #[error("status byte {0:#04x} is not a reserved system status")]
    InvalidReservedStatus(u8),
    /// Offsets must be finite and non-negative.
    #[error("time offset {0} seconds cannot be scheduled")]
    InvalidTimeOffset(f64),
    #[error("invalid SMPTE time {0}")]
    InvalidSmpteTime(String),
    /// The configured packet-list capacity cannot even hold the list header.
    #[error("packet list capacity {capacity} is below the {minimum}-byte header")]
    CapacityTooSmall { capacity: usize, minimum: usize },
}

/// The injected time source could not produce a reading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("monotonic clock unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced while turning events into a packet list.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    /// The batch does not fit the configured packet-list capacity.
    #[error("packet list needs {required} bytes but capacity is {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },
    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// Errors produced while reading raw bytes back into typed messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no bytes to decode")]
    Empty,
    /// Running status is not supported; every message must start with a status byte.
    #[error("expected a status byte, found data byte {0:#04x}")]
    UnexpectedDataByte(u8),
    /// The high bit is set, or the value is outside the field's range.
    #[error("data byte {0:#04x} is out of range")]
    DataByteOutOfRange(u8),
    #[error("status {status:#04x} needs {expected} bytes, got {actual}")]
    Truncated {
        status: u8,
        expected: usize,
        actual: usize,
    },
    /// Bytes past the message length must be zero padding.
    #[error("status {status:#04x} takes {expected} bytes, found {actual} with non-zero padding")]
    TrailingBytes {
        status: u8,
        expected: usize,
        actual: usize,
    },
    #[error("malformed packet list: {0}")]
    MalformedPacketList(&'static str),
}

/// Errors reported by a [`crate::PacketTransport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The receiving side of the transport has gone away.
    #[error("transport endpoint {0} is disconnected")]
    Disconnected(String),
    /// The receiver is alive but its queue has no room.
    #[error("transport endpoint {0} is full")]
    Full(String),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Umbrella error for callers that want a single type.
#[derive(Debug, Error)]
pub enum MidiError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Clock(#[from] ClockError),
    /// Encoding failures other than the clock, which maps to [`MidiError::Clock`].
    #[error(transparent)]
    Encode(EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<EncodeError> for MidiError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Clock(clock) => MidiError::Clock(clock),
            other => MidiError::Encode(other),
        }
    }
}

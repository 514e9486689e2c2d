//! Packet lists: many timestamped messages flattened into one buffer.
//!
//! Layout, little endian:
//!
//! ```text
//! u32 packet_count
//! repeated packet_count times:
//!     u64 timestamp
//!     u16 length
//!     u8  payload[length]
//! ```

use tracing::{debug, warn};

use crate::clock::{MidiTimestamp, MonotonicClock};
use crate::config::{CodecConfig, PayloadFormat};
use crate::decode::decode;
use crate::error::{ConfigurationError, DecodeError, EncodeError};
use crate::event::Event;
use crate::message::{MidiStatus, StatusEvent};

/// Size of the packet count header.
pub const LIST_HEADER_LEN: usize = 4;
/// Size of the timestamp and length preceding each payload.
pub const PACKET_HEADER_LEN: usize = 8 + 2;

/// Builds packet lists under a fixed capacity.
#[derive(Debug, Clone)]
pub struct PacketListBuilder {
    capacity: usize,
    payload: PayloadFormat,
}

impl PacketListBuilder {
    pub fn new(config: &CodecConfig) -> Result<Self, ConfigurationError> {
        if config.packet_list_capacity < LIST_HEADER_LEN {
            return Err(ConfigurationError::CapacityTooSmall {
                capacity: config.packet_list_capacity,
                minimum: LIST_HEADER_LEN,
            });
        }
        Ok(Self {
            capacity: config.packet_list_capacity,
            payload: config.payload,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn payload_format(&self) -> PayloadFormat {
        self.payload
    }

    fn payload_len(&self, event: &Event) -> usize {
        match self.payload {
            PayloadFormat::Padded => 3,
            PayloadFormat::Compact => event.category().message_len(),
        }
    }

    /// Bytes a packet list holding `events` would occupy.
    pub fn required_len(&self, events: &[Event]) -> usize {
        events.iter().fold(LIST_HEADER_LEN, |total, event| {
            total
                .saturating_add(PACKET_HEADER_LEN)
                .saturating_add(self.payload_len(event))
        })
    }

    /// Pack `events`, in order, into one buffer.
    ///
    /// Nothing is returned unless every event fits and every timestamp
    /// resolves; the capacity check happens before any timestamp is read.
    pub fn build<C>(&self, events: &[Event], clock: &C) -> Result<PacketListBuffer, EncodeError>
    where
        C: MonotonicClock + ?Sized,
    {
        let required = self.required_len(events);
        let count = u32::try_from(events.len()).ok();
        let Some(count) = count.filter(|_| required <= self.capacity) else {
            warn!(
                events = events.len(),
                required,
                capacity = self.capacity,
                "packet list exceeds capacity"
            );
            return Err(EncodeError::CapacityExceeded {
                required,
                capacity: self.capacity,
            });
        };

        let timestamps = events
            .iter()
            .map(|event| event.timestamp().resolve(clock))
            .collect::<Result<Vec<_>, _>>()?;

        let mut bytes = Vec::with_capacity(required);
        bytes.extend_from_slice(&count.to_le_bytes());
        for (event, timestamp) in events.iter().zip(timestamps) {
            let wire = event.category().wire_bytes();
            let payload = &wire[..self.payload_len(event)];
            bytes.extend_from_slice(&timestamp.to_le_bytes());
            bytes.extend_from_slice(&(payload.len() as u16).to_le_bytes());
            bytes.extend_from_slice(payload);
        }
        debug_assert_eq!(bytes.len(), required);

        debug!(packets = count, bytes = bytes.len(), "built packet list");
        Ok(PacketListBuffer { bytes, count })
    }
}

impl Default for PacketListBuilder {
    fn default() -> Self {
        let config = CodecConfig::default();
        Self {
            capacity: config.packet_list_capacity,
            payload: config.payload,
        }
    }
}

/// A built packet list. Owned by the caller; the builder keeps nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PacketListBuffer {
    bytes: Vec<u8>,
    count: u32,
}

/// One packet borrowed from a [`PacketListBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketView<'a> {
    pub timestamp: MidiTimestamp,
    pub data: &'a [u8],
}

impl PacketView<'_> {
    pub fn decode(&self) -> Result<MidiStatus, DecodeError> {
        decode(self.data)
    }
}

impl PacketListBuffer {
    /// Validate a buffer received from elsewhere.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        let count = read_count(&bytes)?;
        let mut offset = LIST_HEADER_LEN;
        for _ in 0..count {
            let (_, next) = read_packet(&bytes, offset)?;
            offset = next;
        }
        if offset != bytes.len() {
            return Err(DecodeError::MalformedPacketList("trailing bytes after last packet"));
        }
        Ok(Self { bytes, count })
    }

    pub fn packet_count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total size in bytes, header included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn packets(&self) -> Packets<'_> {
        Packets {
            bytes: &self.bytes,
            offset: LIST_HEADER_LEN,
            remaining: self.count,
        }
    }

    /// Decode every packet back into a timestamped message.
    pub fn decode(&self) -> Result<Vec<(MidiTimestamp, MidiStatus)>, DecodeError> {
        self.packets()
            .map(|packet| Ok((packet.timestamp, packet.decode()?)))
            .collect()
    }
}

impl AsRef<[u8]> for PacketListBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Iterator over the packets of a [`PacketListBuffer`].
pub struct Packets<'a> {
    bytes: &'a [u8],
    offset: usize,
    remaining: u32,
}

impl<'a> Iterator for Packets<'a> {
    type Item = PacketView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // Buffers are validated on construction, so a failure here means the
        // list ended early; stop rather than yield garbage.
        let (packet, next) = read_packet(self.bytes, self.offset).ok()?;
        self.offset = next;
        self.remaining -= 1;
        Some(packet)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

fn read_count(bytes: &[u8]) -> Result<u32, DecodeError> {
    let header: [u8; LIST_HEADER_LEN] = bytes
        .get(..LIST_HEADER_LEN)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(DecodeError::MalformedPacketList("missing packet count"))?;
    Ok(u32::from_le_bytes(header))
}

fn read_packet(bytes: &[u8], offset: usize) -> Result<(PacketView<'_>, usize), DecodeError> {
    let header = bytes
        .get(offset..offset + PACKET_HEADER_LEN)
        .ok_or(DecodeError::MalformedPacketList("truncated packet header"))?;
    let (timestamp, length) = header.split_at(8);
    let timestamp = u64::from_le_bytes(
        timestamp
            .try_into()
            .map_err(|_| DecodeError::MalformedPacketList("truncated timestamp"))?,
    );
    let length = u16::from_le_bytes(
        length
            .try_into()
            .map_err(|_| DecodeError::MalformedPacketList("truncated length"))?,
    ) as usize;
    let start = offset + PACKET_HEADER_LEN;
    let data = bytes
        .get(start..start + length)
        .ok_or(DecodeError::MalformedPacketList("truncated payload"))?;
    Ok((PacketView { timestamp, data }, start + length))
}

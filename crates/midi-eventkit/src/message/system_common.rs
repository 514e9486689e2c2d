use serde::{Deserialize, Serialize};

use crate::describe::StringId;
use crate::error::ConfigurationError;
use crate::message::{status, QuarterFrame, StatusEvent};
use crate::value::{EventData, U14, U7};

/// System common messages, status 0xF0-0xF7.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemCommon {
    /// Start of exclusive with the first two payload bytes (manufacturer id
    /// and one data byte). Longer dumps are sent by the transport.
    SystemExclusive { data1: U7, data2: U7 },
    TimeCodeQuarterFrame(QuarterFrame),
    /// Position in MIDI beats (sixteenth notes) since the song start.
    SongPositionPointer(U14),
    SongSelect(U7),
    TuneRequest,
    EndOfExclusive,
    Reserved(ReservedSystemCommon),
}

impl SystemCommon {
    pub fn song_position(beats: u16) -> Result<Self, ConfigurationError> {
        Ok(SystemCommon::SongPositionPointer(U14::checked(
            beats,
            "song position",
        )?))
    }

    pub fn song_select(song: u8) -> Result<Self, ConfigurationError> {
        Ok(SystemCommon::SongSelect(U7::checked(song, "song")?))
    }
}

impl StatusEvent for SystemCommon {
    fn status_byte(&self) -> u8 {
        match self {
            SystemCommon::SystemExclusive { .. } => status::SYSTEM_EXCLUSIVE,
            SystemCommon::TimeCodeQuarterFrame(_) => status::QUARTER_FRAME,
            SystemCommon::SongPositionPointer(_) => status::SONG_POSITION_POINTER,
            SystemCommon::SongSelect(_) => status::SONG_SELECT,
            SystemCommon::TuneRequest => status::TUNE_REQUEST,
            SystemCommon::EndOfExclusive => status::END_OF_EXCLUSIVE,
            SystemCommon::Reserved(reserved) => reserved.get(),
        }
    }

    fn data_bytes(&self) -> EventData {
        match self {
            SystemCommon::SystemExclusive { data1, data2 } => EventData::new(*data1, *data2),
            SystemCommon::TimeCodeQuarterFrame(frame) => frame.data_bytes(),
            SystemCommon::SongPositionPointer(beats) => EventData::fourteen_bit(*beats),
            SystemCommon::SongSelect(song) => EventData::single(*song),
            SystemCommon::TuneRequest
            | SystemCommon::EndOfExclusive
            | SystemCommon::Reserved(_) => EventData::EMPTY,
        }
    }

    fn string_id(&self) -> StringId {
        match self {
            SystemCommon::SystemExclusive { .. } => StringId::SystemExclusive,
            SystemCommon::TimeCodeQuarterFrame(frame) => frame.string_id(),
            SystemCommon::SongPositionPointer(_) => StringId::SongPositionPointer,
            SystemCommon::SongSelect(_) => StringId::SongSelect,
            SystemCommon::TuneRequest => StringId::TuneRequest,
            SystemCommon::EndOfExclusive => StringId::EndOfExclusive,
            SystemCommon::Reserved(_) => StringId::ReservedSystemCommon,
        }
    }

    fn message_len(&self) -> usize {
        match self {
            SystemCommon::SystemExclusive { .. } | SystemCommon::SongPositionPointer(_) => 3,
            SystemCommon::TimeCodeQuarterFrame(_) | SystemCommon::SongSelect(_) => 2,
            SystemCommon::TuneRequest
            | SystemCommon::EndOfExclusive
            | SystemCommon::Reserved(_) => 1,
        }
    }
}

/// Undefined system common status, 0xF4 or 0xF5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ReservedSystemCommon(u8);

impl ReservedSystemCommon {
    pub fn new(status_byte: u8) -> Result<Self, ConfigurationError> {
        if !status::RESERVED_SYSTEM_COMMON.contains(&status_byte) {
            return Err(ConfigurationError::InvalidReservedStatus(status_byte));
        }
        Ok(Self(status_byte))
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ReservedSystemCommon {
    type Error = ConfigurationError;

    fn try_from(status_byte: u8) -> Result<Self, Self::Error> {
        Self::new(status_byte)
    }
}

impl From<ReservedSystemCommon> for u8 {
    fn from(reserved: ReservedSystemCommon) -> Self {
        reserved.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_position_splits_fourteen_bits() {
        let position = SystemCommon::song_position(0x1234).unwrap();
        assert_eq!(position.wire_bytes(), [0xF2, 0x34, 0x24]);
        assert!(SystemCommon::song_position(0x4000).is_err());
    }

    #[test]
    fn reserved_statuses_round_trip() {
        for byte in [0xF4, 0xF5] {
            let reserved = SystemCommon::Reserved(ReservedSystemCommon::new(byte).unwrap());
            assert_eq!(reserved.wire_bytes(), [byte, 0, 0]);
            assert_eq!(reserved.message_len(), 1);
        }
        assert_eq!(
            ReservedSystemCommon::new(0xF6),
            Err(ConfigurationError::InvalidReservedStatus(0xF6))
        );
    }

    #[test]
    fn single_byte_messages() {
        assert_eq!(SystemCommon::TuneRequest.compact_bytes().as_slice(), &[0xF6]);
        assert_eq!(SystemCommon::EndOfExclusive.compact_bytes().as_slice(), &[0xF7]);
    }
}

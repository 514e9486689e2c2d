use serde::{Deserialize, Serialize};

use crate::describe::StringId;
use crate::error::ConfigurationError;
use crate::message::{status, StatusEvent};
use crate::value::EventData;

/// Single-byte timing and transport messages, status 0xF8-0xFF.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemRealTime {
    TimingClock,
    Start,
    Continue,
    Stop,
    ActiveSensing,
    Reset,
    Reserved(ReservedSystemRealTime),
}

impl SystemRealTime {
    pub fn from_status(status_byte: u8) -> Option<Self> {
        let message = match status_byte {
            status::TIMING_CLOCK => SystemRealTime::TimingClock,
            status::START => SystemRealTime::Start,
            status::CONTINUE => SystemRealTime::Continue,
            status::STOP => SystemRealTime::Stop,
            status::ACTIVE_SENSING => SystemRealTime::ActiveSensing,
            status::RESET => SystemRealTime::Reset,
            other => SystemRealTime::Reserved(ReservedSystemRealTime::new(other).ok()?),
        };
        Some(message)
    }
}

impl StatusEvent for SystemRealTime {
    fn status_byte(&self) -> u8 {
        match self {
            SystemRealTime::TimingClock => status::TIMING_CLOCK,
            SystemRealTime::Start => status::START,
            SystemRealTime::Continue => status::CONTINUE,
            SystemRealTime::Stop => status::STOP,
            SystemRealTime::ActiveSensing => status::ACTIVE_SENSING,
            SystemRealTime::Reset => status::RESET,
            SystemRealTime::Reserved(reserved) => reserved.get(),
        }
    }

    fn data_bytes(&self) -> EventData {
        EventData::EMPTY
    }

    fn string_id(&self) -> StringId {
        match self {
            SystemRealTime::TimingClock => StringId::TimingClock,
            SystemRealTime::Start => StringId::Start,
            SystemRealTime::Continue => StringId::Continue,
            SystemRealTime::Stop => StringId::Stop,
            SystemRealTime::ActiveSensing => StringId::ActiveSensing,
            SystemRealTime::Reset => StringId::Reset,
            SystemRealTime::Reserved(_) => StringId::ReservedSystemRealTime,
        }
    }

    fn message_len(&self) -> usize {
        1
    }
}

/// Undefined real-time status, 0xF9 or 0xFD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ReservedSystemRealTime(u8);

impl ReservedSystemRealTime {
    pub fn new(status_byte: u8) -> Result<Self, ConfigurationError> {
        if !status::RESERVED_SYSTEM_REAL_TIME.contains(&status_byte) {
            return Err(ConfigurationError::InvalidReservedStatus(status_byte));
        }
        Ok(Self(status_byte))
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ReservedSystemRealTime {
    type Error = ConfigurationError;

    fn try_from(status_byte: u8) -> Result<Self, Self::Error> {
        Self::new(status_byte)
    }
}

impl From<ReservedSystemRealTime> for u8 {
    fn from(reserved: ReservedSystemRealTime) -> Self {
        reserved.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_real_time_status_maps_back() {
        for byte in 0xF8..=0xFFu8 {
            let message = SystemRealTime::from_status(byte).unwrap();
            assert_eq!(message.status_byte(), byte);
            assert_eq!(message.wire_bytes(), [byte, 0, 0]);
        }
        assert_eq!(SystemRealTime::from_status(0xF7), None);
    }
}

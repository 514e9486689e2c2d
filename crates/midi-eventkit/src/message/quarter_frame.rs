use std::fmt;

use serde::{Deserialize, Serialize};

use crate::describe::StringId;
use crate::error::ConfigurationError;
use crate::message::{status, StatusEvent};
use crate::value::{EventData, Nibble, U7};

/// SMPTE frame rate code carried in the hours-high quarter frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SmpteRate {
    Fps24 = 0,
    Fps25 = 1,
    Fps30Drop = 2,
    Fps30 = 3,
}

impl SmpteRate {
    /// Rate for the low two bits of `code`.
    pub const fn from_code(code: u8) -> Self {
        match code & 0x03 {
            0 => SmpteRate::Fps24,
            1 => SmpteRate::Fps25,
            2 => SmpteRate::Fps30Drop,
            _ => SmpteRate::Fps30,
        }
    }

    /// Two-bit code sent on the wire.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Frame numbers run from 0 to one below this.
    pub const fn frames_per_second(self) -> u8 {
        match self {
            SmpteRate::Fps24 => 24,
            SmpteRate::Fps25 => 25,
            SmpteRate::Fps30Drop | SmpteRate::Fps30 => 30,
        }
    }
}

/// One of the eight MIDI time code quarter-frame pieces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuarterFrame {
    FramesLow(Nibble),
    FramesHigh(Nibble),
    SecondsLow(Nibble),
    SecondsHigh(Nibble),
    MinutesLow(Nibble),
    MinutesHigh(Nibble),
    HoursLow(Nibble),
    /// Bit 4 of the hours and the frame rate share this piece.
    HoursHigh { hours_msb: bool, rate: SmpteRate },
}

impl QuarterFrame {
    /// Piece index 0-7, the upper bits of the data byte.
    pub const fn message_type(&self) -> u8 {
        match self {
            QuarterFrame::FramesLow(_) => 0,
            QuarterFrame::FramesHigh(_) => 1,
            QuarterFrame::SecondsLow(_) => 2,
            QuarterFrame::SecondsHigh(_) => 3,
            QuarterFrame::MinutesLow(_) => 4,
            QuarterFrame::MinutesHigh(_) => 5,
            QuarterFrame::HoursLow(_) => 6,
            QuarterFrame::HoursHigh { .. } => 7,
        }
    }

    /// Four-bit payload, the low bits of the data byte.
    pub const fn nibble(&self) -> Nibble {
        match self {
            QuarterFrame::FramesLow(n)
            | QuarterFrame::FramesHigh(n)
            | QuarterFrame::SecondsLow(n)
            | QuarterFrame::SecondsHigh(n)
            | QuarterFrame::MinutesLow(n)
            | QuarterFrame::MinutesHigh(n)
            | QuarterFrame::HoursLow(n) => *n,
            QuarterFrame::HoursHigh { hours_msb, rate } => {
                Nibble::from_masked((rate.code() << 1) | *hours_msb as u8)
            }
        }
    }

    /// `message_type * 0x10 + nibble`.
    pub const fn data_byte(&self) -> U7 {
        U7::from_masked(self.message_type() * 0x10 + self.nibble().get())
    }

    /// Inverse of [`QuarterFrame::data_byte`]. Bit 3 of the hours-high nibble
    /// is unused and ignored.
    pub const fn from_data_byte(byte: U7) -> Self {
        let nibble = Nibble::from_masked(byte.get());
        match byte.get() >> 4 {
            0 => QuarterFrame::FramesLow(nibble),
            1 => QuarterFrame::FramesHigh(nibble),
            2 => QuarterFrame::SecondsLow(nibble),
            3 => QuarterFrame::SecondsHigh(nibble),
            4 => QuarterFrame::MinutesLow(nibble),
            5 => QuarterFrame::MinutesHigh(nibble),
            6 => QuarterFrame::HoursLow(nibble),
            _ => QuarterFrame::HoursHigh {
                hours_msb: nibble.get() & 0x01 != 0,
                rate: SmpteRate::from_code(nibble.get() >> 1),
            },
        }
    }
}

impl StatusEvent for QuarterFrame {
    fn status_byte(&self) -> u8 {
        status::QUARTER_FRAME
    }

    fn data_bytes(&self) -> EventData {
        EventData::single(self.data_byte())
    }

    fn string_id(&self) -> StringId {
        StringId::QuarterFrame
    }

    fn message_len(&self) -> usize {
        2
    }
}

/// A full SMPTE time code position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "SmpteTimeRepr", into = "SmpteTimeRepr")]
pub struct SmpteTime {
    hours: u8,
    minutes: u8,
    seconds: u8,
    frames: u8,
    rate: SmpteRate,
}

impl SmpteTime {
    /// Validated position. Hours run 0-23, minutes and seconds 0-59.
    pub fn new(
        hours: u8,
        minutes: u8,
        seconds: u8,
        frames: u8,
        rate: SmpteRate,
    ) -> Result<Self, ConfigurationError> {
        let time = Self {
            hours,
            minutes,
            seconds,
            frames,
            rate,
        };
        if hours > 23 || minutes > 59 || seconds > 59 || frames >= rate.frames_per_second() {
            return Err(ConfigurationError::InvalidSmpteTime(time.to_string()));
        }
        Ok(time)
    }

    /// Hours, 0-23.
    pub const fn hours(&self) -> u8 {
        self.hours
    }

    /// Minutes, 0-59.
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Seconds, 0-59.
    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Frame within the second, below the rate's frame count.
    pub const fn frames(&self) -> u8 {
        self.frames
    }

    /// Frame rate.
    pub const fn rate(&self) -> SmpteRate {
        self.rate
    }

    /// The eight pieces in transmission order, frames low first.
    pub fn quarter_frames(&self) -> [QuarterFrame; 8] {
        let low = |value: u8| Nibble::from_masked(value);
        let high = |value: u8| Nibble::from_masked(value >> 4);
        [
            QuarterFrame::FramesLow(low(self.frames)),
            QuarterFrame::FramesHigh(high(self.frames)),
            QuarterFrame::SecondsLow(low(self.seconds)),
            QuarterFrame::SecondsHigh(high(self.seconds)),
            QuarterFrame::MinutesLow(low(self.minutes)),
            QuarterFrame::MinutesHigh(high(self.minutes)),
            QuarterFrame::HoursLow(low(self.hours)),
            QuarterFrame::HoursHigh {
                hours_msb: self.hours & 0x10 != 0,
                rate: self.rate,
            },
        ]
    }

    /// Reassemble a position from a complete set of eight pieces, in any order.
    pub fn from_quarter_frames(frames: &[QuarterFrame]) -> Result<Self, ConfigurationError> {
        let mut seen = 0u8;
        let mut fields = [0u8; 4];
        let mut rate = SmpteRate::Fps24;
        for frame in frames {
            seen |= 1 << frame.message_type();
            let nibble = frame.nibble().get();
            match *frame {
                QuarterFrame::FramesLow(_) => fields[0] |= nibble,
                QuarterFrame::FramesHigh(_) => fields[0] |= (nibble & 0x01) << 4,
                QuarterFrame::SecondsLow(_) => fields[1] |= nibble,
                QuarterFrame::SecondsHigh(_) => fields[1] |= (nibble & 0x03) << 4,
                QuarterFrame::MinutesLow(_) => fields[2] |= nibble,
                QuarterFrame::MinutesHigh(_) => fields[2] |= (nibble & 0x03) << 4,
                QuarterFrame::HoursLow(_) => fields[3] |= nibble,
                QuarterFrame::HoursHigh { hours_msb, rate: r } => {
                    fields[3] |= (hours_msb as u8) << 4;
                    rate = r;
                }
            }
        }
        if seen != 0xFF || frames.len() != 8 {
            return Err(ConfigurationError::InvalidSmpteTime(format!(
                "expected one of each quarter frame, got {} pieces",
                frames.len()
            )));
        }
        let [frames, seconds, minutes, hours] = fields;
        Self::new(hours, minutes, seconds, frames, rate)
    }
}

#[derive(Serialize, Deserialize)]
struct SmpteTimeRepr {
    hours: u8,
    minutes: u8,
    seconds: u8,
    frames: u8,
    rate: SmpteRate,
}

impl TryFrom<SmpteTimeRepr> for SmpteTime {
    type Error = ConfigurationError;

    fn try_from(repr: SmpteTimeRepr) -> Result<Self, Self::Error> {
        SmpteTime::new(repr.hours, repr.minutes, repr.seconds, repr.frames, repr.rate)
    }
}

impl From<SmpteTime> for SmpteTimeRepr {
    fn from(time: SmpteTime) -> Self {
        Self {
            hours: time.hours,
            minutes: time.minutes,
            seconds: time.seconds,
            frames: time.frames,
            rate: time.rate,
        }
    }
}

impl fmt::Display for SmpteTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}@{}",
            self.hours,
            self.minutes,
            self.seconds,
            self.frames,
            self.rate.frames_per_second()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_byte_packs_type_and_nibble() {
        let frame = QuarterFrame::SecondsHigh(Nibble::new(0x3).unwrap());
        assert_eq!(frame.wire_bytes(), [0xF1, 0x33, 0]);
        assert_eq!(frame.compact_bytes().as_slice(), &[0xF1, 0x33]);
    }

    #[test]
    fn hours_high_carries_rate_above_hours_bit() {
        let frame = QuarterFrame::HoursHigh {
            hours_msb: true,
            rate: SmpteRate::Fps30,
        };
        assert_eq!(frame.data_byte().get(), 0x70 | (3 << 1) | 1);
        assert_eq!(QuarterFrame::from_data_byte(frame.data_byte()), frame);
    }

    #[test]
    fn time_code_splits_into_eight_pieces() {
        let time = SmpteTime::new(17, 42, 9, 24, SmpteRate::Fps25).unwrap();
        let pieces = time.quarter_frames();
        let bytes: Vec<u8> = pieces.iter().map(|p| p.data_byte().get()).collect();
        assert_eq!(bytes, vec![0x08, 0x11, 0x29, 0x30, 0x4A, 0x52, 0x61, 0x73]);
        assert_eq!(SmpteTime::from_quarter_frames(&pieces).unwrap(), time);
    }

    #[test]
    fn incomplete_or_invalid_time_codes_are_rejected() {
        let time = SmpteTime::new(1, 2, 3, 4, SmpteRate::Fps24).unwrap();
        assert!(SmpteTime::from_quarter_frames(&time.quarter_frames()[..7]).is_err());
        assert!(SmpteTime::new(24, 0, 0, 0, SmpteRate::Fps30).is_err());
        assert!(SmpteTime::new(0, 0, 0, 24, SmpteRate::Fps24).is_err());
    }

    #[test]
    fn deserialization_checks_ranges() {
        let json = r#"{"hours":99,"minutes":200,"seconds":61,"frames":77,"rate":"Fps24"}"#;
        assert!(serde_json::from_str::<SmpteTime>(json).is_err());

        let time = SmpteTime::new(23, 59, 59, 29, SmpteRate::Fps30Drop).unwrap();
        let json = serde_json::to_string(&time).unwrap();
        assert_eq!(serde_json::from_str::<SmpteTime>(&json).unwrap(), time);
    }
}

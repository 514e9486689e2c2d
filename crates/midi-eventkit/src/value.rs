//! Validated data-byte widths and the packing rules that turn logical values
//! into the two data bytes following a status byte.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Largest value carried by a single data byte.
pub const U7_MAX: u8 = 0x7F;
/// Largest value carried by an LSB/MSB data-byte pair.
pub const U14_MAX: u16 = 0x3FFF;
/// Centre position of a 14-bit controller such as pitch bend.
pub const U14_CENTER: u16 = 0x2000;

/// A 7-bit data value (0-127).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct U7(u8);

/// A 14-bit data value (0-16383) sent as two 7-bit halves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct U14(u16);

/// A zero-based MIDI channel (0-15).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Channel(u8);

/// Four bits of a time-code field carried by a quarter-frame message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Nibble(u8);

impl U7 {
    pub const MIN: U7 = U7(0);
    pub const MAX: U7 = U7(U7_MAX);

    /// Rejects values above 127.
    pub fn new(value: u8) -> Result<Self, ConfigurationError> {
        Self::checked(value, "data byte")
    }

    /// Validate `value`, naming `field` in the error.
    pub fn checked(value: u8, field: &'static str) -> Result<Self, ConfigurationError> {
        if value > U7_MAX {
            return Err(ConfigurationError::DataOutOfRange {
                field,
                value: value as u16,
                max: U7_MAX as u16,
            });
        }
        Ok(Self(value))
    }

    /// Keeps the low seven bits of `value`.
    pub const fn from_masked(value: u8) -> Self {
        Self(value & U7_MAX)
    }

    /// The raw value.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl U14 {
    pub const MIN: U14 = U14(0);
    pub const MAX: U14 = U14(U14_MAX);
    pub const CENTER: U14 = U14(U14_CENTER);

    /// Rejects values above 16383.
    pub fn new(value: u16) -> Result<Self, ConfigurationError> {
        Self::checked(value, "14-bit value")
    }

    /// Validate `value`, naming `field` in the error.
    pub fn checked(value: u16, field: &'static str) -> Result<Self, ConfigurationError> {
        if value > U14_MAX {
            return Err(ConfigurationError::DataOutOfRange {
                field,
                value,
                max: U14_MAX,
            });
        }
        Ok(Self(value))
    }

    /// Rebuild a value from its `(lsb, msb)` data bytes.
    pub const fn from_halves(lsb: U7, msb: U7) -> Self {
        Self(((msb.0 as u16) << 7) | lsb.0 as u16)
    }

    /// The raw value.
    pub const fn get(self) -> u16 {
        self.0
    }

    /// Low seven bits, sent first.
    pub const fn lsb(self) -> U7 {
        U7((self.0 & 0x7F) as u8)
    }

    /// High seven bits, sent second.
    pub const fn msb(self) -> U7 {
        U7(((self.0 >> 7) & 0x7F) as u8)
    }
}

impl Channel {
    pub const COUNT: u8 = 16;

    /// Rejects channels above 15.
    pub fn new(channel: u8) -> Result<Self, ConfigurationError> {
        if channel >= Self::COUNT {
            return Err(ConfigurationError::InvalidChannel(channel));
        }
        Ok(Self(channel))
    }

    /// Channel encoded in the low nibble of a channel-voice status byte.
    pub const fn from_status(status: u8) -> Self {
        Self(status & 0x0F)
    }

    /// Zero-based channel number.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Iterate every channel in ascending order.
    pub fn all() -> impl Iterator<Item = Channel> {
        (0..Self::COUNT).map(Channel)
    }
}

impl Nibble {
    /// Rejects values above 15.
    pub fn new(value: u8) -> Result<Self, ConfigurationError> {
        if value > 0x0F {
            return Err(ConfigurationError::DataOutOfRange {
                field: "nibble",
                value: value as u16,
                max: 0x0F,
            });
        }
        Ok(Self(value))
    }

    pub const fn from_masked(value: u8) -> Self {
        Self(value & 0x0F)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

macro_rules! impl_conversions {
    ($name:ident, $repr:ty) => {
        impl TryFrom<$repr> for $name {
            type Error = ConfigurationError;

            fn try_from(value: $repr) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

impl_conversions!(U7, u8);
impl_conversions!(U14, u16);
impl_conversions!(Channel, u8);
impl_conversions!(Nibble, u8);

/// Logical payload of a message before it is split into data bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventValue {
    Value(U7),
    FourteenBit(U14),
    Toggle(bool),
    None,
}

/// The two data bytes that follow a status byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventData {
    pub data1: u8,
    pub data2: u8,
}

impl EventData {
    /// Both data bytes are zero.
    pub const EMPTY: EventData = EventData { data1: 0, data2: 0 };

    pub const fn new(data1: U7, data2: U7) -> Self {
        Self {
            data1: data1.get(),
            data2: data2.get(),
        }
    }

    /// Only the first data byte is used.
    pub const fn single(data1: U7) -> Self {
        Self {
            data1: data1.get(),
            data2: 0,
        }
    }

    /// Split a 14-bit value into its LSB and MSB data bytes.
    pub const fn fourteen_bit(value: U14) -> Self {
        Self {
            data1: value.lsb().get(),
            data2: value.msb().get(),
        }
    }

    /// Switch controllers send 127 for on and 0 for off.
    pub const fn toggle(on: bool) -> Self {
        Self {
            data1: if on { U7_MAX } else { 0 },
            data2: 0,
        }
    }

    /// Reassemble the 14-bit value these bytes carry.
    pub const fn as_fourteen_bit(self) -> U14 {
        U14::from_halves(U7::from_masked(self.data1), U7::from_masked(self.data2))
    }
}

impl From<EventValue> for EventData {
    fn from(value: EventValue) -> Self {
        match value {
            EventValue::Value(v) => EventData::single(v),
            EventValue::FourteenBit(v) => EventData::fourteen_bit(v),
            EventValue::Toggle(on) => EventData::toggle(on),
            EventValue::None => EventData::EMPTY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fourteen_bit_splits_low_bits_first() {
        let data = EventData::from(EventValue::FourteenBit(U14::CENTER));
        assert_eq!(data, EventData { data1: 0x00, data2: 0x40 });

        let data = EventData::from(EventValue::FourteenBit(U14::MAX));
        assert_eq!(data, EventData { data1: 0x7F, data2: 0x7F });
        assert_eq!(data.as_fourteen_bit(), U14::MAX);
    }

    #[test]
    fn toggle_packs_full_scale() {
        assert_eq!(EventData::from(EventValue::Toggle(true)), EventData { data1: 127, data2: 0 });
        assert_eq!(EventData::from(EventValue::Toggle(false)), EventData::EMPTY);
        assert_eq!(EventData::from(EventValue::None), EventData::EMPTY);
    }

    #[test]
    fn widths_reject_out_of_range_values() {
        assert!(U7::new(127).is_ok());
        assert!(matches!(
            U7::new(128),
            Err(ConfigurationError::DataOutOfRange { value: 128, max: 127, .. })
        ));
        assert!(U14::new(16_384).is_err());
        assert_eq!(Channel::new(16), Err(ConfigurationError::InvalidChannel(16)));
        assert!(Nibble::new(0x10).is_err());
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let ok: U7 = serde_json::from_str("64").unwrap();
        assert_eq!(ok.get(), 64);
        assert!(serde_json::from_str::<U7>("200").is_err());
        assert!(serde_json::from_str::<Channel>("16").is_err());
    }
}

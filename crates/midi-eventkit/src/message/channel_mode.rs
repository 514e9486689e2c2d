use std::fmt;

use serde::{Deserialize, Serialize};

use crate::describe::StringId;
use crate::error::ConfigurationError;
use crate::message::{StatusEvent, TOGGLE_THRESHOLD};
use crate::value::{Channel, EventData, EventValue, U7};

/// Channel mode messages, controller numbers 120-127.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelMode {
    AllSoundOff,
    ResetAllControllers,
    LocalControl(bool),
    AllNotesOff,
    OmniModeOff,
    OmniModeOn,
    /// `channels` is the number of voice channels to use, 0 meaning all.
    MonoModeOn { channels: MonoChannels },
    PolyModeOn,
}

/// Voice channel count carried by mono mode, 0-16.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MonoChannels(u8);

impl MonoChannels {
    /// Every channel the receiver has.
    pub const ALL: MonoChannels = MonoChannels(0);

    /// Rejects counts above 16.
    pub fn new(channels: u8) -> Result<Self, ConfigurationError> {
        if channels > Channel::COUNT {
            return Err(ConfigurationError::DataOutOfRange {
                field: "mono mode channels",
                value: channels as u16,
                max: Channel::COUNT as u16,
            });
        }
        Ok(Self(channels))
    }

    /// Number of channels, 0 meaning all.
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MonoChannels {
    type Error = ConfigurationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonoChannels> for u8 {
    fn from(value: MonoChannels) -> Self {
        value.0
    }
}

impl fmt::Display for MonoChannels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl ChannelMode {
    /// Mono mode for `channels` voice channels (0 selects every channel).
    pub fn mono(channels: u8) -> Result<Self, ConfigurationError> {
        Ok(ChannelMode::MonoModeOn {
            channels: MonoChannels::new(channels)?,
        })
    }

    /// Controller number, 120-127.
    pub const fn number(&self) -> u8 {
        match self {
            ChannelMode::AllSoundOff => 120,
            ChannelMode::ResetAllControllers => 121,
            ChannelMode::LocalControl(_) => 122,
            ChannelMode::AllNotesOff => 123,
            ChannelMode::OmniModeOff => 124,
            ChannelMode::OmniModeOn => 125,
            ChannelMode::MonoModeOn { .. } => 126,
            ChannelMode::PolyModeOn => 127,
        }
    }

    /// Payload sent as the controller value.
    pub const fn value(&self) -> EventValue {
        match self {
            ChannelMode::LocalControl(on) => EventValue::Toggle(*on),
            ChannelMode::MonoModeOn { channels } => {
                EventValue::Value(U7::from_masked(channels.get()))
            }
            _ => EventValue::None,
        }
    }

    /// Mode for controller `number` carrying `value`, or `None` below 120.
    ///
    /// Fails only for a mono mode channel count above 16.
    pub fn from_number(number: u8, value: U7) -> Result<Option<Self>, ConfigurationError> {
        let mode = match number {
            120 => ChannelMode::AllSoundOff,
            121 => ChannelMode::ResetAllControllers,
            122 => ChannelMode::LocalControl(value.get() >= TOGGLE_THRESHOLD),
            123 => ChannelMode::AllNotesOff,
            124 => ChannelMode::OmniModeOff,
            125 => ChannelMode::OmniModeOn,
            126 => ChannelMode::mono(value.get())?,
            127 => ChannelMode::PolyModeOn,
            _ => return Ok(None),
        };
        Ok(Some(mode))
    }
}

impl StatusEvent for ChannelMode {
    fn status_byte(&self) -> u8 {
        self.number()
    }

    fn data_bytes(&self) -> EventData {
        EventData::from(self.value())
    }

    fn string_id(&self) -> StringId {
        match self {
            ChannelMode::AllSoundOff => StringId::AllSoundOff,
            ChannelMode::ResetAllControllers => StringId::ResetAllControllers,
            ChannelMode::LocalControl(_) => StringId::LocalControl,
            ChannelMode::AllNotesOff => StringId::AllNotesOff,
            ChannelMode::OmniModeOff => StringId::OmniModeOff,
            ChannelMode::OmniModeOn => StringId::OmniModeOn,
            ChannelMode::MonoModeOn { .. } => StringId::MonoModeOn,
            ChannelMode::PolyModeOn => StringId::PolyModeOn,
        }
    }

    fn message_len(&self) -> usize {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_control_is_a_toggle() {
        assert_eq!(ChannelMode::LocalControl(true).wire_bytes(), [122, 127, 0]);
        assert_eq!(ChannelMode::LocalControl(false).wire_bytes(), [122, 0, 0]);
    }

    #[test]
    fn mono_mode_carries_channel_count() {
        let mode = ChannelMode::mono(4).unwrap();
        assert_eq!(mode.wire_bytes(), [126, 4, 0]);
        assert!(ChannelMode::mono(17).is_err());
    }

    #[test]
    fn mono_channel_count_is_checked_on_every_path() {
        let count = U7::new(100).unwrap();
        assert!(ChannelMode::from_number(126, count).is_err());
        assert_eq!(
            ChannelMode::from_number(126, U7::new(16).unwrap()),
            Ok(Some(ChannelMode::mono(16).unwrap()))
        );

        let json = r#"{ "MonoModeOn": { "channels": 100 } }"#;
        assert!(serde_json::from_str::<ChannelMode>(json).is_err());
        let json = r#"{ "MonoModeOn": { "channels": 2 } }"#;
        assert_eq!(
            serde_json::from_str::<ChannelMode>(json).unwrap(),
            ChannelMode::mono(2).unwrap()
        );
    }

    #[test]
    fn from_number_covers_mode_range_only() {
        for number in 120..=127u8 {
            let mode = ChannelMode::from_number(number, U7::MIN).unwrap().unwrap();
            assert_eq!(mode.number(), number);
        }
        assert_eq!(ChannelMode::from_number(119, U7::MIN), Ok(None));
    }
}

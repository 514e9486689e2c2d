use serde::{Deserialize, Serialize};

use crate::describe::StringId;
use crate::error::ConfigurationError;
use crate::message::{status, ChannelMode, Controller, StatusEvent};
use crate::value::{Channel, EventData, U14, U7};

/// Per-channel musical messages. The status byte is the category base plus
/// the channel number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelVoice {
    NoteOff {
        note: U7,
        velocity: U7,
        channel: Channel,
    },
    NoteOn {
        note: U7,
        velocity: U7,
        channel: Channel,
    },
    PolyphonicAftertouch {
        note: U7,
        pressure: U7,
        channel: Channel,
    },
    ControlChange {
        controller: Controller,
        channel: Channel,
    },
    /// Channel mode messages travel as control changes 120-127.
    ChannelMode {
        mode: ChannelMode,
        channel: Channel,
    },
    ProgramChange {
        program: U7,
        channel: Channel,
    },
    ChannelAftertouch {
        pressure: U7,
        channel: Channel,
    },
    PitchBendChange {
        bend: U14,
        channel: Channel,
    },
}

impl ChannelVoice {
    /// Note off. Channels are 0-15.
    pub fn note_off(note: u8, velocity: u8, channel: u8) -> Result<Self, ConfigurationError> {
        Ok(ChannelVoice::NoteOff {
            note: U7::checked(note, "note")?,
            velocity: U7::checked(velocity, "velocity")?,
            channel: Channel::new(channel)?,
        })
    }

    /// Note on. A velocity of 0 is kept as a note on.
    pub fn note_on(note: u8, velocity: u8, channel: u8) -> Result<Self, ConfigurationError> {
        Ok(ChannelVoice::NoteOn {
            note: U7::checked(note, "note")?,
            velocity: U7::checked(velocity, "velocity")?,
            channel: Channel::new(channel)?,
        })
    }

    /// Pressure on a single held note.
    pub fn polyphonic_aftertouch(
        note: u8,
        pressure: u8,
        channel: u8,
    ) -> Result<Self, ConfigurationError> {
        Ok(ChannelVoice::PolyphonicAftertouch {
            note: U7::checked(note, "note")?,
            pressure: U7::checked(pressure, "pressure")?,
            channel: Channel::new(channel)?,
        })
    }

    /// Control change carrying `controller`'s number and value.
    pub fn control_change(controller: Controller, channel: u8) -> Result<Self, ConfigurationError> {
        Ok(ChannelVoice::ControlChange {
            controller,
            channel: Channel::new(channel)?,
        })
    }

    /// Channel mode message, sent as controller 120-127.
    pub fn channel_mode(mode: ChannelMode, channel: u8) -> Result<Self, ConfigurationError> {
        Ok(ChannelVoice::ChannelMode {
            mode,
            channel: Channel::new(channel)?,
        })
    }

    /// Program change to `program`.
    pub fn program_change(program: u8, channel: u8) -> Result<Self, ConfigurationError> {
        Ok(ChannelVoice::ProgramChange {
            program: U7::checked(program, "program")?,
            channel: Channel::new(channel)?,
        })
    }

    /// Pressure applied to the whole channel.
    pub fn channel_aftertouch(pressure: u8, channel: u8) -> Result<Self, ConfigurationError> {
        Ok(ChannelVoice::ChannelAftertouch {
            pressure: U7::checked(pressure, "pressure")?,
            channel: Channel::new(channel)?,
        })
    }

    /// `bend` is 0-16383 with 8192 at rest.
    pub fn pitch_bend(bend: u16, channel: u8) -> Result<Self, ConfigurationError> {
        Ok(ChannelVoice::PitchBendChange {
            bend: U14::checked(bend, "pitch bend")?,
            channel: Channel::new(channel)?,
        })
    }

    /// Channel the message is addressed to.
    pub const fn channel(&self) -> Channel {
        match self {
            ChannelVoice::NoteOff { channel, .. }
            | ChannelVoice::NoteOn { channel, .. }
            | ChannelVoice::PolyphonicAftertouch { channel, .. }
            | ChannelVoice::ControlChange { channel, .. }
            | ChannelVoice::ChannelMode { channel, .. }
            | ChannelVoice::ProgramChange { channel, .. }
            | ChannelVoice::ChannelAftertouch { channel, .. }
            | ChannelVoice::PitchBendChange { channel, .. } => *channel,
        }
    }

    /// Same message addressed to `channel`.
    pub fn with_channel(mut self, channel: Channel) -> Self {
        match &mut self {
            ChannelVoice::NoteOff { channel: c, .. }
            | ChannelVoice::NoteOn { channel: c, .. }
            | ChannelVoice::PolyphonicAftertouch { channel: c, .. }
            | ChannelVoice::ControlChange { channel: c, .. }
            | ChannelVoice::ChannelMode { channel: c, .. }
            | ChannelVoice::ProgramChange { channel: c, .. }
            | ChannelVoice::ChannelAftertouch { channel: c, .. }
            | ChannelVoice::PitchBendChange { channel: c, .. } => *c = channel,
        }
        self
    }

    /// Status byte on channel 0.
    pub const fn base_status(&self) -> u8 {
        match self {
            ChannelVoice::NoteOff { .. } => status::NOTE_OFF,
            ChannelVoice::NoteOn { .. } => status::NOTE_ON,
            ChannelVoice::PolyphonicAftertouch { .. } => status::POLYPHONIC_AFTERTOUCH,
            ChannelVoice::ControlChange { .. } | ChannelVoice::ChannelMode { .. } => {
                status::CONTROL_CHANGE
            }
            ChannelVoice::ProgramChange { .. } => status::PROGRAM_CHANGE,
            ChannelVoice::ChannelAftertouch { .. } => status::CHANNEL_AFTERTOUCH,
            ChannelVoice::PitchBendChange { .. } => status::PITCH_BEND,
        }
    }
}

impl StatusEvent for ChannelVoice {
    fn status_byte(&self) -> u8 {
        self.base_status() + self.channel().get()
    }

    fn data_bytes(&self) -> EventData {
        match self {
            ChannelVoice::NoteOff { note, velocity, .. }
            | ChannelVoice::NoteOn { note, velocity, .. } => EventData::new(*note, *velocity),
            ChannelVoice::PolyphonicAftertouch { note, pressure, .. } => {
                EventData::new(*note, *pressure)
            }
            ChannelVoice::ControlChange { controller, .. } => EventData {
                data1: controller.status_byte(),
                data2: controller.data_bytes().data1,
            },
            ChannelVoice::ChannelMode { mode, .. } => EventData {
                data1: mode.status_byte(),
                data2: mode.data_bytes().data1,
            },
            ChannelVoice::ProgramChange { program, .. } => EventData::single(*program),
            ChannelVoice::ChannelAftertouch { pressure, .. } => EventData::single(*pressure),
            ChannelVoice::PitchBendChange { bend, .. } => EventData::fourteen_bit(*bend),
        }
    }

    fn string_id(&self) -> StringId {
        match self {
            ChannelVoice::NoteOff { .. } => StringId::NoteOff,
            ChannelVoice::NoteOn { .. } => StringId::NoteOn,
            ChannelVoice::PolyphonicAftertouch { .. } => StringId::PolyphonicAftertouch,
            ChannelVoice::ControlChange { controller, .. } => controller.string_id(),
            ChannelVoice::ChannelMode { mode, .. } => mode.string_id(),
            ChannelVoice::ProgramChange { .. } => StringId::ProgramChange,
            ChannelVoice::ChannelAftertouch { .. } => StringId::ChannelAftertouch,
            ChannelVoice::PitchBendChange { .. } => StringId::PitchBendChange,
        }
    }

    fn message_len(&self) -> usize {
        match self {
            ChannelVoice::ProgramChange { .. } | ChannelVoice::ChannelAftertouch { .. } => 2,
            _ => 3,
        }
    }
}

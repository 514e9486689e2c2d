//! Typed MIDI 1.0 messages, one enum per status category.
//!
//! Every category implements [`StatusEvent`], which yields the status byte, the
//! two data bytes and a description identifier. [`MidiStatus`] is the outer tag
//! an [`crate::Event`] carries; controller and channel-mode identities reach the
//! wire through [`ChannelVoice`], quarter frames through [`SystemCommon`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::describe::StringId;
use crate::value::EventData;

mod channel_mode;
mod channel_voice;
mod controller;
mod quarter_frame;
mod system_common;
mod system_realtime;

pub use channel_mode::{ChannelMode, MonoChannels};
pub use channel_voice::ChannelVoice;
pub use controller::{Controller, UndefinedController, TOGGLE_THRESHOLD};
pub use quarter_frame::{QuarterFrame, SmpteRate, SmpteTime};
pub use system_common::{ReservedSystemCommon, SystemCommon};
pub use system_realtime::{ReservedSystemRealTime, SystemRealTime};

/// Status bytes from the MIDI 1.0 expanded status table.
pub mod status {
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const POLYPHONIC_AFTERTOUCH: u8 = 0xA0;
    pub const CONTROL_CHANGE: u8 = 0xB0;
    pub const PROGRAM_CHANGE: u8 = 0xC0;
    pub const CHANNEL_AFTERTOUCH: u8 = 0xD0;
    pub const PITCH_BEND: u8 = 0xE0;

    pub const SYSTEM_EXCLUSIVE: u8 = 0xF0;
    pub const QUARTER_FRAME: u8 = 0xF1;
    pub const SONG_POSITION_POINTER: u8 = 0xF2;
    pub const SONG_SELECT: u8 = 0xF3;
    pub const TUNE_REQUEST: u8 = 0xF6;
    pub const END_OF_EXCLUSIVE: u8 = 0xF7;
    pub const RESERVED_SYSTEM_COMMON: [u8; 2] = [0xF4, 0xF5];

    pub const TIMING_CLOCK: u8 = 0xF8;
    pub const START: u8 = 0xFA;
    pub const CONTINUE: u8 = 0xFB;
    pub const STOP: u8 = 0xFC;
    pub const ACTIVE_SENSING: u8 = 0xFE;
    pub const RESET: u8 = 0xFF;
    pub const RESERVED_SYSTEM_REAL_TIME: [u8; 2] = [0xF9, 0xFD];

    /// Mask selecting the category nibble of a channel-voice status.
    pub const CATEGORY_MASK: u8 = 0xF0;
    /// First controller number that addresses a channel mode message.
    pub const FIRST_CHANNEL_MODE: u8 = 120;

    /// Length in bytes, status included, of a message starting with `status`.
    ///
    /// System exclusive uses the fixed two-data-byte form this crate encodes.
    pub const fn message_len(status: u8) -> Option<usize> {
        if status < 0x80 {
            return None;
        }
        Some(match status & CATEGORY_MASK {
            PROGRAM_CHANGE | CHANNEL_AFTERTOUCH => 2,
            0x80..=0xE0 => 3,
            _ => match status {
                SYSTEM_EXCLUSIVE | SONG_POSITION_POINTER => 3,
                QUARTER_FRAME | SONG_SELECT => 2,
                _ => 1,
            },
        })
    }
}

/// Capability shared by every message category.
pub trait StatusEvent {
    /// First byte on the wire. For controller and channel-mode identities this
    /// is the controller number the channel-voice wrapper places in data byte 1.
    fn status_byte(&self) -> u8;

    /// The two data bytes following the status, zero where unused.
    fn data_bytes(&self) -> EventData;

    /// Identifier handed to a [`crate::Localizer`].
    fn string_id(&self) -> StringId;

    /// Number of meaningful bytes, status included.
    fn message_len(&self) -> usize {
        3
    }

    /// Fixed-size record: status and both data bytes, zero padded.
    fn wire_bytes(&self) -> [u8; 3] {
        let data = self.data_bytes();
        [self.status_byte(), data.data1, data.data2]
    }

    /// Length-accurate encoding.
    fn compact_bytes(&self) -> SmallVec<[u8; 3]> {
        let bytes = self.wire_bytes();
        SmallVec::from_slice(&bytes[..self.message_len()])
    }
}

/// Outer tag for anything that can be sent as a complete message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MidiStatus {
    ChannelVoice(ChannelVoice),
    SystemCommon(SystemCommon),
    SystemRealTime(SystemRealTime),
}

impl MidiStatus {
    /// Channel of a channel-voice message; `None` for system messages.
    pub fn channel(&self) -> Option<crate::Channel> {
        match self {
            MidiStatus::ChannelVoice(voice) => Some(voice.channel()),
            _ => None,
        }
    }
}

impl StatusEvent for MidiStatus {
    fn status_byte(&self) -> u8 {
        match self {
            MidiStatus::ChannelVoice(m) => m.status_byte(),
            MidiStatus::SystemCommon(m) => m.status_byte(),
            MidiStatus::SystemRealTime(m) => m.status_byte(),
        }
    }

    fn data_bytes(&self) -> EventData {
        match self {
            MidiStatus::ChannelVoice(m) => m.data_bytes(),
            MidiStatus::SystemCommon(m) => m.data_bytes(),
            MidiStatus::SystemRealTime(m) => m.data_bytes(),
        }
    }

    fn string_id(&self) -> StringId {
        match self {
            MidiStatus::ChannelVoice(m) => m.string_id(),
            MidiStatus::SystemCommon(m) => m.string_id(),
            MidiStatus::SystemRealTime(m) => m.string_id(),
        }
    }

    fn message_len(&self) -> usize {
        match self {
            MidiStatus::ChannelVoice(m) => m.message_len(),
            MidiStatus::SystemCommon(m) => m.message_len(),
            MidiStatus::SystemRealTime(m) => m.message_len(),
        }
    }
}

impl From<ChannelVoice> for MidiStatus {
    fn from(message: ChannelVoice) -> Self {
        MidiStatus::ChannelVoice(message)
    }
}

impl From<SystemCommon> for MidiStatus {
    fn from(message: SystemCommon) -> Self {
        MidiStatus::SystemCommon(message)
    }
}

impl From<SystemRealTime> for MidiStatus {
    fn from(message: SystemRealTime) -> Self {
        MidiStatus::SystemRealTime(message)
    }
}

impl From<QuarterFrame> for MidiStatus {
    fn from(frame: QuarterFrame) -> Self {
        MidiStatus::SystemCommon(SystemCommon::TimeCodeQuarterFrame(frame))
    }
}

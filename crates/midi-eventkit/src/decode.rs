//! Raw bytes back into typed messages, using the same status table as encoding.
//!
//! One call decodes one message. Both the padded three-byte records and the
//! length-accurate form are accepted; running status and multi-message
//! streams are not.

use tracing::trace;

use crate::error::DecodeError;
use crate::message::{
    status, ChannelMode, ChannelVoice, Controller, MidiStatus, QuarterFrame,
    ReservedSystemCommon, SystemCommon, SystemRealTime,
};
use crate::value::{Channel, U14, U7};

/// Longest record accepted, the padded form.
pub const MAX_MESSAGE_LEN: usize = 3;

pub fn decode(bytes: &[u8]) -> Result<MidiStatus, DecodeError> {
    let (&status_byte, _) = bytes.split_first().ok_or(DecodeError::Empty)?;
    let expected =
        status::message_len(status_byte).ok_or(DecodeError::UnexpectedDataByte(status_byte))?;
    if bytes.len() < expected {
        return Err(DecodeError::Truncated {
            status: status_byte,
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > MAX_MESSAGE_LEN || bytes[expected..].iter().any(|&b| b != 0) {
        return Err(DecodeError::TrailingBytes {
            status: status_byte,
            expected,
            actual: bytes.len(),
        });
    }

    let data = |index: usize| -> Result<U7, DecodeError> {
        let byte = bytes.get(index).copied().unwrap_or(0);
        U7::new(byte).map_err(|_| DecodeError::DataByteOutOfRange(byte))
    };

    let message = if status_byte < status::SYSTEM_EXCLUSIVE {
        let channel = Channel::from_status(status_byte);
        MidiStatus::ChannelVoice(decode_channel_voice(status_byte, channel, data(1)?, data(2)?)?)
    } else if let Some(real_time) = SystemRealTime::from_status(status_byte) {
        MidiStatus::SystemRealTime(real_time)
    } else {
        MidiStatus::SystemCommon(decode_system_common(status_byte, data(1)?, data(2)?)?)
    };
    trace!(status = status_byte, ?message, "decoded message");
    Ok(message)
}

fn decode_channel_voice(
    status_byte: u8,
    channel: Channel,
    data1: U7,
    data2: U7,
) -> Result<ChannelVoice, DecodeError> {
    let message = match status_byte & status::CATEGORY_MASK {
        status::NOTE_OFF => ChannelVoice::NoteOff {
            note: data1,
            velocity: data2,
            channel,
        },
        status::NOTE_ON => ChannelVoice::NoteOn {
            note: data1,
            velocity: data2,
            channel,
        },
        status::POLYPHONIC_AFTERTOUCH => ChannelVoice::PolyphonicAftertouch {
            note: data1,
            pressure: data2,
            channel,
        },
        status::CONTROL_CHANGE => match ChannelMode::from_number(data1.get(), data2)
            .map_err(|_| DecodeError::DataByteOutOfRange(data2.get()))?
        {
            Some(mode) => ChannelVoice::ChannelMode { mode, channel },
            None => ChannelVoice::ControlChange {
                controller: Controller::from_number(data1.get(), data2)
                    .map_err(|_| DecodeError::DataByteOutOfRange(data1.get()))?,
                channel,
            },
        },
        status::PROGRAM_CHANGE => ChannelVoice::ProgramChange {
            program: data1,
            channel,
        },
        status::CHANNEL_AFTERTOUCH => ChannelVoice::ChannelAftertouch {
            pressure: data1,
            channel,
        },
        _ => ChannelVoice::PitchBendChange {
            bend: U14::from_halves(data1, data2),
            channel,
        },
    };
    Ok(message)
}

fn decode_system_common(status_byte: u8, data1: U7, data2: U7) -> Result<SystemCommon, DecodeError> {
    let message = match status_byte {
        status::SYSTEM_EXCLUSIVE => SystemCommon::SystemExclusive { data1, data2 },
        status::QUARTER_FRAME => SystemCommon::TimeCodeQuarterFrame(QuarterFrame::from_data_byte(data1)),
        status::SONG_POSITION_POINTER => SystemCommon::SongPositionPointer(U14::from_halves(data1, data2)),
        status::SONG_SELECT => SystemCommon::SongSelect(data1),
        status::TUNE_REQUEST => SystemCommon::TuneRequest,
        status::END_OF_EXCLUSIVE => SystemCommon::EndOfExclusive,
        other => SystemCommon::Reserved(
            ReservedSystemCommon::new(other).map_err(|_| DecodeError::UnexpectedDataByte(other))?,
        ),
    };
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::StatusEvent;

    #[test]
    fn decodes_channel_voice() {
        assert_eq!(
            decode(&[0x93, 60, 0]).unwrap(),
            MidiStatus::from(ChannelVoice::note_on(60, 0, 3).unwrap())
        );
        assert_eq!(
            decode(&[0xE0, 0, 64]).unwrap(),
            MidiStatus::from(ChannelVoice::pitch_bend(8192, 0).unwrap())
        );
        assert_eq!(
            decode(&[0xC4, 12]).unwrap(),
            MidiStatus::from(ChannelVoice::program_change(12, 4).unwrap())
        );
    }

    #[test]
    fn controller_numbers_split_between_controllers_and_modes() {
        let cc = decode(&[0xB1, 1, 42]).unwrap();
        assert_eq!(cc.string_id(), crate::StringId::ModulationWheel);

        let mode = decode(&[0xB1, 122, 127]).unwrap();
        assert_eq!(
            mode,
            MidiStatus::from(ChannelVoice::channel_mode(ChannelMode::LocalControl(true), 1).unwrap())
        );

        let undefined = decode(&[0xB0, 3, 9]).unwrap();
        assert_eq!(
            undefined,
            MidiStatus::from(ChannelVoice::control_change(Controller::undefined(3, 9).unwrap(), 0).unwrap())
        );
    }

    #[test]
    fn decodes_system_messages() {
        assert_eq!(decode(&[0xF8]).unwrap(), MidiStatus::from(SystemRealTime::TimingClock));
        assert_eq!(decode(&[0xF6, 0, 0]).unwrap(), MidiStatus::from(SystemCommon::TuneRequest));
        assert_eq!(
            decode(&[0xF2, 0x34, 0x24]).unwrap(),
            MidiStatus::from(SystemCommon::song_position(0x1234).unwrap())
        );
        assert_eq!(decode(&[0xF5]).unwrap().status_byte(), 0xF5);
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(decode(&[]), Err(DecodeError::Empty));
        assert_eq!(decode(&[0x40, 1, 2]), Err(DecodeError::UnexpectedDataByte(0x40)));
        assert_eq!(decode(&[0x90, 0x80, 1]), Err(DecodeError::DataByteOutOfRange(0x80)));
        assert_eq!(
            decode(&[0x90, 60]),
            Err(DecodeError::Truncated {
                status: 0x90,
                expected: 3,
                actual: 2,
            })
        );
        assert!(matches!(decode(&[0xF8, 1, 0]), Err(DecodeError::TrailingBytes { .. })));
        assert!(matches!(decode(&[0x90, 1, 2, 0]), Err(DecodeError::TrailingBytes { .. })));
        assert_eq!(decode(&[0xB0, 126, 100]), Err(DecodeError::DataByteOutOfRange(100)));
    }
}

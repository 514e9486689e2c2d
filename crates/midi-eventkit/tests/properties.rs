use midi_eventkit::{
    decode, describe, Channel, ChannelMode, ChannelVoice, Controller, EventData, EventValue,
    MidiStatus, QuarterFrame, ReservedSystemCommon, ReservedSystemRealTime, StatusEvent,
    SystemCommon, SystemRealTime, U14, U7,
};
use proptest::prelude::*;

fn u7() -> impl Strategy<Value = U7> {
    (0u8..=127).prop_map(U7::from_masked)
}

fn channel() -> impl Strategy<Value = Channel> {
    (0u8..16).prop_map(Channel::from_status)
}

fn controller() -> impl Strategy<Value = Controller> {
    (0u8..120, u7()).prop_map(|(number, value)| {
        Controller::from_number(number, value).expect("numbers below 120 are controllers")
    })
}

fn channel_mode() -> impl Strategy<Value = ChannelMode> {
    (120u8..=127, u7()).prop_filter_map("mono mode takes at most 16 channels", |(number, value)| {
        ChannelMode::from_number(number, value).ok().flatten()
    })
}

fn channel_voice() -> impl Strategy<Value = ChannelVoice> {
    prop_oneof![
        (u7(), u7(), channel()).prop_map(|(note, velocity, channel)| ChannelVoice::NoteOff {
            note,
            velocity,
            channel,
        }),
        (u7(), u7(), channel()).prop_map(|(note, velocity, channel)| ChannelVoice::NoteOn {
            note,
            velocity,
            channel,
        }),
        (u7(), u7(), channel()).prop_map(|(note, pressure, channel)| {
            ChannelVoice::PolyphonicAftertouch {
                note,
                pressure,
                channel,
            }
        }),
        (controller(), channel())
            .prop_map(|(controller, channel)| ChannelVoice::ControlChange { controller, channel }),
        (channel_mode(), channel()).prop_map(|(mode, channel)| ChannelVoice::ChannelMode { mode, channel }),
        (u7(), channel()).prop_map(|(program, channel)| ChannelVoice::ProgramChange { program, channel }),
        (u7(), channel())
            .prop_map(|(pressure, channel)| ChannelVoice::ChannelAftertouch { pressure, channel }),
        (0u16..=16383, channel()).prop_map(|(bend, channel)| ChannelVoice::PitchBendChange {
            bend: U14::new(bend).expect("in range"),
            channel,
        }),
    ]
}

fn system_common() -> impl Strategy<Value = SystemCommon> {
    prop_oneof![
        (u7(), u7()).prop_map(|(data1, data2)| SystemCommon::SystemExclusive { data1, data2 }),
        u7().prop_map(|byte| SystemCommon::TimeCodeQuarterFrame(QuarterFrame::from_data_byte(byte))),
        (0u16..=16383).prop_map(|beats| SystemCommon::song_position(beats).expect("in range")),
        u7().prop_map(SystemCommon::SongSelect),
        Just(SystemCommon::TuneRequest),
        Just(SystemCommon::EndOfExclusive),
        prop::sample::select(vec![0xF4u8, 0xF5]).prop_map(|status| {
            SystemCommon::Reserved(ReservedSystemCommon::new(status).expect("reserved"))
        }),
    ]
}

fn system_real_time() -> impl Strategy<Value = SystemRealTime> {
    prop::sample::select(vec![0xF8u8, 0xF9, 0xFA, 0xFB, 0xFC, 0xFD, 0xFE, 0xFF]).prop_map(|status| {
        SystemRealTime::from_status(status).expect("real-time status")
    })
}

fn message() -> impl Strategy<Value = MidiStatus> {
    prop_oneof![
        channel_voice().prop_map(MidiStatus::from),
        system_common().prop_map(MidiStatus::from),
        system_real_time().prop_map(MidiStatus::from),
    ]
}

proptest! {
    #[test]
    fn channel_is_added_to_the_base_status(message in channel_voice(), channel in channel()) {
        let base = message.with_channel(Channel::from_status(0)).status_byte();
        let moved = message.with_channel(channel);
        prop_assert_eq!(moved.status_byte() - base, channel.get());
        prop_assert_eq!(moved.channel(), channel);
    }

    #[test]
    fn fourteen_bit_values_survive_the_split(value in 0u16..=16383) {
        let value = U14::new(value).expect("in range");
        let data = EventData::from(EventValue::FourteenBit(value));
        prop_assert!(data.data1 <= 127 && data.data2 <= 127);
        prop_assert_eq!(data.as_fourteen_bit(), value);
    }

    #[test]
    fn padded_and_compact_bytes_decode_to_the_same_message(message in message()) {
        prop_assert_eq!(decode(&message.wire_bytes()), Ok(message));
        prop_assert_eq!(decode(&message.compact_bytes()), Ok(message));
    }

    #[test]
    fn controller_descriptions_ignore_the_channel(controller in controller(), channel in 0u8..16) {
        let message = ChannelVoice::control_change(controller, channel).expect("valid channel");
        prop_assert_eq!(describe(&message), controller.string_id());
        prop_assert_eq!(
            describe(&message),
            describe(&message.with_channel(Channel::from_status(0)))
        );
    }

    #[test]
    fn channels_above_fifteen_are_rejected(channel in 16u8..=255, note in 0u8..=127) {
        prop_assert!(ChannelVoice::note_on(note, 1, channel).is_err());
    }
}

#[test]
fn every_reserved_real_time_status_round_trips() {
    for status in [0xF9u8, 0xFD] {
        let message = SystemRealTime::Reserved(ReservedSystemRealTime::new(status).unwrap());
        assert_eq!(decode(&[status]), Ok(MidiStatus::from(message)));
    }
}

#[test]
fn toggles_send_full_scale() {
    let on = Controller::from_number(64, U7::new(100).unwrap()).unwrap();
    let off = Controller::from_number(64, U7::new(63).unwrap()).unwrap();
    assert_eq!(on.data_bytes(), EventData { data1: 127, data2: 0 });
    assert_eq!(off.data_bytes(), EventData { data1: 0, data2: 0 });
}

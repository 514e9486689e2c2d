//! MIDI 1.0 message encoding with typed status categories.
//!
//! Messages are built from validated values, so a constructed [`Event`] always
//! encodes. Single events become three payload bytes and a transport tick;
//! batches become a length-prefixed [`PacketListBuffer`]. [`decode`] reads the
//! bytes back through the same status table.

pub mod clock;
pub mod config;
mod decode;
mod describe;
mod error;
mod event;
pub mod message;
mod output;
pub mod packet;
mod value;

pub use clock::{ManualClock, MidiTimestamp, MonotonicClock, SystemClock, TimeStamp};
pub use config::{CodecConfig, PayloadFormat, DEFAULT_PACKET_LIST_CAPACITY};
pub use decode::{decode, MAX_MESSAGE_LEN};
pub use describe::{describe, EnglishLocalizer, Localizer, StringId, TableLocalizer};
pub use error::{
    ClockError, ConfigurationError, DecodeError, EncodeError, MidiError, TransportError,
};
pub use event::{EncodedEvent, Event};
pub use message::{
    ChannelMode, ChannelVoice, Controller, MidiStatus, MonoChannels, QuarterFrame, ReservedSystemCommon,
    ReservedSystemRealTime, SmpteRate, SmpteTime, StatusEvent, SystemCommon, SystemRealTime,
    UndefinedController,
};
pub use output::{
    ChannelTransport, Delivery, Endpoint, LoopbackTransport, MidiSender, PacketTransport,
};
pub use packet::{PacketListBuffer, PacketListBuilder, PacketView};
pub use value::{Channel, EventData, EventValue, Nibble, U14, U7};

/// Encode one message scheduled at `timestamp`.
pub fn encode_event<C>(
    category: impl Into<MidiStatus>,
    timestamp: TimeStamp,
    clock: &C,
) -> Result<EncodedEvent, MidiError>
where
    C: MonotonicClock + ?Sized,
{
    let event = Event::new(category, timestamp)?;
    Ok(event.encode(clock)?)
}

/// Pack `events` into one packet list sized by `config`.
///
/// Clock failures come back as [`MidiError::Clock`], as from [`encode_event`].
pub fn encode_batch<C>(
    events: &[Event],
    config: &CodecConfig,
    clock: &C,
) -> Result<PacketListBuffer, MidiError>
where
    C: MonotonicClock + ?Sized,
{
    let builder = PacketListBuilder::new(config)?;
    Ok(builder.build(events, clock)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_on_now_is_sent_immediately() {
        let encoded = encode_event(
            ChannelVoice::note_on(60, 100, 0).unwrap(),
            TimeStamp::Now,
            &ManualClock::new(5_000),
        )
        .unwrap();
        assert_eq!(encoded.payload, [144, 60, 100]);
        assert_eq!(encoded.timestamp, 0);
    }

    #[test]
    fn pitch_bend_center() {
        let encoded = encode_event(
            ChannelVoice::pitch_bend(8192, 0).unwrap(),
            TimeStamp::Now,
            &ManualClock::default(),
        )
        .unwrap();
        assert_eq!(encoded.payload, [224, 0, 64]);
    }

    #[test]
    fn offsets_are_added_to_the_clock() {
        let clock = ManualClock::new(1_000);
        let encoded = encode_event(
            SystemRealTime::Start,
            TimeStamp::OffsetSeconds(0.25),
            &clock,
        )
        .unwrap();
        assert_eq!(encoded.timestamp, 251_000);
    }

    #[test]
    fn invalid_offsets_and_clock_failures_are_reported() {
        let clock = ManualClock::default();
        assert!(matches!(
            encode_event(SystemRealTime::Start, TimeStamp::OffsetSeconds(f64::NAN), &clock),
            Err(MidiError::Configuration(ConfigurationError::InvalidTimeOffset(_)))
        ));

        let broken = || -> Result<MidiTimestamp, ClockError> {
            Err(ClockError::Unavailable("no host clock".into()))
        };
        assert!(matches!(
            encode_event(SystemRealTime::Start, TimeStamp::OffsetSeconds(1.0), &broken),
            Err(MidiError::Clock(ClockError::Unavailable(_)))
        ));
    }

    #[test]
    fn clock_failures_have_one_shape() {
        let broken = || -> Result<MidiTimestamp, ClockError> {
            Err(ClockError::Unavailable("no host clock".into()))
        };
        let event = Event::new(SystemRealTime::Start, TimeStamp::OffsetSeconds(1.0)).unwrap();
        let single = encode_event(*event.category(), event.timestamp(), &broken);
        let batch = encode_batch(&[event], &CodecConfig::default(), &broken);
        assert!(matches!(single, Err(MidiError::Clock(_))));
        assert!(matches!(batch, Err(MidiError::Clock(_))));
    }

    #[test]
    fn batch_config_errors_are_reported() {
        let config = CodecConfig {
            packet_list_capacity: 0,
            ..CodecConfig::default()
        };
        assert!(matches!(
            encode_batch(&[], &config, &ManualClock::default()),
            Err(MidiError::Configuration(ConfigurationError::CapacityTooSmall { .. }))
        ));
    }
}

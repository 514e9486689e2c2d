use std::fmt;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use tracing::debug;

use crate::clock::MonotonicClock;
use crate::config::CodecConfig;
use crate::error::TransportError;
use crate::event::Event;
use crate::packet::{PacketListBuffer, PacketListBuilder};

/// Opaque handle to a destination opened by the platform layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    id: u64,
    name: Arc<str>,
}

impl Endpoint {
    /// Handle for the destination the platform layer calls `id`.
    pub fn new(id: u64, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Platform identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name of the destination.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// Send primitive supplied by the platform layer.
pub trait PacketTransport: Send {
    fn send(&mut self, endpoint: &Endpoint, packets: PacketListBuffer) -> Result<(), TransportError>;
}

/// A packet list addressed to an endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delivery {
    pub endpoint: Endpoint,
    pub packets: PacketListBuffer,
}

/// Hands packet lists to a consumer thread over a channel.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    tx: Sender<Delivery>,
}

impl ChannelTransport {
    /// Transport whose `send` fails once `capacity` lists are waiting.
    pub fn bounded(capacity: usize) -> (Self, Receiver<Delivery>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        (Self { tx }, rx)
    }

    /// Transport that never reports a full queue.
    pub fn unbounded() -> (Self, Receiver<Delivery>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl PacketTransport for ChannelTransport {
    fn send(&mut self, endpoint: &Endpoint, packets: PacketListBuffer) -> Result<(), TransportError> {
        self.tx
            .try_send(Delivery {
                endpoint: endpoint.clone(),
                packets,
            })
            .map_err(|err| match err {
                TrySendError::Full(_) => TransportError::Full(endpoint.to_string()),
                TrySendError::Disconnected(_) => TransportError::Disconnected(endpoint.to_string()),
            })
    }
}

/// Records every packet list it is given.
#[derive(Clone, Debug, Default)]
pub struct LoopbackTransport {
    sent: Arc<Mutex<Vec<Delivery>>>,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retrieves and clears recorded deliveries.
    pub fn drain(&self) -> Vec<Delivery> {
        std::mem::take(&mut *self.sent.lock())
    }

    pub fn len(&self) -> usize {
        self.sent.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sent.lock().is_empty()
    }
}

impl PacketTransport for LoopbackTransport {
    fn send(&mut self, endpoint: &Endpoint, packets: PacketListBuffer) -> Result<(), TransportError> {
        self.sent.lock().push(Delivery {
            endpoint: endpoint.clone(),
            packets,
        });
        Ok(())
    }
}

/// Encodes batches and forwards them to a transport.
pub struct MidiSender<T, C> {
    builder: PacketListBuilder,
    clock: C,
    transport: T,
}

impl<T, C> MidiSender<T, C>
where
    T: PacketTransport,
    C: MonotonicClock,
{
    /// Fails with [`TransportError::Configuration`] if `config` cannot build packet lists.
    pub fn new(config: &CodecConfig, clock: C, transport: T) -> Result<Self, TransportError> {
        Ok(Self {
            builder: PacketListBuilder::new(config)?,
            clock,
            transport,
        })
    }

    /// Send `events` as one packet list. Returns the number of packets sent.
    pub fn send(&mut self, endpoint: &Endpoint, events: &[Event]) -> Result<u32, TransportError> {
        let packets = self.builder.build(events, &self.clock)?;
        let count = packets.packet_count();
        self.transport.send(endpoint, packets)?;
        debug!(%endpoint, count, "sent packet list");
        Ok(count)
    }

    /// Send a single event as a one-packet list.
    pub fn send_event(&mut self, endpoint: &Endpoint, event: Event) -> Result<(), TransportError> {
        self.send(endpoint, std::slice::from_ref(&event)).map(|_| ())
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::clock::ManualClock;
    use crate::error::ConfigurationError;
    use crate::message::{ChannelVoice, SystemRealTime};

    #[test]
    fn sender_delivers_one_list_per_batch() {
        let loopback = LoopbackTransport::new();
        let mut sender =
            MidiSender::new(&CodecConfig::default(), ManualClock::new(0), loopback.clone()).unwrap();
        let endpoint = Endpoint::new(7, "Synth");
        let events = [
            Event::now(ChannelVoice::note_on(60, 90, 0).unwrap()),
            Event::now(ChannelVoice::note_off(60, 0, 0).unwrap()),
        ];

        assert_eq!(sender.send(&endpoint, &events).unwrap(), 2);
        sender.send_event(&endpoint, Event::now(SystemRealTime::Stop)).unwrap();

        let deliveries = loopback.drain();
        assert_eq!(deliveries.len(), 2);
        assert_eq!(deliveries[0].endpoint, endpoint);
        assert_eq!(deliveries[0].packets.packet_count(), 2);
        assert!(loopback.is_empty());
    }

    #[test]
    fn channel_transport_feeds_consumer_thread() {
        let (transport, rx) = ChannelTransport::unbounded();
        let consumer = thread::spawn(move || {
            rx.iter()
                .map(|delivery| delivery.packets.packet_count())
                .sum::<u32>()
        });

        let mut sender =
            MidiSender::new(&CodecConfig::default(), ManualClock::new(0), transport).unwrap();
        let endpoint = Endpoint::new(1, "Out");
        for note in 0..4 {
            let event = Event::now(ChannelVoice::note_on(note, 1, 0).unwrap());
            sender.send_event(&endpoint, event).unwrap();
        }
        drop(sender);
        assert_eq!(consumer.join().unwrap(), 4);
    }

    #[test]
    fn dropped_receiver_reports_disconnect() {
        let (transport, rx) = ChannelTransport::bounded(1);
        drop(rx);
        let mut sender =
            MidiSender::new(&CodecConfig::default(), ManualClock::new(0), transport).unwrap();
        let result = sender.send_event(&Endpoint::new(2, "Gone"), Event::now(SystemRealTime::Start));
        assert!(matches!(result, Err(TransportError::Disconnected(name)) if name.contains("Gone")));
    }

    #[test]
    fn full_queue_is_not_a_disconnect() {
        let (transport, rx) = ChannelTransport::bounded(1);
        let mut sender =
            MidiSender::new(&CodecConfig::default(), ManualClock::new(0), transport).unwrap();
        let endpoint = Endpoint::new(1, "Out");
        sender.send_event(&endpoint, Event::now(SystemRealTime::Start)).unwrap();

        let result = sender.send_event(&endpoint, Event::now(SystemRealTime::Stop));
        assert!(matches!(result, Err(TransportError::Full(name)) if name.contains("Out")));

        assert_eq!(rx.try_recv().unwrap().packets.packet_count(), 1);
        sender.send_event(&endpoint, Event::now(SystemRealTime::Stop)).unwrap();
    }

    #[test]
    fn unusable_config_is_a_transport_error() {
        let config = CodecConfig {
            packet_list_capacity: 2,
            ..CodecConfig::default()
        };
        let result = MidiSender::new(&config, ManualClock::new(0), LoopbackTransport::new());
        assert!(matches!(
            result,
            Err(TransportError::Configuration(ConfigurationError::CapacityTooSmall { .. }))
        ));
    }

    #[test]
    fn encode_failures_surface_through_sender() {
        let config = CodecConfig {
            packet_list_capacity: 4,
            ..CodecConfig::default()
        };
        let mut sender =
            MidiSender::new(&config, ManualClock::new(0), LoopbackTransport::new()).unwrap();
        let result = sender.send_event(&Endpoint::new(3, "Tiny"), Event::now(SystemRealTime::Start));
        assert!(matches!(result, Err(TransportError::Encode(_))));
        assert!(sender.transport().is_empty());
    }
}

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use midi_eventkit::{
    decode, ChannelVoice, CodecConfig, Event, ManualClock, PacketListBuilder, PayloadFormat,
    StatusEvent, TimeStamp,
};

fn note_batch(len: usize) -> Vec<Event> {
    (0..len)
        .map(|i| {
            let note = ChannelVoice::note_on((i % 128) as u8, 100, (i % 16) as u8).expect("note");
            let offset = TimeStamp::seconds_from_now(i as f64 * 0.001).expect("offset");
            Event::new(note, offset).expect("event")
        })
        .collect()
}

fn build_packet_lists(c: &mut Criterion) {
    let mut group = c.benchmark_group("packet_list");
    group.measurement_time(Duration::from_secs(5));

    let events = note_batch(4_096);
    let clock = ManualClock::new(1_000);
    for (name, payload) in [("padded_4096", PayloadFormat::Padded), ("compact_4096", PayloadFormat::Compact)] {
        let builder = PacketListBuilder::new(&CodecConfig {
            payload,
            ..CodecConfig::default()
        })
        .expect("builder");
        group.bench_function(name, |b| {
            b.iter(|| builder.build(black_box(&events), &clock).expect("build"));
        });
    }

    group.finish();
}

fn decode_messages(c: &mut Criterion) {
    let wire: Vec<[u8; 3]> = note_batch(1_024)
        .iter()
        .map(|event| event.category().wire_bytes())
        .collect();
    c.bench_function("decode_1024", |b| {
        b.iter(|| {
            for bytes in &wire {
                black_box(decode(black_box(bytes)).expect("decode"));
            }
        });
    });
}

criterion_group!(benches, build_packet_lists, decode_messages);
criterion_main!(benches);

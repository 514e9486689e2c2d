#![no_main]

use libfuzzer_sys::fuzz_target;
use midi_eventkit::PacketListBuffer;

fuzz_target!(|data: &[u8]| {
    if let Ok(list) = PacketListBuffer::from_bytes(data.to_vec()) {
        assert_eq!(list.packets().count(), list.packet_count() as usize);
        let _ = list.decode();
    }
});

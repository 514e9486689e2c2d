#![no_main]

use libfuzzer_sys::fuzz_target;
use midi_eventkit::{decode, StatusEvent};

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = decode(data) {
        assert_eq!(decode(&message.wire_bytes()), Ok(message));
        assert_eq!(decode(&message.compact_bytes()), Ok(message));
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use xmlbind::{Bind, Codec};

#[derive(Bind, Debug, PartialEq)]
#[xml(root = "node")]
struct Node {
    #[xml(attribute)]
    tag: String,
    #[xml(attribute)]
    count: Option<u32>,
    size: String,
    #[xml(rename = "port")]
    ports: Vec<u16>,
    location: Option<Location>,
}

#[derive(Bind, Debug, PartialEq)]
struct Location {
    #[xml(attribute)]
    scope: String,
    #[xml(text)]
    id: String,
}

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        for codec in [Codec::compact(), Codec::pretty()] {
            let Ok(node) = codec.decode::<Node>(s) else {
                continue;
            };
            // Decoded text may hold characters XML cannot carry
            let Ok(xml) = codec.encode(&node) else {
                continue;
            };
            let again = codec
                .decode::<Node>(&xml)
                .expect("encoded output should decode");
            assert_eq!(node, again, "value changed through roundtrip");
        }
    }
});

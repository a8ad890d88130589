#![no_main]

use arbitrary::Arbitrary;
use http11_deserializer::{DeserializerLimits, RequestDeserializer};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzLimits {
    max_target_size: u16,
    max_fields_size: u16,
    max_body_size: u32,
    max_chunk_line_size: u8,
    accept_chunked: bool,
    data: Vec<u8>,
}

fn build_limits(input: &FuzzLimits) -> DeserializerLimits {
    DeserializerLimits {
        max_target_size: input.max_target_size as usize,
        max_fields_size: input.max_fields_size as usize,
        max_body_size: input.max_body_size as usize,
        max_chunk_line_size: input.max_chunk_line_size as usize,
    }
}

fuzz_target!(|input: FuzzLimits| {
    let limits = build_limits(&input);

    let mut deserializer =
        RequestDeserializer::with_limits(limits.clone()).accept_chunked(input.accept_chunked);
    deserializer.read(&input.data);
    while deserializer.has_next() {
        match deserializer.next() {
            Ok(request) => {
                assert!(request.target.len() <= limits.max_target_size);
                assert!(request.body.len() <= limits.max_body_size);
            }
            Err(_) => break,
        }
    }
});

#![no_main]

use arbitrary::Arbitrary;
use http11_deserializer::{RequestDeserializer, RequestMessage, Status};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    accept_chunked: bool,
    /// 分割位置 (それぞれ data 長で剰余を取る)
    splits: Vec<u16>,
    data: Vec<u8>,
}

/// チャンクを順に read し、結果をすべて取り出す
fn deserialize(
    input: &FuzzInput,
    chunks: &[&[u8]],
) -> Vec<Result<RequestMessage, Status>> {
    let mut deserializer = RequestDeserializer::new().accept_chunked(input.accept_chunked);
    let mut results = Vec::new();
    for chunk in chunks {
        deserializer.read(chunk);
        while deserializer.has_next() {
            let result = deserializer.next();
            // 入力データから呼び出し規約違反は起きない
            assert_ne!(result, Err(Status::InternalServerError));
            let failed = result.is_err();
            results.push(result);
            if failed {
                return results;
            }
        }
    }
    results
}

fuzz_target!(|input: FuzzInput| {
    let data = input.data.as_slice();

    // データを一度に read
    let whole = deserialize(&input, &[data]);

    // データを任意の位置で分割して read (ストリーミングシナリオ)
    let mut offsets: Vec<usize> = input
        .splits
        .iter()
        .map(|&s| s as usize % (data.len() + 1))
        .collect();
    offsets.push(0);
    offsets.push(data.len());
    offsets.sort_unstable();
    offsets.dedup();
    let chunks: Vec<&[u8]> = offsets.windows(2).map(|w| &data[w[0]..w[1]]).collect();
    let split = deserialize(&input, &chunks);

    // 分割の仕方で結果は変わらない
    assert_eq!(whole, split);
});

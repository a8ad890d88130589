#![no_main]

use arbitrary::Arbitrary;
use http11_deserializer::RemainderBuffer;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum Op {
    Merge(Vec<u8>),
    /// 未消費のバイト数で剰余を取ってから進める
    AddOffset(u16),
    Clear,
}

fuzz_target!(|ops: Vec<Op>| {
    let mut buffer = RemainderBuffer::new();
    // 同じ内容を素朴に保持するモデル
    let mut model: Vec<u8> = Vec::new();

    for op in ops {
        match op {
            Op::Merge(chunk) => {
                buffer.merge(&chunk);
                model.extend_from_slice(&chunk);
            }
            Op::AddOffset(n) => {
                let n = n as usize % (buffer.len() + 1);
                buffer.add_offset(n);
                model.drain(..n);
            }
            Op::Clear => {
                buffer.clear();
                model.clear();
            }
        }
        assert_eq!(buffer.view(), model.as_slice());
        assert_eq!(buffer.len(), model.len());
        assert_eq!(buffer.is_empty(), model.is_empty());
    }
});

//! PBT テスト共通ユーティリティ

use http11_deserializer::{Method, RequestDeserializer, RequestMessage, Status, Version};
use proptest::prelude::*;

// ========================================
// リクエストライン生成
// ========================================

/// 認識されるメソッド
pub fn method() -> impl Strategy<Value = Method> {
    proptest::sample::select(Method::ALL.to_vec())
}

/// 認識される HTTP バージョン
pub fn version() -> impl Strategy<Value = Version> {
    proptest::sample::select(Version::ALL.to_vec())
}

/// リクエストターゲット (SP と CTL を含まない)
pub fn target() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/".to_string()),
        Just("*".to_string()),
        "/[a-zA-Z0-9/_.~%?=&-]{1,64}".prop_map(|s| s),
        "http://[a-z]{1,16}\\.example/[a-z0-9/]{0,32}".prop_map(|s| s),
    ]
}

// ========================================
// フィールド生成
// ========================================

fn token_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
        Just('.'),
        Just('!'),
        Just('~'),
    ]
}

/// フィールド名 (token)
///
/// フレーミングに影響する名前は除く。
pub fn field_name() -> impl Strategy<Value = String> {
    proptest::collection::vec(token_char(), 1..=32)
        .prop_map(|chars| chars.into_iter().collect::<String>())
        .prop_filter("framing fields are generated separately", |name| {
            name != "Content-Length" && name != "Transfer-Encoding"
        })
}

/// フィールド値 (前後に空白を持たない)
pub fn field_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[!-~]([ -~]{0,62}[!-~])?".prop_map(|s| s),
    ]
}

/// 名前が重複しないフィールドの列
pub fn fields() -> impl Strategy<Value = Vec<(String, String)>> {
    proptest::collection::btree_map(field_name(), field_value(), 0..10)
        .prop_map(|map| map.into_iter().collect())
}

/// 前後の OWS
pub fn ows() -> impl Strategy<Value = String> {
    "[ \t]{0,3}".prop_map(|s| s)
}

/// ボディ
pub fn body() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..256)
}

// ========================================
// リクエスト生成
// ========================================

/// 生成したリクエストの部品
#[derive(Debug, Clone)]
pub struct RequestParts {
    pub method: Method,
    pub target: String,
    pub version: Version,
    pub fields: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RequestParts {
    /// Content-Length 付きでワイヤー形式にエンコード
    ///
    /// ボディが空なら Content-Length は付けない。
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = format!("{} {} {}\r\n", self.method, self.target, self.version).into_bytes();
        for (name, value) in &self.fields {
            buf.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        if !self.body.is_empty() {
            buf.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());
        }
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(&self.body);
        buf
    }

    /// chunked でワイヤー形式にエンコード
    pub fn encode_chunked(&self, chunk_size: usize) -> Vec<u8> {
        let mut buf = format!("{} {} {}\r\n", self.method, self.target, self.version).into_bytes();
        for (name, value) in &self.fields {
            buf.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        buf.extend_from_slice(b"Transfer-Encoding: chunked\r\n\r\n");
        for chunk in self.body.chunks(chunk_size.max(1)) {
            buf.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
            buf.extend_from_slice(chunk);
            buf.extend_from_slice(b"\r\n");
        }
        buf.extend_from_slice(b"0\r\n\r\n");
        buf
    }

    /// パース結果が部品と一致するか
    pub fn matches(&self, request: &RequestMessage) -> bool {
        request.method == self.method
            && request.target == self.target
            && request.version == self.version
            && request.body == self.body
            && self
                .fields
                .iter()
                .all(|(name, value)| request.field(name) == Some(value.as_str()))
    }
}

/// 任意のリクエスト
pub fn request() -> impl Strategy<Value = RequestParts> {
    (method(), target(), version(), fields(), body()).prop_map(
        |(method, target, version, fields, body)| RequestParts {
            method,
            target,
            version,
            fields,
            body,
        },
    )
}

// ========================================
// 入力分割
// ========================================

/// 分割位置 (入力長に対する相対位置)
pub fn split_points() -> impl Strategy<Value = Vec<prop::sample::Index>> {
    proptest::collection::vec(any::<prop::sample::Index>(), 0..16)
}

/// 分割位置で入力を切り分ける
pub fn split_at_points<'a>(input: &'a [u8], points: &[prop::sample::Index]) -> Vec<&'a [u8]> {
    let mut offsets: Vec<usize> = points.iter().map(|p| p.index(input.len() + 1)).collect();
    offsets.push(0);
    offsets.push(input.len());
    offsets.sort_unstable();
    offsets.dedup();
    offsets.windows(2).map(|w| &input[w[0]..w[1]]).collect()
}

/// チャンクを順に read し、完成した結果をすべて取り出す
pub fn feed_all<'a>(
    deserializer: &mut RequestDeserializer,
    chunks: impl IntoIterator<Item = &'a [u8]>,
) -> Vec<Result<RequestMessage, Status>> {
    let mut results = Vec::new();
    for chunk in chunks {
        deserializer.read(chunk);
        while deserializer.has_next() {
            results.push(deserializer.next());
        }
    }
    results
}

//! # http11_deserializer
//!
//! インクリメンタルな HTTP/1.1 リクエストデシリアライザー (Sans I/O)
//!
//! ## 特徴
//!
//! - **インクリメンタル**: 任意の位置で分割されたバイト列を受け付ける
//! - **Sans I/O**: ソケットやタイマーを持たず、渡されたバイト列だけをパースする
//! - **ゼロコピー優先**: 持ち越しがない間は受け取ったバイト列を直接パースする
//! - **上限付き**: メソッド、ターゲット、フィールドセクション、ボディの長さを制限する
//!
//! ## 使い方
//!
//! ```rust
//! use http11_deserializer::{Method, RequestDeserializer, Status, Version};
//!
//! let mut deserializer = RequestDeserializer::new();
//!
//! // 受信データを read...
//! deserializer.read(b"POST /echo HTTP/1.1\r\nContent-Length: 5\r\n\r\nhe");
//! assert!(!deserializer.has_next());
//! deserializer.read(b"llo");
//!
//! while deserializer.has_next() {
//!     match deserializer.next() {
//!         Ok(request) => {
//!             assert_eq!(request.method, Method::Post);
//!             assert_eq!(request.version, Version::Http11);
//!             assert_eq!(request.body, b"hello");
//!         }
//!         // status.code() のレスポンスを返して接続を閉じる
//!         Err(status) => panic!("{status}"),
//!     }
//! }
//!
//! deserializer.read(b"BREW /pot HTTP/1.1\r\n\r\n");
//! assert_eq!(deserializer.next(), Err(Status::BadRequest));
//! ```

mod deserializer;
mod fields;
mod limits;
mod method;
mod remainder;
mod request;
mod scan;
mod status;
mod version;

pub use deserializer::RequestDeserializer;
pub use fields::Fields;
pub use limits::DeserializerLimits;
pub use method::Method;
pub use remainder::RemainderBuffer;
pub use request::RequestMessage;
pub use status::Status;
pub use version::Version;

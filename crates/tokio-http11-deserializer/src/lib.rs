//! tokio_http11_deserializer - Tokio integration for http11_deserializer
//!
//! tokio の `AsyncRead` から受信したバイト列を [`RequestDeserializer`] に渡す非同期ドライバー。
//!
//! ## Features
//!
//! - `server` - ステータスのみを返す HTTP サーバー機能 (デフォルト有効)
//! - `full` - すべての機能を有効化
//!
//! ## 特徴
//!
//! - **http11_deserializer ベース**: Sans I/O デシリアライザーに読み取りループだけを足す
//! - **非同期 I/O**: tokio による完全非同期対応
//! - **Keep-Alive**: パイプラインされたリクエストを順番に返す
//!
//! ## リーダー
//!
//! ```ignore
//! use tokio_http11_deserializer::RequestReader;
//!
//! let mut reader = RequestReader::new(stream);
//! while let Some(result) = reader.next_request().await? {
//!     match result {
//!         Ok(request) => println!("{} {}", request.method, request.target),
//!         Err(status) => break, // status.code() を返して閉じる
//!     }
//! }
//! ```

pub mod error;
pub mod reader;
#[cfg(feature = "server")]
pub mod server;

pub use error::{Error, Result};
pub use reader::{ReaderConfig, RequestReader};
#[cfg(feature = "server")]
pub use server::{ConnectionConfig, Handler, Reply, Server, serve_connection};

// http11_deserializer の型を re-export
pub use http11_deserializer::{RequestDeserializer, RequestMessage, Status};

//! HTTP/1.1 リクエストのインクリメンタルパース
//!
//! 状態機械と、それを駆動するファサード ([`RequestDeserializer`]) からなる。
//! 各状態は借用したバイト列だけを受け取り、消費したバイト数を返す。
//! 所有バッファの管理はファサードだけが行う。

mod body;
mod field_section;
mod request;
mod request_line;
mod state;

pub use request::RequestDeserializer;

//! HTTP サーバー
//!
//! [`RequestReader`] で読み出したリクエストをハンドラーに渡し、
//! ステータス行だけのレスポンスを返す。
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_http11_deserializer::{Reply, RequestMessage, Server};
//!
//! async fn handler(request: RequestMessage) -> Reply {
//!     Reply::OK
//! }
//!
//! let server = Server::bind("0.0.0.0:8080").await?;
//! server.serve(handler).await?;
//! ```

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http11_deserializer::{DeserializerLimits, RequestDeserializer, RequestMessage, Status};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpListener;

use crate::error::{Error, Result};
use crate::reader::{ReaderConfig, RequestReader};

/// HTTP リクエストハンドラー
pub trait Handler: Send + Sync + 'static {
    /// リクエストを処理してレスポンスのステータスを返す
    fn handle(&self, request: RequestMessage) -> impl Future<Output = Reply> + Send;
}

/// 関数からハンドラーを作成
impl<F, Fut> Handler for F
where
    F: Fn(RequestMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send,
{
    fn handle(&self, request: RequestMessage) -> impl Future<Output = Reply> + Send {
        (self)(request)
    }
}

/// ボディなしのレスポンス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    /// ステータスコード
    pub code: u16,
    /// 理由フレーズ
    pub reason: &'static str,
}

impl Reply {
    /// 200 OK
    pub const OK: Reply = Reply::new(200, "OK");
    /// 204 No Content
    pub const NO_CONTENT: Reply = Reply::new(204, "No Content");

    /// 新しいレスポンスを作成
    pub const fn new(code: u16, reason: &'static str) -> Self {
        Self { code, reason }
    }

    /// ステータス行とヘッダーをエンコード
    pub fn encode(&self, close: bool) -> Vec<u8> {
        let mut buf = format!("HTTP/1.1 {} {}\r\nContent-Length: 0\r\n", self.code, self.reason);
        if close {
            buf.push_str("Connection: close\r\n");
        }
        buf.push_str("\r\n");
        buf.into_bytes()
    }
}

impl From<Status> for Reply {
    fn from(status: Status) -> Self {
        Reply::new(status.code(), status.reason_phrase())
    }
}

/// HTTP サーバー
pub struct Server {
    listener: TcpListener,
    config: ConnectionConfig,
}

/// 接続ごとの設定
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// デシリアライザーの制限
    pub limits: DeserializerLimits,
    /// chunked のリクエストを受け付けるか
    pub accept_chunked: bool,
    /// Keep-Alive タイムアウト
    pub keep_alive_timeout: Duration,
    /// 1 接続あたりの最大リクエスト数
    pub max_requests_per_connection: u32,
    /// 読み取りバッファサイズ
    pub read_buffer_size: usize,
    /// 書き込みバッファサイズ
    pub write_buffer_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            limits: DeserializerLimits::default(),
            accept_chunked: false,
            keep_alive_timeout: Duration::from_secs(60),
            max_requests_per_connection: 1000,
            read_buffer_size: 8192,
            write_buffer_size: 65536,
        }
    }
}

impl Server {
    /// 指定アドレスにバインド
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            config: ConnectionConfig::default(),
        })
    }

    /// デシリアライザーの制限を設定
    pub fn limits(mut self, limits: DeserializerLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// chunked のリクエストを受け付けるか設定
    pub fn accept_chunked(mut self, accept: bool) -> Self {
        self.config.accept_chunked = accept;
        self
    }

    /// Keep-Alive タイムアウトを設定
    pub fn keep_alive_timeout(mut self, timeout: Duration) -> Self {
        self.config.keep_alive_timeout = timeout;
        self
    }

    /// 1 接続あたりの最大リクエスト数を設定
    pub fn max_requests_per_connection(mut self, max: u32) -> Self {
        self.config.max_requests_per_connection = max;
        self
    }

    /// 読み取りバッファサイズを設定
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    /// 書き込みバッファサイズを設定
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.config.write_buffer_size = size;
        self
    }

    /// ローカルアドレスを取得
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// サーバーを起動
    pub async fn serve<H: Handler>(self, handler: H) -> Result<()> {
        let config = Arc::new(self.config);
        let handler = Arc::new(handler);

        loop {
            let (stream, peer_addr) = self.listener.accept().await?;
            let config = config.clone();
            let handler = handler.clone();

            tokio::spawn(async move {
                tracing::debug!(%peer_addr, "connection accepted");
                if let Err(e) = serve_connection(stream, &config, handler.as_ref()).await {
                    tracing::warn!(%peer_addr, error = %e, "connection error");
                }
            });
        }
    }

    /// 接続を 1 本だけ受け付けて処理する
    pub async fn handle_one<H: Handler>(self, handler: H) -> Result<()> {
        let (stream, _peer_addr) = self.listener.accept().await?;
        serve_connection(stream, &self.config, &handler).await
    }
}

/// 1 本の接続でリクエストを読み、レスポンスを書く
///
/// プロトコル違反を受け取ったら対応するステータスを返して接続を終える。
pub async fn serve_connection<S, H>(stream: S, config: &ConnectionConfig, handler: &H) -> Result<()>
where
    S: AsyncRead + AsyncWrite,
    H: Handler,
{
    let (reader, writer) = tokio::io::split(stream);
    let mut writer = BufWriter::with_capacity(config.write_buffer_size, writer);

    let deserializer = RequestDeserializer::with_limits(config.limits.clone())
        .accept_chunked(config.accept_chunked);
    let reader_config = ReaderConfig {
        read_buffer_size: config.read_buffer_size,
        idle_timeout: Some(config.keep_alive_timeout),
    };
    let mut reader = RequestReader::with_config(reader, deserializer, reader_config);
    let mut request_count = 0u32;

    loop {
        let request = match reader.next_request().await {
            Ok(Some(Ok(request))) => request,
            Ok(Some(Err(status))) => {
                writer.write_all(&Reply::from(status).encode(true)).await?;
                writer.flush().await?;
                return Ok(());
            }
            Ok(None) => return Ok(()),
            Err(Error::Timeout) => return Ok(()), // アイドルタイムアウト
            Err(e) => return Err(e),
        };
        request_count += 1;

        let should_keep_alive =
            request.is_keep_alive() && request_count < config.max_requests_per_connection;

        let reply = handler.handle(request).await;
        writer.write_all(&reply.encode(!should_keep_alive)).await?;
        writer.flush().await?;

        if !should_keep_alive {
            return Ok(());
        }
    }
}

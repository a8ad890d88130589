//! `AsyncRead` からリクエストを読み出すリーダー

use std::time::Duration;

use http11_deserializer::{RequestDeserializer, RequestMessage, Status};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Error, Result};

/// リーダー設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// 1 回の読み取りに使うバッファサイズ (デフォルト: 8192)
    pub read_buffer_size: usize,
    /// 1 回の読み取りで待つ最大時間 (デフォルト: なし)
    pub idle_timeout: Option<Duration>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 8192,
            idle_timeout: None,
        }
    }
}

/// 非同期ストリームからリクエストを 1 つずつ読み出す
///
/// 受信したバイト列をそのまま [`RequestDeserializer`] に渡し、
/// 完成した結果を順番に返す。
///
/// ```ignore
/// let mut reader = RequestReader::new(stream);
/// while let Some(result) = reader.next_request().await? {
///     match result {
///         Ok(request) => { /* ... */ }
///         Err(status) => { /* status.code() を返して閉じる */ }
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    deserializer: RequestDeserializer,
    buf: Vec<u8>,
    idle_timeout: Option<Duration>,
    failed: bool,
}

impl<R: AsyncRead + Unpin> RequestReader<R> {
    /// デフォルト設定でリーダーを作成
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, RequestDeserializer::new(), ReaderConfig::default())
    }

    /// デシリアライザーと設定を指定してリーダーを作成
    pub fn with_config(reader: R, deserializer: RequestDeserializer, config: ReaderConfig) -> Self {
        Self {
            reader,
            deserializer,
            buf: vec![0u8; config.read_buffer_size],
            idle_timeout: config.idle_timeout,
            failed: false,
        }
    }

    /// 内部のデシリアライザーを取得
    pub fn deserializer(&self) -> &RequestDeserializer {
        &self.deserializer
    }

    /// 内部のストリームを取り出す
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// 次のリクエストを読み出す
    ///
    /// - `Ok(Some(Ok(request)))`: リクエストが完成した
    /// - `Ok(Some(Err(status)))`: プロトコル違反。以降は `Ok(None)` を返す
    /// - `Ok(None)`: メッセージの境界で接続が閉じられた
    /// - `Err(Error::ConnectionClosed)`: メッセージの途中で接続が閉じられた
    pub async fn next_request(
        &mut self,
    ) -> Result<Option<std::result::Result<RequestMessage, Status>>> {
        loop {
            if self.failed {
                return Ok(None);
            }

            if self.deserializer.has_next() {
                let result = self.deserializer.next();
                if let Err(status) = result {
                    tracing::debug!(code = status.code(), "stop reading after protocol error");
                    self.failed = true;
                    self.deserializer.close();
                }
                return Ok(Some(result));
            }

            if !self.deserializer.keep_alive() {
                return Ok(None);
            }

            let n = self.read_some().await?;
            if n == 0 {
                self.deserializer.close();
                if self.deserializer.is_idle() {
                    return Ok(None);
                }
                return Err(Error::ConnectionClosed);
            }

            self.deserializer.read(&self.buf[..n]);
        }
    }

    async fn read_some(&mut self) -> Result<usize> {
        let read = self.reader.read(&mut self.buf);
        match self.idle_timeout {
            Some(timeout) => Ok(tokio::time::timeout(timeout, read).await??),
            None => Ok(read.await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http11_deserializer::Method;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn reads_pipelined_requests_then_eof() {
        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"GET /a HTTP/1.1\r\n\r\nPOST /b HTTP/1.1\r\nContent-Length: 2\r\n\r\nok")
            .await
            .unwrap();
        drop(client);

        let mut reader = RequestReader::new(server);
        let first = reader.next_request().await.unwrap().unwrap().unwrap();
        assert_eq!(first.method, Method::Get);
        assert_eq!(first.target, "/a");

        let second = reader.next_request().await.unwrap().unwrap().unwrap();
        assert_eq!(second.method, Method::Post);
        assert_eq!(second.body, b"ok");

        assert!(reader.next_request().await.unwrap().is_none());
        assert!(!reader.deserializer().keep_alive());
    }

    #[tokio::test]
    async fn small_read_buffer() {
        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"GET /fragmented HTTP/1.1\r\nHost: example\r\n\r\n")
            .await
            .unwrap();
        drop(client);

        let config = ReaderConfig {
            read_buffer_size: 3,
            ..Default::default()
        };
        let mut reader = RequestReader::with_config(server, RequestDeserializer::new(), config);
        let request = reader.next_request().await.unwrap().unwrap().unwrap();
        assert_eq!(request.target, "/fragmented");
        assert_eq!(request.field("Host"), Some("example"));
    }

    #[tokio::test]
    async fn into_inner_returns_stream() {
        let (mut client, server) = tokio::io::duplex(1024);
        client.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();

        let mut reader = RequestReader::new(server);
        reader.next_request().await.unwrap().unwrap().unwrap();
        assert!(reader.deserializer().is_idle());

        // 取り出したストリームでそのまま応答できる
        let mut server = reader.into_inner();
        server.write_all(b"done").await.unwrap();
        drop(server);

        let mut output = Vec::new();
        client.read_to_end(&mut output).await.unwrap();
        assert_eq!(output, b"done");
    }

    #[tokio::test]
    async fn eof_inside_message() {
        let (mut client, server) = tokio::io::duplex(1024);
        client.write_all(b"GET / HTTP/1.1\r\nHost: exa").await.unwrap();
        drop(client);

        let mut reader = RequestReader::new(server);
        assert!(matches!(
            reader.next_request().await,
            Err(Error::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn protocol_error_is_returned_once() {
        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"BREW /pot HTTP/1.1\r\n\r\nGET / HTTP/1.1\r\n\r\n")
            .await
            .unwrap();

        let mut reader = RequestReader::new(server);
        assert_eq!(
            reader.next_request().await.unwrap(),
            Some(Err(Status::BadRequest))
        );
        // クライアントはまだ接続中だが読み取りは止まる
        assert_eq!(reader.next_request().await.unwrap(), None);
        drop(client);
    }

    #[tokio::test]
    async fn idle_timeout() {
        let (_client, server) = tokio::io::duplex(1024);
        let config = ReaderConfig {
            idle_timeout: Some(Duration::from_millis(10)),
            ..Default::default()
        };
        let mut reader = RequestReader::with_config(server, RequestDeserializer::new(), config);
        assert!(matches!(reader.next_request().await, Err(Error::Timeout)));
    }
}

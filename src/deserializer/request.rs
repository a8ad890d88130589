//! HTTP リクエストデシリアライザー

use crate::limits::DeserializerLimits;
use crate::remainder::RemainderBuffer;
use crate::request::RequestMessage;
use crate::status::Status;

use super::state::{ParseState, Settings};

/// HTTP リクエストデシリアライザー (Sans I/O)
///
/// 接続ごとに 1 つ作成し、受信したバイト列を [`read`](Self::read) で渡す。
/// リクエストが完成すると [`has_next`](Self::has_next) が `true` になり、
/// [`next`](Self::next) で取り出せる。
///
/// 1 回の `read` で複数のリクエストが届いた場合 (パイプライン)、
/// 後続のリクエストは `next` のたびに順番にパースされる。
///
/// ```rust
/// use http11_deserializer::{Method, RequestDeserializer};
///
/// let mut deserializer = RequestDeserializer::new();
/// deserializer.read(b"GET / HTTP/1.1\r\nHo");
/// assert!(!deserializer.has_next());
/// deserializer.read(b"st: example\r\n\r\n");
/// assert!(deserializer.has_next());
///
/// let request = deserializer.next().unwrap();
/// assert_eq!(request.method, Method::Get);
/// assert_eq!(request.field("Host"), Some("example"));
/// ```
#[derive(Debug)]
pub struct RequestDeserializer {
    state: ParseState,
    remainder: RemainderBuffer,
    settings: Settings,
    keep_alive: bool,
}

impl Default for RequestDeserializer {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDeserializer {
    /// デフォルトの制限でデシリアライザーを作成
    pub fn new() -> Self {
        Self::with_limits(DeserializerLimits::default())
    }

    /// 制限を指定してデシリアライザーを作成
    pub fn with_limits(limits: DeserializerLimits) -> Self {
        Self {
            state: ParseState::Empty,
            remainder: RemainderBuffer::new(),
            settings: Settings {
                limits,
                accept_chunked: false,
            },
            keep_alive: true,
        }
    }

    /// chunked 転送エンコーディングのボディを受け付けるか設定 (デフォルト: `false`)
    ///
    /// 受け付けない場合、chunked のリクエストは 400 Bad Request になる。
    pub fn accept_chunked(mut self, accept: bool) -> Self {
        self.settings.accept_chunked = accept;
        self
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &DeserializerLimits {
        &self.settings.limits
    }

    /// 受信したバイト列を渡してパースを進める
    ///
    /// 持ち越しがなければ `chunk` を直接パースし、トークンの途中で止まった
    /// 時点で残りを持ち越しバッファへ移す。持ち越しがあれば追加してから
    /// バッファに対してパースする。
    ///
    /// データ不足はエラーではない。プロトコル違反は [`next`](Self::next) で返される。
    pub fn read(&mut self, chunk: &[u8]) {
        if !self.remainder.is_empty() {
            self.remainder.merge(chunk);
            self.drive();
            return;
        }

        // 持ち越しがないのでコピーせずに直接パースする
        let mut rest = chunk;
        loop {
            let (consumed, can_continue) = transition(&mut self.state, &self.settings, rest);
            rest = &rest[consumed..];
            if !can_continue {
                break;
            }
        }

        // 直前の遷移はこのバイト列で止まっているので再実行しない
        if !rest.is_empty() {
            tracing::trace!(
                state = self.state.name(),
                len = rest.len(),
                "buffering unconsumed bytes"
            );
            self.remainder.merge(rest);
        }
    }

    /// 取り出せる結果 (リクエストまたはエラー) があるか
    pub fn has_next(&self) -> bool {
        self.state.is_complete()
    }

    /// 完成したリクエスト、またはプロトコル違反のステータスを取り出す
    ///
    /// 取り出した後は最初の状態に戻り、持ち越しバッファに残っている
    /// バイト列 (パイプラインされた次のリクエスト) のパースを続ける。
    /// エラーを取り出した場合は持ち越しバッファも破棄する。
    ///
    /// # Panics
    ///
    /// デバッグビルドでは [`has_next`](Self::has_next) が `false` のときに呼ぶとパニックする。
    /// リリースビルドでは状態を変えずに `Err(Status::InternalServerError)` を返す。
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<RequestMessage, Status> {
        debug_assert!(self.has_next(), "next() called without a completed request");

        let result = match std::mem::replace(&mut self.state, ParseState::Empty) {
            ParseState::Complete(result) => result,
            state => {
                self.state = state;
                return Err(Status::InternalServerError);
            }
        };

        match result {
            // メッセージの境界が失われているので残りは捨てる
            Err(_) => self.remainder.clear(),
            Ok(_) if !self.remainder.is_empty() => self.drive(),
            Ok(_) => {}
        }
        result
    }

    /// 接続を維持するか
    ///
    /// [`close`](Self::close) が呼ばれるまで `true`。パーサー自身はこの値を参照しない。
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    /// 接続を閉じる印を付ける
    pub fn close(&mut self) {
        self.keep_alive = false;
    }

    /// 持ち越しバッファの未消費バイト数
    pub fn buffered(&self) -> usize {
        self.remainder.len()
    }

    /// メッセージの境界にいるか (パース途中のデータも未取得の結果もない)
    pub fn is_idle(&self) -> bool {
        matches!(self.state, ParseState::Empty) && self.remainder.is_empty()
    }

    /// パース状態と持ち越しバッファを破棄する
    ///
    /// 制限設定と keep-alive の印は維持される。
    pub fn reset(&mut self) {
        self.state = ParseState::Empty;
        self.remainder.clear();
    }

    /// 持ち越しバッファに対して止まるまで遷移を繰り返す
    fn drive(&mut self) {
        loop {
            let (consumed, can_continue) =
                transition(&mut self.state, &self.settings, self.remainder.view());
            self.remainder.add_offset(consumed);
            if !can_continue {
                break;
            }
        }
    }
}

/// 1 回遷移して (消費バイト数, 続行可否) を返す
fn transition(state: &mut ParseState, settings: &Settings, input: &[u8]) -> (usize, bool) {
    let current = std::mem::replace(state, ParseState::Empty);
    let was_complete = current.is_complete();
    let step = current.process(input, settings);
    debug_assert!(step.consumed <= input.len());
    if !was_complete && step.state.is_complete() {
        tracing::trace!(consumed = step.consumed, "request complete");
    }
    *state = step.state;
    (step.consumed, step.can_continue)
}

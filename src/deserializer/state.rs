//! パース状態の定義
//!
//! 各状態はそれまでに確定したフィールドだけを所有し、前方にのみ遷移する。
//!
//! ```text
//! Empty -> Method -> Target -> Version -> Fields -+-> Body ----------------------------+-> Complete
//!                                                  +-> ChunkedBody -> TrailingFields ---+
//! ```

use crate::fields::Fields;
use crate::limits::DeserializerLimits;
use crate::method::Method;
use crate::request::RequestMessage;
use crate::status::Status;
use crate::version::Version;

/// 遷移が参照する設定
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub limits: DeserializerLimits,
    pub accept_chunked: bool,
}

/// パース状態
#[derive(Debug)]
pub(crate) enum ParseState {
    /// メソッド待ち
    Empty,
    /// リクエストターゲット待ち
    Method(MethodState),
    /// HTTP バージョン待ち
    Target(TargetState),
    /// フィールドセクションへの昇格待ち
    Version(VersionState),
    /// フィールド行待ち
    Fields(FieldsState),
    /// ボディ読み取り中 (Content-Length)
    Body(BodyState),
    /// ボディ読み取り中 (chunked)
    ChunkedBody(ChunkedBodyState),
    /// トレーラーフィールド行待ち
    TrailingFields(TrailingFieldsState),
    /// 完了 (取り出されるまで終端)
    Complete(Result<RequestMessage, Status>),
}

#[derive(Debug)]
pub(crate) struct MethodState {
    pub method: Method,
}

#[derive(Debug)]
pub(crate) struct TargetState {
    pub method: Method,
    pub target: String,
}

#[derive(Debug)]
pub(crate) struct VersionState {
    pub line: RequestLine,
}

/// 確定したリクエストライン
#[derive(Debug)]
pub(crate) struct RequestLine {
    pub method: Method,
    pub target: String,
    pub version: Version,
}

#[derive(Debug)]
pub(crate) struct FieldsState {
    pub line: RequestLine,
    pub fields: Fields,
    /// これまでに消費したフィールド行の累計バイト数 (CRLF を含む)
    pub fields_size: usize,
}

#[derive(Debug)]
pub(crate) struct BodyState {
    pub line: RequestLine,
    pub fields: Fields,
    pub body: Vec<u8>,
    pub content_length: usize,
}

#[derive(Debug)]
pub(crate) struct ChunkedBodyState {
    pub line: RequestLine,
    pub fields: Fields,
    pub fields_size: usize,
    pub body: Vec<u8>,
    pub phase: ChunkPhase,
}

/// chunked ボディ内の位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ChunkPhase {
    /// チャンクサイズ行待ち
    Size,
    /// チャンクデータ待ち
    Data { remaining: usize },
    /// チャンクデータ後の CRLF 待ち
    DataCrlf,
}

#[derive(Debug)]
pub(crate) struct TrailingFieldsState {
    pub line: RequestLine,
    pub fields: Fields,
    pub body: Vec<u8>,
    pub trailers: Fields,
    /// トレーラーに使えるバイト数 (フィールドセクションの残り)
    pub budget: usize,
    pub trailers_size: usize,
}

/// 1 回の遷移の結果
#[derive(Debug)]
pub(crate) struct Step {
    pub state: ParseState,
    /// 入力の先頭から消費したバイト数
    pub consumed: usize,
    /// 追加の入力なしで遷移を続けられるか
    ///
    /// `false` は「トークン途中でデータが尽きた」か「完了した」のどちらか。
    /// 区別は `state` が `Complete` かどうかで行う。
    pub can_continue: bool,
}

impl Step {
    /// `consumed` バイト消費して `state` に進む
    pub fn advance(state: ParseState, consumed: usize) -> Self {
        let can_continue = !state.is_complete();
        Self {
            state,
            consumed,
            can_continue,
        }
    }

    /// データ不足のため状態を変えずに止まる
    pub fn wait(state: ParseState) -> Self {
        Self {
            state,
            consumed: 0,
            can_continue: false,
        }
    }

    /// プロトコル違反で完了する
    pub fn fail(status: Status, reason: &'static str) -> Self {
        Self {
            state: ParseState::fail(status, reason),
            consumed: 0,
            can_continue: false,
        }
    }
}

impl ParseState {
    /// 入力の先頭を消費して次の状態へ遷移する
    pub fn process(self, input: &[u8], settings: &Settings) -> Step {
        match self {
            ParseState::Empty => super::request_line::process_empty(input),
            ParseState::Method(state) => state.process(input, &settings.limits),
            ParseState::Target(state) => state.process(input),
            ParseState::Version(state) => state.process(),
            ParseState::Fields(state) => state.process(input, settings),
            ParseState::Body(state) => state.process(input),
            ParseState::ChunkedBody(state) => state.process(input, settings),
            ParseState::TrailingFields(state) => state.process(input),
            ParseState::Complete(result) => Step::wait(ParseState::Complete(result)),
        }
    }

    /// エラー結果を持つ完了状態
    pub fn fail(status: Status, reason: &'static str) -> Self {
        tracing::debug!(status = status.code(), reason, "rejecting request");
        ParseState::Complete(Err(status))
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ParseState::Complete(_))
    }

    /// トレース用の状態名
    pub fn name(&self) -> &'static str {
        match self {
            ParseState::Empty => "empty",
            ParseState::Method(_) => "method",
            ParseState::Target(_) => "target",
            ParseState::Version(_) => "version",
            ParseState::Fields(_) => "fields",
            ParseState::Body(_) => "body",
            ParseState::ChunkedBody(_) => "chunked_body",
            ParseState::TrailingFields(_) => "trailing_fields",
            ParseState::Complete(_) => "complete",
        }
    }
}

impl RequestLine {
    /// フィールドとボディを合わせて完成したリクエストにする
    pub fn into_message(self, fields: Fields, body: Vec<u8>, trailers: Fields) -> RequestMessage {
        RequestMessage {
            method: self.method,
            target: self.target,
            version: self.version,
            fields,
            body,
            trailers,
        }
    }
}

//! パースエラーのステータス分類 (RFC 9110 Section 15)

use std::fmt;

/// パースエラーを表す HTTP ステータス
///
/// 転送用ではなく、不正な入力をどのレスポンスで拒否すべきかを表す分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 400 Bad Request
    BadRequest,
    /// 413 Content Too Large
    ///
    /// フィールドセクションまたはボディが制限を超えた
    ContentTooLarge,
    /// 414 URI Too Long
    UriTooLong,
    /// 500 Internal Server Error
    ///
    /// 呼び出し規約違反のみ。クライアントの入力では発生しない。
    InternalServerError,
    /// 501 Not Implemented
    ///
    /// 既知のどのメソッドよりも長いメソッドトークン
    NotImplemented,
}

impl Status {
    /// ステータスコード
    pub const fn code(self) -> u16 {
        match self {
            Status::BadRequest => 400,
            Status::ContentTooLarge => 413,
            Status::UriTooLong => 414,
            Status::InternalServerError => 500,
            Status::NotImplemented => 501,
        }
    }

    /// 理由フレーズ
    pub const fn reason_phrase(self) -> &'static str {
        match self {
            Status::BadRequest => "Bad Request",
            Status::ContentTooLarge => "Content Too Large",
            Status::UriTooLong => "URI Too Long",
            Status::InternalServerError => "Internal Server Error",
            Status::NotImplemented => "Not Implemented",
        }
    }

    /// クライアントエラー (4xx) か確認
    pub const fn is_client_error(self) -> bool {
        matches!(self.code(), 400..=499)
    }

    /// サーバーエラー (5xx) か確認
    pub const fn is_server_error(self) -> bool {
        matches!(self.code(), 500..=599)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason_phrase())
    }
}

impl std::error::Error for Status {}

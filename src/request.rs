use crate::fields::Fields;
use crate::method::Method;
use crate::version::Version;

/// パース済みの HTTP リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMessage {
    /// HTTP メソッド
    pub method: Method,
    /// リクエストターゲット (検証せずそのまま保持する)
    pub target: String,
    /// HTTP バージョン
    pub version: Version,
    /// フィールド
    pub fields: Fields,
    /// ボディ
    pub body: Vec<u8>,
    /// トレーラーフィールド (chunked の場合のみ)
    pub trailers: Fields,
}

impl RequestMessage {
    /// 新しいリクエストを作成 (フィールドとボディは空)
    pub fn new(method: Method, target: &str, version: Version) -> Self {
        Self {
            method,
            target: target.to_string(),
            version,
            fields: Fields::new(),
            body: Vec::new(),
            trailers: Fields::new(),
        }
    }

    /// フィールドを設定 (ビルダーパターン)
    pub fn fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// ボディを設定 (ビルダーパターン)
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// フィールド値を取得 (大文字小文字を区別する)
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)
    }

    /// フィールドが存在するか確認
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(name)
    }

    /// Content-Length フィールドの値を取得
    pub fn content_length(&self) -> Option<usize> {
        self.field("Content-Length").and_then(|v| v.parse().ok())
    }

    /// キープアライブ接続かどうかを判定
    ///
    /// HTTP/1.1 ではデフォルトでキープアライブ、HTTP/1.0 では `keep-alive` トークンが必要。
    /// Connection はカンマ区切りのトークンリストとして扱い、`close` を優先する (RFC 9110)
    pub fn is_keep_alive(&self) -> bool {
        let mut has_keep_alive = false;
        if let Some(connection) = self.field("Connection") {
            for token in connection.split(',') {
                let token = token.trim();
                if token.eq_ignore_ascii_case("close") {
                    return false;
                }
                if token.eq_ignore_ascii_case("keep-alive") {
                    has_keep_alive = true;
                }
            }
        }
        has_keep_alive || self.version == Version::Http11
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_connection(version: Version, value: &str) -> RequestMessage {
        RequestMessage::new(Method::Get, "/", version)
            .fields([("Connection", value)].into_iter().collect())
    }

    #[test]
    fn keep_alive_defaults() {
        assert!(RequestMessage::new(Method::Get, "/", Version::Http11).is_keep_alive());
        assert!(!RequestMessage::new(Method::Get, "/", Version::Http10).is_keep_alive());
    }

    #[test]
    fn keep_alive_tokens() {
        assert!(!with_connection(Version::Http11, "close").is_keep_alive());
        assert!(!with_connection(Version::Http11, "keep-alive, close").is_keep_alive());
        assert!(with_connection(Version::Http10, "Keep-Alive").is_keep_alive());
        assert!(with_connection(Version::Http11, "upgrade").is_keep_alive());
    }

    #[test]
    fn content_length() {
        let request = RequestMessage::new(Method::Post, "/", Version::Http11)
            .fields([("Content-Length", "5")].into_iter().collect());
        assert_eq!(request.content_length(), Some(5));
        assert!(request.has_field("Content-Length"));
        assert!(!request.has_field("content-length"));
    }
}

/// デシリアライザーの制限設定
///
/// メソッドと HTTP バージョンの長さ制限は既知のリテラルから
/// コンパイル時に決まるため、ここには含まれない
/// ([`Method::MAX_LEN`](crate::Method::MAX_LEN), [`Version::MAX_LEN`](crate::Version::MAX_LEN))。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeserializerLimits {
    /// 最大リクエストターゲット長 (デフォルト: 8000 バイト)
    ///
    /// RFC 9112 Section 3 の推奨値。超過すると 414 URI Too Long。
    pub max_target_size: usize,
    /// フィールドセクション全体の最大サイズ (デフォルト: 80KB)
    ///
    /// 行ごとではなく累計で数える (各行の CRLF を含む)。超過すると 413 Content Too Large。
    pub max_fields_size: usize,
    /// 最大ボディサイズ (デフォルト: 10MB)
    pub max_body_size: usize,
    /// 最大チャンクサイズ行長 (デフォルト: 64 バイト)
    ///
    /// chunked 転送エンコーディングを受け付ける場合のみ使用する。
    pub max_chunk_line_size: usize,
}

impl Default for DeserializerLimits {
    fn default() -> Self {
        Self {
            max_target_size: 8000,
            max_fields_size: 80 * 1024,      // 80KB
            max_body_size: 10 * 1024 * 1024, // 10MB
            max_chunk_line_size: 64,
        }
    }
}

impl DeserializerLimits {
    /// 制限なしの設定を作成
    pub fn unlimited() -> Self {
        Self {
            max_target_size: usize::MAX,
            max_fields_size: usize::MAX,
            max_body_size: usize::MAX,
            max_chunk_line_size: usize::MAX,
        }
    }
}

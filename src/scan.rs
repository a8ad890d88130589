//! 区切り文字によるトークン走査
//!
//! すべての走査は借用したバイト列に対して行い、コピーは呼び出し側が
//! 所有データへ変換するときだけ発生する。

/// SP
pub(crate) const SP: &[u8] = b" ";
/// CRLF
pub(crate) const CRLF: &[u8] = b"\r\n";

/// 走査結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scan<'a> {
    /// 区切り文字が見つかった
    ///
    /// `value` は区切り文字より前のバイト列、`offset` は区切り文字の直後の位置
    Found { value: &'a [u8], offset: usize },
    /// 走査範囲に区切り文字がない (データ不足)
    NotFound,
    /// `max_size` バイトを超えても区切り文字がない (プロトコル違反)
    MaxSizeExceeded,
}

/// `window` の先頭 `max_size + delimiter.len()` バイトから `delimiter` を探す
///
/// 区切り文字が見つからず、かつ走査範囲が `max_size` で打ち切られていれば
/// `MaxSizeExceeded`、そうでなければ `NotFound` を返す。
pub(crate) fn scan<'a>(window: &'a [u8], delimiter: &[u8], max_size: usize) -> Scan<'a> {
    let limit = max_size.saturating_add(delimiter.len());
    let searched = &window[..window.len().min(limit)];

    match find(searched, delimiter) {
        Some(pos) => Scan::Found {
            value: &window[..pos],
            offset: pos + delimiter.len(),
        },
        None if limit <= window.len() => Scan::MaxSizeExceeded,
        None => Scan::NotFound,
    }
}

/// 最初に出現する `needle` の位置
pub(crate) fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// リスト値を先頭要素と残りに分割
///
/// 区切り文字がなければ `(input, [])`、空入力なら `None`。
/// 「要素なし」と「空要素 1 つ」を区別するため、空入力だけが `None` になる。
pub(crate) fn split<'a>(input: &'a [u8], delimiter: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
    if input.is_empty() {
        return None;
    }
    match find(input, delimiter) {
        Some(pos) => Some((&input[..pos], &input[pos + delimiter.len()..])),
        None => Some((input, &[])),
    }
}

/// 前後の OWS (SP / HTAB) を取り除く
pub(crate) fn strip_ows(mut value: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = value {
        value = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = value {
        value = rest;
    }
    value
}

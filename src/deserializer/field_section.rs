//! フィールドセクションの遷移
//!
//! ```text
//! *( field-line CRLF ) CRLF
//! field-line = field-name ":" OWS field-value OWS
//! ```

use crate::fields::Fields;
use crate::scan::{CRLF, Scan, find, scan, split, strip_ows};
use crate::status::Status;

use super::state::{
    BodyState, ChunkPhase, ChunkedBodyState, FieldsState, ParseState, Settings, Step,
};

const TRANSFER_ENCODING: &str = "Transfer-Encoding";
const CONTENT_LENGTH: &str = "Content-Length";

/// ボディの初期確保量の上限
const INITIAL_BODY_CAPACITY: usize = 8 * 1024;

/// フィールド行 1 行分の走査結果
///
/// ヘッダーのフィールドセクションと chunked のトレーラーで共用する。
pub(super) enum FieldLine {
    /// 行がまだ揃っていない
    Pending,
    /// 残り予算内に CRLF がない
    TooLarge,
    /// セクション終端の空行
    End { offset: usize },
    /// フィールド行
    Field {
        name: String,
        value: String,
        offset: usize,
    },
    /// 構文エラー
    Invalid(&'static str),
}

/// 入力の先頭からフィールド行を 1 行読む
///
/// `FieldsState` と `TrailingFieldsState` の両方から呼ばれるため、
/// 重複チェックや予算の更新は呼び出し側で行う。
///
/// `budget` はフィールドセクションに残っているバイト数 (CRLF を含む)。
/// 終端の空行は予算に含めない。
pub(super) fn next_field_line(input: &[u8], budget: usize) -> FieldLine {
    match scan(input, CRLF, budget.saturating_sub(CRLF.len())) {
        Scan::NotFound => FieldLine::Pending,
        Scan::MaxSizeExceeded => FieldLine::TooLarge,
        Scan::Found { value, offset } if value.is_empty() => FieldLine::End { offset },
        Scan::Found { value, offset } => match parse_field_line(value) {
            Ok((name, value)) => FieldLine::Field {
                name,
                value,
                offset,
            },
            Err(reason) => FieldLine::Invalid(reason),
        },
    }
}

/// フィールド行をパース
///
/// 最初の `:` で名前と値に分け、値の前後の OWS だけを取り除く。
fn parse_field_line(line: &[u8]) -> Result<(String, String), &'static str> {
    let colon = find(line, b":").ok_or("field line without colon")?;
    let (name, value) = (&line[..colon], strip_ows(&line[colon + 1..]));

    // field-name = token (RFC 9110 Section 5.1)
    // 前後の空白も token 以外の文字として拒否される (RFC 9112 Section 5.1)
    if name.is_empty() {
        return Err("empty field name");
    }
    if !name.iter().copied().all(is_token_char) {
        return Err("invalid field name");
    }
    if !value.iter().copied().all(is_field_vchar) {
        return Err("invalid field value");
    }

    let name = std::str::from_utf8(name).map_err(|_| "field name is not UTF-8")?;
    let value = std::str::from_utf8(value).map_err(|_| "field value is not UTF-8")?;
    Ok((name.to_string(), value.to_string()))
}

/// トークン文字か確認
fn is_token_char(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' |
        b'0'..=b'9' | b'A'..=b'Z' | b'^' | b'_' | b'`' | b'a'..=b'z' | b'|' | b'~'
    )
}

/// フィールド値に許可される文字か確認 (RFC 9110 Section 5.5)
///
/// VCHAR / obs-text / SP / HTAB
fn is_field_vchar(b: u8) -> bool {
    matches!(b, 0x09 | 0x20..=0x7E | 0x80..=0xFF)
}

/// Transfer-Encoding のリストに `chunked` が含まれるか (大文字小文字を区別する)
fn has_chunked(mut transfer_encodings: &[u8]) -> bool {
    while let Some((coding, rest)) = split(transfer_encodings, b",") {
        if strip_ows(coding) == b"chunked" {
            return true;
        }
        transfer_encodings = rest;
    }
    false
}

/// Content-Length をパース
///
/// 10 進数字のみからなる値だけを受け付ける。符号や空白、桁あふれは `None`。
fn parse_content_length(value: &str) -> Option<usize> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

impl FieldsState {
    pub(super) fn process(mut self, input: &[u8], settings: &Settings) -> Step {
        let budget = settings
            .limits
            .max_fields_size
            .saturating_sub(self.fields_size);

        match next_field_line(input, budget) {
            FieldLine::Pending => Step::wait(ParseState::Fields(self)),
            FieldLine::TooLarge => {
                Step::fail(Status::ContentTooLarge, "field section too large")
            }
            FieldLine::Invalid(reason) => Step::fail(Status::BadRequest, reason),
            FieldLine::End { offset } => Step::advance(self.finalize(settings), offset),
            FieldLine::Field {
                name,
                value,
                offset,
            } => {
                if !self.fields.insert_unique(name, value) {
                    return Step::fail(Status::BadRequest, "duplicate field name");
                }
                self.fields_size += offset;
                Step::advance(ParseState::Fields(self), offset)
            }
        }
    }

    /// フィールドセクション終端でボディの形式を決める
    fn finalize(self, settings: &Settings) -> ParseState {
        let transfer_encoding = self.fields.get(TRANSFER_ENCODING);
        let chunked = transfer_encoding.is_some_and(|v| has_chunked(v.as_bytes()));
        let content_length = self.fields.get(CONTENT_LENGTH);

        if chunked {
            // RFC 9112 Section 6.3: 両方あるメッセージは推測せずに拒否する
            if content_length.is_some() {
                return ParseState::fail(
                    Status::BadRequest,
                    "both Transfer-Encoding chunked and Content-Length",
                );
            }
            return ParseState::ChunkedBody(ChunkedBodyState {
                line: self.line,
                fields: self.fields,
                fields_size: self.fields_size,
                body: Vec::new(),
                phase: ChunkPhase::Size,
            });
        }

        // RFC 9112 Section 6.3: どちらもないリクエストのボディ長は 0
        let content_length = match content_length {
            // chunked 以外の転送エンコーディングでは長さが決まらない
            None if transfer_encoding.is_some() => {
                return ParseState::fail(
                    Status::BadRequest,
                    "Transfer-Encoding without chunked or Content-Length",
                );
            }
            None => 0,
            Some(value) => match parse_content_length(value) {
                Some(len) => len,
                None => return ParseState::fail(Status::BadRequest, "invalid Content-Length"),
            },
        };

        if content_length > settings.limits.max_body_size {
            return ParseState::fail(Status::ContentTooLarge, "Content-Length too large");
        }
        if content_length == 0 {
            return ParseState::Complete(Ok(self.line.into_message(
                self.fields,
                Vec::new(),
                Fields::new(),
            )));
        }

        ParseState::Body(BodyState {
            line: self.line,
            fields: self.fields,
            body: Vec::with_capacity(content_length.min(INITIAL_BODY_CAPACITY)),
            content_length,
        })
    }
}

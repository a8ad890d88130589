//! ボディとトレーラーの遷移
//!
//! ```text
//! chunked-body = *chunk last-chunk trailer-section CRLF
//! chunk        = chunk-size [ chunk-ext ] CRLF chunk-data CRLF
//! last-chunk   = 1*("0") [ chunk-ext ] CRLF
//! ```

use crate::scan::{CRLF, Scan, scan, split, strip_ows};
use crate::status::Status;

use super::field_section::{FieldLine, next_field_line};
use super::state::{
    BodyState, ChunkPhase, ChunkedBodyState, ParseState, Settings, Step, TrailingFieldsState,
};

impl BodyState {
    /// Content-Length 分のボディを、届いた分だけ取り込む
    pub(super) fn process(mut self, input: &[u8]) -> Step {
        if input.is_empty() {
            return Step::wait(ParseState::Body(self));
        }

        let needed = self.content_length - self.body.len();
        let take = needed.min(input.len());
        self.body.extend_from_slice(&input[..take]);

        if self.body.len() < self.content_length {
            return Step::advance(ParseState::Body(self), take);
        }

        tracing::trace!(body_len = self.body.len(), "request body complete");
        let message = self
            .line
            .into_message(self.fields, self.body, Default::default());
        Step::advance(ParseState::Complete(Ok(message)), take)
    }
}

/// chunk-size [ chunk-ext ] をパース
///
/// chunk-ext は読み飛ばす。
fn parse_chunk_size(line: &[u8]) -> Option<usize> {
    let (size, _ext) = split(line, b";")?;
    let size = strip_ows(size);
    if size.is_empty() || !size.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let size = std::str::from_utf8(size).ok()?;
    usize::from_str_radix(size, 16).ok()
}

impl ChunkedBodyState {
    pub(super) fn process(mut self, input: &[u8], settings: &Settings) -> Step {
        if !settings.accept_chunked {
            return Step::fail(Status::BadRequest, "chunked transfer coding not accepted");
        }

        match self.phase {
            ChunkPhase::Size => {
                let (size_line, offset) =
                    match scan(input, CRLF, settings.limits.max_chunk_line_size) {
                        Scan::NotFound => return Step::wait(ParseState::ChunkedBody(self)),
                        Scan::MaxSizeExceeded => {
                            return Step::fail(Status::BadRequest, "chunk size line too long");
                        }
                        Scan::Found { value, offset } => (value, offset),
                    };
                let Some(size) = parse_chunk_size(size_line) else {
                    return Step::fail(Status::BadRequest, "invalid chunk size");
                };

                if size == 0 {
                    let budget = settings
                        .limits
                        .max_fields_size
                        .saturating_sub(self.fields_size);
                    let state = TrailingFieldsState {
                        line: self.line,
                        fields: self.fields,
                        body: self.body,
                        trailers: Default::default(),
                        budget,
                        trailers_size: 0,
                    };
                    return Step::advance(ParseState::TrailingFields(state), offset);
                }

                match self.body.len().checked_add(size) {
                    Some(total) if total <= settings.limits.max_body_size => {}
                    _ => return Step::fail(Status::ContentTooLarge, "chunked body too large"),
                }

                self.phase = ChunkPhase::Data { remaining: size };
                Step::advance(ParseState::ChunkedBody(self), offset)
            }
            ChunkPhase::Data { remaining } => {
                if input.is_empty() {
                    return Step::wait(ParseState::ChunkedBody(self));
                }
                let take = remaining.min(input.len());
                self.body.extend_from_slice(&input[..take]);
                self.phase = if take == remaining {
                    ChunkPhase::DataCrlf
                } else {
                    ChunkPhase::Data {
                        remaining: remaining - take,
                    }
                };
                Step::advance(ParseState::ChunkedBody(self), take)
            }
            ChunkPhase::DataCrlf => {
                if input.len() < CRLF.len() {
                    return Step::wait(ParseState::ChunkedBody(self));
                }
                if !input.starts_with(CRLF) {
                    return Step::fail(Status::BadRequest, "missing CRLF after chunk data");
                }
                self.phase = ChunkPhase::Size;
                Step::advance(ParseState::ChunkedBody(self), CRLF.len())
            }
        }
    }
}

impl TrailingFieldsState {
    /// trailer-section CRLF
    pub(super) fn process(mut self, input: &[u8]) -> Step {
        let budget = self.budget.saturating_sub(self.trailers_size);

        match next_field_line(input, budget) {
            FieldLine::Pending => Step::wait(ParseState::TrailingFields(self)),
            FieldLine::TooLarge => Step::fail(Status::ContentTooLarge, "trailer section too large"),
            FieldLine::Invalid(reason) => Step::fail(Status::BadRequest, reason),
            FieldLine::End { offset } => {
                tracing::trace!(
                    body_len = self.body.len(),
                    trailers = self.trailers.len(),
                    "chunked request body complete"
                );
                let message = self.line.into_message(self.fields, self.body, self.trailers);
                Step::advance(ParseState::Complete(Ok(message)), offset)
            }
            FieldLine::Field {
                name,
                value,
                offset,
            } => {
                if !self.trailers.insert_unique(name, value) {
                    return Step::fail(Status::BadRequest, "duplicate trailer field name");
                }
                self.trailers_size += offset;
                Step::advance(ParseState::TrailingFields(self), offset)
            }
        }
    }
}

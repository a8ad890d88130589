//! リクエストラインの遷移
//!
//! request-line = method SP request-target SP HTTP-version CRLF

use crate::fields::Fields;
use crate::limits::DeserializerLimits;
use crate::method::Method;
use crate::scan::{CRLF, SP, Scan, scan};
use crate::status::Status;
use crate::version::Version;

use super::state::{
    FieldsState, MethodState, ParseState, RequestLine, Step, TargetState, VersionState,
};

/// method SP
pub(super) fn process_empty(input: &[u8]) -> Step {
    match scan(input, SP, Method::MAX_LEN) {
        Scan::NotFound => Step::wait(ParseState::Empty),
        // 既知のどのメソッドよりも長い
        Scan::MaxSizeExceeded => Step::fail(Status::NotImplemented, "method token too long"),
        Scan::Found { value, offset } => match Method::from_bytes(value) {
            Some(method) => Step::advance(ParseState::Method(MethodState { method }), offset),
            None => Step::fail(Status::BadRequest, "unrecognized method"),
        },
    }
}

impl MethodState {
    /// request-target SP
    pub(super) fn process(self, input: &[u8], limits: &DeserializerLimits) -> Step {
        match scan(input, SP, limits.max_target_size) {
            Scan::NotFound => Step::wait(ParseState::Method(self)),
            Scan::MaxSizeExceeded => Step::fail(Status::UriTooLong, "request-target too long"),
            Scan::Found { value, offset } => {
                // ターゲットの構文は検証しない
                let Ok(target) = std::str::from_utf8(value) else {
                    return Step::fail(Status::BadRequest, "request-target is not UTF-8");
                };
                let state = TargetState {
                    method: self.method,
                    target: target.to_string(),
                };
                Step::advance(ParseState::Target(state), offset)
            }
        }
    }
}

impl TargetState {
    /// HTTP-version CRLF
    pub(super) fn process(self, input: &[u8]) -> Step {
        match scan(input, CRLF, Version::MAX_LEN) {
            Scan::NotFound => Step::wait(ParseState::Target(self)),
            Scan::MaxSizeExceeded => Step::fail(Status::BadRequest, "HTTP-version too long"),
            Scan::Found { value, offset } => match Version::from_bytes(value) {
                Some(version) => {
                    let line = RequestLine {
                        method: self.method,
                        target: self.target,
                        version,
                    };
                    Step::advance(ParseState::Version(VersionState { line }), offset)
                }
                None => Step::fail(Status::BadRequest, "unrecognized HTTP-version"),
            },
        }
    }
}

impl VersionState {
    /// 入力を読まずにフィールドセクションへ昇格する
    pub(super) fn process(self) -> Step {
        let state = FieldsState {
            line: self.line,
            fields: Fields::new(),
            fields_size: 0,
        };
        Step::advance(ParseState::Fields(state), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_to_method() {
        let step = process_empty(b"GET / HTTP/1.1\r\n");
        assert!(step.can_continue);
        assert_eq!(step.consumed, 4);
        assert!(matches!(
            step.state,
            ParseState::Method(MethodState {
                method: Method::Get
            })
        ));
    }

    #[test]
    fn empty_waits_for_space() {
        let step = process_empty(b"DELE");
        assert!(!step.can_continue);
        assert_eq!(step.consumed, 0);
        assert!(matches!(step.state, ParseState::Empty));
    }

    #[test]
    fn long_method_not_implemented() {
        let step = process_empty(&[b'X'; 600]);
        assert!(!step.can_continue);
        assert!(matches!(
            step.state,
            ParseState::Complete(Err(Status::NotImplemented))
        ));
    }

    #[test]
    fn unknown_method_bad_request() {
        let step = process_empty(b"PATCH / HTTP/1.1\r\n");
        assert!(matches!(
            step.state,
            ParseState::Complete(Err(Status::BadRequest))
        ));
    }

    #[test]
    fn target_limit() {
        let limits = DeserializerLimits::default();
        let state = MethodState {
            method: Method::Get,
        };
        let mut input = vec![b'a'; 8000];
        input.push(b' ');
        let step = state.process(&input, &limits);
        assert_eq!(step.consumed, 8001);
        match step.state {
            ParseState::Target(state) => assert_eq!(state.target.len(), 8000),
            other => panic!("unexpected state: {}", other.name()),
        }

        let state = MethodState {
            method: Method::Get,
        };
        let step = state.process(&[b'a'; 8001], &limits);
        assert!(matches!(
            step.state,
            ParseState::Complete(Err(Status::UriTooLong))
        ));
    }

    #[test]
    fn version_promotes_without_consuming() {
        let state = VersionState {
            line: RequestLine {
                method: Method::Get,
                target: "/".to_string(),
                version: Version::Http11,
            },
        };
        let step = state.process();
        assert!(step.can_continue);
        assert_eq!(step.consumed, 0);
        assert!(matches!(step.state, ParseState::Fields(_)));
    }

    #[test]
    fn unknown_version_bad_request() {
        let state = TargetState {
            method: Method::Get,
            target: "/".to_string(),
        };
        let step = state.process(b"HTTP/2.0\r\n");
        assert!(matches!(
            step.state,
            ParseState::Complete(Err(Status::BadRequest))
        ));
    }
}

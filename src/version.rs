//! HTTP バージョン (RFC 9112 Section 2.3)

use std::fmt;

/// HTTP バージョン
///
/// HTTP-version = HTTP-name "/" DIGIT "." DIGIT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// HTTP/1.0
    Http10,
    /// HTTP/1.1
    Http11,
}

impl Version {
    /// すべてのバージョン
    pub const ALL: [Version; 2] = [Version::Http10, Version::Http11];

    /// 最長のバージョン文字列の長さ
    pub const MAX_LEN: usize = {
        let mut max = 0;
        let mut i = 0;
        while i < Self::ALL.len() {
            let len = Self::ALL[i].as_str().len();
            if len > max {
                max = len;
            }
            i += 1;
        }
        max
    };

    /// バージョン文字列
    pub const fn as_str(self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }

    /// トークンからバージョンを取得
    pub fn from_bytes(token: &[u8]) -> Option<Version> {
        Self::ALL
            .into_iter()
            .find(|version| version.as_str().as_bytes() == token)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

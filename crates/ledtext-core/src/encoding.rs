//! Byte-to-text decoding for display responses and watched files.
//!
//! Display responses are opaque and only decoded so they can be logged.
//! Watched tracklist files come in whatever encoding the DJ software wrote.

use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    #[default]
    Auto,
    Ascii,
    #[serde(alias = "windows-1252", alias = "cp1252")]
    Windows1252,
    #[serde(alias = "utf-8")]
    Utf8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown response encoding {0:?}")]
pub struct UnknownEncoding(pub String);

impl std::str::FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "auto" => Self::Auto,
            "ascii" => Self::Ascii,
            "windows-1252" | "cp1252" | "latin1" => Self::Windows1252,
            "utf-8" | "utf8" => Self::Utf8,
            _ => return Err(UnknownEncoding(s.to_string())),
        })
    }
}

impl TextEncoding {
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Auto => detect_and_decode(bytes),
            Self::Ascii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { '?' })
                .collect(),
            Self::Windows1252 => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
            Self::Utf8 => UTF_8.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }
}

fn detect_and_decode(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    encoding.decode_without_bom_handling(bytes).0.into_owned()
}

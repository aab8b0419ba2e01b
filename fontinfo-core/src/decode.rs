//! Naming-table string decoding (made by FontLab https://www.fontlab.com/)
//!
//! Each name record declares a platform/encoding pair. Decoding follows that
//! declaration first and falls back to lossy UTF-8 when the bytes disagree,
//! so a mislabelled record still shows up in the report.

use std::fmt;

use encoding_rs::{Encoding, BIG5, EUC_KR, GBK, MACINTOSH, SHIFT_JIS, WINDOWS_1252, X_MAC_CYRILLIC};
use tracing::debug;

pub const PLATFORM_UNICODE: u16 = 0;
pub const PLATFORM_MACINTOSH: u16 = 1;
pub const PLATFORM_ISO: u16 = 2;
pub const PLATFORM_WINDOWS: u16 = 3;

/// Character encoding declared by a name record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameEncoding {
    Utf16Be,
    Ascii,
    Legacy(&'static Encoding),
    Unsupported,
}

impl NameEncoding {
    pub fn from_ids(platform_id: u16, encoding_id: u16) -> Self {
        match (platform_id, encoding_id) {
            (PLATFORM_UNICODE, _) => Self::Utf16Be,
            (PLATFORM_MACINTOSH, 0) => Self::Legacy(MACINTOSH),
            (PLATFORM_MACINTOSH, 1) => Self::Legacy(SHIFT_JIS),
            (PLATFORM_MACINTOSH, 2) => Self::Legacy(BIG5),
            (PLATFORM_MACINTOSH, 3) => Self::Legacy(EUC_KR),
            (PLATFORM_MACINTOSH, 7) => Self::Legacy(X_MAC_CYRILLIC),
            (PLATFORM_MACINTOSH, 25) => Self::Legacy(GBK),
            (PLATFORM_ISO, 0) => Self::Ascii,
            (PLATFORM_ISO, 1) => Self::Utf16Be,
            (PLATFORM_ISO, 2) => Self::Legacy(WINDOWS_1252),
            (PLATFORM_WINDOWS, 0 | 1 | 10) => Self::Utf16Be,
            (PLATFORM_WINDOWS, 2) => Self::Legacy(SHIFT_JIS),
            (PLATFORM_WINDOWS, 3) => Self::Legacy(GBK),
            (PLATFORM_WINDOWS, 4) => Self::Legacy(BIG5),
            (PLATFORM_WINDOWS, 5) => Self::Legacy(EUC_KR),
            _ => Self::Unsupported,
        }
    }
}

/// Why a record could not be decoded with its declared encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Unsupported { platform_id: u16, encoding_id: u16 },
    OddLength(usize),
    InvalidUtf16,
    NotAscii,
    Malformed(&'static str),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Unsupported {
                platform_id,
                encoding_id,
            } => write!(
                f,
                "unsupported encoding (platform {platform_id}, encoding {encoding_id})"
            ),
            DecodeError::OddLength(len) => write!(f, "odd byte length {len} for UTF-16"),
            DecodeError::InvalidUtf16 => write!(f, "unpaired UTF-16 surrogate"),
            DecodeError::NotAscii => write!(f, "non-ASCII byte in ASCII record"),
            DecodeError::Malformed(name) => write!(f, "malformed {name} sequence"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode strictly with the declared encoding.
pub fn decode_declared(
    platform_id: u16,
    encoding_id: u16,
    bytes: &[u8],
) -> Result<String, DecodeError> {
    match NameEncoding::from_ids(platform_id, encoding_id) {
        NameEncoding::Utf16Be => decode_utf16be(bytes),
        NameEncoding::Ascii => {
            if bytes.is_ascii() {
                Ok(bytes.iter().map(|&b| b as char).collect())
            } else {
                Err(DecodeError::NotAscii)
            }
        }
        NameEncoding::Legacy(encoding) => encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or(DecodeError::Malformed(encoding.name())),
        NameEncoding::Unsupported => Err(DecodeError::Unsupported {
            platform_id,
            encoding_id,
        }),
    }
}

/// Decode with the declared encoding, falling back to lossy UTF-8.
pub fn decode_name(platform_id: u16, encoding_id: u16, bytes: &[u8]) -> String {
    match decode_declared(platform_id, encoding_id, bytes) {
        Ok(text) => text,
        Err(err) => {
            debug!(platform_id, encoding_id, "falling back to UTF-8: {err}");
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

fn decode_utf16be(bytes: &[u8]) -> Result<String, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddLength(bytes.len()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units).map_err(|_| DecodeError::InvalidUtf16)
}

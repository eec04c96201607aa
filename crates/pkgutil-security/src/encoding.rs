//! Base64 helpers shared by the cipher, key and signature modules.

use std::borrow::Cow;

use base64ct::{Base64, Base64UrlUnpadded, Encoding};

use crate::error::SecurityError;

/// Standard (padded) base64 encode.
pub fn base64_encode(data: &[u8]) -> String {
    Base64::encode_string(data)
}

/// Standard (padded) base64 decode. CR and LF are skipped.
pub fn base64_decode(s: &str) -> Result<Vec<u8>, SecurityError> {
    Base64::decode_vec(&strip_line_breaks(s))
        .map_err(|e| SecurityError::InvalidBase64(e.to_string()))
}

fn strip_line_breaks(s: &str) -> Cow<'_, str> {
    if s.contains(['\r', '\n']) {
        Cow::Owned(s.chars().filter(|c| !matches!(c, '\r' | '\n')).collect())
    } else {
        Cow::Borrowed(s)
    }
}

/// Drop every ASCII whitespace character.
pub(crate) fn strip_whitespace(s: &str) -> Cow<'_, str> {
    if s.contains(|c: char| c.is_ascii_whitespace()) {
        Cow::Owned(s.chars().filter(|c| !c.is_ascii_whitespace()).collect())
    } else {
        Cow::Borrowed(s)
    }
}

/// Decode standard base64, falling back to URL-safe unpadded base64.
///
/// Signatures reach us in either encoding depending on the caller.
pub fn base64_decode_lenient(s: &str) -> Result<Vec<u8>, SecurityError> {
    let s = strip_line_breaks(s);
    match Base64::decode_vec(&s) {
        Ok(bytes) => Ok(bytes),
        Err(std_err) => {
            tracing::debug!(error = %std_err, "standard base64 decode failed, trying url-safe raw");
            Base64UrlUnpadded::decode_vec(&s).map_err(|e| SecurityError::InvalidBase64(e.to_string()))
        }
    }
}

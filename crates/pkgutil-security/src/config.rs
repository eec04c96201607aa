//! Key configuration for the AES-CBC context.

use std::fmt;

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::SecurityError;

/// Keys for [`AesCbcContext`](crate::aes_cbc::AesCbcContext).
///
/// ```json
/// { "decodeKey": "<base64 AES key>", "systemKey": "<raw key text>" }
/// ```
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CipherConfig {
    /// Base64-encoded AES key used to decrypt incoming data.
    pub decode_key: String,
    /// Raw system key used when re-encrypting. Empty if unset.
    #[serde(default)]
    pub system_key: String,
}

impl CipherConfig {
    pub fn from_json(json: &str) -> Result<Self, SecurityError> {
        let config: Self = serde_json::from_str(json)?;
        tracing::debug!(
            decode_key_len = config.decode_key.len(),
            system_key_len = config.system_key.len(),
            "loaded cipher config"
        );
        Ok(config)
    }
}

impl fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CipherConfig")
            .field("decode_key", &"[redacted]")
            .field("system_key", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case() {
        let config = CipherConfig::from_json(
            r#"{"decodeKey":"MDEyMzQ1Njc4OWFiY2RlZg==","systemKey":"fedcba9876543210"}"#,
        )
        .unwrap();
        assert_eq!(config.decode_key, "MDEyMzQ1Njc4OWFiY2RlZg==");
        assert_eq!(config.system_key, "fedcba9876543210");
    }

    #[test]
    fn system_key_defaults_to_empty() {
        let config = CipherConfig::from_json(r#"{"decodeKey":"a2V5"}"#).unwrap();
        assert!(config.system_key.is_empty());
    }

    #[test]
    fn rejects_unknown_and_missing_fields() {
        assert!(matches!(
            CipherConfig::from_json(r#"{"decodeKey":"a2V5","extra":1}"#).unwrap_err(),
            SecurityError::Config(_)
        ));
        assert!(CipherConfig::from_json(r#"{"systemKey":"x"}"#).is_err());
    }

    #[test]
    fn debug_redacts_keys() {
        let config = CipherConfig::from_json(r#"{"decodeKey":"c2VjcmV0","systemKey":"hunter2"}"#)
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("c2VjcmV0"));
        assert!(!debug.contains("hunter2"));
    }
}

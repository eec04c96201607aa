//! AES-CBC with a fresh random IV per message.
//!
//! Wire format: base64([IV:16][ciphertext]), PKCS#7 padded.
//!
//! [`AesCbcContext`] bundles a decode key with a "system key" for the
//! decrypt-then-re-encrypt workflow. [`StickyAesCbc`] keeps the legacy
//! record-first-error behaviour for call sites that depend on it.

use std::sync::Arc;

use aes::{Aes128, Aes192, Aes256};
use zeroize::Zeroizing;

use crate::block::{self, invalid_aes_key};
use crate::config::CipherConfig;
use crate::encoding::{base64_decode, base64_encode};
use crate::error::{ReencryptError, SecurityError};
use crate::padding::{pkcs7_pad, pkcs7_unpad};
use crate::random::random_bytes;
use crate::types::{AES_BLOCK_SIZE, AES_KEY_LENGTHS};

fn check_key(key: &[u8]) -> Result<(), SecurityError> {
    if !AES_KEY_LENGTHS.contains(&key.len()) {
        return Err(invalid_aes_key(key.len()));
    }
    Ok(())
}

fn encrypt_blocks(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, SecurityError> {
    match key.len() {
        16 => block::cbc_encrypt::<Aes128>(key, iv, data),
        24 => block::cbc_encrypt::<Aes192>(key, iv, data),
        32 => block::cbc_encrypt::<Aes256>(key, iv, data),
        got => Err(invalid_aes_key(got)),
    }
}

fn decrypt_blocks(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, SecurityError> {
    match key.len() {
        16 => block::cbc_decrypt::<Aes128>(key, iv, data),
        24 => block::cbc_decrypt::<Aes192>(key, iv, data),
        32 => block::cbc_decrypt::<Aes256>(key, iv, data),
        got => Err(invalid_aes_key(got)),
    }
}

/// Encrypt `plaintext` with AES-CBC.
///
/// Returns base64([IV:16][ciphertext]).
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<String, SecurityError> {
    check_key(key)?;
    let padded = pkcs7_pad(plaintext, AES_BLOCK_SIZE)?;
    let iv = random_bytes::<AES_BLOCK_SIZE>()?;
    let ciphertext = encrypt_blocks(key, &iv, &padded)?;

    let mut frame = Vec::with_capacity(AES_BLOCK_SIZE + ciphertext.len());
    frame.extend_from_slice(&iv);
    frame.extend_from_slice(&ciphertext);
    Ok(base64_encode(&frame))
}

/// Decrypt base64([IV:16][ciphertext]) produced by [`encrypt`].
pub fn decrypt(ciphertext: &str, key: &[u8]) -> Result<Vec<u8>, SecurityError> {
    let frame = base64_decode(ciphertext.trim())?;
    check_key(key)?;
    if frame.len() < AES_BLOCK_SIZE {
        return Err(SecurityError::CiphertextTooShort {
            min: AES_BLOCK_SIZE,
            got: frame.len(),
        });
    }

    let (iv, body) = frame.split_at(AES_BLOCK_SIZE);
    let plaintext = decrypt_blocks(key, iv, body)?;
    Ok(pkcs7_unpad(&plaintext)?.to_vec())
}

/// Result of [`AesCbcContext::decrypt_and_reencrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reencrypted {
    /// Plaintext recovered under the context key.
    pub plaintext: String,
    /// The plaintext encrypted under the system key.
    pub ciphertext: String,
}

/// AES-CBC helper holding a decode key and a system key.
///
/// Every call returns its own `Result`; nothing is remembered between calls.
pub struct AesCbcContext {
    key: Zeroizing<Vec<u8>>,
    system_key: Option<Zeroizing<Vec<u8>>>,
}

impl AesCbcContext {
    /// Create a context from a base64 decode key and a raw system key.
    pub fn new(b64_key: &str, system_key: &str) -> Result<Self, SecurityError> {
        let key = base64_decode(b64_key)
            .inspect_err(|e| tracing::error!(error = %e, "AES key base64 decode error"))?;
        Ok(Self {
            key: Zeroizing::new(key),
            system_key: Some(Zeroizing::new(system_key.as_bytes().to_vec())),
        })
    }

    /// Create a context from loaded configuration.
    /// An empty `systemKey` leaves the system key to be installed on first use.
    pub fn from_config(config: &CipherConfig) -> Result<Self, SecurityError> {
        let mut ctx = Self::new(&config.decode_key, &config.system_key)?;
        if config.system_key.is_empty() {
            ctx.system_key = None;
        }
        Ok(ctx)
    }

    /// Create a context from raw key bytes. The system key is supplied
    /// later, on first use.
    pub fn from_key(key: &[u8]) -> Self {
        Self {
            key: Zeroizing::new(key.to_vec()),
            system_key: None,
        }
    }

    /// Encrypt under the context key.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, SecurityError> {
        encrypt(plaintext.as_bytes(), &self.key)
    }

    /// Decrypt under the context key.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, SecurityError> {
        let plaintext = decrypt(ciphertext, &self.key)?;
        Ok(String::from_utf8(plaintext)?)
    }

    fn system_key_or_init(&mut self, system_key: &str) -> &[u8] {
        self.system_key
            .get_or_insert_with(|| Zeroizing::new(system_key.as_bytes().to_vec()))
            .as_slice()
    }

    /// Encrypt under the system key, installing `system_key` if the context
    /// has none yet.
    pub fn encrypt_with_system_key(
        &mut self,
        plaintext: &str,
        system_key: &str,
    ) -> Result<String, SecurityError> {
        let key = self.system_key_or_init(system_key);
        encrypt(plaintext.as_bytes(), key)
    }

    /// Decrypt under the context key, then encrypt the plaintext under the
    /// system key.
    pub fn decrypt_and_reencrypt(
        &mut self,
        ciphertext: &str,
        system_key: &str,
    ) -> Result<Reencrypted, ReencryptError> {
        let plaintext = self.decrypt(ciphertext).map_err(|e| {
            tracing::error!(error = %e, "decrypt before re-encrypt failed");
            ReencryptError::Decrypt(e)
        })?;

        let key = self.system_key_or_init(system_key);
        match encrypt(plaintext.as_bytes(), key) {
            Ok(ciphertext) => Ok(Reencrypted {
                plaintext,
                ciphertext,
            }),
            Err(source) => {
                tracing::error!(error = %source, "re-encrypt under system key failed");
                Err(ReencryptError::Encrypt { plaintext, source })
            }
        }
    }
}

/// Legacy AES-CBC helper with a sticky error.
///
/// The first failure is recorded and never cleared. From then on every
/// encrypt/decrypt call returns its input unchanged. Prefer
/// [`AesCbcContext`]; this type exists for call sites that rely on the
/// always-return-a-string contract.
///
/// Mutation goes through `&mut self`, so sharing one instance across threads
/// requires the caller's own lock.
pub struct StickyAesCbc {
    key: Zeroizing<Vec<u8>>,
    err: Option<Arc<SecurityError>>,
    system: Option<Box<StickyAesCbc>>,
}

impl StickyAesCbc {
    /// Create a helper from a base64 decode key and a raw system key.
    ///
    /// A key that fails to decode is recorded as the sticky error.
    pub fn new(b64_key: &str, system_key: &str) -> Self {
        let mut helper = Self::with_key(&[]);
        match base64_decode(b64_key) {
            Ok(key) => helper.key = Zeroizing::new(key),
            Err(e) => helper.record(e),
        }
        helper.system = Some(Box::new(Self::with_key(system_key.as_bytes())));
        helper
    }

    /// Create a helper from raw key bytes with no system key.
    pub fn with_key(key: &[u8]) -> Self {
        Self {
            key: Zeroizing::new(key.to_vec()),
            err: None,
            system: None,
        }
    }

    /// The recorded error, if any.
    pub fn error(&self) -> Option<&SecurityError> {
        self.err.as_deref()
    }

    fn record(&mut self, err: SecurityError) {
        tracing::error!(error = %err, "AES-CBC helper error recorded");
        self.err = Some(Arc::new(err));
    }

    /// Encrypt, or return `plaintext` unchanged once an error is recorded.
    pub fn encrypt(&mut self, plaintext: &str) -> String {
        if self.err.is_some() {
            return plaintext.to_string();
        }
        match encrypt(plaintext.as_bytes(), &self.key) {
            Ok(ciphertext) => ciphertext,
            Err(e) => {
                self.record(e);
                plaintext.to_string()
            }
        }
    }

    /// Decrypt, or return `ciphertext` unchanged once an error is recorded.
    pub fn decrypt(&mut self, ciphertext: &str) -> String {
        if self.err.is_some() {
            return ciphertext.to_string();
        }
        let result = decrypt(ciphertext, &self.key)
            .and_then(|plaintext| String::from_utf8(plaintext).map_err(SecurityError::from));
        match result {
            Ok(plaintext) => plaintext,
            Err(e) => {
                self.record(e);
                ciphertext.to_string()
            }
        }
    }

    fn system_or_init(&mut self, system_key: &str) -> &mut StickyAesCbc {
        self.system
            .get_or_insert_with(|| Box::new(Self::with_key(system_key.as_bytes())))
    }

    /// Returns `(decrypted, encrypted)`.
    ///
    /// On a decrypt failure both slots hold the decrypt output (the input
    /// ciphertext). On a re-encrypt failure both hold the plaintext and the
    /// system helper's error is copied onto this helper.
    pub fn decrypt_and_reencrypt(&mut self, ciphertext: &str, system_key: &str) -> (String, String) {
        let decrypted = self.decrypt(ciphertext);
        if self.err.is_some() {
            return (decrypted.clone(), decrypted);
        }

        let system = self.system_or_init(system_key);
        let encrypted = system.encrypt(&decrypted);
        if let Some(err) = system.err.clone() {
            tracing::error!(error = %err, "re-encrypt under system key failed");
            self.err = Some(err);
        }
        (decrypted, encrypted)
    }

    /// Encrypt under the system key. On failure the error text is returned
    /// in place of a ciphertext.
    pub fn encrypt_with_system_key(&mut self, plaintext: &str, system_key: &str) -> String {
        let system = self.system_or_init(system_key);
        let encrypted = system.encrypt(plaintext);
        match &system.err {
            Some(err) => err.to_string(),
            None => encrypted,
        }
    }
}

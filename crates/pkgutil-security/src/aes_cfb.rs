//! AES-CFB (full-block feedback) with a fresh random IV per message.
//!
//! Wire format: hex([IV:16][ciphertext]). No padding.

use aes::{Aes128, Aes192, Aes256};

use crate::block::{self, invalid_aes_key};
use crate::error::SecurityError;
use crate::random::random_bytes;
use crate::types::{AES_BLOCK_SIZE, AES_KEY_LENGTHS};

fn apply(key: &[u8], iv: &[u8], buf: &mut [u8], encrypting: bool) -> Result<(), SecurityError> {
    match (key.len(), encrypting) {
        (16, true) => block::cfb_encrypt::<Aes128>(key, iv, buf),
        (24, true) => block::cfb_encrypt::<Aes192>(key, iv, buf),
        (32, true) => block::cfb_encrypt::<Aes256>(key, iv, buf),
        (16, false) => block::cfb_decrypt::<Aes128>(key, iv, buf),
        (24, false) => block::cfb_decrypt::<Aes192>(key, iv, buf),
        (32, false) => block::cfb_decrypt::<Aes256>(key, iv, buf),
        (got, _) => Err(invalid_aes_key(got)),
    }
}

/// Encrypt `plaintext` with AES-CFB.
///
/// Returns lowercase hex([IV:16][ciphertext]); the ciphertext is exactly as
/// long as the plaintext.
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> Result<String, SecurityError> {
    if !AES_KEY_LENGTHS.contains(&key.len()) {
        return Err(invalid_aes_key(key.len()));
    }
    let iv = random_bytes::<AES_BLOCK_SIZE>()?;

    let mut frame = Vec::with_capacity(AES_BLOCK_SIZE + plaintext.len());
    frame.extend_from_slice(&iv);
    frame.extend_from_slice(plaintext);
    apply(key, &iv, &mut frame[AES_BLOCK_SIZE..], true)?;
    Ok(hex::encode(frame))
}

/// Decrypt hex([IV:16][ciphertext]) produced by [`encrypt`].
pub fn decrypt(ciphertext: &str, key: &[u8]) -> Result<Vec<u8>, SecurityError> {
    if !AES_KEY_LENGTHS.contains(&key.len()) {
        return Err(invalid_aes_key(key.len()));
    }
    let frame = hex::decode(ciphertext)
        .inspect_err(|e| tracing::error!(error = %e, "AES-CFB ciphertext hex decode error"))?;
    if frame.len() < AES_BLOCK_SIZE {
        return Err(SecurityError::CiphertextTooShort {
            min: AES_BLOCK_SIZE,
            got: frame.len(),
        });
    }

    let (iv, body) = frame.split_at(AES_BLOCK_SIZE);
    let mut plaintext = body.to_vec();
    apply(key, iv, &mut plaintext, false)?;
    Ok(plaintext)
}

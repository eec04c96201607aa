//! DES-CBC where the 8-byte key doubles as the IV.
//!
//! **Insecure, kept for compatibility.** DES is broken and reusing the key
//! as IV makes every message start from the same chaining state.
//!
//! Wire format: base64(ciphertext), PKCS#5 padded. No IV prefix.

use des::Des;

use crate::block;
use crate::encoding::{base64_decode, base64_encode};
use crate::error::SecurityError;
use crate::padding::{pkcs7_pad, pkcs7_unpad};
use crate::types::{DES_BLOCK_SIZE, DES_KEY_LENGTH};

fn check_key(key: &[u8]) -> Result<(), SecurityError> {
    if key.len() != DES_KEY_LENGTH {
        return Err(SecurityError::InvalidKeyLength {
            expected: "8",
            got: key.len(),
        });
    }
    Ok(())
}

/// Encrypt raw bytes.
pub fn encrypt(data: &[u8], key: &[u8]) -> Result<Vec<u8>, SecurityError> {
    check_key(key)?;
    let padded = pkcs7_pad(data, DES_BLOCK_SIZE)?;
    block::cbc_encrypt::<Des>(key, key, &padded)
}

/// Decrypt raw bytes.
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, SecurityError> {
    check_key(key)?;
    if ciphertext.len() < DES_BLOCK_SIZE {
        return Err(SecurityError::CiphertextTooShort {
            min: DES_BLOCK_SIZE,
            got: ciphertext.len(),
        });
    }
    let plaintext = block::cbc_decrypt::<Des>(key, key, ciphertext)?;
    Ok(pkcs7_unpad(&plaintext)?.to_vec())
}

/// Encrypt a string and base64-encode the ciphertext.
pub fn encrypt_string(src: &str, key: &str) -> Result<String, SecurityError> {
    let ciphertext = encrypt(src.as_bytes(), key.as_bytes())?;
    Ok(base64_encode(&ciphertext))
}

/// Decode base64 and decrypt to a string.
pub fn decrypt_string(src: &str, key: &str) -> Result<String, SecurityError> {
    let ciphertext = base64_decode(src)?;
    let plaintext = decrypt(&ciphertext, key.as_bytes())?;
    Ok(String::from_utf8(plaintext)?)
}

//! AES-128-ECB with an XOR-folded key.
//!
//! **Insecure, kept for compatibility with existing ciphertexts.** ECB leaks
//! equality between plaintext blocks, and the key fold below is not a
//! reviewed key-derivation function.
//!
//! Wire format: uppercase hex(ciphertext).

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Block};

use crate::error::SecurityError;
use crate::padding::pkcs7_unpad;
use crate::types::{AES_BLOCK_SIZE, ECB_KEY_LENGTH};

/// Fold an arbitrary-length key into 16 bytes.
///
/// Short keys are zero-padded. Bytes past the first 16 are XORed, chunk by
/// chunk, into the first 16.
pub fn fold_key(key: &[u8]) -> [u8; ECB_KEY_LENGTH] {
    let mut folded = [0u8; ECB_KEY_LENGTH];
    let head = key.len().min(ECB_KEY_LENGTH);
    folded[..head].copy_from_slice(&key[..head]);
    for chunk in key[head..].chunks(ECB_KEY_LENGTH) {
        for (dst, src) in folded.iter_mut().zip(chunk) {
            *dst ^= src;
        }
    }
    folded
}

/// Pad to `(len + 16) / 16` blocks, filling with `padded_len - len`.
fn pad(source: &[u8]) -> Vec<u8> {
    let blocks = (source.len() + AES_BLOCK_SIZE) / AES_BLOCK_SIZE;
    let padded_len = blocks * AES_BLOCK_SIZE;
    let mut padded = source.to_vec();
    padded.resize(padded_len, (padded_len - source.len()) as u8);
    padded
}

/// Encrypt `source` block by block. Empty input yields an empty string.
pub fn encrypt_ecb(source: &[u8], key: &[u8]) -> Result<String, SecurityError> {
    if source.is_empty() {
        return Ok(String::new());
    }
    let cipher = Aes128::new(&fold_key(key).into());
    let mut buf = pad(source);
    for chunk in buf.chunks_exact_mut(AES_BLOCK_SIZE) {
        cipher.encrypt_block(Block::from_mut_slice(chunk));
    }
    Ok(hex::encode_upper(buf))
}

/// Decrypt hex produced by [`encrypt_ecb`]. Empty input yields empty output.
pub fn decrypt_ecb(ciphertext: &str, key: &[u8]) -> Result<Vec<u8>, SecurityError> {
    if ciphertext.is_empty() {
        return Ok(Vec::new());
    }
    let mut buf = hex::decode(ciphertext)?;
    if buf.len() % AES_BLOCK_SIZE != 0 {
        return Err(SecurityError::NotBlockAligned {
            block_size: AES_BLOCK_SIZE,
        });
    }

    let cipher = Aes128::new(&fold_key(key).into());
    for chunk in buf.chunks_exact_mut(AES_BLOCK_SIZE) {
        cipher.decrypt_block(Block::from_mut_slice(chunk));
    }

    Ok(pkcs7_unpad(&buf)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padding::pkcs7_pad;

    #[test]
    fn round_trip() {
        let ct = encrypt_ecb(b"6222020202020202", b"secret-key").unwrap();
        assert_eq!(decrypt_ecb(&ct, b"secret-key").unwrap(), b"6222020202020202");
    }

    #[test]
    fn output_is_uppercase_hex() {
        let ct = encrypt_ecb(b"abc", b"k").unwrap();
        assert_eq!(ct.len(), 32);
        assert_eq!(ct, ct.to_uppercase());
    }

    #[test]
    fn empty_in_empty_out() {
        assert_eq!(encrypt_ecb(b"", b"k").unwrap(), "");
        assert!(decrypt_ecb("", b"k").unwrap().is_empty());
    }

    #[test]
    fn identical_blocks_encrypt_identically() {
        let ct = encrypt_ecb(&[b'A'; 32], b"key").unwrap();
        assert_eq!(ct.len(), 96);
        assert_eq!(ct[..32], ct[32..64]);
    }

    #[test]
    fn aligned_input_gains_full_block() {
        let ct = encrypt_ecb(&[1u8; 16], b"key").unwrap();
        assert_eq!(ct.len(), 64);
    }

    fn encrypt_raw_block(block: &[u8; 16], key: &[u8]) -> String {
        let mut buf = *block;
        Aes128::new(&fold_key(key).into()).encrypt_block(Block::from_mut_slice(&mut buf));
        hex::encode_upper(buf)
    }

    #[test]
    fn decrypt_rejects_zero_pad_byte() {
        let ct = encrypt_raw_block(b"ABCDEFGHIJKLMNO\0", b"key");
        assert!(matches!(
            decrypt_ecb(&ct, b"key").unwrap_err(),
            SecurityError::InvalidPadding { pad: 0, len: 16 }
        ));
    }

    #[test]
    fn decrypt_rejects_pad_longer_than_buffer() {
        let ct = encrypt_raw_block(b"ABCDEFGHIJKLMNO\x11", b"key");
        assert!(matches!(
            decrypt_ecb(&ct, b"key").unwrap_err(),
            SecurityError::InvalidPadding { pad: 17, len: 16 }
        ));
    }

    #[test]
    fn decrypt_rejects_misaligned_hex() {
        assert!(matches!(
            decrypt_ecb("00112233", b"key").unwrap_err(),
            SecurityError::NotBlockAligned { block_size: 16 }
        ));
    }

    #[test]
    fn padding_matches_pkcs7() {
        for len in 0..40 {
            let data = vec![0x5Au8; len];
            assert_eq!(pad(&data), pkcs7_pad(&data, AES_BLOCK_SIZE).unwrap(), "len {len}");
        }
    }

    #[test]
    fn short_key_is_zero_padded() {
        let mut expected = [0u8; 16];
        expected[..3].copy_from_slice(b"abc");
        assert_eq!(fold_key(b"abc"), expected);
    }

    #[test]
    fn long_key_is_xor_folded() {
        let key: Vec<u8> = (0u8..40).collect();
        let folded = fold_key(&key);
        for j in 0..16 {
            let mut expected = j as u8 ^ (j as u8 + 16);
            if j + 32 < 40 {
                expected ^= j as u8 + 32;
            }
            assert_eq!(folded[j], expected);
        }
    }

    #[test]
    fn folded_key_is_equivalent() {
        let long_key: Vec<u8> = (1u8..=32).collect();
        let folded = fold_key(&long_key);
        let a = encrypt_ecb(b"same plaintext", &long_key).unwrap();
        let b = encrypt_ecb(b"same plaintext", &folded).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn known_vector() {
        // FIPS-197 C.1 AES-128, then one block of padding
        let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let pt = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let ct = encrypt_ecb(&pt, &key).unwrap();
        assert_eq!(&ct[..32], "69C4E0D86A7B0430D8CDB78070B4C55A");
    }

    #[test]
    fn decrypt_accepts_lowercase() {
        let ct = encrypt_ecb(b"lower", b"key").unwrap().to_lowercase();
        assert_eq!(decrypt_ecb(&ct, b"key").unwrap(), b"lower");
    }

    #[test]
    fn rejects_unaligned_ciphertext() {
        assert!(matches!(
            decrypt_ecb("ABCD", b"key").unwrap_err(),
            SecurityError::NotBlockAligned { .. }
        ));
    }

    #[test]
    fn rejects_invalid_hex() {
        assert!(decrypt_ecb("XYZ", b"key").is_err());
    }
}

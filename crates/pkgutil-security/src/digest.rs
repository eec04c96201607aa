//! One-shot SHA-256.

use sha2::{Digest, Sha256};

use crate::types::SHA256_DIGEST_LENGTH;

/// SHA-256 of `data`.
pub fn sha256_digest(data: &[u8]) -> [u8; SHA256_DIGEST_LENGTH] {
    Sha256::digest(data).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            hex::encode(sha256_digest(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex::encode(sha256_digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn deterministic() {
        assert_eq!(sha256_digest(b"pkgutil"), sha256_digest(b"pkgutil"));
        assert_ne!(sha256_digest(b"pkgutil"), sha256_digest(b"pkgutiL"));
    }
}

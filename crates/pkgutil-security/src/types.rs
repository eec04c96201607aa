use std::time::Duration;

/// AES block size in bytes. Also the IV length for CBC and CFB frames.
pub const AES_BLOCK_SIZE: usize = 16;

/// Accepted AES key lengths (AES-128, AES-192, AES-256).
pub const AES_KEY_LENGTHS: &[usize] = &[16, 24, 32];

/// Key length produced by the ECB key fold.
pub const ECB_KEY_LENGTH: usize = 16;

/// DES block size in bytes.
pub const DES_BLOCK_SIZE: usize = 8;

/// DES key length in bytes. The key doubles as the CBC IV.
pub const DES_KEY_LENGTH: usize = 8;

/// RSA modulus size used for generated keys.
pub const RSA_KEY_BITS: usize = 2048;

/// SHA-256 digest length in bytes.
pub const SHA256_DIGEST_LENGTH: usize = 32;

/// How far `NotBefore` is moved into the past to tolerate clock skew.
pub const CERT_BACKDATE: Duration = Duration::from_secs(5 * 60);

/// Serial number layout for issued certificates (issuance local time).
pub const CERT_SERIAL_FORMAT: &str = "%Y%m%d%H%M%S";

/// Subject (and issuer) of every self-signed certificate, RFC 4514 order.
pub const CERT_SUBJECT: &str = "CN=everonet.com,O=Cardinfolink,ST=Shanghai,C=CN";

//! Random bytes and random identifiers.

use md5::{Digest, Md5};
use uuid::Uuid;

use crate::error::SecurityError;

/// Fill a fixed-size array from the OS CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], SecurityError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf).map_err(|e| SecurityError::RngFailed(e.to_string()))?;
    Ok(buf)
}

/// Random 32-character lowercase hex key: MD5 over 20 random bytes.
pub fn sign_key() -> Result<String, SecurityError> {
    let seed = random_bytes::<20>()?;
    Ok(hex::encode(Md5::digest(seed)))
}

/// Random 32-character lowercase hex identifier from a v4 UUID.
pub fn serial_number() -> String {
    Uuid::new_v4().simple().to_string()
}

//! Block padding schemes.
//!
//! PKCS#7 (identical to PKCS#5 for 8-byte blocks): append N bytes of value N.
//! Zero padding: append zero bytes up to the next block boundary.

use crate::error::SecurityError;

/// The pad length has to fit in one byte.
fn pad_len(data_len: usize, block_size: usize) -> Result<usize, SecurityError> {
    if !(1..=255).contains(&block_size) {
        return Err(SecurityError::InvalidBlockSize(block_size));
    }
    Ok(block_size - data_len % block_size)
}

/// Pad `data` to a multiple of `block_size` with PKCS#7.
///
/// Block-aligned input gains a full block of padding. `block_size` must be
/// in `1..=255`.
pub fn pkcs7_pad(data: &[u8], block_size: usize) -> Result<Vec<u8>, SecurityError> {
    let padding = pad_len(data.len(), block_size)?;
    let mut padded = Vec::with_capacity(data.len() + padding);
    padded.extend_from_slice(data);
    padded.resize(data.len() + padding, padding as u8);
    Ok(padded)
}

/// Strip padding by reading the last byte as the pad length.
///
/// Only the last byte is consulted. A pad length of zero or one larger
/// than the buffer is rejected.
pub fn pkcs7_unpad(data: &[u8]) -> Result<&[u8], SecurityError> {
    let len = data.len();
    let pad = match data.last() {
        Some(&last) => last as usize,
        None => return Err(SecurityError::InvalidPadding { pad: 0, len: 0 }),
    };
    if pad == 0 || pad > len {
        return Err(SecurityError::InvalidPadding { pad, len });
    }
    Ok(&data[..len - pad])
}

/// Pad `data` with zero bytes to a multiple of `block_size`.
///
/// Like PKCS#7, block-aligned input gains a full block.
pub fn zero_pad(data: &[u8], block_size: usize) -> Result<Vec<u8>, SecurityError> {
    let padding = pad_len(data.len(), block_size)?;
    let mut padded = Vec::with_capacity(data.len() + padding);
    padded.extend_from_slice(data);
    padded.resize(data.len() + padding, 0);
    Ok(padded)
}

/// Trim all trailing zero bytes.
pub fn zero_unpad(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &data[..end]
}

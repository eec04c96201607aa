//! Raw CBC/CFB plumbing over any block cipher. Callers own padding and framing.

use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{
    AsyncStreamCipher, BlockCipher, BlockDecryptMut, BlockEncryptMut, BlockSizeUser, KeyInit,
    KeyIvInit,
};

use crate::error::SecurityError;

/// CBC-encrypt block-aligned `data`.
pub(crate) fn cbc_encrypt<C>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, SecurityError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    ensure_aligned::<C>(data)?;
    let mode = cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| SecurityError::EncryptionFailed(e.to_string()))?;
    Ok(mode.encrypt_padded_vec_mut::<NoPadding>(data))
}

/// CBC-decrypt block-aligned `data`. Padding is left in place.
pub(crate) fn cbc_decrypt<C>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, SecurityError>
where
    C: BlockDecryptMut + BlockCipher + KeyInit,
{
    ensure_aligned::<C>(data)?;
    let mode = cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| SecurityError::DecryptionFailed(e.to_string()))?;
    mode.decrypt_padded_vec_mut::<NoPadding>(data)
        .map_err(|e| SecurityError::DecryptionFailed(e.to_string()))
}

fn ensure_aligned<C: BlockSizeUser>(data: &[u8]) -> Result<(), SecurityError> {
    let block_size = C::block_size();
    if data.len() % block_size != 0 {
        return Err(SecurityError::NotBlockAligned { block_size });
    }
    Ok(())
}

/// Full-block CFB encryption in place.
pub(crate) fn cfb_encrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), SecurityError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    cfb_mode::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| SecurityError::EncryptionFailed(e.to_string()))?
        .encrypt(buf);
    Ok(())
}

/// Full-block CFB decryption in place.
pub(crate) fn cfb_decrypt<C>(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), SecurityError>
where
    C: BlockEncryptMut + BlockCipher + KeyInit,
{
    cfb_mode::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| SecurityError::DecryptionFailed(e.to_string()))?
        .decrypt(buf);
    Ok(())
}

pub(crate) fn invalid_aes_key(got: usize) -> SecurityError {
    SecurityError::InvalidKeyLength {
        expected: "16, 24 or 32",
        got,
    }
}

//! RSA PKCS#1 v1.5 encryption and signatures over PEM keys.
//!
//! [`sign`] and [`verify`] take a precomputed digest. With
//! [`SignatureHash::Sha256`] the digest must be 32 bytes and is wrapped in
//! the SHA-256 DigestInfo; with [`SignatureHash::None`] it is signed as is.
//! The `sha256_with_rsa*` helpers hash the message themselves.

use ::rsa::{Pkcs1v15Encrypt, Pkcs1v15Sign, RsaPublicKey};
use rand::rngs::OsRng;
use sha2::Sha256;

use crate::digest::sha256_digest;
use crate::encoding::{base64_decode, base64_decode_lenient, base64_encode};
use crate::error::SecurityError;
use crate::keys::{parse_private_key, parse_public_key, parse_public_key_der};

/// Hash identifier placed in the PKCS#1 v1.5 signature block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureHash {
    /// Raw digest, no DigestInfo prefix.
    None,
    #[default]
    Sha256,
}

impl SignatureHash {
    fn scheme(self) -> Pkcs1v15Sign {
        match self {
            SignatureHash::None => Pkcs1v15Sign::new_unprefixed(),
            SignatureHash::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        }
    }
}

fn encrypt_with(public: &RsaPublicKey, data: &[u8]) -> Result<Vec<u8>, SecurityError> {
    public
        .encrypt(&mut OsRng, Pkcs1v15Encrypt, data)
        .map_err(|e| SecurityError::EncryptionFailed(e.to_string()))
}

/// Encrypt `data` for a PEM PKIX public key.
pub fn encrypt(data: &[u8], public_key_pem: &str) -> Result<Vec<u8>, SecurityError> {
    let public = parse_public_key(public_key_pem)?;
    encrypt_with(&public, data)
}

/// [`encrypt`], returning standard base64.
pub fn encrypt_base64(data: &[u8], public_key_pem: &str) -> Result<String, SecurityError> {
    encrypt(data, public_key_pem).map(|ct| base64_encode(&ct))
}

/// Encrypt `data` for a DER PKIX public key.
pub fn encrypt_with_der_key(data: &[u8], public_key_der: &[u8]) -> Result<Vec<u8>, SecurityError> {
    let public = parse_public_key_der(public_key_der)?;
    encrypt_with(&public, data)
}

/// Decrypt with a PEM private key (PKCS#1 or PKCS#8).
pub fn decrypt(ciphertext: &[u8], private_key_pem: &str) -> Result<Vec<u8>, SecurityError> {
    let private = parse_private_key(private_key_pem)?;
    private
        .decrypt_blinded(&mut OsRng, Pkcs1v15Encrypt, ciphertext)
        .map_err(|e| SecurityError::DecryptionFailed(e.to_string()))
}

/// [`decrypt`] for a standard base64 ciphertext.
pub fn decrypt_base64(b64_ciphertext: &str, private_key_pem: &str) -> Result<Vec<u8>, SecurityError> {
    let ciphertext = base64_decode(b64_ciphertext)
        .inspect_err(|e| tracing::error!(error = %e, "RSA ciphertext base64 decode error"))?;
    decrypt(&ciphertext, private_key_pem)
}

/// Sign a digest with a PEM private key.
pub fn sign(
    digest: &[u8],
    private_key_pem: &str,
    hash: SignatureHash,
) -> Result<Vec<u8>, SecurityError> {
    let private = parse_private_key(private_key_pem)?;
    private
        .sign_with_rng(&mut OsRng, hash.scheme(), digest)
        .map_err(|e| {
            tracing::error!(error = %e, ?hash, "RSA sign error");
            SecurityError::SigningFailed(e.to_string())
        })
}

/// [`sign`], returning standard base64.
pub fn sign_base64(
    digest: &[u8],
    private_key_pem: &str,
    hash: SignatureHash,
) -> Result<String, SecurityError> {
    sign(digest, private_key_pem, hash).map(|sig| base64_encode(&sig))
}

/// Verify a signature over a digest with a PEM public key.
pub fn verify(
    digest: &[u8],
    public_key_pem: &str,
    hash: SignatureHash,
    signature: &[u8],
) -> Result<(), SecurityError> {
    let public = parse_public_key(public_key_pem)?;
    public
        .verify(hash.scheme(), digest, signature)
        .map_err(|_| SecurityError::Verification)
}

/// [`verify`] for a base64 signature. Standard base64 is tried first, then
/// URL-safe unpadded.
pub fn verify_base64(
    b64_signature: &str,
    public_key_pem: &str,
    hash: SignatureHash,
    digest: &[u8],
) -> Result<(), SecurityError> {
    let signature = base64_decode_lenient(b64_signature)
        .inspect_err(|e| tracing::error!(error = %e, "signature base64 decode error"))?;
    verify(digest, public_key_pem, hash, &signature)
}

/// SHA-256 the message and sign it. `none_with_rsa` drops the DigestInfo
/// prefix.
pub fn sha256_with_rsa(
    data: &[u8],
    private_key_pem: &str,
    none_with_rsa: bool,
) -> Result<Vec<u8>, SecurityError> {
    let hash = if none_with_rsa {
        SignatureHash::None
    } else {
        SignatureHash::Sha256
    };
    sign(&sha256_digest(data), private_key_pem, hash)
}

/// SHA256withRSA signature in standard base64.
pub fn sha256_with_rsa_base64(data: &[u8], private_key_pem: &str) -> Result<String, SecurityError> {
    sha256_with_rsa(data, private_key_pem, false).map(|sig| base64_encode(&sig))
}

/// Verify a standard-base64 SHA256withRSA signature over `data`.
pub fn verify_sha256_with_rsa_base64(
    data: &[u8],
    b64_signature: &str,
    public_key_pem: &str,
) -> Result<(), SecurityError> {
    let public = parse_public_key(public_key_pem)?;
    let signature = base64_decode(b64_signature)?;
    public
        .verify(
            SignatureHash::Sha256.scheme(),
            &sha256_digest(data),
            &signature,
        )
        .map_err(|_| SecurityError::Verification)
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecurityError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: &'static str, got: usize },

    #[error("Invalid base64: {0}")]
    InvalidBase64(String),

    #[error("Invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("Invalid PEM: {0}")]
    InvalidPem(String),

    #[error("Ciphertext too short: need at least {min} bytes, got {got}")]
    CiphertextTooShort { min: usize, got: usize },

    #[error("Data is not a multiple of the block size ({block_size} bytes)")]
    NotBlockAligned { block_size: usize },

    #[error("Invalid block size {0}: must be between 1 and 255")]
    InvalidBlockSize(usize),

    #[error("Invalid padding: pad length {pad} for {len} bytes")]
    InvalidPadding { pad: usize, len: usize },

    #[error("ASN.1 error: {0}")]
    Asn1(String),

    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    #[error("Parse private key error")]
    PrivateKeyParse,

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("RSA key validation failed: {0}")]
    KeyValidation(String),

    #[error("Certificate error: {0}")]
    Certificate(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Signature verification failed")]
    Verification,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),

    #[error("Plaintext is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Failure of the decrypt-then-re-encrypt combinator.
///
/// The two phases fail independently: a failed re-encryption still hands
/// back the recovered plaintext.
#[derive(Debug, Error)]
pub enum ReencryptError {
    #[error("Decrypt under the context key failed: {0}")]
    Decrypt(#[source] SecurityError),

    #[error("Re-encrypt under the system key failed: {source}")]
    Encrypt {
        plaintext: String,
        #[source]
        source: SecurityError,
    },
}

pub mod aes_cbc;
pub mod aes_cfb;
pub mod aes_ecb;
mod block;
pub mod certificate;
pub mod config;
pub mod des;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod keys;
pub mod padding;
pub mod pem;
pub mod random;
pub mod rsa;
pub mod types;

pub use aes_cbc::{AesCbcContext, Reencrypted, StickyAesCbc};
pub use aes_ecb::{decrypt_ecb, encrypt_ecb};
pub use certificate::{
    certificate_public_key, certificate_public_key_pem, generate_certificate_der,
    generate_certificate_pem, issue_certificate_der, issue_certificate_pem, parse_certificate,
    GeneratedCertificate, GeneratedCertificatePem, IssuedCertificate,
};
pub use config::CipherConfig;
pub use digest::sha256_digest;
pub use encoding::{base64_decode, base64_decode_lenient, base64_encode};
pub use error::{ReencryptError, SecurityError};
pub use keys::{
    generate_key_pair_der, generate_key_pair_pem, marshal_legacy_pkcs8, parse_pkcs1_private_key,
    parse_pkcs8_private_key, parse_private_key, parse_public_key, KeyPairDer, KeyPairPem,
};
pub use pem::{base64_to_pem, der_to_base64, format_raw_key, pem_to_base64, KeyFormat};
pub use random::{serial_number, sign_key};
pub use self::rsa::SignatureHash;
pub use types::{AES_BLOCK_SIZE, AES_KEY_LENGTHS, DES_BLOCK_SIZE, RSA_KEY_BITS};

pub use ::rsa::{RsaPrivateKey, RsaPublicKey};

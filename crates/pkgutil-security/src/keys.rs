//! RSA key parsing, generation and the legacy PKCS#8 encoding.
//!
//! Generated private keys use a hand-rolled PKCS#8 shape that older
//! deployments still hold:
//!
//! ```text
//! SEQUENCE {
//!   INTEGER 0
//!   SEQUENCE { OBJECT IDENTIFIER rsaEncryption }   -- no NULL parameters
//!   OCTET STRING { <PKCS#1 RSAPrivateKey> }
//! }
//! ```
//!
//! The parser accepts PKCS#1, standard PKCS#8 and this legacy shape.

use der::asn1::{ObjectIdentifier, OctetStringRef};
use der::{Decode, Encode, Sequence};
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, PrivateKeyInfo};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::SecurityError;
use crate::pem::{self, PUBLIC_KEY, RSA_PRIVATE_KEY};
use crate::types::RSA_KEY_BITS;

/// rsaEncryption (PKCS#1).
pub const RSA_ENCRYPTION_OID: ObjectIdentifier =
    ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

#[derive(Sequence)]
struct LegacyPrivateKeyInfo<'a> {
    version: u8,
    algorithms: Vec<ObjectIdentifier>,
    private_key: OctetStringRef<'a>,
}

/// Generated key pair in DER form.
#[derive(Clone)]
pub struct KeyPairDer {
    /// Legacy PKCS#8 private key.
    pub private_der: Vec<u8>,
    /// PKIX (SubjectPublicKeyInfo) public key.
    pub public_der: Vec<u8>,
}

/// Generated key pair in PEM form.
#[derive(Clone)]
pub struct KeyPairPem {
    /// Legacy PKCS#8 private key under the `RSA PRIVATE KEY` label.
    pub private_pem: String,
    /// PKIX public key under the `PUBLIC KEY` label.
    pub public_pem: String,
}

/// Parse a PEM-armoured PKCS#1 private key.
pub fn parse_pkcs1_private_key(pem: &str) -> Result<RsaPrivateKey, SecurityError> {
    let der = pem::decode_der(pem)?;
    RsaPrivateKey::from_pkcs1_der(&der).map_err(|e| SecurityError::Asn1(e.to_string()))
}

/// Parse a PEM-armoured PKCS#8 private key (standard or legacy shape).
pub fn parse_pkcs8_private_key(pem: &str) -> Result<RsaPrivateKey, SecurityError> {
    let der = pem::decode_der(pem)?;
    parse_pkcs8_der(&der)
}

fn parse_pkcs8_der(der: &[u8]) -> Result<RsaPrivateKey, SecurityError> {
    if let Ok(key) = RsaPrivateKey::from_pkcs8_der(der) {
        return Ok(key);
    }
    if let Ok(info) = PrivateKeyInfo::from_der(der) {
        if info.algorithm.oid != RSA_ENCRYPTION_OID {
            return Err(SecurityError::UnsupportedKeyType(info.algorithm.oid.to_string()));
        }
    }
    parse_legacy_pkcs8(der)
}

fn parse_legacy_pkcs8(der: &[u8]) -> Result<RsaPrivateKey, SecurityError> {
    let info =
        LegacyPrivateKeyInfo::from_der(der).map_err(|e| SecurityError::Asn1(e.to_string()))?;
    match info.algorithms.first() {
        Some(oid) if *oid == RSA_ENCRYPTION_OID => {}
        Some(oid) => return Err(SecurityError::UnsupportedKeyType(oid.to_string())),
        None => return Err(SecurityError::Asn1("missing key algorithm".into())),
    }
    RsaPrivateKey::from_pkcs1_der(info.private_key.as_bytes())
        .map_err(|e| SecurityError::Asn1(e.to_string()))
}

/// Parse a PEM private key, trying PKCS#1 first and PKCS#8 second.
///
/// The PEM label is not consulted. A PKCS#8 key for another algorithm is
/// reported as [`SecurityError::UnsupportedKeyType`].
pub fn parse_private_key(pem: &str) -> Result<RsaPrivateKey, SecurityError> {
    let der = pem::decode_der(pem)
        .inspect_err(|e| tracing::error!(error = %e, "private key PEM decode error"))?;
    if let Ok(key) = RsaPrivateKey::from_pkcs1_der(&der) {
        return Ok(key);
    }
    match parse_pkcs8_der(&der) {
        Ok(key) => Ok(key),
        Err(SecurityError::UnsupportedKeyType(oid)) => {
            tracing::error!(%oid, "private key is not RSA");
            Err(SecurityError::UnsupportedKeyType(oid))
        }
        Err(e) => {
            tracing::error!(error = %e, "parse private key error");
            Err(SecurityError::PrivateKeyParse)
        }
    }
}

/// Parse a PEM-armoured PKIX public key.
pub fn parse_public_key(pem: &str) -> Result<RsaPublicKey, SecurityError> {
    let der = pem::decode_der(pem)
        .inspect_err(|e| tracing::error!(error = %e, "public key PEM decode error"))?;
    parse_public_key_der(&der)
}

/// Parse a DER PKIX public key.
pub fn parse_public_key_der(der: &[u8]) -> Result<RsaPublicKey, SecurityError> {
    RsaPublicKey::from_public_key_der(der).map_err(|e| match e {
        rsa::pkcs8::spki::Error::OidUnknown { oid } => {
            SecurityError::UnsupportedKeyType(oid.to_string())
        }
        other => {
            tracing::error!(error = %other, "PKIX public key parse error");
            SecurityError::Asn1(other.to_string())
        }
    })
}

/// Encode a private key in the legacy PKCS#8 shape.
pub fn marshal_legacy_pkcs8(key: &RsaPrivateKey) -> Result<Vec<u8>, SecurityError> {
    let pkcs1 = key
        .to_pkcs1_der()
        .map_err(|e| SecurityError::Asn1(e.to_string()))?;
    let info = LegacyPrivateKeyInfo {
        version: 0,
        algorithms: vec![RSA_ENCRYPTION_OID],
        private_key: OctetStringRef::new(pkcs1.as_bytes())
            .map_err(|e| SecurityError::Asn1(e.to_string()))?,
    };
    info.to_der().map_err(|e| SecurityError::Asn1(e.to_string()))
}

/// Encode a public key as PKIX DER.
pub fn public_key_der(key: &RsaPublicKey) -> Result<Vec<u8>, SecurityError> {
    let doc = key
        .to_public_key_der()
        .map_err(|e| SecurityError::Asn1(e.to_string()))?;
    Ok(doc.as_bytes().to_vec())
}

/// Generate and validate a fresh 2048-bit RSA key.
pub fn generate_private_key() -> Result<RsaPrivateKey, SecurityError> {
    let key = RsaPrivateKey::new(&mut OsRng, RSA_KEY_BITS)
        .map_err(|e| SecurityError::KeyGeneration(e.to_string()))?;
    key.validate()
        .map_err(|e| SecurityError::KeyValidation(e.to_string()))?;
    Ok(key)
}

/// Generate a key pair: legacy PKCS#8 private DER and PKIX public DER.
pub fn generate_key_pair_der() -> Result<KeyPairDer, SecurityError> {
    let key = generate_private_key()?;
    Ok(KeyPairDer {
        private_der: marshal_legacy_pkcs8(&key)?,
        public_der: public_key_der(&key.to_public_key())?,
    })
}

/// Generate a key pair and armour it as PEM.
pub fn generate_key_pair_pem() -> Result<KeyPairPem, SecurityError> {
    let pair = generate_key_pair_der()?;
    Ok(KeyPairPem {
        private_pem: pem::encode(RSA_PRIVATE_KEY, &pair.private_der)?,
        public_pem: pem::encode(PUBLIC_KEY, &pair.public_der)?,
    })
}

//! Self-signed X.509 certificates.
//!
//! The serial number is the local issuance time formatted as
//! `YYYYMMDDhhmmss` and read as a decimal integer. Validity starts five
//! minutes before issuance and lasts for the requested expiry. The only
//! extension is a critical BasicConstraints with `cA` false.

use std::str::FromStr;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use der::asn1::{GeneralizedTime, UtcTime};
use der::{Decode, Encode};
use rsa::pkcs1v15::{Signature, SigningKey};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use x509_cert::builder::{Builder, CertificateBuilder, Profile};
use x509_cert::ext::pkix::BasicConstraints;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;
use x509_cert::time::{Time, Validity};
use x509_cert::Certificate;

use crate::error::SecurityError;
use crate::keys;
use crate::pem::{self, CERTIFICATE, PRIVATE_KEY, PUBLIC_KEY};
use crate::types::{CERT_BACKDATE, CERT_SERIAL_FORMAT, CERT_SUBJECT};

/// A freshly issued certificate and its decimal serial number.
#[derive(Debug, Clone)]
pub struct IssuedCertificate {
    pub der: Vec<u8>,
    pub serial: String,
}

/// Fresh private key (legacy PKCS#8 DER) with a certificate over it.
#[derive(Clone)]
pub struct GeneratedCertificate {
    pub private_der: Vec<u8>,
    pub certificate_der: Vec<u8>,
    pub serial: String,
}

/// PEM form of [`GeneratedCertificate`].
#[derive(Clone)]
pub struct GeneratedCertificatePem {
    pub private_pem: String,
    pub certificate_pem: String,
    pub serial: String,
}

fn cert_err(e: impl std::fmt::Display) -> SecurityError {
    SecurityError::Certificate(e.to_string())
}

fn to_time(t: SystemTime) -> Result<Time, SecurityError> {
    match UtcTime::from_system_time(t) {
        Ok(utc) => Ok(Time::UtcTime(utc)),
        // UTCTime stops at 2049
        Err(_) => GeneralizedTime::from_system_time(t)
            .map(Time::GeneralTime)
            .map_err(cert_err),
    }
}

fn serial_for(now: &DateTime<Local>) -> Result<(SerialNumber, String), SecurityError> {
    let n: u64 = now
        .format(CERT_SERIAL_FORMAT)
        .to_string()
        .parse()
        .map_err(cert_err)?;
    let serial = SerialNumber::new(&n.to_be_bytes()).map_err(cert_err)?;
    Ok((serial, n.to_string()))
}

pub(crate) fn issue_at(
    key: &RsaPrivateKey,
    expiry: Duration,
    now: DateTime<Local>,
) -> Result<IssuedCertificate, SecurityError> {
    let (serial_number, serial) = serial_for(&now)?;

    let not_before = SystemTime::from(now)
        .checked_sub(CERT_BACKDATE)
        .ok_or_else(|| cert_err("issuance time out of range"))?;
    let not_after = not_before
        .checked_add(expiry)
        .ok_or_else(|| cert_err("expiry out of range"))?;
    let validity = Validity {
        not_before: to_time(not_before)?,
        not_after: to_time(not_after)?,
    };

    let subject = Name::from_str(CERT_SUBJECT).map_err(cert_err)?;
    let public_key =
        SubjectPublicKeyInfoOwned::from_key(key.to_public_key()).map_err(cert_err)?;
    let signer = SigningKey::<Sha256>::new(key.clone());
    let profile = Profile::Manual {
        issuer: Some(subject.clone()),
    };

    let mut builder = CertificateBuilder::new(
        profile,
        serial_number,
        validity,
        subject,
        public_key,
        &signer,
    )
    .map_err(cert_err)?;
    builder
        .add_extension(&BasicConstraints {
            ca: false,
            path_len_constraint: None,
        })
        .map_err(cert_err)?;
    let cert = builder.build::<Signature>().map_err(|e| {
        tracing::error!(error = %e, "certificate signing failed");
        cert_err(e)
    })?;
    let der = cert.to_der().map_err(cert_err)?;

    tracing::debug!(%serial, len = der.len(), "issued self-signed certificate");
    Ok(IssuedCertificate { der, serial })
}

/// Issue a self-signed certificate for `key`, valid for `expiry`.
pub fn issue_certificate_der(
    key: &RsaPrivateKey,
    expiry: Duration,
) -> Result<IssuedCertificate, SecurityError> {
    issue_at(key, expiry, Local::now())
}

/// Issue a self-signed certificate and return it as PEM.
pub fn issue_certificate_pem(
    key: &RsaPrivateKey,
    expiry: Duration,
) -> Result<String, SecurityError> {
    let issued = issue_certificate_der(key, expiry)?;
    pem::encode(CERTIFICATE, &issued.der)
}

/// Generate a new key and a certificate for it.
pub fn generate_certificate_der(expiry: Duration) -> Result<GeneratedCertificate, SecurityError> {
    let key = keys::generate_private_key()?;
    let private_der = keys::marshal_legacy_pkcs8(&key)?;
    let issued = issue_certificate_der(&key, expiry)?;
    Ok(GeneratedCertificate {
        private_der,
        certificate_der: issued.der,
        serial: issued.serial,
    })
}

/// Generate a new key and certificate, armoured as `PRIVATE KEY` and
/// `CERTIFICATE` PEM blocks.
pub fn generate_certificate_pem(
    expiry: Duration,
) -> Result<GeneratedCertificatePem, SecurityError> {
    let generated = generate_certificate_der(expiry)?;
    Ok(GeneratedCertificatePem {
        private_pem: pem::encode(PRIVATE_KEY, &generated.private_der)?,
        certificate_pem: pem::encode(CERTIFICATE, &generated.certificate_der)?,
        serial: generated.serial,
    })
}

/// Parse a PEM certificate.
pub fn parse_certificate(cert_pem: &str) -> Result<Certificate, SecurityError> {
    let der = pem::decode_der(cert_pem)?;
    Certificate::from_der(&der).map_err(|e| {
        tracing::error!(error = %e, "certificate parse error");
        cert_err(e)
    })
}

/// Decimal string form of a certificate's serial number.
pub fn serial_string(cert: &Certificate) -> String {
    BigUint::from_bytes_be(cert.tbs_certificate.serial_number.as_bytes()).to_string()
}

/// RSA public key and decimal serial number of a PEM certificate.
pub fn certificate_public_key(cert_pem: &str) -> Result<(RsaPublicKey, String), SecurityError> {
    let cert = parse_certificate(cert_pem)?;
    let spki = cert
        .tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(cert_err)?;
    let public = keys::parse_public_key_der(&spki)?;
    Ok((public, serial_string(&cert)))
}

/// Extract a certificate's public key as a PKIX `PUBLIC KEY` PEM.
pub fn certificate_public_key_pem(cert_pem: &str) -> Result<String, SecurityError> {
    let (public, _) = certificate_public_key(cert_pem)?;
    pem::encode(PUBLIC_KEY, &keys::public_key_der(&public)?)
}

//! Identity derivation.
//!
//! Maps each extracted PEM object to its public-key [`Fingerprint`], and
//! certificates additionally into a [`CertificateRecord`]. The key
//! fingerprint associates certificates with keys and CSRs; subject and
//! issuer names are a separate identity axis used only for chain links
//! and are never conflated with the key fingerprint.

use rsa::RsaPrivateKey;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::{DecodePrivateKey, EncodePublicKey};
use x509_parser::certification_request::X509CertificationRequest;
use x509_parser::prelude::*;

use crate::error::{Error, Result};
use crate::types::{CertificateRecord, DistinguishedName, Fingerprint, PemObject, PemObjectKind};

/// The identity derived from one PEM object.
#[derive(Debug, Clone)]
pub enum Identity {
    /// A private key: its fingerprint and originating path.
    Key {
        /// Fingerprint of the derived public key.
        fingerprint: Fingerprint,
        /// File the key came from.
        path: String,
    },
    /// A certificate signing request. The CSR's stated subject is kept
    /// only as a display-name fallback; the key material alone is
    /// authoritative for identity.
    Csr {
        /// Fingerprint of the embedded public key.
        fingerprint: Fingerprint,
        /// File the CSR came from.
        path: String,
        /// Subject common name, for display fallback only.
        subject_cn: Option<String>,
    },
    /// An X.509 certificate.
    Certificate(CertificateRecord),
}

/// Derives the identity of one extracted object.
///
/// # Errors
///
/// Returns an error when the object cannot yield public-key bytes; the
/// engine downgrades this to a diagnostic and excludes the object from
/// all groupings.
pub fn derive(object: &PemObject) -> Result<Identity> {
    match object.kind {
        PemObjectKind::Key => {
            let spki = key_public_spki(&object.label, &object.der)?;
            Ok(Identity::Key {
                fingerprint: Fingerprint::of_public_key(&spki),
                path: object.source_path.clone(),
            })
        }
        PemObjectKind::CertificateRequest => derive_csr(object),
        PemObjectKind::Certificate => derive_certificate(object).map(Identity::Certificate),
    }
}

fn derive_certificate(object: &PemObject) -> Result<CertificateRecord> {
    let (_, cert) = X509Certificate::from_der(&object.der)
        .map_err(|e| Error::CertificateParse(e.to_string()))?;

    let subject = distinguished_name(cert.subject());
    let issuer = distinguished_name(cert.issuer());
    let self_signed = subject == issuer;

    Ok(CertificateRecord {
        fingerprint: Fingerprint::of_public_key(cert.public_key().raw),
        friendly_name: friendly_name(&cert),
        subject,
        issuer,
        self_signed,
        source_path: object.source_path.clone(),
        der: object.der.clone(),
    })
}

fn derive_csr(object: &PemObject) -> Result<Identity> {
    let (_, csr) = X509CertificationRequest::from_der(&object.der)
        .map_err(|e| Error::CsrParse(e.to_string()))?;
    let info = &csr.certification_request_info;

    Ok(Identity::Csr {
        fingerprint: Fingerprint::of_public_key(info.subject_pki.raw),
        path: object.source_path.clone(),
        subject_cn: common_name(&info.subject),
    })
}

/// Derives the DER-encoded `SubjectPublicKeyInfo` for a private key.
///
/// Supported: RSA (PKCS#1 and PKCS#8) and NIST P-256 (SEC1 and PKCS#8).
/// The re-encoded SPKI is byte-identical to what certificate issuers
/// embed for the same key, so fingerprints line up across object kinds.
fn key_public_spki(label: &str, der: &[u8]) -> Result<Vec<u8>> {
    match label {
        "RSA PRIVATE KEY" => {
            let key = RsaPrivateKey::from_pkcs1_der(der)
                .map_err(|e| Error::KeyDecode(e.to_string()))?;
            rsa_public_spki(&key)
        }
        "EC PRIVATE KEY" => {
            let key = p256::SecretKey::from_sec1_der(der)
                .map_err(|e| Error::KeyDecode(e.to_string()))?;
            ec_public_spki(&key)
        }
        // PKCS#8 wraps any algorithm; try the ones we can derive from.
        _ => {
            if let Ok(key) = RsaPrivateKey::from_pkcs8_der(der) {
                return rsa_public_spki(&key);
            }
            if let Ok(key) = p256::SecretKey::from_pkcs8_der(der) {
                return ec_public_spki(&key);
            }
            Err(Error::UnsupportedKeyAlgorithm(
                "not an RSA or P-256 key".into(),
            ))
        }
    }
}

fn rsa_public_spki(key: &RsaPrivateKey) -> Result<Vec<u8>> {
    let document = key
        .to_public_key()
        .to_public_key_der()
        .map_err(|e| Error::PublicKeyEncode(e.to_string()))?;
    Ok(document.into_vec())
}

fn ec_public_spki(key: &p256::SecretKey) -> Result<Vec<u8>> {
    let document = key
        .public_key()
        .to_public_key_der()
        .map_err(|e| Error::PublicKeyEncode(e.to_string()))?;
    Ok(document.into_vec())
}

fn distinguished_name(name: &X509Name<'_>) -> DistinguishedName {
    DistinguishedName::new(name.as_raw().to_vec(), name.to_string())
}

fn common_name(name: &X509Name<'_>) -> Option<String> {
    name.iter_common_name()
        .next()
        .and_then(|attr| attr.as_str().ok())
        .map(ToString::to_string)
}

/// Resolves the human-friendly name of a certificate: the first
/// non-`www.` SAN DNS entry, else the first SAN DNS entry, else the
/// subject common name.
fn friendly_name(cert: &X509Certificate<'_>) -> Option<String> {
    let mut first_dns = None;
    for ext in cert.extensions() {
        if let ParsedExtension::SubjectAlternativeName(san) = ext.parsed_extension() {
            for general_name in &san.general_names {
                if let GeneralName::DNSName(dns) = general_name {
                    if !dns.starts_with("www.") {
                        return Some((*dns).to_string());
                    }
                    if first_dns.is_none() {
                        first_dns = Some((*dns).to_string());
                    }
                }
            }
        }
    }
    first_dns.or_else(|| common_name(cert.subject()))
}

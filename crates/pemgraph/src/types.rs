//! Core engine types.

use serde::{Serialize, Serializer};

/// Identity fingerprint of a key pair.
///
/// A BLAKE3 hash of the DER-encoded `SubjectPublicKeyInfo`, computed the
/// same way for private keys (after public-key derivation), CSRs, and
/// certificates. Two objects with equal fingerprints represent the same
/// key pair. The value is a pure function of the public-key bytes and
/// never depends on filenames, paths, or input order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Computes the fingerprint of a DER-encoded `SubjectPublicKeyInfo`.
    #[must_use]
    pub fn of_public_key(spki_der: &[u8]) -> Self {
        Self(*blake3::hash(spki_der).as_bytes())
    }

    /// Hex rendition of the fingerprint.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// The kind of object a PEM block declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PemObjectKind {
    /// A private key.
    Key,
    /// A certificate signing request.
    CertificateRequest,
    /// An X.509 certificate.
    Certificate,
}

/// A single typed PEM block extracted from an input file.
///
/// Immutable once parsed; consumed by identity derivation and discarded
/// afterwards — only derived identity is retained downstream.
#[derive(Debug, Clone)]
pub struct PemObject {
    /// What the block's label declared it to be.
    pub kind: PemObjectKind,
    /// Path of the file the block came from.
    pub source_path: String,
    /// The exact PEM label, kept to pick the right key decoder.
    pub label: String,
    /// Decoded DER contents of the block.
    pub der: Vec<u8>,
}

/// A certificate subject or issuer name.
///
/// Matching is on the raw DER bytes of the name; the printable form is
/// kept for display only. Raw-byte equality is stricter than RFC 4517
/// name comparison but deterministic, and it is how issuers encode the
/// names they copy into issued certificates in practice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DistinguishedName {
    raw: Vec<u8>,
    display: String,
}

impl DistinguishedName {
    /// Builds a name from its raw DER bytes and printable form.
    #[must_use]
    pub fn new(raw: Vec<u8>, display: String) -> Self {
        Self { raw, display }
    }

    /// Raw DER bytes of the name, the basis for matching.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

impl std::fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

/// Everything the engine retains about one extracted certificate.
#[derive(Debug, Clone)]
pub struct CertificateRecord {
    /// Fingerprint of the certificate's embedded public key. This is the
    /// axis that associates a certificate with its key/CSR; it is
    /// distinct from the subject/issuer name axis used for chain links.
    pub fingerprint: Fingerprint,
    /// Subject distinguished name, verbatim.
    pub subject: DistinguishedName,
    /// Issuer distinguished name, verbatim.
    pub issuer: DistinguishedName,
    /// Subject equals issuer by raw-byte comparison. Without signature
    /// verification enabled this is a non-cryptographic approximation.
    pub self_signed: bool,
    /// Path of the file the certificate came from.
    pub source_path: String,
    /// DER body, kept for optional signature verification and
    /// content-based deduplication.
    pub(crate) der: Vec<u8>,
    /// Pre-resolved human-friendly name (SAN DNS preferred, then CN).
    pub(crate) friendly_name: Option<String>,
}

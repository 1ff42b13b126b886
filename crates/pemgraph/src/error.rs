//! Engine error types.

use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while deriving identity from a single PEM object.
///
/// None of these abort a run; the engine converts them into
/// per-object [`crate::Diagnostic`] entries and moves on.
#[derive(Debug, Error)]
pub enum Error {
    /// Certificate parsing failed.
    #[error("certificate parsing failed: {0}")]
    CertificateParse(String),

    /// Certificate signing request parsing failed.
    #[error("CSR parsing failed: {0}")]
    CsrParse(String),

    /// Private key decoding failed.
    #[error("private key decoding failed: {0}")]
    KeyDecode(String),

    /// The key algorithm is not one the engine can derive a public key from.
    #[error("unsupported key algorithm: {0}")]
    UnsupportedKeyAlgorithm(String),

    /// Re-encoding a derived public key failed.
    #[error("public key encoding failed: {0}")]
    PublicKeyEncode(String),
}

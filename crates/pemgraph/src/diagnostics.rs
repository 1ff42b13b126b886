//! Non-fatal warning side channel.
//!
//! Every recoverable condition the engine encounters is recorded as a
//! [`Diagnostic`] tagged with the offending path(s), so a user can trace
//! each warning back to a file. Diagnostics never terminate a run.

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// A single non-fatal warning attributable to one or more input paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A PEM block could not be decoded as its declared kind.
    #[error("{path}: unparsable {label} block: {reason}")]
    UnparsableObject {
        /// File the block came from.
        path: String,
        /// The PEM label of the offending block.
        label: String,
        /// Parser error text.
        reason: String,
    },

    /// The traversal collaborator could not read a file.
    #[error("{path}: cannot be read: {reason}")]
    UnreadableFile {
        /// The unreadable file.
        path: String,
        /// I/O error text.
        reason: String,
    },

    /// A key, CSR, or certificate lacked recoverable public-key bytes.
    #[error("{path}: no public key material could be recovered: {reason}")]
    MissingPublicKey {
        /// File the object came from.
        path: String,
        /// Decoder error text.
        reason: String,
    },

    /// A private key uses an algorithm the engine cannot derive a
    /// public key from, or is encrypted.
    #[error("{path}: unsupported private key: {reason}")]
    UnsupportedKey {
        /// File the key came from.
        path: String,
        /// What made the key unusable.
        reason: String,
    },

    /// More than one private key mapped to the same entity.
    #[error("{ignored}: entity already has key {kept}; ignoring")]
    ConflictingKey {
        /// The key that was bound first and is kept.
        kept: String,
        /// The later key that is ignored.
        ignored: String,
    },

    /// More than one CSR mapped to the same entity.
    #[error("{ignored}: entity already has CSR {kept}; ignoring")]
    ConflictingCsr {
        /// The CSR that was bound first and is kept.
        kept: String,
        /// The later CSR that is ignored.
        ignored: String,
    },

    /// Multiple issuer candidates share the same subject name.
    #[error("{candidates} issuer candidates named '{subject}'; using {chosen}")]
    AmbiguousIssuer {
        /// The shared subject name.
        subject: String,
        /// Path of the first-in-input-order candidate that was used.
        chosen: String,
        /// Total number of name-matched candidates.
        candidates: usize,
    },

    /// A name-matched issuer candidate failed signature verification.
    #[error("{path}: name-matched issuer {issuer_path} failed signature verification")]
    SignatureMismatch {
        /// Certificate whose signature was checked.
        path: String,
        /// Rejected issuer candidate.
        issuer_path: String,
    },

    /// The issuer graph looped back on itself; the chain was truncated.
    #[error("{path}: issuer loop detected; chain truncated")]
    CyclicChain {
        /// Certificate at which the loop was detected.
        path: String,
    },

    /// A certificate's content duplicates one already processed.
    #[error("{path}: duplicate of certificate already seen at {first_seen}")]
    DuplicateCertificate {
        /// The duplicate occurrence.
        path: String,
        /// Where the certificate was first seen.
        first_seen: String,
    },
}

/// Accumulator for diagnostics over one engine run.
///
/// Entries are logged through `tracing` as they are recorded and handed
/// to the caller inside the final [`crate::Report`].
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic, logging it as a warning.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    /// Returns the recorded diagnostics.
    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Returns `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Consumes the collector, yielding the recorded diagnostics.
    #[must_use]
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

//! Matching and chain-assembly engine for PEM keys, CSRs, and certificates.
//!
//! Given the contents of a set of files that may contain PEM-encoded
//! private keys, certificate signing requests, and X.509 certificates,
//! this crate reconstructs the logical relationships between them: which
//! key belongs to which CSR, which certificate(s) were issued from that
//! key, and how certificates chain upward through intermediate and root
//! signers. Objects are grouped by cryptographic identity, never by
//! filename or directory, and chains are ordered by issuer/subject
//! relationships, never by file order.
//!
//! # Overview
//!
//! The pipeline:
//! - extraction splits each file into typed PEM blocks, tolerating
//!   concatenated objects and unrelated content;
//! - identity derivation fingerprints every object by its public key
//!   ([`Fingerprint`]) and records certificate subject/issuer names;
//! - grouping collapses keys, CSRs, and certificates sharing a
//!   fingerprint onto one entity;
//! - chain assembly walks issuer links from each leaf certificate until
//!   a self-signed record, a dead end, or a loop.
//!
//! Issuer resolution is distinguished-name matching, not trust
//! validation; [`EngineConfig::verify_signatures`] optionally checks
//! each link cryptographically. Nothing in the engine is fatal: every
//! recoverable condition is reported as a [`Diagnostic`] tagged with the
//! offending path and the run continues.
//!
//! # Example
//!
//! ```no_run
//! use pemgraph::{analyze, EngineConfig, InputFile};
//!
//! let inputs = vec![
//!     InputFile::new("server.key", std::fs::read("server.key").unwrap()),
//!     InputFile::new("server.crt", std::fs::read("server.crt").unwrap()),
//! ];
//! let report = analyze(&inputs, &EngineConfig::default());
//! for entity in &report.entities {
//!     println!("{}", entity.display_name.as_deref().unwrap_or("(unknown)"));
//! }
//! ```
//!
//! # Modules
//!
//! - [`extract`] - PEM object extraction
//! - [`identity`] - fingerprinting and certificate records
//! - [`engine`] - pipeline orchestration
//! - [`report`] - the finalized result model
//! - [`diagnostics`] - the non-fatal warning side channel
//! - [`error`] - per-object error types

pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod extract;
pub mod identity;
pub mod report;
pub mod types;

mod assemble;
mod group;

#[cfg(test)]
pub(crate) mod testpem;

// Re-export commonly used types at crate root
pub use diagnostics::{Diagnostic, Diagnostics};
pub use engine::{EngineConfig, InputFile, analyze};
pub use error::{Error, Result};
pub use report::{CertificateChain, ChainLink, ChainTermination, Entity, Report};
pub use types::{CertificateRecord, DistinguishedName, Fingerprint, PemObject, PemObjectKind};

//! The finalized result model handed to rendering.
//!
//! Everything here is ordered, deduplicated, and read-only: entity order
//! and chain order follow input-encounter order, so two runs over the
//! same inputs produce identical output. The renderer needs no
//! cryptographic fields; chains expose paths, printable subjects, and
//! the self-signed flag only.

use serde::Serialize;

use crate::diagnostics::Diagnostic;
use crate::types::Fingerprint;

/// The complete, finalized output of one engine run.
#[derive(Debug, Serialize)]
pub struct Report {
    /// Entities in deterministic order.
    pub entities: Vec<Entity>,
    /// Every non-fatal warning raised during the run.
    pub diagnostics: Vec<Diagnostic>,
}

/// One logical key pair and everything associated with it.
#[derive(Debug, Serialize)]
pub struct Entity {
    /// Name resolved from the first chain's leaf certificate (SAN DNS
    /// preferred, then CN), falling back to the CSR subject CN. `None`
    /// when nothing named was observed; the renderer supplies a
    /// placeholder.
    pub display_name: Option<String>,
    /// Path of the private key bound to this entity, if one was seen.
    pub key_path: Option<String>,
    /// Path of the CSR bound to this entity, if one was seen.
    pub csr_path: Option<String>,
    /// The public-key fingerprint the entity groups by.
    pub fingerprint: Fingerprint,
    /// Certificate chains, one per leaf certificate, in input order.
    pub chains: Vec<CertificateChain>,
}

/// An ordered signer chain. Index 0 is always the leaf.
#[derive(Debug, Serialize)]
pub struct CertificateChain {
    /// Leaf first, each following link the issuer of the previous one.
    pub links: Vec<ChainLink>,
    /// Why the walk stopped.
    pub termination: ChainTermination,
}

/// One certificate's place in a chain.
#[derive(Debug, Serialize)]
pub struct ChainLink {
    /// File the certificate came from.
    pub source_path: String,
    /// Printable subject name.
    pub subject: String,
    /// True only on a terminal, self-signed link.
    pub self_signed: bool,
}

/// How a chain walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainTermination {
    /// The walk reached a self-signed certificate.
    SelfSigned,
    /// No certificate among the inputs names the last link's issuer.
    /// Expected when a leaf is supplied without its issuing chain.
    IssuerNotFound,
    /// The issuer graph looped back on itself; the chain was truncated.
    Cyclic,
}

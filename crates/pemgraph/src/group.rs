//! Grouping of fingerprinted objects into entities.
//!
//! Runs after all extraction and derivation has finished: grouping needs
//! the global view of every fingerprint and name, so this phase is the
//! single-threaded barrier of the pipeline. The fingerprint → entity map
//! is owned here and handed on to chain assembly; there is no ambient
//! state.

use std::collections::HashMap;

use tracing::debug;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::identity::Identity;
use crate::types::{CertificateRecord, Fingerprint};

/// One entity under construction: a real-world key pair and everything
/// observed for it.
#[derive(Debug)]
pub(crate) struct EntitySlot {
    /// The key-pair identity this slot groups by.
    pub fingerprint: Fingerprint,
    /// First key bound to the fingerprint, if any.
    pub key_path: Option<String>,
    /// First CSR bound to the fingerprint, if any.
    pub csr_path: Option<String>,
    /// Subject CN of the bound CSR, display-name fallback.
    pub csr_name: Option<String>,
    /// Indices into the certificate pool of this entity's leaf
    /// candidates, in input order.
    pub leaves: Vec<usize>,
}

impl EntitySlot {
    fn new(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint,
            key_path: None,
            csr_path: None,
            csr_name: None,
            leaves: Vec::new(),
        }
    }
}

/// Output of the grouping phase: entities in deterministic order plus
/// the full certificate pool chain assembly searches for issuers.
#[derive(Debug)]
pub(crate) struct Grouping {
    /// Entities in creation order: key/CSR entities in input order
    /// first, then standalone certificate entities in input order.
    pub entities: Vec<EntitySlot>,
    /// Every deduplicated certificate record, in input order.
    pub pool: Vec<CertificateRecord>,
}

/// Clusters derived identities into entities.
///
/// Keys and CSRs sharing a fingerprint collapse onto one entity with a
/// first-wins policy; later conflicting bindings are reported and never
/// overwrite an earlier one. Certificates attach as leaf candidates to
/// the entity with their fingerprint, or found a standalone entity when
/// no key or CSR matches (the case of a CA certificate passed directly
/// as an input root).
pub(crate) fn group(identities: Vec<Identity>, diagnostics: &mut Diagnostics) -> Grouping {
    let mut entities: Vec<EntitySlot> = Vec::new();
    let mut by_fingerprint: HashMap<Fingerprint, usize> = HashMap::new();
    let mut certificates: Vec<CertificateRecord> = Vec::new();

    // First pass: bind every key and CSR. All of them must be known
    // before any certificate decides whether it is standalone.
    for identity in identities {
        match identity {
            Identity::Key { fingerprint, path } => {
                let slot = slot_for(&mut entities, &mut by_fingerprint, fingerprint);
                match &slot.key_path {
                    None => slot.key_path = Some(path),
                    Some(kept) => diagnostics.push(Diagnostic::ConflictingKey {
                        kept: kept.clone(),
                        ignored: path,
                    }),
                }
            }
            Identity::Csr {
                fingerprint,
                path,
                subject_cn,
            } => {
                let slot = slot_for(&mut entities, &mut by_fingerprint, fingerprint);
                match &slot.csr_path {
                    None => {
                        slot.csr_path = Some(path);
                        slot.csr_name = subject_cn;
                    }
                    Some(kept) => diagnostics.push(Diagnostic::ConflictingCsr {
                        kept: kept.clone(),
                        ignored: path,
                    }),
                }
            }
            Identity::Certificate(record) => certificates.push(record),
        }
    }

    // Second pass: pool certificates (content-deduplicated) and attach
    // leaf candidates.
    let mut pool: Vec<CertificateRecord> = Vec::new();
    let mut seen_content: HashMap<[u8; 32], usize> = HashMap::new();

    for record in certificates {
        let content_hash = *blake3::hash(&record.der).as_bytes();
        if let Some(&first) = seen_content.get(&content_hash) {
            diagnostics.push(Diagnostic::DuplicateCertificate {
                path: record.source_path,
                first_seen: pool[first].source_path.clone(),
            });
            continue;
        }

        let index = pool.len();
        seen_content.insert(content_hash, index);

        if let Some(&entity_index) = by_fingerprint.get(&record.fingerprint) {
            entities[entity_index].leaves.push(index);
        } else {
            // No key or CSR claims this key pair; the certificate
            // becomes its own display-only entity.
            debug!(
                "{}: no matching key or CSR, standalone entity",
                record.source_path
            );
            let slot = slot_for(&mut entities, &mut by_fingerprint, record.fingerprint);
            slot.leaves.push(index);
        }
        pool.push(record);
    }

    Grouping { entities, pool }
}

fn slot_for<'a>(
    entities: &'a mut Vec<EntitySlot>,
    by_fingerprint: &mut HashMap<Fingerprint, usize>,
    fingerprint: Fingerprint,
) -> &'a mut EntitySlot {
    let index = *by_fingerprint.entry(fingerprint).or_insert_with(|| {
        entities.push(EntitySlot::new(fingerprint));
        entities.len() - 1
    });
    &mut entities[index]
}

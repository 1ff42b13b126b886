//! Chain assembly.
//!
//! For each entity, walks issuer links from every leaf candidate until a
//! self-signed certificate is reached, no issuer can be found among the
//! inputs, or the graph loops. Issuer resolution is by raw
//! distinguished-name equality between a certificate's issuer and a
//! candidate's subject — name matching, not trust: enabling
//! [`EngineConfig::verify_signatures`] additionally checks each link's
//! signature against the candidate's public key.

use tracing::debug;
use x509_parser::prelude::*;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::engine::EngineConfig;
use crate::group::{EntitySlot, Grouping};
use crate::report::{CertificateChain, ChainLink, ChainTermination, Entity};
use crate::types::CertificateRecord;

/// Assembles the final entities from a grouping.
pub(crate) fn assemble(
    grouping: Grouping,
    config: &EngineConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<Entity> {
    let Grouping { entities, pool } = grouping;
    entities
        .into_iter()
        .map(|slot| assemble_entity(slot, &pool, config, diagnostics))
        .collect()
}

fn assemble_entity(
    slot: EntitySlot,
    pool: &[CertificateRecord],
    config: &EngineConfig,
    diagnostics: &mut Diagnostics,
) -> Entity {
    let chains: Vec<CertificateChain> = slot
        .leaves
        .iter()
        .map(|&leaf| walk_chain(leaf, pool, config, diagnostics))
        .collect();

    // Display name comes from the first leaf certificate, then the CSR.
    let display_name = slot
        .leaves
        .first()
        .and_then(|&leaf| pool[leaf].friendly_name.clone())
        .or(slot.csr_name);

    Entity {
        display_name,
        key_path: slot.key_path,
        csr_path: slot.csr_path,
        fingerprint: slot.fingerprint,
        chains,
    }
}

/// Walks issuer links starting from one leaf, building one chain.
fn walk_chain(
    leaf: usize,
    pool: &[CertificateRecord],
    config: &EngineConfig,
    diagnostics: &mut Diagnostics,
) -> CertificateChain {
    let mut indices = vec![leaf];
    let termination = loop {
        let current = *indices.last().unwrap_or(&leaf);
        let record = &pool[current];

        if is_self_signed(record, config) {
            break ChainTermination::SelfSigned;
        }

        let candidates = issuer_candidates(current, pool, config, diagnostics);
        let Some(&next) = candidates.first() else {
            debug!("{}: issuer not found among inputs", record.source_path);
            break ChainTermination::IssuerNotFound;
        };
        if candidates.len() > 1 {
            diagnostics.push(Diagnostic::AmbiguousIssuer {
                subject: record.issuer.to_string(),
                chosen: pool[next].source_path.clone(),
                candidates: candidates.len(),
            });
        }
        if indices.contains(&next) {
            diagnostics.push(Diagnostic::CyclicChain {
                path: record.source_path.clone(),
            });
            break ChainTermination::Cyclic;
        }
        indices.push(next);
    };

    let last = indices.len() - 1;
    let links = indices
        .iter()
        .enumerate()
        .map(|(position, &index)| {
            let record = &pool[index];
            ChainLink {
                source_path: record.source_path.clone(),
                subject: record.subject.to_string(),
                self_signed: position == last && termination == ChainTermination::SelfSigned,
            }
        })
        .collect();

    CertificateChain { links, termination }
}

/// Finds the pool indices whose subject matches `current`'s issuer, in
/// input order. With signature verification enabled, name-matched
/// candidates that fail verification are reported and dropped.
fn issuer_candidates(
    current: usize,
    pool: &[CertificateRecord],
    config: &EngineConfig,
    diagnostics: &mut Diagnostics,
) -> Vec<usize> {
    let record = &pool[current];
    let mut matches = Vec::new();
    for (index, candidate) in pool.iter().enumerate() {
        if index == current || candidate.subject != record.issuer {
            continue;
        }
        if config.verify_signatures && !signature_checks_out(&record.der, Some(&candidate.der)) {
            diagnostics.push(Diagnostic::SignatureMismatch {
                path: record.source_path.clone(),
                issuer_path: candidate.source_path.clone(),
            });
            continue;
        }
        matches.push(index);
    }
    matches
}

fn is_self_signed(record: &CertificateRecord, config: &EngineConfig) -> bool {
    if !record.self_signed {
        return false;
    }
    !config.verify_signatures || signature_checks_out(&record.der, None)
}

/// Verifies a certificate's signature against an issuer's public key,
/// or against its own when `issuer_der` is `None`.
fn signature_checks_out(cert_der: &[u8], issuer_der: Option<&[u8]>) -> bool {
    let Ok((_, cert)) = X509Certificate::from_der(cert_der) else {
        return false;
    };
    match issuer_der {
        None => cert.verify_signature(None).is_ok(),
        Some(der) => {
            let Ok((_, issuer)) = X509Certificate::from_der(der) else {
                return false;
            };
            cert.verify_signature(Some(issuer.public_key())).is_ok()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::extract::extract;
    use crate::group::group;
    use crate::identity;
    use crate::testpem;

    fn grouped(files: &[(&str, &str)]) -> (Grouping, Diagnostics) {
        let mut diags = Diagnostics::new();
        let mut identities = Vec::new();
        for (path, pem) in files {
            for object in extract(path, pem.as_bytes(), &mut diags) {
                identities.push(identity::derive(&object).expect("derivable"));
            }
        }
        (group(identities, &mut diags), diags)
    }

    #[test]
    fn self_signed_leaf_yields_chain_of_length_one() {
        let material = testpem::self_signed("example.org");
        let (grouping, mut diags) = grouped(&[
            ("a.key", &material.key_pem),
            ("a.crt", &material.cert_pem),
        ]);
        let entities = assemble(grouping, &EngineConfig::default(), &mut diags);

        assert_eq!(entities.len(), 1);
        let chain = &entities[0].chains[0];
        assert_eq!(chain.links.len(), 1);
        assert_eq!(chain.termination, ChainTermination::SelfSigned);
        assert!(chain.links[0].self_signed);
    }

    #[test]
    fn chain_walks_through_intermediate_to_self_signed_root() {
        let issued = testpem::issued("leaf.example", &["Intermediate CA", "Root CA"]);
        let (grouping, mut diags) = grouped(&[
            ("leaf.key", &issued.leaf.key_pem),
            ("leaf.crt", &issued.leaf.cert_pem),
            ("intermediate.crt", &issued.issuer_certs[0]),
            ("root.crt", &issued.issuer_certs[1]),
        ]);
        let entities = assemble(grouping, &EngineConfig::default(), &mut diags);

        let leaf_entity = &entities[0];
        assert!(leaf_entity.key_path.is_some());
        let chain = &leaf_entity.chains[0];
        let paths: Vec<&str> = chain.links.iter().map(|l| l.source_path.as_str()).collect();
        assert_eq!(paths, ["leaf.crt", "intermediate.crt", "root.crt"]);
        assert_eq!(chain.termination, ChainTermination::SelfSigned);
        assert!(chain.links[2].self_signed);
        assert!(!chain.links[0].self_signed);
    }

    #[test]
    fn missing_issuer_terminates_chain_incomplete() {
        let issued = testpem::issued("leaf.example", &["Absent CA"]);
        let (grouping, mut diags) = grouped(&[
            ("leaf.key", &issued.leaf.key_pem),
            ("leaf.crt", &issued.leaf.cert_pem),
        ]);
        let entities = assemble(grouping, &EngineConfig::default(), &mut diags);

        let chain = &entities[0].chains[0];
        assert_eq!(chain.links.len(), 1);
        assert_eq!(chain.termination, ChainTermination::IssuerNotFound);
        assert!(!chain.links[0].self_signed);
        assert!(diags.is_empty());
    }

    #[test]
    fn ambiguous_issuer_takes_first_in_input_order_with_warning() {
        let issued = testpem::issued("leaf.example", &["Reissued CA"]);
        // A second, different CA certificate carrying the same subject
        // name as the real issuer.
        let imposter = testpem::issued("unused.example", &["Reissued CA"]);
        let (grouping, mut diags) = grouped(&[
            ("leaf.key", &issued.leaf.key_pem),
            ("leaf.crt", &issued.leaf.cert_pem),
            ("ca-a.crt", &issued.issuer_certs[0]),
            ("ca-b.crt", &imposter.issuer_certs[0]),
        ]);
        let entities = assemble(grouping, &EngineConfig::default(), &mut diags);

        let chain = &entities[0].chains[0];
        assert_eq!(chain.links[1].source_path, "ca-a.crt");
        assert!(diags.entries().iter().any(|d| matches!(
            d,
            Diagnostic::AmbiguousIssuer { chosen, candidates: 2, .. } if chosen == "ca-a.crt"
        )));
    }

    #[test]
    fn verification_rejects_name_matched_imposter() {
        let issued = testpem::issued("leaf.example", &["Reissued CA"]);
        let imposter = testpem::issued("unused.example", &["Reissued CA"]);
        // Only the imposter is supplied; with verification on, the name
        // match is rejected and the chain stays incomplete.
        let (grouping, mut diags) = grouped(&[
            ("leaf.key", &issued.leaf.key_pem),
            ("leaf.crt", &issued.leaf.cert_pem),
            ("ca-b.crt", &imposter.issuer_certs[0]),
        ]);
        let config = EngineConfig {
            verify_signatures: true,
        };
        let entities = assemble(grouping, &config, &mut diags);

        let leaf_entity = entities
            .iter()
            .find(|e| e.key_path.is_some())
            .expect("leaf entity");
        assert_eq!(leaf_entity.chains[0].links.len(), 1);
        assert_eq!(
            leaf_entity.chains[0].termination,
            ChainTermination::IssuerNotFound
        );
        assert!(diags.entries().iter().any(|d| matches!(
            d,
            Diagnostic::SignatureMismatch { issuer_path, .. } if issuer_path == "ca-b.crt"
        )));
    }

    #[test]
    fn verification_accepts_genuine_chain() {
        let issued = testpem::issued("leaf.example", &["Intermediate CA", "Root CA"]);
        let (grouping, mut diags) = grouped(&[
            ("leaf.key", &issued.leaf.key_pem),
            ("leaf.crt", &issued.leaf.cert_pem),
            ("intermediate.crt", &issued.issuer_certs[0]),
            ("root.crt", &issued.issuer_certs[1]),
        ]);
        let config = EngineConfig {
            verify_signatures: true,
        };
        let entities = assemble(grouping, &config, &mut diags);

        let chain = &entities[0].chains[0];
        assert_eq!(chain.links.len(), 3);
        assert_eq!(chain.termination, ChainTermination::SelfSigned);
    }

    #[test]
    fn mutually_referencing_certificates_terminate_cyclic() {
        let (cert_a, cert_b) = testpem::mutual_loop("Loop A", "Loop B");
        let (grouping, mut diags) = grouped(&[("a.crt", &cert_a), ("b.crt", &cert_b)]);
        let entities = assemble(grouping, &EngineConfig::default(), &mut diags);

        let chain = &entities[0].chains[0];
        assert!(chain.links.len() <= 2);
        assert_eq!(chain.termination, ChainTermination::Cyclic);
        assert!(
            diags
                .entries()
                .iter()
                .any(|d| matches!(d, Diagnostic::CyclicChain { .. }))
        );
    }

    #[test]
    fn display_name_falls_back_to_csr_subject() {
        let material = testpem::self_signed("pending.example");
        let (grouping, mut diags) = grouped(&[
            ("pending.key", &material.key_pem),
            ("pending.csr", &material.csr_pem),
        ]);
        let entities = assemble(grouping, &EngineConfig::default(), &mut diags);

        assert_eq!(entities[0].display_name.as_deref(), Some("pending.example"));
        assert!(entities[0].chains.is_empty());
    }
}

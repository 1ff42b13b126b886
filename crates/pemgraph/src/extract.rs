//! PEM object extraction.
//!
//! Splits raw file bytes into zero or more typed PEM blocks. A file may
//! legitimately hold several concatenated objects (a key followed by its
//! certificate is a common packaging pattern); every block is extracted
//! separately and keeps the originating path. A failure inside one file
//! never aborts processing of the others.

use tracing::debug;
use x509_parser::pem::Pem;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::types::{PemObject, PemObjectKind};

const PEM_BEGIN_MARKER: &[u8] = b"-----BEGIN";

/// Extracts all recognized PEM objects from one file's bytes.
///
/// Files without any PEM begin marker are skipped silently: directory
/// scans routinely hand the engine READMEs and binaries, and warning on
/// each would drown the diagnostics that matter. A block that carries a
/// marker but fails to decode is reported and extraction of that file
/// stops at the broken block.
pub fn extract(path: &str, contents: &[u8], diagnostics: &mut Diagnostics) -> Vec<PemObject> {
    if !contains_begin_marker(contents) {
        debug!("{path}: no PEM content, skipping");
        return Vec::new();
    }

    let mut objects = Vec::new();
    for block in Pem::iter_from_buffer(contents) {
        let pem = match block {
            Ok(pem) => pem,
            Err(e) => {
                diagnostics.push(Diagnostic::UnparsableObject {
                    path: path.to_string(),
                    label: "PEM".into(),
                    reason: e.to_string(),
                });
                break;
            }
        };
        match classify_label(&pem.label) {
            Some(kind) => objects.push(PemObject {
                kind,
                source_path: path.to_string(),
                label: pem.label,
                der: pem.contents,
            }),
            None if pem.label == "ENCRYPTED PRIVATE KEY" => {
                diagnostics.push(Diagnostic::UnsupportedKey {
                    path: path.to_string(),
                    reason: "key is encrypted".into(),
                });
            }
            None => debug!("{path}: skipping unrelated {} block", pem.label),
        }
    }
    objects
}

fn contains_begin_marker(contents: &[u8]) -> bool {
    contents
        .windows(PEM_BEGIN_MARKER.len())
        .any(|window| window == PEM_BEGIN_MARKER)
}

fn classify_label(label: &str) -> Option<PemObjectKind> {
    match label {
        "CERTIFICATE" => Some(PemObjectKind::Certificate),
        "CERTIFICATE REQUEST" | "NEW CERTIFICATE REQUEST" => {
            Some(PemObjectKind::CertificateRequest)
        }
        "PRIVATE KEY" | "RSA PRIVATE KEY" | "EC PRIVATE KEY" => Some(PemObjectKind::Key),
        _ => None,
    }
}

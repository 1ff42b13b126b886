//! Test-only PEM material generation backed by rcgen.

use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};

/// One key pair with its CSR and certificate, all PEM-encoded.
pub struct Leaf {
    /// PKCS#8 private key.
    pub key_pem: String,
    /// Certificate signing request for the key.
    pub csr_pem: String,
    /// Certificate for the key.
    pub cert_pem: String,
}

/// A leaf issued by a CA hierarchy.
pub struct Issued {
    /// The issued leaf material.
    pub leaf: Leaf,
    /// Issuer certificates, leaf-side first, root (self-signed) last.
    pub issuer_certs: Vec<String>,
}

/// Generates a self-signed leaf whose CN doubles as its only SAN.
pub fn self_signed(cn: &str) -> Leaf {
    self_signed_with_sans(cn, &[cn])
}

/// Generates a self-signed leaf with an explicit SAN list.
pub fn self_signed_with_sans(cn: &str, sans: &[&str]) -> Leaf {
    let key = KeyPair::generate().expect("generate key pair");
    let params = leaf_params(cn, sans);
    let csr_pem = params
        .serialize_request(&key)
        .expect("serialize CSR")
        .pem()
        .expect("encode CSR");
    let cert = params.self_signed(&key).expect("self-sign certificate");
    Leaf {
        key_pem: key.serialize_pem(),
        csr_pem,
        cert_pem: cert.pem(),
    }
}

/// Generates a CA hierarchy and a leaf issued by it.
///
/// `ca_cns` is ordered leaf-side first; the last entry becomes the
/// self-signed root. Must not be empty.
pub fn issued(leaf_cn: &str, ca_cns: &[&str]) -> Issued {
    assert!(!ca_cns.is_empty(), "need at least one CA");

    // Build from the root down so each CA can sign the next.
    let mut authorities: Vec<(rcgen::Certificate, KeyPair)> = Vec::new();
    for cn in ca_cns.iter().rev() {
        let key = KeyPair::generate().expect("generate CA key");
        let params = ca_params(cn);
        let cert = if let Some((parent_cert, parent_key)) = authorities.last() {
            params
                .signed_by(&key, parent_cert, parent_key)
                .expect("sign intermediate CA")
        } else {
            params.self_signed(&key).expect("self-sign root CA")
        };
        authorities.push((cert, key));
    }

    let leaf_key = KeyPair::generate().expect("generate leaf key");
    let params = leaf_params(leaf_cn, &[leaf_cn]);
    let csr_pem = params
        .serialize_request(&leaf_key)
        .expect("serialize CSR")
        .pem()
        .expect("encode CSR");
    let (signer_cert, signer_key) = authorities.last().expect("at least one CA");
    let leaf_cert = params
        .signed_by(&leaf_key, signer_cert, signer_key)
        .expect("sign leaf certificate");

    Issued {
        leaf: Leaf {
            key_pem: leaf_key.serialize_pem(),
            csr_pem,
            cert_pem: leaf_cert.pem(),
        },
        issuer_certs: authorities
            .iter()
            .rev()
            .map(|(cert, _)| cert.pem())
            .collect(),
    }
}

/// Generates two certificates that name each other as issuer, a
/// synthetic subject/issuer loop. Returns `(cert_a_pem, cert_b_pem)`.
pub fn mutual_loop(cn_a: &str, cn_b: &str) -> (String, String) {
    let key_a = KeyPair::generate().expect("generate key a");
    let key_b = KeyPair::generate().expect("generate key b");

    // A discarded seed certificate lets b claim a as issuer before a
    // itself is reissued under b.
    let seed_a = ca_params(cn_a).self_signed(&key_a).expect("seed certificate");
    let cert_b = ca_params(cn_b)
        .signed_by(&key_b, &seed_a, &key_a)
        .expect("sign b under a");
    let cert_a = ca_params(cn_a)
        .signed_by(&key_a, &cert_b, &key_b)
        .expect("sign a under b");

    (cert_a.pem(), cert_b.pem())
}

/// Generates one key and two certificates for it, as after a renewal.
/// Returns `(key_pem, older_cert_pem, newer_cert_pem)`.
pub fn renewed(cn: &str) -> (String, String, String) {
    let key = KeyPair::generate().expect("generate key pair");
    let older = leaf_params(cn, &[cn])
        .self_signed(&key)
        .expect("sign older certificate");
    let newer = leaf_params(cn, &[cn])
        .self_signed(&key)
        .expect("sign newer certificate");
    (key.serialize_pem(), older.pem(), newer.pem())
}

fn ca_params(cn: &str) -> CertificateParams {
    let mut params = CertificateParams::default();
    params.distinguished_name.push(DnType::CommonName, cn);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params
}

fn leaf_params(cn: &str, sans: &[&str]) -> CertificateParams {
    let san_strings: Vec<String> = sans.iter().map(ToString::to_string).collect();
    let mut params = CertificateParams::new(san_strings).expect("valid SANs");
    params.distinguished_name.push(DnType::CommonName, cn);
    params
}

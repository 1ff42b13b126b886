//! Output rendering for the tree, one-line, and JSON formats.

use std::io::Write;

use pemgraph::{CertificateChain, ChainTermination, Entity, Report};

use crate::cli::Format;
use crate::error::CliError;

/// Placeholder for entities whose name could not be resolved.
const UNKNOWN_NAME: &str = "(unknown)";

/// Render the report in the requested format.
pub fn render(
    out: &mut impl Write,
    report: &Report,
    format: Format,
    no_header: bool,
) -> Result<(), CliError> {
    match format {
        Format::Tree => tree(out, report)?,
        Format::Oneline => oneline(out, report, no_header)?,
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Indented block per entity.
fn tree(out: &mut impl Write, report: &Report) -> std::io::Result<()> {
    for entity in &report.entities {
        writeln!(out, "{}", display_name(entity))?;
        writeln!(out, "  * Key: {}", entity.key_path.as_deref().unwrap_or("n/a"))?;
        writeln!(out, "  * CSR: {}", entity.csr_path.as_deref().unwrap_or("n/a"))?;

        if entity.chains.is_empty() {
            writeln!(out, "  * Certificates: n/a")?;
            continue;
        }

        writeln!(out, "  * Certificates:")?;
        for chain in &entity.chains {
            let mut indentation = 4;
            for (position, link) in chain.links.iter().enumerate() {
                let last = position + 1 == chain.links.len();
                let bullet = if position == 0 { '-' } else { '>' };
                let marker = if last { termination_marker(chain) } else { "" };
                writeln!(
                    out,
                    "{:indentation$}{bullet} {}{marker}",
                    "",
                    link.source_path,
                )?;
                indentation += 2;
            }
        }
    }
    Ok(())
}

/// One space-separated line per entity, chains pipe-joined.
fn oneline(out: &mut impl Write, report: &Report, no_header: bool) -> std::io::Result<()> {
    if !no_header {
        writeln!(out, "name key request certificate_chain")?;
    }

    for entity in &report.entities {
        write!(out, "{}", display_name(entity))?;
        write!(out, " {}", entity.key_path.as_deref().unwrap_or("-"))?;
        write!(out, " {}", entity.csr_path.as_deref().unwrap_or("-"))?;

        if entity.chains.is_empty() {
            writeln!(out, " -")?;
            continue;
        }

        for chain in &entity.chains {
            let joined: Vec<&str> = chain.links.iter().map(|l| l.source_path.as_str()).collect();
            write!(out, " {}", joined.join("|"))?;
            let marker = termination_marker(chain);
            if !marker.is_empty() {
                // The marker joins the chain as a pseudo-link.
                write!(out, "|{}", marker.trim_start())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

fn display_name(entity: &Entity) -> &str {
    entity.display_name.as_deref().unwrap_or(UNKNOWN_NAME)
}

fn termination_marker(chain: &CertificateChain) -> &'static str {
    match chain.termination {
        ChainTermination::SelfSigned => " (self-signed)",
        ChainTermination::IssuerNotFound => " (issuer not found)",
        ChainTermination::Cyclic => " (cycle detected)",
    }
}

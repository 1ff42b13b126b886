//! pemgraph binary entrypoint.

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use pemgraph::{EngineConfig, InputFile, analyze};
use tracing_subscriber::EnvFilter;

use pemgraph_cli::cli::Cli;
use pemgraph_cli::render::render;
use pemgraph_cli::walk::{self, WalkOptions};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let files = walk::collect(&cli.paths, &WalkOptions::from(cli))?;

    let inputs: Vec<InputFile> = files
        .iter()
        .map(|path| {
            let name = path.display().to_string();
            match std::fs::read(path) {
                Ok(contents) => InputFile::new(name, contents),
                Err(e) => InputFile::unreadable(name, e.to_string()),
            }
        })
        .collect();

    let config = EngineConfig {
        verify_signatures: cli.verify,
    };
    let report = analyze(&inputs, &config);

    let mut stdout = io::stdout().lock();
    render(&mut stdout, &report, cli.format, cli.no_header)?;
    Ok(())
}

use anyhow::Context;
use clap::Parser;
use configen::Orchestrator;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Translate a tree of configure.json documents into generated
/// configure.cmake scripts.
#[derive(Parser)]
#[command(name = "configen", version, about)]
struct Cli {
    /// Root directory holding the top-level configure.json
    root: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli.root) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run(root: &Path) -> anyhow::Result<()> {
    let mut orchestrator = Orchestrator::new();
    orchestrator
        .run(root)
        .with_context(|| format!("processing {}", root.display()))
}

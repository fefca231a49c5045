//! `dbmap-codegen` — generate data-access code from a JSON component schema.
//!
//! Usage:
//!   dbmap-codegen --input schema.json --output src/generated
//!
//! One run reads one schema document and writes one generated unit named
//! after the input file stem. Structural diagnostics are logged and the run
//! continues where possible; a sink error aborts the run.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use dbmap_codegen::{generate_unit, loader};

/// Component schema code generator.
#[derive(Parser, Debug)]
#[command(
    name = "dbmap-codegen",
    about = "Generate value types and in-memory repositories from a JSON component schema"
)]
struct Cli {
    /// Input JSON schema document.
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for the generated unit.
    #[arg(short, long)]
    output: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_target(false).init();
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("reading schema {}", cli.input.display()))?;
    let tree: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing schema {}", cli.input.display()))?;

    let (components, schema_errors) = loader::load_schema(&tree);
    for err in &schema_errors {
        warn!("{}", err);
    }
    info!("loaded {} component(s)", components.len());

    let (unit, gen_errors) = generate_unit(&components);
    for err in &gen_errors {
        warn!("{}", err);
    }

    let stem = cli
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("generated");
    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("creating output directory {}", cli.output.display()))?;
    let path = cli.output.join(format!("{stem}.rs"));
    std::fs::write(&path, unit).with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());

    Ok(())
}

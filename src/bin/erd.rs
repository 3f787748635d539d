use anyhow::{Context, Result};
use clap::Parser;
use domainmesh::export::mermaid_from_relationships;
use domainmesh::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "erd")]
#[command(about = "Render relationship text as a Mermaid ERD")]
struct Args {
    /// Relationship text file (defaults to paths.relationships_txt)
    #[arg(short, long)]
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let input = args.input.unwrap_or_else(|| config.paths.relationships_txt.clone());
    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    log::info!("Read {} lines from {}", content.lines().count(), input.display());

    let mermaid = mermaid_from_relationships(&content);

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "relationships".to_string());
    std::fs::create_dir_all(&config.paths.erd_dir)?;
    let output = config.paths.erd_dir.join(format!("{}.mmd", stem));
    std::fs::write(&output, mermaid)?;
    log::info!("ERD saved to {}", output.display());

    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use domainmesh::generate::{build_prompt, read_source_catalog, RelationshipGenerator};
use domainmesh::triples::{parse_relationship_lines, write_triples};
use domainmesh::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "relationships")]
#[command(about = "Generate entity-relationship triples from a source catalog")]
struct Args {
    /// Catalog XML (defaults to paths.catalog_xml)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Print the prompt and exit without calling the model
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let catalog_path = args.catalog.unwrap_or_else(|| config.paths.catalog_xml.clone());
    log::info!("Reading catalog {}", catalog_path.display());
    let content = std::fs::read_to_string(&catalog_path)
        .with_context(|| format!("Failed to read {}", catalog_path.display()))?;
    let sources = read_source_catalog(&content)?;
    if sources.is_empty() {
        anyhow::bail!("No sources with a data owner in {}", catalog_path.display());
    }

    let prompt = build_prompt(&sources);
    if args.dry_run {
        println!("{}", prompt);
        return Ok(());
    }

    let api_key = std::env::var(&config.generation.api_key_env)
        .map_err(|_| anyhow::anyhow!(
            "Environment variable {} not set. Set it in your .env file or as an environment variable.",
            config.generation.api_key_env
        ))?;
    let generator = RelationshipGenerator::new(api_key, &config.generation)?;

    log::info!("Requesting relationships for {} sources from {}", sources.len(), config.generation.model);
    let text = generator.generate(&prompt).await?;

    let txt_path = &config.paths.relationships_txt;
    if let Some(parent) = txt_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(txt_path, &text)?;
    log::info!("Relationships saved to {}", txt_path.display());

    let triples = parse_relationship_lines(&text);
    write_triples(&config.paths.triples_csv, &triples)?;
    log::info!("Wrote {} triples to {}", triples.len(), config.paths.triples_csv.display());

    Ok(())
}

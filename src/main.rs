use anyhow::{Context, Result};
use clap::Parser;
use domainmesh::triples::{read_triples, write_domains};
use domainmesh::{identify_domains, Config, PipelineSettings};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "domainmesh")]
#[command(about = "Group entity-relationship triples into named business domains")]
struct Args {
    /// Triple CSV to read (defaults to paths.triples_csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Domain table to write (defaults to paths.output_dir/paths.domains_file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the clustering seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let input = args.input.unwrap_or_else(|| config.paths.triples_csv.clone());
    let output = args.output.unwrap_or_else(|| config.domains_path());

    let mut settings = PipelineSettings::from(&config);
    if let Some(seed) = args.seed {
        settings.clustering.seed = seed;
    }

    log::info!("Reading triples from {}", input.display());
    let triples = read_triples(&input)
        .with_context(|| format!("Failed to read triples from {}", input.display()))?;

    let start = Instant::now();
    let records = identify_domains(&triples, &settings)?;
    log::info!("Domain identification took {:?}", start.elapsed());

    write_domains(&output, &records)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    log::info!("Wrote {} rows to {}", records.len(), output.display());

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in &records {
        *counts.entry(record.domain_name.as_str()).or_default() += 1;
    }
    println!("\n=== Domains ({}) ===\n", counts.len());
    for (domain, count) in counts {
        println!("{:<40} {:>6} triples", domain, count);
    }

    Ok(())
}

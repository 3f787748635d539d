use anyhow::{Context, Result};
use clap::Parser;
use domainmesh::export::DomainGraph;
use domainmesh::triples::read_domain_table;
use domainmesh::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "domain_graph")]
#[command(about = "Report which domains share entities")]
struct Args {
    /// Domain table (defaults to paths.output_dir/paths.domains_file)
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

    let input = args.input.unwrap_or_else(|| config.domains_path());
    let records = read_domain_table(&input)
        .with_context(|| format!("Failed to read domain table {}", input.display()))?;
    log::info!("Read {} domain rows from {}", records.len(), input.display());

    let graph = DomainGraph::from_records(&records);

    let output_dir = &config.paths.output_dir;
    std::fs::create_dir_all(output_dir)?;
    let report_path = output_dir.join("domain_relationships.txt");
    let mermaid_path = output_dir.join("domain_relationships.mmd");
    std::fs::write(&report_path, graph.report())?;
    std::fs::write(&mermaid_path, graph.mermaid())?;

    println!(
        "{} domains, {} shared-entity links",
        graph.domains().len(),
        graph.edges().len()
    );
    log::info!("Saved {} and {}", report_path.display(), mermaid_path.display());

    Ok(())
}

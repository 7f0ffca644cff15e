//! bipscope CLI
//!
//! Command-line interface for the BIP analytics pipeline:
//! - Building the dashboard payloads from a corpus of proposal JSON exports
//! - Printing corpus statistics without writing anything

use anyhow::{Context, Result};
use bipscope_graph::{
    build_category_flow, build_network, counts_per_layer, counts_per_year, distinct_statuses,
    top_authors, word_cloud, NetworkData,
};
use bipscope_ingest::load_dir;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bipscope")]
#[command(author, version, about = "BIP corpus analytics pipeline")]
struct Cli {
    /// Verbose diagnostics (skipped records, incomplete categorical triples)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build all dashboard payloads and write them as JSON files.
    Build {
        /// Directory of per-proposal JSON export files
        #[arg(short, long)]
        input: PathBuf,
        /// Output directory for the generated payloads
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Load a corpus and print summary statistics.
    Stats {
        /// Directory of per-proposal JSON export files
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Build { input, out } => build(&input, &out),
        Commands::Stats { input } => stats(&input),
    }
}

fn build(input: &Path, out: &Path) -> Result<()> {
    let records = load_dir(input)?;
    let network = build_network(&records);
    let flow = build_category_flow(&network);

    fs::create_dir_all(out)
        .with_context(|| format!("failed to create output directory {}", out.display()))?;

    write_json(&out.join("network.json"), &network)?;
    write_json(&out.join("flow.json"), &flow)?;
    write_json(&out.join("years.json"), &counts_per_year(&network))?;
    write_json(&out.join("authors.json"), &top_authors(&network))?;
    write_json(&out.join("words.json"), &word_cloud(&network))?;

    println!("{}", "✓ dashboard payloads written".green().bold());
    print_summary(records.len(), &network);
    println!(
        "  {} category nodes, {} category links → {}",
        flow.nodes.len(),
        flow.links.len(),
        out.join("flow.json").display()
    );
    Ok(())
}

fn stats(input: &Path) -> Result<()> {
    let records = load_dir(input)?;
    let network = build_network(&records);
    let flow = build_category_flow(&network);

    println!("{}", "Corpus statistics".bold());
    print_summary(records.len(), &network);

    println!("  statuses: {}", distinct_statuses(&network).join(", "));

    println!("{}", "Proposals per layer".bold());
    for entry in counts_per_layer(&network) {
        println!("  {:>5}  {}", entry.count, entry.layer);
    }

    println!("{}", "Proposals per year".bold());
    for entry in counts_per_year(&network) {
        println!("  {:>5}  {}", entry.count, entry.year);
    }

    println!(
        "{} {} nodes, {} links",
        "Category flow:".bold(),
        flow.nodes.len(),
        flow.links.len()
    );
    Ok(())
}

fn print_summary(record_count: usize, network: &NetworkData) {
    let links = &network.links;
    let edge_count = links.references.len()
        + links.dependencies.len()
        + links.requires.len()
        + links.replaces.len()
        + links.superseded_by.len();
    println!(
        "  {} records → {} nodes, {} typed edges",
        record_count,
        network.nodes.len(),
        edge_count
    );
}

fn write_json<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(payload)
        .with_context(|| format!("failed to serialize {}", path.display()))?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), "wrote payload");
    Ok(())
}

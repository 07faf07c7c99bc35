use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use interlink::catalog::{Catalog, ClusterTable};
use interlink::config::Config;

/// Interlink: post-generation linking and checks for a static article site.
///
/// Adds related-article sections and citation links to generated pages, and
/// flags statistical claims that need verifying before publishing.
#[derive(Parser)]
#[command(name = "interlink", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the related-articles map computed from the cluster table
    Related {
        /// Print the map as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a related-articles section to every article page
    Link {
        /// Show what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// Link mentions of verified sources from the citation database
    Cite {
        /// A single article directory or HTML file (default: all articles)
        target: Option<PathBuf>,

        /// Show what would change without writing files
        #[arg(long)]
        dry_run: bool,
    },

    /// List statistical claims and citations that need manual verification
    CheckStats {
        /// A single article directory or HTML file (default: all articles)
        target: Option<PathBuf>,
    },

    /// Show catalog, cluster and link status
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging (stderr, so `related --json` stays clean)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("interlink=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Related { json } => {
            let (catalog, clusters) = load_inputs(&config)?;
            let map = interlink::related::build_related_map(catalog.items(), &clusters);

            if json {
                println!("{}", serde_json::to_string_pretty(&map.to_json())?);
            } else {
                interlink::output::terminal::display_related_map(&map);
            }
        }

        Commands::Link { dry_run } => {
            config.require_articles()?;
            let (catalog, clusters) = load_inputs(&config)?;

            println!("Building related map for {} articles...", catalog.len());
            let map = interlink::related::build_related_map(catalog.items(), &clusters);

            let report = interlink::pipeline::link::run(&config, &catalog, &map, dry_run)?;
            interlink::output::terminal::display_link_report(&report);
        }

        Commands::Cite { target, dry_run } => {
            config.require_citations()?;
            if target.is_none() {
                config.require_articles()?;
            }

            let entries =
                interlink::inject::citations::load_citation_db(&config.citations_path)?;
            info!(entries = entries.len(), "Citation database loaded");

            let report = interlink::pipeline::cite::run(
                &config,
                &entries,
                target.as_deref(),
                dry_run,
            )?;
            interlink::output::terminal::display_cite_report(&report);
        }

        Commands::CheckStats { target } => {
            let rules = interlink::audit::stats::StatsRules::builtin()?;
            let flagged = interlink::pipeline::audit::run(&config, &rules, target.as_deref())?;
            interlink::output::terminal::display_stats_report(&flagged);

            // Non-zero exit lets a publish script stop on unverified claims
            if !flagged.is_empty() {
                std::process::exit(1);
            }
        }

        Commands::Status => {
            let (catalog, clusters) = load_inputs(&config)?;
            let status = interlink::status::collect(&config, &catalog, &clusters)?;
            interlink::status::show(&status, &config);
        }
    }

    Ok(())
}

/// Load the catalog and cluster table, warning about stale cluster entries.
fn load_inputs(config: &Config) -> Result<(Catalog, ClusterTable)> {
    config.require_catalog()?;
    let catalog = Catalog::load(&config.catalog_path)?;
    let clusters = ClusterTable::load(&config.clusters_path)?;

    let stale = clusters.stale_members(&catalog);
    if !stale.is_empty() {
        warn!(
            count = stale.len(),
            "Cluster table references ids missing from the catalog (see `interlink status`)"
        );
    }

    info!(
        articles = catalog.len(),
        clusters = clusters.len(),
        "Catalog loaded"
    );
    Ok((catalog, clusters))
}

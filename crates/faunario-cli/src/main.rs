//! Faunario maintenance and browsing CLI.
//!
//! Wraps the faunario-core library: database bootstrap, asset staging,
//! batch reconciliation from a JSON record file, and terminal browsing of
//! the catalog.

mod output;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use faunario_core::config::PathsConfig;
use faunario_core::{
    ensure_database, reconcile, AssetStager, CandidateAnimal, CatalogRepository, CatalogView,
    OsFileProbe, SummaryClient,
};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "faunario")]
#[command(about = "Catalog maintenance for the Faunario 3D fauna museum")]
struct Args {
    /// Project root holding data/, img/, models/ and staging/
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the catalog database and seed the region list
    Init,

    /// Validate and upsert a batch of records from a JSON file
    Add {
        /// JSON array of candidate records
        records: PathBuf,

        /// Fill missing descriptions from the encyclopedia service
        #[arg(long)]
        fetch_descriptions: bool,
    },

    /// Move the staged image and model folder into the canonical layout
    Stage {
        /// Common name of the animal the staged assets belong to
        name: String,
    },

    /// List the catalog, optionally one region only
    List {
        #[arg(long)]
        region: Option<String>,
    },

    /// Search the catalog by name, scientific name, or region
    Search { term: String },

    /// Show one animal's detail card by id
    Show { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    let db_path = args
        .root
        .join(PathsConfig::DATA_DIR_NAME)
        .join(PathsConfig::DB_FILENAME);

    match args.command {
        Command::Init => {
            if ensure_database(&db_path)? {
                info!("Catalog created at {}", db_path.display());
            } else {
                info!("Catalog already exists at {}", db_path.display());
            }
        }

        Command::Add {
            records,
            fetch_descriptions,
        } => {
            ensure_database(&db_path)?;
            let repo = CatalogRepository::open(&db_path)?;

            let raw = std::fs::read_to_string(&records)
                .with_context(|| format!("Could not read {}", records.display()))?;
            let candidates: Vec<CandidateAnimal> = serde_json::from_str(&raw)
                .with_context(|| format!("Malformed record file {}", records.display()))?;
            info!("Loaded {} candidate records", candidates.len());

            let summaries = if fetch_descriptions {
                Some(SummaryClient::new()?)
            } else {
                None
            };

            let report = reconcile(
                &repo,
                &args.root,
                &OsFileProbe,
                summaries.as_ref(),
                candidates,
            )
            .await?;

            for error in &report.validation_errors {
                eprintln!("{}", error);
            }
            for failure in &report.persistence_failures {
                eprintln!("{}", failure);
            }
            println!(
                "{} candidates: {} inserted, {} updated, {} rejected",
                report.candidates,
                report.inserted,
                report.updated,
                report.rejected()
            );
        }

        Command::Stage { name } => {
            let staged = AssetStager::new(&args.root).stage(&name)?;
            println!("image_path: {}", staged.image_path);
            println!("model_path: {}", staged.model_path);
        }

        Command::List { region } => {
            let repo = CatalogRepository::open(&db_path)?;
            let mut view = output::TextView::new(std::io::stdout());
            match region {
                Some(region) => {
                    let animals = repo.animals_by_region(&region)?;
                    let grouped = std::iter::once((region, animals)).collect();
                    view.show_catalog(&grouped)?;
                }
                None => {
                    view.show_catalog(&repo.filter("")?)?;
                }
            }
        }

        Command::Search { term } => {
            let repo = CatalogRepository::open(&db_path)?;
            let grouped = repo.filter(&term)?;
            if grouped.values().all(|v| v.is_empty()) {
                println!("No matches for '{}'", term);
            } else {
                output::TextView::new(std::io::stdout()).show_catalog(&grouped)?;
            }
        }

        Command::Show { id } => {
            let repo = CatalogRepository::open(&db_path)?;
            match repo.animal_by_id(id)? {
                Some(animal) => {
                    output::TextView::new(std::io::stdout()).show_detail(&animal)?;
                }
                None => bail!("No animal with id {}", id),
            }
        }
    }

    Ok(())
}

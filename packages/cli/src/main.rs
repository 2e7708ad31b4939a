#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for immo-noise lookups.
//!
//! Runs the same pipeline a listing page would: gate and normalize the
//! address, query the noise map (aggregated source first, per-layer
//! fallback second), and print the classified result.

mod output;
mod watch;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use immo_noise_address::{Address, prepare_lookup};
use immo_noise_geocoder::geosearch;
use immo_noise_geocoder_models::ReferenceSystem;
use immo_noise_noise::classify::{classify, translate_threshold_words};
use immo_noise_noise::registry::{all_municipalities, municipality_for_city};
use immo_noise_noise::{HttpNoiseBackend, MunicipalityConfig, NoiseReport, lookup_noise};

#[derive(Parser)]
#[command(name = "immo_noise", about = "Ambient-noise lookup for listing addresses")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up noise levels for one address
    Lookup {
        /// Free-text address; line breaks separate parts
        #[arg(default_value = "")]
        address: String,
        /// Street name (structured input)
        #[arg(long)]
        street: Option<String>,
        /// House number (structured input)
        #[arg(long)]
        house_number: Option<String>,
        /// Postal code (structured input)
        #[arg(long)]
        zip: Option<String>,
        /// Mark the structured address as hidden by the listing
        #[arg(long)]
        incomplete: bool,
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Read addresses from stdin; only the latest one's result is printed
    Watch {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Resolve an address to coordinates
    Geocode {
        /// Free-text address
        address: String,
        /// Reference system (`wgs84` or `utm33`)
        #[arg(long, default_value = "wgs84")]
        system: ReferenceSystem,
        /// Municipality TOML file (defaults to the embedded configuration)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Classify a noise descriptor such as "bis 60 dB(A)"
    Classify {
        /// Descriptor text
        descriptor: String,
    },
    /// List embedded municipality configurations
    Municipalities,
}

#[derive(clap::Args)]
struct CommonArgs {
    /// City detected on the listing page (defaults to the served city)
    #[arg(long)]
    city: Option<String>,
    /// Municipality TOML file (defaults to the embedded configuration)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Loads the municipality configuration and applies env overrides.
fn load_config(path: Option<&Path>) -> Result<MunicipalityConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => MunicipalityConfig::from_path(path)?,
        None => municipality_for_city("Berlin")
            .or_else(|| all_municipalities().into_iter().next())
            .ok_or("No embedded municipality configuration")?,
    };
    Ok(config.with_env_overrides())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup {
            address,
            street,
            house_number,
            zip,
            incomplete,
            common,
        } => {
            let backend = HttpNoiseBackend::new(load_config(common.config.as_deref())?)?;
            let served = backend.config().city.clone();
            let city = common.city.unwrap_or_else(|| served.clone());

            let address = Address {
                street,
                house_number,
                zip,
                city: Some(city),
                raw_text: address,
                is_complete: !incomplete,
            };

            let lookup_address = match prepare_lookup(&address, None, &served) {
                Ok(lookup_address) => lookup_address,
                Err(refusal) => {
                    output::print_refusal(&refusal, common.json)?;
                    return Ok(());
                }
            };

            log::info!("Looking up noise for '{lookup_address}'");
            let lookup = lookup_noise(&backend, &lookup_address).await;
            let report = NoiseReport::from_lookup(&lookup, &backend.config().unavailable_message);
            output::print_report(&lookup_address, &report, common.json)?;
        }
        Commands::Watch { common } => {
            let backend = HttpNoiseBackend::new(load_config(common.config.as_deref())?)?;
            watch::run(&backend, common.city.as_deref(), common.json).await?;
        }
        Commands::Geocode {
            address,
            system,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let backend = HttpNoiseBackend::new(config)?;
            let hit = geosearch::search(
                backend.client(),
                &backend.config().geosearch,
                &address,
                system,
            )
            .await?;
            output::print_geocode(&address, hit.as_ref());
        }
        Commands::Classify { descriptor } => {
            let translated = translate_threshold_words(&descriptor);
            output::print_classification(&translated, classify(&translated));
        }
        Commands::Municipalities => {
            println!("{:<12} {:<10} NAME", "ID", "CITY");
            println!("{}", "-".repeat(60));
            for m in &all_municipalities() {
                println!("{:<12} {:<10} {}", m.id, m.city, m.name);
            }
        }
    }

    Ok(())
}

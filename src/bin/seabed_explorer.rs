//! Seabed Explorer CLI
//!
//! Drives an explorer session against the exploration API:
//! 1. Fetch the unfiltered map snapshot and lookup lists
//! 2. Apply `-f key=value` filters locally
//! 3. Print counts, print dropdown availability, or export CSV
//!
//! Usage:
//!   seabed-explorer summary -f contractTypeId=1 -f year=2021
//!   seabed-explorer summary --search nodules
//!   seabed-explorer export -f sponsoringState=France --contractor 4 --out-dir ./out
//!   seabed-explorer options -f contractorId=2
//!   seabed-explorer language fr
//!
//! Configuration comes from `SEABED_*` environment variables (a `.env` file is honoured).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use seabed_explorer::{
    Dimension, ExplorerConfig, ExplorerSession, ExportScope, FilterKey, HttpApiClient, Language,
    LanguageStore, RefreshOutcome,
};

#[derive(Parser, Debug)]
#[command(name = "seabed-explorer")]
#[command(version)]
#[command(about = "Browse, filter and export marine-exploration data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch data, apply filters and print counts
    Summary {
        /// Filters in format key=value (can be specified multiple times)
        #[arg(long = "filter", short = 'f', value_parser = parse_key_val)]
        filters: Vec<(String, String)>,

        /// Contractor name search, applied after the search debounce period
        #[arg(long)]
        search: Option<String>,
    },

    /// Write the filtered data as a sectioned CSV file
    Export {
        #[arg(long = "filter", short = 'f', value_parser = parse_key_val)]
        filters: Vec<(String, String)>,

        /// Export only this contractor
        #[arg(long, conflicts_with = "cruise")]
        contractor: Option<i64>,

        /// Export only this cruise
        #[arg(long)]
        cruise: Option<i64>,

        /// Directory the file is written to
        #[arg(long)]
        out_dir: PathBuf,

        /// File name prefix; the date and `.csv` are appended
        #[arg(long, default_value = "map-data")]
        base: String,
    },

    /// Show which dropdown options remain selectable
    Options {
        #[arg(long = "filter", short = 'f', value_parser = parse_key_val)]
        filters: Vec<(String, String)>,
    },

    /// Show or set the interface language
    Language {
        /// Language code (en, fr, es, ru, zh, ar)
        code: Option<String>,
    },
}

/// Parse a key=value pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("Invalid key=value pair: {}", s))?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = ExplorerConfig::from_env().context("Failed to read configuration")?;

    match cli.command {
        Commands::Summary { filters, search } => {
            let mut session = open_session(&config, &filters).await?;
            if let Some(text) = search {
                session.type_search(&text);
                session.settle_search().await;
            }
            print_summary(&session);
        }
        Commands::Export {
            filters,
            contractor,
            cruise,
            out_dir,
            base,
        } => {
            let session = open_session(&config, &filters).await?;
            let scope = match (contractor, cruise) {
                (Some(id), _) => ExportScope::Contractor(id),
                (None, Some(id)) => ExportScope::Cruise(id),
                (None, None) => ExportScope::All,
            };
            let today = chrono::Local::now().date_naive();
            let path = session
                .write_export(&out_dir, &base, today, scope)
                .with_context(|| format!("Failed to export into {}", out_dir.display()))?;
            println!("Wrote {}", path.display());
        }
        Commands::Options { filters } => {
            let session = open_session(&config, &filters).await?;
            print_options(&session);
        }
        Commands::Language { code } => {
            let store = LanguageStore::new(&config.preferences_path);
            match code {
                Some(code) => {
                    let language: Language = code.parse()?;
                    store.save(language).with_context(|| {
                        format!("Failed to save {}", store.path().display())
                    })?;
                    println!("Language set to {}", language);
                }
                None => println!("{}", store.load()),
            }
        }
    }

    Ok(())
}

/// Fetch the unfiltered snapshot and lookups, then apply filters locally
async fn open_session(
    config: &ExplorerConfig,
    filters: &[(String, String)],
) -> Result<ExplorerSession> {
    let client = HttpApiClient::new(config).context("Failed to build HTTP client")?;
    let mut session = ExplorerSession::with_config(Arc::new(client), config);

    if session.refresh().await == RefreshOutcome::Failed {
        bail!("{}", session.error().unwrap_or("Failed to load map data"));
    }
    if let Err(err) = session.load_options().await {
        tracing::warn!(error = %err, "filter lookups unavailable, using values from map data");
    }

    for (key, value) in filters {
        let key: FilterKey = key
            .parse()
            .with_context(|| format!("Unknown filter '{}'", key))?;
        session.set_filter(key, Some(value.as_str())).await;
    }
    Ok(session)
}

fn print_summary(session: &ExplorerSession) {
    let data = session.data();
    let stations = data.stations().count();
    let samples = data.samples().count();

    for (key, value) in session.filters().iter() {
        println!("filter {} = {}", key, value);
    }
    println!("contractors: {}", data.contractors.len());
    println!("cruises:     {}", data.cruises.len());
    println!("stations:    {}", stations);
    println!("samples:     {}", samples);
    println!("library:     {}", data.library.len());

    for contractor in &data.contractors {
        let cruises = data.cruises_for(contractor.contractor_id).count();
        println!(
            "  [{}] {} ({}, {}) - {} cruise(s)",
            contractor.contractor_id,
            contractor.contractor_name,
            contractor.contract_type,
            contractor.sponsoring_state,
            cruises
        );
    }
}

fn print_options(session: &ExplorerSession) {
    let availability = session.availability();
    for dimension in Dimension::ALL {
        println!("{:?}", dimension);
        for option in availability.options(dimension) {
            let marker = if option.disabled { " " } else { "*" };
            println!("  {} {} ({})", marker, option.label, option.value);
        }
    }
}

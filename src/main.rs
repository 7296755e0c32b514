//! # Mapprint CLI
//!
//! Command-line front end for a map print service.
//!
//! ## Usage
//!
//! ```bash
//! # List the layouts and formats the service offers
//! mapprint --service-url https://gis.example.com/print capabilities
//!
//! # Print the same extent twice as PNG
//! mapprint --config mapprint.toml print \
//!     --extent=-13630000,4540000,-13620000,4550000 \
//!     --format PNG32 --title Parcels --title Parcels
//!
//! # Results as JSON
//! mapprint --config mapprint.toml print --extent=0,0,1000,1000 --json
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use mapprint::{
    PrintError, PrintSession,
    capability::CapabilityLoader,
    config::PrintConfig,
    dedupe::{ResultEntry, ResultIndicator},
    logging,
    options::{LayoutTemplate, OutputFormat},
    service::HttpPrintService,
    view::{Extent, FixedView, SpatialReference, StaticOverlay, ViewContext},
};

/// Mapprint - submit map print jobs and collect the output files
#[derive(Parser, Debug)]
#[command(name = "mapprint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print service task URL (overrides the config file)
    #[arg(long, global = true)]
    service_url: Option<String>,

    /// More log output (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the layout and format choices offered by the service
    Capabilities,

    /// Submit print jobs and wait for the results
    Print {
        /// Map extent as xmin,ymin,xmax,ymax
        #[arg(long, value_name = "EXTENT", allow_hyphen_values = true)]
        extent: String,

        /// Spatial reference well-known id of the extent
        #[arg(long, default_value_t = SpatialReference::WEB_MERCATOR.wkid)]
        wkid: u32,

        /// Job title; repeat to submit several jobs
        #[arg(long)]
        title: Vec<String>,

        /// Layout template (defaults to the config value)
        #[arg(long)]
        layout: Option<String>,

        /// Output format (defaults to the config value)
        #[arg(long)]
        format: Option<String>,

        #[arg(long)]
        author: Option<String>,

        #[arg(long)]
        copyright: Option<String>,

        /// Extra layout text elements, as JSON
        #[arg(long, value_name = "JSON")]
        overlay: Option<String>,

        /// Export resolution
        #[arg(long)]
        dpi: Option<u32>,

        /// Submit even if the layout/format is not advertised by the service
        #[arg(long)]
        no_check: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PrintError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration");
            PrintConfig::from_file(path)?
        }
        None => PrintConfig::default(),
    };
    if let Some(url) = cli.service_url {
        config.service_url = url;
    }
    config.validate()?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(dispatch(cli.command, config))
}

async fn dispatch(command: Commands, config: PrintConfig) -> Result<(), PrintError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("mapprint/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| PrintError::Config(format!("HTTP client error: {}", e)))?;

    match command {
        Commands::Capabilities => list_capabilities(&config, client).await,
        Commands::Print {
            extent,
            wkid,
            title,
            layout,
            format,
            author,
            copyright,
            overlay,
            dpi,
            no_check,
            json,
        } => {
            let extent = Extent::parse(&extent).ok_or_else(|| {
                PrintError::Config(format!(
                    "Invalid extent '{}'; expected xmin,ymin,xmax,ymax",
                    extent
                ))
            })?;
            let overlay = overlay
                .map(|text| {
                    serde_json::from_str::<serde_json::Value>(&text)
                        .map_err(|e| PrintError::Config(format!("Invalid overlay JSON: {}", e)))
                })
                .transpose()?;

            let mut view = ViewContext::new(SpatialReference { wkid }, extent);
            view.dpi = dpi;

            let mut session = PrintSession::new(
                config.initial_options(),
                Arc::new(
                    HttpPrintService::new(client.clone(), &config.service_url)
                        .with_timeout(config.execute_timeout()),
                ),
                Box::new(FixedView::new(view)),
            )
            .with_overlay(Box::new(StaticOverlay(overlay)));

            let options = session.options_mut();
            if let Some(layout) = layout {
                options.layout = LayoutTemplate::new(layout);
            }
            if let Some(format) = format {
                options.format = OutputFormat::parse(&format);
            }
            if let Some(author) = author {
                options.author = author;
            }
            if let Some(copyright) = copyright {
                options.copyright = copyright;
            }

            if !no_check {
                let caps = CapabilityLoader::new(client, config.service_url.clone())
                    .with_timeout(config.capability_timeout())
                    .load()
                    .await;
                if !caps.is_empty() && !caps.accepts(session.options()) {
                    return Err(PrintError::Config(format!(
                        "Layout '{}' / format '{}' not offered by the service (use --no-check to send anyway)",
                        session.options().layout,
                        session.options().format
                    )));
                }
            }

            print_jobs(&mut session, title, json).await
        }
    }
}

async fn list_capabilities(config: &PrintConfig, client: reqwest::Client) -> Result<(), PrintError> {
    let caps = CapabilityLoader::new(client, config.service_url.clone())
        .with_timeout(config.capability_timeout())
        .fetch()
        .await?;

    println!("Layouts:");
    for layout in &caps.layouts {
        println!("  {}", layout);
    }
    println!("\nFormats:");
    for format in &caps.formats {
        println!("  {}", format);
    }
    Ok(())
}

async fn print_jobs(
    session: &mut PrintSession,
    titles: Vec<String>,
    json: bool,
) -> Result<(), PrintError> {
    let titles = if titles.is_empty() {
        vec![session.options().title.clone()]
    } else {
        titles
    };

    for title in titles {
        session.options_mut().title = title;
        session.print()?;
    }
    session.wait_all().await;

    let results = session.results();
    if json {
        let text = serde_json::to_string_pretty(&results)
            .map_err(|e| PrintError::Submission(format!("Failed to encode results: {}", e)))?;
        println!("{}", text);
    } else {
        print_result_list(&results);
    }

    let failed = results
        .iter()
        .filter(|r| r.indicator == ResultIndicator::Error)
        .count();
    if failed > 0 {
        return Err(PrintError::Submission(format!(
            "{} of {} print jobs failed",
            failed,
            results.len()
        )));
    }
    Ok(())
}

fn print_result_list(results: &[ResultEntry]) {
    if results.is_empty() {
        println!("No printed files yet.");
        return;
    }
    println!("Printed files:");
    for entry in results {
        match entry.indicator {
            ResultIndicator::OpenLink => println!("  {}  {}", entry.file_name, entry.url),
            ResultIndicator::Error => println!("  {}  (error)", entry.file_name),
            ResultIndicator::InProgress => println!("  {}  (in progress)", entry.file_name),
        }
    }
}

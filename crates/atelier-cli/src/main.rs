//! Atelier - Backend and tooling for the studio site
//!
//! - `serve`: HTTP API for the AI room visualizer, prompt ideas, and leads
//! - `leads`: list captured leads
//! - `snap`: inspect a page's horizontal-scroll snap points
//! - `ideas`: fetch prompt ideas from the terminal

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use atelier_core::ai::{self, GeminiClient, IdeaSource, ImageBackend, TextBackend};
use atelier_core::choreo::{TrackConfig, PRESET_NAMES};
use atelier_core::storage::{Database, LeadStore};
use atelier_core::{paths, AtelierConfig, GenerationError};

mod server;
mod snap;

/// Atelier - studio site backend
#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Backend and tooling for the Atelier studio site", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.atelier/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database for leads (overrides the config file)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on (overrides the config file)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List captured leads, newest first
    Leads {
        /// Print full records as JSON
        #[arg(long)]
        json: bool,

        /// Show at most this many leads
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show snap points for a page layout
    Snap {
        /// Page preset
        #[arg(short, long, default_value = "home")]
        page: String,

        /// Measured geometry as JSON
        #[arg(short, long, conflicts_with = "panels")]
        geometry: Option<PathBuf>,

        /// Row child as ID=WIDTH, e.g. hero=1vw or card=640px (repeatable)
        #[arg(long = "panel", value_name = "ID=WIDTH")]
        panels: Vec<String>,

        /// Viewport width in pixels for --panel layouts
        #[arg(long, default_value_t = 1440.0)]
        viewport: f64,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch prompt ideas
    Ideas,
}

/// Route logs to stderr for the server, to a file otherwise
fn init_logging(to_stderr: bool) {
    let writer = if to_stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        let log_dir = paths::logs_dir();
        std::fs::create_dir_all(&log_dir).ok();
        match std::fs::File::create(log_dir.join("atelier.log")) {
            Ok(file) => BoxMakeWriter::new(std::sync::Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(std::io::sink),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(writer)
        .with_ansi(to_stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<AtelierConfig> {
    let mut config = match &cli.config {
        Some(path) => AtelierConfig::load_from(path)?,
        None => AtelierConfig::load()?,
    };
    if let Some(database) = &cli.database {
        config.storage.database_path = Some(database.clone());
    }
    Ok(config)
}

fn open_leads(config: &AtelierConfig) -> Result<LeadStore> {
    let db = Database::new(&config.storage.database_path())?;
    Ok(LeadStore::new(db.shared()))
}

/// Gemini client, or `None` when no API key is configured
fn gemini_client(config: &AtelierConfig) -> Option<Arc<GeminiClient>> {
    match GeminiClient::new(config.gemini.clone()) {
        Ok(client) => Some(Arc::new(client)),
        Err(GenerationError::MissingApiKey) => {
            tracing::warn!("GEMINI_API_KEY not set; image generation disabled, ideas use fallback");
            None
        }
        Err(e) => {
            tracing::error!("Failed to create Gemini client: {}", e);
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, Commands::Serve { .. }));

    let config = load_config(&cli)?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let client = gemini_client(&config);
            let state = server::AppState {
                images: client.clone().map(|c| c as Arc<dyn ImageBackend>),
                text: client.map(|c| c as Arc<dyn TextBackend>),
                leads: open_leads(&config)?,
            };
            tracing::info!(
                "Storing leads in {}",
                config.storage.database_path().display()
            );
            server::serve(&bind, config.server.workers, server::Router::new(state)).await?;
        }
        Commands::Leads { json, limit } => {
            let store = open_leads(&config)?;
            let mut leads = store.list()?;
            if let Some(limit) = limit {
                leads.truncate(limit);
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&leads)?);
            } else if leads.is_empty() {
                println!("No leads yet.");
            } else {
                println!("Leads ({}):", leads.len());
                println!();
                for lead in &leads {
                    let summary = lead.summary();
                    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
                    println!(
                        "  {}  {}",
                        summary.created_at.format("%Y-%m-%d %H:%M"),
                        show(&summary.name)
                    );
                    println!("    {} | {}", show(&summary.email), show(&summary.phone));
                    println!(
                        "    {} | {} | {}",
                        show(&summary.kind),
                        show(&summary.budget),
                        show(&summary.location)
                    );
                    println!();
                }
            }
        }
        Commands::Snap {
            page,
            geometry,
            panels,
            viewport,
            json,
        } => {
            let Some(track) = TrackConfig::preset(&page) else {
                anyhow::bail!(
                    "unknown page '{}' (expected one of: {})",
                    page,
                    PRESET_NAMES.join(", ")
                );
            };
            let geometry = snap::load_geometry(geometry.as_deref(), &panels, viewport)?;
            let report = snap::SnapReport::build(&track, geometry);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
        }
        Commands::Ideas => {
            let client = gemini_client(&config);
            let ideas =
                ai::suggest_ideas(client.as_deref().map(|c| c as &dyn TextBackend)).await;

            if ideas.source == IdeaSource::Fallback {
                println!("Ideas (fallback list):");
            } else {
                println!("Ideas:");
            }
            for idea in &ideas.ideas {
                println!("  - {}", idea);
            }
        }
    }

    Ok(())
}

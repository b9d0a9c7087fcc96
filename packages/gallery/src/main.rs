use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gallery::config::AppConfig;
use gallery::database::init_db;
use gallery::error::AppError;
use gallery::models::catalog::{CatalogQuery, CatalogSort};
use gallery::models::generation::GenerationRequest;
use gallery::state::AppState;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Operate the image gallery: generate, browse, favorite, download.
#[derive(Parser, Debug)]
#[command(name = "gallery", author, version, about, long_about = None)]
struct Args {
    /// Config file path (without extension)
    #[arg(long, env = "GALLERY_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an image from a prompt and store it
    Generate {
        prompt: String,
        /// Creator email recorded with the asset
        #[arg(long)]
        email: Option<String>,
        /// Reference image to steer the generation
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// List one catalog page
    List {
        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u64,
        #[arg(long)]
        page_size: Option<u64>,
        /// Annotate entries with this viewer's favorites
        #[arg(long)]
        viewer: Option<String>,
        #[arg(long, value_enum, default_value_t = SortArg::Popularity)]
        sort: SortArg,
    },
    /// List a viewer's favorites
    Favorites { email: String },
    /// Flip a viewer's favorite on an asset
    Toggle { blob_key: String, email: String },
    /// Register a viewer
    AddViewer { email: String },
    /// Write a stored blob to a file
    Download { blob_key: String, out: PathBuf },
}

#[derive(Copy, Clone, ValueEnum, Debug, PartialEq, Eq)]
#[clap(rename_all = "lowercase")]
enum SortArg {
    Popularity,
    Newest,
}

impl From<SortArg> for CatalogSort {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Popularity => CatalogSort::Popularity,
            SortArg::Newest => CatalogSort::Newest,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config =
        AppConfig::load_from(args.config.as_deref()).context("Failed to load configuration")?;
    let db = init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    let state = AppState::from_config(&config, db)
        .await
        .context("Failed to initialize services")?;

    match run(&state, args.command).await {
        Ok(()) => Ok(()),
        Err(e) => {
            print_json(&json!({ "error": e.body() }))?;
            std::process::exit(1);
        }
    }
}

async fn run(state: &AppState, command: Command) -> Result<(), AppError> {
    match command {
        Command::Generate {
            prompt,
            email,
            image,
        } => {
            let mut request = GenerationRequest::new(prompt);
            if let Some(email) = email {
                request = request.with_creator(email);
            }
            if let Some(path) = image {
                let bytes = tokio::fs::read(&path).await.map_err(|e| {
                    AppError::Validation(format!("Cannot read {}: {e}", path.display()))
                })?;
                let media_type = mime_guess::from_path(&path).first().map(|m| m.to_string());
                request = request.with_reference(bytes, media_type);
            }

            let cancel = CancellationToken::new();
            let ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupt received, cancelling generation");
                    ctrl_c.cancel();
                }
            });

            let blob_key = state.generator.generate(request, &cancel).await?;
            let display_url = state.catalog.display_url(&blob_key).await?;
            print_out(&json!({ "blob_key": blob_key, "display_url": display_url }))
        }
        Command::List {
            page,
            page_size,
            viewer,
            sort,
        } => {
            let query = CatalogQuery {
                page,
                page_size,
                sort: sort.into(),
                viewer_email: viewer,
            };
            print_out(&state.catalog.list(&query).await?)
        }
        Command::Favorites { email } => print_out(&state.catalog.favorites(&email).await?),
        Command::Toggle { blob_key, email } => {
            let outcome = state.favorites.toggle(&blob_key, &email).await?;
            print_out(&json!({ "outcome": outcome, "is_favorited": outcome.is_favorited() }))
        }
        Command::AddViewer { email } => {
            let viewer = state.favorites.ensure_viewer(&email).await?;
            print_out(&json!({ "id": viewer.id, "email": viewer.email }))
        }
        Command::Download { blob_key, out } => {
            let download = state.catalog.download(&blob_key).await?;
            tokio::fs::write(&out, &download.bytes)
                .await
                .map_err(|e| AppError::Internal(format!("Cannot write {}: {e}", out.display())))?;
            info!(path = %out.display(), bytes = download.bytes.len(), "Wrote blob");
            print_out(&json!({
                "path": out.display().to_string(),
                "content_type": download.content_type,
                "size": download.bytes.len(),
            }))
        }
    }
}

fn print_out<T: Serialize>(value: &T) -> Result<(), AppError> {
    print_json(value).map_err(|e| AppError::Internal(e.to_string()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

//! Galerie CLI, a command-line client for the file-storage API.
//!
//! Set GALERIE_API_KEY and GALERIE_API_URL (or API_URL). Uses X-API-Key auth
//! by default; set GALERIE_AUTH_SCHEME=bearer for Authorization headers.

use anyhow::Context;
use clap::{Parser, Subcommand};
use galerie_cli::{candidate_from_path, init_tracing, parse_kind_filter};
use galerie_core::UploadRules;
use galerie_gallery::{
    DeleteRoute, FileRegistry, GalleryController, LinkOpener, UploadCoordinator,
};
use galerie_store::{FileStore, HttpFileStore};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "galerie", about = "Galerie file-storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload one or more files to an owner's collection
    Upload {
        /// Owner UUID (e.g. a project id)
        owner: Uuid,
        /// Paths of the files to upload
        files: Vec<PathBuf>,
    },
    /// List an owner's files with optional search and type filter
    List {
        /// Owner UUID
        owner: Uuid,
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
        /// Filter by type: all, image, pdf, doc, other
        #[arg(long)]
        r#type: Option<String>,
    },
    /// Resolve a short-lived download link for one file
    Link {
        /// Owner UUID
        owner: Uuid,
        /// File UUID
        id: Uuid,
    },
    /// Delete one or more files from an owner's collection
    Delete {
        /// Owner UUID
        owner: Uuid,
        /// File UUIDs
        ids: Vec<Uuid>,
        /// Use the administrative by-id route instead of the owner route
        #[arg(long)]
        admin: bool,
    },
}

/// Opener that prints resolved links to stdout.
struct StdoutOpener;

impl LinkOpener for StdoutOpener {
    fn open(&self, url: &str) {
        println!("{}", url);
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

async fn upload(store: Arc<dyn FileStore>, owner: Uuid, paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let rules = UploadRules::from_env()?;
    let candidates = paths
        .iter()
        .map(|p| candidate_from_path(p))
        .collect::<Result<Vec<_>, _>>()?;

    let screening = galerie_core::screen_candidates(&rules, candidates);
    if let Some(rejection) = screening.first_rejection() {
        eprintln!("Rejected: {}", rejection.reason.user_message());
    }
    if screening.accepted.is_empty() {
        anyhow::bail!("No files accepted for upload");
    }

    let coordinator = UploadCoordinator::new(store);
    let mut rx = coordinator.subscribe();
    let printer = tokio::spawn(async move {
        let mut last = 0u8;
        while rx.changed().await.is_ok() {
            let percent = *rx.borrow();
            if percent != last {
                eprintln!("upload {}%", percent);
                last = percent;
            }
            if percent == 100 {
                break;
            }
        }
    });

    let result = coordinator.submit(Some(owner), screening.accepted).await;
    printer.abort();

    let stored = result.map_err(|e| anyhow::anyhow!(e.user_message()))?;
    print_json(&stored)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let store: Arc<dyn FileStore> = Arc::new(HttpFileStore::from_env().context(
        "Failed to create API client. Set GALERIE_API_KEY and GALERIE_API_URL (or API_URL)",
    )?);

    match cli.command {
        Commands::Upload { owner, files } => {
            upload(store, owner, files).await?;
        }
        Commands::List {
            owner,
            search,
            r#type,
        } => {
            let registry = Arc::new(FileRegistry::new(
                store,
                DeleteRoute::Owned,
                Arc::new(StdoutOpener),
            ));
            let controller = GalleryController::new(registry, true);
            controller
                .refresh(Some(owner))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            if let Some(text) = search {
                controller.set_search(text);
            }
            if let Some(value) = r#type {
                let kind = parse_kind_filter(&value)
                    .ok_or_else(|| anyhow::anyhow!("Unknown type filter: {}", value))?;
                controller.set_kind_filter(kind);
            }

            print_json(&controller.filtered())?;
        }
        Commands::Link { owner, id } => {
            let url = store
                .download_url(owner, id)
                .await
                .map_err(|e| anyhow::anyhow!(e.to_string()))?;
            print_json(&serde_json::json!({ "url": url }))?;
        }
        Commands::Delete { owner, ids, admin } => {
            if ids.is_empty() {
                anyhow::bail!("Provide at least one file id");
            }
            let route = if admin {
                DeleteRoute::Administrative
            } else {
                DeleteRoute::Owned
            };
            let registry = FileRegistry::new(store, route, Arc::new(StdoutOpener));
            registry
                .load(Some(owner))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;

            match ids.as_slice() {
                [id] => registry
                    .remove(*id)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message()))?,
                many => registry
                    .remove_many(many)
                    .await
                    .map_err(|e| anyhow::anyhow!(e.user_message()))?,
            }
            print_json(&serde_json::json!({
                "success": true,
                "deleted": ids.len(),
            }))?;
        }
    }

    Ok(())
}

//! Quiver API client - command-line driver
//!
//! Wires the stores against a file-backed profile and drives them from
//! a handful of subcommands. Each store is constructed once here and
//! passed explicitly to whatever needs it; there is no global registry.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use quiver_application::ports::Fetcher;
use quiver_application::stores::{CollectionStore, TabStore};
use quiver_domain::{Folder, Forest, ResultPatch, TabSnapshot};
use quiver_infrastructure::{
    BroadcastChannel, BroadcastHub, FileProfileStorage, ReqwestFetcher, export_forest,
    parse_forest,
};

type Collections = CollectionStore<FileProfileStorage, BroadcastChannel>;
type Tabs = TabStore<FileProfileStorage, BroadcastChannel>;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let profile_dir = profile_dir()?;
    tracing::debug!(profile = %profile_dir.display(), "opening profile");

    let storage = Arc::new(FileProfileStorage::open(&profile_dir)?);
    let hub = BroadcastHub::new();
    let mut collections: Collections =
        CollectionStore::open(Arc::clone(&storage), &hub, Forest::new())?;
    let mut tabs: Tabs = TabStore::open(Arc::clone(&storage), &hub, TabSnapshot::default())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("list") | None => {
            list(&collections, &tabs);
            Ok(())
        }
        Some("import") => {
            let path = args.get(1).ok_or("usage: quiver import <file>")?;
            let document = std::fs::read_to_string(path)?;
            let forest = parse_forest(&document)?;
            let count = collections.import_forest(&forest)?;
            println!("imported {count} collection(s) from {path}");
            Ok(())
        }
        Some("export") => {
            let path = args.get(1).ok_or("usage: quiver export <file>")?;
            let document = export_forest(collections.forest())?;
            std::fs::write(path, document)?;
            println!("exported {} collection(s) to {path}", collections.forest().len());
            Ok(())
        }
        Some("send") => {
            let id: Uuid = args
                .get(1)
                .ok_or("usage: quiver send <request-id>")?
                .parse()?;
            send(&collections, &mut tabs, id).await
        }
        Some(other) => {
            eprintln!("unknown command: {other}");
            eprintln!("usage: quiver [list | import <file> | export <file> | send <request-id>]");
            Err("unknown command".into())
        }
    }
}

/// Profile directory: `$QUIVER_PROFILE`, else the platform config dir.
fn profile_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Ok(dir) = std::env::var("QUIVER_PROFILE") {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join("quiver"))
        .ok_or_else(|| "could not determine a config directory".into())
}

fn list(collections: &Collections, tabs: &Tabs) {
    if collections.forest().is_empty() {
        println!("no collections");
    }
    for folder in collections.forest() {
        print_folder(folder, 0);
    }

    let session = tabs.session();
    if !session.tabs.is_empty() {
        println!();
        println!("open tabs:");
        for tab in &session.tabs {
            let marker = if session.current == Some(tab.id) {
                "*"
            } else {
                " "
            };
            let dirty = if tab.dirty { " (unsaved)" } else { "" };
            println!(
                " {marker} {} {} {}{dirty}",
                tab.context.method, tab.context.name, tab.context.url
            );
        }
    }
}

fn print_folder(folder: &Folder, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{indent}{}/", folder.name);
    for request in &folder.requests {
        println!("{indent}  {} {} {}", request.method, request.name, request.url);
    }
    for child in &folder.folders {
        print_folder(child, depth + 1);
    }
}

/// Sends a saved request and records the outcome in the tab store.
async fn send(
    collections: &Collections,
    tabs: &mut Tabs,
    id: Uuid,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = collections
        .get_request(id)
        .ok_or_else(|| format!("no request with id {id}"))?;

    let tab_id = tabs.add_tab(Some(quiver_domain::Request::clone(&request)))?;
    tabs.set_result(tab_id, Some(ResultPatch::sending(true)))?;

    let fetcher = ReqwestFetcher::new()?;
    match fetcher.fetch(&request).await {
        Ok(response) => {
            println!(
                "{} {} -> {} in {:.0} ms",
                request.method, request.url, response.status, response.time_ms
            );
            if !response.raw.is_empty() {
                println!("{}", response.raw);
            }
            tabs.set_result(tab_id, Some(ResultPatch::completed(response)))?;
            Ok(())
        }
        Err(error) => {
            tabs.set_result(tab_id, Some(ResultPatch::sending(false)))?;
            Err(error.into())
        }
    }
}

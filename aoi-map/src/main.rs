//! Point d'entrée CLI pour aoi-map

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;
mod config;
mod render;
mod search;

use cli::Commands;
use config::Config;

/// Dessiner et gérer des zones d'intérêt (AOI) sur fond cartographique
#[derive(Parser)]
#[command(name = "aoi-map")]
#[command(author, version)]
#[command(about = "Gérer le store de features AOI: liste, ajout, suppression, export, recherche")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Fichier de store (défaut: env AOI_STORE, sinon aoi-features.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Fichier de configuration JSON optionnel
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let store_path = resolve_store_path(cli.store, &config);

    info!(store = %store_path.display(), "Using feature store");

    match cli.command {
        Commands::List => cli::cmd_list(&store_path),
        Commands::Add { file, shape } => cli::cmd_add(&store_path, &file, &shape)?,
        Commands::Remove { id } => cli::cmd_remove(&store_path, &id),
        Commands::Clear => cli::cmd_clear(&store_path),
        Commands::Export { output } => cli::cmd_export(&store_path, &output)?,
        Commands::Search { query } => cli::cmd_search(&config, &query).await?,
        Commands::Layers { toggle } => cli::cmd_layers(&config, toggle.as_deref()),
    }

    Ok(())
}

/// Résout le chemin du store: argument CLI, puis env, puis config, puis défaut
fn resolve_store_path(arg: Option<PathBuf>, config: &Config) -> PathBuf {
    arg.or_else(|| std::env::var_os("AOI_STORE").map(PathBuf::from))
        .or_else(|| config.store_path.clone())
        .unwrap_or_else(|| PathBuf::from("aoi-features.json"))
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}

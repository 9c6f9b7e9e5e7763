//! Command-line interface for lendlib.
//!
//! Provides the interactive command loop, script execution, and a view of
//! the resolved configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::config::{self, ResolvedConfig};
use crate::core::Catalog;
use crate::storage;

pub mod command;
pub mod repl;
pub mod session;

pub use command::{Command, MemberArg, ParseError};
pub use session::{Reply, Session};

/// lendlib - Lending-library catalog
#[derive(Parser, Debug)]
#[command(name = "lendlib")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive command loop (default)
    Repl {
        /// Collection to import before the first command
        #[arg(short, long)]
        collection: Option<PathBuf>,
    },

    /// Run commands from a file, one per line
    Exec {
        /// Script file
        script: PathBuf,

        /// Collection to import before the first command
        #[arg(short, long)]
        collection: Option<PathBuf>,
    },

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            None => run_repl(None).await,
            Some(Commands::Repl { collection }) => run_repl(collection).await,
            Some(Commands::Exec { script, collection }) => run_script(&script, collection).await,
            Some(Commands::Config) => show_config(),
        }
    }
}

/// Build the starting catalog, importing a collection if one is given.
///
/// A collection named on the command line must load; one that only comes
/// from configuration is skipped with a warning when it cannot be read.
async fn open_catalog(cfg: &ResolvedConfig, explicit: Option<PathBuf>) -> Result<Catalog> {
    let mut catalog = Catalog::with_first_member_number(cfg.catalog.first_member_number);

    if let Some(path) = explicit {
        let books = storage::read_collection(&path)
            .await
            .with_context(|| format!("Failed to load collection: {}", path.display()))?;
        catalog.import_collection(books);
    } else if let Some(path) = cfg.startup_collection() {
        match storage::read_collection(&path).await {
            Ok(books) => {
                catalog.import_collection(books);
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping configured collection"),
        }
    }

    info!(books = catalog.len(), "Catalog ready");
    Ok(catalog)
}

/// Run the interactive loop on stdin/stdout
async fn run_repl(collection: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let mut session = Session::new(open_catalog(cfg, collection).await?);

    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    repl::run_lines(&mut session, input, &mut output, Some(cfg.repl.prompt.as_str())).await
}

/// Run every line of a script file
async fn run_script(script: &Path, collection: Option<PathBuf>) -> Result<()> {
    let cfg = config::config()?;
    let mut session = Session::new(open_catalog(cfg, collection).await?);

    let file = tokio::fs::File::open(script)
        .await
        .with_context(|| format!("Failed to open script: {}", script.display()))?;

    let mut output = tokio::io::stdout();
    repl::run_lines(&mut session, BufReader::new(file), &mut output, None).await
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("lendlib configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:       {}", cfg.home.display());
    println!(
        "  Collection: {}",
        cfg.collection
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!();
    println!("Catalog:");
    println!("  First member number: {}", cfg.catalog.first_member_number);
    println!();
    println!("REPL:");
    println!("  Prompt: {:?}", cfg.repl.prompt);
    println!();
    println!("Logging:");
    println!("  Level: {} (RUST_LOG overrides)", cfg.log_level);

    Ok(())
}

//! Configuration for lendlib.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (LENDLIB_HOME, LENDLIB_COLLECTION)
//! 2. Config file (.lendlib/config.yaml)
//! 3. Defaults (~/.lendlib)
//!
//! Config file discovery:
//! - Searches current directory and parents for .lendlib/config.yaml
//! - Paths in config file are relative to the project root (the directory
//!   containing .lendlib/)

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::FIRST_MEMBER_NUMBER;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
    #[serde(default)]
    pub repl: Option<ReplConfig>,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .lendlib/)
    pub home: Option<String>,
    /// Collection imported at startup (relative to the project root)
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub first_member_number: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReplConfig {
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to lendlib home
    pub home: PathBuf,
    /// Collection to import into a fresh catalog (if any)
    pub collection: Option<PathBuf>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Catalog settings
    pub catalog: CatalogSettings,
    /// Interactive loop settings
    pub repl: ReplSettings,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub first_member_number: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            first_member_number: FIRST_MEMBER_NUMBER,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReplSettings {
    pub prompt: String,
}

impl Default for ReplSettings {
    fn default() -> Self {
        Self {
            prompt: "user: ".to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Collection imported into a fresh catalog: the configured one, or
    /// `<home>/collection.csv` when that file exists
    pub fn startup_collection(&self) -> Option<PathBuf> {
        self.collection.clone().or_else(|| {
            let fallback = self.home.join("collection.csv");
            fallback.exists().then_some(fallback)
        })
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".lendlib").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    // Default home directory
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".lendlib");

    // Check for config file
    let config_file = find_config_file();

    let env_home = std::env::var("LENDLIB_HOME").ok().map(PathBuf::from);
    let env_collection = std::env::var("LENDLIB_COLLECTION").ok().map(PathBuf::from);

    let resolved = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;

        // .lendlib/ and the project root containing it
        let lendlib_dir = config_path.parent().unwrap_or(Path::new("."));
        let base_dir = lendlib_dir.parent().unwrap_or(Path::new("."));

        let home = env_home.unwrap_or_else(|| match config.paths.home {
            Some(ref home_path) => resolve_path(lendlib_dir, home_path),
            None => default_home.clone(),
        });

        let collection = env_collection.or_else(|| {
            config
                .paths
                .collection
                .as_deref()
                .map(|p| resolve_path(base_dir, p))
        });

        let catalog = CatalogSettings {
            first_member_number: config
                .catalog
                .as_ref()
                .and_then(|c| c.first_member_number)
                .unwrap_or(FIRST_MEMBER_NUMBER),
        };

        let repl = ReplSettings {
            prompt: config
                .repl
                .as_ref()
                .and_then(|r| r.prompt.clone())
                .unwrap_or_else(|| ReplSettings::default().prompt),
        };

        let log_level = config
            .logging
            .as_ref()
            .and_then(|l| l.level.clone())
            .unwrap_or_else(default_log_level);

        ResolvedConfig {
            home,
            collection,
            config_file,
            catalog,
            repl,
            log_level,
        }
    } else {
        // No config file - use env vars or defaults
        ResolvedConfig {
            home: env_home.unwrap_or(default_home),
            collection: env_collection,
            config_file: None,
            catalog: CatalogSettings::default(),
            repl: ReplSettings::default(),
            log_level: default_log_level(),
        }
    };

    Ok(resolved)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

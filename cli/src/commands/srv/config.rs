//! # Folio HTTP Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module handles configuration loading, merging, and validation for
//! `folio srv`. It combines settings from:
//! 1. Command-line arguments (highest priority)
//! 2. Local configuration file `.folio-srv.toml` in the site directory (if present)
//! 3. Default values (lowest priority)
//!
//! Chat behavior (reply delay, booking service, knowledge file) is not configured
//! here; it comes from the shared `core::config` (`.folio.toml`).
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! port = 9000
//! host = "0.0.0.0"
//! directory = "dist"
//! enable_cors = true
//! index_file = "index.html"
//! ```
//!
//! ```rust
//! let config = load_and_merge_config(args).await?;
//! println!("Serving directory: {}", config.directory.display());
//! ```
//!
use crate::commands::KnowledgeArgs;
use crate::core::error::{FolioError, Result};
use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use std::net::IpAddr;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// The expected name for the server-specific configuration file.
const CONFIG_FILE_NAME: &str = ".folio-srv.toml";

/// # Server Command Arguments (`SrvArgs`)
///
/// Command-line arguments accepted by `folio srv`. They override settings from
/// `.folio-srv.toml` whenever they differ from their defaults.
#[derive(Parser, Debug)]
pub struct SrvArgs {
    /// Root directory of the built portfolio site.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Network port to listen on. The next free port is used if it is taken.
    #[arg(long, short, default_value_t = 8000)]
    pub port: u16,

    /// IP address to bind; `0.0.0.0` exposes the site to the local network.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Do not send permissive CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// File served for `/` and for any path that is not a file (single-page app routing).
    #[arg(long, short, default_value = "index.html")]
    pub index: String,

    #[command(flatten)]
    pub source: KnowledgeArgs,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// The consolidated settings after merging arguments, the config file and
/// defaults. `directory` is absolute and known to exist once
/// `load_and_merge_config` returns.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub directory: PathBuf,
    pub enable_cors: bool,
    pub index_file: String,
}

/// Raw `.folio-srv.toml` contents; every field optional.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    host: Option<String>,
    directory: Option<String>,
    enable_cors: Option<bool>,
    index_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            directory: PathBuf::from("."),
            enable_cors: true,
            index_file: "index.html".to_string(),
        }
    }
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// Starts from the arguments, overlays `.folio-srv.toml` from the requested
/// directory for every argument left at its default, then resolves and checks
/// the served directory.
///
/// ## Errors
///
/// - The configuration file exists but cannot be read or parsed.
/// - The final directory does not exist or is not a directory.
pub async fn load_and_merge_config(args: SrvArgs) -> Result<ServerConfig> {
    let mut effective_config = ServerConfig::from_args(&args);
    let cli_defaults = ServerConfig::default();

    let config_search_dir = if args.directory.is_absolute() {
        args.directory.clone()
    } else {
        env::current_dir()
            .context("Failed to get current working directory")?
            .join(&args.directory)
    };
    debug!("Looking for config file in: {}", config_search_dir.display());

    if let Some(file_config) = load_config_from_dir(&config_search_dir)? {
        if args.port == cli_defaults.port {
            effective_config.port = file_config.port;
        }
        if args.host == cli_defaults.host {
            effective_config.host = file_config.host;
        }
        if args.index == cli_defaults.index_file {
            effective_config.index_file = file_config.index_file;
        }
        if !args.no_cors {
            effective_config.enable_cors = file_config.enable_cors;
        }
        // Already resolved relative to the config file.
        effective_config.directory = file_config.directory;
    } else {
        debug!("No config file found or loaded. Using arguments.");
    }

    effective_config.resolve_directory().await?;
    Ok(effective_config)
}

/// Reads `.folio-srv.toml` from `search_dir`; `Ok(None)` when there is none.
fn load_config_from_dir(search_dir: &Path) -> Result<Option<ServerConfig>> {
    let config_path = search_dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        debug!("No config file found at {}", config_path.display());
        return Ok(None);
    }

    info!("Loading configuration from {}", config_path.display());
    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let file_config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    let defaults = ServerConfig::default();

    let host = match file_config.host {
        Some(ref host_str) => host_str.parse().unwrap_or_else(|e| {
            warn!(
                "Invalid host IP '{}' in config file ({}), using default {}",
                host_str, e, defaults.host
            );
            defaults.host
        }),
        None => defaults.host,
    };

    let mut directory = PathBuf::from(file_config.directory.as_deref().unwrap_or("."));
    if directory.is_relative() {
        directory = search_dir.join(directory);
        debug!("Resolved relative directory from config to: {}", directory.display());
    }

    Ok(Some(ServerConfig {
        port: file_config.port.unwrap_or(defaults.port),
        host,
        directory,
        enable_cors: file_config.enable_cors.unwrap_or(defaults.enable_cors),
        index_file: file_config.index_file.unwrap_or(defaults.index_file),
    }))
}

impl ServerConfig {
    fn from_args(args: &SrvArgs) -> Self {
        Self {
            port: args.port,
            host: args.host,
            directory: args.directory.clone(),
            enable_cors: !args.no_cors,
            index_file: args.index.clone(),
        }
    }

    /// Makes `directory` absolute and canonical, failing unless it is a directory.
    async fn resolve_directory(&mut self) -> Result<()> {
        let absolute_path = if self.directory.is_absolute() {
            self.directory.clone()
        } else {
            env::current_dir()
                .context("Failed to get current working directory")?
                .join(&self.directory)
        };

        let canonical_path = tokio::fs::canonicalize(&absolute_path)
            .await
            .with_context(|| {
                format!(
                    "Directory '{}' could not be found or accessed",
                    absolute_path.display()
                )
            })?;
        let metadata = tokio::fs::metadata(&canonical_path)
            .await
            .with_context(|| format!("Failed to get metadata for path '{}'", canonical_path.display()))?;
        if !metadata.is_dir() {
            return Err(anyhow!(FolioError::Server(format!(
                "Path is not a directory: {}",
                canonical_path.display()
            ))));
        }

        self.directory = canonical_path;
        debug!("Resolved serving directory to: {}", self.directory.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tempfile::TempDir;

    fn args_for(dir: &Path) -> SrvArgs {
        SrvArgs {
            directory: dir.to_path_buf(),
            port: 8000,
            host: Ipv4Addr::LOCALHOST.into(),
            no_cors: false,
            index: "index.html".into(),
            source: KnowledgeArgs::default(),
        }
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(config.directory, PathBuf::from("."));
        assert!(config.enable_cors);
        assert_eq!(config.index_file, "index.html");
    }

    #[test]
    fn test_from_args() {
        let args = SrvArgs {
            directory: PathBuf::from("/srv/site"),
            port: 9000,
            host: "0.0.0.0".parse().unwrap(),
            no_cors: true,
            index: "app.html".to_string(),
            source: KnowledgeArgs::default(),
        };

        let config = ServerConfig::from_args(&args);

        assert_eq!(config.port, 9000);
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert_eq!(config.directory, PathBuf::from("/srv/site"));
        assert!(!config.enable_cors); // Inverted from --no-cors
        assert_eq!(config.index_file, "app.html");
    }

    #[test]
    fn test_parses_srv_args() {
        let args = SrvArgs::try_parse_from(["srv", "dist", "--port", "9001", "--no-cors"]).unwrap();
        assert_eq!(args.directory, PathBuf::from("dist"));
        assert_eq!(args.port, 9001);
        assert!(args.no_cors);
    }

    #[tokio::test]
    async fn test_load_config_from_dir_no_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        assert!(load_config_from_dir(temp_dir.path())?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_load_config_from_dir_with_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let dir_path = temp_dir.path().to_path_buf();
        let config_content = r#"
        port = 9090
        host = "0.0.0.0"
        directory = "public" # Relative path
        enable_cors = false
        index_file = "home.html"
        "#;
        fs::write(dir_path.join(CONFIG_FILE_NAME), config_content)?;

        let config = load_config_from_dir(&dir_path)?.expect("config file should load");
        assert_eq!(config.port, 9090);
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert_eq!(config.directory, dir_path.join("public"));
        assert!(!config.enable_cors);
        assert_eq!(config.index_file, "home.html");
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_host_in_file_falls_back() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "host = \"not-an-ip\"\n")?;
        let config = load_config_from_dir(temp_dir.path())?.unwrap();
        assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
        Ok(())
    }

    #[tokio::test]
    async fn test_resolve_directory_nonexistent() {
        let mut config = ServerConfig {
            directory: PathBuf::from("/path/that/definitely/does/not/exist"),
            ..ServerConfig::default()
        };
        assert!(config.resolve_directory().await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_directory_rejects_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file_path = temp_dir.path().join("index.html");
        fs::write(&file_path, "<html></html>")?;
        let mut config = ServerConfig {
            directory: file_path,
            ..ServerConfig::default()
        };
        let err = config.resolve_directory().await.unwrap_err();
        assert!(err.to_string().contains("not a directory"));
        Ok(())
    }

    #[tokio::test]
    async fn test_load_and_merge_file_fills_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let serve_subdir = temp_dir.path().join("dist");
        fs::create_dir(&serve_subdir)?;
        let config_content = r#"
        port = 9090
        directory = "dist"
        enable_cors = false
        index_file = "home.html"
        "#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content)?;

        let config = load_and_merge_config(args_for(temp_dir.path())).await?;

        assert_eq!(config.port, 9090);
        assert!(!config.enable_cors);
        assert_eq!(config.index_file, "home.html");
        assert_eq!(config.directory, fs::canonicalize(&serve_subdir)?);
        Ok(())
    }

    #[tokio::test]
    async fn test_load_and_merge_cli_overrides_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "port = 9001\nindex_file = \"default.htm\"\n",
        )?;

        let mut args = args_for(temp_dir.path());
        args.port = 9999;
        args.index = "app.htm".into();
        args.no_cors = true;

        let config = load_and_merge_config(args).await?;
        assert_eq!(config.port, 9999);
        assert_eq!(config.index_file, "app.htm");
        assert!(!config.enable_cors);
        assert_eq!(config.directory, fs::canonicalize(temp_dir.path())?);
        Ok(())
    }
}

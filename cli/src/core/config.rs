//! # Folio Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements the configuration system for Folio, handling loading,
//! merging, validation, and access to configuration data. It combines defaults,
//! user settings, and project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.folio.toml` in current directory or ancestors
//! 2. User-specific `config.toml` in the platform config directory
//! 3. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [chat]
//! reply_delay_ms = 500
//! conversation_ttl_secs = 1800
//! max_conversations = 1000
//!
//! [booking]
//! url = "https://calendly.com/thanon43"
//! service = "Calendly"
//!
//! [knowledge]
//! file = "~/folio/knowledge.toml"
//! ```
//!
//! ```rust
//! let cfg = config::load_config()?;
//! let delay = cfg.chat.reply_delay();
//! let booking_base = &cfg.booking.url;
//! ```
//!
use crate::assistant::controller::REPLY_DELAY;
use crate::core::error::{FolioError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

/// Conversation pacing and lifetime.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Delay before a knowledge answer is appended to the transcript.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    /// Idle time after which `folio srv` forgets a conversation.
    #[serde(default = "default_conversation_ttl_secs")]
    pub conversation_ttl_secs: u64,
    /// Upper bound on conversations `folio srv` keeps at once.
    #[serde(default = "default_max_conversations")]
    pub max_conversations: usize,
}

/// The external calendar-booking collaborator.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// Base address the collected appointment details are appended to.
    #[serde(default = "default_booking_url")]
    pub url: String,
    /// Display name of the booking service, used in assistant replies.
    #[serde(default = "default_booking_service")]
    pub service: String,
}

/// Where the knowledge base comes from.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct KnowledgeConfig {
    /// Optional TOML knowledge file (can use ~). Built-in profile when unset.
    pub file: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            conversation_ttl_secs: default_conversation_ttl_secs(),
            max_conversations: default_max_conversations(),
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            url: default_booking_url(),
            service: default_booking_service(),
        }
    }
}

impl ChatConfig {
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    pub fn conversation_ttl(&self) -> Duration {
        Duration::from_secs(self.conversation_ttl_secs)
    }
}

fn default_reply_delay_ms() -> u64 {
    REPLY_DELAY.as_millis() as u64
}
fn default_conversation_ttl_secs() -> u64 {
    30 * 60
}
fn default_max_conversations() -> usize {
    1000
}
fn default_booking_url() -> String {
    "https://calendly.com/thanon43".to_string()
}
fn default_booking_service() -> String {
    "Calendly".to_string()
}

const PROJECT_CONFIG_FILENAME: &str = ".folio.toml";

pub fn load_config() -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("dev", "Folio", "folio") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.folio.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks up from `start` looking for `.folio.toml`, stopping at a repository root.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the built-in default.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.chat.reply_delay_ms = if project_cfg.chat.reply_delay_ms != default_reply_delay_ms() {
        project_cfg.chat.reply_delay_ms
    } else {
        user.chat.reply_delay_ms
    };
    merged.chat.conversation_ttl_secs =
        if project_cfg.chat.conversation_ttl_secs != default_conversation_ttl_secs() {
            project_cfg.chat.conversation_ttl_secs
        } else {
            user.chat.conversation_ttl_secs
        };
    merged.chat.max_conversations =
        if project_cfg.chat.max_conversations != default_max_conversations() {
            project_cfg.chat.max_conversations
        } else {
            user.chat.max_conversations
        };
    merged.booking.url = if project_cfg.booking.url != default_booking_url() {
        project_cfg.booking.url
    } else {
        user.booking.url
    };
    merged.booking.service = if project_cfg.booking.service != default_booking_service() {
        project_cfg.booking.service
    } else {
        user.booking.service
    };
    merged.knowledge.file = project_cfg.knowledge.file.or(user.knowledge.file);
    merged
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    if let Some(file) = config.knowledge.file.as_mut() {
        *file = shellexpand::tilde(file).into_owned();
        debug!("Expanded knowledge file path: {}", file);
    }
    Ok(())
}

pub(crate) fn validate_config(config: &Config) -> Result<()> {
    info!("Validating final configuration...");
    let url = config.booking.url.trim();
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(anyhow!(FolioError::Config(format!(
            "Invalid booking url '{}'. Expected an http:// or https:// address.",
            config.booking.url
        ))));
    }
    if config.chat.conversation_ttl_secs == 0 {
        return Err(anyhow!(FolioError::Config(
            "chat.conversation_ttl_secs must be greater than zero.".to_string()
        )));
    }
    if config.chat.max_conversations == 0 {
        return Err(anyhow!(FolioError::Config(
            "chat.max_conversations must be greater than zero.".to_string()
        )));
    }
    if config.booking.service.trim().is_empty() {
        return Err(anyhow!(FolioError::Config(
            "Booking service name cannot be empty.".to_string()
        )));
    }
    if let Some(file) = &config.knowledge.file {
        let path = Path::new(file);
        if !path.is_file() {
            return Err(anyhow!(FolioError::Config(format!(
                "Configured knowledge file '{}' does not exist or is not a file.",
                path.display()
            ))));
        }
    }
    info!("Configuration validation successful.");
    Ok(())
}

//! # Configuration Module
//!
//! This module handles configuration management and data directory setup for Maestro.
//! It provides platform-appropriate storage locations and the tunable game settings.
//!
//! ## Data Storage
//!
//! Maestro stores its score database in the platform-standard data directory:
//! - Linux: `~/.local/share/maestro/`
//! - macOS: `~/Library/Application Support/maestro/`
//! - Windows: `%APPDATA%\maestro\`
//!
//! ## Settings File
//!
//! Game settings are read from `config.json` in the platform config directory
//! (`~/.config/maestro/config.json` on Linux). The file is optional and every
//! field in it is optional; command-line flags override whatever it says.
//!
//! ```json
//! {
//!   "pool_size": 4,
//!   "load_policy": "strict",
//!   "answer_delay_ms": 500
//! }
//! ```

use crate::catalog::LoadPolicy;
use crate::quiz::{DEFAULT_POOL_SIZE, MIN_OPTIONS};
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "maestro";

/// Returns the platform-appropriate score database path.
///
/// Creates the `maestro` data directory if it doesn't exist yet.
///
/// # Errors
///
/// This function will return an error if:
/// - The system data directory cannot be determined
/// - The maestro subdirectory cannot be created due to permissions
///
/// # Examples
///
/// ```no_run
/// use maestro::config::get_db_path;
///
/// let db_path = get_db_path()?;
/// println!("Scores stored in: {}", db_path.display());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn get_db_path() -> Result<PathBuf> {
    Ok(get_data_dir()?.join("scores.db"))
}

/// Returns the platform-appropriate data directory for Maestro, creating it
/// on first use.
///
/// # Errors
///
/// Returns an error if the data directory cannot be determined or created.
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!(
            "Could not determine system data directory. Please ensure your platform supports standard data directories."
        ))?;

    let maestro_dir = data_dir.join(APP_DIR);
    fs::create_dir_all(&maestro_dir)
        .with_context(|| format!(
            "Failed to create Maestro data directory at {}. Please check file permissions.",
            maestro_dir.display()
        ))?;

    Ok(maestro_dir)
}

/// Location of the optional settings file. Nothing is created.
#[must_use]
pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
}

/// Tunable game settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    /// Answer options per question.
    pub pool_size: usize,
    /// What to do with broken catalog records.
    pub load_policy: LoadPolicy,
    /// Treat an empty question as an error instead of skipping the round.
    pub strict_questions: bool,
    /// Pause after revealing the answer, in milliseconds.
    pub answer_delay_ms: u64,
    /// Catalog to load instead of the built-in one (file or asset directory).
    pub catalog_path: Option<PathBuf>,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            load_policy: LoadPolicy::default(),
            strict_questions: cfg!(debug_assertions),
            answer_delay_ms: 1000,
            catalog_path: None,
        }
    }
}

impl QuizConfig {
    /// Reads settings from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read, isn't valid JSON, or
    /// holds values that fail [`QuizConfig::validate`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Settings from the default config file, or defaults if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but can't be used.
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Some(path) if path.exists() => {
                debug!("Loading settings from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `pool_size` can't form a question.
    pub fn validate(&self) -> Result<()> {
        if self.pool_size < MIN_OPTIONS {
            anyhow::bail!(
                "pool_size must be at least {MIN_OPTIONS}, got {}",
                self.pool_size
            );
        }
        Ok(())
    }
}

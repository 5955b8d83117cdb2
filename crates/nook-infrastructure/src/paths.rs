//! Unified path management for nook configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/nook/              # Config directory
//! ├── config.toml              # Client configuration
//! ├── session.json             # Persisted credential pair (0600)
//! └── logs/                    # Application logs
//!     └── nook.log.YYYY-MM-DD
//! ```

use std::path::{Path, PathBuf};

const APP_DIR: &str = "nook";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home/config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => {
                write!(f, "Cannot find the user configuration directory")
            }
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for nook_core::NookError {
    fn from(e: PathError) -> Self {
        nook_core::NookError::config(e.to_string())
    }
}

/// Resolves every on-disk location the client uses.
///
/// With no base path the platform config directory is used
/// (`$XDG_CONFIG_HOME/nook` on Linux); a base path replaces it entirely,
/// which is what tests do.
#[derive(Debug, Clone)]
pub struct NookPaths {
    base: Option<PathBuf>,
}

impl NookPaths {
    pub fn new(base_path: Option<&Path>) -> Self {
        Self {
            base: base_path.map(Path::to_path_buf),
        }
    }

    /// Returns the nook configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/nook/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to the persisted session.
    ///
    /// # Security Note
    ///
    /// The file holds live credentials; it is written with 600 permissions.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }

    /// Returns the log directory.
    pub fn log_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("logs"))
    }
}

impl Default for NookPaths {
    fn default() -> Self {
        Self::new(None)
    }
}

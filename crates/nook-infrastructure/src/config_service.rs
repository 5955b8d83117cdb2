//! Configuration loading.
//!
//! Resolves [`ClientConfig`] from, in order of precedence:
//! 1. Environment variables (`NOOK_API_URL`, `NOOK_PAGE_SIZE`, `NOOK_TOKEN_FILE`)
//! 2. `~/.config/nook/config.toml`
//! 3. Built-in defaults

use crate::paths::NookPaths;
use nook_core::config::ClientConfig;
use nook_core::{NookError, Result};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub const ENV_API_URL: &str = "NOOK_API_URL";
pub const ENV_PAGE_SIZE: &str = "NOOK_PAGE_SIZE";
pub const ENV_TOKEN_FILE: &str = "NOOK_TOKEN_FILE";

/// Loads and saves the client configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    paths: NookPaths,
}

impl ConfigService {
    pub fn new(paths: NookPaths) -> Self {
        Self { paths }
    }

    /// Loads the configuration with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns an error if `config.toml` exists but is malformed, if an
    /// environment override cannot be parsed, or if the result is invalid.
    pub fn load(&self) -> Result<ClientConfig> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Same as [`load`](Self::load) with an injectable environment lookup.
    pub fn load_with_env<F>(&self, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = self.load_file()?.unwrap_or_default();
        apply_env_overrides(&mut config, env)?;
        config.validate()?;

        tracing::debug!(
            "[ConfigService] Using API base URL {} (page size {})",
            config.base_url(),
            config.page_size
        );
        Ok(config)
    }

    /// Reads `config.toml`, returning `None` when it does not exist.
    pub fn load_file(&self) -> Result<Option<ClientConfig>> {
        let path = self.paths.config_file()?;
        if !path.exists() {
            tracing::debug!("[ConfigService] No config file at {}", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let config: ClientConfig = toml::from_str(&content)?;
        Ok(Some(config))
    }

    /// Writes `config` to `config.toml`, creating the directory if needed.
    ///
    /// The file is written next to the target and renamed over it, so a
    /// reader never sees a half-written config.
    pub fn save(&self, config: &ClientConfig) -> Result<PathBuf> {
        config.validate()?;
        let content = toml::to_string_pretty(config)?;

        let path = self.paths.config_file()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        let mut tmp_file = fs::File::create(&tmp_path)?;
        tmp_file.write_all(content.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &path)?;

        tracing::info!("[ConfigService] Saved configuration to {}", path.display());
        Ok(path)
    }

    pub fn paths(&self) -> &NookPaths {
        &self.paths
    }
}

fn apply_env_overrides<F>(config: &mut ClientConfig, env: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = env(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api_base_url = url;
    }

    if let Some(raw) = env(ENV_PAGE_SIZE).filter(|v| !v.trim().is_empty()) {
        config.page_size = raw.trim().parse().map_err(|_| {
            NookError::config(format!(
                "{} must be a positive integer (got '{}')",
                ENV_PAGE_SIZE, raw
            ))
        })?;
    }

    if let Some(path) = env(ENV_TOKEN_FILE).filter(|v| !v.trim().is_empty()) {
        config.token_file = Some(PathBuf::from(path));
    }

    Ok(())
}

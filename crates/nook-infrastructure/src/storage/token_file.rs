//! File-backed credential storage.
//!
//! Keeps the credential pair in `session.json` as
//! `{"accessToken": "...", "refreshToken": "..."}`. Both slots live in one
//! file, so a write or delete always covers the pair.

use crate::paths::NookPaths;
use nook_core::auth::{CredentialPair, TokenStore};
use nook_core::{NookError, Result};
use std::fs::{self, File};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};

/// Token store persisted to a single JSON file.
///
/// Provides:
/// - **Atomicity**: writes go to a temp file that is fsynced and renamed over the target
/// - **Privacy**: the file is created with 600 permissions on Unix
///
/// Does NOT:
/// - Cache tokens in memory (every read hits the file, so a refresh done by
///   another process is seen on the next read)
/// - Lock across processes
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Creates a store at the default location (`~/.config/nook/session.json`).
    pub fn new() -> Result<Self> {
        let path = NookPaths::default().session_file()?;
        Ok(Self { path })
    }

    /// Creates a store at a custom path (for testing or config overrides).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a temporary file path next to the target for atomic writes.
    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| NookError::storage("Session path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| NookError::storage("Session path has no file name"))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<CredentialPair>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        let pair: CredentialPair = serde_json::from_str(&content)
            .map_err(|e| NookError::storage(format!("Session file is corrupt: {}", e)))?;

        // A half-written pair is treated as no session at all.
        if !pair.is_complete() {
            tracing::warn!(
                "[FileTokenStore] Ignoring incomplete credential pair at {}",
                self.path.display()
            );
            return Ok(None);
        }

        Ok(Some(pair))
    }

    fn save(&self, pair: &CredentialPair) -> Result<()> {
        if !pair.is_complete() {
            return Err(NookError::invalid_input(
                "Refusing to store a credential pair with an empty token",
            ));
        }

        // Ensure parent directory exists
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(pair)
            .map_err(|e| NookError::storage(format!("Failed to encode session: {}", e)))?;

        // Write to temporary file in the same directory
        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;

        // Set file permissions to 600 (user read/write only) on Unix
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp_file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        tmp_file.write_all(json.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        // Atomic rename
        fs::rename(&tmp_path, &self.path)?;

        tracing::debug!("[FileTokenStore] Saved session to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("[FileTokenStore] Removed {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

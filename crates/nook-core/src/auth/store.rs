//! Durable token storage trait.
//!
//! Defines the interface the session layer uses to persist credentials.

use super::model::{CredentialPair, TokenSlot};
use crate::error::Result;

/// Durable key-value storage for the two token slots.
///
/// The store exposes the slots individually for reads, but writes and
/// deletes always cover both slots at once so that a reader can never
/// observe an access token without its refresh token.
///
/// # Security Note
///
/// Implementations should ensure that:
/// - Persisted files are readable only by the current user (e.g., 600 on Unix)
/// - Tokens are never logged or included in error messages
pub trait TokenStore: Send + Sync {
    /// Loads the stored pair, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<CredentialPair>>;

    /// Replaces both slots with the given pair as one write.
    fn save(&self, pair: &CredentialPair) -> Result<()>;

    /// Removes both slots.
    fn clear(&self) -> Result<()>;

    /// Reads a single slot.
    fn get(&self, slot: TokenSlot) -> Result<Option<String>> {
        Ok(self.load()?.map(|pair| pair.slot(slot).to_string()))
    }
}

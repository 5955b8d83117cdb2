//! Authentication domain: credentials, session state, and the storage and
//! navigation capabilities the session layer is given.

pub mod model;
pub mod store;

pub use model::{AuthState, CredentialPair, Route, TokenSlot};
pub use store::TokenStore;

/// Front-end navigation capability.
///
/// The core only asks for a route; it does not own the route table.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

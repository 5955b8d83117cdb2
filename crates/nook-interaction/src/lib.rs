//! Network-facing layer: the reqwest transport, the session pipeline, and
//! typed resource clients.

pub mod api;
pub mod session;
pub mod transport;

pub use api::{
    AuthOutcome, FollowState, MessagesApi, NotificationsApi, PostsApi, ProfileApi, SearchApi,
};
pub use session::SessionManager;
pub use transport::ReqwestTransport;

//! Resource models returned by the backend.

pub mod message;
pub mod notification;
pub mod post;
pub mod user;

pub use message::{Conversation, Message};
pub use notification::{Notification, NotificationKind};
pub use post::{Comment, LikeState, NewPost, Post};
pub use user::{Profile, ProfileUpdate, UserSummary};

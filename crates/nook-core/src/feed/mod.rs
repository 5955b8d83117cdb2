//! Paginated list loading.
//!
//! A [`FeedSynchronizer`] drives one list view: it asks a [`PageSource`] for
//! pages, merges them into a [`PageWindow`], and turns the viewport's
//! "last item visible" signal into at most one continuation per transition.

pub mod source;
pub mod synchronizer;
pub mod visibility;
pub mod window;

pub use source::{Identified, PageSource};
pub use synchronizer::{FeedSynchronizer, LoadOutcome};
pub use visibility::VisibilityEdge;
pub use window::PageWindow;

//! Application layer for nook.
//!
//! Binds the resource clients to list synchronizers and provides the
//! composition root front ends start from.

pub mod client;
pub mod controller;
pub mod navigator;
pub mod sources;

pub use client::{BootstrapOptions, NookClient};
pub use controller::FeedController;
pub use navigator::ChannelNavigator;

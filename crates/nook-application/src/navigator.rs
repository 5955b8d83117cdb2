use nook_core::auth::{Navigator, Route};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

/// Forwards navigation requests to the front end over a channel.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: UnboundedSender<Route>,
}

impl ChannelNavigator {
    /// Creates a navigator and the receiver the front end reads routes from.
    pub fn channel() -> (Self, UnboundedReceiver<Route>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!("[ChannelNavigator] Navigate to {}", route);
        if self.tx.send(route).is_err() {
            tracing::debug!("[ChannelNavigator] No front end listening; dropped {}", route);
        }
    }
}

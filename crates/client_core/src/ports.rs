//! Capabilities the controllers call out to. The view layer supplies them.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use crate::router::Route;

pub trait NavigationPort: Send + Sync {
    fn navigate(&self, route: Route);
}

pub trait PreviewPort: Send + Sync {
    fn show(&self, asset_url: &str);
}

/// Navigation requests queued on a channel for the host loop to drain.
pub struct ChannelNavigator {
    tx: UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn channel() -> (Self, UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NavigationPort for ChannelNavigator {
    fn navigate(&self, route: Route) {
        if self.tx.send(route).is_err() {
            warn!(token = route.token(), "navigation: no host listening");
        }
    }
}

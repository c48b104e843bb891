use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::warn;
use uuid::Uuid;

// Define the various events that can occur in the cart engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    CartLineAdded {
        cart_id: Uuid,
        product_id: String,
        variant_id: Option<String>,
        quantity: i32,
    },
    CartLineRemoved {
        cart_id: Uuid,
        product_id: String,
        variant_id: Option<String>,
    },
    CartQuantityUpdated {
        cart_id: Uuid,
        product_id: String,
        variant_id: Option<String>,
        quantity: i32,
    },
    CartCleared(Uuid),
    CartIdentityChanged {
        cart_id: Uuid,
        identity: Option<String>,
    },
}

/// Handle for publishing cart events to interested subscribers.
///
/// Event delivery is observability, not a correctness dependency: a closed
/// channel logs a warning and the mutation proceeds.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::UnboundedSender<Event>,
}

impl EventSender {
    /// Creates a new EventSender over an existing channel half.
    pub fn new(sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { sender }
    }

    /// Creates a fresh channel and returns both halves.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Sends an event, logging instead of failing when nobody listens.
    pub fn send_or_log(&self, event: Event) {
        if let Err(err) = self.sender.send(event) {
            warn!("Failed to send event: {}", err);
        }
    }
}

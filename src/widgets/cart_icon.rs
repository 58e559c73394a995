use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use super::Widget;
use crate::events::{CART_CHANNEL, MessageContext, Subscription};

/// Header cart badge. Counts "item added" messages, not items.
pub struct CartIcon {
    context: MessageContext,
    count: Arc<watch::Sender<u64>>,
    subscription: Option<Subscription>,
}

impl CartIcon {
    pub fn new(context: MessageContext) -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            context,
            count: Arc::new(tx),
            subscription: None,
        }
    }

    pub fn count(&self) -> u64 {
        *self.count.borrow()
    }

    /// Receiver notified on every increment.
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.count.subscribe()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    fn subscribe_to_message_channel(&mut self) {
        if self.subscription.is_some() {
            debug!("cart icon already subscribed");
            return;
        }

        let count = Arc::clone(&self.count);
        self.subscription = Some(self.context.subscribe(CART_CHANNEL, move |event| {
            count.send_modify(|n| *n += 1);
            debug!(?event, count = *count.borrow(), "cart icon received add to cart");
        }));
    }
}

impl Widget for CartIcon {
    fn name(&self) -> &str {
        "cart-icon"
    }

    fn connect(&mut self) {
        self.subscribe_to_message_channel();
        info!(count = self.count(), "cart icon connected");
    }

    fn disconnect(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            info!(count = self.count(), "cart icon disconnected");
        }
    }
}

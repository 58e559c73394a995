use anyhow::{Result, bail};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::Widget;
use crate::events::{CART_CHANNEL, CartAddedEvent, Event, MessageContext, ProductId};
use crate::product::ProductRecord;
use crate::timer::{CountdownTimer, TimerState, format_display};

/// Product page body: record details, "add to cart", and the brew timer.
///
/// The countdown only exists while the widget is connected. Disconnecting
/// releases its tick source no matter what phase it is in.
pub struct ProductDetail {
    context: MessageContext,
    record_id: ProductId,
    product: Option<ProductRecord>,
    brew_secs: u32,
    timer: Option<CountdownTimer>,
}

impl ProductDetail {
    pub fn new(context: MessageContext, record_id: ProductId, brew_secs: u32) -> Self {
        Self {
            context,
            record_id,
            product: None,
            brew_secs,
            timer: None,
        }
    }

    /// Attach the resolved record for `record_id`.
    pub fn bind(&mut self, record: ProductRecord) {
        if record.id != self.record_id {
            warn!(expected = %self.record_id, got = %record.id, "binding record with a different id");
        }
        self.product = Some(record);
    }

    pub fn record_id(&self) -> &ProductId {
        &self.record_id
    }

    pub fn is_loading(&self) -> bool {
        self.product.is_none()
    }

    pub fn name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }

    pub fn product_code(&self) -> Option<&str> {
        self.product.as_ref()?.product_code.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.product.as_ref()?.description.as_deref()
    }

    pub fn family(&self) -> Option<&str> {
        self.product.as_ref()?.family.as_deref()
    }

    /// Publish an "item added" message for the bound product.
    ///
    /// Fire and forget: returns how many listeners received it. An unresolved
    /// record still publishes, with an empty product name.
    pub fn handle_add_to_cart(&self) -> usize {
        let product_name = match self.name() {
            Some(name) => name.to_string(),
            None => {
                warn!(product_id = %self.record_id, "adding unresolved product to cart");
                String::new()
            }
        };

        let delivered = self.context.publish(
            CART_CHANNEL,
            Event::CartAdded(CartAddedEvent {
                product_id: self.record_id.clone(),
                product_name,
            }),
        );
        debug!(product_id = %self.record_id, delivered, "published add to cart");
        delivered
    }

    /// Start the brew countdown. `Ok(false)` if it is already running.
    pub fn handle_start_timer(&mut self) -> Result<bool> {
        match self.timer.as_mut() {
            Some(timer) => timer.start(),
            None => bail!("product detail is not connected"),
        }
    }

    /// Put the countdown back to the full brew time. Refused while running.
    pub fn reset_timer(&mut self) -> bool {
        self.timer.as_mut().is_some_and(CountdownTimer::reset)
    }

    pub fn timer_state(&self) -> Option<TimerState> {
        self.timer.as_ref().map(CountdownTimer::state)
    }

    pub fn timer_watch(&self) -> Option<watch::Receiver<TimerState>> {
        self.timer.as_ref().map(CountdownTimer::watch)
    }

    /// `m:ss` of the countdown, or of the full brew time when disconnected.
    pub fn timer_display(&self) -> String {
        match &self.timer {
            Some(timer) => timer.display(),
            None => format_display(self.brew_secs),
        }
    }

    pub fn is_brewing(&self) -> bool {
        self.timer_state().is_some_and(|s| s.is_brewing())
    }
}

impl Widget for ProductDetail {
    fn name(&self) -> &str {
        "product-detail"
    }

    fn connect(&mut self) {
        if self.timer.is_some() {
            debug!("product detail already connected");
            return;
        }
        self.timer = Some(CountdownTimer::new(self.brew_secs));
        info!(product_id = %self.record_id, "product detail connected");
    }

    fn disconnect(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.stop();
            info!(product_id = %self.record_id, "product detail disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn detail(context: &MessageContext) -> ProductDetail {
        let mut detail = ProductDetail::new(context.clone(), ProductId::new("P1"), 180);
        detail.bind(ProductRecord::new("P1", "Royal Blend"));
        detail
    }

    fn capture(context: &MessageContext) -> (Arc<Mutex<Vec<Event>>>, crate::events::Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let sub = context.subscribe(CART_CHANNEL, move |e| sink.lock().unwrap().push(e.clone()));
        (seen, sub)
    }

    #[test]
    fn add_to_cart_publishes_bound_product() {
        let context = MessageContext::new();
        let (seen, _sub) = capture(&context);

        assert_eq!(detail(&context).handle_add_to_cart(), 1);

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen[0],
            Event::CartAdded(CartAddedEvent {
                product_id: ProductId::new("P1"),
                product_name: "Royal Blend".to_string(),
            })
        );
    }

    #[test]
    fn add_to_cart_without_record_sends_empty_name() {
        let context = MessageContext::new();
        let (seen, _sub) = capture(&context);
        let detail = ProductDetail::new(context.clone(), ProductId::new("P1"), 180);
        assert!(detail.is_loading());

        detail.handle_add_to_cart();

        match &seen.lock().unwrap()[0] {
            Event::CartAdded(e) => assert!(e.product_name.is_empty()),
        }
    }

    #[test]
    fn add_to_cart_with_no_listeners_is_fine() {
        let context = MessageContext::new();
        assert_eq!(detail(&context).handle_add_to_cart(), 0);
    }

    #[test]
    fn record_accessors() {
        let mut d = ProductDetail::new(MessageContext::new(), ProductId::new("P1"), 180);
        d.bind(ProductRecord {
            product_code: Some("RB-001".to_string()),
            family: Some("Black Tea".to_string()),
            ..ProductRecord::new("P1", "Royal Blend")
        });
        assert!(!d.is_loading());
        assert_eq!(d.name(), Some("Royal Blend"));
        assert_eq!(d.product_code(), Some("RB-001"));
        assert_eq!(d.family(), Some("Black Tea"));
        assert_eq!(d.description(), None);
    }

    #[test]
    fn start_timer_requires_connect() {
        let mut d = detail(&MessageContext::new());
        assert!(d.handle_start_timer().is_err());
        assert_eq!(d.timer_display(), "3:00");
    }

    #[tokio::test(start_paused = true)]
    async fn connect_creates_idle_timer() {
        let mut d = detail(&MessageContext::new());
        d.connect();
        let state = d.timer_state().unwrap();
        assert!(!state.is_brewing());
        assert_eq!(state.remaining_secs(), 180);

        assert!(d.handle_start_timer().unwrap());
        assert!(!d.handle_start_timer().unwrap());
        assert!(d.is_brewing());
    }

    #[tokio::test(start_paused = true)]
    async fn disconnect_drops_timer() {
        let mut d = detail(&MessageContext::new());
        d.connect();
        d.handle_start_timer().unwrap();
        d.disconnect();
        assert!(d.timer_state().is_none());
        assert!(!d.is_brewing());
    }
}

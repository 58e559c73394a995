//! Decoupled message channel for cross-widget communication.
//!
//! Widgets publish to a [`ChannelName`] through a shared [`MessageContext`]
//! and subscribe with a listener closure. Delivery is synchronous and runs
//! in subscription order; nothing is queued or replayed for late subscribers.
//!
//! The context is injected into each widget rather than living in a global,
//! so independent pages (and tests) never see each other's messages.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Channel the product detail publishes "item added" messages on.
pub const CART_CHANNEL: ChannelName = ChannelName::new("RoyalCartChannel");

/// Identifier of a product record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload of an "add to cart" action. Built fresh for every publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAddedEvent {
    pub product_id: ProductId,
    /// Empty when the product record had not resolved yet.
    pub product_name: String,
}

/// Messages that flow through a [`MessageContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum Event {
    /// An item was added to the cart.
    CartAdded(CartAddedEvent),
}

/// Name of a channel inside a [`MessageContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelName(&'static str);

impl ChannelName {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    channels: HashMap<ChannelName, Vec<(u64, Listener)>>,
}

impl Registry {
    fn remove(&mut self, channel: ChannelName, id: u64) -> bool {
        let Some(listeners) = self.channels.get_mut(&channel) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.channels.remove(&channel);
        }
        removed
    }
}

/// Shared publish/subscribe registry. Clones share the same listeners.
#[derive(Clone, Default)]
pub struct MessageContext {
    registry: Arc<Mutex<Registry>>,
}

impl fmt::Debug for MessageContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = lock(&self.registry);
        let mut map = f.debug_map();
        for (channel, listeners) in &registry.channels {
            map.entry(&channel.as_str(), &listeners.len());
        }
        map.finish()
    }
}

impl MessageContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every future message on `channel`.
    ///
    /// The listener stays registered for as long as the returned
    /// [`Subscription`] is alive.
    pub fn subscribe<F>(&self, channel: ChannelName, listener: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        let id = registry.next_id;
        registry.next_id += 1;
        registry
            .channels
            .entry(channel)
            .or_default()
            .push((id, Arc::new(listener)));
        debug!(%channel, id, "subscribed");

        Subscription {
            channel,
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every listener currently on `channel`.
    /// Returns the number of listeners that saw it.
    pub fn publish(&self, channel: ChannelName, event: Event) -> usize {
        // Snapshot so listeners can (un)subscribe or publish re-entrantly.
        let listeners: Vec<Listener> = lock(&self.registry)
            .channels
            .get(&channel)
            .map(|l| l.iter().map(|(_, listener)| Arc::clone(listener)).collect())
            .unwrap_or_default();

        debug!(%channel, listeners = listeners.len(), ?event, "publishing");
        for listener in &listeners {
            listener(&event);
        }
        listeners.len()
    }

    /// Number of live subscriptions on `channel`.
    pub fn subscriber_count(&self, channel: ChannelName) -> usize {
        lock(&self.registry)
            .channels
            .get(&channel)
            .map_or(0, Vec::len)
    }
}

/// Handle to one registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    channel: ChannelName,
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    pub fn channel(&self) -> ChannelName {
        self.channel
    }

    /// Remove the listener now. Same as dropping the handle.
    pub fn unsubscribe(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("channel", &self.channel)
            .field("id", &self.id)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        // Context already gone: nothing left to detach from.
        if let Some(registry) = self.registry.upgrade() {
            let removed = lock(&registry).remove(self.channel, self.id);
            debug!(channel = %self.channel, id = self.id, removed, "unsubscribed");
        }
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

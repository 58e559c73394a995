//! Independently mountable page widgets.
//!
//! Widgets never hold references to each other. Anything one needs to tell
//! another goes through the [`MessageContext`](crate::events::MessageContext)
//! they were constructed with.

pub mod cart_icon;
pub mod product_detail;

pub use cart_icon::CartIcon;
pub use product_detail::ProductDetail;

/// Lifecycle hooks run by the page that hosts a widget.
///
/// `connect` may be called again after `disconnect`. Calling it twice in a
/// row must not acquire anything twice.
pub trait Widget: Send {
    fn name(&self) -> &str;

    /// The widget was inserted into the page.
    fn connect(&mut self);

    /// The widget was removed. Must release every subscription and timer.
    fn disconnect(&mut self);
}

//! The page hosting the storefront widgets.
//!
//! Owns the shared [`MessageContext`] and runs widget lifecycle hooks on
//! mount and unmount. The cart icon can come and go; the product detail is
//! mounted for the page's whole lifetime.

use tracing::info;

use crate::events::MessageContext;
use crate::widgets::{CartIcon, ProductDetail, Widget};

pub struct Page {
    context: MessageContext,
    cart: Option<CartIcon>,
    detail: ProductDetail,
}

impl Page {
    /// Mount `detail` (connecting it) on a page sharing `context`.
    pub fn new(context: MessageContext, mut detail: ProductDetail) -> Self {
        detail.connect();
        info!(widget = Widget::name(&detail), "mounted");
        Self {
            context,
            cart: None,
            detail,
        }
    }

    pub fn context(&self) -> &MessageContext {
        &self.context
    }

    pub fn detail(&self) -> &ProductDetail {
        &self.detail
    }

    pub fn detail_mut(&mut self) -> &mut ProductDetail {
        &mut self.detail
    }

    /// Mount a fresh cart icon. Returns `false` if one is already mounted.
    pub fn mount_cart(&mut self) -> bool {
        if self.cart.is_some() {
            return false;
        }
        let mut cart = CartIcon::new(self.context.clone());
        cart.connect();
        info!(widget = cart.name(), "mounted");
        self.cart = Some(cart);
        true
    }

    /// Unmount the cart icon. Returns `false` if none was mounted.
    pub fn unmount_cart(&mut self) -> bool {
        match self.cart.take() {
            Some(mut cart) => {
                cart.disconnect();
                info!(widget = cart.name(), "unmounted");
                true
            }
            None => false,
        }
    }

    pub fn cart(&self) -> Option<&CartIcon> {
        self.cart.as_ref()
    }

    /// Count shown by the mounted cart icon, if any.
    pub fn cart_count(&self) -> Option<u64> {
        self.cart.as_ref().map(CartIcon::count)
    }

    /// Unmount everything. The page stays usable but inert.
    pub fn teardown(&mut self) {
        self.unmount_cart();
        self.detail.disconnect();
        info!("page torn down");
    }
}

impl Drop for Page {
    fn drop(&mut self) {
        self.teardown();
    }
}

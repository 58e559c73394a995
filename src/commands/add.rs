use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::page::Page;

pub struct AddCommand;

#[async_trait]
impl Command for AddCommand {
    fn name(&self) -> &str {
        "/add"
    }

    fn aliases(&self) -> &[&str] {
        &["/a"]
    }

    fn description(&self) -> &str {
        "add the current product to the cart"
    }

    async fn execute(&self, page: &mut Page) -> CommandResult {
        let detail = page.detail();
        detail.handle_add_to_cart();

        let name = detail.name().unwrap_or("(loading)");
        match page.cart_count() {
            Some(count) => println!("  ✓ added {name} (cart: {count})"),
            None => println!("  ✓ added {name} (no cart on the page)"),
        }
        CommandResult::Handled
    }
}

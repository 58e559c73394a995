use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::page::Page;

pub struct MountCommand;

#[async_trait]
impl Command for MountCommand {
    fn name(&self) -> &str {
        "/mount"
    }

    fn description(&self) -> &str {
        "put a cart icon on the page"
    }

    async fn execute(&self, page: &mut Page) -> CommandResult {
        if page.mount_cart() {
            println!("  cart icon mounted (0)");
        } else {
            println!("  cart icon already on the page");
        }
        CommandResult::Handled
    }
}

pub struct UnmountCommand;

#[async_trait]
impl Command for UnmountCommand {
    fn name(&self) -> &str {
        "/unmount"
    }

    fn description(&self) -> &str {
        "remove the cart icon from the page"
    }

    async fn execute(&self, page: &mut Page) -> CommandResult {
        if page.unmount_cart() {
            println!("  cart icon removed");
        } else {
            println!("  no cart icon on the page");
        }
        CommandResult::Handled
    }
}

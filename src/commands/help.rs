use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::page::Page;

/// Listed like any other command; the registry renders the text itself.
pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    fn name(&self) -> &str {
        "/help"
    }

    fn aliases(&self) -> &[&str] {
        &["/h", "/?"]
    }

    fn description(&self) -> &str {
        "show this help"
    }

    async fn execute(&self, _page: &mut Page) -> CommandResult {
        CommandResult::Handled
    }
}

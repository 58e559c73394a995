use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::page::Page;

pub struct QuitCommand;

#[async_trait]
impl Command for QuitCommand {
    fn name(&self) -> &str {
        "/quit"
    }

    fn aliases(&self) -> &[&str] {
        &["quit", "exit", "/exit"]
    }

    fn description(&self) -> &str {
        "leave the shop"
    }

    async fn execute(&self, _page: &mut Page) -> CommandResult {
        CommandResult::Quit
    }
}

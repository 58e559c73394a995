use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::page::Page;
use crate::timer::Phase;

pub struct StatusCommand;

#[async_trait]
impl Command for StatusCommand {
    fn name(&self) -> &str {
        "/status"
    }

    fn aliases(&self) -> &[&str] {
        &["/s"]
    }

    fn description(&self) -> &str {
        "show product, cart count, and timer"
    }

    async fn execute(&self, page: &mut Page) -> CommandResult {
        print!("{}", status_text(page));
        CommandResult::Handled
    }
}

fn status_text(page: &Page) -> String {
    let detail = page.detail();
    let product = match detail.name() {
        Some(name) => format!("{name} [{}]", detail.record_id()),
        None => format!("(loading) [{}]", detail.record_id()),
    };
    let cart = match page.cart_count() {
        Some(count) => count.to_string(),
        None => "not mounted".to_string(),
    };
    let phase = match detail.timer_state().map(|s| s.phase()) {
        Some(Phase::Idle) => "ready",
        Some(Phase::Running) => "brewing",
        Some(Phase::Finished) => "done",
        None => "off",
    };

    format!(
        "  product  {product}\n  cart     {cart}\n  timer    {} ({phase})\n",
        detail.timer_display()
    )
}

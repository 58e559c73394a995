use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::page::Page;

pub struct ResetCommand;

#[async_trait]
impl Command for ResetCommand {
    fn name(&self) -> &str {
        "/reset"
    }

    fn description(&self) -> &str {
        "put the brew timer back to full time"
    }

    async fn execute(&self, page: &mut Page) -> CommandResult {
        let detail = page.detail_mut();
        if detail.reset_timer() {
            println!("  timer reset to {}", detail.timer_display());
        } else if detail.is_brewing() {
            println!("  still brewing ({}), wait for it", detail.timer_display());
        } else {
            eprintln!("  ✗ timer not available");
        }
        CommandResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_page;

    #[tokio::test(start_paused = true)]
    async fn reset_refused_while_brewing() {
        let mut page = test_page();
        page.detail_mut().handle_start_timer().unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2500)).await;

        ResetCommand.execute(&mut page).await;
        assert_eq!(page.detail().timer_display(), "2:58");
    }

    #[tokio::test]
    async fn reset_idle_timer_keeps_full_time() {
        let mut page = test_page();
        ResetCommand.execute(&mut page).await;
        assert_eq!(page.detail().timer_display(), "3:00");
    }
}

use async_trait::async_trait;

use super::{Command, CommandResult};
use crate::page::Page;
use crate::timer::TimerState;

pub struct BrewCommand;

#[async_trait]
impl Command for BrewCommand {
    fn name(&self) -> &str {
        "/brew"
    }

    fn aliases(&self) -> &[&str] {
        &["/start"]
    }

    fn description(&self) -> &str {
        "start the brew timer"
    }

    async fn execute(&self, page: &mut Page) -> CommandResult {
        let detail = page.detail_mut();
        match detail.handle_start_timer() {
            Ok(true) => {
                println!("  ☕ brewing… {}", detail.timer_display());
                if let Some(mut rx) = detail.timer_watch() {
                    // Ends quietly if the timer is torn down first.
                    tokio::spawn(async move {
                        if rx.wait_for(TimerState::is_finished).await.is_ok() {
                            println!("\n  ☕ brew finished (0:00)");
                        }
                    });
                }
            }
            Ok(false) => println!("  already brewing ({})", detail.timer_display()),
            Err(e) => eprintln!("  ✗ cannot start timer: {e}"),
        }
        CommandResult::Handled
    }
}

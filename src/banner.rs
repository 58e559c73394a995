//! Startup banner and session summary display.

use crate::consts::{AUTHOR, HOMEPAGE, REPO};

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub product: &'a str,
    pub brew_time: &'a str,
    pub cart: &'a str,
    pub settings: &'a str,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║          R O Y A L   B R E W          ║
   ║      one more cup, one more click     ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   product   {}
   brew      {}
   cart      {}
   settings  {}

   type /help for commands
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.product,
        info.brew_time,
        info.cart,
        info.settings,
    );
}

/// Print the session summary (cart count + farewell).
pub fn print_session_summary(cart_count: Option<u64>) {
    if let Some(count) = cart_count.filter(|&n| n > 0) {
        let noun = if count == 1 { "item" } else { "items" };
        println!("session: {count} {noun} added to the cart");
    }
    println!("goodbye.");
}

//! Project-wide constants.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default brew time: three minutes.
pub const DEFAULT_BREW_SECONDS: u32 = 180;

/// Period of the countdown tick source.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Product shown when neither the CLI nor the settings name one.
pub const DEFAULT_PRODUCT_ID: &str = "P1";

/// Default database path: `~/.royal-brew/royal-brew.db`.
pub fn default_db_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".royal-brew").join("royal-brew.db"))
}

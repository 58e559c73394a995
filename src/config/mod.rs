//! Key-value settings storage backed by SQLite.
//!
//! Only preferences live here (brew time, default product). Cart contents
//! and timer progress are never written to disk.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

use crate::events::ProductId;

/// Settings the CLI knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    /// Countdown length in seconds.
    BrewSeconds,
    /// Product id shown on startup.
    Product,
}

impl Setting {
    pub const ALL: [Setting; 2] = [Setting::BrewSeconds, Setting::Product];

    pub fn key(&self) -> &'static str {
        match self {
            Setting::BrewSeconds => "brew_seconds",
            Setting::Product => "product",
        }
    }

    /// Check that `value` is acceptable for this setting.
    pub fn validate(&self, value: &str) -> Result<()> {
        match self {
            Setting::BrewSeconds => {
                parse_brew_seconds(value)?;
            }
            Setting::Product => {
                if value.trim().is_empty() {
                    bail!("product id must not be empty");
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Setting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('-', "_");
        Setting::ALL
            .into_iter()
            .find(|setting| setting.key() == normalized)
            .with_context(|| {
                let known: Vec<&str> = Setting::ALL.iter().map(Setting::key).collect();
                format!("unknown setting '{s}' (known: {})", known.join(", "))
            })
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn parse_brew_seconds(value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .with_context(|| format!("brew_seconds must be a whole number of seconds, got '{value}'"))
}

/// Persistent key-value configuration store.
pub struct Config {
    conn: Mutex<Connection>,
}

impl Config {
    /// Open or create the config table in the given database.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open config database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS config (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create config table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Get a config value by key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT value FROM config WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Set a config value (upsert).
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    /// Remove a config key.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.conn()
            .execute("DELETE FROM config WHERE key = ?1", [key])?;
        Ok(())
    }

    /// Validate and store a known setting.
    pub fn set_setting(&self, setting: Setting, value: &str) -> Result<()> {
        setting.validate(value)?;
        self.set(setting.key(), value.trim())
    }

    /// Stored brew time, if one was set.
    pub fn brew_seconds(&self) -> Result<Option<u32>> {
        self.get(Setting::BrewSeconds.key())?
            .map(|v| parse_brew_seconds(&v))
            .transpose()
    }

    /// Stored default product, if one was set.
    pub fn product(&self) -> Result<Option<ProductId>> {
        Ok(self.get(Setting::Product.key())?.map(ProductId::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_config() -> Config {
        Config::open(":memory:").unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_key() {
        let config = mem_config();
        assert!(config.get("nonexistent").unwrap().is_none());
    }

    #[test]
    fn set_overwrites_existing() {
        let config = mem_config();
        config.set("product", "P1").unwrap();
        config.set("product", "P2").unwrap();
        assert_eq!(config.get("product").unwrap().unwrap(), "P2");
    }

    #[test]
    fn remove_nonexistent_is_ok() {
        let config = mem_config();
        config.remove("nonexistent").unwrap();
    }

    #[test]
    fn brew_seconds_round_trips_as_number() {
        let config = mem_config();
        assert_eq!(config.brew_seconds().unwrap(), None);
        config.set_setting(Setting::BrewSeconds, " 240 ").unwrap();
        assert_eq!(config.brew_seconds().unwrap(), Some(240));
    }

    #[test]
    fn set_setting_rejects_bad_brew_seconds() {
        let config = mem_config();
        let err = config
            .set_setting(Setting::BrewSeconds, "three minutes")
            .unwrap_err();
        assert!(err.to_string().contains("brew_seconds"));
        assert!(config.get("brew_seconds").unwrap().is_none());
    }

    #[test]
    fn corrupt_stored_brew_seconds_is_an_error() {
        let config = mem_config();
        config.set("brew_seconds", "-5").unwrap();
        assert!(config.brew_seconds().is_err());
    }

    #[test]
    fn product_setting() {
        let config = mem_config();
        config.set_setting(Setting::Product, "P2").unwrap();
        assert_eq!(config.product().unwrap(), Some(ProductId::new("P2")));
        assert!(config.set_setting(Setting::Product, "  ").is_err());
    }

    #[test]
    fn setting_parses_with_dashes() {
        assert_eq!("brew-seconds".parse::<Setting>().unwrap(), Setting::BrewSeconds);
        assert_eq!("product".parse::<Setting>().unwrap(), Setting::Product);
        let err = "colour".parse::<Setting>().unwrap_err();
        assert!(err.to_string().contains("unknown setting"));
    }
}

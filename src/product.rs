//! Product records as handed to the detail widget.
//!
//! Fetching records is someone else's job; [`ProductSource`] is the seam.
//! [`Catalog`] is the in-memory source used by the CLI and the tests.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::events::ProductId;

/// A resolved product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub product_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
}

impl ProductRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.into(),
            product_code: None,
            description: None,
            family: None,
        }
    }
}

/// Where product records come from.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn get_record(&self, id: &ProductId) -> Result<Option<ProductRecord>>;
}

/// Product records held in memory.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: HashMap<ProductId, ProductRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The house blends available without a catalog file.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(ProductRecord {
            product_code: Some("RB-001".to_string()),
            description: Some("Assam and Ceylon, brewed strong.".to_string()),
            family: Some("Black Tea".to_string()),
            ..ProductRecord::new("P1", "Royal Blend")
        });
        catalog.insert(ProductRecord {
            product_code: Some("EG-002".to_string()),
            description: Some("Black tea with bergamot.".to_string()),
            family: Some("Black Tea".to_string()),
            ..ProductRecord::new("P2", "Earl Grey")
        });
        catalog
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ProductRecord> =
            serde_json::from_str(json).context("invalid product catalog")?;
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record);
        }
        Ok(catalog)
    }

    /// Load a JSON catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Add or replace a record.
    pub fn insert(&mut self, record: ProductRecord) {
        self.records.insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl ProductSource for Catalog {
    async fn get_record(&self, id: &ProductId) -> Result<Option<ProductRecord>> {
        Ok(self.records.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builtin_has_royal_blend() {
        let catalog = Catalog::builtin();
        let record = catalog
            .get_record(&ProductId::new("P1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.name, "Royal Blend");
    }

    #[tokio::test]
    async fn missing_record_is_none() {
        let catalog = Catalog::builtin();
        assert!(
            catalog
                .get_record(&ProductId::new("nope"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn from_json_reads_camel_case() {
        let catalog = Catalog::from_json(
            r#"[{"id": "P9", "name": "Darjeeling", "productCode": "DJ-9"}]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn from_json_rejects_garbage() {
        let err = Catalog::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("invalid product catalog"));
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read catalog"));
    }
}

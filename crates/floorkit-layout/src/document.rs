//! Layout document persistence.
//!
//! Implements save/load for layout documents as JSON with complete
//! item state preservation. The document is an opaque store to the
//! geometry core: an ordered item list plus metadata, keyed by layout
//! id by whatever collaborator owns storage.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::model::LayoutItem;

/// Document file format version.
const FILE_FORMAT_VERSION: &str = "1.0";

/// A complete layout document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub version: String,
    pub layout_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub modified: DateTime<Utc>,
    pub items: Vec<LayoutItem>,
}

impl LayoutDocument {
    pub fn new(layout_id: impl Into<String>) -> Self {
        Self {
            version: FILE_FORMAT_VERSION.to_owned(),
            layout_id: layout_id.into(),
            name: None,
            modified: Utc::now(),
            items: Vec::new(),
        }
    }

    pub fn with_items(layout_id: impl Into<String>, items: Vec<LayoutItem>) -> Self {
        let mut doc = Self::new(layout_id);
        doc.items = items;
        doc
    }

    pub fn find(&self, id: &str) -> Option<&LayoutItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut LayoutItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    /// The unique floor-plan boundary item, if present.
    pub fn floor_plan(&self) -> Option<&LayoutItem> {
        self.items.iter().find(|i| i.is_floor_plan())
    }

    /// Appends items (e.g. freshly converted import components) and
    /// touches the modified timestamp.
    pub fn append(&mut self, items: impl IntoIterator<Item = LayoutItem>) {
        self.items.extend(items);
        self.modified = Utc::now();
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize layout")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write layout to {}", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout from {}", path.display()))?;
        let doc = serde_json::from_str(&json).context("Failed to parse layout file")?;
        Ok(doc)
    }
}

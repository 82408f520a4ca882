//! Nested inventory records attached to layout items.
//!
//! These mirror what the inventory-report collaborator feeds into the
//! document; the capacity summarizer only ever reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inventory line held by an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Free-form location label, used when no id is assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub quantity: u32,
}

/// Inventory state nested under a layout item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inventory: Vec<InventoryEntry>,
    /// Fraction of capacity in use, 0.0 to 1.0.
    #[serde(default)]
    pub utilization: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_location_id: Option<String>,
}

impl InventoryData {
    /// True if any line, utilization or identifier is present.
    pub fn has_activity(&self) -> bool {
        !self.inventory.is_empty() || self.utilization > 0.0 || self.primary_location_id.is_some()
    }
}

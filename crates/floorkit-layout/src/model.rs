//! Layout item data model.
//!
//! A layout document is an ordered list of [`LayoutItem`] records plus
//! an implicit designation of the floor-plan boundary (the unique item
//! with `is_container` and container level 1). Items are exchanged
//! with UI and persistence collaborators as plain serializable
//! records; this crate neither defines nor depends on their storage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use floorkit_core::{Bounds, Point};

use crate::inventory::InventoryData;

/// Fixed vocabulary of placeable floor-plan element types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemType {
    /// Singleton storage unit occupying one logical slot
    StorageUnit,
    /// Singleton spare-parts unit
    SpareUnit,
    /// Rack with a horizontal run of compartments
    HorizontalRack,
    /// Rack with a vertical run of compartments
    VerticalRack,
    /// Visual divider between zones
    ZoneDivider,
    /// Container item; level 1 is the floor-plan boundary
    Boundary,
    Door,
    /// Free-drawn wall segment (CAD import)
    WallDraw,
    /// Generic storage area (CAD import)
    StorageArea,
    Workstation,
}

impl ItemType {
    /// Human-readable label used for display titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StorageUnit => "Storage Unit",
            Self::SpareUnit => "Spare Unit",
            Self::HorizontalRack => "Horizontal Rack",
            Self::VerticalRack => "Vertical Rack",
            Self::ZoneDivider => "Zone Divider",
            Self::Boundary => "Boundary",
            Self::Door => "Door",
            Self::WallDraw => "Wall",
            Self::StorageArea => "Storage Area",
            Self::Workstation => "Workstation",
        }
    }

    /// True for rack types with a logical compartment grid.
    pub fn is_rack(&self) -> bool {
        matches!(self, Self::HorizontalRack | Self::VerticalRack)
    }

    /// True for singleton unit types with a single logical slot.
    pub fn is_singleton_unit(&self) -> bool {
        matches!(self, Self::StorageUnit | Self::SpareUnit)
    }

    /// Default per-compartment capacity for rack types.
    pub fn default_max_per_compartment(&self) -> u32 {
        1
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-shelf location breakdown inside one compartment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLocationMapping {
    pub level: u32,
    pub location_id: String,
}

/// Occupancy of one rack compartment cell.
///
/// The three shapes found in layout documents are modeled as an
/// exhaustive variant rather than a record of optional fields, so the
/// quantity derivation is a plain match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CompartmentContent {
    /// Sub-shelf breakdown; one entry per occupied level.
    LevelMapped {
        level_location_mappings: Vec<LevelLocationMapping>,
    },
    /// Cell shared by several locations.
    MultiLocation {
        location_ids: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        sku_list: Vec<String>,
    },
    /// Single occupancy with an explicit count.
    Single {
        quantity: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        location_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        sku: Option<String>,
    },
}

/// Legacy sparse-map cells can mix fields from several shapes; an
/// explicit quantity takes priority over a location-id list, which
/// takes priority over level mappings. A derived untagged decode would
/// instead pick whichever variant happens to match first.
impl<'de> Deserialize<'de> for CompartmentContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct RawCell {
            quantity: Option<u32>,
            location_id: Option<String>,
            sku: Option<String>,
            location_ids: Option<Vec<String>>,
            sku_list: Option<Vec<String>>,
            level_location_mappings: Option<Vec<LevelLocationMapping>>,
        }

        let raw = RawCell::deserialize(deserializer)?;
        if let Some(quantity) = raw.quantity {
            return Ok(Self::Single {
                quantity,
                location_id: raw.location_id,
                sku: raw.sku,
            });
        }
        if let Some(location_ids) = raw.location_ids {
            return Ok(Self::MultiLocation {
                location_ids,
                sku_list: raw.sku_list.unwrap_or_default(),
            });
        }
        if let Some(level_location_mappings) = raw.level_location_mappings {
            return Ok(Self::LevelMapped {
                level_location_mappings,
            });
        }
        Ok(Self::Single {
            quantity: 1,
            location_id: raw.location_id,
            sku: raw.sku,
        })
    }
}

impl CompartmentContent {
    /// Number of occupied slots this cell contributes.
    ///
    /// Explicit positive quantity wins; otherwise the length of the
    /// id/mapping list if non-empty; otherwise 1.
    pub fn occupied_quantity(&self) -> u32 {
        match self {
            Self::Single { quantity, .. } => (*quantity).max(1),
            Self::MultiLocation { location_ids, .. } => location_ids.len().max(1) as u32,
            Self::LevelMapped {
                level_location_mappings,
            } => level_location_mappings.len().max(1) as u32,
        }
    }

    /// Location identifiers referenced by this cell.
    pub fn location_ids(&self) -> Vec<&str> {
        match self {
            Self::Single { location_id, .. } => {
                location_id.iter().map(String::as_str).collect()
            }
            Self::MultiLocation { location_ids, .. } => {
                location_ids.iter().map(String::as_str).collect()
            }
            Self::LevelMapped {
                level_location_mappings,
            } => level_location_mappings
                .iter()
                .map(|m| m.location_id.as_str())
                .collect(),
        }
    }

    /// SKU identifiers referenced by this cell.
    pub fn skus(&self) -> Vec<&str> {
        match self {
            Self::Single { sku, .. } => sku.iter().map(String::as_str).collect(),
            Self::MultiLocation { sku_list, .. } => {
                sku_list.iter().map(String::as_str).collect()
            }
            Self::LevelMapped { .. } => Vec::new(),
        }
    }
}

/// A placed floor-plan element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Top-left position in pixel space, local to the layout document.
    pub x: f64,
    pub y: f64,
    /// Pixel extents before rotation.
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees, kept in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_container: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_level: Option<u32>,
    /// Inward margin reserved inside a container's edges, in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_padding: Option<f64>,

    /// Sparse compartment occupancy, keyed by cell key (rack items only).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub compartment_contents: BTreeMap<String, CompartmentContent>,
    /// Per-item override of the per-compartment capacity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_per_compartment: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub location_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_location_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_sku: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sku_list: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_data: Option<InventoryData>,

    /// Set on components produced by the CAD import pipeline.
    #[serde(default, skip_serializing_if = "is_false")]
    pub imported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_layer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl LayoutItem {
    /// Creates an item at the given pixel position and extents.
    pub fn new(id: impl Into<String>, item_type: ItemType, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            item_type,
            x,
            y,
            width,
            height,
            rotation: 0.0,
            name: None,
            is_container: false,
            container_level: None,
            container_padding: None,
            compartment_contents: BTreeMap::new(),
            max_per_compartment: None,
            location_id: None,
            location_ids: Vec::new(),
            primary_location_id: None,
            sku: None,
            primary_sku: None,
            sku_list: Vec::new(),
            inventory_data: None,
            imported: false,
            source_layer: None,
            source_id: None,
        }
    }

    /// Creates the floor-plan boundary item (container level 1).
    pub fn boundary(id: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        let mut item = Self::new(id, ItemType::Boundary, x, y, width, height);
        item.is_container = true;
        item.container_level = Some(1);
        item
    }

    /// Sets the rotation, normalized into `[0, 360)`.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees.rem_euclid(360.0);
    }

    /// True for the unique container-level-1 floor-plan boundary.
    pub fn is_floor_plan(&self) -> bool {
        self.is_container && self.container_level == Some(1)
    }

    /// X coordinate of the unrotated right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the unrotated bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Unrotated footprint as bounds.
    pub fn footprint(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_normalized() {
        let mut item = LayoutItem::new("a", ItemType::StorageUnit, 0.0, 0.0, 50.0, 50.0);
        item.set_rotation(450.0);
        assert_eq!(item.rotation, 90.0);
        item.set_rotation(-90.0);
        assert_eq!(item.rotation, 270.0);
    }

    #[test]
    fn test_boundary_constructor() {
        let b = LayoutItem::boundary("fp", 0.0, 0.0, 800.0, 500.0);
        assert!(b.is_floor_plan());
        assert_eq!(b.item_type, ItemType::Boundary);
    }

    #[test]
    fn test_compartment_quantity_priority() {
        let explicit = CompartmentContent::Single {
            quantity: 3,
            location_id: None,
            sku: None,
        };
        assert_eq!(explicit.occupied_quantity(), 3);

        let multi = CompartmentContent::MultiLocation {
            location_ids: vec!["L1".into(), "L2".into()],
            sku_list: vec![],
        };
        assert_eq!(multi.occupied_quantity(), 2);

        let mapped = CompartmentContent::LevelMapped {
            level_location_mappings: vec![
                LevelLocationMapping { level: 1, location_id: "L3".into() },
                LevelLocationMapping { level: 2, location_id: "L4".into() },
                LevelLocationMapping { level: 3, location_id: "L5".into() },
            ],
        };
        assert_eq!(mapped.occupied_quantity(), 3);
        assert_eq!(mapped.location_ids(), vec!["L3", "L4", "L5"]);
    }

    #[test]
    fn test_compartment_serde_shapes() {
        // Sparse maps in existing documents carry any of the three shapes.
        let json = r#"{
            "a-1": {"quantity": 2, "sku": "SKU-9"},
            "a-2": {"location_ids": ["L1", "L2"]},
            "a-3": {"level_location_mappings": [{"level": 1, "location_id": "L7"}]}
        }"#;
        let map: BTreeMap<String, CompartmentContent> = serde_json::from_str(json).unwrap();
        assert_eq!(map["a-1"].occupied_quantity(), 2);
        assert_eq!(map["a-2"].occupied_quantity(), 2);
        assert_eq!(map["a-3"].location_ids(), vec!["L7"]);
    }

    #[test]
    fn test_mixed_cell_quantity_takes_priority() {
        // Legacy cells can carry both a count and a location list; the
        // explicit quantity decides the occupancy.
        let cell: CompartmentContent =
            serde_json::from_str(r#"{"quantity": 3, "location_ids": ["L1"]}"#).unwrap();
        assert!(matches!(cell, CompartmentContent::Single { quantity: 3, .. }));
        assert_eq!(cell.occupied_quantity(), 3);

        // Location ids beat level mappings when no quantity is given.
        let cell: CompartmentContent = serde_json::from_str(
            r#"{"location_ids": ["L1", "L2"],
                "level_location_mappings": [{"level": 1, "location_id": "L9"}]}"#,
        )
        .unwrap();
        assert!(matches!(cell, CompartmentContent::MultiLocation { .. }));
        assert_eq!(cell.occupied_quantity(), 2);

        // A bare cell still reads as a single occupied slot.
        let cell: CompartmentContent = serde_json::from_str(r#"{"sku": "SKU-4"}"#).unwrap();
        assert_eq!(cell.occupied_quantity(), 1);
        assert_eq!(cell.skus(), vec!["SKU-4"]);
    }

    #[test]
    fn test_item_json_roundtrip() {
        let mut item = LayoutItem::new("rack-1", ItemType::HorizontalRack, 60.0, 60.0, 120.0, 120.0);
        item.name = Some("Aisle 3 rack".into());
        item.compartment_contents.insert(
            "0-0".into(),
            CompartmentContent::Single { quantity: 2, location_id: Some("L1".into()), sku: None },
        );
        let json = serde_json::to_string(&item).unwrap();
        let back: LayoutItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}

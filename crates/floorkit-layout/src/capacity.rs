//! Capacity and inventory summarization.
//!
//! A pure reduction over the item collection: for every recognized
//! storage item it derives a display title, slot capacity, used
//! capacity from the sparse compartment map, and the set of
//! location/SKU identifiers the item references. The input collection
//! is never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{ItemType, LayoutItem};

/// Logical compartment grid cell size in pixels.
pub const RACK_GRID_SIZE: f64 = 60.0;

/// Read-only capacity report for one storage item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacitySummary {
    pub item_id: String,
    pub item_type: ItemType,
    pub title: String,
    pub max_capacity: u32,
    pub used_capacity: u32,
    pub available_capacity: u32,
    /// Deduplicated location identifiers in first-seen order.
    pub location_ids: Vec<String>,
    /// Deduplicated SKU identifiers in first-seen order.
    pub skus: Vec<String>,
}

/// Summarizes every recognized storage item in document order, then
/// sorts the report by type label and title.
pub fn summarize_inventory(items: &[LayoutItem]) -> Vec<CapacitySummary> {
    let mut type_counters: HashMap<ItemType, u32> = HashMap::new();
    let mut summaries: Vec<CapacitySummary> = items
        .iter()
        .filter(|item| item.item_type.is_rack() || item.item_type.is_singleton_unit())
        .map(|item| {
            let counter = type_counters.entry(item.item_type).or_insert(0);
            *counter += 1;
            summarize_item(item, *counter)
        })
        .collect();

    summaries.sort_by(|a, b| {
        a.item_type
            .label()
            .cmp(b.item_type.label())
            .then_with(|| a.title.cmp(&b.title))
    });
    summaries
}

fn summarize_item(item: &LayoutItem, ordinal: u32) -> CapacitySummary {
    let location_ids = collect_location_ids(item);
    let skus = collect_skus(item);

    let (max_capacity, used_capacity) = if item.item_type.is_rack() {
        rack_capacity(item)
    } else {
        singleton_capacity(item, &location_ids, &skus)
    };

    let title = item
        .name
        .clone()
        .unwrap_or_else(|| format!("{} {}", item.item_type.label(), ordinal));

    CapacitySummary {
        item_id: item.id.clone(),
        item_type: item.item_type,
        title,
        max_capacity,
        used_capacity,
        available_capacity: max_capacity.saturating_sub(used_capacity),
        location_ids,
        skus,
    }
}

/// Rack capacity from the logical compartment grid.
///
/// The grid is `round(width/60) x round(height/60)` with at least one
/// row and column; used capacity sums each populated cell's occupied
/// quantity, clamped to the maximum.
fn rack_capacity(item: &LayoutItem) -> (u32, u32) {
    let cols = ((item.width / RACK_GRID_SIZE).round() as u32).max(1);
    let rows = ((item.height / RACK_GRID_SIZE).round() as u32).max(1);
    let per_cell = item
        .max_per_compartment
        .unwrap_or_else(|| item.item_type.default_max_per_compartment());
    let max = cols * rows * per_cell;

    let used: u32 = item
        .compartment_contents
        .values()
        .map(|content| content.occupied_quantity())
        .sum();
    (max, used.min(max))
}

/// Singleton units hold one logical slot; it counts as used when the
/// item shows any inventory activity or resolvable identifier.
fn singleton_capacity(item: &LayoutItem, location_ids: &[String], skus: &[String]) -> (u32, u32) {
    let occupied = item
        .inventory_data
        .as_ref()
        .map(|d| d.has_activity())
        .unwrap_or(false)
        || !location_ids.is_empty()
        || !skus.is_empty();
    (1, occupied as u32)
}

fn push_unique(acc: &mut Vec<String>, value: &str) {
    if !value.is_empty() && !acc.iter().any(|v| v == value) {
        acc.push(value.to_owned());
    }
}

/// Every location identifier reachable from the item, deduplicated in
/// first-seen order: direct fields, array fields, compartment cells,
/// and nested inventory records.
fn collect_location_ids(item: &LayoutItem) -> Vec<String> {
    let mut ids = Vec::new();
    if let Some(id) = &item.location_id {
        push_unique(&mut ids, id);
    }
    if let Some(id) = &item.primary_location_id {
        push_unique(&mut ids, id);
    }
    for id in &item.location_ids {
        push_unique(&mut ids, id);
    }
    for content in item.compartment_contents.values() {
        for id in content.location_ids() {
            push_unique(&mut ids, id);
        }
    }
    if let Some(data) = &item.inventory_data {
        for entry in &data.inventory {
            if let Some(id) = &entry.location_id {
                push_unique(&mut ids, id);
            } else if let Some(loc) = &entry.location {
                push_unique(&mut ids, loc);
            }
        }
        if let Some(id) = &data.primary_location_id {
            push_unique(&mut ids, id);
        }
    }
    ids
}

/// Same treatment for SKU identifiers.
fn collect_skus(item: &LayoutItem) -> Vec<String> {
    let mut skus = Vec::new();
    if let Some(sku) = &item.sku {
        push_unique(&mut skus, sku);
    }
    if let Some(sku) = &item.primary_sku {
        push_unique(&mut skus, sku);
    }
    for sku in &item.sku_list {
        push_unique(&mut skus, sku);
    }
    for content in item.compartment_contents.values() {
        for sku in content.skus() {
            push_unique(&mut skus, sku);
        }
    }
    if let Some(data) = &item.inventory_data {
        for entry in &data.inventory {
            if let Some(sku) = &entry.sku {
                push_unique(&mut skus, sku);
            }
        }
    }
    skus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::{InventoryData, InventoryEntry};
    use crate::model::CompartmentContent;

    #[test]
    fn test_two_by_two_rack_scenario() {
        // 120x120 rack on the 60px grid is a 2x2 compartment grid. One
        // cell holds quantity 3, another two locations: used saturates
        // at the maximum of 4.
        let mut rack = LayoutItem::new("r1", ItemType::HorizontalRack, 0.0, 0.0, 120.0, 120.0);
        rack.compartment_contents.insert(
            "0-0".into(),
            CompartmentContent::Single { quantity: 3, location_id: None, sku: None },
        );
        rack.compartment_contents.insert(
            "1-1".into(),
            CompartmentContent::MultiLocation {
                location_ids: vec!["L1".into(), "L2".into()],
                sku_list: vec![],
            },
        );

        let summaries = summarize_inventory(&[rack]);
        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.max_capacity, 4);
        assert_eq!(s.used_capacity, 4);
        assert_eq!(s.available_capacity, 0);
        assert_eq!(s.location_ids, vec!["L1", "L2"]);
    }

    #[test]
    fn test_rack_minimum_grid() {
        let rack = LayoutItem::new("r", ItemType::VerticalRack, 0.0, 0.0, 10.0, 10.0);
        let s = &summarize_inventory(&[rack])[0];
        assert_eq!(s.max_capacity, 1);
        assert_eq!(s.used_capacity, 0);
    }

    #[test]
    fn test_max_per_compartment_override() {
        let mut rack = LayoutItem::new("r", ItemType::HorizontalRack, 0.0, 0.0, 120.0, 60.0);
        rack.max_per_compartment = Some(5);
        let s = &summarize_inventory(&[rack])[0];
        assert_eq!(s.max_capacity, 10);
    }

    #[test]
    fn test_singleton_empty_and_occupied() {
        let empty = LayoutItem::new("u1", ItemType::StorageUnit, 0.0, 0.0, 50.0, 50.0);
        let mut occupied = LayoutItem::new("u2", ItemType::StorageUnit, 0.0, 0.0, 50.0, 50.0);
        occupied.inventory_data = Some(InventoryData {
            inventory: vec![InventoryEntry {
                location_id: Some("L9".into()),
                location: None,
                sku: Some("SKU-1".into()),
                quantity: 4,
            }],
            utilization: 0.0,
            last_activity: None,
            primary_location_id: None,
        });

        let summaries = summarize_inventory(&[empty, occupied]);
        let by_id: HashMap<_, _> = summaries.iter().map(|s| (s.item_id.clone(), s)).collect();
        assert_eq!(by_id["u1"].used_capacity, 0);
        assert_eq!(by_id["u1"].available_capacity, 1);
        assert_eq!(by_id["u2"].used_capacity, 1);
        assert_eq!(by_id["u2"].location_ids, vec!["L9"]);
        assert_eq!(by_id["u2"].skus, vec!["SKU-1"]);
    }

    #[test]
    fn test_generated_titles_count_per_type() {
        let items = vec![
            LayoutItem::new("a", ItemType::StorageUnit, 0.0, 0.0, 50.0, 50.0),
            LayoutItem::new("b", ItemType::HorizontalRack, 0.0, 0.0, 60.0, 60.0),
            LayoutItem::new("c", ItemType::StorageUnit, 0.0, 0.0, 50.0, 50.0),
        ];
        let summaries = summarize_inventory(&items);
        let titles: Vec<_> = summaries.iter().map(|s| s.title.as_str()).collect();
        assert!(titles.contains(&"Storage Unit 1"));
        assert!(titles.contains(&"Storage Unit 2"));
        assert!(titles.contains(&"Horizontal Rack 1"));
    }

    #[test]
    fn test_unrecognized_types_skipped_and_sorted() {
        let mut named = LayoutItem::new("n", ItemType::StorageUnit, 0.0, 0.0, 50.0, 50.0);
        named.name = Some("Returns bin".into());
        let items = vec![
            LayoutItem::boundary("fp", 0.0, 0.0, 800.0, 500.0),
            LayoutItem::new("w", ItemType::Workstation, 0.0, 0.0, 50.0, 50.0),
            LayoutItem::new("r", ItemType::HorizontalRack, 0.0, 0.0, 60.0, 60.0),
            named,
        ];
        let summaries = summarize_inventory(&items);
        assert_eq!(summaries.len(), 2);
        // "Horizontal Rack" sorts before "Storage Unit".
        assert_eq!(summaries[0].item_id, "r");
        assert_eq!(summaries[1].title, "Returns bin");
    }

    #[test]
    fn test_capacity_bounds_invariant() {
        let mut rack = LayoutItem::new("r", ItemType::HorizontalRack, 0.0, 0.0, 120.0, 60.0);
        rack.compartment_contents.insert(
            "0-0".into(),
            CompartmentContent::Single { quantity: 99, location_id: None, sku: None },
        );
        for s in summarize_inventory(&[rack]) {
            assert!(s.used_capacity <= s.max_capacity);
            assert_eq!(s.available_capacity, s.max_capacity - s.used_capacity);
        }
    }
}

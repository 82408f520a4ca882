//! Boundary containment management.
//!
//! Checks and enforces containment of placed items inside the
//! floor-plan boundary, computes the minimal boundary size needed to
//! hold all items, and validates proposed placements and resizes.
//!
//! A missing boundary is never an error: every check degrades to
//! pass-through behavior, and validation outcomes are structured
//! results rather than exceptions so the caller can decide whether to
//! expand the boundary, reject the edit, or clamp silently.

use serde::{Deserialize, Serialize};
use tracing::debug;

use floorkit_core::Point;

use crate::model::LayoutItem;

/// Default inward margin inside a container's edges, in pixels.
pub const DEFAULT_CONTAINER_PADDING: f64 = 20.0;
/// Major grid step that boundary dimensions snap up to, in pixels.
pub const BOUNDARY_GRID_SIZE: f64 = 60.0;
/// Smallest width/height an item may be resized to, in pixels.
pub const MIN_ITEM_SIZE: f64 = 15.0;

/// Required boundary dimensions to hold the current item set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RequiredSize {
    pub width: f64,
    pub height: f64,
    /// True if either dimension exceeds the boundary's current size.
    pub needs_resize: bool,
}

/// Command describing a boundary resize the caller should apply.
///
/// Returned instead of invoking a mutation callback so the geometry
/// core stays side-effect-free.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryResize {
    pub target_id: String,
    pub width: f64,
    pub height: f64,
}

/// Outcome of validating a proposed item position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementValidation {
    /// Accepted or constrained position.
    pub x: f64,
    pub y: f64,
    pub is_valid: bool,
    /// True when the position only fits if the boundary grows.
    pub needs_boundary_expansion: bool,
}

/// Outcome of validating a proposed item resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeValidation {
    /// Accepted or clamped dimensions.
    pub width: f64,
    pub height: f64,
    /// True if clamping altered the requested size.
    pub was_constrained: bool,
}

/// Containment rules for one layout document.
#[derive(Debug, Clone)]
pub struct BoundaryManager {
    default_padding: f64,
    major_grid: f64,
    min_item_size: f64,
}

impl Default for BoundaryManager {
    fn default() -> Self {
        Self {
            default_padding: DEFAULT_CONTAINER_PADDING,
            major_grid: BOUNDARY_GRID_SIZE,
            min_item_size: MIN_ITEM_SIZE,
        }
    }
}

impl BoundaryManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn padding_of(&self, boundary: &LayoutItem) -> f64 {
        boundary.container_padding.unwrap_or(self.default_padding)
    }

    /// Finds the floor-plan boundary item, if any.
    pub fn floor_plan<'a>(&self, items: &'a [LayoutItem]) -> Option<&'a LayoutItem> {
        items.iter().find(|i| i.is_floor_plan())
    }

    /// True iff the item's unrotated footprint lies fully inside the
    /// boundary. A missing boundary means no constraint.
    pub fn is_within_boundary(&self, item: &LayoutItem, boundary: Option<&LayoutItem>) -> bool {
        let Some(b) = boundary else {
            return true;
        };
        item.x >= b.x && item.y >= b.y && item.right() <= b.right() && item.bottom() <= b.bottom()
    }

    /// Clamps the item's origin into the boundary's padded interior.
    ///
    /// Returns only the corrected position. If the item is larger than
    /// the padded interior, the origin rests at the padded top-left.
    pub fn constrain_to_boundary(&self, item: &LayoutItem, boundary: &LayoutItem) -> Point {
        let padding = self.padding_of(boundary);
        let min_x = boundary.x + padding;
        let min_y = boundary.y + padding;
        let max_x = boundary.right() - padding - item.width;
        let max_y = boundary.bottom() - padding - item.height;
        Point::new(
            item.x.min(max_x).max(min_x),
            item.y.min(max_y).max(min_y),
        )
    }

    /// Computes the boundary size needed to hold every non-container
    /// item, snapped up to the major grid.
    ///
    /// Growth is monotonic: the result is never smaller than the
    /// boundary's current dimensions.
    pub fn required_boundary_size(&self, items: &[LayoutItem], boundary: &LayoutItem) -> RequiredSize {
        let padding = self.padding_of(boundary);
        let mut max_right: f64 = 0.0;
        let mut max_bottom: f64 = 0.0;

        for item in items {
            if item.id == boundary.id || item.container_level == Some(1) {
                continue;
            }
            max_right = max_right.max(item.right() - boundary.x);
            max_bottom = max_bottom.max(item.bottom() - boundary.y);
        }

        let snap_up = |v: f64| (v / self.major_grid).ceil() * self.major_grid;
        let width = snap_up(max_right + padding).max(boundary.width);
        let height = snap_up(max_bottom + padding).max(boundary.height);

        RequiredSize {
            width,
            height,
            needs_resize: width > boundary.width || height > boundary.height,
        }
    }

    /// Returns the resize command to apply when the boundary must grow
    /// to hold the current item set, or `None` when no boundary exists
    /// or no resize is needed.
    pub fn auto_adjust_floor_plan(&self, items: &[LayoutItem]) -> Option<BoundaryResize> {
        let boundary = self.floor_plan(items)?;
        let required = self.required_boundary_size(items, boundary);
        if !required.needs_resize {
            return None;
        }
        debug!(
            target_id = %boundary.id,
            width = required.width,
            height = required.height,
            "floor plan requires resize"
        );
        Some(BoundaryResize {
            target_id: boundary.id.clone(),
            width: required.width,
            height: required.height,
        })
    }

    /// Validates a proposed item position against the boundary.
    ///
    /// Without a boundary the position is accepted as-is. An
    /// out-of-bounds position is returned constrained, with
    /// `needs_boundary_expansion` set so the caller can choose to grow
    /// the boundary instead; this method never grows it itself.
    pub fn validate_placement(&self, item: &LayoutItem, all_items: &[LayoutItem]) -> PlacementValidation {
        let Some(boundary) = self.floor_plan(all_items) else {
            return PlacementValidation {
                x: item.x,
                y: item.y,
                is_valid: true,
                needs_boundary_expansion: false,
            };
        };

        if self.is_within_boundary(item, Some(boundary)) {
            PlacementValidation {
                x: item.x,
                y: item.y,
                is_valid: true,
                needs_boundary_expansion: false,
            }
        } else {
            let constrained = self.constrain_to_boundary(item, boundary);
            PlacementValidation {
                x: constrained.x,
                y: constrained.y,
                is_valid: false,
                needs_boundary_expansion: true,
            }
        }
    }

    /// Validates a proposed resize against the space remaining between
    /// the item's fixed origin and the boundary's padded edge.
    ///
    /// Both dimensions are clamped to that maximum and floored at the
    /// minimum item size.
    pub fn validate_item_resize(
        &self,
        item: &LayoutItem,
        new_width: f64,
        new_height: f64,
        all_items: &[LayoutItem],
    ) -> ResizeValidation {
        let Some(boundary) = self.floor_plan(all_items) else {
            return ResizeValidation {
                width: new_width,
                height: new_height,
                was_constrained: false,
            };
        };

        let padding = self.padding_of(boundary);
        let max_width = boundary.right() - padding - item.x;
        let max_height = boundary.bottom() - padding - item.y;

        let width = new_width.min(max_width).max(self.min_item_size);
        let height = new_height.min(max_height).max(self.min_item_size);

        ResizeValidation {
            width,
            height,
            was_constrained: width != new_width || height != new_height,
        }
    }

    /// Containment audit: every non-container item not fully inside
    /// the boundary. Empty when no boundary exists.
    pub fn items_outside_boundary<'a>(&self, items: &'a [LayoutItem]) -> Vec<&'a LayoutItem> {
        let Some(boundary) = self.floor_plan(items) else {
            return Vec::new();
        };
        items
            .iter()
            .filter(|i| !i.is_container && !self.is_within_boundary(i, Some(boundary)))
            .collect()
    }
}

//! Bounds computation and fit-to-viewport scaling.
//!
//! Computes the union bounding box of a (possibly rotated) item
//! collection and the scale factor needed to re-render that content,
//! read-only, inside an arbitrarily sized container (thumbnail, modal,
//! report). Rotated items contribute the box of their rotated corners,
//! so they are never clipped by a box computed only from the unrotated
//! footprint.

use serde::{Deserialize, Serialize};
use std::fmt;

use floorkit_core::{rotate_point, Bounds, Point};

use crate::model::LayoutItem;

/// How content is scaled into a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Whole content visible; scale by the smaller axis ratio.
    Contain,
    /// Viewport fully covered; scale by the larger axis ratio.
    Cover,
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contain => write!(f, "contain"),
            Self::Cover => write!(f, "cover"),
        }
    }
}

/// Bounding box of an item after applying its rotation.
///
/// The unrotated corners are rotated about the item's own origin and
/// the box is the min/max over the four results. An unrotated item
/// yields its plain footprint.
pub fn rotated_bounds(item: &LayoutItem) -> Bounds {
    if item.rotation.abs() < 1e-6 {
        return item.footprint();
    }
    let origin = Point::new(item.x, item.y);
    let corners = [
        Point::new(0.0, 0.0),
        Point::new(item.width, 0.0),
        Point::new(0.0, item.height),
        Point::new(item.width, item.height),
    ];
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for corner in corners {
        let rotated = rotate_point(corner, Point::new(0.0, 0.0), item.rotation);
        let p = Point::new(origin.x + rotated.x, origin.y + rotated.y);
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Bounds::from_min_max(min_x, min_y, max_x, max_y)
}

/// Union of the rotated bounding boxes of all items.
///
/// An empty collection yields a unit-sized box at the origin so
/// downstream fit math never divides by zero.
pub fn content_bounds(items: &[LayoutItem]) -> Bounds {
    let mut iter = items.iter().map(rotated_bounds);
    match iter.next() {
        Some(first) => iter.fold(first, |acc, b| acc.union(&b)),
        None => Bounds::new(0.0, 0.0, 1.0, 1.0),
    }
}

/// Item collection translated into a padded local frame.
#[derive(Debug, Clone)]
pub struct NormalizedLayout {
    /// Items shifted so the content's top-left sits at (padding, padding).
    pub items: Vec<LayoutItem>,
    pub content_width: f64,
    pub content_height: f64,
}

/// Fit scale and frame computation for re-rendering a layout.
#[derive(Debug, Clone)]
pub struct FitCalculator {
    /// Padding around the content in its local frame, in pixels.
    pub padding: f64,
    /// Shrink factor applied after the axis-ratio fit.
    pub margin: f64,
    pub min_scale: f64,
    pub max_scale: f64,
}

impl Default for FitCalculator {
    fn default() -> Self {
        Self {
            padding: 20.0,
            margin: 0.90,
            min_scale: 0.1,
            max_scale: 2.0,
        }
    }
}

impl FitCalculator {
    pub fn new(padding: f64) -> Self {
        Self {
            padding,
            ..Self::default()
        }
    }

    /// Translates every item so the union's top-left maps to
    /// `(padding, padding)`, and reports the padded content dimensions.
    ///
    /// Idempotent on its own output: normalizing a normalized layout
    /// changes nothing.
    pub fn normalize(&self, items: &[LayoutItem]) -> NormalizedLayout {
        let bounds = content_bounds(items);
        let dx = self.padding - bounds.x;
        let dy = self.padding - bounds.y;
        let items = items
            .iter()
            .map(|item| {
                let mut moved = item.clone();
                moved.x += dx;
                moved.y += dy;
                moved
            })
            .collect();
        NormalizedLayout {
            items,
            content_width: bounds.width + 2.0 * self.padding,
            content_height: bounds.height + 2.0 * self.padding,
        }
    }

    /// Scale factor that fits content dimensions into a viewport.
    ///
    /// Contain takes the smaller axis ratio, cover the larger. The
    /// result is capped at 1 unless upscaling is allowed, shrunk by
    /// the margin factor, and clamped to `[min_scale, max_scale]`.
    /// Degenerate inputs (zero/negative/non-finite) fall back to 1.0.
    pub fn fit_scale(
        &self,
        content_width: f64,
        content_height: f64,
        viewport_width: f64,
        viewport_height: f64,
        mode: FitMode,
        allow_upscale: bool,
    ) -> f64 {
        let width_scale = viewport_width / content_width;
        let height_scale = viewport_height / content_height;
        let mut scale = match mode {
            FitMode::Contain => width_scale.min(height_scale),
            FitMode::Cover => width_scale.max(height_scale),
        };
        if !scale.is_finite() || scale <= 0.0 {
            return 1.0;
        }
        if !allow_upscale {
            scale = scale.min(1.0);
        }
        scale *= self.margin;
        scale.clamp(self.min_scale, self.max_scale)
    }

    /// Convenience: normalize then fit into the viewport in one step.
    pub fn fit(
        &self,
        items: &[LayoutItem],
        viewport_width: f64,
        viewport_height: f64,
        mode: FitMode,
        allow_upscale: bool,
    ) -> (NormalizedLayout, f64) {
        let normalized = self.normalize(items);
        let scale = self.fit_scale(
            normalized.content_width,
            normalized.content_height,
            viewport_width,
            viewport_height,
            mode,
            allow_upscale,
        );
        (normalized, scale)
    }
}

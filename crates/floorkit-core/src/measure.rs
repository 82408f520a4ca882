//! Pixel/real-world measurement system.
//!
//! [`MeasurementContext`] holds the drawing scale (pixels per
//! real-world unit), the snapping grid, and a ledger of named
//! measurement annotations. It is an explicit context object: the
//! layout-editing session owns one and passes it by reference to
//! every component that needs conversion, so concurrent sessions
//! never share hidden state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::geometry::Point;
use crate::units::{format_length, ScalePreset, Unit};

/// Default drawing scale: 10 pixels per real-world unit.
pub const DEFAULT_SCALE: f64 = 10.0;
/// Default snapping grid size in pixels.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;
/// Default snap tolerance in pixels.
pub const DEFAULT_SNAP_TOLERANCE: f64 = 10.0;
/// Default decimal precision for measurement labels.
pub const DEFAULT_PRECISION: usize = 2;

/// A stored measurement annotation between two points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub start: Point,
    pub end: Point,
    /// Distance between the endpoints in pixel space.
    pub pixel_distance: f64,
    /// Distance converted to real-world units at creation time.
    pub real_distance: f64,
    pub label: String,
    pub created_at: DateTime<Utc>,
}

/// Partial update applied to a stored measurement.
///
/// Changing either endpoint recomputes the derived distances and, if
/// no explicit label is supplied, the label.
#[derive(Debug, Clone, Default)]
pub struct MeasurementUpdate {
    pub start: Option<Point>,
    pub end: Option<Point>,
    pub label: Option<String>,
}

/// Serializable snapshot of the measurement system.
///
/// Scale and unit are optional in the payload: importing a snapshot
/// only overwrites them when present, but always replaces the
/// measurement table wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(default)]
    pub measurements: BTreeMap<String, Measurement>,
}

/// Scale, grid and measurement state for one layout-editing session.
#[derive(Debug, Clone)]
pub struct MeasurementContext {
    scale: f64,
    unit: Unit,
    grid_size: f64,
    snap_tolerance: f64,
    precision: usize,
    measurements: BTreeMap<String, Measurement>,
}

impl Default for MeasurementContext {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            unit: Unit::default(),
            grid_size: DEFAULT_GRID_SIZE,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
            precision: DEFAULT_PRECISION,
            measurements: BTreeMap::new(),
        }
    }
}

impl MeasurementContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scale in pixels per real-world unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current real-world unit.
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// Grid size in pixels.
    pub fn grid_size(&self) -> f64 {
        self.grid_size
    }

    pub fn set_grid_size(&mut self, grid_size: f64) {
        self.grid_size = grid_size;
    }

    pub fn snap_tolerance(&self) -> f64 {
        self.snap_tolerance
    }

    pub fn set_snap_tolerance(&mut self, tolerance: f64) {
        self.snap_tolerance = tolerance;
    }

    /// Decimal places used when formatting measurement labels.
    pub fn set_precision(&mut self, precision: usize) {
        self.precision = precision;
    }

    /// Sets the scale directly in pixels per unit.
    pub fn set_scale(&mut self, pixels_per_unit: f64, unit: Unit) {
        self.scale = pixels_per_unit;
        self.unit = unit;
    }

    /// Derives the scale from a named preset and a measured reference
    /// length.
    ///
    /// `scale = reference_length_pixels / preset.ratio()`. The unit is
    /// reset to the system default. Positivity of the reference length
    /// is the caller's responsibility; a zero or negative value yields
    /// a degenerate scale.
    pub fn set_scale_from_preset(&mut self, preset: ScalePreset, reference_length_pixels: f64) {
        self.scale = reference_length_pixels / preset.ratio();
        self.unit = Unit::default();
    }

    /// Converts a pixel length to real-world units.
    pub fn pixels_to_units(&self, px: f64) -> f64 {
        px / self.scale
    }

    /// Converts a real-world length to pixels. Exact inverse of
    /// [`pixels_to_units`](Self::pixels_to_units) up to floating-point
    /// rounding.
    pub fn units_to_pixels(&self, units: f64) -> f64 {
        units * self.scale
    }

    /// Euclidean distance between two points in pixel space.
    pub fn pixel_distance(&self, p1: &Point, p2: &Point) -> f64 {
        p1.distance_to(p2)
    }

    /// Distance between two points in real-world units.
    pub fn real_distance(&self, p1: &Point, p2: &Point) -> f64 {
        self.pixels_to_units(self.pixel_distance(p1, p2))
    }

    /// Area of a pixel-space rectangle in real-world unit², converting
    /// each side independently.
    pub fn real_area(&self, width_px: f64, height_px: f64) -> f64 {
        self.pixels_to_units(width_px) * self.pixels_to_units(height_px)
    }

    /// Rounds each coordinate to the nearest multiple of the grid size.
    pub fn snap_to_grid(&self, point: &Point) -> Point {
        Point::new(
            (point.x / self.grid_size).round() * self.grid_size,
            (point.y / self.grid_size).round() * self.grid_size,
        )
    }

    /// True if the point lies within the snap tolerance of its snapped
    /// position.
    pub fn is_near_grid(&self, point: &Point) -> bool {
        let snapped = self.snap_to_grid(point);
        point.distance_to(&snapped) <= self.snap_tolerance
    }

    /// Formats a real-world distance with the context precision and
    /// unit label.
    pub fn format_distance(&self, units: f64) -> String {
        format_length(units, self.unit, self.precision)
    }

    /// Stores a measurement between two points.
    ///
    /// The default label is the formatted real distance. An existing
    /// measurement with the same id is replaced.
    pub fn create_measurement(
        &mut self,
        id: &str,
        start: Point,
        end: Point,
        label: Option<&str>,
    ) -> &Measurement {
        let pixel_distance = self.pixel_distance(&start, &end);
        let real_distance = self.pixels_to_units(pixel_distance);
        let label = label
            .map(str::to_owned)
            .unwrap_or_else(|| self.format_distance(real_distance));
        let measurement = Measurement {
            start,
            end,
            pixel_distance,
            real_distance,
            label,
            created_at: Utc::now(),
        };
        self.measurements.insert(id.to_owned(), measurement);
        &self.measurements[id]
    }

    /// Merges an update into an existing measurement.
    ///
    /// Returns `None` for an unknown id. If either endpoint changes,
    /// the distances are recomputed and the label is regenerated
    /// unless the update carries its own.
    pub fn update_measurement(&mut self, id: &str, update: MeasurementUpdate) -> Option<&Measurement> {
        // Derived fields depend on &self, so compute before the
        // mutable borrow of the entry.
        let current = self.measurements.get(id)?;
        let start = update.start.unwrap_or(current.start);
        let end = update.end.unwrap_or(current.end);
        let endpoints_changed = update.start.is_some() || update.end.is_some();

        let (pixel_distance, real_distance) = if endpoints_changed {
            let px = self.pixel_distance(&start, &end);
            (px, self.pixels_to_units(px))
        } else {
            (current.pixel_distance, current.real_distance)
        };
        let label = match (&update.label, endpoints_changed) {
            (Some(label), _) => label.clone(),
            (None, true) => self.format_distance(real_distance),
            (None, false) => current.label.clone(),
        };

        let entry = self.measurements.get_mut(id)?;
        entry.start = start;
        entry.end = end;
        entry.pixel_distance = pixel_distance;
        entry.real_distance = real_distance;
        entry.label = label;
        Some(&self.measurements[id])
    }

    /// Removes a measurement. Returns false for an unknown id.
    pub fn delete_measurement(&mut self, id: &str) -> bool {
        self.measurements.remove(id).is_some()
    }

    pub fn get_measurement(&self, id: &str) -> Option<&Measurement> {
        self.measurements.get(id)
    }

    /// All stored measurements, ordered by id.
    pub fn measurements(&self) -> impl Iterator<Item = (&String, &Measurement)> {
        self.measurements.iter()
    }

    pub fn measurement_count(&self) -> usize {
        self.measurements.len()
    }

    pub fn clear_measurements(&mut self) {
        self.measurements.clear();
    }

    /// Exports scale, unit and the full measurement table.
    pub fn export(&self) -> MeasurementSnapshot {
        MeasurementSnapshot {
            scale: Some(self.scale),
            unit: Some(self.unit),
            measurements: self.measurements.clone(),
        }
    }

    /// Restores state from a snapshot.
    ///
    /// Scale and unit are only overwritten when present in the
    /// payload; the measurement table is always replaced wholesale.
    pub fn import(&mut self, snapshot: MeasurementSnapshot) {
        if let Some(scale) = snapshot.scale {
            self.scale = scale;
        }
        if let Some(unit) = snapshot.unit {
            self.unit = unit;
        }
        self.measurements = snapshot.measurements;
        debug!(count = self.measurements.len(), "measurement snapshot imported");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scale_from_preset() {
        // Scenario: "1:100" preset calibrated against a 1000px reference
        // gives 10 px/unit, so 1000px reads as 100 units.
        let mut ctx = MeasurementContext::new();
        ctx.set_scale_from_preset(ScalePreset::OneToHundred, 1000.0);
        assert_eq!(ctx.scale(), 10.0);
        assert_eq!(ctx.unit(), Unit::Meters);
        assert_eq!(ctx.pixels_to_units(1000.0), 100.0);
    }

    #[test]
    fn test_real_distance_and_area() {
        let mut ctx = MeasurementContext::new();
        ctx.set_scale(10.0, Unit::Meters);
        let d = ctx.real_distance(&Point::new(0.0, 0.0), &Point::new(30.0, 40.0));
        assert_eq!(d, 5.0);
        assert_eq!(ctx.real_area(100.0, 50.0), 50.0);
    }

    #[test]
    fn test_snap_to_grid() {
        let mut ctx = MeasurementContext::new();
        ctx.set_grid_size(20.0);
        let snapped = ctx.snap_to_grid(&Point::new(28.0, 51.0));
        assert_eq!(snapped, Point::new(20.0, 60.0));

        ctx.set_snap_tolerance(10.0);
        assert!(ctx.is_near_grid(&Point::new(24.0, 58.0)));
        assert!(!ctx.is_near_grid(&Point::new(30.0, 50.0)));
    }

    #[test]
    fn test_measurement_default_label() {
        let mut ctx = MeasurementContext::new();
        ctx.set_scale(10.0, Unit::Meters);
        let m = ctx.create_measurement("m1", Point::new(0.0, 0.0), Point::new(100.0, 0.0), None);
        assert_eq!(m.real_distance, 10.0);
        assert_eq!(m.label, "10.00 m");
    }

    #[test]
    fn test_update_recomputes_on_endpoint_change() {
        let mut ctx = MeasurementContext::new();
        ctx.set_scale(10.0, Unit::Meters);
        ctx.create_measurement("m1", Point::new(0.0, 0.0), Point::new(100.0, 0.0), None);

        let updated = ctx
            .update_measurement(
                "m1",
                MeasurementUpdate {
                    end: Some(Point::new(200.0, 0.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.real_distance, 20.0);
        assert_eq!(updated.label, "20.00 m");

        // Label-only update leaves distances untouched.
        let relabeled = ctx
            .update_measurement(
                "m1",
                MeasurementUpdate {
                    label: Some("north wall".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(relabeled.real_distance, 20.0);
        assert_eq!(relabeled.label, "north wall");
    }

    #[test]
    fn test_unknown_measurement_id() {
        let mut ctx = MeasurementContext::new();
        assert!(ctx.update_measurement("ghost", MeasurementUpdate::default()).is_none());
        assert!(!ctx.delete_measurement("ghost"));
    }

    #[test]
    fn test_export_import_roundtrip() {
        let mut ctx = MeasurementContext::new();
        ctx.set_scale(12.5, Unit::Feet);
        ctx.create_measurement("a", Point::new(0.0, 0.0), Point::new(50.0, 0.0), None);
        ctx.create_measurement("b", Point::new(10.0, 10.0), Point::new(10.0, 90.0), Some("aisle"));

        let json = serde_json::to_string(&ctx.export()).unwrap();
        let snapshot: MeasurementSnapshot = serde_json::from_str(&json).unwrap();

        let mut restored = MeasurementContext::new();
        restored.import(snapshot);
        assert_eq!(restored.scale(), 12.5);
        assert_eq!(restored.unit(), Unit::Feet);
        assert_eq!(restored.measurement_count(), 2);
        assert_eq!(
            restored.get_measurement("b").unwrap().label,
            ctx.get_measurement("b").unwrap().label
        );
    }

    #[test]
    fn test_import_without_scale_keeps_current() {
        let mut ctx = MeasurementContext::new();
        ctx.set_scale(42.0, Unit::Inches);
        ctx.create_measurement("old", Point::new(0.0, 0.0), Point::new(1.0, 0.0), None);

        ctx.import(MeasurementSnapshot {
            scale: None,
            unit: None,
            measurements: BTreeMap::new(),
        });
        assert_eq!(ctx.scale(), 42.0);
        assert_eq!(ctx.unit(), Unit::Inches);
        assert_eq!(ctx.measurement_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_scale_roundtrip(px in 0.001f64..1e6, scale in 0.01f64..1e4) {
            let mut ctx = MeasurementContext::new();
            ctx.set_scale(scale, Unit::Meters);
            let back = ctx.units_to_pixels(ctx.pixels_to_units(px));
            prop_assert!((back - px).abs() <= px.abs() * 1e-9);
        }
    }
}

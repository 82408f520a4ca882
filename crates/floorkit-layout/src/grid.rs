//! Grid-line generation and polygon measurement.
//!
//! Companion helpers built on [`MeasurementContext`]: grid-line
//! descriptors for rendering, shoelace polygon area, and perimeter,
//! with pixel results converted to real-world units.

use serde::{Deserialize, Serialize};

use floorkit_core::{MeasurementContext, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// One renderable grid line. Not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub orientation: Orientation,
    /// Offset along the perpendicular axis, in pixels.
    pub position: f64,
    /// Extent along the line's own axis, in pixels.
    pub length: f64,
    /// True for every `major_every`-th line.
    pub major: bool,
}

/// Generates minor and major grid lines covering a viewport.
///
/// Lines are spaced at the context grid size; every `major_every`-th
/// line (starting at the origin) is flagged major. A zero spacing or
/// viewport yields no lines.
pub fn grid_lines(
    viewport_width: f64,
    viewport_height: f64,
    ctx: &MeasurementContext,
    major_every: usize,
) -> Vec<GridLine> {
    let spacing = ctx.grid_size();
    if spacing <= 0.0 || viewport_width <= 0.0 || viewport_height <= 0.0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut index = 0usize;
    let mut x = 0.0;
    while x <= viewport_width {
        lines.push(GridLine {
            orientation: Orientation::Vertical,
            position: x,
            length: viewport_height,
            major: major_every > 0 && index % major_every == 0,
        });
        index += 1;
        x = index as f64 * spacing;
    }
    index = 0;
    let mut y = 0.0;
    while y <= viewport_height {
        lines.push(GridLine {
            orientation: Orientation::Horizontal,
            position: y,
            length: viewport_width,
            major: major_every > 0 && index % major_every == 0,
        });
        index += 1;
        y = index as f64 * spacing;
    }
    lines
}

/// Polygon area in pixel² via the shoelace formula.
pub fn polygon_pixel_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum.abs() / 2.0
}

/// Polygon area in real-world unit².
///
/// Converts via `pixels_to_units(sqrt(pixel_area))²`, matching the
/// original measurement behavior. Exact only for a uniform scalar
/// scale, which is all this system supports.
pub fn polygon_real_area(points: &[Point], ctx: &MeasurementContext) -> f64 {
    let side = polygon_pixel_area(points).sqrt();
    let real_side = ctx.pixels_to_units(side);
    real_side * real_side
}

/// Polygon perimeter in real-world units, closing edge included.
pub fn polygon_perimeter(points: &[Point], ctx: &MeasurementContext) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut pixels = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        pixels += points[i].distance_to(&points[j]);
    }
    ctx.pixels_to_units(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorkit_core::Unit;

    fn square_100() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 100.0),
            Point::new(0.0, 100.0),
        ]
    }

    #[test]
    fn test_shoelace_square() {
        assert_eq!(polygon_pixel_area(&square_100()), 10_000.0);
    }

    #[test]
    fn test_shoelace_triangle() {
        let tri = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)];
        assert_eq!(polygon_pixel_area(&tri), 50.0);
    }

    #[test]
    fn test_degenerate_polygons() {
        assert_eq!(polygon_pixel_area(&[]), 0.0);
        assert_eq!(polygon_pixel_area(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_real_area_matches_rect_conversion() {
        // For a uniform scale the sqrt approximation agrees with
        // converting each side.
        let mut ctx = MeasurementContext::new();
        ctx.set_scale(10.0, Unit::Meters);
        let area = polygon_real_area(&square_100(), &ctx);
        assert!((area - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_perimeter_closes_polygon() {
        let mut ctx = MeasurementContext::new();
        ctx.set_scale(10.0, Unit::Meters);
        let p = polygon_perimeter(&square_100(), &ctx);
        assert!((p - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_grid_lines_cover_viewport() {
        let mut ctx = MeasurementContext::new();
        ctx.set_grid_size(20.0);
        let lines = grid_lines(100.0, 60.0, &ctx, 3);

        let verticals: Vec<_> = lines
            .iter()
            .filter(|l| l.orientation == Orientation::Vertical)
            .collect();
        // x = 0, 20, 40, 60, 80, 100
        assert_eq!(verticals.len(), 6);
        assert!(verticals[0].major);
        assert!(!verticals[1].major);
        assert!(verticals[3].major);
        assert_eq!(verticals[5].position, 100.0);
        assert_eq!(verticals[0].length, 60.0);

        let horizontals = lines.len() - verticals.len();
        // y = 0, 20, 40, 60
        assert_eq!(horizontals, 4);
    }

    #[test]
    fn test_grid_lines_degenerate_inputs() {
        let ctx = MeasurementContext::new();
        assert!(grid_lines(0.0, 100.0, &ctx, 5).is_empty());
        let mut zero_grid = MeasurementContext::new();
        zero_grid.set_grid_size(0.0);
        assert!(grid_lines(100.0, 100.0, &zero_grid, 5).is_empty());
    }
}

//! # CAD Import Pipeline
//!
//! Converts an imported vector drawing into typed floor-plan
//! components. One import runs a fixed sequence: detect format,
//! parse, classify elements into layers, compute drawing bounds, and
//! (on demand) convert recognized elements into [`LayoutItem`]s under
//! configurable conversion rules.
//!
//! Parsed artifacts ([`Element`], [`Layer`], [`ImportResult`]) are
//! transient: only the converted components persist in the layout
//! document. Failures never yield partial results.

mod convert;
mod svg;

pub use convert::{apply_transform, convert_to_components, ConversionConfig, ConversionRule};
pub use svg::{default_classifier, parse_svg, ClassifierRule, LayerClassifier};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use floorkit_core::{Bounds, ImportError, Point, Result};

/// Supported and recognized import file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// SVG (Scalable Vector Graphics)
    Svg,
    /// DXF (Drawing Exchange Format) - recognized, not yet parsed
    Dxf,
    /// PDF vector drawings - recognized, not yet parsed
    Pdf,
    /// DWG drawings - recognized, not yet parsed
    Dwg,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Svg => write!(f, "SVG"),
            Self::Dxf => write!(f, "DXF"),
            Self::Pdf => write!(f, "PDF"),
            Self::Dwg => write!(f, "DWG"),
        }
    }
}

/// Raw geometry of one parsed drawing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Geometry {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
    Ellipse { cx: f64, cy: f64, rx: f64, ry: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polyline { points: Vec<Point> },
    Polygon { points: Vec<Point> },
    Path { d: String },
    Text { x: f64, y: f64, content: String },
}

impl Geometry {
    /// Shape-specific extent, used to grow the drawing's running
    /// min/max. Paths and text carry no usable extent and contribute
    /// nothing.
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            Self::Rect { x, y, width, height } => Some(Bounds::new(*x, *y, *width, *height)),
            Self::Circle { cx, cy, r } => {
                Some(Bounds::new(cx - r, cy - r, 2.0 * r, 2.0 * r))
            }
            Self::Ellipse { cx, cy, rx, ry } => {
                Some(Bounds::new(cx - rx, cy - ry, 2.0 * rx, 2.0 * ry))
            }
            Self::Line { x1, y1, x2, y2 } => Some(Bounds::from_min_max(
                x1.min(*x2),
                y1.min(*y2),
                x1.max(*x2),
                y1.max(*y2),
            )),
            Self::Polyline { points } | Self::Polygon { points } => point_set_bounds(points),
            Self::Path { .. } | Self::Text { .. } => None,
        }
    }
}

fn point_set_bounds(points: &[Point]) -> Option<Bounds> {
    let first = points.first()?;
    let mut min_x = first.x;
    let mut min_y = first.y;
    let mut max_x = first.x;
    let mut max_y = first.y;
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Bounds::from_min_max(min_x, min_y, max_x, max_y))
}

/// Presentation style resolved for one element.
///
/// Inline `style=""` declarations win over presentation attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

/// One parsed drawing element with its resolved layer and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Classification bucket (walls, doors, equipment, ...).
    pub layer: String,
    pub geometry: Geometry,
    #[serde(default)]
    pub style: Style,
}

/// Elements grouped by classified layer, in first-seen order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub elements: Vec<Element>,
    pub visible: bool,
    /// Default render color for the layer tag.
    pub color: String,
}

/// Default render color for a classified layer tag.
fn layer_color(name: &str) -> &'static str {
    match name {
        "walls" => "#374151",
        "doors" => "#92400e",
        "windows" => "#0ea5e9",
        "dimensions" => "#6b7280",
        "text" => "#111827",
        "equipment" => "#4b5563",
        "furniture" => "#a16207",
        _ => "#9ca3af",
    }
}

/// Result of one parse run. Transient: consumed by the conversion
/// step, never persisted.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub format: FileFormat,
    pub elements: Vec<Element>,
    pub layers: Vec<Layer>,
    /// Union of per-element extents; the drawing's nominal viewBox
    /// dimensions serve as a fallback for element-free documents.
    pub bounds: Bounds,
    /// Nominal drawing dimensions from the root viewBox or
    /// width/height attributes.
    pub dimensions: (f64, f64),
}

/// Union of every parsed element's extent. Elements without a usable
/// extent are silently skipped.
pub fn drawing_bounds(elements: &[Element]) -> Option<Bounds> {
    let mut iter = elements.iter().filter_map(|e| e.geometry.bounds());
    let first = iter.next()?;
    Some(iter.fold(first, |acc, b| acc.union(&b)))
}

/// Groups elements by layer in first-seen order. All layers start
/// visible with their tag's default color.
pub fn group_layers(elements: &[Element]) -> Vec<Layer> {
    let mut layers: Vec<Layer> = Vec::new();
    for element in elements {
        match layers.iter_mut().find(|l| l.name == element.layer) {
            Some(layer) => layer.elements.push(element.clone()),
            None => layers.push(Layer {
                name: element.layer.clone(),
                elements: vec![element.clone()],
                visible: true,
                color: layer_color(&element.layer).to_owned(),
            }),
        }
    }
    layers
}

/// Vector-drawing importer.
///
/// Carries the layer classifier used during parsing; conversion rules
/// are supplied separately to [`convert_to_components`].
pub struct CadImporter {
    classifier: LayerClassifier,
}

impl Default for CadImporter {
    fn default() -> Self {
        Self {
            classifier: default_classifier(),
        }
    }
}

impl CadImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the layer classifier.
    pub fn with_classifier(classifier: LayerClassifier) -> Self {
        Self { classifier }
    }

    /// Determines the format from the file extension.
    ///
    /// Unsupported extensions fail before any file I/O is attempted.
    pub fn detect_format(path: &Path) -> Result<FileFormat> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        match extension.as_str() {
            "svg" => Ok(FileFormat::Svg),
            "dxf" => Ok(FileFormat::Dxf),
            "pdf" => Ok(FileFormat::Pdf),
            "dwg" => Ok(FileFormat::Dwg),
            _ => Err(ImportError::UnsupportedFormat { extension }),
        }
    }

    /// Imports a drawing file: detect, read, parse, classify, bounds.
    ///
    /// The file is read for every recognized format, so unreadable
    /// paths report a read failure whether or not a parser exists for
    /// the format yet.
    pub fn import_file(&self, path: &Path) -> Result<ImportResult> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        match format {
            FileFormat::Svg => self.import_svg(&String::from_utf8_lossy(&content)),
            other => Err(ImportError::NotImplemented {
                format: other.to_string(),
            }),
        }
    }

    /// Imports SVG markup that is already in memory.
    pub fn import_svg(&self, content: &str) -> Result<ImportResult> {
        let parsed = parse_svg(content, &self.classifier)?;
        let layers = group_layers(&parsed.elements);
        let bounds = drawing_bounds(&parsed.elements)
            .or(parsed.nominal_bounds)
            .unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0));
        let dimensions = parsed
            .nominal_bounds
            .map(|b| (b.width, b.height))
            .unwrap_or((bounds.width, bounds.height));
        Ok(ImportResult {
            format: FileFormat::Svg,
            elements: parsed.elements,
            layers,
            bounds,
            dimensions,
        })
    }
}

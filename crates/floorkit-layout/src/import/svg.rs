//! SVG markup parsing and layer classification.
//!
//! Walks the document tree recursively, maintaining a current layer
//! name inherited from the nearest ancestor `<g>` that carries an id
//! (groups without an id do not start a new layer). Each recognized
//! primitive becomes an [`Element`] with raw geometry, a classified
//! layer tag, and a resolved style record.

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use floorkit_core::{Bounds, ImportError, Point, Result};

use super::{Element, Geometry, Style};

/// Fallback layer per element tag when no keyword hint matches.
fn tag_fallback(tag_name: &str) -> &'static str {
    match tag_name {
        "rect" | "line" => "walls",
        "text" => "text",
        _ => "equipment",
    }
}

/// One ordered classification rule: the first rule whose predicate
/// accepts a hint string decides the layer.
pub struct ClassifierRule {
    layer: String,
    predicate: Box<dyn Fn(&str) -> bool + Send + Sync>,
}

impl ClassifierRule {
    pub fn new(
        layer: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            layer: layer.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Rule matching any of the keywords as a case-insensitive
    /// substring.
    pub fn keywords(layer: impl Into<String>, keywords: &[&str]) -> Self {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        Self::new(layer, move |hint| {
            let hint = hint.to_lowercase();
            keywords.iter().any(|k| hint.contains(k.as_str()))
        })
    }
}

/// Pluggable, ordered layer classifier.
///
/// Hints (element id, class, inherited group name) are tried most
/// specific first; elements with no matching hint fall back to a
/// per-tag default.
pub struct LayerClassifier {
    rules: Vec<ClassifierRule>,
}

impl LayerClassifier {
    pub fn new(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    /// Appends a rule with lower priority than the existing ones.
    pub fn push_rule(&mut self, rule: ClassifierRule) {
        self.rules.push(rule);
    }

    /// Hints are consulted in order and the first hint any rule
    /// accepts decides the layer, so an element's own id wins over an
    /// inherited group name even when the group matches an earlier
    /// rule.
    pub fn classify(&self, hints: &[&str], tag_name: &str) -> String {
        for hint in hints {
            if hint.is_empty() {
                continue;
            }
            for rule in &self.rules {
                if (rule.predicate)(hint) {
                    return rule.layer.clone();
                }
            }
        }
        tag_fallback(tag_name).to_owned()
    }
}

/// The built-in keyword table.
pub fn default_classifier() -> LayerClassifier {
    LayerClassifier::new(vec![
        ClassifierRule::keywords("walls", &["wall", "partition"]),
        ClassifierRule::keywords("doors", &["door", "entrance"]),
        ClassifierRule::keywords("windows", &["window"]),
        ClassifierRule::keywords("dimensions", &["dimension", "measure"]),
        ClassifierRule::keywords("text", &["text", "label"]),
        ClassifierRule::keywords("equipment", &["equipment", "machine"]),
    ])
}

/// Output of one SVG parse run.
#[derive(Debug, Clone)]
pub struct ParsedSvg {
    pub elements: Vec<Element>,
    /// Drawing bounds declared by the root viewBox, or width/height
    /// attributes when no viewBox is present.
    pub nominal_bounds: Option<Bounds>,
}

/// Parses SVG markup into classified elements.
///
/// Malformed markup fails with a parse error and no partial result.
pub fn parse_svg(content: &str, classifier: &LayerClassifier) -> Result<ParsedSvg> {
    let doc = Document::parse(content).map_err(|e| ImportError::Parse {
        message: e.to_string(),
    })?;
    let root = doc.root_element();
    if root.tag_name().name() != "svg" {
        return Err(ImportError::Parse {
            message: format!(
                "Expected root element 'svg', found '{}'",
                root.tag_name().name()
            ),
        });
    }

    let nominal_bounds = nominal_bounds(&root);
    let mut elements = Vec::new();
    walk(&root, None, classifier, &mut elements);
    debug!(count = elements.len(), "parsed drawing elements");
    Ok(ParsedSvg {
        elements,
        nominal_bounds,
    })
}

/// Root viewBox preferred; width/height attributes otherwise.
fn nominal_bounds(root: &Node) -> Option<Bounds> {
    if let Some(viewbox) = root.attribute("viewBox") {
        let parts: Vec<f64> = viewbox
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() == 4 {
            return Some(Bounds::new(parts[0], parts[1], parts[2], parts[3]));
        }
    }
    let width = length_attr(root, "width")?;
    let height = length_attr(root, "height")?;
    Some(Bounds::new(0.0, 0.0, width, height))
}

fn length_attr(node: &Node, name: &str) -> Option<f64> {
    node.attribute(name)?
        .trim()
        .trim_end_matches("px")
        .parse()
        .ok()
}

fn attr_f64(node: &Node, name: &str) -> f64 {
    node.attribute(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0.0)
}

fn walk(node: &Node, layer: Option<&str>, classifier: &LayerClassifier, out: &mut Vec<Element>) {
    for child in node.children().filter(|n| n.is_element()) {
        let tag = child.tag_name().name();
        match tag {
            "g" => {
                // An id starts a new layer scope; anonymous groups
                // inherit the current one.
                let group_layer = child.attribute("id").or(layer);
                walk(&child, group_layer, classifier, out);
            }
            "defs" | "style" | "metadata" | "title" | "desc" => {}
            "rect" | "circle" | "ellipse" | "line" | "polyline" | "polygon" | "path" | "text" => {
                if let Some(geometry) = parse_geometry(&child, tag) {
                    let hints = [
                        child.attribute("id").unwrap_or(""),
                        child.attribute("class").unwrap_or(""),
                        layer.unwrap_or(""),
                    ];
                    out.push(Element {
                        id: child.attribute("id").map(str::to_owned),
                        layer: classifier.classify(&hints, tag),
                        geometry,
                        style: parse_style(&child),
                    });
                } else {
                    warn!(tag, "skipping element with unusable geometry");
                }
            }
            _ => walk(&child, layer, classifier, out),
        }
    }
}

fn parse_geometry(node: &Node, tag: &str) -> Option<Geometry> {
    match tag {
        "rect" => Some(Geometry::Rect {
            x: attr_f64(node, "x"),
            y: attr_f64(node, "y"),
            width: attr_f64(node, "width"),
            height: attr_f64(node, "height"),
        }),
        "circle" => Some(Geometry::Circle {
            cx: attr_f64(node, "cx"),
            cy: attr_f64(node, "cy"),
            r: attr_f64(node, "r"),
        }),
        "ellipse" => Some(Geometry::Ellipse {
            cx: attr_f64(node, "cx"),
            cy: attr_f64(node, "cy"),
            rx: attr_f64(node, "rx"),
            ry: attr_f64(node, "ry"),
        }),
        "line" => Some(Geometry::Line {
            x1: attr_f64(node, "x1"),
            y1: attr_f64(node, "y1"),
            x2: attr_f64(node, "x2"),
            y2: attr_f64(node, "y2"),
        }),
        "polyline" => Some(Geometry::Polyline {
            points: parse_points(node.attribute("points")?),
        }),
        "polygon" => Some(Geometry::Polygon {
            points: parse_points(node.attribute("points")?),
        }),
        "path" => Some(Geometry::Path {
            d: node.attribute("d")?.to_owned(),
        }),
        "text" => Some(Geometry::Text {
            x: attr_f64(node, "x"),
            y: attr_f64(node, "y"),
            content: node.text().unwrap_or("").trim().to_owned(),
        }),
        _ => None,
    }
}

/// Parses a `points="x1,y1 x2,y2 ..."` attribute; separators may be
/// spaces or commas. Trailing unpaired values are dropped.
fn parse_points(raw: &str) -> Vec<Point> {
    let values: Vec<f64> = raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();
    values
        .chunks_exact(2)
        .map(|pair| Point::new(pair[0], pair[1]))
        .collect()
}

/// Merges presentation attributes with the inline style string;
/// inline style wins on conflict.
fn parse_style(node: &Node) -> Style {
    let mut style = Style {
        fill: node.attribute("fill").map(str::to_owned),
        stroke: node.attribute("stroke").map(str::to_owned),
        stroke_width: node.attribute("stroke-width").and_then(|v| v.parse().ok()),
    };
    if let Some(inline) = node.attribute("style") {
        for declaration in inline.split(';') {
            let Some((key, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "fill" => style.fill = Some(value.to_owned()),
                "stroke" => style.stroke = Some(value.to_owned()),
                "stroke-width" => {
                    if let Ok(width) = value.trim_end_matches("px").parse() {
                        style.stroke_width = Some(width);
                    }
                }
                _ => {}
            }
        }
    }
    style
}

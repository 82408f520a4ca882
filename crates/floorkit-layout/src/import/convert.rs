//! Conversion of classified drawing elements into layout components.
//!
//! Each visible layer is looked up in a rule table (caller-supplied
//! entries over built-in defaults); layers without a rule produce no
//! components. Converted items get fresh ids and provenance metadata,
//! and an optional uniform scale/offset pass is applied only at the
//! caller's request, never during parsing.

use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use floorkit_core::Point;

use super::{Element, Geometry, ImportResult};
use crate::model::{ItemType, LayoutItem};

/// Default width/height for elements without a usable extent.
const DEFAULT_COMPONENT_SIZE: f64 = 50.0;

/// Transform hook invoked with the freshly built component and its
/// source element.
pub type ComponentTransform = Box<dyn Fn(&mut LayoutItem, &Element)>;

/// Maps one layer to a component type, with an optional customization
/// hook.
pub struct ConversionRule {
    pub component_type: ItemType,
    pub transform: Option<ComponentTransform>,
}

impl ConversionRule {
    pub fn new(component_type: ItemType) -> Self {
        Self {
            component_type,
            transform: None,
        }
    }

    pub fn with_transform(
        component_type: ItemType,
        transform: impl Fn(&mut LayoutItem, &Element) + 'static,
    ) -> Self {
        Self {
            component_type,
            transform: Some(Box::new(transform)),
        }
    }
}

/// Layer-name to rule table consulted by the convert step.
pub struct ConversionConfig {
    rules: HashMap<String, ConversionRule>,
}

impl Default for ConversionConfig {
    /// Built-in defaults: walls become drawn wall segments, doors stay
    /// doors, equipment becomes storage areas, furniture becomes
    /// workstations.
    fn default() -> Self {
        let mut rules = HashMap::new();
        rules.insert("walls".to_owned(), ConversionRule::new(ItemType::WallDraw));
        rules.insert("doors".to_owned(), ConversionRule::new(ItemType::Door));
        rules.insert(
            "equipment".to_owned(),
            ConversionRule::new(ItemType::StorageArea),
        );
        rules.insert(
            "furniture".to_owned(),
            ConversionRule::new(ItemType::Workstation),
        );
        Self { rules }
    }
}

impl ConversionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for a layer.
    pub fn with_rule(mut self, layer: impl Into<String>, rule: ConversionRule) -> Self {
        self.rules.insert(layer.into(), rule);
        self
    }

    /// Removes a layer's rule so it converts to nothing.
    pub fn without_layer(mut self, layer: &str) -> Self {
        self.rules.remove(layer);
        self
    }

    pub fn rule_for(&self, layer: &str) -> Option<&ConversionRule> {
        self.rules.get(layer)
    }
}

/// Converts every visible layer's elements into layout components.
pub fn convert_to_components(result: &ImportResult, config: &ConversionConfig) -> Vec<LayoutItem> {
    let mut components = Vec::new();
    for layer in &result.layers {
        if !layer.visible {
            continue;
        }
        let Some(rule) = config.rule_for(&layer.name) else {
            debug!(layer = %layer.name, "no conversion rule, layer skipped");
            continue;
        };
        for element in &layer.elements {
            components.push(build_component(element, rule, &layer.name));
        }
    }
    components
}

fn build_component(element: &Element, rule: &ConversionRule, layer: &str) -> LayoutItem {
    let (x, y, width, height) = component_frame(&element.geometry);
    let mut item = LayoutItem::new(
        Uuid::new_v4().to_string(),
        rule.component_type,
        x,
        y,
        width,
        height,
    );
    item.imported = true;
    item.source_layer = Some(layer.to_owned());
    item.source_id = element.id.clone();
    if let Some(transform) = &rule.transform {
        transform(&mut item, element);
    }
    item
}

/// Position and size inherited from the source element. Zero or
/// missing extents fall back to the default component size.
fn component_frame(geometry: &Geometry) -> (f64, f64, f64, f64) {
    let sized = |w: f64, h: f64| {
        (
            if w > 0.0 { w } else { DEFAULT_COMPONENT_SIZE },
            if h > 0.0 { h } else { DEFAULT_COMPONENT_SIZE },
        )
    };
    match (geometry.bounds(), geometry) {
        (Some(b), _) => {
            let (w, h) = sized(b.width, b.height);
            (b.x, b.y, w, h)
        }
        (None, Geometry::Text { x, y, .. }) => {
            let (w, h) = sized(0.0, 0.0);
            (*x, *y, w, h)
        }
        (None, _) => {
            let (w, h) = sized(0.0, 0.0);
            (0.0, 0.0, w, h)
        }
    }
}

/// Uniform scale and offset over position and size of every component.
pub fn apply_transform(items: &mut [LayoutItem], scale: f64, offset: Point) {
    for item in items {
        item.x = item.x * scale + offset.x;
        item.y = item.y * scale + offset.y;
        item.width *= scale;
        item.height *= scale;
    }
}

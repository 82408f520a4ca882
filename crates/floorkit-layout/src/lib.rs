//! # FloorKit Layout
//!
//! Warehouse layout geometry and import engine. This crate provides
//! the algorithmic core behind the layout builder: containment of
//! placed items inside a floor-plan boundary, rotation-aware bounds
//! and fit-to-viewport scaling, CAD drawing import, grid and polygon
//! measurement, and capacity reporting over the item collection.
//!
//! ## Core Components
//!
//! - **Model**: [`LayoutItem`] records with compartment occupancy,
//!   exchanged with UI and persistence collaborators as plain
//!   serializable data
//! - **Containment**: [`BoundaryManager`] checks and enforces the
//!   floor-plan boundary, and computes boundary auto-resize commands
//! - **Fit**: rotated union bounds and contain/cover scaling for
//!   re-rendering a layout inside any viewport
//! - **Import**: SVG drawing parsing, layer classification, and
//!   rule-driven conversion into layout components
//! - **Grid**: grid-line descriptors and polygon area/perimeter on
//!   top of the measurement context
//! - **Capacity**: read-only inventory summaries per storage item
//!
//! All components run synchronously on the caller's thread; the only
//! I/O is the import file read and document save/load. Geometry
//! operations are pure, and boundary auto-resize returns a command
//! object instead of mutating anything itself.

pub mod capacity;
pub mod containment;
pub mod document;
pub mod fit;
pub mod grid;
pub mod import;
pub mod inventory;
pub mod model;

pub use capacity::{summarize_inventory, CapacitySummary};
pub use containment::{
    BoundaryManager, BoundaryResize, PlacementValidation, RequiredSize, ResizeValidation,
};
pub use document::LayoutDocument;
pub use fit::{content_bounds, rotated_bounds, FitCalculator, FitMode, NormalizedLayout};
pub use grid::{grid_lines, polygon_perimeter, polygon_pixel_area, polygon_real_area, GridLine, Orientation};
pub use import::{
    apply_transform, convert_to_components, default_classifier, parse_svg, CadImporter,
    ClassifierRule, ConversionConfig, ConversionRule, Element, FileFormat, Geometry, ImportResult,
    Layer, LayerClassifier, Style,
};
pub use inventory::{InventoryData, InventoryEntry};
pub use model::{CompartmentContent, ItemType, LayoutItem, LevelLocationMapping};

// Geometry primitives and the measurement system come from the core
// crate; re-exported for convenience.
pub use floorkit_core::{
    Bounds, ImportError, Measurement, MeasurementContext, MeasurementSnapshot, MeasurementUpdate,
    Point, ScalePreset, Unit,
};

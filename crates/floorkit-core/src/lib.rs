//! # FloorKit Core
//!
//! Core types and services for FloorKit: geometry primitives, the
//! pixel/real-world measurement system, scale presets, and the shared
//! error taxonomy.
//!
//! The measurement system is an explicit context object
//! ([`MeasurementContext`]) owned by the layout-editing session and
//! passed by reference to every component that needs unit conversion
//! or grid alignment. There is no global state.

pub mod error;
pub mod geometry;
pub mod measure;
pub mod units;

pub use error::{ImportError, Result};
pub use geometry::{rotate_point, Bounds, Point};
pub use measure::{
    Measurement, MeasurementContext, MeasurementSnapshot, MeasurementUpdate,
};
pub use units::{format_length, ScalePreset, Unit};

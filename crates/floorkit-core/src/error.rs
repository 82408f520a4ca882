//! Error handling for FloorKit
//!
//! Import failures are the only hard errors in the geometry core:
//! unsupported formats, unreadable files, and unparseable markup all
//! fail fast with no partial result. Validation outcomes (items
//! outside a boundary, clamped resizes) are structured results, not
//! errors.
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// CAD import error type
///
/// Represents failures while detecting, reading, or parsing an
/// imported drawing file.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The file extension does not match any supported format
    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat {
        /// The unrecognized file extension.
        extension: String,
    },

    /// The format is recognized but no parser is implemented for it
    #[error("Import of {format} files is not implemented")]
    NotImplemented {
        /// The recognized but unimplemented format name.
        format: String,
    },

    /// The file could not be interpreted as a drawing document
    #[error("Failed to parse drawing: {message}")]
    Parse {
        /// Description of the parse failure.
        message: String,
    },

    /// I/O failure while reading the file
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

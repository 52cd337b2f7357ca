//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level I2C communication errors
//!
//! ## Example
//!
//! ```
//! use pcf8574_lcd::{Builder, BuilderError, Geometry};
//!
//! // Missing geometry
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingGeometry)));
//!
//! // Invalid geometry
//! let result = Geometry::new(5, 16); // Too many rows
//! assert!(result.is_err());
//! ```

use crate::interface::DisplayInterface;

/// Maximum number of display lines addressable by the HD44780
///
/// Four-line panels are two logical lines folded in half, which is why the
/// row encoding uses `columns` as the offset of rows 2 and 3.
pub const MAX_ROWS: u8 = 4;

/// Maximum number of characters per line
pub const MAX_COLUMNS: u8 = 40;

/// Errors that can occur when interacting with the display
///
/// Generic over the interface type to preserve the specific bus error type.
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Interface error (I2C)
    ///
    /// Wraps the underlying error from the [`DisplayInterface`] implementation.
    /// The driver never retries; a failing bus is almost always a wiring fault.
    Interface(I::Error),
    /// Cursor position outside the configured geometry
    InvalidPosition {
        /// Requested column
        x: u8,
        /// Requested row
        y: u8,
    },
    /// CGRAM slot above 7
    InvalidGlyphSlot(u8),
    /// A string write stopped part way through
    ///
    /// The cursor reflects exactly the `written` characters.
    PartialWrite {
        /// Characters fully transferred before the failure
        written: usize,
        /// Interface error that stopped the write
        source: I::Error,
    },
}

impl<I: DisplayInterface> Error<I> {
    /// Number of characters written before the failure, if the error came from a string write
    pub fn written(&self) -> Option<usize> {
        match self {
            Self::PartialWrite { written, .. } => Some(*written),
            _ => None,
        }
    }
}

impl<I: DisplayInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "Interface error: {e:?}"),
            Self::InvalidPosition { x, y } => write!(f, "Invalid cursor position: x={x}, y={y}"),
            Self::InvalidGlyphSlot(slot) => write!(f, "Invalid glyph slot {slot} (max 7)"),
            Self::PartialWrite { written, source } => {
                write!(f, "Write aborted after {written} characters: {source:?}")
            }
        }
    }
}

impl<I: DisplayInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderError {
    /// Geometry was not specified
    ///
    /// [`Builder::geometry()`](crate::config::Builder::geometry) must be called before building.
    MissingGeometry,
    /// Invalid geometry provided
    ///
    /// See [`Geometry::new()`](crate::config::Geometry::new) for constraints.
    InvalidGeometry {
        /// Number of rows requested
        rows: u8,
        /// Number of columns requested
        columns: u8,
    },
    /// I2C address does not fit in 7 bits
    InvalidAddress(u8),
    /// Pin bits overlap or fall outside the expander's 8 bits
    InvalidPinMap,
    /// The 5x10 font only exists on single-line displays
    InvalidFont,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingGeometry => write!(f, "Geometry must be specified"),
            Self::InvalidGeometry { rows, columns } => write!(
                f,
                "Invalid geometry {rows}x{columns} (rows 1-{MAX_ROWS}, columns 1-{MAX_COLUMNS})"
            ),
            Self::InvalidAddress(address) => {
                write!(f, "Invalid I2C address {address:#04x} (must be 7-bit)")
            }
            Self::InvalidPinMap => write!(f, "Pin map bits overlap or exceed 8 bits"),
            Self::InvalidFont => write!(f, "5x10 font requires a single-line display"),
        }
    }
}

impl core::error::Error for BuilderError {}

//! HD44780 Character LCD Driver for PCF8574 I2C Backpacks
//!
//! A driver for HD44780-compatible character displays (up to 40x4) wired in
//! 4-bit mode behind an 8-bit I2C port expander such as the PCF8574.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - Configurable geometry and expander pin map
//! - Line wrapping with correct 4-line DDRAM addressing
//! - Custom glyphs (CGRAM)
//! - `core::fmt::Write` adapter for formatted text
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
//! use pcf8574_lcd::{Builder, Display, Geometry, Interface};
//!
//! # struct MockI2c;
//! # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c<SevenBitAddress> for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let i2c = MockI2c;
//! # let mut delay = MockDelay;
//! let geometry = match Geometry::new(2, 16) {
//!     Ok(geometry) => geometry,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().geometry(geometry).address(0x27).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let interface = Interface::new(i2c, &config);
//! let mut display = match Display::init(interface, config, &mut delay) {
//!     Ok(display) => display,
//!     Err(_) => return,
//! };
//! let _ = display.move_to(1, 0, &mut delay);
//! let _ = display.put_str("Press to play", &mut delay);
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// HD44780 command definitions
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;

pub use config::{Builder, Config, DEFAULT_ADDRESS, Font, Geometry, MAX_COLUMNS, MAX_ROWS, PinMap};
pub use display::{Cursor, Display, ShiftDirection, TextWriter};
pub use error::{BuilderError, Error};
pub use interface::{DisplayInterface, Interface, InterfaceError};

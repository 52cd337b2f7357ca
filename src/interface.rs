//! Hardware interface abstraction
//!
//! This module provides the [`DisplayInterface`] trait and the [`Interface`] struct
//! for driving an HD44780 controller through an 8-bit I2C port expander.
//!
//! ## Hardware Requirements
//!
//! The expander (PCF8574 or compatible) must wire:
//! - **RS**: Register select (instruction/data)
//! - **RW**: Read/write, held low
//! - **E**: Enable strobe
//! - **BL**: Backlight transistor
//! - **D4-D7**: Upper half of the controller's data bus
//!
//! Each expander write latches all eight outputs at once, so every byte must
//! carry the backlight bit or the backlight flickers.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
//! use pcf8574_lcd::{Builder, DisplayInterface, Geometry, Interface};
//! # use core::convert::Infallible;
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
//! # let mut delay = MockDelay;
//! # let Ok(geometry) = Geometry::new(2, 16) else { return };
//! let Ok(config) = Builder::new().geometry(geometry).address(0x27).build() else {
//!     return;
//! };
//! let mut interface = Interface::new(MockI2c, &config);
//!
//! // Backlight on
//! let _ = interface.set_backlight(true);
//!
//! // Latch the high nibble of a clear-display instruction
//! let _ = interface.write_nibble(false, 0x0, &mut delay);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::config::{Config, PinMap};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// Minimum enable-high pulse width in microseconds
pub const ENABLE_PULSE_US: u32 = 1;

/// Enable-low hold time in microseconds
///
/// Also covers the execution time of ordinary instructions (37us).
pub const ENABLE_SETTLE_US: u32 = 50;

/// Trait for the transport between the protocol layer and the controller
///
/// This trait abstracts over different expander wirings, allowing the
/// [`Display`](crate::display::Display) to work with any transport that can
/// present a nibble to the controller and strobe it in.
///
/// ## Implementing
///
/// For PCF8574-style expanders use the provided [`Interface`] struct. Boards
/// with a different expander (or a test double) implement this trait directly.
pub trait DisplayInterface {
    /// Error type for interface operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Latch one nibble into the controller
    ///
    /// The implementation must:
    /// 1. Present `nibble` (low 4 bits) on D4-D7 with RS set per `register_select`
    ///    and the current backlight state, enable high
    /// 2. Hold for at least 1us
    /// 3. Drop enable, keeping the other lines
    /// 4. Wait at least 50us before returning
    ///
    /// # Errors
    ///
    /// Returns an error if the bus write fails. No retry is attempted.
    fn write_nibble<D: DelayNs>(
        &mut self,
        register_select: bool,
        nibble: u8,
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error>;

    /// Switch the backlight and write it out immediately
    ///
    /// # Errors
    ///
    /// Returns an error if the bus write fails. The new state is kept either way
    /// so later transfers carry it.
    fn set_backlight(&mut self, on: bool) -> InterfaceResult<(), Self::Error>;

    /// Current backlight state
    fn backlight(&self) -> bool;
}

/// Errors that can occur at the interface level
#[derive(Debug)]
pub enum InterfaceError<I2cErr> {
    /// I2C write failed (device absent, NACK, arbitration loss)
    I2c(I2cErr),
}

impl<I2cErr: Debug> core::fmt::Display for InterfaceError<I2cErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C error: {e:?}"),
        }
    }
}

impl<I2cErr: Debug> core::error::Error for InterfaceError<I2cErr> {}

/// PCF8574 expander interface
///
/// Implements [`DisplayInterface`] for any embedded-hal v1.0 [`I2c`] bus.
/// The interface owns the bus handle; to share a bus between devices pass a
/// shared-bus device type as `I2C`.
///
/// ## Example
///
/// ```rust,no_run
/// use pcf8574_lcd::{Builder, Display, Geometry, Interface};
/// # use core::convert::Infallible;
/// # use embedded_hal::delay::DelayNs;
/// # use embedded_hal::i2c::{I2c, Operation, SevenBitAddress};
/// # struct MockI2c;
/// # impl embedded_hal::i2c::ErrorType for MockI2c { type Error = Infallible; }
/// # impl I2c<SevenBitAddress> for MockI2c {
/// #     fn transaction(
/// #         &mut self,
/// #         _address: u8,
/// #         _operations: &mut [Operation<'_>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// # struct MockDelay;
/// # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
/// # let mut delay = MockDelay;
/// # let geometry = match Geometry::new(2, 16) {
/// #     Ok(geometry) => geometry,
/// #     Err(_) => return,
/// # };
/// # let config = match Builder::new().geometry(geometry).build() {
/// #     Ok(config) => config,
/// #     Err(_) => return,
/// # };
/// let interface = Interface::new(MockI2c, &config);
///
/// // Use with Display
/// let _display = Display::init(interface, config, &mut delay);
/// ```
#[derive(Debug)]
pub struct Interface<I2C> {
    /// I2C bus
    i2c: I2C,
    /// 7-bit expander address
    address: u8,
    /// Expander wiring
    pin_map: PinMap,
    /// Backlight state, OR'd into every byte
    backlight: bool,
}

impl<I2C> Interface<I2C>
where
    I2C: I2c,
{
    /// Create a new Interface
    ///
    /// The expander address and wiring come from `config`, which
    /// [`Builder`](crate::config::Builder) has already validated. The
    /// backlight starts off; nothing is written until the first transfer.
    ///
    /// # Arguments
    ///
    /// * `i2c` - I2C bus (must implement [`I2c`])
    /// * `config` - display configuration
    pub fn new(i2c: I2C, config: &Config) -> Self {
        Self {
            i2c,
            address: config.address(),
            pin_map: config.pin_map(),
            backlight: false,
        }
    }

    /// Expander address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Expander wiring
    pub fn pin_map(&self) -> &PinMap {
        &self.pin_map
    }

    /// Give the bus back
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Byte carrying `nibble`, RS and backlight, enable low
    ///
    /// RW is never set.
    pub fn encode(&self, register_select: bool, nibble: u8) -> u8 {
        let mut byte = self.pin_map.encode_nibble(nibble);
        if register_select {
            byte |= self.pin_map.register_select_mask();
        }
        if self.backlight {
            byte |= self.pin_map.backlight_mask();
        }
        byte
    }

    fn write_byte(&mut self, value: u8) -> InterfaceResult<(), InterfaceError<I2C::Error>> {
        self.i2c
            .write(self.address, &[value])
            .map_err(InterfaceError::I2c)
    }
}

impl<I2C> DisplayInterface for Interface<I2C>
where
    I2C: I2c,
{
    type Error = InterfaceError<I2C::Error>;

    fn write_nibble<D: DelayNs>(
        &mut self,
        register_select: bool,
        nibble: u8,
        delay: &mut D,
    ) -> InterfaceResult<(), Self::Error> {
        let byte = self.encode(register_select, nibble);
        // Data is latched on the falling edge of E
        self.write_byte(byte | self.pin_map.enable_mask())?;
        delay.delay_us(ENABLE_PULSE_US);
        self.write_byte(byte)?;
        delay.delay_us(ENABLE_SETTLE_US);
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> InterfaceResult<(), Self::Error> {
        self.backlight = on;
        let byte = if on { self.pin_map.backlight_mask() } else { 0x00 };
        self.write_byte(byte)
    }

    fn backlight(&self) -> bool {
        self.backlight
    }
}

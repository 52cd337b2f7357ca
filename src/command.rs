//! HD44780 command definitions
//!
//! This module defines the instruction bytes and flag bits of the HD44780
//! character LCD controller. Every instruction is written with the
//! register-select line low; character codes and glyph rows are written with
//! it high.
//!
//! ## Command Structure
//!
//! In 4-bit mode each byte travels as two nibbles:
//! 1. Present the high nibble, pulse enable
//! 2. Present the low nibble, pulse enable
//!
//! Flag bits are OR'd into their instruction byte:
//!
//! ```
//! use pcf8574_lcd::command;
//!
//! let cmd = command::DISPLAY_CONTROL | command::DISPLAY_ON | command::CURSOR_ON;
//! assert_eq!(cmd, 0x0E);
//!
//! let ddram = command::SET_DDRAM_ADDRESS | 0x40;
//! assert_eq!(ddram, 0xC0);
//! ```

// Instructions

/// Clear display command (0x01)
///
/// Fills DDRAM with spaces and sets the address counter to 0.
/// Takes up to 1.52ms to execute.
pub const CLEAR_DISPLAY: u8 = 0x01;

/// Return home command (0x02)
///
/// Sets the address counter to 0 and undoes any display shift.
/// Takes up to 1.52ms to execute.
pub const RETURN_HOME: u8 = 0x02;

/// Entry mode set command (0x04)
///
/// Combine with [`ENTRY_INCREMENT`] and [`ENTRY_SHIFT`].
pub const ENTRY_MODE_SET: u8 = 0x04;

/// Display on/off control command (0x08)
///
/// Display, cursor and blink share this one register.
/// Combine with [`DISPLAY_ON`], [`CURSOR_ON`] and [`BLINK_ON`].
pub const DISPLAY_CONTROL: u8 = 0x08;

/// Cursor or display shift command (0x10)
///
/// Combine with [`SHIFT_DISPLAY`] and [`SHIFT_RIGHT`].
pub const CURSOR_SHIFT: u8 = 0x10;

/// Function set command (0x20)
///
/// Combine with [`FUNCTION_8BIT`], [`FUNCTION_2LINES`] and [`FUNCTION_5X10_DOTS`].
pub const FUNCTION_SET: u8 = 0x20;

/// Set CGRAM address command (0x40)
///
/// Low 6 bits select the CGRAM address (slot * 8 + row).
pub const SET_CGRAM_ADDRESS: u8 = 0x40;

/// Set DDRAM address command (0x80)
///
/// Low 7 bits select the DDRAM address.
pub const SET_DDRAM_ADDRESS: u8 = 0x80;

// Entry mode flags

/// Move the cursor right after each write
pub const ENTRY_INCREMENT: u8 = 0x02;
/// Shift the whole display on each write
pub const ENTRY_SHIFT: u8 = 0x01;

// Display control flags

/// Display on
pub const DISPLAY_ON: u8 = 0x04;
/// Underline cursor visible
pub const CURSOR_ON: u8 = 0x02;
/// Cursor position blinks
pub const BLINK_ON: u8 = 0x01;

// Shift flags

/// Shift the display instead of moving the cursor
pub const SHIFT_DISPLAY: u8 = 0x08;
/// Shift to the right (left when clear)
pub const SHIFT_RIGHT: u8 = 0x04;

// Function set flags

/// 8-bit interface (cleared for 4-bit operation)
pub const FUNCTION_8BIT: u8 = 0x10;
/// Two display lines
pub const FUNCTION_2LINES: u8 = 0x08;
/// 5x10 dot font (single-line displays only)
pub const FUNCTION_5X10_DOTS: u8 = 0x04;

// Initialization nibbles

/// Function-reset nibble sent three times while the interface width is unknown
///
/// This is the high nibble of `FUNCTION_SET | FUNCTION_8BIT`.
pub const INIT_FUNCTION_RESET: u8 = (FUNCTION_SET | FUNCTION_8BIT) >> 4;

/// Nibble that switches the controller into 4-bit mode
///
/// This is the high nibble of `FUNCTION_SET`.
pub const INIT_FOUR_BIT: u8 = FUNCTION_SET >> 4;

/// Commands that need the long (clear/home) execution time
pub fn is_slow(command: u8) -> bool {
    command == CLEAR_DISPLAY || command == RETURN_HOME
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_nibbles() {
        assert_eq!(INIT_FUNCTION_RESET, 0x03);
        assert_eq!(INIT_FOUR_BIT, 0x02);
    }

    #[test]
    fn test_slow_commands() {
        assert!(is_slow(CLEAR_DISPLAY));
        assert!(is_slow(RETURN_HOME));
        assert!(!is_slow(ENTRY_MODE_SET | ENTRY_INCREMENT));
        assert!(!is_slow(SET_DDRAM_ADDRESS));
    }
}

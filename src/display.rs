//! Core display operations

use embedded_hal::delay::DelayNs;

use crate::command::{
    BLINK_ON, CLEAR_DISPLAY, CURSOR_ON, CURSOR_SHIFT, DISPLAY_CONTROL, DISPLAY_ON,
    INIT_FOUR_BIT, INIT_FUNCTION_RESET, RETURN_HOME, SET_CGRAM_ADDRESS, SET_DDRAM_ADDRESS,
    SHIFT_DISPLAY, SHIFT_RIGHT, is_slow,
};
use crate::config::{Config, Geometry};
use crate::error::Error;
use crate::interface::DisplayInterface;

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Wait after power-up before the first reset nibble
pub const POWER_UP_DELAY_MS: u32 = 20;
/// Wait after the first function-reset nibble (datasheet minimum 4.1ms)
pub const FIRST_RESET_DELAY_US: u32 = 5_000;
/// Wait after each later reset nibble and the 4-bit switch (datasheet minimum 100us)
pub const RESET_DELAY_US: u32 = 150;
/// Execution time of clear and home (datasheet 1.52ms)
pub const CLEAR_DELAY_MS: u32 = 2;
/// Wait after the CGRAM address set and each glyph row
pub const CGRAM_DELAY_US: u32 = 40;

/// Number of user-definable glyphs in CGRAM
pub const GLYPH_SLOTS: u8 = 8;

/// Logical cursor position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Column
    pub x: u8,
    /// Row
    pub y: u8,
    /// The previous character wrapped the line by itself, so a line feed
    /// right after it must not advance again
    pub implied_newline: bool,
}

/// Direction for [`Display::shift_display`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Contents move one cell left
    Left,
    /// Contents move one cell right
    Right,
}

/// One step of text output
#[derive(Clone, Copy)]
enum Cell {
    Code(u8),
    LineFeed,
}

/// Core display driver for HD44780 controllers
///
/// A `Display` only exists after the initialization handshake has succeeded;
/// it owns the transport and tracks the cursor and display-control register.
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface
    interface: I,
    /// Display configuration
    config: Config,
    /// Logical cursor, kept in step with the controller's address counter
    cursor: Cursor,
    /// Display/cursor/blink bits last written to the control register
    control: u8,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Run the power-on handshake and return a ready display
    ///
    /// The sequence is the controller's reset-by-instruction procedure: three
    /// function-reset nibbles, the switch to 4-bit mode, function set, then
    /// display off, backlight on, clear, entry mode, cursor hidden, display on.
    ///
    /// # Errors
    ///
    /// Any interface error aborts construction; the controller is then in an
    /// unknown state and the whole sequence must be run again.
    pub fn init<D: DelayNs>(interface: I, config: Config, delay: &mut D) -> Result<Self, Error<I>> {
        let mut display = Self {
            interface,
            config,
            cursor: Cursor::default(),
            control: 0,
        };
        display.initialize(delay)?;
        Ok(display)
    }

    fn initialize<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let geometry = *self.config.geometry();
        log::debug!(
            "initializing {}x{} display at {:#04x}",
            geometry.columns(),
            geometry.rows(),
            self.config.address()
        );

        // All expander outputs low
        self.interface
            .set_backlight(false)
            .map_err(Error::Interface)?;
        delay.delay_ms(POWER_UP_DELAY_MS);

        self.write_nibble(false, INIT_FUNCTION_RESET, delay)?;
        delay.delay_us(FIRST_RESET_DELAY_US);
        self.write_nibble(false, INIT_FUNCTION_RESET, delay)?;
        delay.delay_us(RESET_DELAY_US);
        self.write_nibble(false, INIT_FUNCTION_RESET, delay)?;
        delay.delay_us(RESET_DELAY_US);

        self.write_nibble(false, INIT_FOUR_BIT, delay)?;
        delay.delay_us(RESET_DELAY_US);

        // From here on every byte is a nibble pair
        self.command(self.config.function_set(), delay)?;

        self.display_off(delay)?;
        self.backlight_on()?;
        self.clear(delay)?;
        self.command(self.config.entry_mode(), delay)?;
        self.hide_cursor(delay)?;
        self.display_on(delay)?;

        log::debug!("display ready");
        Ok(())
    }

    /// Clear the display and move the cursor to (0, 0)
    ///
    /// Blocks for the 2ms the controller needs to execute the clear.
    pub fn clear<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.command(CLEAR_DISPLAY, delay)?;
        self.cursor = Cursor::default();
        Ok(())
    }

    /// Move the cursor to (0, 0) and undo any display shift
    pub fn home<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.command(RETURN_HOME, delay)?;
        self.cursor = Cursor::default();
        Ok(())
    }

    /// Move the cursor to column `x` of row `y`
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPosition` if the cell is outside the configured
    /// geometry. Nothing is sent in that case.
    pub fn move_to<D: DelayNs>(&mut self, x: u8, y: u8, delay: &mut D) -> DisplayResult<I> {
        if !self.config.geometry().contains(x, y) {
            return Err(Error::InvalidPosition { x, y });
        }
        self.cursor.implied_newline = false;
        self.set_address(x, y, delay)
    }

    /// Write one character at the cursor and advance
    ///
    /// `'\n'` moves to the start of the next line, unless the previous character
    /// already wrapped there. Other characters are sent as their code point's
    /// low byte; the controller's character ROM decides what that looks like.
    /// Rows wrap around to the top line.
    pub fn put_char<D: DelayNs>(&mut self, c: char, delay: &mut D) -> DisplayResult<I> {
        self.emit(cell_for(c), delay)
            .map_err(|(_, e)| Error::Interface(e))
    }

    /// Write a raw character code at the cursor and advance
    ///
    /// Codes 0-7 show the glyphs stored with [`Display::define_glyph`].
    /// No code is treated as a line feed.
    pub fn put_byte<D: DelayNs>(&mut self, code: u8, delay: &mut D) -> DisplayResult<I> {
        self.emit(Cell::Code(code), delay)
            .map_err(|(_, e)| Error::Interface(e))
    }

    /// Write a string at the cursor
    ///
    /// # Errors
    ///
    /// Stops at the first interface error and returns `Error::PartialWrite`
    /// with the number of characters already written. The cursor reflects
    /// exactly those characters.
    pub fn put_str<D: DelayNs>(&mut self, s: &str, delay: &mut D) -> DisplayResult<I> {
        for (index, c) in s.chars().enumerate() {
            if let Err((committed, source)) = self.emit(cell_for(c), delay) {
                let written = index + usize::from(committed);
                log::warn!("string write aborted after {written} characters");
                return Err(Error::PartialWrite { written, source });
            }
        }
        Ok(())
    }

    /// Formatting adapter writing at the cursor
    ///
    /// ```rust,no_run
    /// use core::fmt::Write;
    /// # use core::convert::Infallible;
    /// # use embedded_hal::delay::DelayNs;
    /// # use pcf8574_lcd::{Builder, Display, DisplayInterface, Geometry};
    /// # struct NullInterface;
    /// # impl DisplayInterface for NullInterface {
    /// #     type Error = Infallible;
    /// #     fn write_nibble<D: DelayNs>(&mut self, _rs: bool, _nibble: u8, _delay: &mut D) -> Result<(), Infallible> { Ok(()) }
    /// #     fn set_backlight(&mut self, _on: bool) -> Result<(), Infallible> { Ok(()) }
    /// #     fn backlight(&self) -> bool { true }
    /// # }
    /// # struct MockDelay;
    /// # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
    /// # let mut delay = MockDelay;
    /// # let geometry = match Geometry::new(2, 16) { Ok(g) => g, Err(_) => return };
    /// # let config = match Builder::new().geometry(geometry).build() { Ok(c) => c, Err(_) => return };
    /// # let mut display = match Display::init(NullInterface, config, &mut delay) { Ok(d) => d, Err(_) => return };
    /// let highscore = 42;
    /// let mut writer = display.writer(&mut delay);
    /// let _ = write!(writer, "Highscore: {highscore}");
    /// let _ = writer.finish();
    /// ```
    pub fn writer<'a, D: DelayNs>(&'a mut self, delay: &'a mut D) -> TextWriter<'a, I, D> {
        TextWriter {
            display: self,
            delay,
            written: 0,
            error: None,
        }
    }

    /// Store an 8-row glyph in CGRAM slot `slot` (0-7)
    ///
    /// Only the low 5 bits of each row are visible. CGRAM and DDRAM share the
    /// address counter, so the DDRAM cursor is restored afterwards.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidGlyphSlot` for slots above 7.
    pub fn define_glyph<D: DelayNs>(
        &mut self,
        slot: u8,
        bitmap: &[u8; 8],
        delay: &mut D,
    ) -> DisplayResult<I> {
        if slot >= GLYPH_SLOTS {
            return Err(Error::InvalidGlyphSlot(slot));
        }
        self.command(SET_CGRAM_ADDRESS | (slot << 3), delay)?;
        delay.delay_us(CGRAM_DELAY_US);
        for row in bitmap {
            self.write_byte(true, *row, delay)
                .map_err(Error::Interface)?;
            delay.delay_us(CGRAM_DELAY_US);
        }
        self.set_address(self.cursor.x, self.cursor.y, delay)
    }

    /// Show the underline cursor
    pub fn show_cursor<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.update_control(self.control | CURSOR_ON, delay)
    }

    /// Hide the underline cursor
    pub fn hide_cursor<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.update_control(self.control & !CURSOR_ON, delay)
    }

    /// Blink the block at the cursor cell
    ///
    /// Only the blink bit changes. A hidden underline cursor stays hidden;
    /// call [`Display::show_cursor`] as well to get both.
    pub fn blink_on<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.update_control(self.control | BLINK_ON, delay)
    }

    /// Stop blinking the cursor cell
    pub fn blink_off<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.update_control(self.control & !BLINK_ON, delay)
    }

    /// Turn the display on, keeping cursor and blink settings
    pub fn display_on<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.update_control(self.control | DISPLAY_ON, delay)
    }

    /// Blank the display; DDRAM contents are kept
    pub fn display_off<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.update_control(self.control & !DISPLAY_ON, delay)
    }

    /// Scroll the whole display one cell without touching DDRAM or the cursor
    pub fn shift_display<D: DelayNs>(
        &mut self,
        direction: ShiftDirection,
        delay: &mut D,
    ) -> DisplayResult<I> {
        let mut cmd = CURSOR_SHIFT | SHIFT_DISPLAY;
        if direction == ShiftDirection::Right {
            cmd |= SHIFT_RIGHT;
        }
        self.command(cmd, delay)
    }

    /// Turn the backlight on
    pub fn backlight_on(&mut self) -> DisplayResult<I> {
        self.interface.set_backlight(true).map_err(Error::Interface)
    }

    /// Turn the backlight off
    pub fn backlight_off(&mut self) -> DisplayResult<I> {
        self.interface.set_backlight(false).map_err(Error::Interface)
    }

    /// Current backlight state
    pub fn backlight(&self) -> bool {
        self.interface.backlight()
    }

    /// Current logical cursor
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Get display geometry
    pub fn geometry(&self) -> &Geometry {
        self.config.geometry()
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give the interface back
    ///
    /// The controller keeps its state; no shutdown sequence is needed.
    pub fn release(self) -> I {
        self.interface
    }

    fn update_control<D: DelayNs>(&mut self, control: u8, delay: &mut D) -> DisplayResult<I> {
        self.command(DISPLAY_CONTROL | control, delay)?;
        self.control = control;
        Ok(())
    }

    /// Write the DDRAM address of (x, y) and record it as the cursor
    fn set_address<D: DelayNs>(&mut self, x: u8, y: u8, delay: &mut D) -> DisplayResult<I> {
        let address = self.config.geometry().ddram_address(x, y);
        self.command(SET_DDRAM_ADDRESS | address, delay)?;
        self.cursor.x = x;
        self.cursor.y = y;
        Ok(())
    }

    /// Output one cell and advance the cursor
    ///
    /// On failure the flag tells whether the cursor already reflects the cell
    /// (data latched, only the address resync after a wrap failed).
    fn emit<D: DelayNs>(&mut self, cell: Cell, delay: &mut D) -> Result<(), (bool, I::Error)> {
        let geometry = *self.config.geometry();
        let implied = self.cursor.implied_newline;

        match cell {
            Cell::LineFeed if implied => {
                // The previous character already moved us to this line
                self.cursor.implied_newline = false;
                return Ok(());
            }
            Cell::LineFeed => self.cursor.x = geometry.columns(),
            Cell::Code(code) => {
                self.write_byte(true, code, delay).map_err(|e| (false, e))?;
                self.cursor.x += 1;
            }
        }
        self.cursor.implied_newline = false;

        if self.cursor.x >= geometry.columns() {
            self.cursor.x = 0;
            self.cursor.y += 1;
            if self.cursor.y >= geometry.rows() {
                self.cursor.y = 0;
            }
            self.cursor.implied_newline = matches!(cell, Cell::Code(_));
            // The controller's address counter does not follow the row encoding
            let address = geometry.ddram_address(self.cursor.x, self.cursor.y);
            self.raw_command(SET_DDRAM_ADDRESS | address, delay)
                .map_err(|e| (true, e))?;
        }
        Ok(())
    }

    /// Send an instruction, waiting out clear/home
    fn command<D: DelayNs>(&mut self, cmd: u8, delay: &mut D) -> DisplayResult<I> {
        self.raw_command(cmd, delay).map_err(Error::Interface)
    }

    fn raw_command<D: DelayNs>(&mut self, cmd: u8, delay: &mut D) -> Result<(), I::Error> {
        log::trace!("command {cmd:#04x}");
        self.write_byte(false, cmd, delay)?;
        if is_slow(cmd) {
            delay.delay_ms(CLEAR_DELAY_MS);
        }
        Ok(())
    }

    /// Send a byte as high nibble then low nibble
    fn write_byte<D: DelayNs>(
        &mut self,
        register_select: bool,
        byte: u8,
        delay: &mut D,
    ) -> Result<(), I::Error> {
        self.interface
            .write_nibble(register_select, byte >> 4, delay)?;
        self.interface
            .write_nibble(register_select, byte & 0x0F, delay)
    }

    fn write_nibble<D: DelayNs>(
        &mut self,
        register_select: bool,
        nibble: u8,
        delay: &mut D,
    ) -> DisplayResult<I> {
        self.interface
            .write_nibble(register_select, nibble, delay)
            .map_err(Error::Interface)
    }
}

fn cell_for(c: char) -> Cell {
    if c == '\n' {
        Cell::LineFeed
    } else {
        Cell::Code((u32::from(c) & 0xFF) as u8)
    }
}

/// [`core::fmt::Write`] adapter returned by [`Display::writer`]
///
/// Formatting errors hide the interface error; call [`TextWriter::finish`]
/// to get it back.
pub struct TextWriter<'a, I, D>
where
    I: DisplayInterface,
{
    display: &'a mut Display<I>,
    delay: &'a mut D,
    written: usize,
    error: Option<Error<I>>,
}

impl<I, D> TextWriter<'_, I, D>
where
    I: DisplayInterface,
    D: DelayNs,
{
    /// Characters written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Number of characters written, or the first error
    ///
    /// A `PartialWrite` reports the total across all `write_str` calls.
    pub fn finish(self) -> Result<usize, Error<I>> {
        match self.error {
            None => Ok(self.written),
            Some(Error::PartialWrite { source, .. }) => Err(Error::PartialWrite {
                written: self.written,
                source,
            }),
            Some(other) => Err(other),
        }
    }
}

impl<I, D> core::fmt::Write for TextWriter<'_, I, D>
where
    I: DisplayInterface,
    D: DelayNs,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        if self.error.is_some() {
            return Err(core::fmt::Error);
        }
        match self.display.put_str(s, self.delay) {
            Ok(()) => {
                self.written += s.chars().count();
                Ok(())
            }
            Err(e) => {
                self.written += e.written().unwrap_or(0);
                self.error = Some(e);
                Err(core::fmt::Error)
            }
        }
    }
}

//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_COLUMNS, MAX_ROWS};

/// Default I2C address of PCF8574 backpacks (A0-A2 pulled high)
///
/// PCF8574A-based backpacks usually answer at `0x3F` instead.
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Display geometry in character cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    rows: u8,
    columns: u8,
}

impl Geometry {
    /// Create a new geometry with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidGeometry` if:
    /// - rows == 0 or rows > MAX_ROWS (4)
    /// - columns == 0 or columns > MAX_COLUMNS (40)
    pub fn new(rows: u8, columns: u8) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_ROWS || columns == 0 || columns > MAX_COLUMNS {
            return Err(BuilderError::InvalidGeometry { rows, columns });
        }
        Ok(Self { rows, columns })
    }

    /// Number of text lines
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Number of characters per line
    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Whether `(x, y)` is a cell of this display
    pub fn contains(&self, x: u8, y: u8) -> bool {
        x < self.columns && y < self.rows
    }

    /// DDRAM address of cell `(x, y)`
    ///
    /// Rows are not laid out linearly: bit 0 of the row selects the second
    /// 64-byte line, bit 1 offsets by one line width. On a 20x4 panel this gives
    /// row starts 0x00, 0x40, 0x14 and 0x54.
    ///
    /// ```
    /// use pcf8574_lcd::Geometry;
    ///
    /// let Ok(geometry) = Geometry::new(4, 20) else {
    ///     return;
    /// };
    /// assert_eq!(geometry.ddram_address(0, 3), 0x54);
    /// assert_eq!(geometry.ddram_address(5, 1), 0x45);
    /// ```
    pub fn ddram_address(&self, x: u8, y: u8) -> u8 {
        let mut address = x & 0x3F;
        if y & 0x01 != 0 {
            address += 0x40;
        }
        if y & 0x02 != 0 {
            address += self.columns;
        }
        address
    }
}

/// Character font selected by the function-set command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Font {
    /// 5x8 dots (all geometries)
    #[default]
    Dots5x8,
    /// 5x10 dots (single-line displays only)
    Dots5x10,
}

/// Mapping of controller lines onto the expander's 8 output bits
///
/// Every line is a bit position (0-7) except `data_shift`, which is the
/// position of the lowest data bit; the nibble occupies `data_shift..data_shift + 4`.
/// Only `PinMap::new` and `PinMap::PCF8574` construct one, so the mask
/// methods never shift past bit 7.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinMap {
    register_select: u8,
    read_write: u8,
    enable: u8,
    backlight: u8,
    data_shift: u8,
}

impl PinMap {
    /// Common PCF8574 backpack wiring
    ///
    /// P0=RS, P1=RW, P2=E, P3=backlight, P4-P7=D4-D7
    pub const PCF8574: Self = Self {
        register_select: 0,
        read_write: 1,
        enable: 2,
        backlight: 3,
        data_shift: 4,
    };

    /// Create a pin map with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidPinMap` if any bit is out of range or
    /// two lines share a bit.
    pub fn new(
        register_select: u8,
        read_write: u8,
        enable: u8,
        backlight: u8,
        data_shift: u8,
    ) -> Result<Self, BuilderError> {
        let map = Self {
            register_select,
            read_write,
            enable,
            backlight,
            data_shift,
        };
        if map.is_valid() {
            Ok(map)
        } else {
            Err(BuilderError::InvalidPinMap)
        }
    }

    fn is_valid(&self) -> bool {
        if self.data_shift > 4
            || self.register_select > 7
            || self.read_write > 7
            || self.enable > 7
            || self.backlight > 7
        {
            return false;
        }
        let masks = [
            self.register_select_mask(),
            self.read_write_mask(),
            self.enable_mask(),
            self.backlight_mask(),
            self.data_mask(),
        ];
        let mut seen = 0u8;
        for mask in masks {
            if seen & mask != 0 {
                return false;
            }
            seen |= mask;
        }
        true
    }

    /// Shift of the 4-bit data nibble
    pub fn data_shift(&self) -> u8 {
        self.data_shift
    }

    /// Register-select bit mask
    pub fn register_select_mask(&self) -> u8 {
        1 << self.register_select
    }

    /// Read/write bit mask
    pub fn read_write_mask(&self) -> u8 {
        1 << self.read_write
    }

    /// Enable bit mask
    pub fn enable_mask(&self) -> u8 {
        1 << self.enable
    }

    /// Backlight bit mask
    pub fn backlight_mask(&self) -> u8 {
        1 << self.backlight
    }

    /// Mask covering the four data bits
    pub fn data_mask(&self) -> u8 {
        0x0F << self.data_shift
    }

    /// Place a nibble on the data bits
    pub fn encode_nibble(&self, nibble: u8) -> u8 {
        (nibble & 0x0F) << self.data_shift
    }
}

impl Default for PinMap {
    fn default() -> Self {
        Self::PCF8574
    }
}

/// Display configuration
///
/// Use `Builder` to create a Config. Fields are read-only so a Config
/// always holds a validated geometry, address and pin map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    geometry: Geometry,
    address: u8,
    pin_map: PinMap,
    font: Font,
    entry_shift: bool,
}

impl Config {
    /// Display geometry
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// 7-bit I2C address of the expander
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Expander wiring
    pub fn pin_map(&self) -> PinMap {
        self.pin_map
    }

    /// Character font
    pub fn font(&self) -> Font {
        self.font
    }

    /// Shift the display instead of the cursor on each write
    pub fn entry_shift(&self) -> bool {
        self.entry_shift
    }

    /// Function-set command for this configuration (4-bit interface)
    pub fn function_set(&self) -> u8 {
        use crate::command::{FUNCTION_2LINES, FUNCTION_5X10_DOTS, FUNCTION_SET};

        let mut cmd = FUNCTION_SET;
        if self.geometry.rows > 1 {
            cmd |= FUNCTION_2LINES;
        }
        if self.font == Font::Dots5x10 {
            cmd |= FUNCTION_5X10_DOTS;
        }
        cmd
    }

    /// Entry-mode command for this configuration
    pub fn entry_mode(&self) -> u8 {
        use crate::command::{ENTRY_INCREMENT, ENTRY_MODE_SET, ENTRY_SHIFT};

        let mut cmd = ENTRY_MODE_SET | ENTRY_INCREMENT;
        if self.entry_shift {
            cmd |= ENTRY_SHIFT;
        }
        cmd
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use pcf8574_lcd::{Builder, Geometry};
///
/// let geometry = match Geometry::new(2, 16) {
///     Ok(geometry) => geometry,
///     Err(_) => return,
/// };
/// let config = match Builder::new().geometry(geometry).address(0x27).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    geometry: Option<Geometry>,
    address: u8,
    pin_map: PinMap,
    font: Font,
    entry_shift: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            geometry: None,
            address: DEFAULT_ADDRESS,
            pin_map: PinMap::PCF8574,
            font: Font::Dots5x8,
            entry_shift: false,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display geometry (required)
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set the expander's 7-bit I2C address
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the expander wiring
    pub fn pin_map(mut self, pin_map: PinMap) -> Self {
        self.pin_map = pin_map;
        self
    }

    /// Set the character font
    pub fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Shift the display on each write instead of moving the cursor
    pub fn entry_shift(mut self, value: bool) -> Self {
        self.entry_shift = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingGeometry` if geometry was not set,
    /// `BuilderError::InvalidAddress` for addresses above 0x7F,
    /// `BuilderError::InvalidPinMap` for an inconsistent pin map, and
    /// `BuilderError::InvalidFont` for a 5x10 font on a multi-line display.
    pub fn build(self) -> Result<Config, BuilderError> {
        let geometry = self.geometry.ok_or(BuilderError::MissingGeometry)?;
        if self.address > 0x7F {
            return Err(BuilderError::InvalidAddress(self.address));
        }
        if !self.pin_map.is_valid() {
            return Err(BuilderError::InvalidPinMap);
        }
        if self.font == Font::Dots5x10 && geometry.rows > 1 {
            return Err(BuilderError::InvalidFont);
        }
        Ok(Config {
            geometry,
            address: self.address,
            pin_map: self.pin_map,
            font: self.font,
            entry_shift: self.entry_shift,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_bounds() {
        assert!(Geometry::new(1, 1).is_ok());
        assert!(Geometry::new(4, 40).is_ok());
        assert_eq!(
            Geometry::new(0, 16),
            Err(BuilderError::InvalidGeometry {
                rows: 0,
                columns: 16
            })
        );
        assert!(Geometry::new(5, 16).is_err());
        assert!(Geometry::new(2, 0).is_err());
        assert!(Geometry::new(2, 41).is_err());
    }

    #[test]
    fn test_ddram_address_row_encoding() {
        let geometry = Geometry::new(4, 20).unwrap();
        assert_eq!(geometry.ddram_address(0, 0), 0x00);
        assert_eq!(geometry.ddram_address(0, 1), 0x40);
        assert_eq!(geometry.ddram_address(0, 2), 0x14);
        assert_eq!(geometry.ddram_address(0, 3), 0x54);
        assert_eq!(geometry.ddram_address(19, 3), 0x67);
    }

    #[test]
    fn test_ddram_address_law_all_cells() {
        for (rows, columns) in [(1, 8), (2, 16), (4, 16), (4, 20), (2, 40)] {
            let geometry = Geometry::new(rows, columns).unwrap();
            for y in 0..rows {
                for x in 0..columns {
                    let expected = (x & 0x3F) + 0x40 * (y & 1) + columns * ((y >> 1) & 1);
                    assert_eq!(geometry.ddram_address(x, y), expected);
                }
            }
        }
    }

    #[test]
    fn test_pin_map_defaults() {
        let map = PinMap::default();
        assert_eq!(map.register_select_mask(), 0x01);
        assert_eq!(map.read_write_mask(), 0x02);
        assert_eq!(map.enable_mask(), 0x04);
        assert_eq!(map.backlight_mask(), 0x08);
        assert_eq!(map.data_mask(), 0xF0);
        assert_eq!(map.encode_nibble(0x1A), 0xA0);
    }

    #[test]
    fn test_pin_map_rejects_overlap() {
        // Backlight on a data bit
        assert_eq!(PinMap::new(0, 1, 2, 4, 4), Err(BuilderError::InvalidPinMap));
        // Data nibble would spill past bit 7
        assert_eq!(PinMap::new(0, 1, 2, 3, 5), Err(BuilderError::InvalidPinMap));
        // Alternative wiring with data on the low bits
        let map = PinMap::new(4, 5, 6, 7, 0).unwrap();
        assert_eq!(map.data_mask(), 0x0F);
        assert_eq!(map.enable_mask(), 0x40);
    }

    #[test]
    fn test_pin_map_rejects_out_of_range_bits() {
        // Each control line past bit 7 would overflow its mask shift
        assert_eq!(PinMap::new(8, 1, 2, 3, 4), Err(BuilderError::InvalidPinMap));
        assert_eq!(PinMap::new(0, 8, 2, 3, 4), Err(BuilderError::InvalidPinMap));
        assert_eq!(PinMap::new(0, 1, 8, 3, 4), Err(BuilderError::InvalidPinMap));
        assert_eq!(PinMap::new(0, 1, 2, 200, 4), Err(BuilderError::InvalidPinMap));
        // Nibble at bits 6..10 would lose its top two bits
        assert_eq!(PinMap::new(0, 1, 2, 3, 6), Err(BuilderError::InvalidPinMap));
    }

    #[test]
    fn test_builder_requires_geometry() {
        assert!(matches!(
            Builder::new().build(),
            Err(BuilderError::MissingGeometry)
        ));
    }

    #[test]
    fn test_builder_rejects_wide_address() {
        let result = Builder::new()
            .geometry(Geometry::new(2, 16).unwrap())
            .address(0x80)
            .build();
        assert_eq!(result, Err(BuilderError::InvalidAddress(0x80)));
    }

    #[test]
    fn test_builder_rejects_tall_font_on_two_lines() {
        let result = Builder::new()
            .geometry(Geometry::new(2, 16).unwrap())
            .font(Font::Dots5x10)
            .build();
        assert_eq!(result, Err(BuilderError::InvalidFont));
    }

    #[test]
    fn test_function_set_flags() {
        let config = Builder::new()
            .geometry(Geometry::new(2, 16).unwrap())
            .build()
            .unwrap();
        assert_eq!(config.function_set(), 0x28);
        assert_eq!(config.entry_mode(), 0x06);
        assert_eq!(config.address(), DEFAULT_ADDRESS);
        assert_eq!(config.pin_map(), PinMap::PCF8574);

        let config = Builder::new()
            .geometry(Geometry::new(1, 16).unwrap())
            .font(Font::Dots5x10)
            .entry_shift(true)
            .build()
            .unwrap();
        assert_eq!(config.function_set(), 0x24);
        assert_eq!(config.entry_mode(), 0x07);
    }
}

/// Error type for the ST7789V driver.
///
/// `E` is the transport's error type. Every other variant is a local
/// validation failure, raised before any byte reaches the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// No command with the requested id or name exists.
    UnknownCommand,
    /// The command takes no payload but one was supplied.
    PayloadNotExpected {
        command: u8,
        len: usize,
    },
    /// The payload length does not match the command's fixed length.
    PayloadLengthMismatch {
        command: u8,
        expected: usize,
        actual: usize,
    },
    /// Color depth is not one of 444, 565 or 666.
    InvalidColorMode(u16),
    /// Rotation is not one of 0, 90, 180 or 270 degrees.
    InvalidRotation(u16),
    /// A window edge violates `0 <= start < end <= max` on the given axis.
    InvalidBounds {
        axis: Axis,
        start: u16,
        end: u16,
        max: u16,
    },
    /// The transport is not open for traffic.
    TransportNotReady,
    /// The display has not been initialized, call `initialize()` first.
    NotInitialized,
    /// Transport failure.
    Io(E),
}

/// Which axis of a drawing window failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    Column,
    Row,
}

/// Display rotation in degrees, clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Select a rotation from its numeric value in degrees.
    pub fn from_degrees<E>(degrees: u16) -> Result<Self, Error<E>> {
        match degrees {
            0 => Ok(Rotation::Deg0),
            90 => Ok(Rotation::Deg90),
            180 => Ok(Rotation::Deg180),
            270 => Ok(Rotation::Deg270),
            other => Err(Error::InvalidRotation(other)),
        }
    }
}

/// Rotation plus Y-axis mirroring, as mapped onto the MADCTL register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    pub rotation: Rotation,
    pub mirrored: bool,
}

impl Orientation {
    /// The MADCTL register byte for this orientation.
    ///
    /// Bits 7..5 are MY/MX/MV (mirror Y, mirror X, row/column exchange);
    /// bits 4..0 stay zero.
    pub const fn madctl(self) -> u8 {
        match (self.rotation, self.mirrored) {
            (Rotation::Deg0, false) => 0x00,
            (Rotation::Deg0, true) => 0x40,
            (Rotation::Deg90, false) => 0x60,
            (Rotation::Deg90, true) => 0xE0,
            (Rotation::Deg180, false) => 0xC0,
            (Rotation::Deg180, true) => 0x80,
            (Rotation::Deg270, false) => 0xA0,
            (Rotation::Deg270, true) => 0x20,
        }
    }

    /// Whether MADCTL bit 5 (row/column exchange) is set. When it is,
    /// the panel's width and height trade places for addressing.
    pub const fn row_col_swapped(self) -> bool {
        self.madctl() & 0x20 != 0
    }
}

/// The addressable drawing window: left/top included, right/bottom excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Bounds {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Bounds {
    pub const fn new(left: u16, top: u16, right: u16, bottom: u16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The full-panel window for the given extents.
    pub const fn full(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    pub const fn width(self) -> u16 {
        self.right - self.left
    }

    pub const fn height(self) -> u16 {
        self.bottom - self.top
    }

    /// Check this window against the panel extents.
    pub fn validate<E>(self, max_w: u16, max_h: u16) -> Result<(), Error<E>> {
        if !(self.left < self.right && self.right <= max_w) {
            return Err(Error::InvalidBounds {
                axis: Axis::Column,
                start: self.left,
                end: self.right,
                max: max_w,
            });
        }
        if !(self.top < self.bottom && self.bottom <= max_h) {
            return Err(Error::InvalidBounds {
                axis: Axis::Row,
                start: self.top,
                end: self.bottom,
                max: max_h,
            });
        }
        Ok(())
    }

    /// CASET payload: start and (inclusive) end column, big-endian.
    pub const fn column_address(self) -> [u8; 4] {
        let start = self.left.to_be_bytes();
        let end = (self.right - 1).to_be_bytes();
        [start[0], start[1], end[0], end[1]]
    }

    /// RASET payload: start and (inclusive) end row, big-endian.
    pub const fn row_address(self) -> [u8; 4] {
        let start = self.top.to_be_bytes();
        let end = (self.bottom - 1).to_be_bytes();
        [start[0], start[1], end[0], end[1]]
    }
}

//! ST7789V display controller.
//!
//! Owns the transport and drives the chip's initialize → draw →
//! power-toggle lifecycle. Every operation is a blocking round-trip
//! over the command bus; nothing here is safe to share between
//! concurrent callers, serialize access externally if you need more
//! than one producer.

use alloc::vec::Vec;
use embedded_hal::delay::DelayNs;

use crate::color::ColorMode;
use crate::command::{self, Command, Frame};
use crate::common::{Bounds, Error, Orientation, Rotation};
use crate::interface::Interface;

/// Reset-line settle time between level changes.
const RESET_SETTLE_MS: u32 = 10;
/// Post sleep-out settle before further traffic.
const WAKE_SETTLE_MS: u32 = 120;

/// Initialization parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Color depth mode.
    pub color_mode: ColorMode,
    /// Whether the colors are inverted. Defaults to true, 000 is black.
    pub inverted: bool,
    /// Display rotation.
    pub rotation: Rotation,
    /// Whether the image is mirrored along the Y axis.
    pub mirrored: bool,
    /// Drawing region; the full panel when `None`.
    pub bounds: Option<Bounds>,
    /// Whether to hardware-reset the chip before initializing.
    pub reset: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Rgb565,
            inverted: true,
            rotation: Rotation::Deg0,
            mirrored: false,
            bounds: None,
            reset: true,
        }
    }
}

/// Normalized backlight intensity. Booleans coerce to fully off/on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacklightLevel(pub f32);

impl From<f32> for BacklightLevel {
    fn from(level: f32) -> Self {
        Self(level)
    }
}

impl From<bool> for BacklightLevel {
    fn from(on: bool) -> Self {
        Self(if on { 1.0 } else { 0.0 })
    }
}

/// Driver for an ST7789V-based display of `W`×`H` pixels.
///
/// `IO` supplies the framed command bus and the reset/backlight lines;
/// `D` supplies the settle delays. The driver starts uninitialized and
/// refuses traffic until [`initialize`](Display::initialize) has run.
pub struct Display<IO, D, const W: u16 = 240, const H: u16 = 320> {
    io: IO,
    delay: D,
    initialized: bool,
    color_mode: ColorMode,
    inverted: bool,
    orientation: Orientation,
    bounds: Bounds,
}

impl<IO, D, const W: u16, const H: u16> Display<IO, D, W, H>
where
    IO: Interface,
    D: DelayNs,
{
    pub fn new(io: IO, delay: D) -> Self {
        Self {
            io,
            delay,
            initialized: false,
            color_mode: ColorMode::default(),
            inverted: false,
            orientation: Orientation::default(),
            bounds: Bounds::full(W, H),
        }
    }

    /// Whether the display has been initialized.
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Width of the active drawing window.
    pub fn width(&self) -> u16 {
        self.bounds.width()
    }

    /// Height of the active drawing window.
    pub fn height(&self) -> u16 {
        self.bounds.height()
    }

    /// Horizontal panel extent under the current orientation.
    pub fn max_w(&self) -> u16 {
        if self.orientation.row_col_swapped() { H } else { W }
    }

    /// Vertical panel extent under the current orientation.
    pub fn max_h(&self) -> u16 {
        if self.orientation.row_col_swapped() { W } else { H }
    }

    /// Initialize the display.
    ///
    /// Requires the transport to be ready. Optionally hardware-resets
    /// the chip, then applies color mode, inversion, orientation and
    /// bounds, and wakes the panel. The chip receives each step as it
    /// is issued, so a failure partway leaves it partially configured;
    /// there is no rollback.
    pub fn initialize(&mut self, config: Config) -> Result<(), Error<IO::Error>> {
        if !self.io.is_ready() {
            return Err(Error::TransportNotReady);
        }
        if config.reset {
            self.hard_reset()?;
        }
        self.initialized = true;

        self.set_color_mode(config.color_mode)?;
        self.inverted = config.inverted;
        self.command(
            if config.inverted {
                Command::Invon
            } else {
                Command::Invoff
            },
            &[],
        )?;

        // Orientation first: the panel extents it derives decide what
        // bounds are valid.
        self.set_orientation(config.rotation, config.mirrored)?;
        let bounds = config
            .bounds
            .unwrap_or(Bounds::full(self.max_w(), self.max_h()));
        self.set_bounds(bounds)?;

        self.wake()
    }

    /// Hardware-reset the chip and re-apply the last initialization
    /// parameters (without a second, redundant reset).
    pub fn reset(&mut self) -> Result<(), Error<IO::Error>> {
        self.hard_reset()?;
        if self.initialized {
            self.initialize(Config {
                color_mode: self.color_mode,
                inverted: self.inverted,
                rotation: self.orientation.rotation,
                mirrored: self.orientation.mirrored,
                bounds: Some(self.bounds),
                reset: false,
            })?;
        }
        Ok(())
    }

    /// Set the color depth used by subsequent draws.
    pub fn set_color_mode(&mut self, mode: ColorMode) -> Result<(), Error<IO::Error>> {
        self.color_mode = mode;
        self.command(Command::Colmod, &[mode.chip_id()])
    }

    /// Set rotation and mirroring.
    ///
    /// Recomputes the panel extents before anything else can validate
    /// bounds against them; the active bounds themselves are left
    /// untouched.
    pub fn set_orientation(
        &mut self,
        rotation: Rotation,
        mirrored: bool,
    ) -> Result<(), Error<IO::Error>> {
        let orientation = Orientation { rotation, mirrored };
        self.orientation = orientation;
        self.command(Command::Madctl, &[orientation.madctl()])
    }

    /// Set the drawing window for subsequent memory writes.
    ///
    /// This allows drawing to part of the screen, saving up bandwidth.
    pub fn set_bounds(&mut self, bounds: Bounds) -> Result<(), Error<IO::Error>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        bounds.validate(self.max_w(), self.max_h())?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "set window: columns {}..{} rows {}..{}",
            bounds.left,
            bounds.right,
            bounds.top,
            bounds.bottom
        );
        self.command(Command::Caset, &bounds.column_address())?;
        self.command(Command::Raset, &bounds.row_address())?;
        self.bounds = bounds;
        Ok(())
    }

    /// Turn the display on.
    pub fn turn_on(&mut self) -> Result<(), Error<IO::Error>> {
        self.wake()
    }

    /// Turn the display off. Bounds, color mode and orientation keep
    /// their values.
    pub fn turn_off(&mut self) -> Result<(), Error<IO::Error>> {
        self.command(Command::Dispoff, &[])?;
        self.command(Command::Slpin, &[])
    }

    /// Draw a pixel sequence into the active window.
    ///
    /// Only the first `width * height` pixels are used; a shorter slice
    /// paints just the leading pixels of the window. In 444 mode an odd
    /// pixel count is completed with one black pixel.
    pub fn draw_pixels(&mut self, pixels: &[(u8, u8, u8)]) -> Result<(), Error<IO::Error>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        let count = self.width() as usize * self.height() as usize;
        let pixels = &pixels[..pixels.len().min(count)];
        let data = self.color_mode.pack(pixels);
        #[cfg(feature = "defmt")]
        defmt::debug!("memory write: {} pixels, {} bytes", pixels.len(), data.len());
        self.command(Command::Ramwr, &data)
    }

    /// Draw from a dense RGB888 byte buffer into the active window.
    /// Truncation mirrors [`draw_pixels`](Display::draw_pixels).
    pub fn draw_image(&mut self, data: &[u8]) -> Result<(), Error<IO::Error>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        let len = self.width() as usize * self.height() as usize * 3;
        let data = &data[..data.len().min(len)];
        let packed = self.color_mode.pack_image(data);
        self.command(Command::Ramwr, &packed)
    }

    /// Send a command to the display, fire and forget.
    ///
    /// The payload is validated against the command's framing rules
    /// before any byte is sent. Commands that produce a response can be
    /// issued this way too; use [`command_read`](Display::command_read)
    /// to collect it.
    pub fn command(&mut self, command: Command, data: &[u8]) -> Result<(), Error<IO::Error>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        let frame = command::encode(command, data)?;
        self.transmit(frame)
    }

    /// Send a command and read its fixed-length response. Commands
    /// without one return an empty vec; caller-determined response
    /// lengths are read explicitly via
    /// [`read_response`](Display::read_response).
    pub fn command_read(
        &mut self,
        command: Command,
        data: &[u8],
    ) -> Result<Vec<u8>, Error<IO::Error>> {
        if !self.initialized {
            return Err(Error::NotInitialized);
        }
        let frame = command::encode(command, data)?;
        let expect_read = frame.expect_read;
        self.transmit(frame)?;
        self.read_response(expect_read)
    }

    /// Read `count` response bytes from the bus.
    pub fn read_response(&mut self, count: usize) -> Result<Vec<u8>, Error<IO::Error>> {
        let mut out = alloc::vec![0u8; count];
        if count > 0 {
            self.io.read(&mut out).map_err(Error::Io)?;
        }
        Ok(out)
    }

    /// Set the backlight level; `true`/`false` coerce to full/off.
    pub fn set_backlight(
        &mut self,
        level: impl Into<BacklightLevel>,
    ) -> Result<(), Error<IO::Error>> {
        self.io.set_backlight(level.into().0).map_err(Error::Io)
    }

    /// Release the transport and delay provider.
    pub fn release(self) -> (IO, D) {
        (self.io, self.delay)
    }

    /// One chip-select window: command byte under command framing, then
    /// the payload (if any) under data framing. Never split.
    fn transmit(&mut self, frame: Frame<'_>) -> Result<(), Error<IO::Error>> {
        self.io.assert_command_frame().map_err(Error::Io)?;
        self.io.write(&[frame.command]).map_err(Error::Io)?;
        if !frame.data.is_empty() {
            self.io.assert_data_frame().map_err(Error::Io)?;
            self.io.write(frame.data).map_err(Error::Io)?;
        }
        self.io.end_frame().map_err(Error::Io)
    }

    fn hard_reset(&mut self) -> Result<(), Error<IO::Error>> {
        self.io.set_reset(true).map_err(Error::Io)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.io.set_reset(false).map_err(Error::Io)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.io.set_reset(true).map_err(Error::Io)?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    fn wake(&mut self) -> Result<(), Error<IO::Error>> {
        self.command(Command::Slpout, &[])?;
        self.delay.delay_ms(WAKE_SETTLE_MS);
        self.command(Command::Dispon, &[])
    }
}

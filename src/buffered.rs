//! Display controller with an integrated RGB888 frame buffer.
//!
//! [`BufferedDisplay`] composes a [`Display`] with a panel-sized pixel
//! buffer: drawing happens in memory (directly or through
//! `embedded-graphics`), and [`update`](BufferedDisplay::update) /
//! [`update_partial`](BufferedDisplay::update_partial) push the buffer
//! to the chip.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::{Pixel, pixelcolor::Rgb888, prelude::*};
use embedded_hal::delay::DelayNs;

use crate::command::Command;
use crate::common::{Bounds, Error};
use crate::display::{Config, Display};
use crate::interface::Interface;

pub struct BufferedDisplay<IO, D, const W: u16 = 240, const H: u16 = 320> {
    display: Display<IO, D, W, H>,
    buffer: Vec<u8>,
}

impl<IO, D, const W: u16, const H: u16> BufferedDisplay<IO, D, W, H>
where
    IO: Interface,
    D: DelayNs,
{
    /// Initialize the display and allocate a black full-panel buffer.
    pub fn new(io: IO, delay: D, config: Config) -> Result<Self, Error<IO::Error>> {
        let mut display = Display::new(io, delay);
        display.initialize(config)?;
        let buffer = vec![0; display.max_w() as usize * display.max_h() as usize * 3];
        Ok(Self { display, buffer })
    }

    pub fn display(&self) -> &Display<IO, D, W, H> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<IO, D, W, H> {
        &mut self.display
    }

    /// The raw RGB888 buffer, row-major over the full panel.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Write one buffer pixel; out-of-panel coordinates are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, color: Rgb888) {
        if x >= self.display.max_w() || y >= self.display.max_h() {
            return;
        }
        let idx = (y as usize * self.display.max_w() as usize + x as usize) * 3;
        self.buffer[idx] = color.r();
        self.buffer[idx + 1] = color.g();
        self.buffer[idx + 2] = color.b();
    }

    /// Fill the whole buffer with one color.
    pub fn fill(&mut self, color: Rgb888) {
        for pixel in self.buffer.chunks_exact_mut(3) {
            pixel[0] = color.r();
            pixel[1] = color.g();
            pixel[2] = color.b();
        }
    }

    /// Send the buffer's contents to the display.
    pub fn update(&mut self) -> Result<(), Error<IO::Error>> {
        let full = Bounds::full(self.display.max_w(), self.display.max_h());
        if self.display.bounds() != full {
            self.display.set_bounds(full)?;
        }
        let packed = self.display.color_mode().pack_image(&self.buffer);
        self.display.command(Command::Ramwr, &packed)
    }

    /// Send a rectangular region of the buffer to the display.
    pub fn update_partial(&mut self, bounds: Bounds) -> Result<(), Error<IO::Error>> {
        if self.display.bounds() != bounds {
            self.display.set_bounds(bounds)?;
        }
        let stride = self.display.max_w() as usize * 3;
        let mut region =
            Vec::with_capacity(bounds.width() as usize * bounds.height() as usize * 3);
        for y in bounds.top..bounds.bottom {
            let row = y as usize * stride;
            let left = row + bounds.left as usize * 3;
            let right = row + bounds.right as usize * 3;
            region.extend_from_slice(&self.buffer[left..right]);
        }
        let packed = self.display.color_mode().pack_image(&region);
        self.display.command(Command::Ramwr, &packed)
    }

    /// [`update_partial`](BufferedDisplay::update_partial) with an
    /// origin-plus-size rectangle.
    pub fn update_partial_rect(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
    ) -> Result<(), Error<IO::Error>> {
        self.update_partial(Bounds::new(x, y, x + width, y + height))
    }

    /// Hardware-reset and re-apply the stored initialization
    /// parameters. The buffer is kept as-is.
    pub fn reset(&mut self) -> Result<(), Error<IO::Error>> {
        self.display.reset()
    }

    /// Release the transport and delay provider.
    pub fn release(self) -> (IO, D) {
        self.display.release()
    }
}

impl<IO, D, const W: u16, const H: u16> OriginDimensions for BufferedDisplay<IO, D, W, H>
where
    IO: Interface,
    D: DelayNs,
{
    fn size(&self) -> Size {
        Size::new(self.display.max_w() as u32, self.display.max_h() as u32)
    }
}

impl<IO, D, const W: u16, const H: u16> DrawTarget for BufferedDisplay<IO, D, W, H>
where
    IO: Interface,
    D: DelayNs,
{
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let w = self.display.max_w() as i32;
        let h = self.display.max_h() as i32;
        for Pixel(point, color) in pixels {
            if !(0..w).contains(&point.x) || !(0..h).contains(&point.y) {
                continue;
            }
            let idx = (point.y * w + point.x) as usize * 3;
            self.buffer[idx] = color.r();
            self.buffer[idx + 1] = color.g();
            self.buffer[idx + 2] = color.b();
        }
        Ok(())
    }
}

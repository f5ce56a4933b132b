//! Driver for ST7789V-based SPI displays.
//!
//! The crate is split the way the chip is layered: [`command`] knows the
//! Table 1 command set and validates payload framing, [`color`] packs
//! RGB pixels into the three wire formats the chip accepts (444, 565,
//! 666), [`common`] tracks orientation and the addressable window, and
//! [`display`] composes them into the initialize → draw → power-toggle
//! lifecycle. The hardware itself sits behind the [`interface`]
//! capability trait; an embedded-hal SPI implementation is provided, and
//! anything that can frame bytes with data/command and chip-select
//! signals can stand in for it.
//!
//! [`buffered`] adds an optional in-memory frame buffer with an
//! `embedded-graphics` `DrawTarget` on top.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod buffered;
pub mod color;
pub mod command;
pub mod common;
pub mod display;
pub mod interface;

pub use buffered::BufferedDisplay;
pub use color::ColorMode;
pub use command::{Command, CommandSpec, Frame, Len};
pub use common::{Axis, Bounds, Error, Orientation, Rotation};
pub use display::{BacklightLevel, Config, Display};
pub use interface::{Interface, InterfaceError, SpiInterface};

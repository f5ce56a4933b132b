//! Transport capability the driver core consumes, and its embedded-hal
//! SPI implementation.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use embedded_hal::spi::SpiBus;

/// Byte-oriented command bus with data/command and chip-select framing.
///
/// One chip transaction is bracketed by [`assert_command_frame`] and
/// [`end_frame`]; [`assert_data_frame`] switches the open transaction
/// from command to data framing without releasing the chip select.
///
/// [`assert_command_frame`]: Interface::assert_command_frame
/// [`assert_data_frame`]: Interface::assert_data_frame
/// [`end_frame`]: Interface::end_frame
pub trait Interface {
    type Error;

    /// Whether the transport is set up and ready for traffic.
    fn is_ready(&self) -> bool;

    /// Select the chip and assert the command framing signal.
    fn assert_command_frame(&mut self) -> Result<(), Self::Error>;

    /// Switch the open transaction to data framing. The chip stays
    /// selected.
    fn assert_data_frame(&mut self) -> Result<(), Self::Error>;

    /// Deselect the chip, closing the transaction.
    fn end_frame(&mut self) -> Result<(), Self::Error>;

    /// Send bytes under the currently asserted framing.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Read `buf.len()` response bytes from the bus.
    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Drive the reset line.
    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Set backlight intensity, `level` in `[0, 1]`.
    fn set_backlight(&mut self, level: f32) -> Result<(), Self::Error>;
}

/// Error type for [`SpiInterface`], one variant per line that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceError<SpiE, DCE, CSE, RSE, BLE> {
    Spi(SpiE),
    DC(DCE),
    CS(CSE),
    RST(RSE),
    BL(BLE),
}

/// SPI transport: a bus plus the data/command, chip-select and reset
/// pins, and a PWM-capable backlight pin.
///
/// The bus starts out not ready; [`open`](SpiInterface::open) drives
/// every line to its idle state, and [`release`](SpiInterface::release)
/// drives the safe shutdown state before handing the parts back, so the
/// panel is left dark and deselected on every exit path.
pub struct SpiInterface<SPI, DC, CS, RST, BL> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    backlight: BL,
    ready: bool,
}

impl<SPI, DC, CS, RST, BL> SpiInterface<SPI, DC, CS, RST, BL>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: SetDutyCycle,
{
    pub fn new(spi: SPI, dc: DC, cs: CS, rst: RST, backlight: BL) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            backlight,
            ready: false,
        }
    }

    /// Drive every line to its idle state (deselected, command framing,
    /// reset released, backlight on) and mark the bus ready.
    pub fn open(
        &mut self,
    ) -> Result<(), InterfaceError<SPI::Error, DC::Error, CS::Error, RST::Error, BL::Error>> {
        self.cs.set_high().map_err(InterfaceError::CS)?;
        self.dc.set_low().map_err(InterfaceError::DC)?;
        self.rst.set_high().map_err(InterfaceError::RST)?;
        self.backlight
            .set_duty_cycle_fully_on()
            .map_err(InterfaceError::BL)?;
        self.ready = true;
        Ok(())
    }

    /// Shut the bus down (backlight off, lines idle) and return the
    /// parts.
    #[allow(clippy::type_complexity)]
    pub fn release(
        mut self,
    ) -> Result<
        (SPI, DC, CS, RST, BL),
        InterfaceError<SPI::Error, DC::Error, CS::Error, RST::Error, BL::Error>,
    > {
        self.backlight
            .set_duty_cycle_fully_off()
            .map_err(InterfaceError::BL)?;
        self.dc.set_low().map_err(InterfaceError::DC)?;
        self.cs.set_high().map_err(InterfaceError::CS)?;
        self.rst.set_high().map_err(InterfaceError::RST)?;
        Ok((self.spi, self.dc, self.cs, self.rst, self.backlight))
    }
}

impl<SPI, DC, CS, RST, BL> Interface for SpiInterface<SPI, DC, CS, RST, BL>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: SetDutyCycle,
{
    type Error = InterfaceError<SPI::Error, DC::Error, CS::Error, RST::Error, BL::Error>;

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn assert_command_frame(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(InterfaceError::CS)?;
        self.dc.set_low().map_err(InterfaceError::DC)
    }

    fn assert_data_frame(&mut self) -> Result<(), Self::Error> {
        // Prior bytes must be on the wire before the framing signal flips.
        self.spi.flush().map_err(InterfaceError::Spi)?;
        self.dc.set_high().map_err(InterfaceError::DC)
    }

    fn end_frame(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().map_err(InterfaceError::Spi)?;
        self.cs.set_high().map_err(InterfaceError::CS)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(bytes).map_err(InterfaceError::Spi)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.spi.read(buf).map_err(InterfaceError::Spi)
    }

    fn set_reset(&mut self, high: bool) -> Result<(), Self::Error> {
        if high {
            self.rst.set_high().map_err(InterfaceError::RST)
        } else {
            self.rst.set_low().map_err(InterfaceError::RST)
        }
    }

    fn set_backlight(&mut self, level: f32) -> Result<(), Self::Error> {
        let max = self.backlight.max_duty_cycle();
        let duty = (level.clamp(0.0, 1.0) * f32::from(max)) as u16;
        self.backlight
            .set_duty_cycle(duty)
            .map_err(InterfaceError::BL)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! A transport that records everything it is asked to do.

    use alloc::vec::Vec;

    use super::Interface;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Op {
        CommandFrame,
        DataFrame,
        EndFrame,
        Write(Vec<u8>),
        Read(usize),
        Reset(bool),
        Backlight(f32),
    }

    pub struct MockInterface {
        pub ready: bool,
        pub ops: Vec<Op>,
        /// Bytes handed out by `read`, front first; zeros once drained.
        pub responses: Vec<u8>,
    }

    impl MockInterface {
        pub fn new() -> Self {
            Self {
                ready: true,
                ops: Vec::new(),
                responses: Vec::new(),
            }
        }

        pub fn not_ready() -> Self {
            Self {
                ready: false,
                ..Self::new()
            }
        }

        /// Collapse the op log into `(command, payload)` frames,
        /// asserting the framing contract along the way: one chip-select
        /// window per command, command byte first, payload (if any)
        /// under data framing, nothing outside a window.
        pub fn frames(&self) -> Vec<(u8, Vec<u8>)> {
            let mut frames = Vec::new();
            let mut ops = self.ops.iter().peekable();
            while let Some(op) = ops.next() {
                match op {
                    Op::CommandFrame => {}
                    Op::Reset(_) | Op::Backlight(_) | Op::Read(_) => continue,
                    other => panic!("write outside a chip-select window: {other:?}"),
                }
                let command = match ops.next() {
                    Some(Op::Write(bytes)) if bytes.len() == 1 => bytes[0],
                    other => panic!("expected a single command byte, got {other:?}"),
                };
                let mut payload = Vec::new();
                if let Some(Op::DataFrame) = ops.peek() {
                    ops.next();
                    while let Some(Op::Write(bytes)) = ops.peek() {
                        payload.extend_from_slice(bytes);
                        ops.next();
                    }
                }
                match ops.next() {
                    Some(Op::EndFrame) => {}
                    other => panic!("chip-select window left open: {other:?}"),
                }
                frames.push((command, payload));
            }
            frames
        }

        /// Commands seen, in order, without their payloads.
        pub fn command_ids(&self) -> Vec<u8> {
            self.frames().into_iter().map(|(id, _)| id).collect()
        }
    }

    impl Interface for MockInterface {
        type Error = ();

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn assert_command_frame(&mut self) -> Result<(), ()> {
            self.ops.push(Op::CommandFrame);
            Ok(())
        }

        fn assert_data_frame(&mut self) -> Result<(), ()> {
            self.ops.push(Op::DataFrame);
            Ok(())
        }

        fn end_frame(&mut self) -> Result<(), ()> {
            self.ops.push(Op::EndFrame);
            Ok(())
        }

        fn write(&mut self, bytes: &[u8]) -> Result<(), ()> {
            self.ops.push(Op::Write(bytes.to_vec()));
            Ok(())
        }

        fn read(&mut self, buf: &mut [u8]) -> Result<(), ()> {
            self.ops.push(Op::Read(buf.len()));
            for slot in buf.iter_mut() {
                *slot = if self.responses.is_empty() {
                    0
                } else {
                    self.responses.remove(0)
                };
            }
            Ok(())
        }

        fn set_reset(&mut self, high: bool) -> Result<(), ()> {
            self.ops.push(Op::Reset(high));
            Ok(())
        }

        fn set_backlight(&mut self, level: f32) -> Result<(), ()> {
            self.ops.push(Op::Backlight(level));
            Ok(())
        }
    }
}

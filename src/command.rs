//! Table 1 command registry for the ST7789V chip, and the framing layer
//! that validates a payload against it.

use crate::common::Error;

/// Payload or response length rule for a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Len {
    /// The command carries no bytes in this direction.
    None,
    /// Exactly this many bytes.
    Fixed(u8),
    /// Caller-determined length (bulk transfers).
    Variable,
}

impl Len {
    /// The fixed byte count, or 0 for `None`/`Variable`.
    pub const fn fixed(self) -> usize {
        match self {
            Len::Fixed(n) => n as usize,
            _ => 0,
        }
    }
}

/// Framing rules for one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandSpec {
    pub id: u8,
    pub name: &'static str,
    pub write_len: Len,
    pub read_len: Len,
    pub description: &'static str,
}

macro_rules! command_table {
    ($( $variant:ident = ($id:literal, $name:literal, $write:expr, $read:expr, $desc:literal), )*) => {
        /// Table 1 commands understood by the chip.
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum Command {
            $( $variant, )*
        }

        impl Command {
            /// Every command in the registry.
            pub const ALL: &'static [Command] = &[ $( Command::$variant, )* ];

            /// Framing rules for this command.
            pub const fn spec(self) -> CommandSpec {
                match self {
                    $(
                        Command::$variant => CommandSpec {
                            id: $id,
                            name: $name,
                            write_len: $write,
                            read_len: $read,
                            description: $desc,
                        },
                    )*
                }
            }
        }
    };
}

command_table! {
    Swreset = (0x01, "SWRESET", Len::None, Len::None, "Software Reset"),
    Rddid = (0x04, "RDDID", Len::None, Len::Fixed(4), "Read Display ID"),
    Rddst = (0x05, "RDDST", Len::None, Len::Fixed(5), "Read Display Status"),
    Rddpm = (0x0A, "RDDPM", Len::None, Len::Fixed(2), "Read Display Power Mode"),
    Rddmadctl = (0x0B, "RDDMADCTL", Len::None, Len::Fixed(2), "Read Display MADCTL"),
    Rddcolmod = (0x0C, "RDDCOLMOD", Len::None, Len::Fixed(2), "Read Display Pixel Format"),
    Rddim = (0x0D, "RDDIM", Len::None, Len::Fixed(2), "Read Display Image Mode"),
    Rddsm = (0x0E, "RDDSM", Len::None, Len::Fixed(2), "Read Display Signal Mode"),
    Rddsdr = (0x0F, "RDDSDR", Len::None, Len::Fixed(2), "Read Display Self-Diagnostic Result"),
    Slpin = (0x10, "SLPIN", Len::None, Len::None, "Sleep in"),
    Slpout = (0x11, "SLPOUT", Len::None, Len::None, "Sleep out"),
    Ptlon = (0x12, "PTLON", Len::None, Len::None, "Partial Display Mode On"),
    Noron = (0x13, "NORON", Len::None, Len::None, "Normal Display Mode On"),
    Invoff = (0x20, "INVOFF", Len::None, Len::None, "Display Inversion Off"),
    Invon = (0x21, "INVON", Len::None, Len::None, "Display Inversion On"),
    Gamset = (0x26, "GAMSET", Len::Fixed(1), Len::None, "Gamma Set"),
    Dispoff = (0x28, "DISPOFF", Len::None, Len::None, "Display Off"),
    Dispon = (0x29, "DISPON", Len::None, Len::None, "Display On"),
    Caset = (0x2A, "CASET", Len::Fixed(4), Len::None, "Column Address Set"),
    Raset = (0x2B, "RASET", Len::Fixed(4), Len::None, "Row Address Set"),
    Ramwr = (0x2C, "RAMWR", Len::Variable, Len::None, "Memory Write"),
    Ramrd = (0x2E, "RAMRD", Len::None, Len::Variable, "Memory Read"),
    Ptlar = (0x30, "PTLAR", Len::Fixed(4), Len::None, "Partial Area"),
    Vscrdef = (0x33, "VSCRDEF", Len::Fixed(6), Len::None, "Vertical Scrolling Definition"),
    Teoff = (0x34, "TEOFF", Len::None, Len::None, "Tearing Effect Line Off"),
    Teon = (0x35, "TEON", Len::Fixed(1), Len::None, "Tearing Effect Line On"),
    Madctl = (0x36, "MADCTL", Len::Fixed(1), Len::None, "Memory Data Access Control"),
    Vscsad = (0x37, "VSCSAD", Len::Fixed(2), Len::None, "Vertical Scroll Start Address of RAM"),
    Idmoff = (0x38, "IDMOFF", Len::None, Len::None, "Idle Mode Off"),
    Idmon = (0x39, "IDMON", Len::None, Len::None, "Idle Mode On"),
    Colmod = (0x3A, "COLMOD", Len::Fixed(1), Len::None, "Interface Pixel Format"),
    Wrmemc = (0x3C, "WRMEMC", Len::Variable, Len::None, "Write Memory Continue"),
    Rdmemc = (0x3E, "RDMEMC", Len::None, Len::Variable, "Read Memory Continue"),
    Ste = (0x44, "STE", Len::Fixed(2), Len::None, "Set Tear Scanline"),
    Gscan = (0x45, "GSCAN", Len::None, Len::Fixed(3), "Get Scanline"),
    Wrdisbv = (0x51, "WRDISBV", Len::Fixed(1), Len::None, "Write Display Brightness"),
    Rddisbv = (0x52, "RDDISBV", Len::None, Len::Fixed(2), "Read Display Brightness Value"),
    Wrctrld = (0x53, "WRCTRLD", Len::Fixed(1), Len::None, "Write CTRL Display"),
    Rdctrld = (0x54, "RDCTRLD", Len::None, Len::Fixed(2), "Read CTRL Value Display"),
    Wrcace = (0x55, "WRCACE", Len::Fixed(1), Len::None, "Write Content Adaptive Brightness Control and Color Enhancement"),
    Rdcabc = (0x56, "RDCABC", Len::None, Len::Fixed(2), "Read Content Adaptive Brightness Control"),
    Wrcabcmb = (0x5E, "WRCABCMB", Len::Fixed(1), Len::None, "Write CABC Minimum Brightness"),
    Rdcabcmb = (0x5F, "RDCABCMB", Len::None, Len::Fixed(2), "Read CABC Minimum Brightness"),
    Rdabcsdr = (0x68, "RDABCSDR", Len::None, Len::Fixed(2), "Read Automatic Brightness Control Self-Diagnostic Result"),
    Rdid1 = (0xDA, "RDID1", Len::None, Len::Fixed(2), "Read ID1"),
    Rdid2 = (0xDB, "RDID2", Len::None, Len::Fixed(2), "Read ID2"),
    Rdid3 = (0xDC, "RDID3", Len::None, Len::Fixed(2), "Read ID3"),
}

impl Command {
    /// Look a command up by its numeric id.
    pub fn from_id<E>(id: u8) -> Result<Self, Error<E>> {
        Self::ALL
            .iter()
            .copied()
            .find(|command| command.spec().id == id)
            .ok_or(Error::UnknownCommand)
    }

    /// Look a command up by mnemonic, case-insensitively.
    pub fn from_name<E>(name: &str) -> Result<Self, Error<E>> {
        Self::ALL
            .iter()
            .copied()
            .find(|command| command.spec().name.eq_ignore_ascii_case(name))
            .ok_or(Error::UnknownCommand)
    }
}

/// A validated frame, ready for transmission: the command byte, the data
/// bytes that follow it under data framing, and the fixed response length
/// the chip will produce (0 when there is none or the caller sizes it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    pub command: u8,
    pub data: &'a [u8],
    pub expect_read: usize,
}

/// Validate `data` against the command's framing rules and build the
/// wire frame.
pub fn encode<E>(command: Command, data: &[u8]) -> Result<Frame<'_>, Error<E>> {
    let spec = command.spec();
    match spec.write_len {
        Len::None if !data.is_empty() => {
            return Err(Error::PayloadNotExpected {
                command: spec.id,
                len: data.len(),
            });
        }
        Len::Fixed(expected) if data.len() != expected as usize => {
            return Err(Error::PayloadLengthMismatch {
                command: spec.id,
                expected: expected as usize,
                actual: data.len(),
            });
        }
        _ => {}
    }
    Ok(Frame {
        command: spec.id,
        data,
        expect_read: spec.read_len.fixed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_and_names_are_unique() {
        for (i, a) in Command::ALL.iter().enumerate() {
            for b in &Command::ALL[i + 1..] {
                assert_ne!(a.spec().id, b.spec().id, "{} / {}", a.spec().name, b.spec().name);
                assert!(
                    !a.spec().name.eq_ignore_ascii_case(b.spec().name),
                    "duplicate name {}",
                    a.spec().name
                );
            }
        }
    }

    #[test]
    fn core_commands_match_chip_table() {
        let expected = [
            (Command::Swreset, 0x01, Len::None),
            (Command::Slpout, 0x11, Len::None),
            (Command::Slpin, 0x10, Len::None),
            (Command::Invoff, 0x20, Len::None),
            (Command::Invon, 0x21, Len::None),
            (Command::Dispoff, 0x28, Len::None),
            (Command::Dispon, 0x29, Len::None),
            (Command::Caset, 0x2A, Len::Fixed(4)),
            (Command::Raset, 0x2B, Len::Fixed(4)),
            (Command::Ramwr, 0x2C, Len::Variable),
            (Command::Madctl, 0x36, Len::Fixed(1)),
            (Command::Colmod, 0x3A, Len::Fixed(1)),
        ];
        for (command, id, write_len) in expected {
            assert_eq!(command.spec().id, id);
            assert_eq!(command.spec().write_len, write_len);
            assert_eq!(command.spec().read_len, Len::None);
        }
    }

    #[test]
    fn lookup_by_id_and_name() {
        assert_eq!(Command::from_id::<()>(0x2C), Ok(Command::Ramwr));
        assert_eq!(Command::from_id::<()>(0x02), Err(Error::UnknownCommand));
        assert_eq!(Command::from_name::<()>("RAMWR"), Ok(Command::Ramwr));
        assert_eq!(Command::from_name::<()>("ramwr"), Ok(Command::Ramwr));
        assert_eq!(Command::from_name::<()>("rdDiD"), Ok(Command::Rddid));
        assert_eq!(Command::from_name::<()>("NOPE"), Err(Error::UnknownCommand));
    }

    #[test]
    fn encode_rejects_unexpected_payload() {
        assert_eq!(
            encode::<()>(Command::Slpout, &[1]),
            Err(Error::PayloadNotExpected {
                command: 0x11,
                len: 1
            })
        );
    }

    #[test]
    fn encode_rejects_wrong_fixed_length() {
        assert_eq!(
            encode::<()>(Command::Caset, &[0, 0, 0]),
            Err(Error::PayloadLengthMismatch {
                command: 0x2A,
                expected: 4,
                actual: 3
            })
        );
        let frame = encode::<()>(Command::Caset, &[0, 0, 0, 0xEF]).unwrap();
        assert_eq!(frame.command, 0x2A);
        assert_eq!(frame.data, &[0, 0, 0, 0xEF]);
        assert_eq!(frame.expect_read, 0);
    }

    #[test]
    fn encode_accepts_any_length_for_variable_writes() {
        for len in [0usize, 1, 7, 4096] {
            let data = alloc::vec![0u8; len];
            let frame = encode::<()>(Command::Ramwr, &data).unwrap();
            assert_eq!(frame.data.len(), len);
        }
    }

    #[test]
    fn expect_read_is_fixed_length_only() {
        assert_eq!(encode::<()>(Command::Rddid, &[]).unwrap().expect_read, 4);
        assert_eq!(encode::<()>(Command::Gscan, &[]).unwrap().expect_read, 3);
        // Caller-determined reads are sized by the caller, not the encoder.
        assert_eq!(encode::<()>(Command::Ramrd, &[]).unwrap().expect_read, 0);
        assert_eq!(encode::<()>(Command::Dispon, &[]).unwrap().expect_read, 0);
    }
}

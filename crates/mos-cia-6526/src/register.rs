//! Register select decoding.

/// The sixteen CIA registers, indexed by the RS0-RS3 pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Register {
    /// Peripheral data register A.
    Pra = 0x00,
    /// Peripheral data register B.
    Prb = 0x01,
    /// Data direction register A.
    Ddra = 0x02,
    /// Data direction register B.
    Ddrb = 0x03,
    TaLo = 0x04,
    TaHi = 0x05,
    TbLo = 0x06,
    TbHi = 0x07,
    /// Time-of-day tenths. Not emulated.
    Tod10th = 0x08,
    /// Time-of-day seconds. Not emulated.
    TodSec = 0x09,
    /// Time-of-day minutes. Not emulated.
    TodMin = 0x0A,
    /// Time-of-day hours. Not emulated.
    TodHr = 0x0B,
    /// Serial data register. Not emulated.
    Sdr = 0x0C,
    /// Interrupt control register.
    Icr = 0x0D,
    /// Control register A.
    Cra = 0x0E,
    /// Control register B.
    Crb = 0x0F,
}

impl Register {
    /// Decode the low four bits of `addr`.
    #[must_use]
    pub const fn from_addr(addr: u8) -> Self {
        match addr & 0x0F {
            0x00 => Self::Pra,
            0x01 => Self::Prb,
            0x02 => Self::Ddra,
            0x03 => Self::Ddrb,
            0x04 => Self::TaLo,
            0x05 => Self::TaHi,
            0x06 => Self::TbLo,
            0x07 => Self::TbHi,
            0x08 => Self::Tod10th,
            0x09 => Self::TodSec,
            0x0A => Self::TodMin,
            0x0B => Self::TodHr,
            0x0C => Self::Sdr,
            0x0D => Self::Icr,
            0x0E => Self::Cra,
            _ => Self::Crb,
        }
    }

    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Registers with no emulated behaviour (TOD clock and serial port).
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(
            self,
            Self::Tod10th | Self::TodSec | Self::TodMin | Self::TodHr | Self::Sdr
        )
    }
}

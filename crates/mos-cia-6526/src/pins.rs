//! Pin word shared with the system bus.
//!
//! A CIA transaction is a 64-bit pin mask. The low bits overlay the CPU
//! address/data/control pins so a 6502 pin word can be passed straight
//! through; the chip-specific pins live in the upper half.
//!
//! | Bits  | Pins       |
//! |-------|------------|
//! | 0-3   | RS0-RS3    |
//! | 16-23 | D0-D7      |
//! | 24    | RW (1 = read) |
//! | 26    | IRQ        |
//! | 40    | CS         |
//! | 41-45 | FLAG, PC, SP, TOD, CNT |
//! | 48-55 | PA0-PA7    |
//! | 56-63 | PB0-PB7    |

use std::fmt;

/// A 64-bit pin word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pins(pub u64);

impl Pins {
    pub const RS0: u64 = 1 << 0;
    pub const RS1: u64 = 1 << 1;
    pub const RS2: u64 = 1 << 2;
    pub const RS3: u64 = 1 << 3;
    /// Register select field.
    pub const RS: u64 = Self::RS3 | Self::RS2 | Self::RS1 | Self::RS0;

    /// Lowest data bus bit.
    pub const D0: u64 = 1 << 16;
    /// Data bus field.
    pub const DATA: u64 = 0xFF << 16;

    /// Read/write: set for a read, clear for a write. Same bit as the 6502.
    pub const RW: u64 = 1 << 24;
    /// Interrupt request output. Same bit as the 6502 IRQ input.
    pub const IRQ: u64 = 1 << 26;

    pub const CS: u64 = 1 << 40;
    pub const FLAG: u64 = 1 << 41;
    pub const PC: u64 = 1 << 42;
    pub const SP: u64 = 1 << 43;
    pub const TOD: u64 = 1 << 44;
    pub const CNT: u64 = 1 << 45;

    /// Port A pin field.
    pub const PA: u64 = 0xFF << 48;
    /// Port B pin field.
    pub const PB: u64 = 0xFF << 56;

    const DATA_SHIFT: u32 = 16;
    const PA_SHIFT: u32 = 48;
    const PB_SHIFT: u32 = 56;

    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// A chip-selected read of register `addr`.
    #[must_use]
    pub const fn read(addr: u8) -> Self {
        Self(Self::CS | Self::RW).with_addr(addr)
    }

    /// A chip-selected write of `data` to register `addr`.
    #[must_use]
    pub const fn write(addr: u8, data: u8) -> Self {
        Self(Self::CS).with_addr(addr).with_data(data)
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn contains(self, mask: u64) -> bool {
        self.0 & mask == mask
    }

    #[must_use]
    pub const fn with(self, mask: u64) -> Self {
        Self(self.0 | mask)
    }

    #[must_use]
    pub const fn without(self, mask: u64) -> Self {
        Self(self.0 & !mask)
    }

    /// Set or clear `mask` depending on `on`.
    #[must_use]
    pub const fn with_bit(self, mask: u64, on: bool) -> Self {
        if on { self.with(mask) } else { self.without(mask) }
    }

    #[must_use]
    pub const fn cs(self) -> bool {
        self.contains(Self::CS)
    }

    /// True for a read transaction.
    #[must_use]
    pub const fn rw(self) -> bool {
        self.contains(Self::RW)
    }

    #[must_use]
    pub const fn irq(self) -> bool {
        self.contains(Self::IRQ)
    }

    /// 4-bit register select address.
    #[must_use]
    pub const fn addr(self) -> u8 {
        (self.0 & Self::RS) as u8
    }

    #[must_use]
    pub const fn with_addr(self, addr: u8) -> Self {
        Self((self.0 & !Self::RS) | (addr as u64 & Self::RS))
    }

    /// 8-bit data bus.
    #[must_use]
    pub const fn data(self) -> u8 {
        (self.0 >> Self::DATA_SHIFT) as u8
    }

    #[must_use]
    pub const fn with_data(self, data: u8) -> Self {
        Self((self.0 & !Self::DATA) | ((data as u64) << Self::DATA_SHIFT))
    }

    #[must_use]
    pub const fn port_a(self) -> u8 {
        (self.0 >> Self::PA_SHIFT) as u8
    }

    #[must_use]
    pub const fn with_port_a(self, data: u8) -> Self {
        Self((self.0 & !Self::PA) | ((data as u64) << Self::PA_SHIFT))
    }

    #[must_use]
    pub const fn port_b(self) -> u8 {
        (self.0 >> Self::PB_SHIFT) as u8
    }

    #[must_use]
    pub const fn with_port_b(self, data: u8) -> Self {
        Self((self.0 & !Self::PB) | ((data as u64) << Self::PB_SHIFT))
    }
}

impl From<u64> for Pins {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl From<Pins> for u64 {
    fn from(pins: Pins) -> Self {
        pins.0
    }
}

impl fmt::Debug for Pins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pins")
            .field("cs", &self.cs())
            .field("rw", &self.rw())
            .field("addr", &format_args!("{:#03X}", self.addr()))
            .field("data", &format_args!("{:#04X}", self.data()))
            .field("irq", &self.irq())
            .finish_non_exhaustive()
    }
}

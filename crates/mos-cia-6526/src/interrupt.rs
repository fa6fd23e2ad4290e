//! Interrupt control register (ICR).
//!
//! Writes go to the mask: bit 7 selects whether the remaining set bits are
//! set (1) or cleared (0). Reads return the pending sources plus bit 7 when
//! any of them was enabled, and clear everything. The IRQ line stays
//! asserted until that read, whatever happens to the mask meanwhile.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bit 7 of the pending register: an enabled source is active.
pub const ICR_IR: u8 = 0x80;

/// Interrupt sources, by ICR bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum InterruptSource {
    TimerA = 0x01,
    TimerB = 0x02,
    /// TOD alarm. Never raised, the TOD clock is not emulated.
    TodAlarm = 0x04,
    /// Serial port. Never raised, the shift register is not emulated.
    Serial = 0x08,
    /// FLAG pin edge. Never raised, handshaking is not emulated.
    Flag = 0x10,
}

impl InterruptSource {
    #[must_use]
    pub const fn bit(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct InterruptControl {
    pub(crate) mask: u8,
    pub(crate) pending: u8,
    pub(crate) irq: bool,
}

impl InterruptControl {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn write_mask(&mut self, value: u8) {
        if value & ICR_IR != 0 {
            self.mask |= value & !ICR_IR;
        } else {
            self.mask &= !value;
        }
        self.update();
    }

    pub(crate) fn signal(&mut self, source: InterruptSource) {
        self.pending |= source.bit();
        self.update();
    }

    pub(crate) fn read_and_clear(&mut self) -> u8 {
        let value = self.pending;
        self.pending = 0;
        self.irq = false;
        value
    }

    pub(crate) fn irq_active(&self) -> bool {
        self.irq
    }

    /// Assert IRQ if an enabled source is pending. Only an ICR read
    /// deasserts it.
    fn update(&mut self) {
        if self.pending & self.mask & !ICR_IR != 0 {
            self.irq = true;
            self.pending |= ICR_IR;
        }
    }
}

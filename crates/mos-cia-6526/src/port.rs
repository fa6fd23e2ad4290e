//! Peripheral ports A and B.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Selects one of the two 8-bit ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PortId {
    A,
    B,
}

/// Host side of the port pins.
///
/// `input` is called whenever the CPU reads a port data register and must
/// return the levels the outside world drives onto the pins. `output` is
/// called when the level the chip presents on a port changes; redundant
/// writes never reach it.
///
/// Both calls happen synchronously inside [`crate::Cia6526::iorq`] or
/// [`crate::Cia6526::tick`]. They must not block.
pub trait PortIo {
    fn input(&mut self, port: PortId) -> u8;
    fn output(&mut self, port: PortId, data: u8);
}

impl<T: PortIo + ?Sized> PortIo for &mut T {
    fn input(&mut self, port: PortId) -> u8 {
        (**self).input(port)
    }

    fn output(&mut self, port: PortId, data: u8) {
        (**self).output(port, data);
    }
}

impl<T: PortIo + ?Sized> PortIo for Box<T> {
    fn input(&mut self, port: PortId) -> u8 {
        (**self).input(port)
    }

    fn output(&mut self, port: PortId, data: u8) {
        (**self).output(port, data);
    }
}

/// Unconnected ports: every input line is pulled high, output is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenBus;

impl PortIo for OpenBus {
    fn input(&mut self, _port: PortId) -> u8 {
        0xFF
    }

    fn output(&mut self, _port: PortId, _data: u8) {}
}

/// Register state of one port.
#[derive(Debug, Clone)]
pub(crate) struct Port {
    /// Peripheral data register (PRA/PRB).
    pub(crate) data: u8,
    /// Data direction register (1 = output).
    pub(crate) ddr: u8,
    /// Host levels sampled by the last data register read.
    pub(crate) input: u8,
    /// Last value handed to [`PortIo::output`].
    pub(crate) output: u8,
}

impl Port {
    pub(crate) fn new() -> Self {
        Self {
            data: 0,
            ddr: 0,
            input: 0,
            output: 0xFF,
        }
    }

    /// Level presented on the pins: driven bits from the data register,
    /// the rest from the last sampled input.
    pub(crate) fn output_value(&self) -> u8 {
        (self.data & self.ddr) | (self.input & !self.ddr)
    }

    /// Sample `input` and return the value a data register read sees.
    ///
    /// With every pin configured as output the external lines still pull
    /// driven bits low (wired-AND), so the result is `input & data`.
    pub(crate) fn sample(&mut self, input: u8) -> u8 {
        self.input = input;
        if self.ddr == 0xFF {
            input & self.data
        } else {
            (input & !self.ddr) | (self.data & self.ddr)
        }
    }

    /// Record `value` as presented. Returns it if it differs from the
    /// previously presented value.
    pub(crate) fn present(&mut self, value: u8) -> Option<u8> {
        if value == self.output {
            None
        } else {
            self.output = value;
            Some(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mixes_driven_and_sampled_bits() {
        let mut port = Port::new();
        port.data = 0xAB;
        port.ddr = 0x0F;
        port.input = 0xC0;
        assert_eq!(port.output_value(), 0xCB);
    }

    #[test]
    fn sample_with_mixed_direction() {
        let mut port = Port::new();
        port.data = 0xAB;
        port.ddr = 0x0F;
        assert_eq!(port.sample(0xC0), 0xCB);
        assert_eq!(port.input, 0xC0);
    }

    #[test]
    fn sample_with_all_outputs_is_wired_and() {
        let mut port = Port::new();
        port.data = 0xF0;
        port.ddr = 0xFF;
        assert_eq!(port.sample(0xFF), 0xF0);
        assert_eq!(port.sample(0x3C), 0x30);
    }

    #[test]
    fn present_reports_changes_only() {
        let mut port = Port::new();
        assert_eq!(port.present(0xFF), None);
        assert_eq!(port.present(0x12), Some(0x12));
        assert_eq!(port.present(0x12), None);
    }

    #[test]
    fn open_bus_pulls_high() {
        let mut io = OpenBus;
        assert_eq!(io.input(PortId::A), 0xFF);
        assert_eq!(io.input(PortId::B), 0xFF);
    }
}

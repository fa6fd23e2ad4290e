//! Side-effect free register snapshot.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::port::Port;
use crate::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortState {
    pub data: u8,
    pub ddr: u8,
    /// Host levels sampled by the last data register read.
    pub input: u8,
    /// Last value presented to the host.
    pub output: u8,
}

impl PortState {
    pub(crate) fn of(port: &Port) -> Self {
        Self {
            data: port.data,
            ddr: port.ddr,
            input: port.input,
            output: port.output,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimerState {
    pub counter: u16,
    pub latch: u16,
    pub control: u8,
    pub toggle: bool,
    pub pulse: bool,
}

impl From<&Timer> for TimerState {
    fn from(timer: &Timer) -> Self {
        Self {
            counter: timer.counter,
            latch: timer.latch,
            control: timer.control,
            toggle: timer.toggle,
            pulse: timer.pulse,
        }
    }
}

/// Everything a [`crate::Cia6526`] holds apart from its host connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CiaState {
    pub port_a: PortState,
    pub port_b: PortState,
    pub timer_a: TimerState,
    pub timer_b: TimerState,
    pub icr_mask: u8,
    pub icr_pending: u8,
    pub irq: bool,
}

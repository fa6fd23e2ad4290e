//! Interval timers A and B.
//!
//! Each timer is a 16-bit down-counter with a reload latch. The control
//! register selects the count source, one-shot or continuous operation,
//! and whether the timer drives a port B pin (PB6 for A, PB7 for B).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// CRA/CRB bit 0: timer running.
pub const CR_START: u8 = 0x01;
/// CRA/CRB bit 1: timer output appears on PB6 (A) or PB7 (B).
pub const CR_PBON: u8 = 0x02;
/// CRA/CRB bit 2: toggle (1) or pulse (0) output.
pub const CR_OUTMODE: u8 = 0x04;
/// CRA/CRB bit 3: one-shot (1) or continuous (0).
pub const CR_RUNMODE: u8 = 0x08;
/// CRA/CRB bit 4: force load strobe. Never stored.
pub const CR_FORCE_LOAD: u8 = 0x10;
/// CRA bit 5: count CNT transitions instead of clock ticks.
pub const CRA_INMODE: u8 = 0x20;
/// CRB bits 5-6: count source.
pub const CRB_INMODE: u8 = 0x60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimerId {
    A,
    B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RunMode {
    /// Reload and keep counting after underflow.
    Continuous,
    /// Reload and stop after underflow.
    OneShot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputMode {
    /// Port pin high for the cycle of an underflow.
    Pulse,
    /// Port pin inverts on every underflow.
    Toggle,
}

/// What a timer counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InputMode {
    /// System clock ticks.
    Clock,
    /// Positive CNT pin transitions. Not emulated.
    Cnt,
    /// Timer A underflows (timer B only).
    TimerA,
    /// Timer A underflows while CNT is high (timer B only). Not emulated.
    TimerAGated,
}

impl InputMode {
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Clock | Self::TimerA)
    }
}

/// One interval timer.
#[derive(Debug, Clone)]
pub struct Timer {
    id: TimerId,
    pub(crate) counter: u16,
    pub(crate) latch: u16,
    /// Control register, force-load bit always clear.
    pub(crate) control: u8,
    /// Toggle output. Primed to 1 whenever the timer is started.
    pub(crate) toggle: bool,
    /// Pulse output. Set on underflow, cleared at the start of the next tick.
    pub(crate) pulse: bool,
}

impl Timer {
    pub(crate) fn new(id: TimerId) -> Self {
        Self {
            id,
            counter: 0,
            latch: 0xFFFF,
            control: 0,
            toggle: false,
            pulse: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> TimerId {
        self.id
    }

    #[must_use]
    pub fn counter(&self) -> u16 {
        self.counter
    }

    #[must_use]
    pub fn latch(&self) -> u16 {
        self.latch
    }

    #[must_use]
    pub fn control(&self) -> u8 {
        self.control
    }

    #[must_use]
    pub fn running(&self) -> bool {
        self.control & CR_START != 0
    }

    #[must_use]
    pub fn toggle(&self) -> bool {
        self.toggle
    }

    #[must_use]
    pub fn pulse(&self) -> bool {
        self.pulse
    }

    #[must_use]
    pub fn port_output_enabled(&self) -> bool {
        self.control & CR_PBON != 0
    }

    #[must_use]
    pub fn run_mode(&self) -> RunMode {
        if self.control & CR_RUNMODE != 0 {
            RunMode::OneShot
        } else {
            RunMode::Continuous
        }
    }

    #[must_use]
    pub fn output_mode(&self) -> OutputMode {
        if self.control & CR_OUTMODE != 0 {
            OutputMode::Toggle
        } else {
            OutputMode::Pulse
        }
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        match self.id {
            TimerId::A => {
                if self.control & CRA_INMODE != 0 {
                    InputMode::Cnt
                } else {
                    InputMode::Clock
                }
            }
            TimerId::B => match (self.control & CRB_INMODE) >> 5 {
                0 => InputMode::Clock,
                1 => InputMode::Cnt,
                2 => InputMode::TimerA,
                _ => InputMode::TimerAGated,
            },
        }
    }

    /// Level the timer drives onto its port B pin, if enabled.
    #[must_use]
    pub fn port_output(&self) -> Option<bool> {
        if !self.port_output_enabled() {
            return None;
        }
        Some(match self.output_mode() {
            OutputMode::Toggle => self.toggle,
            OutputMode::Pulse => self.pulse,
        })
    }

    pub(crate) fn write_latch_lo(&mut self, value: u8) {
        self.latch = (self.latch & 0xFF00) | u16::from(value);
        if !self.running() {
            self.counter = (self.counter & 0xFF00) | u16::from(value);
        }
    }

    /// Returns true if the write arms a one-shot timer. The caller then
    /// sets the start bit through the normal control register path.
    pub(crate) fn write_latch_hi(&mut self, value: u8) -> bool {
        self.latch = (self.latch & 0x00FF) | (u16::from(value) << 8);
        if !self.running() {
            self.counter = (self.counter & 0x00FF) | (u16::from(value) << 8);
        }
        if self.run_mode() == RunMode::OneShot {
            self.counter = self.latch;
            return true;
        }
        false
    }

    pub(crate) fn write_control(&mut self, mut value: u8) {
        if !self.running() && value & CR_START != 0 {
            self.toggle = true;
        }
        if value & CR_FORCE_LOAD != 0 {
            self.counter = self.latch;
            value &= !CR_FORCE_LOAD;
        }
        self.control = value;
    }

    /// Count one event. Returns true on underflow.
    pub(crate) fn count(&mut self) -> bool {
        self.counter = self.counter.saturating_sub(1);
        if self.counter != 0 {
            return false;
        }
        self.pulse = true;
        self.toggle = !self.toggle;
        self.counter = self.latch;
        if self.run_mode() == RunMode::OneShot {
            self.control &= !CR_START;
        }
        true
    }

    /// True if the timer decrements on every clock tick.
    pub(crate) fn counts_clock(&self) -> bool {
        self.running() && self.input_mode() == InputMode::Clock
    }

    /// Clock ticks that can elapse without an underflow.
    pub(crate) fn quiet_ticks(&self) -> u64 {
        u64::from(self.counter.saturating_sub(1))
    }

    /// Advance by `ticks` clock ticks known not to reach zero.
    pub(crate) fn skip(&mut self, ticks: u64) {
        debug_assert!(ticks <= self.quiet_ticks());
        self.counter -= ticks as u16;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new(self.id);
    }
}

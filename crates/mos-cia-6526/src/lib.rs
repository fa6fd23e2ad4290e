//! MOS 6526 Complex Interface Adapter (CIA).
//!
//! Two 8-bit I/O ports, two 16-bit interval timers and an interrupt
//! controller, driven through a 64-bit [`Pins`] word. [`Cia6526::iorq`]
//! performs a register access when CS is set; [`Cia6526::tick`] advances the
//! timers by one clock and drives the IRQ pin.
//!
//! # Registers
//!
//! | Reg | Read                       | Write                              |
//! |-----|----------------------------|------------------------------------|
//! | $0  | Port A pins                | Port A data                        |
//! | $1  | Port B pins (+ PB6/PB7 timer outputs) | Port B data             |
//! | $2  | Port A DDR                 | Port A DDR                         |
//! | $3  | Port B DDR                 | Port B DDR                         |
//! | $4  | Timer A counter low        | Timer A latch low                  |
//! | $5  | Timer A counter high       | Timer A latch high (arms one-shot) |
//! | $6  | Timer B counter low        | Timer B latch low                  |
//! | $7  | Timer B counter high       | Timer B latch high (arms one-shot) |
//! | $8-$C | $FF (TOD, SDR)           | ignored                            |
//! | $D  | ICR pending (read/clear)   | ICR mask (bit 7 = set/clear)       |
//! | $E  | Control register A         | Control register A                 |
//! | $F  | Control register B         | Control register B                 |
//!
//! # Not emulated
//!
//! - time-of-day clock
//! - serial port
//! - FLAG/PC handshake
//! - counting CNT pin transitions (reported as [`CiaError::UnsupportedInputMode`])
//! - the one to two cycle delay between register writes and their effect
//!   on counters and interrupts

mod error;
mod interrupt;
mod pins;
mod port;
mod register;
mod state;
mod timer;

pub use error::CiaError;
pub use interrupt::{ICR_IR, InterruptSource};
pub use pins::Pins;
pub use port::{OpenBus, PortId, PortIo};
pub use register::Register;
pub use state::{CiaState, PortState, TimerState};
pub use timer::{
    CR_FORCE_LOAD, CR_OUTMODE, CR_PBON, CR_RUNMODE, CR_START, CRA_INMODE, CRB_INMODE, InputMode,
    OutputMode, RunMode, Timer, TimerId,
};

use log::{Level, debug, log_enabled, trace, warn};

use interrupt::InterruptControl;
use port::Port;

const PB6: u8 = 1 << 6;
const PB7: u8 = 1 << 7;

/// MOS 6526 Complex Interface Adapter.
pub struct Cia6526<P: PortIo> {
    /// Name used in log records, e.g. "CIA1".
    label: &'static str,
    io: P,

    port_a: Port,
    port_b: Port,

    timer_a: Timer,
    timer_b: Timer,

    icr: InterruptControl,
}

impl<P: PortIo> Cia6526<P> {
    /// Create a CIA in its power-on state, connected to `io`.
    #[must_use]
    pub fn new(label: &'static str, io: P) -> Self {
        Self {
            label,
            io,
            port_a: Port::new(),
            port_b: Port::new(),
            timer_a: Timer::new(TimerId::A),
            timer_b: Timer::new(TimerId::B),
            icr: InterruptControl::new(),
        }
    }

    /// Hardware reset. The host connection is kept and not notified.
    pub fn reset(&mut self) {
        self.port_a = Port::new();
        self.port_b = Port::new();
        self.timer_a.reset();
        self.timer_b.reset();
        self.icr = InterruptControl::new();
        debug!(target: "cia", "{}: reset", self.label);
    }

    /// Perform a register access if CS is set.
    ///
    /// For a read (RW set) the register value is merged into the data bus
    /// bits of the returned pins. The IRQ and PA/PB pins of the result
    /// reflect the chip state after the access.
    pub fn iorq(&mut self, pins: Pins) -> Pins {
        if !pins.cs() {
            return pins;
        }
        let reg = Register::from_addr(pins.addr());
        let pins = if pins.rw() {
            let value = self.read_register(reg);
            if log_enabled!(target: "cia::reg", Level::Trace) {
                trace!(target: "cia::reg", "{}: read {:?} = {value:#04X}", self.label, reg);
            }
            pins.with_data(value)
        } else {
            let value = pins.data();
            if log_enabled!(target: "cia::reg", Level::Trace) {
                trace!(target: "cia::reg", "{}: write {:?} = {value:#04X}", self.label, reg);
            }
            self.write_register(reg, value);
            pins
        };
        self.drive_pins(pins)
    }

    /// Advance the timers by one clock tick and drive the IRQ and port pins.
    ///
    /// Fails without changing any state if a running timer counts a source
    /// that is not emulated.
    pub fn tick(&mut self, pins: Pins) -> Result<Pins, CiaError> {
        self.check_input_modes()?;

        let pulse_ended = self.timer_a.pulse || self.timer_b.pulse;
        self.timer_a.pulse = false;
        self.timer_b.pulse = false;

        let ta_underflow = self.timer_a.counts_clock() && self.timer_a.count();
        let tb_counts = match self.timer_b.input_mode() {
            InputMode::Clock => true,
            InputMode::TimerA => ta_underflow,
            InputMode::Cnt | InputMode::TimerAGated => false,
        };
        let tb_underflow = self.timer_b.running() && tb_counts && self.timer_b.count();

        if ta_underflow {
            self.icr.signal(InterruptSource::TimerA);
        }
        if tb_underflow {
            self.icr.signal(InterruptSource::TimerB);
        }
        if (pulse_ended || ta_underflow || tb_underflow)
            && (self.timer_a.port_output_enabled() || self.timer_b.port_output_enabled())
        {
            self.update_port_b();
        }

        Ok(self.drive_pins(pins))
    }

    /// Advance by `count` clock ticks.
    ///
    /// Produces exactly the same state, pins and host output calls as
    /// `count` calls to [`Self::tick`]. Stretches in which no timer can
    /// underflow are skipped in one step.
    pub fn tick_n(&mut self, mut pins: Pins, count: u64) -> Result<Pins, CiaError> {
        let mut remaining = count;
        while remaining > 0 {
            let quiet = self.quiet_ticks().min(remaining);
            if quiet == 0 {
                pins = self.tick(pins)?;
                remaining -= 1;
                continue;
            }
            if self.timer_a.counts_clock() {
                self.timer_a.skip(quiet);
            }
            if self.timer_b.counts_clock() {
                self.timer_b.skip(quiet);
            }
            pins = self.drive_pins(pins);
            remaining -= quiet;
        }
        Ok(pins)
    }

    /// Output pins: IRQ from the interrupt controller, PA/PB from the
    /// values last presented on the ports.
    fn drive_pins(&self, pins: Pins) -> Pins {
        pins.with_bit(Pins::IRQ, self.icr.irq_active())
            .with_port_a(self.port_a.output)
            .with_port_b(self.port_b.output)
    }

    /// Ticks that would only decrement counters: no underflow, no pulse to
    /// end, no error to report.
    fn quiet_ticks(&self) -> u64 {
        if self.timer_a.pulse || self.timer_b.pulse || self.check_input_modes().is_err() {
            return 0;
        }
        let mut quiet = u64::MAX;
        if self.timer_a.counts_clock() {
            quiet = quiet.min(self.timer_a.quiet_ticks());
        }
        if self.timer_b.counts_clock() {
            quiet = quiet.min(self.timer_b.quiet_ticks());
        }
        quiet
    }

    fn check_input_modes(&self) -> Result<(), CiaError> {
        for timer in [&self.timer_a, &self.timer_b] {
            let mode = timer.input_mode();
            if timer.running() && !mode.is_supported() {
                return Err(CiaError::UnsupportedInputMode {
                    label: self.label,
                    timer: timer.id(),
                    mode,
                });
            }
        }
        Ok(())
    }

    fn read_register(&mut self, reg: Register) -> u8 {
        match reg {
            Register::Pra => {
                let input = self.io.input(PortId::A);
                self.port_a.sample(input)
            }
            Register::Prb => {
                let input = self.io.input(PortId::B);
                let value = self.port_b.sample(input);
                self.timer_outputs(value)
            }
            Register::Ddra => self.port_a.ddr,
            Register::Ddrb => self.port_b.ddr,
            Register::TaLo => self.timer_a.counter as u8,
            Register::TaHi => (self.timer_a.counter >> 8) as u8,
            Register::TbLo => self.timer_b.counter as u8,
            Register::TbHi => (self.timer_b.counter >> 8) as u8,
            Register::Icr => self.icr.read_and_clear(),
            Register::Cra => self.timer_a.control,
            Register::Crb => self.timer_b.control,
            reg => {
                debug_assert!(reg.is_reserved());
                debug!(target: "cia", "{}: read of unemulated register {:?}", self.label, reg);
                0xFF
            }
        }
    }

    fn write_register(&mut self, reg: Register, value: u8) {
        match reg {
            Register::Pra => {
                self.port_a.data = value;
                self.update_port_a();
            }
            Register::Prb => {
                self.port_b.data = value;
                self.update_port_b();
            }
            Register::Ddra => {
                self.port_a.ddr = value;
                self.update_port_a();
            }
            Register::Ddrb => {
                self.port_b.ddr = value;
                self.update_port_b();
            }
            Register::TaLo => self.timer_a.write_latch_lo(value),
            Register::TaHi => {
                if self.timer_a.write_latch_hi(value) {
                    self.write_control(TimerId::A, self.timer_a.control | CR_START);
                }
            }
            Register::TbLo => self.timer_b.write_latch_lo(value),
            Register::TbHi => {
                if self.timer_b.write_latch_hi(value) {
                    self.write_control(TimerId::B, self.timer_b.control | CR_START);
                }
            }
            Register::Icr => self.icr.write_mask(value),
            Register::Cra => self.write_control(TimerId::A, value),
            Register::Crb => self.write_control(TimerId::B, value),
            reg => {
                debug_assert!(reg.is_reserved());
                debug!(
                    target: "cia",
                    "{}: write {value:#04X} to unemulated register {:?} ignored",
                    self.label,
                    reg
                );
            }
        }
    }

    fn write_control(&mut self, id: TimerId, value: u8) {
        let timer = match id {
            TimerId::A => &mut self.timer_a,
            TimerId::B => &mut self.timer_b,
        };
        timer.write_control(value);
        if timer.running() && !timer.input_mode().is_supported() {
            warn!(
                target: "cia",
                "{}: timer {:?} started with unsupported input mode {:?}",
                self.label,
                id,
                timer.input_mode()
            );
        }
        self.update_port_b();
    }

    /// Overlay the PB6/PB7 timer outputs onto a port B value.
    fn timer_outputs(&self, mut value: u8) -> u8 {
        if let Some(level) = self.timer_a.port_output() {
            value = (value & !PB6) | if level { PB6 } else { 0 };
        }
        if let Some(level) = self.timer_b.port_output() {
            value = (value & !PB7) | if level { PB7 } else { 0 };
        }
        value
    }

    fn update_port_a(&mut self) {
        let value = self.port_a.output_value();
        if let Some(value) = self.port_a.present(value) {
            self.io.output(PortId::A, value);
        }
    }

    fn update_port_b(&mut self) {
        let value = self.timer_outputs(self.port_b.output_value());
        if let Some(value) = self.port_b.present(value) {
            self.io.output(PortId::B, value);
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The host connection.
    #[must_use]
    pub fn io(&self) -> &P {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut P {
        &mut self.io
    }

    #[must_use]
    pub fn timer(&self, id: TimerId) -> &Timer {
        match id {
            TimerId::A => &self.timer_a,
            TimerId::B => &self.timer_b,
        }
    }

    /// Snapshot of all registers. Does not touch the host or clear the ICR.
    #[must_use]
    pub fn state(&self) -> CiaState {
        CiaState {
            port_a: PortState::of(&self.port_a),
            port_b: PortState::of(&self.port_b),
            timer_a: TimerState::from(&self.timer_a),
            timer_b: TimerState::from(&self.timer_b),
            icr_mask: self.icr.mask,
            icr_pending: self.icr.pending,
            irq: self.icr.irq_active(),
        }
    }

    #[must_use]
    pub fn irq_active(&self) -> bool {
        self.icr.irq_active()
    }

    // Diagnostic accessors

    #[must_use]
    pub fn timer_a(&self) -> u16 {
        self.timer_a.counter
    }

    #[must_use]
    pub fn timer_b(&self) -> u16 {
        self.timer_b.counter
    }

    #[must_use]
    pub fn icr_status(&self) -> u8 {
        self.icr.pending
    }

    #[must_use]
    pub fn icr_mask(&self) -> u8 {
        self.icr.mask
    }

    #[must_use]
    pub fn cra(&self) -> u8 {
        self.timer_a.control
    }

    #[must_use]
    pub fn crb(&self) -> u8 {
        self.timer_b.control
    }

    /// Last value presented on a port.
    #[must_use]
    pub fn port_output(&self, port: PortId) -> u8 {
        match port {
            PortId::A => self.port_a.output,
            PortId::B => self.port_b.output,
        }
    }
}

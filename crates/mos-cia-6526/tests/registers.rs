//! Register-level behaviour, driven only through pin transactions.

use mos_cia_6526::{
    CR_FORCE_LOAD, CR_OUTMODE, CR_PBON, CR_RUNMODE, CR_START, Cia6526, OpenBus, Pins, PortId,
    PortIo, TimerId,
};

const PRB: u8 = 0x01;
const DDRB: u8 = 0x03;
const TALO: u8 = 0x04;
const TAHI: u8 = 0x05;
const TBLO: u8 = 0x06;
const TBHI: u8 = 0x07;
const ICR: u8 = 0x0D;
const CRA: u8 = 0x0E;
const CRB: u8 = 0x0F;

#[derive(Default)]
struct Recorder {
    input_b: u8,
    outputs: Vec<(PortId, u8)>,
}

impl PortIo for Recorder {
    fn input(&mut self, port: PortId) -> u8 {
        match port {
            PortId::A => 0xFF,
            PortId::B => self.input_b,
        }
    }

    fn output(&mut self, port: PortId, data: u8) {
        self.outputs.push((port, data));
    }
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write<P: PortIo>(cia: &mut Cia6526<P>, reg: u8, value: u8) {
    cia.iorq(Pins::write(reg, value));
}

fn read<P: PortIo>(cia: &mut Cia6526<P>, reg: u8) -> u8 {
    cia.iorq(Pins::read(reg)).data()
}

fn ticks<P: PortIo>(cia: &mut Cia6526<P>, count: u64) -> Pins {
    cia.tick_n(Pins::new(), count).unwrap()
}

#[test]
fn end_to_end_timer_a_underflow() {
    init_logging();
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, TALO, 0x10);
    write(&mut cia, TAHI, 0x00);
    assert_eq!(read(&mut cia, TALO), 0x10);
    write(&mut cia, CRA, CR_START);

    ticks(&mut cia, 0x10);

    assert_eq!(read(&mut cia, ICR), 0x01);
    assert_eq!(read(&mut cia, TALO), 0x10);
    assert_eq!(read(&mut cia, TAHI), 0x00);
}

#[test]
fn latch_writes_reach_stopped_counter_without_ticks() {
    let mut cia = Cia6526::new("CIA2", OpenBus);
    write(&mut cia, TBLO, 0xCD);
    assert_eq!(read(&mut cia, TBLO), 0xCD);
    write(&mut cia, TBHI, 0xAB);
    assert_eq!(read(&mut cia, TBHI), 0xAB);
    assert_eq!(cia.timer_b(), 0xABCD);
}

#[test]
fn latch_writes_leave_running_counter_alone() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, TALO, 0x00);
    write(&mut cia, TAHI, 0x10);
    write(&mut cia, CRA, CR_START);
    ticks(&mut cia, 0x100);
    write(&mut cia, TALO, 0x34);
    write(&mut cia, TAHI, 0x12);
    assert_eq!(cia.timer_a(), 0x0F00);
    assert_eq!(cia.timer(TimerId::A).latch(), 0x1234);
}

#[test]
fn toggle_returns_after_two_underflows() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, TALO, 0x04);
    write(&mut cia, TAHI, 0x00);
    write(&mut cia, CRA, CR_START | CR_OUTMODE);
    assert!(cia.timer(TimerId::A).toggle());

    ticks(&mut cia, 4);
    assert!(!cia.timer(TimerId::A).toggle());
    ticks(&mut cia, 4);
    assert!(cia.timer(TimerId::A).toggle());
    ticks(&mut cia, 4);
    assert!(!cia.timer(TimerId::A).toggle());
    ticks(&mut cia, 8);
    assert!(!cia.timer(TimerId::A).toggle());
}

#[test]
fn one_shot_parks_at_latch() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, CRB, CR_RUNMODE);
    write(&mut cia, TBLO, 0x03);
    write(&mut cia, TBHI, 0x00);
    assert_eq!(read(&mut cia, CRB), CR_RUNMODE | CR_START);

    ticks(&mut cia, 2);
    assert!(cia.timer(TimerId::B).running());
    ticks(&mut cia, 1);
    assert!(!cia.timer(TimerId::B).running());
    assert_eq!(read(&mut cia, CRB), CR_RUNMODE);

    ticks(&mut cia, 1000);
    assert_eq!(cia.timer_b(), 0x0003);
    assert_eq!(read(&mut cia, ICR), 0x02);
}

#[test]
fn one_shot_restarts_from_control_register() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, CRA, CR_RUNMODE);
    write(&mut cia, TALO, 0x02);
    write(&mut cia, TAHI, 0x00);
    ticks(&mut cia, 10);
    assert_eq!(read(&mut cia, ICR), 0x01);

    write(&mut cia, CRA, CR_RUNMODE | CR_START);
    ticks(&mut cia, 2);
    assert_eq!(read(&mut cia, ICR), 0x01);
}

#[test]
fn both_timers_collapse_into_one_snapshot() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, ICR, 0x81);
    write(&mut cia, ICR, 0x82);
    assert_eq!(cia.icr_mask(), 0x03);

    write(&mut cia, TALO, 0x05);
    write(&mut cia, TAHI, 0x00);
    write(&mut cia, TBLO, 0x07);
    write(&mut cia, TBHI, 0x00);
    write(&mut cia, CRA, CR_START);
    write(&mut cia, CRB, CR_START);

    let pins = ticks(&mut cia, 40);
    assert!(pins.irq());

    let pins = cia.iorq(Pins::read(ICR));
    assert_eq!(pins.data(), 0x83);
    assert!(!pins.irq());
    let pins = cia.iorq(Pins::read(ICR));
    assert_eq!(pins.data(), 0x00);
    assert!(!cia.irq_active());
}

#[test]
fn masked_out_underflow_sets_status_without_irq() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, TALO, 0x01);
    write(&mut cia, TAHI, 0x00);
    write(&mut cia, CRA, CR_START);
    let pins = ticks(&mut cia, 1);
    assert!(!pins.irq());
    assert_eq!(read(&mut cia, ICR), 0x01);
}

#[test]
fn disabling_mask_leaves_raised_irq_until_icr_read() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, ICR, 0x81);
    write(&mut cia, TALO, 0x01);
    write(&mut cia, TAHI, 0x00);
    write(&mut cia, CRA, CR_START);
    assert!(ticks(&mut cia, 1).irq());

    let pins = cia.iorq(Pins::write(ICR, 0x01));
    assert!(pins.irq());
    assert!(cia.irq_active());

    let pins = cia.iorq(Pins::read(ICR));
    assert_eq!(pins.data(), 0x81);
    assert!(!pins.irq());
}

#[test]
fn force_load_strobe() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, TALO, 0x00);
    write(&mut cia, TAHI, 0x20);
    write(&mut cia, CRA, CR_START);
    ticks(&mut cia, 0x80);
    assert_eq!(cia.timer_a(), 0x1F80);

    write(&mut cia, CRA, CR_START | CR_FORCE_LOAD);
    assert_eq!(cia.timer_a(), 0x2000);
    assert_eq!(read(&mut cia, CRA), CR_START);
    ticks(&mut cia, 1);
    assert_eq!(cia.timer_a(), 0x1FFF);
}

#[test]
fn identical_port_writes_notify_once() {
    let mut cia = Cia6526::new("CIA1", Recorder::default());
    write(&mut cia, DDRB, 0xFF);
    cia.io_mut().outputs.clear();

    write(&mut cia, PRB, 0x3C);
    write(&mut cia, PRB, 0x3C);
    assert_eq!(cia.io().outputs, vec![(PortId::B, 0x3C)]);
}

#[test]
fn input_bits_come_from_host() {
    let mut cia = Cia6526::new("CIA1", Recorder::default());
    write(&mut cia, DDRB, 0x0F);
    write(&mut cia, PRB, 0xA5);
    cia.io_mut().input_b = 0x90;
    assert_eq!(read(&mut cia, PRB), 0x95);
    assert_eq!(read(&mut cia, DDRB), 0x0F);
}

#[test]
fn timer_a_pulse_on_pb6() {
    let mut cia = Cia6526::new("CIA1", Recorder::default());
    write(&mut cia, TALO, 0x03);
    write(&mut cia, TAHI, 0x00);
    write(&mut cia, CRA, CR_START | CR_PBON);
    cia.io_mut().outputs.clear();

    ticks(&mut cia, 2);
    assert_eq!(read(&mut cia, PRB) & 0x40, 0x00);
    ticks(&mut cia, 1);
    assert_eq!(read(&mut cia, PRB) & 0x40, 0x40);
    ticks(&mut cia, 1);
    assert_eq!(read(&mut cia, PRB) & 0x40, 0x00);

    assert_eq!(cia.io().outputs, vec![(PortId::B, 0x40), (PortId::B, 0x00)]);
}

#[test]
fn port_pins_follow_presented_values() {
    let mut cia = Cia6526::new("CIA1", Recorder::default());
    cia.iorq(Pins::write(0x02, 0xFF));
    let pins = cia.iorq(Pins::write(0x00, 0x42));
    assert_eq!(pins.port_a(), 0x42);

    write(&mut cia, DDRB, 0xFF);
    let pins = cia.iorq(Pins::write(PRB, 0x3C));
    assert_eq!(pins.port_b(), 0x3C);
    // A read of another register still reports the port levels.
    assert_eq!(cia.iorq(Pins::read(CRA)).port_a(), 0x42);
}

#[test]
fn pb6_pulse_shows_on_tick_pins() {
    let mut cia = Cia6526::new("CIA1", Recorder::default());
    write(&mut cia, TALO, 0x02);
    write(&mut cia, TAHI, 0x00);
    write(&mut cia, CRA, CR_START | CR_PBON);

    assert_eq!(cia.tick(Pins::new()).unwrap().port_b() & 0x40, 0x00);
    assert_eq!(cia.tick(Pins::new()).unwrap().port_b() & 0x40, 0x40);
    assert_eq!(cia.tick(Pins::new()).unwrap().port_b() & 0x40, 0x00);
}

#[test]
fn timer_b_toggle_on_pb7() {
    let mut cia = Cia6526::new("CIA1", Recorder::default());
    write(&mut cia, TBLO, 0x02);
    write(&mut cia, TBHI, 0x00);
    write(&mut cia, CRB, CR_START | CR_PBON | CR_OUTMODE);
    // Starting primes the toggle output high.
    assert_eq!(read(&mut cia, PRB) & 0x80, 0x80);

    ticks(&mut cia, 2);
    assert_eq!(read(&mut cia, PRB) & 0x80, 0x00);
    ticks(&mut cia, 2);
    assert_eq!(read(&mut cia, PRB) & 0x80, 0x80);
    assert_eq!(cia.port_output(PortId::B), 0x80);
}

#[test]
fn timer_b_counts_timer_a_underflows() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, ICR, 0x82);
    write(&mut cia, TALO, 0x0A);
    write(&mut cia, TAHI, 0x00);
    write(&mut cia, TBLO, 0x04);
    write(&mut cia, TBHI, 0x00);
    write(&mut cia, CRB, CR_START | 0x40);
    write(&mut cia, CRA, CR_START);

    let pins = ticks(&mut cia, 39);
    assert!(!pins.irq());
    assert_eq!(cia.timer_b(), 1);
    let pins = ticks(&mut cia, 1);
    assert!(pins.irq());
    assert_eq!(read(&mut cia, ICR), 0x83);
}

#[test]
fn unsupported_cnt_counting_is_reported() {
    init_logging();
    let mut cia = Cia6526::new("CIA2", OpenBus);
    write(&mut cia, CRB, CR_START | 0x60);
    let err = cia.tick(Pins::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "CIA2: timer B is running with unsupported input mode TimerAGated"
    );
}

#[test]
fn reset_keeps_host_and_restores_defaults() {
    let mut cia = Cia6526::new("CIA1", Recorder::default());
    write(&mut cia, DDRB, 0xFF);
    write(&mut cia, PRB, 0x12);
    write(&mut cia, ICR, 0x83);
    write(&mut cia, CRA, CR_START | CR_FORCE_LOAD);
    ticks(&mut cia, 0x20);

    cia.reset();
    assert_eq!(cia.timer(TimerId::A).latch(), 0xFFFF);
    assert_eq!(cia.timer_a(), 0);
    assert_eq!(cia.icr_mask(), 0);
    assert_eq!(cia.port_output(PortId::B), 0xFF);
    assert_eq!(read(&mut cia, CRA), 0);
    assert_eq!(cia.io().outputs.last(), Some(&(PortId::B, 0x12)));
}

#[test]
fn deselected_transaction_passes_through() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    let pins = Pins(0xDEAD_0000_BEEF_0000).with_addr(ICR).with(Pins::RW);
    assert_eq!(cia.iorq(pins), pins);
}

#[cfg(feature = "serde")]
#[test]
fn state_serializes() {
    let mut cia = Cia6526::new("CIA1", OpenBus);
    write(&mut cia, TALO, 0x42);
    let state = cia.state();
    let json = serde_json::to_string(&state).unwrap();
    let back: mos_cia_6526::CiaState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);
}

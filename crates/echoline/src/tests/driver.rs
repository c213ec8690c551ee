use crate::driver::EchoDriver;
use crate::service::{EchoService, LinkState};
use crate::sim::SimUart;
use crate::uart::UartDevice;

fn driver<const N: usize>() -> EchoDriver<SimUart, N> {
    let mut drv = EchoDriver::new(SimUart::new(), EchoService::new());
    drv.start();
    drv
}

#[test]
fn echoes_a_line_end_to_end() {
    let mut drv = driver::<64>();
    drv.device_mut().inject(b"Hi\r");

    drv.run_pending();
    assert_eq!(drv.state(), LinkState::Receiving);

    assert!(drv.poll());
    drv.run_pending();

    assert_eq!(drv.device().transmitted(), b"HI\r");
    assert_eq!(drv.state(), LinkState::Idle);
}

#[test]
fn run_until_idle_covers_the_whole_cycle() {
    let mut drv = driver::<64>();
    drv.device_mut().inject(b"abc\r");
    drv.run_until_idle();
    assert_eq!(drv.device().transmitted(), b"ABC\r");
}

#[test]
fn gated_interrupts_do_nothing() {
    let mut drv = EchoDriver::new(SimUart::new(), EchoService::<64>::new());
    drv.device_mut().inject(b"x\r");

    drv.run_pending();
    assert_eq!(drv.stats().bytes_received, 0);

    drv.start();
    drv.run_until_idle();
    assert_eq!(drv.device().transmitted(), b"X\r");

    drv.stop();
    drv.device_mut().inject(b"y\r");
    drv.run_pending();
    assert_eq!(drv.device().transmitted(), b"X\r");
}

#[test]
fn poll_without_a_line_raises_nothing() {
    let mut drv = driver::<64>();
    assert!(!drv.poll());
    assert!(!drv.device().tx_pending());
}

#[test]
fn overruns_are_counted_not_fatal() {
    let mut drv = driver::<4>();
    drv.device_mut().inject(b"abcdef");
    drv.run_pending();

    let stats = drv.stats();
    assert_eq!(stats.bytes_received, 4);
    assert_eq!(stats.overruns, 2);
}

#[test]
fn consecutive_lines_share_the_buffer() {
    let mut drv = driver::<64>();

    drv.device_mut().inject(b"one\r");
    drv.run_until_idle();
    drv.device_mut().inject(b"Two\r");
    drv.run_until_idle();

    assert_eq!(drv.device().transmitted(), b"ONE\rTWO\r");
    assert_eq!(drv.stats().lines_echoed, 2);
}

#[test]
fn into_parts_returns_the_device() {
    let mut drv = driver::<8>();
    drv.device_mut().inject(b"a\r");
    drv.run_until_idle();

    let (device, service) = drv.into_parts();
    assert_eq!(device.transmitted(), b"A\r");
    assert_eq!(service.stats().lines_echoed, 1);
}

use crate::event::LinkEvent;
use crate::fold::FoldPolicy;
use crate::service::{parse_terminator, EchoService, LinkState, CARRIAGE_RETURN, LINE_FEED};

#[test]
fn echoes_hi_uppercased() {
    let mut svc: EchoService<64> = EchoService::new();
    assert_eq!(svc.state(), LinkState::Idle);

    for &byte in b"Hi\r" {
        assert!(svc.on_byte_received(byte));
    }
    assert_eq!(svc.queued(), 3);
    assert_eq!(svc.state(), LinkState::Receiving);

    assert!(svc.poll_completion());
    assert_eq!(svc.state(), LinkState::Transmitting);

    assert_eq!(svc.on_transmit_complete(), Some(b'H'));
    assert_eq!(svc.on_transmit_complete(), Some(b'I'));
    assert_eq!(svc.on_transmit_complete(), Some(CARRIAGE_RETURN));
    assert_eq!(svc.on_transmit_complete(), None);

    assert_eq!(svc.state(), LinkState::Idle);
    let stats = svc.stats();
    assert_eq!(stats.bytes_received, 3);
    assert_eq!(stats.bytes_transmitted, 3);
    assert_eq!(stats.lines_echoed, 1);
}

#[test]
fn poll_is_a_noop_on_empty_buffer() {
    let mut svc: EchoService<8> = EchoService::new();
    assert!(!svc.poll_completion());
    assert!(!svc.poll_completion());
    assert_eq!(svc.state(), LinkState::Idle);
}

#[test]
fn poll_waits_for_terminator() {
    let mut svc: EchoService<8> = EchoService::new();
    svc.on_byte_received(b'H');
    svc.on_byte_received(b'i');
    assert!(!svc.poll_completion());

    svc.on_byte_received(CARRIAGE_RETURN);
    assert!(svc.poll_completion());
}

#[test]
fn poll_after_drain_is_idempotent() {
    let mut svc: EchoService<8> = EchoService::new();
    svc.on_byte_received(b'x');
    svc.on_byte_received(CARRIAGE_RETURN);
    assert!(svc.poll_completion());
    while svc.on_transmit_complete().is_some() {}

    // ready is set again and the buffer is empty; polling must not retrigger.
    assert!(!svc.poll_completion());
    assert_eq!(svc.state(), LinkState::Idle);
}

#[test]
fn overrun_drops_and_counts() {
    let mut svc: EchoService<4> = EchoService::new();
    for &byte in b"abcd" {
        assert!(svc.on_byte_received(byte));
    }
    assert!(!svc.on_byte_received(b'e'));
    assert!(!svc.on_byte_received(b'f'));

    assert_eq!(svc.queued(), 4);
    assert_eq!(svc.stats().overruns, 2);
    assert_eq!(svc.stats().bytes_received, 4);
}

#[test]
fn bytes_arriving_mid_drain_join_the_run() {
    let mut svc: EchoService<16> = EchoService::new();
    for &byte in b"ab\r" {
        svc.on_byte_received(byte);
    }
    assert!(svc.poll_completion());

    assert_eq!(svc.on_transmit_complete(), Some(b'A'));
    // A new line starts arriving while the reply drains.
    svc.on_byte_received(b'c');
    assert_eq!(svc.state(), LinkState::Transmitting);

    assert_eq!(svc.on_transmit_complete(), Some(b'B'));
    assert_eq!(svc.on_transmit_complete(), Some(CARRIAGE_RETURN));
    assert_eq!(svc.on_transmit_complete(), Some(b'C'));
    assert_eq!(svc.on_transmit_complete(), None);
    assert_eq!(svc.state(), LinkState::Idle);
}

#[test]
fn spurious_transmit_complete_keeps_idle() {
    let mut svc: EchoService<8> = EchoService::new();
    assert_eq!(svc.on_transmit_complete(), None);
    assert_eq!(svc.state(), LinkState::Idle);
}

#[test]
fn dispatch_maps_events_to_handlers() {
    let mut svc: EchoService<8> = EchoService::new();
    assert_eq!(svc.dispatch(LinkEvent::ByteReceived(b'q')), None);
    assert_eq!(svc.dispatch(LinkEvent::ByteReceived(CARRIAGE_RETURN)), None);
    assert!(svc.poll_completion());
    assert_eq!(svc.dispatch(LinkEvent::TransmitComplete), Some(b'Q'));
}

#[test]
fn swap_policy_inverts_both_cases() {
    let mut svc: EchoService<8> = EchoService::new().with_fold(FoldPolicy::Swap);
    for &byte in b"Hi\r" {
        svc.on_byte_received(byte);
    }
    assert!(svc.poll_completion());
    assert_eq!(svc.on_transmit_complete(), Some(b'h'));
    assert_eq!(svc.on_transmit_complete(), Some(b'I'));
    assert_eq!(svc.on_transmit_complete(), Some(CARRIAGE_RETURN));
}

#[test]
fn custom_terminator() {
    let mut svc: EchoService<8> = EchoService::new().with_terminator(LINE_FEED);
    svc.on_byte_received(b'k');
    svc.on_byte_received(CARRIAGE_RETURN);
    assert!(!svc.poll_completion());
    svc.on_byte_received(LINE_FEED);
    assert!(svc.poll_completion());
}

#[test]
fn reset_returns_to_idle() {
    let mut svc: EchoService<8> = EchoService::new();
    svc.on_byte_received(b'a');
    svc.on_byte_received(CARRIAGE_RETURN);
    svc.reset();
    assert_eq!(svc.state(), LinkState::Idle);
    assert!(!svc.poll_completion());
}

#[test]
fn terminator_names_parse() {
    assert_eq!(parse_terminator("cr").unwrap(), 0x0D);
    assert_eq!(parse_terminator("lf").unwrap(), 0x0A);
    assert_eq!(parse_terminator("0x00").unwrap(), 0x00);
    assert!(parse_terminator("newline").is_err());
}

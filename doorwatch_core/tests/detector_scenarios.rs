use std::time::{Duration, Instant};

use doorwatch_core::mocks::RecordingSink;
use doorwatch_core::{DistanceSample, DoorDetector, DoorState, EchoFault};
use rstest::rstest;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn detector(post_cooldown: Duration) -> DoorDetector {
    DoorDetector::builder()
        .with_post_cooldown(post_cooldown)
        .try_build()
        .unwrap()
}

/// Feed distances 100 ms apart starting at `t0 + start`; returns the tick
/// indices (relative to this call) that committed a transition.
fn feed(
    d: &mut DoorDetector,
    sink: &mut RecordingSink,
    t0: Instant,
    start: Duration,
    cms: &[f32],
) -> Vec<usize> {
    let mut flips = Vec::new();
    for (i, &cm) in cms.iter().enumerate() {
        let now = t0 + start + ms(100 * i as u64);
        let r = d.tick(DistanceSample::from_cm(cm), false, now, sink, None);
        if r.vote.transition.is_some() {
            flips.push(i);
        }
    }
    flips
}

#[test]
fn door_swing_opens_after_three_agreeing_ticks() {
    let mut d = detector(Duration::ZERO);
    let mut sink = RecordingSink::new();
    let t0 = Instant::now();

    let flips = feed(&mut d, &mut sink, t0, Duration::ZERO, &[30.0, 31.0, 29.0, 85.0, 86.0, 87.0]);

    assert_eq!(flips, vec![5]);
    assert_eq!(d.door(), DoorState::Open);
    // startup announcement, then exactly one Open
    assert_eq!(sink.doors(), vec!["Closed", "Open"]);
}

#[test]
fn open_notification_waits_out_post_cooldown() {
    let mut d = detector(Duration::from_secs(5));
    let mut sink = RecordingSink::new();
    let t0 = Instant::now();

    feed(&mut d, &mut sink, t0, Duration::ZERO, &[30.0, 31.0, 29.0, 85.0, 86.0, 87.0]);
    assert_eq!(d.door(), DoorState::Open);
    assert_eq!(sink.doors(), vec!["Closed"]);

    let r = d.tick(DistanceSample::from_cm(86.0), false, t0 + ms(5_000), &mut sink, None);
    assert!(r.dispatch.is_sent());
    assert_eq!(sink.doors(), vec!["Closed", "Open"]);
}

#[test]
fn close_is_held_back_by_transition_cooldown() {
    let mut d = detector(Duration::ZERO);
    let mut sink = RecordingSink::new();
    let t0 = Instant::now();

    feed(&mut d, &mut sink, t0, Duration::ZERO, &[30.0, 31.0, 29.0, 85.0, 86.0, 87.0]);
    let opened_at = t0 + ms(500);
    assert_eq!(d.door(), DoorState::Open);

    // Closed candidates agree from 0.8 s on, but the door may not move again
    // until 1 s after it opened.
    let flips = feed(&mut d, &mut sink, t0, ms(600), &[20.0; 10]);
    assert_eq!(flips, vec![9]);
    assert_eq!(d.voter().history().len(), d.detector_cfg().history_len);
    assert_eq!(d.door(), DoorState::Closed);
    assert!(d.gate().last_sent_at().is_some_and(|at| at >= opened_at + Duration::from_secs(1)));
    assert_eq!(sink.doors(), vec!["Closed", "Open", "Closed"]);
}

#[test]
fn steady_far_reading_never_opens() {
    // A door that was already open at startup reads far but still.
    let mut d = detector(Duration::ZERO);
    let mut sink = RecordingSink::new();
    let flips = feed(&mut d, &mut sink, Instant::now(), Duration::ZERO, &[90.0, 91.0, 90.5, 89.0, 90.0, 91.0]);
    assert!(flips.is_empty());
    assert_eq!(d.door(), DoorState::Closed);
}

#[rstest]
#[case(EchoFault::StartTimeout)]
#[case(EchoFault::EndTimeout)]
#[case(EchoFault::OutOfRange)]
fn missed_echo_interrupts_the_vote(#[case] fault: EchoFault) {
    let mut d = detector(Duration::ZERO);
    let mut sink = RecordingSink::new();
    let t0 = Instant::now();

    feed(&mut d, &mut sink, t0, Duration::ZERO, &[30.0, 31.0, 29.0, 85.0, 86.0]);
    let r = d.tick(DistanceSample::NoEcho(fault), false, t0 + ms(500), &mut sink, None);
    assert_eq!(r.vote.agreement, 0);
    assert_eq!(d.voter().history().len(), 5);

    // two more agreeing ticks are not enough after the reset
    let flips = feed(&mut d, &mut sink, t0, ms(600), &[87.0, 86.0]);
    assert!(flips.is_empty());
    assert_eq!(d.door(), DoorState::Closed);
    let flips = feed(&mut d, &mut sink, t0, ms(800), &[88.0]);
    assert_eq!(flips, vec![0]);
}

#[test]
fn beam_break_changes_signature_and_is_announced() {
    let mut d = detector(Duration::ZERO);
    let mut sink = RecordingSink::new();
    let t0 = Instant::now();

    d.tick(DistanceSample::from_cm(30.0), false, t0, &mut sink, None);
    let r = d.tick(DistanceSample::from_cm(30.0), true, t0 + ms(100), &mut sink, None);
    assert!(r.walked_recently);
    assert!(r.dispatch.is_sent());
    let last = sink.events.last().unwrap();
    assert_eq!(last.door_status, "Closed");
    assert_eq!(last.walk_through_status, "True");
}

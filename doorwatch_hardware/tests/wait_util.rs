use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};
use std::thread;
use std::time::Duration;

use doorwatch_hardware::error::HwError;
use doorwatch_hardware::util::{time_echo_pulse, wait_for_level};

#[test]
fn wait_for_level_sees_line_flip() {
    let high = Arc::new(AtomicBool::new(false));
    let high_bg = high.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(3));
        high_bg.store(true, Ordering::Relaxed);
    });

    let seen = wait_for_level(
        || high.load(Ordering::Relaxed),
        true,
        Duration::from_millis(200),
        Duration::from_micros(100),
    );
    assert!(seen.is_some());
}

#[test]
fn wait_for_level_gives_up_at_deadline() {
    let t0 = std::time::Instant::now();
    let seen = wait_for_level(|| false, true, Duration::from_millis(5), Duration::ZERO);
    assert!(seen.is_none());
    assert!(t0.elapsed() >= Duration::from_millis(5));
}

#[test]
fn scripted_pulse_is_timed() {
    // low for 3 polls, high for 5, then low for good
    let polls = AtomicUsize::new(0);
    let pulse = time_echo_pulse(
        || {
            let i = polls.fetch_add(1, Ordering::Relaxed);
            (3..8).contains(&i)
        },
        Duration::from_millis(50),
        Duration::ZERO,
    )
    .expect("pulse");
    assert!(pulse < Duration::from_millis(50));
}

#[test]
fn echo_that_never_rises_is_a_start_timeout() {
    let err = time_echo_pulse(|| false, Duration::from_millis(2), Duration::ZERO)
        .expect_err("expected timeout");
    assert!(matches!(err, HwError::EchoStartTimeout), "got {err:?}");
}

#[test]
fn echo_stuck_high_is_an_end_timeout() {
    let err = time_echo_pulse(|| true, Duration::from_millis(2), Duration::ZERO)
        .expect_err("expected timeout");
    assert!(matches!(err, HwError::EchoEndTimeout), "got {err:?}");
}

use std::time::{Duration, Instant};

use doorwatch_core::BeamEventTracker;
use rstest::rstest;

fn at(t0: Instant, secs: f64) -> Instant {
    t0 + Duration::from_secs_f64(secs)
}

#[test]
fn single_break_is_recent_for_the_window_only() {
    let t0 = Instant::now();
    let mut beam = BeamEventTracker::new(Duration::from_secs(2));
    assert!(beam.update(true, t0));
    assert!(!beam.update(false, at(t0, 0.1)));

    beam.update(false, at(t0, 1.5));
    assert!(beam.walked_recently(at(t0, 1.5)));

    beam.update(false, at(t0, 2.5));
    assert!(!beam.walked_recently(at(t0, 2.5)));
    assert_eq!(beam.last_broken_at(), None);
}

#[rstest]
#[case(1.9, true)]
#[case(2.0, true)]
#[case(2.01, false)]
fn window_edge_is_inclusive(#[case] after: f64, #[case] expected: bool) {
    let t0 = Instant::now();
    let mut beam = BeamEventTracker::new(Duration::from_secs(2));
    beam.update(true, t0);
    beam.update(false, at(t0, 0.1));
    assert_eq!(beam.walked_recently(at(t0, after)), expected);
}

#[test]
fn held_break_only_reports_one_edge() {
    let t0 = Instant::now();
    let mut beam = BeamEventTracker::new(Duration::from_secs(2));
    let edges: Vec<bool> = (0..5)
        .map(|i| beam.update(true, at(t0, f64::from(i) * 0.1)))
        .collect();
    assert_eq!(edges, vec![true, false, false, false, false]);
    assert!(beam.broken_now());
    beam.update(false, at(t0, 0.5));
    // window runs from the last broken tick, not the edge
    assert!(beam.walked_recently(at(t0, 2.3)));
    assert!(!beam.walked_recently(at(t0, 2.5)));
}

#[test]
fn still_broken_beam_counts_as_recent_past_the_window() {
    let t0 = Instant::now();
    let mut beam = BeamEventTracker::new(Duration::from_secs(2));
    beam.update(true, t0);
    // no further updates: the beam is still reported broken
    assert!(beam.walked_recently(at(t0, 10.0)));
}

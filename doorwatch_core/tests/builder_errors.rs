use std::time::Duration;

use doorwatch_core::error::BuildError;
use doorwatch_core::{DetectorCfg, DoorDetector, DoorState, NotifyCfg, build_detector};
use rstest::rstest;

#[rstest]
#[case(DetectorCfg { distance_threshold_cm: 0.0, ..DetectorCfg::default() }, "distance_threshold_cm must be > 0")]
#[case(DetectorCfg { distance_threshold_cm: f32::NAN, ..DetectorCfg::default() }, "distance_threshold_cm must be > 0")]
#[case(DetectorCfg { std_dev_high: -0.5, ..DetectorCfg::default() }, "std_dev_high must be >= 0")]
#[case(DetectorCfg { history_len: 1, ..DetectorCfg::default() }, "history_len must be >= 2")]
#[case(DetectorCfg { stability_count: 0, ..DetectorCfg::default() }, "stability_count must be >= 1")]
fn invalid_detector_cfg_yields_typed_build_error(#[case] cfg: DetectorCfg, #[case] msg: &'static str) {
    let err = build_detector(cfg, NotifyCfg::default()).unwrap_err();
    assert_eq!(err, BuildError::InvalidConfig(msg));
}

#[test]
fn blank_user_id_is_rejected() {
    let err = DoorDetector::builder()
        .with_user_id("  ")
        .try_build()
        .unwrap_err();
    assert_eq!(err, BuildError::InvalidConfig("user_id must not be empty"));
}

#[test]
fn builder_defaults_start_closed() {
    let d = DoorDetector::builder().try_build().unwrap();
    assert_eq!(d.door(), DoorState::Closed);
    assert_eq!(d.detector_cfg(), &DetectorCfg::default());
    assert_eq!(d.notify_cfg(), &NotifyCfg::default());
    assert_eq!(d.gate().last_sent(), None);
}

#[test]
fn builder_overrides_compose() {
    let d = DoorDetector::builder()
        .with_threshold_cm(50.0)
        .with_std_dev_high(3.0)
        .with_stability_count(2)
        .with_transition_cooldown(Duration::from_millis(250))
        .with_event_window(Duration::from_secs(2))
        .with_post_cooldown(Duration::ZERO)
        .with_user_id("alice")
        .try_build()
        .unwrap();
    let cfg = d.detector_cfg();
    assert_eq!(cfg.distance_threshold_cm, 50.0);
    assert_eq!(cfg.std_dev_high, 3.0);
    assert_eq!(cfg.stability_count, 2);
    assert_eq!(cfg.transition_cooldown, Duration::from_millis(250));
    assert_eq!(cfg.event_window, Duration::from_secs(2));
    assert_eq!(d.notify_cfg().user_id, "alice");
    assert_eq!(d.notify_cfg().post_cooldown, Duration::ZERO);
}

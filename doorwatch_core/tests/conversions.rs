use std::time::Duration;

use doorwatch_core::{DetectorCfg, NotifyCfg, RunnerCfg, build_detector};

const TOML: &str = r#"
[pins]
trigger = 23
echo = 24
beam = 22

[detector]
distance_threshold_cm = 40.0
door_stability_count = 4
door_transition_cooldown_sec = 0.5
event_window_sec = 2.0

[runner]
sample_delay_sec = 0.05

[notify]
url = "http://localhost:8000/weather"
user_id = "alice"
post_cooldown_sec = 2.5

[hardware]
echo_timeout_ms = 30
"#;

#[test]
fn toml_sections_map_to_runtime_cfgs() {
    let cfg = doorwatch_config::load_toml(TOML).unwrap();
    cfg.validate().unwrap();

    let det = DetectorCfg::from(&cfg.detector);
    assert_eq!(det.distance_threshold_cm, 40.0);
    assert_eq!(det.std_dev_high, 5.0);
    assert_eq!(det.history_len, 15);
    assert_eq!(det.stability_count, 4);
    assert_eq!(det.transition_cooldown, Duration::from_millis(500));
    assert_eq!(det.event_window, Duration::from_secs(2));

    let notify = NotifyCfg::from(&cfg.notify);
    assert_eq!(notify.user_id, "alice");
    assert_eq!(notify.post_cooldown, Duration::from_millis(2_500));

    let runner = RunnerCfg::from(&cfg);
    assert_eq!(runner.sample_delay, Duration::from_millis(50));
    assert_eq!(runner.echo_timeout, Duration::from_millis(30));
    assert_eq!(runner.max_ticks, None);

    build_detector(det, notify).unwrap();
}

#[test]
fn omitted_sections_match_runtime_defaults() {
    let cfg = doorwatch_config::load_toml(
        r#"
[pins]
trigger = 23
echo = 24
beam = 22
[notify]
url = "http://localhost:8000/weather"
"#,
    )
    .unwrap();
    assert_eq!(DetectorCfg::from(&cfg.detector), DetectorCfg::default());
    assert_eq!(NotifyCfg::from(&cfg.notify), NotifyCfg::default());
    assert_eq!(RunnerCfg::from(&cfg), RunnerCfg::default());
}

use doorwatch_config::{Rotation, load_file, load_toml};
use rstest::rstest;

const MINIMAL: &str = r#"
[pins]
trigger = 23
echo = 24
beam = 22

[notify]
url = "http://localhost:8000/weather"
"#;

#[test]
fn minimal_config_gets_field_tested_defaults() {
    let cfg = load_toml(MINIMAL).expect("parse TOML");
    cfg.validate().expect("minimal config should pass");

    assert_eq!(cfg.detector.distance_threshold_cm, 35.0);
    assert_eq!(cfg.detector.std_dev_high, 5.0);
    assert_eq!(cfg.detector.history_len, 15);
    assert_eq!(cfg.detector.door_stability_count, 3);
    assert_eq!(cfg.detector.door_transition_cooldown_sec, 1.0);
    assert_eq!(cfg.detector.event_window_sec, 5.0);
    assert_eq!(cfg.runner.sample_delay_sec, 0.1);
    assert_eq!(cfg.notify.post_cooldown_sec, 5.0);
    assert_eq!(cfg.notify.post_timeout_ms, 5000);
    assert_eq!(cfg.notify.trigger_timeout_ms, 3000);
    assert_eq!(cfg.notify.user_id, "subhon");
    assert_eq!(cfg.notify.trigger_url(), None);
    assert_eq!(cfg.hardware.echo_timeout_ms, 100);
    assert_eq!(cfg.logging.rotation, Rotation::Never);
    assert!(cfg.climate.iio_device.is_none());
}

#[test]
fn missing_notify_section_is_a_parse_error() {
    let toml = r#"
[pins]
trigger = 23
echo = 24
beam = 22
"#;
    let err = load_toml(toml).expect_err("notify is required");
    assert!(err.to_string().contains("notify"));
}

#[test]
fn blank_trigger_url_counts_as_unset() {
    let toml = format!("{MINIMAL}trigger_url = \"  \"\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    cfg.validate().expect("blank trigger url is fine");
    assert_eq!(cfg.notify.trigger_url(), None);
}

#[test]
fn unknown_rotation_is_rejected_by_serde() {
    let toml = format!("{MINIMAL}\n[logging]\nrotation = \"weekly\"\n");
    assert!(load_toml(&toml).is_err());
}

#[rstest]
#[case("[detector]\ndistance_threshold_cm = 0.0", "distance_threshold_cm must be > 0")]
#[case("[detector]\nstd_dev_high = -1.0", "std_dev_high must be >= 0")]
#[case("[detector]\nhistory_len = 1", "history_len must be >= 2")]
#[case("[detector]\ndoor_stability_count = 0", "door_stability_count must be >= 1")]
#[case("[detector]\nevent_window_sec = -0.5", "event_window_sec must be >= 0")]
#[case("[detector]\nevent_window_sec = 1e20", "event_window_sec is too large")]
#[case("[detector]\ndoor_transition_cooldown_sec = 1e20", "door_transition_cooldown_sec is too large")]
#[case("[runner]\nsample_delay_sec = 0.0", "sample_delay_sec must be > 0")]
#[case("[runner]\nsample_delay_sec = 120.0", "unreasonably large")]
#[case("[hardware]\necho_timeout_ms = 0", "echo_timeout_ms must be >= 1")]
#[case("[climate]\niio_device = \"\"", "iio_device must not be empty")]
fn rejects_out_of_range_sections(#[case] extra: &str, #[case] needle: &str) {
    let toml = format!("{MINIMAL}\n{extra}\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "expected {needle:?} in {err}"
    );
}

#[rstest]
#[case("ftp://example.com/hook")]
#[case("localhost:8000")]
fn rejects_non_http_urls(#[case] url: &str) {
    let toml = format!(
        "[pins]\ntrigger = 23\necho = 24\nbeam = 22\n[notify]\nurl = \"{url}\"\n"
    );
    let cfg = load_toml(&toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(format!("{err}").contains("notify.url"));
}

#[test]
fn rejects_shared_pins() {
    let toml = r#"
[pins]
trigger = 23
echo = 23
beam = 22

[notify]
url = "http://localhost:8000/weather"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("shared pin");
    assert!(format!("{err}").contains("distinct"));
}

#[test]
fn load_file_parses_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.toml");
    std::fs::write(&good, MINIMAL).unwrap();
    assert!(load_file(&good).is_ok());

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, format!("{MINIMAL}\n[detector]\nhistory_len = 0\n")).unwrap();
    let err = load_file(&bad).expect_err("invalid");
    assert!(format!("{err}").contains("history_len"));

    let missing = dir.path().join("nope.toml");
    let err = load_file(&missing).expect_err("missing file");
    assert!(format!("{err}").contains("read config"));
}

#[test]
fn huge_post_cooldown_is_rejected_not_zeroed() {
    // notify keys must stay inside the [notify] table
    let toml = format!("{MINIMAL}post_cooldown_sec = 1e20\n");
    let cfg = load_toml(&toml).expect("parse TOML");
    assert_eq!(cfg.notify.post_cooldown_sec, 1e20);
    let err = cfg.validate().expect_err("should be rejected");
    assert!(format!("{err}").contains("post_cooldown_sec is too large"));

    // a year is still a valid cooldown
    let toml = format!("{MINIMAL}post_cooldown_sec = 31536000.0\n");
    load_toml(&toml).expect("parse TOML").validate().expect("one year is fine");
}

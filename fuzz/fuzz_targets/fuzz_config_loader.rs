#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Arbitrary TOML must either be rejected or map cleanly into the runtime
    // configs; neither path may panic.
    let Ok(cfg) = doorwatch_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    let detector: doorwatch_core::DetectorCfg = (&cfg.detector).into();
    let notify: doorwatch_core::NotifyCfg = (&cfg.notify).into();
    let _runner: doorwatch_core::RunnerCfg = (&cfg).into();
    let _ = doorwatch_core::build_detector(detector, notify);
});

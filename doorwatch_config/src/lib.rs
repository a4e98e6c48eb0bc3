#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the door watcher.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - Every section except `[pins]` and `[notify]` may be omitted; defaults
//!   are the tuning values the detector was field-tested with.
use serde::Deserialize;

/// BCM pin numbers.
#[derive(Debug, Deserialize)]
pub struct Pins {
    pub trigger: u8,
    pub echo: u8,
    pub beam: u8,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DetectorCfg {
    /// Distance separating the closed (<=) and open (>) door positions.
    pub distance_threshold_cm: f32,
    /// Rolling standard deviation a reading needs before it is trusted.
    pub std_dev_high: f32,
    /// Number of valid samples kept for the rolling standard deviation.
    pub history_len: usize,
    /// Consecutive agreeing candidates required to commit a door state.
    pub door_stability_count: u32,
    pub door_transition_cooldown_sec: f64,
    /// How long a beam break keeps counting as a recent walk-through.
    pub event_window_sec: f64,
}

impl Default for DetectorCfg {
    fn default() -> Self {
        Self {
            distance_threshold_cm: 35.0,
            std_dev_high: 5.0,
            history_len: 15,
            door_stability_count: 3,
            door_transition_cooldown_sec: 1.0,
            event_window_sec: 5.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunnerCfg {
    /// Sleep between polling ticks.
    pub sample_delay_sec: f64,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            sample_delay_sec: 0.1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotifyCfg {
    /// Endpoint receiving the JSON door event.
    pub url: String,
    /// Optional webhook fired (GET) after each successful event POST.
    #[serde(default)]
    pub trigger_url: Option<String>,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_post_cooldown_sec")]
    pub post_cooldown_sec: f64,
    #[serde(default = "default_post_timeout_ms")]
    pub post_timeout_ms: u64,
    #[serde(default = "default_trigger_timeout_ms")]
    pub trigger_timeout_ms: u64,
}

fn default_user_id() -> String {
    "subhon".to_string()
}
fn default_post_cooldown_sec() -> f64 {
    5.0
}
fn default_post_timeout_ms() -> u64 {
    5000
}
fn default_trigger_timeout_ms() -> u64 {
    3000
}

impl NotifyCfg {
    /// Trigger URL with blank strings treated as unset.
    pub fn trigger_url(&self) -> Option<&str> {
        self.trigger_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Hardware {
    /// Max wait for each echo edge before the sample is dropped.
    pub echo_timeout_ms: u64,
    pub speed_of_sound_cm_s: f32,
}

impl Default for Hardware {
    fn default() -> Self {
        Self {
            echo_timeout_ms: 100,
            speed_of_sound_cm_s: 34_300.0,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Climate {
    /// IIO device directory of the DHT sensor; absent disables live reads.
    pub iio_device: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Never,
    Daily,
    Hourly,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    pub rotation: Rotation,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub pins: Pins,
    pub notify: NotifyCfg,
    #[serde(default)]
    pub detector: DetectorCfg,
    #[serde(default)]
    pub runner: RunnerCfg,
    #[serde(default)]
    pub hardware: Hardware,
    #[serde(default)]
    pub climate: Climate,
    #[serde(default)]
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &std::path::Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {e}", path.display()))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    cfg.validate()?;
    Ok(cfg)
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// A seconds value the runtime can hold as a `Duration`.
fn check_secs(key: &str, v: f64) -> eyre::Result<()> {
    if !(v.is_finite() && v >= 0.0) {
        eyre::bail!("{key} must be >= 0");
    }
    if std::time::Duration::try_from_secs_f64(v).is_err() {
        eyre::bail!("{key} is too large to represent as a duration");
    }
    Ok(())
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Pins
        let p = &self.pins;
        if p.trigger == p.echo || p.trigger == p.beam || p.echo == p.beam {
            eyre::bail!("pins.trigger, pins.echo and pins.beam must be distinct");
        }
        if p.trigger > 27 || p.echo > 27 || p.beam > 27 {
            eyre::bail!("pins must be BCM GPIO numbers in 0..=27");
        }

        // Detector
        let d = &self.detector;
        if !(d.distance_threshold_cm.is_finite() && d.distance_threshold_cm > 0.0) {
            eyre::bail!("detector.distance_threshold_cm must be > 0");
        }
        if !(d.std_dev_high.is_finite() && d.std_dev_high >= 0.0) {
            eyre::bail!("detector.std_dev_high must be >= 0");
        }
        if d.history_len < 2 {
            eyre::bail!("detector.history_len must be >= 2");
        }
        if d.door_stability_count == 0 {
            eyre::bail!("detector.door_stability_count must be >= 1");
        }
        check_secs("detector.door_transition_cooldown_sec", d.door_transition_cooldown_sec)?;
        check_secs("detector.event_window_sec", d.event_window_sec)?;

        // Runner
        let delay = self.runner.sample_delay_sec;
        if !(delay.is_finite() && delay > 0.0) {
            eyre::bail!("runner.sample_delay_sec must be > 0");
        }
        if delay > 60.0 {
            eyre::bail!("runner.sample_delay_sec is unreasonably large (>60s)");
        }

        // Notify
        let n = &self.notify;
        if !is_http_url(&n.url) {
            eyre::bail!("notify.url must start with http:// or https://");
        }
        if let Some(t) = n.trigger_url()
            && !is_http_url(t)
        {
            eyre::bail!("notify.trigger_url must start with http:// or https://");
        }
        if n.user_id.trim().is_empty() {
            eyre::bail!("notify.user_id must not be empty");
        }
        check_secs("notify.post_cooldown_sec", n.post_cooldown_sec)?;
        if n.post_timeout_ms == 0 {
            eyre::bail!("notify.post_timeout_ms must be >= 1");
        }
        if n.trigger_timeout_ms == 0 {
            eyre::bail!("notify.trigger_timeout_ms must be >= 1");
        }

        // Hardware
        if self.hardware.echo_timeout_ms == 0 {
            eyre::bail!("hardware.echo_timeout_ms must be >= 1");
        }
        if self.hardware.echo_timeout_ms > 1000 {
            eyre::bail!("hardware.echo_timeout_ms is unreasonably large (>1s)");
        }
        let c = self.hardware.speed_of_sound_cm_s;
        if !(c.is_finite() && c > 0.0) {
            eyre::bail!("hardware.speed_of_sound_cm_s must be > 0");
        }

        // Climate
        if let Some(dev) = &self.climate.iio_device
            && dev.trim().is_empty()
        {
            eyre::bail!("climate.iio_device must not be empty when set");
        }

        Ok(())
    }
}

//! `From` implementations bridging `doorwatch_config` types to `doorwatch_core` types.

use crate::config::{DetectorCfg, NotifyCfg, RunnerCfg};
use crate::util::secs;

// ── DetectorCfg ──────────────────────────────────────────────────────────────

impl From<&doorwatch_config::DetectorCfg> for DetectorCfg {
    fn from(c: &doorwatch_config::DetectorCfg) -> Self {
        Self {
            distance_threshold_cm: c.distance_threshold_cm,
            std_dev_high: c.std_dev_high,
            history_len: c.history_len,
            stability_count: c.door_stability_count,
            transition_cooldown: secs(c.door_transition_cooldown_sec),
            event_window: secs(c.event_window_sec),
        }
    }
}

// ── NotifyCfg ────────────────────────────────────────────────────────────────

impl From<&doorwatch_config::NotifyCfg> for NotifyCfg {
    fn from(c: &doorwatch_config::NotifyCfg) -> Self {
        Self {
            user_id: c.user_id.clone(),
            post_cooldown: secs(c.post_cooldown_sec),
        }
    }
}

// ── RunnerCfg ────────────────────────────────────────────────────────────────

impl From<&doorwatch_config::Config> for RunnerCfg {
    fn from(c: &doorwatch_config::Config) -> Self {
        Self {
            sample_delay: secs(c.runner.sample_delay_sec),
            echo_timeout: std::time::Duration::from_millis(c.hardware.echo_timeout_ms),
            max_ticks: None,
        }
    }
}

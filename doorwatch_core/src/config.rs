//! Runtime configuration for the detector.
//!
//! These are the immutable structs handed to `DoorDetector` and the runner.
//! They are separate from the TOML-deserialized config in `doorwatch_config`.

use std::time::Duration;

/// Noise gate, stability vote and beam window tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorCfg {
    /// Readings strictly above this are "open"; at or below, "closed".
    pub distance_threshold_cm: f32,
    /// Minimum rolling standard deviation (cm) before any reading is trusted.
    pub std_dev_high: f32,
    /// Capacity of the distance history ring.
    pub history_len: usize,
    /// Consecutive agreeing candidates required to commit a transition.
    pub stability_count: u32,
    /// Minimum time between committed transitions.
    pub transition_cooldown: Duration,
    /// How long a beam break stays "recent".
    pub event_window: Duration,
}

impl Default for DetectorCfg {
    fn default() -> Self {
        Self {
            distance_threshold_cm: 35.0,
            std_dev_high: 5.0,
            history_len: 15,
            stability_count: 3,
            transition_cooldown: Duration::from_secs(1),
            event_window: Duration::from_secs(5),
        }
    }
}

/// Outbound notification policy.
#[derive(Debug, Clone, PartialEq)]
pub struct NotifyCfg {
    pub user_id: String,
    /// Minimum time between successful sends.
    pub post_cooldown: Duration,
}

impl Default for NotifyCfg {
    fn default() -> Self {
        Self {
            user_id: "subhon".to_string(),
            post_cooldown: Duration::from_secs(5),
        }
    }
}

/// Polling loop pacing.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerCfg {
    /// Sleep between ticks.
    pub sample_delay: Duration,
    /// Bound on each echo edge wait.
    pub echo_timeout: Duration,
    /// Stop after this many ticks (None runs until shutdown).
    pub max_ticks: Option<u64>,
}

impl Default for RunnerCfg {
    fn default() -> Self {
        Self {
            sample_delay: Duration::from_millis(100),
            echo_timeout: Duration::from_millis(100),
            max_ticks: None,
        }
    }
}

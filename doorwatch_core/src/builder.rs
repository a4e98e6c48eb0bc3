//! Builder for `DoorDetector` and the validating `build_detector` constructor.

use std::time::Duration;

use crate::config::{DetectorCfg, NotifyCfg};
use crate::detector::DoorDetector;
use crate::error::BuildError;

/// Validate configuration and construct a `DoorDetector`.
///
/// Single source of truth for validation, used by `DetectorBuilder::try_build()`.
pub fn build_detector(detector: DetectorCfg, notify: NotifyCfg) -> Result<DoorDetector, BuildError> {
    if !(detector.distance_threshold_cm.is_finite() && detector.distance_threshold_cm > 0.0) {
        return Err(BuildError::InvalidConfig("distance_threshold_cm must be > 0"));
    }
    if !(detector.std_dev_high.is_finite() && detector.std_dev_high >= 0.0) {
        return Err(BuildError::InvalidConfig("std_dev_high must be >= 0"));
    }
    if detector.history_len < 2 {
        return Err(BuildError::InvalidConfig("history_len must be >= 2"));
    }
    if detector.stability_count == 0 {
        return Err(BuildError::InvalidConfig("stability_count must be >= 1"));
    }
    if notify.user_id.trim().is_empty() {
        return Err(BuildError::InvalidConfig("user_id must not be empty"));
    }
    Ok(DoorDetector::from_parts(detector, notify))
}

/// Builder for `DoorDetector`. Unset sections fall back to their defaults.
#[derive(Debug, Default)]
pub struct DetectorBuilder {
    detector: Option<DetectorCfg>,
    notify: Option<NotifyCfg>,
}

impl DoorDetector {
    pub fn builder() -> DetectorBuilder {
        DetectorBuilder::default()
    }
}

impl DetectorBuilder {
    pub fn with_detector(mut self, cfg: DetectorCfg) -> Self {
        self.detector = Some(cfg);
        self
    }

    pub fn with_notify(mut self, cfg: NotifyCfg) -> Self {
        self.notify = Some(cfg);
        self
    }

    pub fn with_threshold_cm(mut self, cm: f32) -> Self {
        self.detector.get_or_insert_with(DetectorCfg::default).distance_threshold_cm = cm;
        self
    }

    pub fn with_std_dev_high(mut self, sd: f32) -> Self {
        self.detector.get_or_insert_with(DetectorCfg::default).std_dev_high = sd;
        self
    }

    pub fn with_stability_count(mut self, n: u32) -> Self {
        self.detector.get_or_insert_with(DetectorCfg::default).stability_count = n;
        self
    }

    pub fn with_transition_cooldown(mut self, d: Duration) -> Self {
        self.detector.get_or_insert_with(DetectorCfg::default).transition_cooldown = d;
        self
    }

    pub fn with_event_window(mut self, d: Duration) -> Self {
        self.detector.get_or_insert_with(DetectorCfg::default).event_window = d;
        self
    }

    pub fn with_post_cooldown(mut self, d: Duration) -> Self {
        self.notify.get_or_insert_with(NotifyCfg::default).post_cooldown = d;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.notify.get_or_insert_with(NotifyCfg::default).user_id = user_id.into();
        self
    }

    pub fn try_build(self) -> Result<DoorDetector, BuildError> {
        build_detector(
            self.detector.unwrap_or_default(),
            self.notify.unwrap_or_default(),
        )
    }
}

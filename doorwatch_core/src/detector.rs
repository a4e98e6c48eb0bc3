//! The per-tick fusion of distance, beam and notification state.

use std::time::Instant;

use doorwatch_traits::ClimateSensor;

use crate::beam::BeamEventTracker;
use crate::climate::SensorCache;
use crate::config::{DetectorCfg, NotifyCfg};
use crate::notify::{EventSink, NotificationGate, NotificationSignature};
use crate::sample::DistanceSample;
use crate::status::TickReport;
use crate::voter::{DoorState, StabilityVoter};

/// All mutable detector state. Owned by the polling loop; nothing here is
/// shared or locked.
#[derive(Debug, Clone)]
pub struct DoorDetector {
    pub(crate) voter: StabilityVoter,
    pub(crate) beam: BeamEventTracker,
    pub(crate) gate: NotificationGate,
    pub(crate) cache: SensorCache,
    pub(crate) notify: NotifyCfg,
}

impl DoorDetector {
    /// Build without validation; see `DetectorBuilder` for the checked path.
    pub(crate) fn from_parts(detector: DetectorCfg, notify: NotifyCfg) -> Self {
        let beam = BeamEventTracker::new(detector.event_window);
        let gate = NotificationGate::new(notify.post_cooldown);
        Self {
            voter: StabilityVoter::new(detector),
            beam,
            gate,
            cache: SensorCache::new(),
            notify,
        }
    }

    #[inline]
    pub fn door(&self) -> DoorState {
        self.voter.door()
    }

    pub fn walked_recently(&self, now: Instant) -> bool {
        self.beam.walked_recently(now)
    }

    pub fn signature(&self, now: Instant) -> NotificationSignature {
        NotificationSignature::new(self.door(), self.walked_recently(now))
    }

    pub fn voter(&self) -> &StabilityVoter {
        &self.voter
    }

    pub fn gate(&self) -> &NotificationGate {
        &self.gate
    }

    pub fn sensor_cache(&self) -> &SensorCache {
        &self.cache
    }

    pub fn detector_cfg(&self) -> &DetectorCfg {
        self.voter.cfg()
    }

    pub fn notify_cfg(&self) -> &NotifyCfg {
        &self.notify
    }

    /// One polling cycle: vote on the distance, track the beam, then let the
    /// gate decide whether the resulting signature goes out.
    pub fn tick(
        &mut self,
        sample: DistanceSample,
        beam_broken: bool,
        now: Instant,
        sink: &mut dyn EventSink,
        climate: Option<&mut dyn ClimateSensor>,
    ) -> TickReport {
        let vote = self.voter.observe(sample, now);
        self.beam.update(beam_broken, now);
        let sig = self.signature(now);
        let dispatch = self.gate.dispatch(
            sig,
            now,
            &self.notify.user_id,
            sink,
            climate,
            &mut self.cache,
        );
        TickReport {
            sample,
            vote,
            beam_broken,
            walked_recently: sig.walked_recently,
            door: sig.door,
            dispatch,
        }
    }
}

//! Signature dedupe and cooldown in front of the notification sink.

use std::time::{Duration, Instant};

use doorwatch_traits::{BoxError, ClimateSensor};
use serde::Serialize;

use crate::climate::{EnvironmentalReading, SensorCache};
use crate::status::{DispatchOutcome, SuppressReason, TriggerOutcome};
use crate::voter::DoorState;

/// Dedupe key: what a listener would consider "the same news".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationSignature {
    pub door: DoorState,
    pub walked_recently: bool,
}

impl NotificationSignature {
    pub fn new(door: DoorState, walked_recently: bool) -> Self {
        Self {
            door,
            walked_recently,
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match (self.door, self.walked_recently) {
            (DoorState::Open, true) => "open_walk",
            (DoorState::Open, false) => "open",
            (DoorState::Closed, true) => "closed_walk",
            (DoorState::Closed, false) => "closed",
        }
    }
}

/// JSON body POSTed to the sink. Every value is a string on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorEvent {
    pub user_id: String,
    pub door_status: String,
    pub walk_through_status: String,
    pub indoor_temp: String,
    pub humidity: String,
}

impl DoorEvent {
    pub fn new(user_id: &str, sig: NotificationSignature, env: EnvironmentalReading) -> Self {
        Self {
            user_id: user_id.to_string(),
            door_status: sig.door.as_str().to_string(),
            walk_through_status: if sig.walked_recently { "True" } else { "False" }.to_string(),
            indoor_temp: env.temperature_field(),
            humidity: env.humidity_field(),
        }
    }
}

/// Where door events go.
pub trait EventSink {
    /// Deliver one event. Any error counts as a failed send.
    fn post_event(&mut self, event: &DoorEvent) -> Result<(), BoxError>;

    /// Secondary webhook fired after a successful post. Sinks without one
    /// keep the default no-op.
    fn fire_trigger(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn post_event(&mut self, event: &DoorEvent) -> Result<(), BoxError> {
        (**self).post_event(event)
    }
    fn fire_trigger(&mut self) -> Result<(), BoxError> {
        (**self).fire_trigger()
    }
}

#[derive(Debug, Clone)]
pub struct NotificationGate {
    cooldown: Duration,
    last_sent_at: Option<Instant>,
    last_sent: Option<NotificationSignature>,
}

impl NotificationGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_sent_at: None,
            last_sent: None,
        }
    }

    /// `None` when a send is allowed, otherwise the reason it is not.
    pub fn check(&self, sig: NotificationSignature, now: Instant) -> Option<SuppressReason> {
        if self.last_sent == Some(sig) {
            return Some(SuppressReason::Duplicate);
        }
        match self.last_sent_at {
            Some(at) if now.saturating_duration_since(at) < self.cooldown => {
                Some(SuppressReason::Cooldown)
            }
            _ => None,
        }
    }

    pub fn record_sent(&mut self, sig: NotificationSignature, now: Instant) {
        self.last_sent = Some(sig);
        self.last_sent_at = Some(now);
    }

    pub fn last_sent(&self) -> Option<NotificationSignature> {
        self.last_sent
    }

    pub fn last_sent_at(&self) -> Option<Instant> {
        self.last_sent_at
    }

    /// Send `sig` if the gate allows it.
    ///
    /// Climate is read live only when a send is about to happen; failures
    /// fall back to `cache`. The trigger webhook runs only after a successful
    /// post and its failure does not undo it.
    pub fn dispatch(
        &mut self,
        sig: NotificationSignature,
        now: Instant,
        user_id: &str,
        sink: &mut dyn EventSink,
        climate: Option<&mut dyn ClimateSensor>,
        cache: &mut SensorCache,
    ) -> DispatchOutcome {
        if let Some(reason) = self.check(sig, now) {
            return DispatchOutcome::Suppressed(reason);
        }

        let env = match climate {
            Some(sensor) => cache.refresh(sensor),
            None => cache.read(),
        };
        let event = DoorEvent::new(user_id, sig, env);
        let label = sig.label();

        if let Err(e) = sink.post_event(&event) {
            tracing::warn!(label, error = %e, "failed to send door event");
            return DispatchOutcome::Failed(e.to_string());
        }
        self.record_sent(sig, now);
        tracing::info!(
            label,
            door = %event.door_status,
            walked = %event.walk_through_status,
            indoor_temp = %event.indoor_temp,
            humidity = %event.humidity,
            "door event sent"
        );

        let trigger = match sink.fire_trigger() {
            Ok(()) => TriggerOutcome::Fired,
            Err(e) => {
                tracing::warn!(error = %e, "trigger webhook failed");
                TriggerOutcome::Failed(e.to_string())
            }
        };
        DispatchOutcome::Sent { trigger }
    }
}

//! Per-tick results handed back to the loop.

use crate::sample::DistanceSample;
use crate::voter::{DoorState, VoteOutcome};

/// Why the gate held a notification back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressReason {
    /// Same signature as the last successful send.
    Duplicate,
    /// New signature, but the post cooldown has not elapsed.
    Cooldown,
}

/// Outcome of the best-effort trigger webhook after a successful send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    Fired,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Suppressed(SuppressReason),
    Sent { trigger: TriggerOutcome },
    /// The sink rejected the event; gate state is unchanged so the next
    /// eligible tick retries.
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

/// Everything one tick observed and decided.
#[derive(Debug, Clone)]
pub struct TickReport {
    pub sample: DistanceSample,
    pub vote: VoteOutcome,
    pub beam_broken: bool,
    pub walked_recently: bool,
    pub door: DoorState,
    pub dispatch: DispatchOutcome,
}

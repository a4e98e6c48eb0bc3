//! Noise gate and stability vote turning distances into a debounced door state.
//!
//! A reading only counts as evidence while the rolling standard deviation is
//! high, i.e. while something near the sensor is actually moving. A still
//! door jitters by a centimeter or two and must never flip state. Evidence
//! then has to agree for `stability_count` ticks in a row, and committed
//! transitions are spaced by `transition_cooldown`.
//!
//! There is no dead-zone around the distance threshold; all hysteresis lives
//! in the vote count and the cooldown.

use std::fmt;
use std::time::Instant;

use crate::config::DetectorCfg;
use crate::history::DistanceHistory;
use crate::sample::DistanceSample;

/// Debounced door position; the only state exposed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DoorState {
    Open,
    #[default]
    Closed,
}

impl DoorState {
    pub fn as_str(self) -> &'static str {
        match self {
            DoorState::Open => "Open",
            DoorState::Closed => "Closed",
        }
    }
}

impl fmt::Display for DoorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-tick opinion of the noise gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    Open,
    Closed,
    Undetermined,
}

impl Candidate {
    /// The door state this candidate votes for, if any.
    pub fn door(self) -> Option<DoorState> {
        match self {
            Candidate::Open => Some(DoorState::Open),
            Candidate::Closed => Some(DoorState::Closed),
            Candidate::Undetermined => None,
        }
    }
}

/// A committed door state change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from: DoorState,
    pub to: DoorState,
    pub at: Instant,
    pub distance_cm: f32,
    pub std_dev: f32,
}

/// What the voter concluded for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteOutcome {
    pub candidate: Candidate,
    pub agreement: u32,
    pub std_dev: f32,
    pub transition: Option<Transition>,
}

/// Candidate for one tick: a valid sample under high variance votes by
/// threshold; everything else abstains.
pub fn noise_gate(sample: DistanceSample, std_dev: f32, cfg: &DetectorCfg) -> Candidate {
    match sample.cm() {
        Some(cm) if std_dev >= cfg.std_dev_high => {
            if cm > cfg.distance_threshold_cm {
                Candidate::Open
            } else {
                Candidate::Closed
            }
        }
        _ => Candidate::Undetermined,
    }
}

#[derive(Debug, Clone)]
pub struct StabilityVoter {
    cfg: DetectorCfg,
    history: DistanceHistory,
    candidate: Candidate,
    agreement: u32,
    door: DoorState,
    last_transition_at: Option<Instant>,
}

impl StabilityVoter {
    pub fn new(cfg: DetectorCfg) -> Self {
        let history = DistanceHistory::new(cfg.history_len);
        Self {
            cfg,
            history,
            candidate: Candidate::Undetermined,
            agreement: 0,
            door: DoorState::Closed,
            last_transition_at: None,
        }
    }

    #[inline]
    pub fn door(&self) -> DoorState {
        self.door
    }

    pub fn history(&self) -> &DistanceHistory {
        &self.history
    }

    pub fn agreement(&self) -> u32 {
        self.agreement
    }

    pub fn cfg(&self) -> &DetectorCfg {
        &self.cfg
    }

    /// Feed one tick's sample.
    pub fn observe(&mut self, sample: DistanceSample, now: Instant) -> VoteOutcome {
        if let Some(cm) = sample.cm() {
            self.history.push(cm);
        }
        let std_dev = self.history.std_dev();
        let candidate = noise_gate(sample, std_dev, &self.cfg);

        // An abstaining tick discards all accumulated agreement.
        self.agreement = match candidate {
            Candidate::Undetermined => 0,
            c if c == self.candidate => self.agreement.saturating_add(1),
            _ => 1,
        };
        self.candidate = candidate;

        let transition = candidate
            .door()
            .filter(|&to| to != self.door && self.agreement >= self.cfg.stability_count)
            .filter(|_| self.cooled_down(now))
            .map(|to| {
                let t = Transition {
                    from: self.door,
                    to,
                    at: now,
                    distance_cm: sample.cm().unwrap_or_default(),
                    std_dev,
                };
                self.door = to;
                self.last_transition_at = Some(now);
                tracing::info!(
                    from = %t.from,
                    to = %t.to,
                    distance_cm = t.distance_cm,
                    std_dev = t.std_dev,
                    "door state stabilized"
                );
                t
            });

        VoteOutcome {
            candidate,
            agreement: self.agreement,
            std_dev,
            transition,
        }
    }

    fn cooled_down(&self, now: Instant) -> bool {
        self.last_transition_at
            .is_none_or(|t| now.saturating_duration_since(t) >= self.cfg.transition_cooldown)
    }
}

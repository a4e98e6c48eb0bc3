#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Door detection logic (hardware-agnostic).
//!
//! This crate turns raw ultrasonic distances and break-beam levels into a
//! debounced door state plus a "walked through recently" flag, and decides
//! when that pair is worth telling the outside world about. All hardware
//! interactions go through the `doorwatch_traits` sensor traits; delivery goes
//! through [`EventSink`].
//!
//! ## Architecture
//!
//! - **Sampling**: one ranging attempt per tick, failures classified (`sample`)
//! - **Voting**: rolling standard deviation gate plus consecutive-agreement
//!   vote and transition cooldown (`history`, `voter`)
//! - **Beam**: edge detection and the recent-walk window (`beam`)
//! - **Climate**: last-known temperature/humidity with live refresh (`climate`)
//! - **Notification**: signature dedupe and post cooldown (`notify`)
//! - **Loop**: `runner::run` drives everything at a fixed cadence
//!
//! State is owned by a single thread; nothing in here locks.

pub mod beam;
pub mod builder;
pub mod climate;
pub mod config;
pub mod conversions;
pub mod detector;
pub mod error;
pub mod history;
pub mod hw_error;
pub mod mocks;
pub mod notify;
pub mod runner;
pub mod sample;
pub mod status;
pub mod util;
pub mod voter;

pub use beam::BeamEventTracker;
pub use builder::{DetectorBuilder, build_detector};
pub use climate::{EnvironmentalReading, SensorCache, celsius_to_fahrenheit};
pub use config::{DetectorCfg, NotifyCfg, RunnerCfg};
pub use detector::DoorDetector;
pub use error::{BuildError, Result, WatchError};
pub use history::DistanceHistory;
pub use notify::{DoorEvent, EventSink, NotificationGate, NotificationSignature};
pub use runner::{Devices, RunSummary, StopReason, run};
pub use sample::{DistanceSample, DistanceSampler, EchoFault};
pub use status::{DispatchOutcome, SuppressReason, TickReport, TriggerOutcome};
pub use voter::{Candidate, DoorState, StabilityVoter, Transition, VoteOutcome};

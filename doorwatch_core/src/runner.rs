//! The polling loop.
//!
//! Single-threaded: the loop owns every device and all detector state. It
//! blocks in the ranger (bounded by the echo timeout) and in the sink (bounded
//! by the HTTP timeouts); a slow sink stalls sensing for that long.

use std::sync::atomic::{AtomicBool, Ordering};

use doorwatch_traits::{BeamSensor, ClimateSensor, Clock, Ranger};

use crate::config::RunnerCfg;
use crate::detector::DoorDetector;
use crate::notify::EventSink;
use crate::sample::{DistanceSample, DistanceSampler};
use crate::status::DispatchOutcome;
use crate::voter::DoorState;

/// Devices claimed for one run. Dropped (and their GPIO lines released)
/// when `run` returns, whichever way it returns.
pub struct Devices<R, B> {
    pub ranger: R,
    pub beam: B,
    pub climate: Option<Box<dyn ClimateSensor>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Shutdown,
    MaxTicks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub echo_failures: u64,
    pub beam_failures: u64,
    pub transitions: u64,
    pub sent: u64,
    pub send_failures: u64,
    pub final_door: DoorState,
    pub stop: StopReason,
}

/// Poll until `shutdown` is set or `cfg.max_ticks` is reached.
pub fn run<R, B, C>(
    detector: &mut DoorDetector,
    devices: Devices<R, B>,
    sink: &mut dyn EventSink,
    clock: &C,
    cfg: &RunnerCfg,
    shutdown: &AtomicBool,
) -> RunSummary
where
    R: Ranger,
    B: BeamSensor,
    C: Clock + ?Sized,
{
    let Devices {
        ranger,
        mut beam,
        mut climate,
    } = devices;
    let mut sampler = DistanceSampler::new(ranger, cfg.echo_timeout);
    let mut summary = RunSummary {
        ticks: 0,
        echo_failures: 0,
        beam_failures: 0,
        transitions: 0,
        sent: 0,
        send_failures: 0,
        final_door: detector.door(),
        stop: StopReason::Shutdown,
    };
    tracing::info!(
        sample_delay_ms = cfg.sample_delay.as_millis() as u64,
        echo_timeout_ms = cfg.echo_timeout.as_millis() as u64,
        max_ticks = cfg.max_ticks,
        "detector loop start"
    );

    loop {
        if shutdown.load(Ordering::Relaxed) {
            tracing::info!("shutdown requested");
            summary.stop = StopReason::Shutdown;
            break;
        }
        if cfg.max_ticks.is_some_and(|n| summary.ticks >= n) {
            summary.stop = StopReason::MaxTicks;
            break;
        }

        let sample = sampler.measure();
        let now = clock.now();
        let beam_broken = match beam.is_broken() {
            Ok(b) => b,
            Err(e) => {
                summary.beam_failures += 1;
                tracing::warn!(error = %e, "beam read failed; treating as clear");
                false
            }
        };

        let climate = climate
            .as_mut()
            .map(|c| &mut **c as &mut dyn ClimateSensor);
        let report = detector.tick(sample, beam_broken, now, sink, climate);
        summary.ticks += 1;
        if let DistanceSample::NoEcho(_) = report.sample {
            summary.echo_failures += 1;
        }
        if report.vote.transition.is_some() {
            summary.transitions += 1;
        }
        match &report.dispatch {
            DispatchOutcome::Sent { .. } => summary.sent += 1,
            DispatchOutcome::Failed(_) => summary.send_failures += 1,
            DispatchOutcome::Suppressed(_) => {}
        }
        tracing::debug!(
            tick = summary.ticks,
            distance_cm = report.sample.cm(),
            std_dev = report.vote.std_dev,
            candidate = ?report.vote.candidate,
            agreement = report.vote.agreement,
            door = %report.door,
            beam_broken,
            walked_recently = report.walked_recently,
            "tick"
        );

        if shutdown.load(Ordering::Relaxed) {
            continue;
        }
        clock.sleep(cfg.sample_delay);
    }

    summary.final_door = detector.door();
    tracing::info!(
        ticks = summary.ticks,
        transitions = summary.transitions,
        sent = summary.sent,
        send_failures = summary.send_failures,
        echo_failures = summary.echo_failures,
        door = %summary.final_door,
        "detector loop stopped"
    );
    summary
}

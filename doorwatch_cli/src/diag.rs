//! Diagnostic commands: raw sensor readouts, one-off posts, trigger test and
//! the self-check.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use doorwatch_config::Config;
use doorwatch_core::sample::{DistanceSample, DistanceSampler};
use doorwatch_core::util::{fmt_or_unknown, secs};
use doorwatch_core::{
    DistanceHistory, DoorEvent, DoorState, NotificationSignature, SensorCache, WatchError,
};
use doorwatch_traits::{BeamSensor, Clock, MonotonicClock, Ranger};
use eyre::Result;
use serde_json::json;

use crate::cli::{DoorArg, json_mode};
use crate::devices;
use crate::sink::HttpSink;

fn echo_timeout(cfg: &Config) -> Duration {
    Duration::from_millis(cfg.hardware.echo_timeout_ms)
}

/// Print distance and rolling standard deviation for `count` samples.
pub fn measure(cfg: &Config, count: u64, shutdown: Arc<AtomicBool>) -> Result<()> {
    let rig = devices::open(cfg)?;
    let mut sampler = DistanceSampler::new(rig.ranger, echo_timeout(cfg));
    let mut history = DistanceHistory::new(cfg.detector.history_len);
    let clock = MonotonicClock::new();
    let delay = secs(cfg.runner.sample_delay_sec);

    for i in 0..count {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        let sample = sampler.measure();
        if let Some(cm) = sample.cm() {
            history.push(cm);
        }
        let sd = history.std_dev();
        match (json_mode(), sample) {
            (true, DistanceSample::Cm(cm)) => {
                println!("{}", json!({ "sample": i, "distance_cm": cm, "std_dev": sd }));
            }
            (true, DistanceSample::NoEcho(fault)) => {
                println!("{}", json!({ "sample": i, "fault": format!("{fault:?}") }));
            }
            (false, DistanceSample::Cm(cm)) => {
                println!("Distance: {cm:.2} cm | StdDev: {sd:.2}");
            }
            (false, DistanceSample::NoEcho(fault)) => {
                println!("No echo ({fault:?})");
            }
        }
        clock.sleep(delay);
    }
    tracing::debug!(failures = sampler.failures(), "measure done");
    Ok(())
}

/// Print broken/clear for `count` beam polls.
pub fn beam(cfg: &Config, count: u64, shutdown: Arc<AtomicBool>) -> Result<()> {
    let mut rig = devices::open(cfg)?;
    let clock = MonotonicClock::new();
    let delay = secs(cfg.runner.sample_delay_sec);

    for i in 0..count {
        if shutdown.load(Ordering::Relaxed) {
            break;
        }
        match rig.beam.is_broken() {
            Ok(broken) if json_mode() => println!("{}", json!({ "sample": i, "broken": broken })),
            Ok(true) => println!("Beam BROKEN"),
            Ok(false) => println!("Beam clear"),
            Err(e) => tracing::warn!(error = %e, "beam read failed"),
        }
        clock.sleep(delay);
    }
    Ok(())
}

pub struct PostOpts {
    pub door: DoorArg,
    pub walked: bool,
    pub temp_f: Option<f32>,
    pub humidity: Option<f32>,
}

/// Send one event, bypassing the gate. Unspecified climate values come from
/// a live reading.
pub fn post(cfg: &Config, opts: PostOpts) -> Result<()> {
    let door = match opts.door {
        DoorArg::Open => DoorState::Open,
        DoorArg::Closed => DoorState::Closed,
    };
    let mut cache = SensorCache::new();
    if opts.temp_f.is_none() || opts.humidity.is_none() {
        if let Some(mut sensor) = devices::open_climate(cfg)? {
            cache.refresh(sensor.as_mut());
        }
    }
    cache.update(opts.temp_f, opts.humidity);

    let event = DoorEvent::new(
        &cfg.notify.user_id,
        NotificationSignature::new(door, opts.walked),
        cache.read(),
    );
    let sink = HttpSink::from_config(&cfg.notify);
    let status = sink.post(&event)?;
    if json_mode() {
        println!("{}", json!({ "status": status, "event": event }));
    } else {
        println!(
            "Posted to {} (HTTP {status}): door={} walked={} temp={} humidity={}",
            sink.url(),
            event.door_status,
            event.walk_through_status,
            event.indoor_temp,
            event.humidity
        );
    }
    Ok(())
}

/// Fire the trigger webhook once.
pub fn trigger(cfg: &Config) -> Result<()> {
    let sink = HttpSink::from_config(&cfg.notify);
    let Some(url) = sink.trigger_url().map(str::to_string) else {
        return Err(WatchError::Config("notify.trigger_url is not set".into()).into());
    };
    let status = sink.trigger()?;
    if json_mode() {
        println!("{}", json!({ "url": url, "status": status }));
    } else {
        println!("Trigger {url} answered HTTP {}", status.unwrap_or_default());
    }
    Ok(())
}

/// Claim every device, read each once and report. Fails when no distance
/// could be measured. An interrupt during the echo wait releases the devices
/// and reports nothing.
pub fn self_check(cfg: &Config, shutdown: Arc<AtomicBool>) -> Result<()> {
    let mut rig = devices::open(cfg)?;
    let distance = match rig.ranger.measure(echo_timeout(cfg)) {
        Ok(cm) => DistanceSample::from_cm(cm),
        Err(e) => {
            tracing::warn!(error = %e, "ranger read failed");
            DistanceSample::NoEcho(doorwatch_core::hw_error::classify_echo_error(&*e))
        }
    };
    if shutdown.load(Ordering::Relaxed) {
        tracing::info!(backend = rig.backend, "self-check interrupted");
        return Ok(());
    }
    let beam = rig.beam.is_broken().map_err(|e| e.to_string());
    let mut cache = SensorCache::new();
    let env = match rig.climate.as_mut() {
        Some(sensor) => cache.refresh(sensor.as_mut()),
        None => cache.read(),
    };

    if json_mode() {
        println!(
            "{}",
            json!({
                "backend": rig.backend,
                "distance_cm": distance.cm(),
                "beam_broken": beam.as_ref().ok(),
                "indoor_temp": env.temperature_field(),
                "humidity": env.humidity_field(),
            })
        );
    } else {
        println!("Backend: {}", rig.backend);
        println!("Distance: {} cm", fmt_or_unknown(distance.cm(), 2));
        match &beam {
            Ok(b) => println!("Beam: {}", if *b { "broken" } else { "clear" }),
            Err(e) => println!("Beam: read failed ({e})"),
        }
        println!(
            "Climate: {} °F, {} %",
            env.temperature_field(),
            env.humidity_field()
        );
    }

    if let DistanceSample::NoEcho(fault) = distance {
        return Err(WatchError::HardwareInit(format!(
            "ranger produced no echo ({fault:?}); check trigger/echo wiring"
        ))
        .into());
    }
    println!("ok");
    Ok(())
}

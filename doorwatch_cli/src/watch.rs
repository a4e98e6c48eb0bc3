//! The `run` command: config mapping, device assembly and the detector loop.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use doorwatch_core::runner::{Devices, RunSummary, StopReason};
use doorwatch_core::{DetectorCfg, NotifyCfg, RunnerCfg, build_detector};
use doorwatch_traits::MonotonicClock;
use eyre::Result;

use crate::cli::json_mode;
use crate::devices;
use crate::rt::setup_rt_once;
use crate::sink::HttpSink;

pub struct RunOpts {
    pub max_ticks: Option<u64>,
    pub sample_delay_ms: Option<u64>,
    pub rt: bool,
    pub rt_prio: Option<i32>,
}

pub fn run_watch(
    cfg: &doorwatch_config::Config,
    opts: RunOpts,
    shutdown: Arc<AtomicBool>,
) -> Result<RunSummary> {
    // Config mapping via the From impls in doorwatch_core::conversions
    let detector_cfg: DetectorCfg = (&cfg.detector).into();
    let notify_cfg: NotifyCfg = (&cfg.notify).into();
    let mut runner_cfg: RunnerCfg = cfg.into();
    runner_cfg.max_ticks = opts.max_ticks;
    if let Some(ms) = opts.sample_delay_ms {
        runner_cfg.sample_delay = Duration::from_millis(ms.max(1));
    }

    let mut detector = build_detector(detector_cfg, notify_cfg)?;
    let mut sink = HttpSink::from_config(&cfg.notify);
    let rig = devices::open(cfg)?;
    tracing::info!(
        backend = rig.backend,
        url = sink.url(),
        trigger_url = sink.trigger_url(),
        climate = rig.climate.is_some(),
        "devices ready"
    );

    setup_rt_once(opts.rt, opts.rt_prio);

    let devices = Devices {
        ranger: rig.ranger,
        beam: rig.beam,
        climate: rig.climate,
    };
    let summary = doorwatch_core::run(
        &mut detector,
        devices,
        &mut sink,
        &MonotonicClock::new(),
        &runner_cfg,
        &shutdown,
    );
    print_summary(&summary);
    Ok(summary)
}

fn stop_name(s: StopReason) -> &'static str {
    match s {
        StopReason::Shutdown => "shutdown",
        StopReason::MaxTicks => "max_ticks",
    }
}

fn print_summary(s: &RunSummary) {
    if json_mode() {
        println!(
            "{}",
            serde_json::json!({
                "stop": stop_name(s.stop),
                "ticks": s.ticks,
                "door": s.final_door.as_str(),
                "transitions": s.transitions,
                "sent": s.sent,
                "send_failures": s.send_failures,
                "echo_failures": s.echo_failures,
                "beam_failures": s.beam_failures,
            })
        );
    } else {
        println!(
            "Stopped ({}) after {} ticks: door {}, {} transitions, {} sent, {} send failures, {} missed echoes",
            stop_name(s.stop),
            s.ticks,
            s.final_door,
            s.transitions,
            s.sent,
            s.send_failures,
            s.echo_failures
        );
    }
}

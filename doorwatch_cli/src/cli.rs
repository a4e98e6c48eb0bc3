//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[inline]
pub fn json_mode() -> bool {
    JSON_MODE.get().copied().unwrap_or(false)
}

#[derive(Parser, Debug)]
#[command(name = "doorwatch", version, about = "Door open/close and walk-through detector")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/doorwatch.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides [logging].level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

/// Door position accepted by `post`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum DoorArg {
    Open,
    Closed,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the detector loop until interrupted
    Run {
        /// Stop after this many ticks
        #[arg(long, value_name = "N")]
        max_ticks: Option<u64>,
        /// Override [runner].sample_delay_sec
        #[arg(long, value_name = "MS")]
        sample_delay_ms: Option<u64>,
        /// Enable real-time mode (SCHED_FIFO, mlockall)
        #[arg(
            long,
            action = ArgAction::SetTrue,
            long_help = "Enable real-time mode on Linux.\n\nAttempts SCHED_FIFO priority and calls mlockall(MCL_CURRENT) so echo timing is not disturbed by page faults or ordinary processes. May require CAP_SYS_NICE/CAP_IPC_LOCK or root; failures are logged and the run continues."
        )]
        rt: bool,
        /// Real-time priority for SCHED_FIFO (1..=max)
        #[arg(long, value_name = "PRIO")]
        rt_prio: Option<i32>,
    },
    /// Print distance and rolling standard deviation per sample
    Measure {
        #[arg(long, value_name = "N", default_value_t = 20)]
        count: u64,
    },
    /// Print broken/clear per beam sample
    Beam {
        #[arg(long, value_name = "N", default_value_t = 20)]
        count: u64,
    },
    /// Send one door event to [notify].url
    Post {
        #[arg(long, value_enum)]
        door: DoorArg,
        /// Mark the event as a recent walk-through
        #[arg(long, action = ArgAction::SetTrue)]
        walked: bool,
        /// Indoor temperature in °F (defaults to a live reading)
        #[arg(long, value_name = "F")]
        temp: Option<f32>,
        /// Relative humidity in % (defaults to a live reading)
        #[arg(long, value_name = "PCT")]
        humidity: Option<f32>,
    },
    /// Fire the [notify].trigger_url webhook once
    Trigger,
    /// Quick health check: claim every device and read it once
    SelfCheck,
}

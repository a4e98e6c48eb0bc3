#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod cli;
mod devices;
mod diag;
mod error_fmt;
mod rt;
mod sink;
mod watch;

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use doorwatch_config::{Config, Logging, Rotation};
use doorwatch_core::WatchError;
use eyre::{Result, WrapErr};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands, JSON_MODE, json_mode};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    if let Err(e) = color_eyre::install() {
        eprintln!("Warning: error report hook not installed: {e}");
    }

    if let Err(err) = real_main(cli) {
        if json_mode() {
            eprintln!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn real_main(cli: Cli) -> Result<()> {
    let cfg = load_config(&cli.config)?;
    // Dropping the guard at the end of this scope flushes the file writer.
    let _file_guard = init_tracing(cli.json, cli.log_level.as_deref(), &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), "config loaded");

    let result = dispatch(cli.cmd, &cfg);
    // Logged here so the file layer still has its writer.
    if let Err(err) = &result {
        tracing::error!(error = %err, "command failed");
    }
    result
}

fn dispatch(cmd: Commands, cfg: &Config) -> Result<()> {
    match cmd {
        Commands::Run {
            max_ticks,
            sample_delay_ms,
            rt,
            rt_prio,
        } => {
            let shutdown = install_shutdown_handler()?;
            watch::run_watch(
                cfg,
                watch::RunOpts {
                    max_ticks,
                    sample_delay_ms,
                    rt,
                    rt_prio,
                },
                shutdown,
            )?;
        }
        Commands::Measure { count } => diag::measure(cfg, count, install_shutdown_handler()?)?,
        Commands::Beam { count } => diag::beam(cfg, count, install_shutdown_handler()?)?,
        Commands::Post {
            door,
            walked,
            temp,
            humidity,
        } => diag::post(
            cfg,
            diag::PostOpts {
                door,
                walked,
                temp_f: temp,
                humidity,
            },
        )?,
        Commands::Trigger => diag::trigger(cfg)?,
        Commands::SelfCheck => diag::self_check(cfg, install_shutdown_handler()?)?,
    }
    Ok(())
}

/// Load and validate the TOML config; every failure is a config error.
fn load_config(path: &Path) -> Result<Config> {
    doorwatch_config::load_file(path)
        .map_err(|e| WatchError::Config(format!("{}: {e:#}", path.display())).into())
}

/// SIGINT/SIGTERM set the returned flag; the loops poll it between ticks.
fn install_shutdown_handler() -> Result<Arc<AtomicBool>> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::Relaxed);
    })
    .wrap_err("install signal handler")?;
    Ok(flag)
}

/// Registry with an env filter, a pretty or JSON stderr layer and an optional
/// JSON-lines file layer. The returned guard must outlive all logging.
fn init_tracing(
    json: bool,
    cli_level: Option<&str>,
    logging: &Logging,
) -> Result<Option<WorkerGuard>> {
    let level = cli_level
        .or(logging.level.as_deref())
        .unwrap_or("info");
    let filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(level).wrap_err_with(|| format!("invalid log level {level:?}"))?,
    };

    let console = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let mut guard = None;
    let file = match logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| WatchError::Config(format!("logging.file {path:?} has no file name")))?;
            let appender = match logging.rotation {
                Rotation::Never => tracing_appender::rolling::never(dir, name),
                Rotation::Daily => tracing_appender::rolling::daily(dir, name),
                Rotation::Hourly => tracing_appender::rolling::hourly(dir, name),
            };
            let (writer, g) = tracing_appender::non_blocking(appender);
            guard = Some(g);
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(guard)
}

//! Human-readable error descriptions and structured JSON error formatting.

use doorwatch_core::error::{BuildError, WatchError};

use crate::sink::SinkError;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(BuildError::InvalidConfig(msg)) = err.downcast_ref::<BuildError>() {
        return format!(
            "What happened: Invalid detector configuration ({msg}).\nLikely causes: Out-of-range values in [detector] or [notify].\nHow to fix: Edit the config file, then rerun."
        );
    }

    if let Some(we) = err.downcast_ref::<WatchError>() {
        return match we {
            WatchError::HardwareInit(detail) => format!(
                "What happened: Failed to initialize the sensors ({detail}).\nLikely causes: Incorrect [pins] values, pins already claimed by another process, or insufficient GPIO permissions.\nHow to fix: Check the BCM numbers in [pins], stop other GPIO users, and run as a user in the gpio group."
            ),
            WatchError::Config(detail) => format!(
                "What happened: Configuration is invalid or incomplete ({detail}).\nLikely causes: Missing [pins] or [notify] section, a typo in a key, or an out-of-range value.\nHow to fix: Edit the TOML config and try again."
            ),
        };
    }

    if let Some(se) = err.downcast_ref::<SinkError>() {
        return match se {
            SinkError::Status { url, status } => format!(
                "What happened: {url} rejected the request with HTTP {status}.\nLikely causes: Wrong endpoint path or the service refused the payload.\nHow to fix: Check [notify].url / trigger_url and the service logs."
            ),
            SinkError::Transport { url, reason } => format!(
                "What happened: Could not reach {url} ({reason}).\nLikely causes: The service is not running, wrong host/port, or a timeout.\nHow to fix: Start the service or fix the URL; raise post_timeout_ms if it is slow."
            ),
            SinkError::Encode(e) => format!(
                "What happened: The door event could not be encoded ({e}).\nLikely causes: Internal error.\nHow to fix: Re-run with --log-level=debug and report the output."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass --config with a readable TOML file. Details: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Details: {msg}"
    )
}

/// Stable exit codes: 2 for configuration, 3 for hardware init, 4 for
/// delivery failures, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return 2;
    }
    match err.downcast_ref::<WatchError>() {
        Some(WatchError::Config(_)) => 2,
        Some(WatchError::HardwareInit(_)) => 3,
        None if err.downcast_ref::<SinkError>().is_some() => 4,
        None => 1,
    }
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Config";
    }
    match err.downcast_ref::<WatchError>() {
        Some(WatchError::Config(_)) => "Config",
        Some(WatchError::HardwareInit(_)) => "HardwareInit",
        None if err.downcast_ref::<SinkError>().is_some() => "Sink",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}

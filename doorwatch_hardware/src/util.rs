use std::time::{Duration, Instant};

use crate::error::{HwError, Result};

/// Speed of sound in air at ~20 °C, centimeters per second.
pub const SPEED_OF_SOUND_CM_S: f32 = 34_300.0;

/// Wait until `is_high()` reports `level`, or until `timeout` has elapsed.
///
/// Returns the instant at which the level was first observed. A zero
/// `poll_interval` spins; echo pulses are only a few hundred microseconds
/// long, so sleeping between polls would swallow the edge.
pub fn wait_for_level(
    mut is_high: impl FnMut() -> bool,
    level: bool,
    timeout: Duration,
    poll_interval: Duration,
) -> Option<Instant> {
    let deadline = Instant::now() + timeout;
    loop {
        if is_high() == level {
            return Some(Instant::now());
        }
        if Instant::now() >= deadline {
            return None;
        }
        if poll_interval.is_zero() {
            std::hint::spin_loop();
        } else {
            std::thread::sleep(poll_interval);
        }
    }
}

/// Time one echo pulse: wait for the rising edge, then for the falling edge.
///
/// Each edge gets the full `timeout`.
pub fn time_echo_pulse(
    mut is_high: impl FnMut() -> bool,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Duration> {
    let rose_at = wait_for_level(&mut is_high, true, timeout, poll_interval)
        .ok_or(HwError::EchoStartTimeout)?;
    let fell_at = wait_for_level(&mut is_high, false, timeout, poll_interval)
        .ok_or(HwError::EchoEndTimeout)?;
    Ok(fell_at.saturating_duration_since(rose_at))
}

/// Round-trip pulse width to one-way distance.
#[inline]
pub fn pulse_to_cm(pulse: Duration, speed_cm_s: f32) -> f32 {
    pulse.as_secs_f32() * speed_cm_s / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_width_converts_to_half_the_round_trip() {
        // 1 ms round trip at 34300 cm/s is 17.15 cm each way
        let cm = pulse_to_cm(Duration::from_millis(1), SPEED_OF_SOUND_CM_S);
        assert!((cm - 17.15).abs() < 1e-3, "got {cm}");
    }

    #[test]
    fn zero_pulse_is_zero_distance() {
        assert_eq!(pulse_to_cm(Duration::ZERO, SPEED_OF_SOUND_CM_S), 0.0);
    }
}

//! Small conversion helpers.

use std::time::Duration;

/// Seconds from config to a `Duration`. Negative or non-finite input maps to zero.
#[inline]
pub fn secs(v: f64) -> Duration {
    Duration::try_from_secs_f64(v).unwrap_or(Duration::ZERO)
}

/// Format an optional reading for the event payload.
pub fn fmt_or_unknown(v: Option<f32>, decimals: usize) -> String {
    match v {
        Some(x) if x.is_finite() => format!("{x:.decimals$}"),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secs_clamps_garbage_to_zero() {
        assert_eq!(secs(1.5), Duration::from_millis(1500));
        assert_eq!(secs(-1.0), Duration::ZERO);
        assert_eq!(secs(f64::NAN), Duration::ZERO);
    }

    #[test]
    fn formats_with_fixed_decimals() {
        assert_eq!(fmt_or_unknown(Some(68.04), 1), "68.0");
        assert_eq!(fmt_or_unknown(Some(42.6), 0), "43");
        assert_eq!(fmt_or_unknown(None, 1), "unknown");
        assert_eq!(fmt_or_unknown(Some(f32::NAN), 1), "unknown");
    }
}

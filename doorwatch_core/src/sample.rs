//! One distance measurement per tick.

use std::time::Duration;

use doorwatch_traits::Ranger;

use crate::hw_error::classify_echo_error;

/// Why a tick produced no usable distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EchoFault {
    /// The echo line never rose.
    StartTimeout,
    /// The echo line rose but never fell.
    EndTimeout,
    /// The ranger answered with a zero, negative or non-finite distance.
    OutOfRange,
    /// Any other driver failure.
    Hardware,
}

/// Result of one ranging attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DistanceSample {
    Cm(f32),
    NoEcho(EchoFault),
}

impl DistanceSample {
    /// Wrap a raw driver reading; anything not strictly positive and finite is invalid.
    pub fn from_cm(cm: f32) -> Self {
        if cm.is_finite() && cm > 0.0 {
            DistanceSample::Cm(cm)
        } else {
            DistanceSample::NoEcho(EchoFault::OutOfRange)
        }
    }

    #[inline]
    pub fn cm(&self) -> Option<f32> {
        match *self {
            DistanceSample::Cm(cm) => Some(cm),
            DistanceSample::NoEcho(_) => None,
        }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.cm().is_some()
    }
}

/// Drives a `Ranger` and turns every outcome into a `DistanceSample`.
///
/// Owning the ranger mutably keeps measurements from overlapping.
pub struct DistanceSampler<R> {
    ranger: R,
    timeout: Duration,
    failures: u64,
}

impl<R: Ranger> DistanceSampler<R> {
    pub fn new(ranger: R, timeout: Duration) -> Self {
        Self {
            ranger,
            timeout,
            failures: 0,
        }
    }

    pub fn measure(&mut self) -> DistanceSample {
        let sample = match self.ranger.measure(self.timeout) {
            Ok(cm) => DistanceSample::from_cm(cm),
            Err(e) => DistanceSample::NoEcho(classify_echo_error(&*e)),
        };
        if let DistanceSample::NoEcho(fault) = sample {
            self.failures = self.failures.saturating_add(1);
            tracing::debug!(?fault, failures = self.failures, "no echo");
        }
        sample
    }

    /// Failed measurements since construction.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn into_inner(self) -> R {
        self.ranger
    }
}

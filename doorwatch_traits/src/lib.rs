//! Hardware-facing traits shared by the detector core and the device drivers.
//!
//! Errors cross these boundaries boxed so drivers keep their own typed errors;
//! the core downcasts the ones it knows about.

pub mod clock;

pub use clock::{Clock, MonotonicClock};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// One-shot distance ranging (HC-SR04 style).
pub trait Ranger {
    /// Fire one measurement and return the distance in centimeters.
    ///
    /// `timeout` bounds each echo edge wait, not the whole call.
    fn measure(&mut self, timeout: std::time::Duration) -> Result<f32, BoxError>;
}

/// Binary beam-interruption input.
pub trait BeamSensor {
    /// True while the beam is interrupted.
    fn is_broken(&mut self) -> Result<bool, BoxError>;
}

/// Temperature/humidity source. Each quantity is read independently.
pub trait ClimateSensor {
    fn temperature_c(&mut self) -> Result<f32, BoxError>;
    fn humidity_pct(&mut self) -> Result<f32, BoxError>;
}

impl<T: Ranger + ?Sized> Ranger for Box<T> {
    fn measure(&mut self, timeout: std::time::Duration) -> Result<f32, BoxError> {
        (**self).measure(timeout)
    }
}

impl<T: BeamSensor + ?Sized> BeamSensor for Box<T> {
    fn is_broken(&mut self) -> Result<bool, BoxError> {
        (**self).is_broken()
    }
}

impl<T: ClimateSensor + ?Sized> ClimateSensor for Box<T> {
    fn temperature_c(&mut self) -> Result<f32, BoxError> {
        (**self).temperature_c()
    }
    fn humidity_pct(&mut self) -> Result<f32, BoxError> {
        (**self).humidity_pct()
    }
}

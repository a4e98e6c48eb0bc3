pub mod error;
pub mod iio;
pub mod util;

#[cfg(feature = "hardware")]
pub mod beam;
#[cfg(feature = "hardware")]
pub mod hcsr04;

use doorwatch_traits::{BeamSensor, BoxError, ClimateSensor, Ranger};
use error::HwError;

pub use iio::IioClimate;

/// Simulated ranger replaying a distance profile in a loop.
///
/// Every `timeout_every`-th call fails with `EchoStartTimeout` instead.
#[derive(Debug, Clone)]
pub struct SimulatedRanger {
    profile: Vec<f32>,
    idx: usize,
    calls: usize,
    timeout_every: Option<usize>,
}

impl SimulatedRanger {
    pub fn new(profile: Vec<f32>) -> Self {
        Self {
            profile,
            idx: 0,
            calls: 0,
            timeout_every: None,
        }
    }

    /// Door closed at ~30 cm for `dwell` samples, then open at ~86 cm for
    /// `dwell` samples, with a little echo jitter on each plateau.
    pub fn door_swing(dwell: usize) -> Self {
        const JITTER: [f32; 5] = [0.0, 0.6, -0.4, 0.9, -0.7];
        let dwell = dwell.max(1);
        let mut profile = Vec::with_capacity(dwell * 2);
        for base in [30.0f32, 86.0] {
            for i in 0..dwell {
                profile.push(base + JITTER[i % JITTER.len()]);
            }
        }
        Self::new(profile)
    }

    pub fn with_timeout_every(mut self, n: usize) -> Self {
        self.timeout_every = (n > 0).then_some(n);
        self
    }
}

impl Ranger for SimulatedRanger {
    fn measure(&mut self, _timeout: std::time::Duration) -> Result<f32, BoxError> {
        self.calls += 1;
        if let Some(n) = self.timeout_every
            && self.calls % n == 0
        {
            return Err(Box::new(HwError::EchoStartTimeout));
        }
        if self.profile.is_empty() {
            return Err(Box::new(HwError::EchoStartTimeout));
        }
        let cm = self.profile[self.idx % self.profile.len()];
        self.idx = self.idx.wrapping_add(1);
        tracing::trace!(cm, "simulated echo");
        Ok(cm)
    }
}

/// Simulated beam: broken for the first `broken_for` polls of every `period`.
#[derive(Debug, Clone)]
pub struct SimulatedBeam {
    period: usize,
    broken_for: usize,
    polls: usize,
}

impl SimulatedBeam {
    pub fn periodic(period: usize, broken_for: usize) -> Self {
        Self {
            period,
            broken_for,
            polls: 0,
        }
    }

    pub fn never() -> Self {
        Self::periodic(0, 0)
    }
}

impl BeamSensor for SimulatedBeam {
    fn is_broken(&mut self) -> Result<bool, BoxError> {
        let i = self.polls;
        self.polls = self.polls.wrapping_add(1);
        if self.period == 0 {
            return Ok(false);
        }
        Ok(i % self.period < self.broken_for)
    }
}

/// Simulated climate sensor with fixed values; optionally fails every n-th read.
#[derive(Debug, Clone)]
pub struct SimulatedClimate {
    temperature_c: f32,
    humidity_pct: f32,
    fail_every: Option<usize>,
    reads: usize,
}

impl SimulatedClimate {
    pub fn fixed(temperature_c: f32, humidity_pct: f32) -> Self {
        Self {
            temperature_c,
            humidity_pct,
            fail_every: None,
            reads: 0,
        }
    }

    pub fn with_fail_every(mut self, n: usize) -> Self {
        self.fail_every = (n > 0).then_some(n);
        self
    }

    fn next_read(&mut self) -> Result<(), BoxError> {
        self.reads += 1;
        match self.fail_every {
            Some(n) if self.reads % n == 0 => Err(Box::new(HwError::Climate(
                "simulated checksum mismatch".into(),
            ))),
            _ => Ok(()),
        }
    }
}

impl ClimateSensor for SimulatedClimate {
    fn temperature_c(&mut self) -> Result<f32, BoxError> {
        self.next_read()?;
        Ok(self.temperature_c)
    }
    fn humidity_pct(&mut self) -> Result<f32, BoxError> {
        self.next_read()?;
        Ok(self.humidity_pct)
    }
}

impl ClimateSensor for IioClimate {
    fn temperature_c(&mut self) -> Result<f32, BoxError> {
        Ok(IioClimate::temperature_c(self)?)
    }
    fn humidity_pct(&mut self) -> Result<f32, BoxError> {
        Ok(IioClimate::humidity_pct(self)?)
    }
}

#[cfg(feature = "hardware")]
pub use hardware::{HardwareBeam, HardwareRanger};

#[cfg(feature = "hardware")]
pub mod hardware {
    use super::*;
    use crate::beam::BreakBeam;
    use crate::hcsr04::Hcsr04;
    use rppal::gpio::Gpio;

    pub struct HardwareRanger {
        hcsr04: Hcsr04,
    }

    impl HardwareRanger {
        pub fn try_new(trig_pin: u8, echo_pin: u8, speed_cm_s: f32) -> error::Result<Self> {
            let gpio = Gpio::new()?;
            let hcsr04 = Hcsr04::try_new(&gpio, trig_pin, echo_pin, speed_cm_s)?;
            tracing::debug!(trig_pin, echo_pin, "hc-sr04 claimed");
            Ok(Self { hcsr04 })
        }
    }

    impl Ranger for HardwareRanger {
        fn measure(&mut self, timeout: std::time::Duration) -> Result<f32, BoxError> {
            Ok(self.hcsr04.measure_cm(timeout)?)
        }
    }

    pub struct HardwareBeam {
        beam: BreakBeam,
    }

    impl HardwareBeam {
        pub fn try_new(pin: u8) -> error::Result<Self> {
            let gpio = Gpio::new()?;
            let beam = BreakBeam::try_new(&gpio, pin)?;
            tracing::debug!(pin, "break-beam claimed");
            Ok(Self { beam })
        }
    }

    impl BeamSensor for HardwareBeam {
        fn is_broken(&mut self) -> Result<bool, BoxError> {
            Ok(self.beam.is_broken())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn door_swing_alternates_plateaus() {
        let mut r = SimulatedRanger::door_swing(3);
        let t = Duration::from_millis(1);
        let v: Vec<f32> = (0..6).map(|_| r.measure(t).unwrap()).collect();
        assert!(v[..3].iter().all(|&cm| cm < 35.0));
        assert!(v[3..].iter().all(|&cm| cm > 80.0));
        // wraps back to the closed plateau
        assert!(r.measure(t).unwrap() < 35.0);
    }

    #[test]
    fn ranger_injects_timeouts() {
        let mut r = SimulatedRanger::new(vec![50.0]).with_timeout_every(2);
        let t = Duration::from_millis(1);
        assert!(r.measure(t).is_ok());
        let err = r.measure(t).unwrap_err();
        assert!(err.to_string().contains("timeout"));
        assert!(r.measure(t).is_ok());
    }

    #[test]
    fn periodic_beam_pattern() {
        let mut b = SimulatedBeam::periodic(4, 1);
        let v: Vec<bool> = (0..8).map(|_| b.is_broken().unwrap()).collect();
        assert_eq!(v, [true, false, false, false, true, false, false, false]);
        let mut never = SimulatedBeam::never();
        assert!(!(0..10).any(|_| never.is_broken().unwrap()));
    }

    #[test]
    fn flaky_climate_fails_on_schedule() {
        let mut c = SimulatedClimate::fixed(20.0, 40.0).with_fail_every(3);
        assert_eq!(c.temperature_c().unwrap(), 20.0);
        assert_eq!(c.humidity_pct().unwrap(), 40.0);
        assert!(c.temperature_c().is_err());
        assert_eq!(c.humidity_pct().unwrap(), 40.0);
    }
}

//! HC-SR04 ultrasonic ranger on two GPIO lines.

use std::time::Duration;

use rppal::gpio::{Gpio, InputPin, OutputPin};
use tracing::trace;

use crate::error::Result;
use crate::util::{pulse_to_cm, time_echo_pulse};

const SETTLE: Duration = Duration::from_micros(20);
const TRIGGER_PULSE: Duration = Duration::from_micros(10);

pub struct Hcsr04 {
    trig: OutputPin,
    echo: InputPin,
    speed_cm_s: f32,
}

impl Hcsr04 {
    /// Claim the trigger and echo lines. Both are restored to their previous
    /// mode when the ranger is dropped.
    pub fn try_new(gpio: &Gpio, trig_pin: u8, echo_pin: u8, speed_cm_s: f32) -> Result<Self> {
        let mut trig = gpio.get(trig_pin)?.into_output_low();
        let mut echo = gpio.get(echo_pin)?.into_input();
        trig.set_reset_on_drop(true);
        echo.set_reset_on_drop(true);
        Ok(Self {
            trig,
            echo,
            speed_cm_s,
        })
    }

    pub fn measure_cm(&mut self, timeout: Duration) -> Result<f32> {
        self.trig.set_low();
        spin_for(SETTLE);
        self.trig.set_high();
        spin_for(TRIGGER_PULSE);
        self.trig.set_low();

        let echo = &self.echo;
        let pulse = time_echo_pulse(|| echo.is_high(), timeout, Duration::ZERO)?;
        let cm = pulse_to_cm(pulse, self.speed_cm_s);
        trace!(pulse_us = pulse.as_micros() as u64, cm, "hc-sr04 echo");
        Ok(cm)
    }
}

impl Drop for Hcsr04 {
    fn drop(&mut self) {
        self.trig.set_low();
    }
}

/// Microsecond delays are below the scheduler's sleep granularity.
#[inline(always)]
fn spin_for(d: Duration) {
    let until = std::time::Instant::now() + d;
    while std::time::Instant::now() < until {
        std::hint::spin_loop();
    }
}

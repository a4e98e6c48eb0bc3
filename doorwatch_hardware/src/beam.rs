//! IR break-beam receiver on a single pulled-up GPIO input.

use rppal::gpio::{Gpio, InputPin};

use crate::error::Result;

pub struct BreakBeam {
    pin: InputPin,
}

impl BreakBeam {
    pub fn try_new(gpio: &Gpio, pin: u8) -> Result<Self> {
        let mut pin = gpio.get(pin)?.into_input_pullup();
        pin.set_reset_on_drop(true);
        Ok(Self { pin })
    }

    /// The receiver pulls the line low while the beam is interrupted.
    #[inline]
    pub fn is_broken(&self) -> bool {
        self.pin.is_low()
    }
}

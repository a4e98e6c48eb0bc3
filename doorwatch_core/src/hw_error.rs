//! Classifies `Box<dyn Error>` from the `Ranger` boundary into an `EchoFault`.
//!
//! The traits in `doorwatch_traits` box their errors; with the
//! `hardware-errors` feature the driver's `HwError` is downcast precisely,
//! otherwise the message text decides.

use crate::sample::EchoFault;

pub fn classify_echo_error(e: &(dyn std::error::Error + 'static)) -> EchoFault {
    #[cfg(feature = "hardware-errors")]
    {
        use doorwatch_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::EchoStartTimeout => EchoFault::StartTimeout,
                HwError::EchoEndTimeout => EchoFault::EndTimeout,
                _ => EchoFault::Hardware,
            };
        }
    }

    let s = e.to_string().to_lowercase();
    if s.contains("timeout") || s.contains("timed out") {
        if s.contains("end") || s.contains("fall") {
            EchoFault::EndTimeout
        } else {
            EchoFault::StartTimeout
        }
    } else {
        EchoFault::Hardware
    }
}

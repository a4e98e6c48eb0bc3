//! Device assembly: real GPIO drivers with the `hardware` feature, simulated
//! devices otherwise.
//!
//! Simulation knobs (read once at startup):
//! - `DOORWATCH_SIM_PROFILE`: comma-separated distances (cm) replayed in a loop
//! - `DOORWATCH_SIM_DWELL`: samples per plateau of the default door swing
//! - `DOORWATCH_SIM_TIMEOUT_EVERY`: every n-th echo times out
//! - `DOORWATCH_SIM_BEAM`: `never` or `PERIOD:BROKEN_FOR` (in polls)
//! - `DOORWATCH_SIM_TEMP_C`, `DOORWATCH_SIM_HUMIDITY`: fixed climate reading

use doorwatch_config::Config;
use doorwatch_core::WatchError;
use doorwatch_hardware::IioClimate;
use doorwatch_traits::{BeamSensor, ClimateSensor, Ranger};
use eyre::Result;

pub struct Rig {
    pub ranger: Box<dyn Ranger>,
    pub beam: Box<dyn BeamSensor>,
    pub climate: Option<Box<dyn ClimateSensor>>,
    pub backend: &'static str,
}

/// Climate source from `[climate]`; a missing device directory is logged and
/// leaves the payload fields at "unknown".
fn open_iio(cfg: &Config) -> Option<Box<dyn ClimateSensor>> {
    let dir = cfg.climate.iio_device.as_deref()?;
    match IioClimate::probe(dir) {
        Ok(c) => {
            tracing::debug!(dir, "iio climate sensor found");
            Some(Box::new(c) as Box<dyn ClimateSensor>)
        }
        Err(e) => {
            tracing::warn!(dir, error = %e, "climate sensor unavailable; readings will be unknown");
            None
        }
    }
}

#[cfg(feature = "hardware")]
pub fn open(cfg: &Config) -> Result<Rig> {
    use doorwatch_hardware::{HardwareBeam, HardwareRanger};

    let ranger = HardwareRanger::try_new(
        cfg.pins.trigger,
        cfg.pins.echo,
        cfg.hardware.speed_of_sound_cm_s,
    )
    .map_err(|e| {
        WatchError::HardwareInit(format!(
            "open ranger pins (trigger {}, echo {}): {e}",
            cfg.pins.trigger, cfg.pins.echo
        ))
    })?;
    let beam = HardwareBeam::try_new(cfg.pins.beam).map_err(|e| {
        WatchError::HardwareInit(format!("open beam pin {}: {e}", cfg.pins.beam))
    })?;
    Ok(Rig {
        ranger: Box::new(ranger),
        beam: Box::new(beam),
        climate: open_climate(cfg)?,
        backend: "hardware",
    })
}

/// Live climate source without claiming any GPIO.
#[cfg(feature = "hardware")]
pub fn open_climate(cfg: &Config) -> Result<Option<Box<dyn ClimateSensor>>> {
    Ok(open_iio(cfg))
}

#[cfg(not(feature = "hardware"))]
pub fn open(cfg: &Config) -> Result<Rig> {
    use doorwatch_hardware::{SimulatedBeam, SimulatedRanger};

    let sim = SimEnv::from_env()?;
    let mut ranger = match sim.profile {
        Some(p) => SimulatedRanger::new(p),
        None => SimulatedRanger::door_swing(sim.dwell),
    };
    if let Some(n) = sim.timeout_every {
        ranger = ranger.with_timeout_every(n);
    }
    let beam = match sim.beam {
        Some((period, broken_for)) => SimulatedBeam::periodic(period, broken_for),
        None => SimulatedBeam::never(),
    };
    tracing::debug!(
        trigger = cfg.pins.trigger,
        echo = cfg.pins.echo,
        beam = cfg.pins.beam,
        "simulated devices (pins unused)"
    );
    Ok(Rig {
        ranger: Box::new(ranger),
        beam: Box::new(beam),
        climate: open_climate(cfg)?,
        backend: "sim",
    })
}

/// Live climate source without claiming any GPIO. A configured IIO device
/// wins over the simulated reading.
#[cfg(not(feature = "hardware"))]
pub fn open_climate(cfg: &Config) -> Result<Option<Box<dyn ClimateSensor>>> {
    use doorwatch_hardware::SimulatedClimate;

    if let Some(c) = open_iio(cfg) {
        return Ok(Some(c));
    }
    let sim = SimEnv::from_env()?;
    let sensor = SimulatedClimate::fixed(sim.temp_c, sim.humidity);
    Ok(Some(Box::new(sensor) as Box<dyn ClimateSensor>))
}

#[cfg(not(feature = "hardware"))]
#[derive(Debug, PartialEq)]
struct SimEnv {
    profile: Option<Vec<f32>>,
    dwell: usize,
    timeout_every: Option<usize>,
    beam: Option<(usize, usize)>,
    temp_c: f32,
    humidity: f32,
}

#[cfg(not(feature = "hardware"))]
impl SimEnv {
    fn from_env() -> Result<Self> {
        Self::parse(|k| std::env::var(k).ok())
    }

    fn parse(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        fn num<T: std::str::FromStr>(key: &str, v: &str) -> Result<T> {
            v.trim().parse::<T>().map_err(|_| {
                WatchError::Config(format!("{key}: cannot parse {v:?}")).into()
            })
        }

        let profile = get("DOORWATCH_SIM_PROFILE")
            .map(|s| {
                s.split(',')
                    .filter(|p| !p.trim().is_empty())
                    .map(|p| num::<f32>("DOORWATCH_SIM_PROFILE", p))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;
        let dwell = get("DOORWATCH_SIM_DWELL")
            .map(|v| num("DOORWATCH_SIM_DWELL", &v))
            .transpose()?
            .unwrap_or(30);
        let timeout_every = get("DOORWATCH_SIM_TIMEOUT_EVERY")
            .map(|v| num("DOORWATCH_SIM_TIMEOUT_EVERY", &v))
            .transpose()?;
        let beam = match get("DOORWATCH_SIM_BEAM").as_deref().map(str::trim) {
            None => Some((100, 3)),
            Some("never") => None,
            Some(raw) => {
                let (p, b) = raw.split_once(':').ok_or_else(|| {
                    WatchError::Config(format!(
                        "DOORWATCH_SIM_BEAM: expected never or PERIOD:BROKEN_FOR, got {raw:?}"
                    ))
                })?;
                Some((
                    num("DOORWATCH_SIM_BEAM", p)?,
                    num("DOORWATCH_SIM_BEAM", b)?,
                ))
            }
        };
        let temp_c = get("DOORWATCH_SIM_TEMP_C")
            .map(|v| num("DOORWATCH_SIM_TEMP_C", &v))
            .transpose()?
            .unwrap_or(21.5);
        let humidity = get("DOORWATCH_SIM_HUMIDITY")
            .map(|v| num("DOORWATCH_SIM_HUMIDITY", &v))
            .transpose()?
            .unwrap_or(45.0);
        Ok(Self {
            profile,
            dwell,
            timeout_every,
            beam,
            temp_c,
            humidity,
        })
    }
}

//! Temperature/humidity through the Linux IIO interface.
//!
//! The kernel `dht11` driver (which also handles DHT22) exposes one device
//! directory with `in_temp_input` in milli-degrees Celsius and
//! `in_humidityrelative_input` in milli-percent. Reads fail with EIO or
//! ETIMEDOUT whenever the sensor misses a handshake, which happens often;
//! callers are expected to treat every error as transient.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{HwError, Result};

pub const TEMP_FILE: &str = "in_temp_input";
pub const HUMIDITY_FILE: &str = "in_humidityrelative_input";

#[derive(Debug, Clone)]
pub struct IioClimate {
    dir: PathBuf,
}

impl IioClimate {
    /// Point at an IIO device directory, e.g. `/sys/bus/iio/devices/iio:device0`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Like `new`, but fails early if the directory lacks the expected channels.
    pub fn probe(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        for f in [TEMP_FILE, HUMIDITY_FILE] {
            if !dir.join(f).exists() {
                return Err(HwError::Climate(format!(
                    "{} has no {f} channel",
                    dir.display()
                )));
            }
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn temperature_c(&self) -> Result<f32> {
        read_milli(&self.dir.join(TEMP_FILE))
    }

    pub fn humidity_pct(&self) -> Result<f32> {
        read_milli(&self.dir.join(HUMIDITY_FILE))
    }
}

fn read_milli(path: &Path) -> Result<f32> {
    let raw = fs::read_to_string(path)?;
    let milli: i64 = raw
        .trim()
        .parse()
        .map_err(|e| HwError::Climate(format!("{}: {e}", path.display())))?;
    Ok(milli as f32 / 1000.0)
}

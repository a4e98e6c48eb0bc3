//! Last-known-good temperature and humidity.

use doorwatch_traits::ClimateSensor;

use crate::util::fmt_or_unknown;

/// Latest environmental values; `None` until the first good read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnvironmentalReading {
    pub temperature_f: Option<f32>,
    pub humidity_pct: Option<f32>,
}

impl EnvironmentalReading {
    /// One decimal, or "unknown".
    pub fn temperature_field(&self) -> String {
        fmt_or_unknown(self.temperature_f, 1)
    }

    /// Whole percent, or "unknown".
    pub fn humidity_field(&self) -> String {
        fmt_or_unknown(self.humidity_pct, 0)
    }
}

#[inline]
pub fn celsius_to_fahrenheit(c: f32) -> f32 {
    c * (9.0 / 5.0) + 32.0
}

/// Owned by the loop; only successful reads change it.
#[derive(Debug, Clone, Default)]
pub struct SensorCache {
    last: EnvironmentalReading,
}

impl SensorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> EnvironmentalReading {
        self.last
    }

    /// Overwrite each field that carries a finite value; keep the rest.
    pub fn update(&mut self, temperature_f: Option<f32>, humidity_pct: Option<f32>) {
        if let Some(t) = temperature_f.filter(|v| v.is_finite()) {
            self.last.temperature_f = Some(t);
        }
        if let Some(h) = humidity_pct.filter(|v| v.is_finite()) {
            self.last.humidity_pct = Some(h);
        }
    }

    /// Take a live reading, falling back per field to the cached value.
    pub fn refresh(&mut self, sensor: &mut dyn ClimateSensor) -> EnvironmentalReading {
        let temperature_f = match sensor.temperature_c() {
            Ok(c) => Some(celsius_to_fahrenheit(c)),
            Err(e) => {
                tracing::warn!(error = %e, "temperature read failed; using cached value");
                None
            }
        };
        let humidity_pct = match sensor.humidity_pct() {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::warn!(error = %e, "humidity read failed; using cached value");
                None
            }
        };
        self.update(temperature_f, humidity_pct);
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_celsius() {
        assert!((celsius_to_fahrenheit(20.0) - 68.0).abs() < 1e-4);
        assert!((celsius_to_fahrenheit(-40.0) + 40.0).abs() < 1e-4);
    }

    #[test]
    fn update_keeps_fields_independent() {
        let mut c = SensorCache::new();
        c.update(Some(70.0), None);
        assert_eq!(c.read().temperature_f, Some(70.0));
        assert_eq!(c.read().humidity_pct, None);
        c.update(None, Some(40.0));
        c.update(Some(f32::NAN), None);
        assert_eq!(
            c.read(),
            EnvironmentalReading {
                temperature_f: Some(70.0),
                humidity_pct: Some(40.0)
            }
        );
    }

    #[test]
    fn fields_render_unknown_until_read() {
        let r = SensorCache::new().read();
        assert_eq!(r.temperature_field(), "unknown");
        assert_eq!(r.humidity_field(), "unknown");
    }
}

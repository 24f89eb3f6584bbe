/// Development mode utilities for working without a connected device.
///
/// When no live sensor is available, use this module to generate
/// realistic synthetic readings for testing and development. Values follow
/// a daily cycle with bounded noise, matching the shape of real deployment
/// data closely enough to exercise the full prediction pipeline.

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::jitter::JitterSource;
use crate::model::{Metric, SensorReading, StoreError};
use crate::store::{MemoryStore, ReadingStore};

/// Configuration for synthetic data generation
pub struct DevMode {
    /// Interval between generated readings, in seconds (default: 900 = 15 minutes)
    pub reading_interval_secs: i64,
}

impl Default for DevMode {
    fn default() -> Self {
        Self {
            reading_interval_secs: 900,
        }
    }
}

impl DevMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Synthetic TDS reading for a point in time: a daily sine cycle around
    /// 180 ppm with up to ±20 ppm of noise.
    pub fn synthetic_tds(&self, at: DateTime<Utc>, jitter: &mut dyn JitterSource) -> f64 {
        let hour = f64::from(at.hour());
        180.0 + (hour * 0.26).sin() * 50.0 + jitter.draw() * 20.0
    }

    /// Synthetic turbidity reading: a daily cycle around 1.2 NTU with up to
    /// 0.2 NTU of additive noise (noise is one-sided, like sensor drift).
    pub fn synthetic_turbidity(&self, at: DateTime<Utc>, jitter: &mut dyn JitterSource) -> f64 {
        let hour = f64::from(at.hour());
        1.2 + (hour * 0.3).sin() * 0.8 + (jitter.draw().abs()) * 0.2
    }

    /// Builds an in-memory store preloaded with `count` synthetic readings
    /// per metric, newest at `now`, spaced at the configured interval.
    pub fn seed_store(
        &self,
        now: DateTime<Utc>,
        count: usize,
        jitter: &mut dyn JitterSource,
    ) -> Result<MemoryStore, StoreError> {
        let mut store = MemoryStore::new();
        for i in 0..count {
            let at = now - Duration::seconds(self.reading_interval_secs * i as i64);
            store.append(
                Metric::Tds,
                &SensorReading {
                    value: self.synthetic_tds(at, jitter),
                    observed_at: at,
                },
            )?;
            store.append(
                Metric::Turbidity,
                &SensorReading {
                    value: self.synthetic_turbidity(at, jitter),
                    observed_at: at,
                },
            )?;
        }
        Ok(store)
    }
}

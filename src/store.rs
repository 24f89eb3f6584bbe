/// Reading store access.
///
/// The store is an external collaborator: this module defines the access
/// trait the pipeline is written against, a Postgres-backed implementation
/// for production, and an in-memory implementation for tests and dev mode.
/// The trait is injected explicitly — no process-wide connection state.

use chrono::{DateTime, Utc};
use postgres::Client;

use crate::model::{Metric, SensorReading, StoreError};

/// Read/append access to the per-metric reading series.
///
/// `history` returns readings ordered newest first; this ordering is part
/// of the contract and the fallback estimator's slope sign depends on it.
pub trait ReadingStore {
    /// Most recent reading for the metric, if any.
    fn latest(&mut self, metric: Metric) -> Result<Option<SensorReading>, StoreError>;

    /// Up to `limit` most recent readings, newest first.
    fn history(&mut self, metric: Metric, limit: usize) -> Result<Vec<SensorReading>, StoreError>;

    /// Appends a reading and returns its row id. The store enforces
    /// idempotency keyed by (metric, timestamp) — a duplicate append from a
    /// racing writer is the store's problem to reject, not ours to detect.
    fn append(&mut self, metric: Metric, reading: &SensorReading) -> Result<i64, StoreError>;
}

// ---------------------------------------------------------------------------
// Postgres implementation
// ---------------------------------------------------------------------------

/// Reading store backed by the sensor database.
///
/// Each metric has its own table, matching the deployed schema:
/// `tds_readings(tds_value, reading_time)` and
/// `turbidity_readings(ntu_value, reading_time)`.
pub struct PgReadingStore {
    client: Client,
}

impl PgReadingStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    fn table(metric: Metric) -> &'static str {
        match metric {
            Metric::Tds => "tds_readings",
            Metric::Turbidity => "turbidity_readings",
        }
    }

    fn value_column(metric: Metric) -> &'static str {
        match metric {
            Metric::Tds => "tds_value",
            Metric::Turbidity => "ntu_value",
        }
    }
}

impl ReadingStore for PgReadingStore {
    fn latest(&mut self, metric: Metric) -> Result<Option<SensorReading>, StoreError> {
        let query = format!(
            "SELECT {}, reading_time FROM {} ORDER BY reading_time DESC LIMIT 1",
            Self::value_column(metric),
            Self::table(metric),
        );

        let rows = self
            .client
            .query(&query, &[])
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows.first().map(|row| SensorReading {
            value: row.get(0),
            observed_at: row.get::<_, DateTime<Utc>>(1),
        }))
    }

    fn history(&mut self, metric: Metric, limit: usize) -> Result<Vec<SensorReading>, StoreError> {
        let query = format!(
            "SELECT {}, reading_time FROM {} ORDER BY reading_time DESC LIMIT $1",
            Self::value_column(metric),
            Self::table(metric),
        );

        let rows = self
            .client
            .query(&query, &[&(limit as i64)])
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| SensorReading {
                value: row.get(0),
                observed_at: row.get::<_, DateTime<Utc>>(1),
            })
            .collect())
    }

    fn append(&mut self, metric: Metric, reading: &SensorReading) -> Result<i64, StoreError> {
        // ON CONFLICT keyed by reading_time is the idempotent-write backstop
        // for concurrent pollers that race past the in-memory dedup check.
        let query = format!(
            "INSERT INTO {} ({}, reading_time) VALUES ($1, $2)
             ON CONFLICT (reading_time) DO UPDATE SET {} = EXCLUDED.{}
             RETURNING id",
            Self::table(metric),
            Self::value_column(metric),
            Self::value_column(metric),
            Self::value_column(metric),
        );

        let row = self
            .client
            .query_one(&query, &[&reading.value, &reading.observed_at])
            .map_err(|e| StoreError::Query(e.to_string()))?;

        Ok(row.get::<_, i64>(0))
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-memory reading store for tests and offline development.
///
/// Readings are kept sorted newest first, mirroring the ordering contract
/// of the Postgres implementation.
#[derive(Default)]
pub struct MemoryStore {
    tds: Vec<SensorReading>,
    turbidity: Vec<SensorReading>,
    next_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store preloaded with per-metric histories given newest
    /// first, stamped at one-hour intervals ending at `newest_at`.
    pub fn with_series(
        tds_newest_first: &[f64],
        turbidity_newest_first: &[f64],
        newest_at: DateTime<Utc>,
    ) -> Self {
        let stamp = |values: &[f64]| -> Vec<SensorReading> {
            values
                .iter()
                .enumerate()
                .map(|(i, &value)| SensorReading {
                    value,
                    observed_at: newest_at - chrono::Duration::hours(i as i64),
                })
                .collect()
        };
        Self {
            tds: stamp(tds_newest_first),
            turbidity: stamp(turbidity_newest_first),
            next_id: 1,
        }
    }

    fn series(&self, metric: Metric) -> &Vec<SensorReading> {
        match metric {
            Metric::Tds => &self.tds,
            Metric::Turbidity => &self.turbidity,
        }
    }

    fn series_mut(&mut self, metric: Metric) -> &mut Vec<SensorReading> {
        match metric {
            Metric::Tds => &mut self.tds,
            Metric::Turbidity => &mut self.turbidity,
        }
    }
}

impl ReadingStore for MemoryStore {
    fn latest(&mut self, metric: Metric) -> Result<Option<SensorReading>, StoreError> {
        Ok(self.series(metric).first().cloned())
    }

    fn history(&mut self, metric: Metric, limit: usize) -> Result<Vec<SensorReading>, StoreError> {
        Ok(self.series(metric).iter().take(limit).cloned().collect())
    }

    fn append(&mut self, metric: Metric, reading: &SensorReading) -> Result<i64, StoreError> {
        let series = self.series_mut(metric);
        // Idempotent-write backstop: same timestamp overwrites in place.
        if let Some(existing) = series
            .iter_mut()
            .find(|r| r.observed_at == reading.observed_at)
        {
            existing.value = reading.value;
        } else {
            series.push(reading.clone());
            series.sort_by(|a, b| b.observed_at.cmp(&a.observed_at));
        }
        self.next_id += 1;
        Ok(self.next_id - 1)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

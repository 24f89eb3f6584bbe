/// Sensor reading ingestion.
///
/// Wire types for the ingestion endpoint and the submit flow that runs an
/// observed reading through the dedup guard before forwarding it to the
/// store. Skips are normal outcomes, not errors; only a store failure
/// propagates.

pub mod dedup;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logging::{self, Component};
use crate::model::{Metric, SensorReading, StoreError};
use crate::store::ReadingStore;
use dedup::{DedupGuard, SubmissionDecision};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Body of the ingestion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub tds_value: f64,
    pub turbidity_value: f64,
    /// Timestamp the device attached to the reading.
    pub timestamp: DateTime<Utc>,
}

/// Result reported back to the submitting client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase", tag = "status", content = "reason")]
pub enum IngestOutcome {
    Accepted,
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SkipReason {
    Invalid,
    Duplicate,
    Throttled,
}

// ---------------------------------------------------------------------------
// Submit flow
// ---------------------------------------------------------------------------

/// Runs one observed reading through the guard and, if it passes, appends
/// both metric values to the store and overwrites the fingerprint.
///
/// The fingerprint is only updated after both appends succeed, so a store
/// failure leaves the guard ready to retry on the next poll cycle.
pub fn submit_reading_at(
    store: &mut dyn ReadingStore,
    guard: &mut DedupGuard,
    request: &IngestRequest,
    now: DateTime<Utc>,
) -> Result<IngestOutcome, StoreError> {
    let decision = guard.evaluate_at(
        request.tds_value,
        request.turbidity_value,
        request.timestamp,
        now,
    );

    let reason = match decision {
        SubmissionDecision::Forward => {
            store.append(
                Metric::Tds,
                &SensorReading {
                    value: request.tds_value,
                    observed_at: request.timestamp,
                },
            )?;
            store.append(
                Metric::Turbidity,
                &SensorReading {
                    value: request.turbidity_value,
                    observed_at: request.timestamp,
                },
            )?;
            guard.record_forwarded_at(
                request.tds_value,
                request.turbidity_value,
                request.timestamp,
                now,
            );
            logging::info(
                Component::Ingest,
                None,
                &format!(
                    "Forwarded reading: tds={} turbidity={} observed_at={}",
                    request.tds_value, request.turbidity_value, request.timestamp
                ),
            );
            return Ok(IngestOutcome::Accepted);
        }
        SubmissionDecision::SkippedInvalid => SkipReason::Invalid,
        SubmissionDecision::SkippedDuplicate => SkipReason::Duplicate,
        SubmissionDecision::SkippedThrottled => SkipReason::Throttled,
    };

    logging::info(
        Component::Ingest,
        None,
        &format!("Skipped reading [{}]", decision),
    );
    Ok(IngestOutcome::Skipped(reason))
}

/// Convenience wrapper that uses the real current time.
pub fn submit_reading(
    store: &mut dyn ReadingStore,
    guard: &mut DedupGuard,
    request: &IngestRequest,
) -> Result<IngestOutcome, StoreError> {
    submit_reading_at(store, guard, request, Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn request(tds: f64, turbidity: f64, ts: DateTime<Utc>) -> IngestRequest {
        IngestRequest {
            tds_value: tds,
            turbidity_value: turbidity,
            timestamp: ts,
        }
    }

    #[test]
    fn test_accepted_reading_lands_in_both_series() {
        let mut store = MemoryStore::new();
        let mut guard = DedupGuard::new(30);
        let ts = fixed_now() - chrono::Duration::minutes(1);

        let outcome =
            submit_reading_at(&mut store, &mut guard, &request(250.0, 0.8, ts), fixed_now())
                .unwrap();

        assert_eq!(outcome, IngestOutcome::Accepted);
        assert_eq!(store.latest(Metric::Tds).unwrap().unwrap().value, 250.0);
        assert_eq!(store.latest(Metric::Turbidity).unwrap().unwrap().value, 0.8);
    }

    #[test]
    fn test_skipped_reading_leaves_store_untouched() {
        let mut store = MemoryStore::new();
        let mut guard = DedupGuard::new(30);
        let ts = fixed_now() - chrono::Duration::minutes(1);

        let outcome =
            submit_reading_at(&mut store, &mut guard, &request(-1.0, 0.8, ts), fixed_now())
                .unwrap();

        assert_eq!(outcome, IngestOutcome::Skipped(SkipReason::Invalid));
        assert_eq!(store.latest(Metric::Tds).unwrap(), None);
        assert!(guard.fingerprint().is_none(), "skip must not touch the fingerprint");
    }

    #[test]
    fn test_resubmitting_same_reading_is_duplicate() {
        let mut store = MemoryStore::new();
        let mut guard = DedupGuard::new(30);
        let ts = fixed_now() - chrono::Duration::minutes(1);
        let req = request(250.0, 0.8, ts);

        submit_reading_at(&mut store, &mut guard, &req, fixed_now()).unwrap();
        let second = submit_reading_at(
            &mut store,
            &mut guard,
            &req,
            fixed_now() + chrono::Duration::seconds(60),
        )
        .unwrap();

        assert_eq!(second, IngestOutcome::Skipped(SkipReason::Duplicate));
        assert_eq!(store.history(Metric::Tds, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_ingest_outcome_wire_shape() {
        let accepted = serde_json::to_value(IngestOutcome::Accepted).unwrap();
        assert_eq!(accepted["status"], "accepted");

        let throttled =
            serde_json::to_value(IngestOutcome::Skipped(SkipReason::Throttled)).unwrap();
        assert_eq!(throttled["status"], "skipped");
        assert_eq!(throttled["reason"], "throttled");
    }
}

/// Ingestion deduplication and submission throttling.
///
/// The sensor dashboard re-polls the device every few seconds, so the same
/// reading is observed many times between device updates. The guard in this
/// module decides whether an observed reading should be forwarded to the
/// store, against a single persisted fingerprint of the last accepted
/// submission.
///
/// # Clock injection
/// All decision functions accept a `now: DateTime<Utc>` parameter rather
/// than calling `Utc::now()` internally. This makes the throttle purely
/// deterministic in tests without mocking or time manipulation.

use chrono::{DateTime, Duration, Utc};

/// Sentinel value reported by the device when no water is detected.
pub const NO_WATER_SENTINEL: f64 = -1.0;

/// Default minimum gap between forwarded submissions, in seconds.
pub const DEFAULT_MIN_INTERVAL_SECS: i64 = 30;

// ---------------------------------------------------------------------------
// Fingerprint
// ---------------------------------------------------------------------------

/// The last accepted submission. Owned exclusively by the guard; mutated
/// only on a successful forward, never deleted — only overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionFingerprint {
    pub tds_value: f64,
    pub turbidity_value: f64,
    /// Timestamp the device attached to the reading.
    pub source_timestamp: DateTime<Utc>,
    /// Wall-clock time the submission was forwarded.
    pub submitted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Outcome of evaluating one observed reading. Skips are normal, loggable
/// no-ops — never errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionDecision {
    Forward,
    /// One or both values are non-positive (including the -1 no-water
    /// sentinel).
    SkippedInvalid,
    /// Exact (tds, turbidity, source timestamp) match with the fingerprint.
    SkippedDuplicate,
    /// Less than the minimum interval since the last forwarded submission.
    /// Applies even when the values differ — a blanket rate limit, not
    /// purely a duplicate filter.
    SkippedThrottled,
}

impl std::fmt::Display for SubmissionDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionDecision::Forward => write!(f, "forward"),
            SubmissionDecision::SkippedInvalid => write!(f, "skipped(invalid)"),
            SubmissionDecision::SkippedDuplicate => write!(f, "skipped(duplicate)"),
            SubmissionDecision::SkippedThrottled => write!(f, "skipped(throttled)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Guard
// ---------------------------------------------------------------------------

/// Stateful guard over the submission fingerprint. Single-writer state:
/// concurrent pollers can race past this check, so the store's idempotent
/// append keyed by (metric, timestamp) remains the authoritative backstop.
pub struct DedupGuard {
    fingerprint: Option<SubmissionFingerprint>,
    min_interval: Duration,
}

impl DedupGuard {
    pub fn new(min_interval_secs: i64) -> Self {
        Self {
            fingerprint: None,
            min_interval: Duration::seconds(min_interval_secs),
        }
    }

    /// Restores a guard from a persisted fingerprint, e.g. after a restart.
    pub fn with_fingerprint(min_interval_secs: i64, fingerprint: SubmissionFingerprint) -> Self {
        Self {
            fingerprint: Some(fingerprint),
            min_interval: Duration::seconds(min_interval_secs),
        }
    }

    pub fn fingerprint(&self) -> Option<&SubmissionFingerprint> {
        self.fingerprint.as_ref()
    }

    /// Decides whether a reading should be forwarded, at the given wall
    /// clock. Checks run in fixed order: validity, duplicate, throttle.
    pub fn evaluate_at(
        &self,
        tds_value: f64,
        turbidity_value: f64,
        source_timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> SubmissionDecision {
        if tds_value <= 0.0 || turbidity_value <= 0.0 {
            return SubmissionDecision::SkippedInvalid;
        }

        if let Some(last) = &self.fingerprint {
            if last.tds_value == tds_value
                && last.turbidity_value == turbidity_value
                && last.source_timestamp == source_timestamp
            {
                return SubmissionDecision::SkippedDuplicate;
            }

            if now - last.submitted_at < self.min_interval {
                return SubmissionDecision::SkippedThrottled;
            }
        }

        SubmissionDecision::Forward
    }

    /// Convenience wrapper that uses the real current time.
    /// Use `evaluate_at` in tests to keep them deterministic.
    pub fn evaluate(
        &self,
        tds_value: f64,
        turbidity_value: f64,
        source_timestamp: DateTime<Utc>,
    ) -> SubmissionDecision {
        self.evaluate_at(tds_value, turbidity_value, source_timestamp, Utc::now())
    }

    /// Overwrites the fingerprint after a successful forward. Callers must
    /// only invoke this once the store append has succeeded.
    pub fn record_forwarded_at(
        &mut self,
        tds_value: f64,
        turbidity_value: f64,
        source_timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    ) {
        self.fingerprint = Some(SubmissionFingerprint {
            tds_value,
            turbidity_value,
            source_timestamp,
            submitted_at: now,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// A fixed "now" used across all tests: 2025-06-01 12:00:00 UTC.
    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn source_ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 11, 59, 0).unwrap()
    }

    fn forwarded_guard(submitted_at: DateTime<Utc>) -> DedupGuard {
        let mut guard = DedupGuard::new(DEFAULT_MIN_INTERVAL_SECS);
        guard.record_forwarded_at(250.0, 0.8, source_ts(), submitted_at);
        guard
    }

    // --- First submission -----------------------------------------------------

    #[test]
    fn test_first_valid_reading_is_forwarded() {
        let guard = DedupGuard::new(DEFAULT_MIN_INTERVAL_SECS);
        let decision = guard.evaluate_at(250.0, 0.8, source_ts(), fixed_now());
        assert_eq!(decision, SubmissionDecision::Forward);
    }

    // --- Validity --------------------------------------------------------------

    #[test]
    fn test_no_water_sentinel_is_invalid() {
        let guard = DedupGuard::new(DEFAULT_MIN_INTERVAL_SECS);
        let decision = guard.evaluate_at(NO_WATER_SENTINEL, 0.8, source_ts(), fixed_now());
        assert_eq!(decision, SubmissionDecision::SkippedInvalid);
    }

    #[test]
    fn test_zero_or_negative_values_are_invalid() {
        let guard = DedupGuard::new(DEFAULT_MIN_INTERVAL_SECS);
        assert_eq!(
            guard.evaluate_at(0.0, 0.8, source_ts(), fixed_now()),
            SubmissionDecision::SkippedInvalid
        );
        assert_eq!(
            guard.evaluate_at(250.0, -0.5, source_ts(), fixed_now()),
            SubmissionDecision::SkippedInvalid
        );
    }

    #[test]
    fn test_invalid_check_precedes_duplicate_and_throttle() {
        // Even a reading identical to the fingerprint reports invalid, not
        // duplicate, when a value is non-positive.
        let mut guard = DedupGuard::new(DEFAULT_MIN_INTERVAL_SECS);
        guard.record_forwarded_at(-1.0, 0.8, source_ts(), fixed_now());
        let decision = guard.evaluate_at(-1.0, 0.8, source_ts(), fixed_now());
        assert_eq!(decision, SubmissionDecision::SkippedInvalid);
    }

    // --- Duplicates ------------------------------------------------------------

    #[test]
    fn test_exact_triple_match_is_duplicate() {
        let guard = forwarded_guard(fixed_now() - Duration::seconds(120));
        // Well past the throttle window, so the skip is purely the
        // duplicate check.
        let decision = guard.evaluate_at(250.0, 0.8, source_ts(), fixed_now());
        assert_eq!(decision, SubmissionDecision::SkippedDuplicate);
    }

    #[test]
    fn test_changed_source_timestamp_is_not_a_duplicate() {
        let guard = forwarded_guard(fixed_now() - Duration::seconds(120));
        let newer_ts = source_ts() + Duration::minutes(5);
        let decision = guard.evaluate_at(250.0, 0.8, newer_ts, fixed_now());
        assert_eq!(decision, SubmissionDecision::Forward);
    }

    // --- Throttle ---------------------------------------------------------------

    #[test]
    fn test_differing_values_within_window_are_throttled() {
        // Intentional blanket rate limit: new, differing readings are still
        // held back inside the minimum interval.
        let guard = forwarded_guard(fixed_now() - Duration::seconds(10));
        let newer_ts = source_ts() + Duration::minutes(1);
        let decision = guard.evaluate_at(260.0, 0.9, newer_ts, fixed_now());
        assert_eq!(decision, SubmissionDecision::SkippedThrottled);
    }

    #[test]
    fn test_exactly_at_window_boundary_is_forwarded() {
        // The gap must be >= the interval; exactly 30s passes.
        let guard = forwarded_guard(fixed_now() - Duration::seconds(30));
        let newer_ts = source_ts() + Duration::minutes(1);
        let decision = guard.evaluate_at(260.0, 0.9, newer_ts, fixed_now());
        assert_eq!(decision, SubmissionDecision::Forward);
    }

    #[test]
    fn test_throttle_window_is_configurable() {
        let mut guard = DedupGuard::new(60);
        guard.record_forwarded_at(250.0, 0.8, source_ts(), fixed_now() - Duration::seconds(45));
        let newer_ts = source_ts() + Duration::minutes(1);
        assert_eq!(
            guard.evaluate_at(260.0, 0.9, newer_ts, fixed_now()),
            SubmissionDecision::SkippedThrottled,
            "45s gap must still be throttled under a 60s policy"
        );
    }

    // --- Fingerprint lifecycle ---------------------------------------------------

    #[test]
    fn test_record_forwarded_overwrites_fingerprint() {
        let mut guard = forwarded_guard(fixed_now() - Duration::seconds(120));
        let newer_ts = source_ts() + Duration::minutes(5);
        guard.record_forwarded_at(300.0, 1.2, newer_ts, fixed_now());

        let fp = guard.fingerprint().expect("fingerprint must persist");
        assert_eq!(fp.tds_value, 300.0);
        assert_eq!(fp.turbidity_value, 1.2);
        assert_eq!(fp.source_timestamp, newer_ts);
        assert_eq!(fp.submitted_at, fixed_now());
    }
}

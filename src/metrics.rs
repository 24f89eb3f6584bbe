/// Metric registry for the water-quality monitoring service.
///
/// Defines the canonical per-metric constants: physical domain bounds,
/// fallback-estimator coefficients, alert threshold bands, quality-score
/// penalty tiers, and WHO guideline limits. This is the single source of
/// truth for metric parameters — all other modules should reference specs
/// from here rather than hardcoding numbers.

use crate::model::Metric;

// ---------------------------------------------------------------------------
// Metric metadata
// ---------------------------------------------------------------------------

/// Everything the pipeline needs to know about one metric.
pub struct MetricSpec {
    pub metric: Metric,
    /// Measurement unit, for display and logging.
    pub unit: &'static str,
    /// Physical lower bound for predicted values. Predictions are clamped
    /// into [domain_min, domain_max] after jitter is applied.
    pub domain_min: f64,
    pub domain_max: f64,
    /// Fallback jitter magnitude as a fraction of the current reading.
    pub variation_coefficient: f64,
    /// Confidence interval half-width as a fraction of the predicted value.
    pub interval_coefficient: f64,
    /// Predicted values strictly above this emit a warning alert.
    pub warning_threshold: f64,
    /// Predicted values strictly above this emit a critical alert.
    /// Checked before the warning threshold; first match wins per metric.
    pub critical_threshold: f64,
    /// Quality-score deductions as (exclusive lower bound, penalty) pairs,
    /// ordered from highest bound to lowest. The first tier whose bound the
    /// predicted value exceeds is applied; at most one tier per metric.
    pub penalty_tiers: &'static [(f64, f64)],
    /// WHO guideline limit. Values at or below the limit are compliant.
    pub who_limit: f64,
}

/// Both monitored metrics, TDS first. Evaluation order matters for the
/// alert generator, which walks this registry in order.
///
/// Sources:
///   - WHO limits: WHO Guidelines for Drinking-water Quality (TDS 500 mg/L,
///     turbidity 1.0 NTU).
///   - Domain bounds and coefficients: observed operating range of the
///     deployed ESP32 sensor package.
pub static METRIC_REGISTRY: &[MetricSpec] = &[
    MetricSpec {
        metric: Metric::Tds,
        unit: "ppm",
        domain_min: 50.0,
        domain_max: 800.0,
        variation_coefficient: 0.05,
        interval_coefficient: 0.10,
        warning_threshold: 300.0,
        critical_threshold: 400.0,
        penalty_tiers: &[(400.0, 30.0), (300.0, 20.0), (200.0, 10.0)],
        who_limit: 500.0,
    },
    MetricSpec {
        metric: Metric::Turbidity,
        unit: "NTU",
        domain_min: 0.1,
        domain_max: 15.0,
        variation_coefficient: 0.08,
        interval_coefficient: 0.15,
        warning_threshold: 3.0,
        critical_threshold: 5.0,
        penalty_tiers: &[(5.0, 40.0), (3.0, 25.0), (1.5, 10.0)],
        who_limit: 1.0,
    },
];

/// Looks up the spec for a metric. Both metrics are always present, so this
/// never fails for a valid `Metric` value.
pub fn spec_for(metric: Metric) -> &'static MetricSpec {
    METRIC_REGISTRY
        .iter()
        .find(|s| s.metric == metric)
        .expect("every Metric variant has a registry entry")
}

/// Clamps a predicted value into the metric's physical domain.
pub fn clamp_to_domain(spec: &MetricSpec, value: f64) -> f64 {
    value.clamp(spec.domain_min, spec.domain_max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Threshold-band alert generation.
//!
//! Evaluates predicted metric values against the registry's warning and
//! critical bands and emits typed alerts in a fixed order: TDS first, then
//! turbidity, then the composite-score check. At most one alert per metric
//! per evaluation (critical checked before warning, first match wins); the
//! composite check is independent and can add one more. The output is an
//! ordered, non-deduplicated list — co-occurring alerts are expected.

use crate::metrics::{self, MetricSpec};
use crate::model::{Alert, AlertSeverity, Metric, QualityRisk};

/// Composite scores below this add a standalone critical alert.
pub const UNSAFE_SCORE_THRESHOLD: f64 = 40.0;

/// Alert message per metric and severity. Fixed copy shown to field
/// operators; the dashboard matches on it.
fn message_for(metric: Metric, severity: AlertSeverity) -> &'static str {
    match (metric, severity) {
        (Metric::Tds, AlertSeverity::Critical) => {
            "High TDS levels detected. Water may be unsafe for consumption."
        }
        (Metric::Tds, AlertSeverity::Warning) => {
            "Elevated TDS levels. Monitor water quality closely."
        }
        (Metric::Turbidity, AlertSeverity::Critical) => {
            "High turbidity detected. Water treatment may be required."
        }
        (Metric::Turbidity, AlertSeverity::Warning) => {
            "Elevated turbidity levels. Consider water treatment."
        }
    }
}

/// Checks one predicted value against its metric's bands. Critical is
/// checked first; a value above both bands yields only the critical alert.
pub fn check_metric(spec: &MetricSpec, predicted: f64) -> Option<Alert> {
    let severity = if predicted > spec.critical_threshold {
        AlertSeverity::Critical
    } else if predicted > spec.warning_threshold {
        AlertSeverity::Warning
    } else {
        return None;
    };

    Some(Alert {
        severity,
        message: message_for(spec.metric, severity).to_string(),
    })
}

/// Evaluates a full prediction: per-metric bands in registry order, then
/// the composite score.
pub fn evaluate(
    predicted_tds: f64,
    predicted_turbidity: f64,
    quality: &QualityRisk,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(alert) = check_metric(metrics::spec_for(Metric::Tds), predicted_tds) {
        alerts.push(alert);
    }
    if let Some(alert) = check_metric(metrics::spec_for(Metric::Turbidity), predicted_turbidity) {
        alerts.push(alert);
    }

    if quality.quality_score < UNSAFE_SCORE_THRESHOLD {
        alerts.push(Alert {
            severity: AlertSeverity::Critical,
            message: "Water quality is below safe standards. Immediate action required."
                .to_string(),
        });
    }

    alerts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

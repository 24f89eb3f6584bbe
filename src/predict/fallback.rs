/// Local fallback estimator.
///
/// Produces a forecast from recent history when the model service is
/// unavailable: linear trend extrapolation with a bounded perturbation.
/// Deliberately simple — the poll cadence re-runs it every few seconds, so
/// a cheap estimate that degrades gracefully beats a clever one that can
/// stall the loop. Pure computation, no I/O.

use crate::jitter::JitterSource;
use crate::metrics::{self, MetricSpec};
use crate::model::{MetricForecast, Trend};

/// Hourly trend slope from a newest-first history window.
///
/// `(values[0] - values[last]) / count` — the sign convention matters: a
/// numerically decreasing recent history (older readings larger) yields a
/// negative slope and a downward prediction. Fewer than two samples means
/// no observable trend.
pub fn trend_slope(values_newest_first: &[f64]) -> f64 {
    if values_newest_first.len() < 2 {
        return 0.0;
    }
    let first = values_newest_first[0];
    let last = values_newest_first[values_newest_first.len() - 1];
    (first - last) / values_newest_first.len() as f64
}

/// Extrapolates a forecast for one metric.
///
/// `history` is the newest-first reading window (current value at index 0,
/// at most the configured window size). Must be non-empty — callers resolve
/// the empty-store case before reaching here.
pub fn estimate(
    spec: &MetricSpec,
    history: &[f64],
    horizon_hours: u32,
    jitter: &mut dyn JitterSource,
) -> MetricForecast {
    let current = history[0];
    let slope = trend_slope(history);

    let mut predicted = current + slope * f64::from(horizon_hours);

    // Bounded perturbation scaled by the current reading, then clamp into
    // the metric's physical domain.
    predicted += jitter.draw() * (current * spec.variation_coefficient);
    predicted = metrics::clamp_to_domain(spec, predicted);

    // Strict comparison, no epsilon.
    let trend = if predicted > current {
        Trend::Increasing
    } else if predicted < current {
        Trend::Decreasing
    } else {
        Trend::Stable
    };

    let interval = predicted * spec.interval_coefficient;

    MetricForecast {
        current,
        predicted,
        trend,
        confidence_lower: predicted - interval,
        confidence_upper: predicted + interval,
        horizon_hours,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Prediction orchestration.
///
/// Composes the model service client, fallback estimator, quality
/// classifier, and alert generator into one request/response cycle. The
/// model service gets exactly one attempt per request — the caller already
/// re-polls on a fixed cadence, so there is no internal retry. Its failure
/// is never surfaced as an error; the result is tagged `fallback` and the
/// failure is logged with classification. A store read failure is the one
/// error this module propagates.
///
/// Submodules:
/// - `client` — model service HTTP client with hard timeout budgets.
/// - `fallback` — local linear-trend estimator.

pub mod client;
pub mod fallback;

use crate::alert::thresholds;
use crate::analysis::quality;
use crate::config::{self, ServiceConfig};
use crate::jitter::JitterSource;
use crate::logging;
use crate::metrics;
use crate::model::{
    Metric, MetricForecast, PredictionResponse, PredictionSet, Provenance, StoreError,
};
use crate::store::ReadingStore;
use client::ModelServiceClient;

/// Request-scoped collaborators, injected per invocation. No process-wide
/// singletons: the store handle, client, and randomness all arrive here.
pub struct PredictionContext<'a> {
    pub store: &'a mut dyn ReadingStore,
    pub model: &'a ModelServiceClient,
    pub jitter: &'a mut dyn JitterSource,
    pub config: &'a ServiceConfig,
}

/// Runs one prediction cycle.
///
/// `requested_horizon` is resolved (absent / out-of-range → default) before
/// anything else, so horizon validation can never fail. On a well-formed
/// live response the forecast is returned verbatim with
/// `provenance = live`; on any model failure the fallback estimator
/// produces both metric forecasts locally.
pub fn predict(
    ctx: &mut PredictionContext<'_>,
    requested_horizon: Option<i64>,
) -> Result<PredictionResponse, StoreError> {
    let horizon = config::resolve_horizon(requested_horizon, ctx.config.default_horizon_hours);

    match ctx.model.fetch(horizon) {
        Ok(live) => Ok(PredictionResponse {
            predictions: live.predictions,
            alerts: live.alerts,
            provenance: Provenance::Live,
        }),
        Err(err) => {
            logging::log_model_failure("predict", &err);
            fallback_response(ctx, horizon)
        }
    }
}

/// Builds the full response from local estimation. Each metric gets its
/// history window read from the store; the composite assessment and alerts
/// are derived from the two predicted values.
fn fallback_response(
    ctx: &mut PredictionContext<'_>,
    horizon: u32,
) -> Result<PredictionResponse, StoreError> {
    let tds = estimate_metric(ctx, Metric::Tds, horizon)?;
    let turbidity = estimate_metric(ctx, Metric::Turbidity, horizon)?;

    let quality_risk = quality::assess(tds.predicted, turbidity.predicted);
    let alerts = thresholds::evaluate(tds.predicted, turbidity.predicted, &quality_risk);

    Ok(PredictionResponse {
        predictions: PredictionSet {
            tds,
            turbidity,
            quality_risk,
        },
        alerts,
        provenance: Provenance::Fallback,
    })
}

fn estimate_metric(
    ctx: &mut PredictionContext<'_>,
    metric: Metric,
    horizon: u32,
) -> Result<MetricForecast, StoreError> {
    let history = ctx.store.history(metric, ctx.config.history_window)?;
    if history.is_empty() {
        return Err(StoreError::NoData(metric));
    }

    let values: Vec<f64> = history.iter().map(|r| r.value).collect();
    let spec = metrics::spec_for(metric);
    let forecast = fallback::estimate(spec, &values, horizon, ctx.jitter);

    Ok(round_forecast(forecast))
}

/// Wire values are reported to one decimal place, matching what the
/// dashboard renders.
fn round_forecast(f: MetricForecast) -> MetricForecast {
    let round1 = |v: f64| (v * 10.0).round() / 10.0;
    MetricForecast {
        current: round1(f.current),
        predicted: round1(f.predicted),
        confidence_lower: round1(f.confidence_lower),
        confidence_upper: round1(f.confidence_upper),
        ..f
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Model service client.
///
/// Single blocking HTTP call to the external ML prediction server under a
/// hard timeout budget (~2s connect, ~5s total). A breached budget, a
/// non-2xx status, and a malformed body are all the same thing to the
/// orchestrator: the service is unavailable and the fallback estimator
/// takes over. Nothing here propagates past the orchestrator.

use serde::Deserialize;
use std::time::Duration;

use crate::config::ServiceConfig;
use crate::model::{Alert, ModelError, PredictionSet};

/// Body the model service returns from `GET /predict?horizon=H`. The
/// server sends extra diagnostic fields (model info, training status);
/// only the forecast payload is binding.
#[derive(Debug, Deserialize)]
pub struct LiveForecast {
    pub predictions: PredictionSet,
    #[serde(default)]
    pub alerts: Vec<Alert>,
}

pub struct ModelServiceClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl ModelServiceClient {
    /// Builds a client with the configured timeout budgets baked in. The
    /// total budget covers connect + transfer; a slow upstream can never
    /// stall the polling loop past it.
    pub fn new(config: &ServiceConfig) -> Result<Self, ModelError> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(config.model_connect_timeout_secs))
            .timeout(Duration::from_secs(config.model_request_timeout_secs))
            .build()
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.model_server_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetches a live forecast. Exactly one attempt — the caller re-polls
    /// on a fixed cadence, so there is no internal retry.
    pub fn fetch(&self, horizon_hours: u32) -> Result<LiveForecast, ModelError> {
        let url = build_predict_url(&self.base_url, horizon_hours);

        let response = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Http(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| ModelError::Transport(e.to_string()))?;

        parse_live_forecast(&body)
    }
}

/// Builds the prediction request URL.
pub fn build_predict_url(base_url: &str, horizon_hours: u32) -> String {
    format!("{}/predict?horizon={}", base_url, horizon_hours)
}

/// Parses a model service response body into the forecast schema.
pub fn parse_live_forecast(body: &str) -> Result<LiveForecast, ModelError> {
    serde_json::from_str(body).map_err(|e| ModelError::Parse(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

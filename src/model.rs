/// Core data types for the water-quality monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic and no I/O — only types and their serde/Display
/// representations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// The two sensor metrics this service monitors. Each metric has its own
/// time-ordered reading series in the store and its own entry in
/// `metrics::METRIC_REGISTRY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Total dissolved solids, in ppm.
    Tds,
    /// Turbidity, in NTU.
    Turbidity,
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Metric::Tds => write!(f, "tds"),
            Metric::Turbidity => write!(f, "turbidity"),
        }
    }
}

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// A single sensor measurement for one metric.
///
/// History windows returned by the store are ordered newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub value: f64,
    pub observed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Prediction types
// ---------------------------------------------------------------------------

/// Direction of the predicted change relative to the current reading.
/// Determined by strict comparison — no epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

/// Whether a prediction came from the live model service or the local
/// fallback estimator. Model-service failure is a silent degradation, not
/// an error — this tag is the only way callers can observe it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Fallback,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Live => write!(f, "live"),
            Provenance::Fallback => write!(f, "fallback"),
        }
    }
}

/// Forecast for a single metric over the requested horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricForecast {
    pub current: f64,
    pub predicted: f64,
    pub trend: Trend,
    pub confidence_lower: f64,
    pub confidence_upper: f64,
    pub horizon_hours: u32,
}

/// Categorical quality label. Breakpoints are inclusive lower bounds:
/// >=90 Excellent, >=75 Good, >=60 Fair, >=40 Poor, else Unsafe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLabel {
    Excellent,
    Good,
    Fair,
    Poor,
    Unsafe,
}

impl std::fmt::Display for QualityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QualityLabel::Excellent => "Excellent",
            QualityLabel::Good => "Good",
            QualityLabel::Fair => "Fair",
            QualityLabel::Poor => "Poor",
            QualityLabel::Unsafe => "Unsafe",
        };
        write!(f, "{}", name)
    }
}

/// Composite quality assessment derived from both predicted metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRisk {
    pub predicted_quality: QualityLabel,
    pub quality_score: f64,
    pub risk_score: f64,
    pub confidence: f64,
}

/// Both metric forecasts plus the composite assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub tds: MetricForecast,
    pub turbidity: MetricForecast,
    pub quality_risk: QualityRisk,
}

/// Full body of the prediction endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub predictions: PredictionSet,
    pub alerts: Vec<Alert>,
    pub provenance: Provenance,
}

// ---------------------------------------------------------------------------
// Alert types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

/// A threshold-breach alert. Alerts form an ordered list and are not
/// deduplicated — several can legitimately co-occur for one assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Potability types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PotabilityStatus {
    Potable,
    #[serde(rename = "Not Potable")]
    NotPotable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    High,
}

/// WHO guideline compliance per metric. Boundary values are compliant:
/// tds == 500 ppm and turbidity == 1.0 NTU both pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoCompliance {
    pub tds_compliant: bool,
    pub turbidity_compliant: bool,
    pub overall_compliant: bool,
}

/// Input parameters echoed back in the recommendation response so the
/// operator can see exactly what was assessed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EchoedParameters {
    pub tds_value: f64,
    pub turbidity_value: f64,
    pub temperature: f64,
    pub ph_level: f64,
}

/// The guideline limits the assessment was made against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WhoGuidelines {
    pub tds_limit: f64,
    pub turbidity_limit: f64,
}

/// Result of the on-demand potability recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotabilityAssessment {
    pub potability_status: PotabilityStatus,
    pub potability_score: f64,
    pub confidence: f64,
    pub risk_level: RiskLevel,
    pub recommendation: String,
    pub action_required: String,
    pub who_compliance: WhoCompliance,
    pub parameters: EchoedParameters,
    pub who_guidelines: WhoGuidelines,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from the Reading Store. This is the one fatal path in the core —
/// no useful computation is possible without reading data, so these
/// propagate to the caller as service-level failures.
#[derive(Debug, PartialEq)]
pub enum StoreError {
    /// A read or write against the backing store failed.
    Query(String),
    /// The store is reachable but holds no readings for the metric.
    NoData(Metric),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Query(msg) => write!(f, "Store query failed: {}", msg),
            StoreError::NoData(metric) => {
                write!(f, "No readings available for metric: {}", metric)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors from the model service client. Every variant is equivalent to
/// unavailability: the orchestrator downgrades all of them to the fallback
/// estimator and never propagates them to its caller.
#[derive(Debug, PartialEq)]
pub enum ModelError {
    /// Non-2xx HTTP response from the model service.
    Http(u16),
    /// Connection failure or timeout budget breach.
    Transport(String),
    /// The response body could not be deserialized into the forecast schema.
    Parse(String),
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::Http(code) => write!(f, "HTTP error: {}", code),
            ModelError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ModelError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

/// Potability recommendation engine.
///
/// A binary WHO-compliance check used by the on-demand recommendation
/// interface, separate from the horizon predictor: both metrics at or
/// below their guideline limits means Potable, anything else means Not
/// Potable. The score carries a small injected jitter around a fixed base
/// and is clamped into [0, 100]. Confidence reflects how close each value
/// sits to its limit.

use serde::Deserialize;

use crate::jitter::JitterSource;
use crate::metrics;
use crate::model::{
    EchoedParameters, Metric, PotabilityAssessment, PotabilityStatus, RiskLevel, WhoCompliance,
    WhoGuidelines,
};

/// Score base and jitter half-width for potable water: 90 ± 5.
const POTABLE_BASE: f64 = 90.0;
const POTABLE_SPREAD: f64 = 5.0;

/// Score base and jitter half-width for non-potable water: 30 ± 15.
const NOT_POTABLE_BASE: f64 = 30.0;
const NOT_POTABLE_SPREAD: f64 = 15.0;

/// Body of the recommendation endpoint. Temperature and pH are accepted
/// and echoed for operator context but do not enter the compliance check.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationRequest {
    pub tds_value: f64,
    pub turbidity_value: f64,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_ph")]
    pub ph_level: f64,
}

impl RecommendationRequest {
    /// Request with the context fields at their documented defaults.
    pub fn new(tds_value: f64, turbidity_value: f64) -> Self {
        Self {
            tds_value,
            turbidity_value,
            temperature: default_temperature(),
            ph_level: default_ph(),
        }
    }
}

fn default_temperature() -> f64 {
    25.0
}

fn default_ph() -> f64 {
    7.0
}

/// Per-metric confidence: 1.0 at the guideline limit, falling off linearly
/// with distance from it, floored at 0.
pub fn limit_confidence(value: f64, limit: f64) -> f64 {
    (1.0 - (value - limit).abs() / limit).max(0.0)
}

/// Assesses a request against WHO guidelines. The full input, including
/// the optional context fields, is echoed back in the response alongside
/// the limits the decision was made against.
pub fn assess(
    request: &RecommendationRequest,
    jitter: &mut dyn JitterSource,
) -> PotabilityAssessment {
    let tds_limit = metrics::spec_for(Metric::Tds).who_limit;
    let turbidity_limit = metrics::spec_for(Metric::Turbidity).who_limit;
    let tds_value = request.tds_value;
    let turbidity_value = request.turbidity_value;

    // Boundary values are compliant (inclusive).
    let tds_compliant = tds_value <= tds_limit;
    let turbidity_compliant = turbidity_value <= turbidity_limit;
    let potable = tds_compliant && turbidity_compliant;

    let (status, base, spread, risk_level, recommendation, action_required) = if potable {
        (
            PotabilityStatus::Potable,
            POTABLE_BASE,
            POTABLE_SPREAD,
            RiskLevel::Low,
            "Water is safe for drinking. No treatment needed.",
            "None",
        )
    } else {
        (
            PotabilityStatus::NotPotable,
            NOT_POTABLE_BASE,
            NOT_POTABLE_SPREAD,
            RiskLevel::High,
            "Water is not safe for drinking. Immediate treatment required.",
            "Extensive treatment or alternative water source",
        )
    };

    // The jitter contract keeps draws inside [-1, 1]; the clamp guarantees
    // the score range even against a misbehaving source.
    let score = (base + jitter.draw() * spread).clamp(0.0, 100.0);

    let confidence = (limit_confidence(tds_value, tds_limit)
        + limit_confidence(turbidity_value, turbidity_limit))
        / 2.0;
    let confidence = (confidence * 100.0).round() / 100.0;

    PotabilityAssessment {
        potability_status: status,
        potability_score: score,
        confidence,
        risk_level,
        recommendation: recommendation.to_string(),
        action_required: action_required.to_string(),
        who_compliance: WhoCompliance {
            tds_compliant,
            turbidity_compliant,
            overall_compliant: potable,
        },
        parameters: EchoedParameters {
            tds_value,
            turbidity_value,
            temperature: request.temperature,
            ph_level: request.ph_level,
        },
        who_guidelines: WhoGuidelines {
            tds_limit,
            turbidity_limit,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jitter::{FixedJitter, RandomJitter};

    fn req(tds: f64, turbidity: f64) -> RecommendationRequest {
        RecommendationRequest::new(tds, turbidity)
    }

    #[test]
    fn test_compliant_water_is_potable() {
        let mut jitter = FixedJitter(0.0);
        let result = assess(&req(200.0, 0.3), &mut jitter);
        assert_eq!(result.potability_status, PotabilityStatus::Potable);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.potability_score, 90.0);
        assert!(result.who_compliance.overall_compliant);
    }

    #[test]
    fn test_boundary_values_are_compliant() {
        // Exactly at the WHO limits still passes (inclusive comparison).
        let mut jitter = FixedJitter(0.0);
        let result = assess(&req(500.0, 1.0), &mut jitter);
        assert_eq!(result.potability_status, PotabilityStatus::Potable);
        assert!(result.who_compliance.tds_compliant);
        assert!(result.who_compliance.turbidity_compliant);
    }

    #[test]
    fn test_either_breach_makes_not_potable() {
        let mut jitter = FixedJitter(0.0);

        let tds_breach = assess(&req(501.0, 0.5), &mut jitter);
        assert_eq!(tds_breach.potability_status, PotabilityStatus::NotPotable);
        assert!(!tds_breach.who_compliance.tds_compliant);
        assert!(tds_breach.who_compliance.turbidity_compliant);

        let turbidity_breach = assess(&req(200.0, 1.5), &mut jitter);
        assert_eq!(turbidity_breach.potability_status, PotabilityStatus::NotPotable);
        assert_eq!(turbidity_breach.risk_level, RiskLevel::High);
        assert_eq!(turbidity_breach.potability_score, 30.0);
    }

    #[test]
    fn test_confidence_is_mean_of_limit_proximities() {
        // tds 200: 1 - 300/500 = 0.4; turbidity 0.3: 1 - 0.7/1.0 = 0.3;
        // mean 0.35, rounded to 2 decimals.
        let mut jitter = FixedJitter(0.0);
        let result = assess(&req(200.0, 0.3), &mut jitter);
        assert_eq!(result.confidence, 0.35);
    }

    #[test]
    fn test_confidence_floors_at_zero_far_from_limit() {
        assert_eq!(limit_confidence(1200.0, 500.0), 0.0);
        assert_eq!(limit_confidence(500.0, 500.0), 1.0);
    }

    #[test]
    fn test_jitter_spreads_around_bases() {
        let mut high = FixedJitter(1.0);
        assert_eq!(assess(&req(200.0, 0.3), &mut high).potability_score, 95.0);
        assert_eq!(assess(&req(600.0, 0.3), &mut high).potability_score, 45.0);

        let mut low = FixedJitter(-1.0);
        assert_eq!(assess(&req(200.0, 0.3), &mut low).potability_score, 85.0);
        assert_eq!(assess(&req(600.0, 0.3), &mut low).potability_score, 15.0);
    }

    #[test]
    fn test_score_clamped_against_out_of_contract_jitter() {
        // A broken source drawing far outside [-1, 1] must still yield a
        // score inside [0, 100].
        let mut broken = FixedJitter(10.0);
        assert_eq!(assess(&req(200.0, 0.3), &mut broken).potability_score, 100.0);
        let mut broken = FixedJitter(-10.0);
        assert_eq!(assess(&req(600.0, 5.0), &mut broken).potability_score, 0.0);
    }

    #[test]
    fn test_scores_stay_in_range_over_random_draws() {
        let mut jitter = RandomJitter::seeded(5);
        for _ in 0..500 {
            let potable = assess(&req(200.0, 0.3), &mut jitter).potability_score;
            assert!((0.0..=100.0).contains(&potable));
            let not_potable = assess(&req(700.0, 8.0), &mut jitter).potability_score;
            assert!((0.0..=100.0).contains(&not_potable));
        }
    }

    #[test]
    fn test_request_defaults_for_optional_context_fields() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"tds_value": 320.0, "turbidity_value": 0.9}"#).unwrap();
        assert_eq!(request.temperature, 25.0);
        assert_eq!(request.ph_level, 7.0);
    }

    #[test]
    fn test_response_echoes_parameters_and_guidelines() {
        // The response must carry the assessed inputs, including the
        // optional context fields, plus the limits used.
        let mut jitter = FixedJitter(0.0);
        let request = RecommendationRequest {
            tds_value: 320.0,
            turbidity_value: 0.9,
            temperature: 28.5,
            ph_level: 6.8,
        };

        let result = assess(&request, &mut jitter);
        assert_eq!(result.parameters.tds_value, 320.0);
        assert_eq!(result.parameters.turbidity_value, 0.9);
        assert_eq!(result.parameters.temperature, 28.5);
        assert_eq!(result.parameters.ph_level, 6.8);
        assert_eq!(result.who_guidelines.tds_limit, 500.0);
        assert_eq!(result.who_guidelines.turbidity_limit, 1.0);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["parameters"]["temperature"], 28.5);
        assert_eq!(json["parameters"]["ph_level"], 6.8);
        assert_eq!(json["who_guidelines"]["tds_limit"], 500.0);
        assert_eq!(json["who_guidelines"]["turbidity_limit"], 1.0);
        assert_eq!(json["potability_status"], "Potable");
    }
}

/// Composite water-quality classification.
///
/// Turns a pair of *predicted* metric values into a 0–100 score and a
/// categorical label. Penalties are tiered per metric (from the registry),
/// summed across both metrics, and the total is clamped into [0, 100].

use crate::metrics::{self, MetricSpec};
use crate::model::{Metric, QualityLabel, QualityRisk};

/// Confidence reported for composite assessments produced locally. The
/// fallback path has no model-derived uncertainty, so it reports the same
/// fixed figure the ML server does.
pub const FALLBACK_CONFIDENCE: f64 = 0.85;

/// Penalty one predicted value contributes: the first tier whose bound the
/// value strictly exceeds, at most one tier per metric.
pub fn metric_penalty(spec: &MetricSpec, predicted: f64) -> f64 {
    spec.penalty_tiers
        .iter()
        .find(|(bound, _)| predicted > *bound)
        .map(|(_, penalty)| *penalty)
        .unwrap_or(0.0)
}

/// Composite score from both predicted values.
pub fn quality_score(predicted_tds: f64, predicted_turbidity: f64) -> f64 {
    let score = 100.0
        - metric_penalty(metrics::spec_for(Metric::Tds), predicted_tds)
        - metric_penalty(metrics::spec_for(Metric::Turbidity), predicted_turbidity);
    score.clamp(0.0, 100.0)
}

/// Label breakpoints are inclusive lower bounds.
pub fn classify(score: f64) -> QualityLabel {
    if score >= 90.0 {
        QualityLabel::Excellent
    } else if score >= 75.0 {
        QualityLabel::Good
    } else if score >= 60.0 {
        QualityLabel::Fair
    } else if score >= 40.0 {
        QualityLabel::Poor
    } else {
        QualityLabel::Unsafe
    }
}

/// Full composite assessment for a pair of predicted values.
pub fn assess(predicted_tds: f64, predicted_turbidity: f64) -> QualityRisk {
    let score = quality_score(predicted_tds, predicted_turbidity);
    QualityRisk {
        predicted_quality: classify(score),
        quality_score: score,
        risk_score: 100.0 - score,
        confidence: FALLBACK_CONFIDENCE,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::spec_for;

    #[test]
    fn test_tds_penalty_tiers() {
        let spec = spec_for(Metric::Tds);
        assert_eq!(metric_penalty(spec, 450.0), 30.0);
        assert_eq!(metric_penalty(spec, 350.0), 20.0);
        assert_eq!(metric_penalty(spec, 250.0), 10.0);
        assert_eq!(metric_penalty(spec, 150.0), 0.0);
    }

    #[test]
    fn test_tds_tier_bounds_are_exclusive() {
        // Exactly at a bound the value does not exceed it, so the next
        // tier down applies.
        let spec = spec_for(Metric::Tds);
        assert_eq!(metric_penalty(spec, 400.0), 20.0);
        assert_eq!(metric_penalty(spec, 300.0), 10.0);
        assert_eq!(metric_penalty(spec, 200.0), 0.0);
    }

    #[test]
    fn test_turbidity_penalty_tiers() {
        let spec = spec_for(Metric::Turbidity);
        assert_eq!(metric_penalty(spec, 6.0), 40.0);
        assert_eq!(metric_penalty(spec, 4.0), 25.0);
        assert_eq!(metric_penalty(spec, 2.0), 10.0);
        assert_eq!(metric_penalty(spec, 1.0), 0.0);
    }

    #[test]
    fn test_penalties_sum_across_metrics() {
        // 450 ppm (-30) and 6 NTU (-40): score 30, Unsafe territory.
        assert_eq!(quality_score(450.0, 6.0), 30.0);
        // Clean water loses nothing.
        assert_eq!(quality_score(150.0, 0.5), 100.0);
    }

    #[test]
    fn test_score_stays_in_range_for_all_tier_combinations() {
        let tds_cases = [150.0, 250.0, 350.0, 450.0];
        let turbidity_cases = [0.5, 2.0, 4.0, 6.0];
        for &tds in &tds_cases {
            for &ntu in &turbidity_cases {
                let score = quality_score(tds, ntu);
                assert!((0.0..=100.0).contains(&score));
                let risk = assess(tds, ntu);
                assert_eq!(risk.risk_score, 100.0 - risk.quality_score);
            }
        }
    }

    #[test]
    fn test_label_boundaries_are_exact() {
        assert_eq!(classify(90.0), QualityLabel::Excellent);
        assert_eq!(classify(89.9), QualityLabel::Good);
        assert_eq!(classify(75.0), QualityLabel::Good);
        assert_eq!(classify(74.9), QualityLabel::Fair);
        assert_eq!(classify(60.0), QualityLabel::Fair);
        assert_eq!(classify(59.9), QualityLabel::Poor);
        assert_eq!(classify(40.0), QualityLabel::Poor);
        assert_eq!(classify(39.9), QualityLabel::Unsafe);
        assert_eq!(classify(0.0), QualityLabel::Unsafe);
        assert_eq!(classify(100.0), QualityLabel::Excellent);
    }

    #[test]
    fn test_assess_reports_risk_as_complement() {
        let risk = assess(350.0, 2.0);
        // -20 (tds) -10 (turbidity) = 70.
        assert_eq!(risk.quality_score, 70.0);
        assert_eq!(risk.risk_score, 30.0);
        assert_eq!(risk.predicted_quality, QualityLabel::Fair);
        assert_eq!(risk.confidence, FALLBACK_CONFIDENCE);
    }
}

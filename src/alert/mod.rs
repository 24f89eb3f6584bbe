/// Alerting on predicted water-quality values.
///
/// Submodules:
/// - `thresholds` — threshold-band evaluation producing typed alerts.

pub mod thresholds;

/// Assessment logic built on top of predicted metric values.
///
/// Submodules:
/// - `quality` — composite 0–100 quality score and categorical label.

pub mod quality;

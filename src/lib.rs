//! Water-quality monitoring and short-horizon forecasting service.
//!
//! Ingests periodic TDS and turbidity sensor readings, produces tiered
//! quality forecasts (live ML server with a deterministic local fallback),
//! and evaluates safety recommendations against WHO guidelines.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod dev_mode;
pub mod ingest;
pub mod jitter;
pub mod logging;
pub mod metrics;
pub mod model;
pub mod potability;
pub mod predict;
pub mod store;
pub mod train;

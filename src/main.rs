//! Polling daemon for the water-quality monitoring service.
//!
//! Runs the prediction pipeline on a fixed cadence. Each cycle is one
//! bounded, single-shot unit of work: a single model-service attempt under
//! its timeout budget, falling back to local estimation, then threshold
//! evaluation and a logged summary. A failed cycle is reported and the
//! loop continues — transient failures are expected to clear on the next
//! poll.

use std::path::Path;
use std::thread;
use std::time::Duration;

use aquamon_service::config::ServiceConfig;
use aquamon_service::jitter::RandomJitter;
use aquamon_service::logging::{self, Component, LogLevel};
use aquamon_service::predict::client::ModelServiceClient;
use aquamon_service::predict::{self, PredictionContext};
use aquamon_service::store::PgReadingStore;

const CONFIG_PATH: &str = "./aquamon.toml";

fn main() {
    dotenv::dotenv().ok();
    logging::init_logger(LogLevel::Info, Some("aquamon.log"), true);

    let config = match ServiceConfig::load(Path::new(CONFIG_PATH)) {
        Ok(config) => config,
        Err(e) => {
            logging::error(Component::System, None, &e);
            std::process::exit(1);
        }
    };

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            logging::error(Component::System, None, "DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    let client = match postgres::Client::connect(&database_url, postgres::NoTls) {
        Ok(client) => client,
        Err(e) => {
            logging::error(
                Component::Store,
                None,
                &format!("Database connection failed: {}", e),
            );
            std::process::exit(1);
        }
    };
    let mut store = PgReadingStore::new(client);

    let model = match ModelServiceClient::new(&config) {
        Ok(model) => model,
        Err(e) => {
            logging::error(Component::Model, None, &e.to_string());
            std::process::exit(1);
        }
    };

    let mut jitter = RandomJitter::from_entropy();

    logging::info(
        Component::System,
        None,
        &format!(
            "Monitoring started: poll every {}s, model server {}",
            config.poll_interval_secs, config.model_server_url
        ),
    );

    loop {
        let mut ctx = PredictionContext {
            store: &mut store,
            model: &model,
            jitter: &mut jitter,
            config: &config,
        };

        match predict::predict(&mut ctx, None) {
            Ok(response) => {
                logging::log_poll_summary(
                    response.provenance,
                    response.alerts.len(),
                    response.predictions.quality_risk.quality_score,
                );
                for alert in &response.alerts {
                    logging::warn(
                        Component::System,
                        None,
                        &format!("[{:?}] {}", alert.severity, alert.message),
                    );
                }
            }
            Err(e) => {
                // Store failure is the one fatal path per cycle; the loop
                // itself survives and retries on the next tick.
                logging::error(Component::Store, None, &e.to_string());
            }
        }

        thread::sleep(Duration::from_secs(config.poll_interval_secs));
    }
}

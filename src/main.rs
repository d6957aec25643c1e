//! Profit Prediction Service - Main Entry Point
//!
//! Loads the regression model once and serves predictions over HTTP. A
//! missing or broken model does not stop the process.

use anyhow::Result;
use profit_prediction_service::{
    config::AppConfig,
    logging::init_tracing,
    metrics::MetricsReporter,
    models::inference::InferenceEngine,
    server::{self, AppState},
    service::PredictionService,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_tracing(&config.logging)?;

    info!("Starting profit prediction service");
    info!(
        model_path = %config.model.path,
        bind = %config.server.bind_addr(),
        "Configuration loaded successfully"
    );

    let engine = InferenceEngine::try_from_config(&config);
    let service = PredictionService::new(engine);

    match service.model_name() {
        Some(name) => info!(model = %name, "Model ready"),
        None => warn!("No model loaded; /predict will return errors until restart"),
    }

    let state = AppState::new(service);

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(state.metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let metrics = state.metrics.clone();
    server::serve(&config.server, state).await?;

    info!("Prediction service shutting down...");
    metrics.print_summary();

    Ok(())
}

//! HTTP surface: home page, prediction and health endpoints

use crate::config::ServerConfig;
use crate::metrics::ServiceMetrics;
use crate::service::PredictionService;
use crate::types::response::{HealthStatus, PredictionResponse};
use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, warn};

const HOME_PAGE: &str = include_str!("../static/index.html");

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self {
            service: Arc::new(service),
            metrics: Arc::new(ServiceMetrics::new()),
        }
    }
}

/// Build the router. With `cors_permissive` every origin, method and
/// header is allowed.
pub fn router(state: AppState, cors_permissive: bool) -> Router {
    let router = Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .with_state(state);

    if cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.service.health())
}

async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    let start = Instant::now();

    match state.service.predict_json(&body) {
        Ok(result) => {
            let latency = start.elapsed();
            state.metrics.record_prediction(latency);
            debug!(
                prediction = result.prediction,
                state = %result.input.state,
                latency_us = latency.as_micros() as u64,
                "Prediction served"
            );
            Json(PredictionResponse::from(result)).into_response()
        }
        Err(e) => {
            if e.is_client_error() {
                state.metrics.record_rejection();
                warn!(error = %e, "Prediction request rejected");
            } else {
                state.metrics.record_failure();
                error!(error = %e, "Prediction request failed");
            }
            e.into_response()
        }
    }
}

/// Bind and serve until a shutdown signal arrives.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let bind_addr = config.bind_addr();
    let app = router(state, config.cors_permissive);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!(addr = %bind_addr, "Listening for prediction requests");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

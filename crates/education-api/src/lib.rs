//! Education API
//!
//! HTTP surface over [`EducationService`]. The router is built from an
//! explicit [`AppState`]; `run_server` is the composition root used by the
//! binary.

pub mod config;
pub mod request_id;
pub mod routes;

use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use education_core::ValidationError;
use education_service::{EducationService, NoopStore, ResultStore, SqliteResultStore};
use serde_json::json;
use std::sync::Arc;
use streak_engine::SystemClock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::ServerConfig;
use request_id::request_id_middleware;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<EducationService>,
}

impl AppState {
    pub fn new(service: EducationService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Wires the service from process config. An unreachable database
    /// disables persistence instead of failing startup.
    pub async fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let education = config.education_config()?;

        let store: Arc<dyn ResultStore> = match &config.database_url {
            Some(url) => match SqliteResultStore::connect(url).await {
                Ok(store) => Arc::new(store),
                Err(e) => {
                    tracing::warn!("Result store unavailable ({}); persistence disabled", e);
                    Arc::new(NoopStore)
                }
            },
            None => {
                tracing::info!("DATABASE_URL not set; persistence disabled");
                Arc::new(NoopStore)
            }
        };

        Ok(Self::new(EducationService::new(education, store, Arc::new(SystemClock))))
    }
}

/// Handler error, rendered as `{"endpoint", "error", "message"}`
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{source}")]
    Validation {
        endpoint: String,
        source: ValidationError,
    },

    #[error("{message}")]
    Rejected {
        endpoint: String,
        status: StatusCode,
        message: String,
    },

    #[error("{message}")]
    Internal {
        endpoint: String,
        kind: &'static str,
        message: String,
    },
}

impl AppError {
    pub fn validation(endpoint: &str, source: ValidationError) -> Self {
        AppError::Validation {
            endpoint: endpoint.to_string(),
            source,
        }
    }

    pub fn rejected(endpoint: &str, rejection: JsonRejection) -> Self {
        AppError::Rejected {
            endpoint: endpoint.to_string(),
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }

    pub fn malformed_envelope(endpoint: &str) -> Self {
        AppError::Internal {
            endpoint: endpoint.to_string(),
            kind: "MalformedEnvelope",
            message: "Service returned an unexpected response structure.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, endpoint, error) = match self {
            AppError::Validation { endpoint, source } => {
                tracing::warn!("Validation error | {} | {}", endpoint, message);
                let label = match source {
                    ValidationError::InvalidDate { .. } => "InvalidDateFormat",
                    _ => "ValidationError",
                };
                (StatusCode::UNPROCESSABLE_ENTITY, endpoint, label)
            }
            AppError::Rejected {
                endpoint, status, ..
            } => {
                tracing::warn!("Rejected request body | {} | {}", endpoint, message);
                (status, endpoint, "InvalidRequestBody")
            }
            AppError::Internal { endpoint, kind, .. } => {
                tracing::error!("Internal error | {} | {}: {}", endpoint, kind, message);
                (StatusCode::INTERNAL_SERVER_ERROR, endpoint, kind)
            }
        };

        (
            status,
            Json(json!({
                "endpoint": endpoint,
                "error": error,
                "message": message,
            })),
        )
            .into_response()
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "education-api",
        "persistence": state.service.persistence_enabled(),
    }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::education_routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

pub async fn run_server() -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?;
    let state = AppState::from_config(&config).await?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Education API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

//! Education API Routes
//!
//! Thin handlers: decode the body, call the service, return its envelope.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use education_core::Envelope;
use education_service::{
    AiDecisionRequest, IndicatorRequest, PredictionRequest, ProgressLookup, ProgressRequest,
    QuizSubmission, StrategyRequest, StreakRequest, SummaryRequest,
};
use serde::Serialize;

use crate::{AppError, AppState};

type Body<T> = Result<Json<T>, JsonRejection>;
type Reply<T> = Result<Json<Envelope<T>>, AppError>;

pub fn education_routes() -> Router<AppState> {
    Router::new()
        .route("/education/indicator/explain", post(explain_indicator))
        .route("/education/ai-decision/explain", post(explain_ai_decision))
        .route("/education/playground/evaluate", post(evaluate_prediction))
        .route("/education/strategy/simulate", post(simulate_strategy))
        .route("/education/quiz/submit", post(submit_quiz))
        .route("/education/streak/status", post(streak_status))
        .route("/education/progress/snapshot", post(progress_snapshot))
        .route("/education/progress/:user_id", get(get_progress))
        .route("/education/summary", post(education_summary))
}

fn decode<T>(endpoint: &str, payload: Body<T>) -> Result<T, AppError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| AppError::rejected(endpoint, rejection))
}

fn respond<T: Serialize>(endpoint: &str, envelope: Envelope<T>) -> Reply<T> {
    if envelope.is_success() {
        Ok(Json(envelope))
    } else {
        Err(AppError::malformed_envelope(endpoint))
    }
}

async fn explain_indicator(
    State(state): State<AppState>,
    payload: Body<IndicatorRequest>,
) -> Reply<impl Serialize> {
    const ENDPOINT: &str = "POST /education/indicator/explain";
    let req = decode(ENDPOINT, payload)?;
    tracing::info!("{} | indicator={} value={}", ENDPOINT, req.indicator, req.value);

    let envelope = state
        .service
        .explain_indicator(&req)
        .map_err(|e| AppError::validation(ENDPOINT, e))?;
    respond(ENDPOINT, envelope)
}

async fn explain_ai_decision(
    State(state): State<AppState>,
    payload: Body<AiDecisionRequest>,
) -> Reply<impl Serialize> {
    const ENDPOINT: &str = "POST /education/ai-decision/explain";
    let req = decode(ENDPOINT, payload)?;
    tracing::info!("{} | decision={} confidence={}", ENDPOINT, req.final_decision, req.confidence);

    let envelope = state
        .service
        .explain_ai_decision(&req)
        .map_err(|e| AppError::validation(ENDPOINT, e))?;
    respond(ENDPOINT, envelope)
}

async fn evaluate_prediction(
    State(state): State<AppState>,
    payload: Body<PredictionRequest>,
) -> Reply<impl Serialize> {
    const ENDPOINT: &str = "POST /education/playground/evaluate";
    let req = decode(ENDPOINT, payload)?;

    let envelope = state
        .service
        .evaluate_prediction(&req)
        .map_err(|e| AppError::validation(ENDPOINT, e))?;
    respond(ENDPOINT, envelope)
}

async fn simulate_strategy(
    State(state): State<AppState>,
    payload: Body<StrategyRequest>,
) -> Reply<impl Serialize> {
    const ENDPOINT: &str = "POST /education/strategy/simulate";
    let req = decode(ENDPOINT, payload)?;

    let envelope = state
        .service
        .simulate_strategy(&req)
        .map_err(|e| AppError::validation(ENDPOINT, e))?;
    respond(ENDPOINT, envelope)
}

async fn submit_quiz(
    State(state): State<AppState>,
    payload: Body<QuizSubmission>,
) -> Reply<impl Serialize> {
    const ENDPOINT: &str = "POST /education/quiz/submit";
    let req = decode(ENDPOINT, payload)?;
    tracing::info!("{} | quiz_id={} questions={}", ENDPOINT, req.quiz_id, req.questions.len());

    let envelope = state
        .service
        .evaluate_quiz(&req)
        .map_err(|e| AppError::validation(ENDPOINT, e))?;
    respond(ENDPOINT, envelope)
}

/// `record_activity` selects between a status read and recording today.
async fn streak_status(
    State(state): State<AppState>,
    payload: Body<StreakRequest>,
) -> Reply<impl Serialize> {
    const ENDPOINT: &str = "POST /education/streak/status";
    let req = decode(ENDPOINT, payload)?;
    tracing::info!(
        "{} | current={} max={} tz={} record={}",
        ENDPOINT,
        req.current_streak,
        req.max_streak,
        req.timezone_label,
        req.record_activity
    );

    let envelope = state
        .service
        .streak(&req)
        .map_err(|e| AppError::validation(ENDPOINT, e))?;
    respond(ENDPOINT, envelope)
}

async fn progress_snapshot(
    State(state): State<AppState>,
    payload: Body<ProgressRequest>,
) -> Reply<impl Serialize> {
    const ENDPOINT: &str = "POST /education/progress/snapshot";
    let req = decode(ENDPOINT, payload)?;

    let envelope = state
        .service
        .compute_progress(&req)
        .map_err(|e| AppError::validation(ENDPOINT, e))?;
    respond(ENDPOINT, envelope)
}

/// Always 200; a missing record is reported as `record: null`.
async fn get_progress(State(state): State<AppState>, Path(user_id): Path<String>) -> Reply<ProgressLookup> {
    let endpoint = format!("GET /education/progress/{user_id}");
    let envelope = state.service.latest_progress(&user_id).await;
    respond(&endpoint, envelope)
}

async fn education_summary(
    State(state): State<AppState>,
    payload: Body<SummaryRequest>,
) -> Reply<impl Serialize> {
    const ENDPOINT: &str = "POST /education/summary";
    let req = decode(ENDPOINT, payload)?;

    let envelope = state
        .service
        .education_summary(&req)
        .map_err(|e| AppError::validation(ENDPOINT, e))?;
    respond(ENDPOINT, envelope)
}

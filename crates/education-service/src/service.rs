use ai_decision_explainer::{AiDecisionExplainer, AiDecisionExplanation};
use education_core::{Envelope, ValidationError};
use indicator_explainer::{IndicatorExplainer, IndicatorExplanation};
use prediction_playground::{PredictionEvaluation, PredictionEvaluator};
use progress_tracker::{ProgressTracker, UserProgressInput, UserProgressSnapshot};
use quiz_engine::{QuizEvaluator, QuizResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use strategy_simulator::{ScenarioType, StrategySimulationResult, StrategySimulator};
use streak_engine::{
    parse_iso_date, Clock, StreakEngine, StreakInput, StreakState, StreakUpdateResult, SystemClock,
};

use crate::config::EducationConfig;
use crate::requests::{
    AiDecisionRequest, IndicatorRequest, PredictionRequest, QuizSubmission, StrategyRequest,
    StreakRequest, SummaryRequest,
};
use crate::store::{NoopStore, ResultStore, Table};

type ServiceResult<T> = Result<Envelope<T>, ValidationError>;
type Computed<T> = Result<(T, Projection), ValidationError>;

/// Row handed to the store once a computation has succeeded.
struct Projection {
    table: Table,
    user_id: Option<String>,
    payload: Value,
}

impl Projection {
    fn new(table: Table, user_id: Option<&str>, payload: Value) -> Self {
        Self {
            table,
            user_id: user_id.map(str::to_string),
            payload,
        }
    }
}

/// Streak response: a read-only status or the outcome of recording activity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StreakOutcome {
    Status { current_state: StreakState },
    Recorded(StreakUpdateResult),
}

/// Persisted progress lookup. `record` is null when nothing could be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressLookup {
    pub user_id: String,
    pub record: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationSummary {
    pub indicator_explanations: Vec<IndicatorExplanation>,
    pub ai_decision_explanation: AiDecisionExplanation,
    pub prediction_evaluation: PredictionEvaluation,
    pub streak_status: StreakOutcome,
}

/// Runs the engines and forwards result projections to the store.
///
/// Construct one per process and share it; it holds no mutable state.
#[derive(Clone)]
pub struct EducationService {
    indicators: IndicatorExplainer,
    ai_decisions: AiDecisionExplainer,
    playground: PredictionEvaluator,
    strategy: StrategySimulator,
    quiz: QuizEvaluator,
    streaks: StreakEngine,
    progress: ProgressTracker,
    store: Arc<dyn ResultStore>,
}

impl std::fmt::Debug for EducationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EducationService")
            .field("persistence", &self.store.is_available())
            .finish_non_exhaustive()
    }
}

impl Default for EducationService {
    fn default() -> Self {
        Self::new(EducationConfig::default(), Arc::new(NoopStore), Arc::new(SystemClock))
    }
}

impl EducationService {
    pub fn new(config: EducationConfig, store: Arc<dyn ResultStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            indicators: IndicatorExplainer::new(config.indicator),
            ai_decisions: AiDecisionExplainer::new(config.ai_decision),
            playground: PredictionEvaluator::new(config.playground),
            strategy: StrategySimulator::new(config.strategy),
            quiz: QuizEvaluator::new(config.quiz),
            streaks: StreakEngine::with_clock(config.streak, clock),
            progress: ProgressTracker::new(config.progress),
            store,
        }
    }

    pub fn persistence_enabled(&self) -> bool {
        self.store.is_available()
    }

    /// Hand a projection to the store without waiting for it.
    fn persist(&self, projection: Projection) {
        let Projection {
            table,
            user_id,
            payload,
        } = projection;
        if !self.store.is_available() {
            return;
        }
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!("No async runtime; skipping persistence to {}", table);
            return;
        };

        let store = Arc::clone(&self.store);
        handle.spawn(async move {
            if let Err(e) = store.record(table, user_id.as_deref(), payload).await {
                tracing::warn!("Non-blocking persistence failure for {}: {}", table, e);
            }
        });
    }

    fn indicator_part(&self, req: &IndicatorRequest) -> Computed<IndicatorExplanation> {
        let explanation = self
            .indicators
            .explain(&req.indicator, req.value, req.context.as_ref())?;

        let projection = Projection::new(
            Table::IndicatorExplanations,
            req.user_id.as_deref(),
            json!({
                "indicator_name": explanation.indicator_name,
                "value": explanation.value,
                "market_signal": explanation.market_signal,
                "trading_bias": explanation.trading_bias,
            }),
        );
        Ok((explanation, projection))
    }

    pub fn explain_indicator(&self, req: &IndicatorRequest) -> ServiceResult<IndicatorExplanation> {
        tracing::info!("explain_indicator: indicator={} value={}", req.indicator, req.value);

        let (explanation, projection) = self.indicator_part(req)?;
        self.persist(projection);
        Ok(Envelope::success(explanation))
    }

    fn ai_decision_part(&self, req: &AiDecisionRequest) -> Computed<AiDecisionExplanation> {
        let explanation = self
            .ai_decisions
            .explain(req.scores, &req.final_decision, req.confidence)?;

        let projection = Projection::new(
            Table::AiDecisions,
            req.user_id.as_deref(),
            json!({
                "final_decision": explanation.final_decision,
                "confidence": explanation.confidence,
                "agreement_level": explanation.agreement_level,
                "explanation_strength": explanation.explanation_strength,
            }),
        );
        Ok((explanation, projection))
    }

    pub fn explain_ai_decision(&self, req: &AiDecisionRequest) -> ServiceResult<AiDecisionExplanation> {
        tracing::info!(
            "explain_ai_decision: decision={} confidence={}",
            req.final_decision,
            req.confidence
        );

        let (explanation, projection) = self.ai_decision_part(req)?;
        self.persist(projection);
        Ok(Envelope::success(explanation))
    }

    fn prediction_part(&self, req: &PredictionRequest) -> Computed<PredictionEvaluation> {
        let evaluation = self.playground.evaluate(
            &req.user_prediction,
            req.user_confidence,
            &req.ai_prediction,
            &req.actual_outcome,
        )?;

        let projection = Projection::new(
            Table::Predictions,
            req.user_id.as_deref(),
            json!({
                "user_prediction": evaluation.user_prediction,
                "ai_prediction": evaluation.ai_prediction,
                "actual_outcome": evaluation.actual_outcome,
                "correctness": evaluation.correctness,
                "calibration_score": evaluation.calibration_score,
                "calibration_level": evaluation.calibration_level,
            }),
        );
        Ok((evaluation, projection))
    }

    pub fn evaluate_prediction(&self, req: &PredictionRequest) -> ServiceResult<PredictionEvaluation> {
        tracing::info!(
            "evaluate_prediction: user={} ai={} actual={}",
            req.user_prediction,
            req.ai_prediction,
            req.actual_outcome
        );

        let (evaluation, projection) = self.prediction_part(req)?;
        self.persist(projection);
        Ok(Envelope::success(evaluation))
    }

    pub fn simulate_strategy(&self, req: &StrategyRequest) -> ServiceResult<StrategySimulationResult> {
        tracing::info!(
            "simulate_strategy: investment={} change={}% scenario={}",
            req.investment_amount,
            req.predicted_change_percent,
            req.scenario_type
        );

        let scenario = ScenarioType::parse(&req.scenario_type)?;
        let result = self.strategy.simulate(
            req.investment_amount,
            req.predicted_change_percent,
            req.risk_score,
            req.volatility_score,
            scenario,
        )?;

        self.persist(Projection::new(
            Table::StrategySimulations,
            req.user_id.as_deref(),
            json!({
                "initial_investment": result.initial_investment,
                "projected_value": result.projected_value,
                "projected_profit_loss": result.projected_profit_loss,
                "scenario_applied": result.scenario_applied,
            }),
        ));
        Ok(Envelope::success(result))
    }

    pub fn evaluate_quiz(&self, req: &QuizSubmission) -> ServiceResult<QuizResult> {
        tracing::info!(
            "evaluate_quiz: quiz_id={} questions={} answers={}",
            req.quiz_id,
            req.questions.len(),
            req.user_answers.len()
        );

        let result = self
            .quiz
            .evaluate(&req.quiz_id, &req.questions, &req.user_answers)?;

        self.persist(Projection::new(
            Table::QuizResults,
            req.user_id.as_deref(),
            json!({
                "quiz_id": result.quiz_id,
                "score_percentage": result.score_percentage,
                "mastery_level": result.mastery_level,
                "correct_count": result.correct_count,
                "points_earned": result.points_earned,
            }),
        ));
        Ok(Envelope::success(result))
    }

    fn streak_input(req: &StreakRequest) -> Result<StreakInput, ValidationError> {
        let last_active = req
            .last_active_date
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(|d| parse_iso_date("last_active_date", d))
            .transpose()?;

        StreakInput::new(
            req.current_streak,
            req.max_streak,
            last_active,
            req.timezone_label.clone(),
            req.grace_period,
        )
    }

    /// Read-only; nothing is persisted.
    pub fn streak_status(&self, req: &StreakRequest) -> ServiceResult<StreakState> {
        tracing::info!(
            "streak_status: current={} max={} tz={}",
            req.current_streak,
            req.max_streak,
            req.timezone_label
        );
        let input = Self::streak_input(req)?;
        Ok(Envelope::success(self.streaks.evaluate(&input)))
    }

    fn record_activity_part(&self, req: &StreakRequest) -> Computed<StreakUpdateResult> {
        let input = Self::streak_input(req)?;
        let result = self.streaks.record_activity(&input);

        let projection = Projection::new(
            Table::Streaks,
            req.user_id.as_deref(),
            json!({
                "current_streak": result.updated_state.current_streak,
                "max_streak": result.updated_state.max_streak,
                "streak_extended": result.streak_extended,
                "streak_reset": result.streak_reset,
                "is_new_record": result.is_new_record,
            }),
        );
        Ok((result, projection))
    }

    pub fn record_activity(&self, req: &StreakRequest) -> ServiceResult<StreakUpdateResult> {
        tracing::info!(
            "record_activity: current={} max={} tz={}",
            req.current_streak,
            req.max_streak,
            req.timezone_label
        );
        let (result, projection) = self.record_activity_part(req)?;
        self.persist(projection);
        Ok(Envelope::success(result))
    }

    /// Status reads yield no projection.
    fn streak_part(
        &self,
        req: &StreakRequest,
    ) -> Result<(StreakOutcome, Option<Projection>), ValidationError> {
        if req.record_activity {
            let (result, projection) = self.record_activity_part(req)?;
            Ok((StreakOutcome::Recorded(result), Some(projection)))
        } else {
            let current_state = self.streak_status(req)?.into_data();
            Ok((StreakOutcome::Status { current_state }, None))
        }
    }

    /// Dispatch on `record_activity`.
    pub fn streak(&self, req: &StreakRequest) -> ServiceResult<StreakOutcome> {
        let (outcome, projection) = self.streak_part(req)?;
        if let Some(projection) = projection {
            self.persist(projection);
        }
        Ok(Envelope::success(outcome))
    }

    pub fn compute_progress(&self, input: &UserProgressInput) -> ServiceResult<UserProgressSnapshot> {
        tracing::info!(
            "compute_progress: user_id={} total_points={} streak={}",
            input.user_id,
            input.total_points,
            input.current_streak
        );

        let snapshot = self.progress.compute(input)?;

        self.persist(Projection::new(
            Table::ProgressSnapshots,
            Some(&snapshot.user_id),
            json!({
                "user_id": snapshot.user_id,
                "total_points": snapshot.total_points,
                "level": snapshot.level,
                "skill_maturity": snapshot.skill_maturity,
                "engagement_score": snapshot.engagement_score,
                "learning_consistency": snapshot.learning_consistency,
                "badge_count": snapshot.badges.len(),
            }),
        ));
        Ok(Envelope::success(snapshot))
    }

    /// Newest persisted snapshot. Store failures degrade to a null record.
    pub async fn latest_progress(&self, user_id: &str) -> Envelope<ProgressLookup> {
        tracing::info!("latest_progress: user_id={}", user_id);

        let lookup = |record: Option<Value>, message: Option<&str>| ProgressLookup {
            user_id: user_id.to_string(),
            record,
            message: message.map(str::to_string),
        };

        if !self.store.is_available() {
            tracing::warn!("latest_progress: persistence unavailable for user_id={}", user_id);
            return Envelope::success(lookup(None, Some("Persistence layer unavailable.")));
        }

        let data = match self.store.latest_progress(user_id).await {
            Ok(Some(record)) => lookup(Some(record), None),
            Ok(None) => lookup(None, Some("No progress record found.")),
            Err(e) => {
                tracing::warn!("latest_progress: read failed for user_id={}: {}", user_id, e);
                lookup(None, Some("Progress record temporarily unavailable."))
            }
        };
        Envelope::success(data)
    }

    /// Indicator, AI decision, prediction and streak results in one report.
    /// Every part is computed first; projections are stored only when all succeed.
    pub fn education_summary(&self, req: &SummaryRequest) -> ServiceResult<EducationSummary> {
        tracing::info!(
            "education_summary: indicators={} user_id={:?}",
            req.indicators.len(),
            req.user_id
        );

        let with_user = |user_id: &Option<String>| user_id.clone().or_else(|| req.user_id.clone());
        let mut projections = Vec::with_capacity(req.indicators.len() + 3);

        let indicator_explanations = req
            .indicators
            .iter()
            .map(|indicator| {
                let indicator = IndicatorRequest {
                    user_id: with_user(&indicator.user_id),
                    ..indicator.clone()
                };
                let (explanation, projection) = self.indicator_part(&indicator)?;
                projections.push(projection);
                Ok(explanation)
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        let (ai_decision_explanation, projection) = self.ai_decision_part(&AiDecisionRequest {
            user_id: with_user(&req.ai_decision.user_id),
            ..req.ai_decision.clone()
        })?;
        projections.push(projection);

        let (prediction_evaluation, projection) = self.prediction_part(&PredictionRequest {
            user_id: with_user(&req.prediction.user_id),
            ..req.prediction.clone()
        })?;
        projections.push(projection);

        let (streak_status, projection) = self.streak_part(&StreakRequest {
            user_id: with_user(&req.streak.user_id),
            ..req.streak.clone()
        })?;
        projections.extend(projection);

        for projection in projections {
            self.persist(projection);
        }

        Ok(Envelope::success(EducationSummary {
            indicator_explanations,
            ai_decision_explanation,
            prediction_evaluation,
            streak_status,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ai_decision_explainer::ModelScores;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use quiz_engine::{Difficulty, QuizQuestion, TopicTag, UserAnswer};
    use std::sync::Mutex;
    use streak_engine::FixedClock;

    type Row = (Table, Option<String>, Value);

    #[derive(Default)]
    struct RecordingStore {
        rows: Mutex<Vec<Row>>,
        fail: bool,
    }

    impl RecordingStore {
        fn rows(&self) -> Vec<Row> {
            self.rows.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ResultStore for RecordingStore {
        async fn record(&self, table: Table, user_id: Option<&str>, payload: Value) -> Result<()> {
            if self.fail {
                anyhow::bail!("disk full");
            }
            self.rows
                .lock()
                .unwrap()
                .push((table, user_id.map(str::to_string), payload));
            Ok(())
        }

        async fn latest_progress(&self, user_id: &str) -> Result<Option<Value>> {
            if self.fail {
                anyhow::bail!("connection reset");
            }
            Ok(self
                .rows()
                .into_iter()
                .rev()
                .find(|(t, u, _)| *t == Table::ProgressSnapshots && u.as_deref() == Some(user_id))
                .map(|(_, _, payload)| payload))
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn service_with(store: Arc<RecordingStore>) -> EducationService {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());
        EducationService::new(EducationConfig::default(), store, Arc::new(clock))
    }

    async fn settle(store: &RecordingStore, expected: usize) {
        for _ in 0..50 {
            if store.rows().len() >= expected {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    fn streak_request(record: bool) -> StreakRequest {
        StreakRequest {
            current_streak: 5,
            max_streak: 5,
            last_active_date: Some("2026-02-28".to_string()),
            timezone_label: "UTC".to_string(),
            grace_period: false,
            record_activity: record,
            user_id: Some("u-1".to_string()),
        }
    }

    fn ai_request() -> AiDecisionRequest {
        AiDecisionRequest {
            scores: ModelScores {
                lstm_score: 0.78,
                cnn_score: 0.72,
                technical_score: 0.68,
                sentiment_score: 0.61,
                risk_score: 0.35,
            },
            final_decision: "BUY".to_string(),
            confidence: 0.76,
            user_id: None,
        }
    }

    fn prediction_request() -> PredictionRequest {
        PredictionRequest {
            user_prediction: "buy".to_string(),
            user_confidence: 0.9,
            ai_prediction: "BUY".to_string(),
            actual_outcome: "SELL".to_string(),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn test_indicator_result_is_persisted() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());

        let envelope = service
            .explain_indicator(&IndicatorRequest {
                indicator: "rsi".to_string(),
                value: 73.5,
                context: None,
                user_id: Some("u-1".to_string()),
            })
            .unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.data.indicator_name, "RSI");

        settle(&store, 1).await;
        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, Table::IndicatorExplanations);
        assert_eq!(rows[0].1.as_deref(), Some("u-1"));
        assert_eq!(rows[0].2["market_signal"], "OVERBOUGHT");
        assert_eq!(rows[0].2["value"], 73.5);
    }

    #[tokio::test]
    async fn test_validation_failure_persists_nothing() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());

        let err = service
            .simulate_strategy(&StrategyRequest {
                investment_amount: 10_000.0,
                predicted_change_percent: 12.5,
                risk_score: 0.35,
                volatility_score: 0.40,
                scenario_type: "apocalypse".to_string(),
                user_id: None,
            })
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownScenario { .. }));

        settle(&store, 1).await;
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_does_not_change_result() {
        let store = Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        });
        let service = service_with(store.clone());

        let envelope = service
            .simulate_strategy(&StrategyRequest {
                investment_amount: 10_000.0,
                predicted_change_percent: 12.5,
                risk_score: 0.35,
                volatility_score: 0.40,
                scenario_type: "normal".to_string(),
                user_id: None,
            })
            .unwrap();
        assert_eq!(envelope.data.projected_value, 11_050.0);
        assert_eq!(envelope.data.worst_case_projection, 7_600.0);
        settle(&store, 1).await;
    }

    #[test]
    fn test_works_without_runtime() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());
        let envelope = service.evaluate_prediction(&prediction_request()).unwrap();
        assert_eq!(envelope.data.correctness.as_str(), "INCORRECT");
        assert!(store.rows().is_empty());
    }

    #[tokio::test]
    async fn test_streak_dispatch_and_projection() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());

        match service.streak(&streak_request(false)).unwrap().into_data() {
            StreakOutcome::Status { current_state } => {
                assert_eq!(current_state.current_streak, 5);
                assert!(!current_state.streak_broken);
            }
            other => panic!("expected status, got {other:?}"),
        }

        match service.streak(&streak_request(true)).unwrap().into_data() {
            StreakOutcome::Recorded(update) => {
                assert!(update.streak_extended);
                assert!(update.is_new_record);
                assert_eq!(update.updated_state.current_streak, 6);
            }
            other => panic!("expected update, got {other:?}"),
        }

        settle(&store, 1).await;
        let rows = store.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, Table::Streaks);
        assert_eq!(rows[0].2["max_streak"], 6);
    }

    #[test]
    fn test_bad_streak_date_is_rejected() {
        let service = EducationService::default();
        let mut req = streak_request(false);
        req.last_active_date = Some("28/02/2026".to_string());
        assert!(matches!(
            service.streak_status(&req),
            Err(ValidationError::InvalidDate { .. })
        ));

        req.last_active_date = None;
        let state = service.streak_status(&req).unwrap().into_data();
        assert_eq!(state.days_until_expiry, 0);
    }

    #[tokio::test]
    async fn test_quiz_projection() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());

        let question = QuizQuestion::new(
            "q001",
            "An RSI reading of 78 most likely indicates which market condition?",
            vec!["Oversold".into(), "Neutral".into(), "Overbought".into(), "Trending".into()],
            "C",
            TopicTag::Rsi,
            Difficulty::Easy,
            "RSI above 70 indicates overbought conditions.",
        )
        .unwrap();

        let result = service
            .evaluate_quiz(&QuizSubmission {
                quiz_id: "quiz_session_001".to_string(),
                questions: vec![question],
                user_answers: vec![UserAnswer::new("q001", "c")],
                user_id: Some("u-9".to_string()),
            })
            .unwrap()
            .into_data();
        assert_eq!(result.correct_count, 1);

        settle(&store, 1).await;
        let rows = store.rows();
        assert_eq!(rows[0].0, Table::QuizResults);
        assert_eq!(rows[0].2["mastery_level"], "ADVANCED");
        assert_eq!(rows[0].2["points_earned"], 10);
    }

    #[tokio::test]
    async fn test_progress_round_trip_through_store() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());

        let input = UserProgressInput::new("u-42", 18, 35, 26, 12, 34).unwrap();
        let snapshot = service.compute_progress(&input).unwrap().into_data();
        settle(&store, 1).await;

        let lookup = service.latest_progress("u-42").await.into_data();
        let record = lookup.record.unwrap();
        assert_eq!(record["total_points"], snapshot.total_points);
        assert_eq!(record["badge_count"], snapshot.badges.len());
        assert!(lookup.message.is_none());

        let missing = service.latest_progress("u-0").await.into_data();
        assert!(missing.record.is_none());
        assert_eq!(missing.message.as_deref(), Some("No progress record found."));
    }

    #[tokio::test]
    async fn test_latest_progress_degrades() {
        let service = EducationService::default();
        let lookup = service.latest_progress("u-1").await;
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["user_id"], "u-1");
        assert!(json["data"]["record"].is_null());
        assert_eq!(json["data"]["message"], "Persistence layer unavailable.");

        let failing = service_with(Arc::new(RecordingStore {
            fail: true,
            ..Default::default()
        }));
        let lookup = failing.latest_progress("u-1").await.into_data();
        assert_eq!(
            lookup.message.as_deref(),
            Some("Progress record temporarily unavailable.")
        );
    }

    #[tokio::test]
    async fn test_summary_composes_and_tags_user() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());

        let summary = service
            .education_summary(&SummaryRequest {
                indicators: vec![IndicatorRequest {
                    indicator: "Volatility".to_string(),
                    value: 22.0,
                    context: None,
                    user_id: None,
                }],
                ai_decision: ai_request(),
                prediction: prediction_request(),
                streak: streak_request(true),
                user_id: Some("u-7".to_string()),
            })
            .unwrap()
            .into_data();

        assert_eq!(summary.indicator_explanations.len(), 1);
        assert!(matches!(summary.streak_status, StreakOutcome::Recorded(_)));

        settle(&store, 4).await;
        let rows = store.rows();
        assert_eq!(rows.len(), 4);
        assert!(rows
            .iter()
            .filter(|(t, _, _)| *t != Table::Streaks)
            .all(|(_, user, _)| user.as_deref() == Some("u-7")));
        // An explicit user id on a part wins.
        assert!(rows
            .iter()
            .any(|(t, user, _)| *t == Table::Streaks && user.as_deref() == Some("u-1")));
    }

    #[tokio::test]
    async fn test_failed_summary_persists_no_part() {
        let store = Arc::new(RecordingStore::default());
        let service = service_with(store.clone());

        let mut prediction = prediction_request();
        prediction.user_confidence = 1.5;
        let result = service.education_summary(&SummaryRequest {
            indicators: vec![IndicatorRequest {
                indicator: "RSI".to_string(),
                value: 72.0,
                context: None,
                user_id: None,
            }],
            ai_decision: ai_request(),
            prediction,
            streak: streak_request(true),
            user_id: Some("u-7".to_string()),
        });
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));

        settle(&store, 1).await;
        assert!(store.rows().is_empty());
    }

    #[test]
    fn test_summary_fails_on_any_invalid_part() {
        let service = EducationService::default();
        let mut prediction = prediction_request();
        prediction.user_confidence = 1.5;
        let result = service.education_summary(&SummaryRequest {
            indicators: vec![],
            ai_decision: ai_request(),
            prediction,
            streak: streak_request(false),
            user_id: None,
        });
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_streak_outcome_shapes() {
        let service = EducationService::new(
            EducationConfig::default(),
            Arc::new(NoopStore),
            Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap())),
        );
        let status = serde_json::to_value(service.streak(&streak_request(false)).unwrap()).unwrap();
        assert_eq!(status["data"]["current_state"]["last_active_date"], "2026-02-28");

        let recorded = serde_json::to_value(service.streak(&streak_request(true)).unwrap()).unwrap();
        assert_eq!(recorded["data"]["updated_state"]["last_active_date"], "2026-03-01");
        assert_eq!(recorded["data"]["streak_extended"], true);
    }
}

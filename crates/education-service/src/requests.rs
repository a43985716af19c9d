//! Wire-level request payloads. Direction, scenario and date fields stay as
//! strings here and are validated by the engines.

use ai_decision_explainer::ModelScores;
use indicator_explainer::IndicatorContext;
use progress_tracker::UserProgressInput;
use quiz_engine::{QuizQuestion, UserAnswer};
use serde::{Deserialize, Serialize};

fn default_scenario() -> String {
    "NORMAL".to_string()
}

fn default_timezone() -> String {
    streak_engine::DEFAULT_TIMEZONE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRequest {
    #[serde(alias = "indicator_name")]
    pub indicator: String,
    pub value: f64,
    #[serde(default)]
    pub context: Option<IndicatorContext>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDecisionRequest {
    #[serde(flatten)]
    pub scores: ModelScores,
    pub final_decision: String,
    pub confidence: f64,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub user_prediction: String,
    pub user_confidence: f64,
    pub ai_prediction: String,
    pub actual_outcome: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRequest {
    pub investment_amount: f64,
    pub predicted_change_percent: f64,
    pub risk_score: f64,
    pub volatility_score: f64,
    #[serde(default = "default_scenario")]
    pub scenario_type: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub quiz_id: String,
    pub questions: Vec<QuizQuestion>,
    #[serde(alias = "answers")]
    pub user_answers: Vec<UserAnswer>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRequest {
    pub current_streak: i64,
    pub max_streak: i64,
    /// `YYYY-MM-DD`, absent for a user who has never been active
    #[serde(default)]
    pub last_active_date: Option<String>,
    #[serde(default = "default_timezone", alias = "timezone")]
    pub timezone_label: String,
    #[serde(default)]
    pub grace_period: bool,
    /// Record today's activity instead of only reporting status
    #[serde(default)]
    pub record_activity: bool,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Inputs for a composite post-trade report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub indicators: Vec<IndicatorRequest>,
    pub ai_decision: AiDecisionRequest,
    pub prediction: PredictionRequest,
    pub streak: StreakRequest,
    #[serde(default)]
    pub user_id: Option<String>,
}

pub type ProgressRequest = UserProgressInput;

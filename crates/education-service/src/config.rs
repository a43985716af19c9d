use ai_decision_explainer::AiDecisionConfig;
use anyhow::{Context, Result};
use indicator_explainer::IndicatorConfig;
use prediction_playground::PlaygroundConfig;
use progress_tracker::{BadgePolicy, ProgressConfig};
use quiz_engine::QuizConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strategy_simulator::StrategyConfig;
use streak_engine::StreakConfig;

/// Threshold tables for every engine. Any field left out of a JSON override
/// keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationConfig {
    pub indicator: IndicatorConfig,
    pub ai_decision: AiDecisionConfig,
    pub playground: PlaygroundConfig,
    pub strategy: StrategyConfig,
    pub quiz: QuizConfig,
    pub streak: StreakConfig,
    pub progress: ProgressConfig,
}

impl EducationConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Invalid education config JSON")
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read education config {}", path.display()))?;
        let config = Self::from_json_str(&raw)?;
        tracing::info!("Loaded education config overrides from {}", path.display());
        Ok(config)
    }

    pub fn with_badge_policy(mut self, policy: BadgePolicy) -> Self {
        self.progress.badges.policy = policy;
        self
    }
}

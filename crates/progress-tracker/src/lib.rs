//! Progress Tracker
//!
//! Folds a user's lifetime learning aggregates into points, a level, badges
//! and engagement/consistency/maturity classifications. Every snapshot is a
//! pure derivation of its input.

mod badges;

pub use badges::{Badge, BadgePolicy, BadgeRules, BadgeTier};

use education_core::{ensure_non_negative, ensure_range, round_to, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelThreshold {
    pub min_points: i64,
    pub name: String,
}

impl LevelThreshold {
    fn new(min_points: i64, name: &str) -> Self {
        Self {
            min_points,
            name: name.to_string(),
        }
    }
}

/// Point awards, the level ladder, and classification cut-offs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub points_per_quiz: i64,
    pub points_per_correct_prediction: i64,
    pub points_per_calibrated_prediction: i64,
    /// Calibration score that earns the calibration award
    pub calibrated_threshold: f64,

    /// Bonus by highest streak milestone reached (bronze/silver/gold days
    /// come from `badges`)
    pub streak_bronze_bonus: i64,
    pub streak_silver_bonus: i64,
    pub streak_gold_bonus: i64,

    /// Ascending by `min_points`, first entry at 0
    pub levels: Vec<LevelThreshold>,

    pub badges: BadgeRules,

    pub engagement_quiz_weight: f64,
    pub engagement_prediction_weight: f64,
    pub engagement_streak_weight: f64,
    pub engagement_calibration_weight: f64,
    /// Streak length at which the streak component saturates
    pub engagement_streak_days: f64,

    /// Activity counts at which each consistency component saturates
    pub consistency_quiz_target: f64,
    pub consistency_prediction_target: f64,
    pub consistency_streak_target: f64,
    pub consistency_quiz_weight: f64,
    pub consistency_prediction_weight: f64,
    pub consistency_streak_weight: f64,
    pub consistency_high: f64,
    pub consistency_medium: f64,

    pub maturity_quiz_weight: f64,
    pub maturity_prediction_weight: f64,
    pub maturity_calibration_weight: f64,

    pub maturity_expert: f64,
    pub maturity_proficient: f64,
    pub maturity_competent: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            points_per_quiz: 10,
            points_per_correct_prediction: 15,
            points_per_calibrated_prediction: 20,
            calibrated_threshold: 0.80,
            streak_bronze_bonus: 25,
            streak_silver_bonus: 75,
            streak_gold_bonus: 200,
            levels: vec![
                LevelThreshold::new(0, "Novice"),
                LevelThreshold::new(100, "Apprentice"),
                LevelThreshold::new(300, "Analyst"),
                LevelThreshold::new(600, "Strategist"),
                LevelThreshold::new(1000, "Expert"),
                LevelThreshold::new(1500, "Master"),
                LevelThreshold::new(2500, "Elite"),
            ],
            badges: BadgeRules::default(),
            engagement_quiz_weight: 0.35,
            engagement_prediction_weight: 0.30,
            engagement_streak_weight: 0.25,
            engagement_calibration_weight: 0.10,
            engagement_streak_days: 30.0,
            consistency_quiz_target: 20.0,
            consistency_prediction_target: 30.0,
            consistency_streak_target: 14.0,
            consistency_quiz_weight: 0.40,
            consistency_prediction_weight: 0.30,
            consistency_streak_weight: 0.30,
            consistency_high: 0.75,
            consistency_medium: 0.45,
            maturity_quiz_weight: 0.40,
            maturity_prediction_weight: 0.35,
            maturity_calibration_weight: 0.25,
            maturity_expert: 80.0,
            maturity_proficient: 67.5,
            maturity_competent: 55.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LearningConsistency {
    High,
    Medium,
    Low,
}

impl LearningConsistency {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningConsistency::High => "HIGH",
            LearningConsistency::Medium => "MEDIUM",
            LearningConsistency::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SkillMaturity {
    Expert,
    Proficient,
    Competent,
    Developing,
}

impl SkillMaturity {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillMaturity::Expert => "EXPERT",
            SkillMaturity::Proficient => "PROFICIENT",
            SkillMaturity::Competent => "COMPETENT",
            SkillMaturity::Developing => "DEVELOPING",
        }
    }
}

/// Lifetime aggregates for one user. Quiz scores are percentages, calibration
/// scores lie in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgressInput {
    pub user_id: String,
    pub quizzes_completed: i64,
    #[serde(default)]
    pub quiz_scores: Vec<f64>,
    pub predictions_made: i64,
    pub correct_predictions: i64,
    #[serde(default)]
    pub calibration_scores: Vec<f64>,
    pub current_streak: i64,
    pub max_streak_achieved: i64,
    #[serde(default)]
    pub total_points: i64,
    #[serde(default)]
    pub existing_badge_ids: BTreeSet<String>,
}

impl UserProgressInput {
    /// Builds an input with empty histories; fill the lists through the
    /// public fields, then call `validate` or hand it to the tracker.
    pub fn new(
        user_id: impl Into<String>,
        quizzes_completed: i64,
        predictions_made: i64,
        correct_predictions: i64,
        current_streak: i64,
        max_streak_achieved: i64,
    ) -> Result<Self, ValidationError> {
        let input = Self {
            user_id: user_id.into(),
            quizzes_completed,
            quiz_scores: Vec::new(),
            predictions_made,
            correct_predictions,
            calibration_scores: Vec::new(),
            current_streak,
            max_streak_achieved,
            total_points: 0,
            existing_badge_ids: BTreeSet::new(),
        };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_non_negative("quizzes_completed", self.quizzes_completed)?;
        ensure_non_negative("predictions_made", self.predictions_made)?;
        ensure_non_negative("correct_predictions", self.correct_predictions)?;
        ensure_non_negative("current_streak", self.current_streak)?;
        ensure_non_negative("max_streak_achieved", self.max_streak_achieved)?;
        ensure_non_negative("total_points", self.total_points)?;

        if self.correct_predictions > self.predictions_made {
            return Err(ValidationError::inconsistent(format!(
                "correct_predictions ({}) cannot exceed predictions_made ({}).",
                self.correct_predictions, self.predictions_made
            )));
        }
        if self.max_streak_achieved < self.current_streak {
            return Err(ValidationError::inconsistent(format!(
                "max_streak_achieved ({}) cannot be less than current_streak ({}).",
                self.max_streak_achieved, self.current_streak
            )));
        }

        for score in &self.quiz_scores {
            ensure_range("quiz_scores", *score, 0.0, 100.0)?;
        }
        for score in &self.calibration_scores {
            ensure_range("calibration_scores", *score, 0.0, 1.0)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgressSnapshot {
    pub user_id: String,
    pub total_points: i64,
    pub level: String,
    pub badges: Vec<Badge>,
    pub current_streak: i64,
    pub max_streak_achieved: i64,
    pub quiz_average: f64,
    pub prediction_accuracy: f64,
    pub avg_calibration: f64,
    pub engagement_score: f64,
    pub learning_consistency: LearningConsistency,
    pub skill_maturity: SkillMaturity,
    pub points_to_next_level: i64,
    pub summary_narrative: String,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Progress calculator
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    config: ProgressConfig,
}

impl ProgressTracker {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Validates the aggregates, then derives the snapshot.
    pub fn compute(&self, input: &UserProgressInput) -> Result<UserProgressSnapshot, ValidationError> {
        input.validate()?;
        tracing::info!("Computing progress snapshot for user {}", input.user_id);

        let quiz_average = mean(&input.quiz_scores);
        let prediction_accuracy = if input.predictions_made > 0 {
            input.correct_predictions as f64 / input.predictions_made as f64 * 100.0
        } else {
            0.0
        };
        let avg_calibration = mean(&input.calibration_scores);

        let computed_points = self.points(input);
        let total_points = input.total_points.max(computed_points);
        let (level, points_to_next_level) = self.level(total_points);

        let badges = self.config.badges.award(input, quiz_average, avg_calibration);
        let engagement_score =
            self.engagement(quiz_average, prediction_accuracy, input.current_streak, avg_calibration);
        let learning_consistency = self.consistency(
            input.quizzes_completed,
            input.predictions_made,
            input.current_streak,
        );
        let skill_maturity = self.maturity(quiz_average, prediction_accuracy, avg_calibration);

        tracing::debug!(
            "user={} computed_points={} effective={} level={} badges={} engagement={:.4}",
            input.user_id,
            computed_points,
            total_points,
            level,
            badges.len(),
            engagement_score
        );

        let summary_narrative = narrative(
            &level,
            skill_maturity,
            learning_consistency,
            badges.len(),
            quiz_average,
            prediction_accuracy,
        );

        Ok(UserProgressSnapshot {
            user_id: input.user_id.clone(),
            total_points,
            level,
            badges,
            current_streak: input.current_streak,
            max_streak_achieved: input.max_streak_achieved,
            quiz_average: round_to(quiz_average, 2),
            prediction_accuracy: round_to(prediction_accuracy, 2),
            avg_calibration: round_to(avg_calibration, 4),
            engagement_score,
            learning_consistency,
            skill_maturity,
            points_to_next_level,
            summary_narrative,
        })
    }

    /// Points implied by the history alone.
    pub fn points(&self, input: &UserProgressInput) -> i64 {
        let cfg = &self.config;
        let rules = &cfg.badges;

        let streak_bonus = if input.max_streak_achieved >= rules.streak_gold_days {
            cfg.streak_gold_bonus
        } else if input.max_streak_achieved >= rules.streak_silver_days {
            cfg.streak_silver_bonus
        } else if input.max_streak_achieved >= rules.streak_bronze_days {
            cfg.streak_bronze_bonus
        } else {
            0
        };

        let calibrated = input
            .calibration_scores
            .iter()
            .filter(|s| **s >= cfg.calibrated_threshold)
            .count() as i64;

        input.quizzes_completed * cfg.points_per_quiz
            + input.correct_predictions * cfg.points_per_correct_prediction
            + streak_bonus
            + calibrated * cfg.points_per_calibrated_prediction
    }

    /// Level name and the distance to the next threshold (0 at the top).
    pub fn level(&self, points: i64) -> (String, i64) {
        let levels = &self.config.levels;
        let idx = levels
            .iter()
            .rposition(|l| points >= l.min_points)
            .unwrap_or(0);

        let name = levels
            .get(idx)
            .map(|l| l.name.clone())
            .unwrap_or_default();
        let to_next = levels
            .get(idx + 1)
            .map(|next| next.min_points - points)
            .unwrap_or(0);
        (name, to_next)
    }

    pub fn engagement(
        &self,
        quiz_average: f64,
        prediction_accuracy: f64,
        current_streak: i64,
        avg_calibration: f64,
    ) -> f64 {
        let cfg = &self.config;
        let streak = (current_streak as f64 / cfg.engagement_streak_days).min(1.0);
        let raw = quiz_average / 100.0 * cfg.engagement_quiz_weight
            + prediction_accuracy / 100.0 * cfg.engagement_prediction_weight
            + streak * cfg.engagement_streak_weight
            + avg_calibration * cfg.engagement_calibration_weight;
        round_to(raw.min(1.0), 4)
    }

    pub fn consistency(&self, quizzes: i64, predictions: i64, current_streak: i64) -> LearningConsistency {
        let cfg = &self.config;
        let quiz = quizzes as f64 / cfg.consistency_quiz_target;
        let prediction = predictions as f64 / cfg.consistency_prediction_target;
        let streak = current_streak as f64 / cfg.consistency_streak_target;
        let activity = (quiz * cfg.consistency_quiz_weight
            + prediction * cfg.consistency_prediction_weight
            + streak * cfg.consistency_streak_weight)
            .min(1.0);

        if activity >= cfg.consistency_high {
            LearningConsistency::High
        } else if activity >= cfg.consistency_medium {
            LearningConsistency::Medium
        } else {
            LearningConsistency::Low
        }
    }

    pub fn maturity(&self, quiz_average: f64, prediction_accuracy: f64, avg_calibration: f64) -> SkillMaturity {
        let cfg = &self.config;
        let composite = (quiz_average / 100.0 * cfg.maturity_quiz_weight
            + prediction_accuracy / 100.0 * cfg.maturity_prediction_weight
            + avg_calibration * cfg.maturity_calibration_weight)
            * 100.0;

        if composite >= cfg.maturity_expert {
            SkillMaturity::Expert
        } else if composite >= cfg.maturity_proficient {
            SkillMaturity::Proficient
        } else if composite >= cfg.maturity_competent {
            SkillMaturity::Competent
        } else {
            SkillMaturity::Developing
        }
    }
}

fn narrative(
    level: &str,
    maturity: SkillMaturity,
    consistency: LearningConsistency,
    badge_count: usize,
    quiz_average: f64,
    prediction_accuracy: f64,
) -> String {
    let badge_text = match badge_count {
        0 => "No badges earned yet; continue learning to unlock achievements.".to_string(),
        1 => "You have earned 1 badge.".to_string(),
        n => format!("You have earned {n} badges."),
    };

    format!(
        "Current Level: {}. Skill Maturity: {}. Learning Consistency: {}. \
         Quiz Average: {:.1}%. Prediction Accuracy: {:.1}%. {}",
        level,
        maturity.as_str(),
        consistency.as_str(),
        quiz_average,
        prediction_accuracy,
        badge_text
    )
}

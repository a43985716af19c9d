use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::UserProgressInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BadgeTier {
    Bronze,
    Silver,
    Gold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub badge_id: String,
    pub name: String,
    pub tier: BadgeTier,
    pub description: String,
}

/// Whether badges the user already holds are reported again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgePolicy {
    /// Every qualifying badge, every snapshot
    #[default]
    ReturnAll,
    /// Only badges missing from `existing_badge_ids`
    ExcludeExisting,
}

impl BadgePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "return_all" => Some(BadgePolicy::ReturnAll),
            "exclude_existing" => Some(BadgePolicy::ExcludeExisting),
            _ => None,
        }
    }

    fn apply(&self, badges: Vec<Badge>, existing: &BTreeSet<String>) -> Vec<Badge> {
        match self {
            BadgePolicy::ReturnAll => badges,
            BadgePolicy::ExcludeExisting => badges
                .into_iter()
                .filter(|b| !existing.contains(&b.badge_id))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeRules {
    pub streak_bronze_days: i64,
    pub streak_silver_days: i64,
    pub streak_gold_days: i64,
    /// Quiz average percentage for Scholar
    pub scholar_accuracy: f64,
    pub scholar_min_quizzes: i64,
    /// Average calibration for Precision Trader
    pub precision_calibration: f64,
    pub precision_min_predictions: i64,
    pub policy: BadgePolicy,
}

impl Default for BadgeRules {
    fn default() -> Self {
        Self {
            streak_bronze_days: 7,
            streak_silver_days: 30,
            streak_gold_days: 90,
            scholar_accuracy: 90.0,
            scholar_min_quizzes: 5,
            precision_calibration: 0.85,
            precision_min_predictions: 10,
            policy: BadgePolicy::ReturnAll,
        }
    }
}

impl BadgeRules {
    fn streak_badge(&self, max_streak: i64) -> Option<Badge> {
        let (badge_id, name, tier, days) = if max_streak >= self.streak_gold_days {
            ("streak_gold", "Gold Streak", BadgeTier::Gold, self.streak_gold_days)
        } else if max_streak >= self.streak_silver_days {
            ("streak_silver", "Silver Streak", BadgeTier::Silver, self.streak_silver_days)
        } else if max_streak >= self.streak_bronze_days {
            ("streak_bronze", "Bronze Streak", BadgeTier::Bronze, self.streak_bronze_days)
        } else {
            return None;
        };

        Some(Badge {
            badge_id: badge_id.to_string(),
            name: name.to_string(),
            tier,
            description: format!("Maintained a learning streak of {days}+ consecutive days."),
        })
    }

    /// Qualifying badges, filtered through the configured policy.
    pub fn award(
        &self,
        input: &UserProgressInput,
        quiz_average: f64,
        avg_calibration: f64,
    ) -> Vec<Badge> {
        let mut badges: Vec<Badge> = self
            .streak_badge(input.max_streak_achieved)
            .into_iter()
            .collect();

        if quiz_average >= self.scholar_accuracy && input.quizzes_completed >= self.scholar_min_quizzes {
            badges.push(Badge {
                badge_id: "scholar".to_string(),
                name: "Scholar".to_string(),
                tier: BadgeTier::Gold,
                description: format!(
                    "Achieved {:.0}%+ average quiz accuracy across {} completed quizzes.",
                    self.scholar_accuracy, input.quizzes_completed
                ),
            });
        }

        if avg_calibration >= self.precision_calibration
            && input.predictions_made >= self.precision_min_predictions
        {
            badges.push(Badge {
                badge_id: "precision_trader".to_string(),
                name: "Precision Trader".to_string(),
                tier: BadgeTier::Gold,
                description: format!(
                    "Maintained an average calibration score of {:.2} across {} predictions. \
                     Demonstrates disciplined probabilistic thinking.",
                    avg_calibration, input.predictions_made
                ),
            });
        }

        self.policy.apply(badges, &input.existing_badge_ids)
    }
}

//! AI Decision Explainer
//!
//! Breaks an ensemble decision (LSTM, CNN, technical, sentiment, risk) into
//! weighted contributions, measures how many directional models agree with
//! the declared call, and grades the overall reliability.

mod reasoning;

use education_core::{ensure_unit_interval, round_to, Direction, ValidationError};
use serde::{Deserialize, Serialize};

/// Ensemble weights. The risk weight applies to the inverted risk score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelWeights {
    pub lstm: f64,
    pub cnn: f64,
    pub technical: f64,
    pub sentiment: f64,
    pub risk: f64,
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self {
            lstm: 0.30,
            cnn: 0.20,
            technical: 0.25,
            sentiment: 0.15,
            risk: 0.10,
        }
    }
}

/// Thresholds for agreement, reliability and the risk penalty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiDecisionConfig {
    pub weights: ModelWeights,

    /// Agreement ratio at or above which agreement is HIGH
    pub high_agreement: f64,
    /// Agreement ratio at or above which agreement is MODERATE
    pub moderate_agreement: f64,

    /// HOLD counts a model as aligned when its score lies in this band
    pub hold_band_low: f64,
    pub hold_band_high: f64,

    pub strong_confidence: f64,
    pub moderate_confidence: f64,
    pub weak_confidence: f64,

    /// Risk at or above this applies `high_risk_penalty × risk`
    pub high_risk: f64,
    pub high_risk_penalty: f64,
    /// Risk at or above this applies `elevated_risk_penalty × risk`
    pub elevated_risk: f64,
    pub elevated_risk_penalty: f64,
}

impl Default for AiDecisionConfig {
    fn default() -> Self {
        Self {
            weights: ModelWeights::default(),
            high_agreement: 0.80,
            moderate_agreement: 0.55,
            hold_band_low: 0.40,
            hold_band_high: 0.60,
            strong_confidence: 0.75,
            moderate_confidence: 0.50,
            weak_confidence: 0.30,
            high_risk: 0.70,
            high_risk_penalty: 0.20,
            elevated_risk: 0.50,
            elevated_risk_penalty: 0.10,
        }
    }
}

/// Raw model outputs, each in [0, 1]. Higher risk means more risk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelScores {
    pub lstm_score: f64,
    pub cnn_score: f64,
    pub technical_score: f64,
    pub sentiment_score: f64,
    pub risk_score: f64,
}

/// Validated explainer input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiDecisionInput {
    scores: ModelScores,
    final_decision: Direction,
    confidence: f64,
}

impl AiDecisionInput {
    /// Range-checks every score and the confidence, and parses the decision.
    pub fn new(
        scores: ModelScores,
        final_decision: &str,
        confidence: f64,
    ) -> Result<Self, ValidationError> {
        ensure_unit_interval("lstm_score", scores.lstm_score)?;
        ensure_unit_interval("cnn_score", scores.cnn_score)?;
        ensure_unit_interval("technical_score", scores.technical_score)?;
        ensure_unit_interval("sentiment_score", scores.sentiment_score)?;
        ensure_unit_interval("risk_score", scores.risk_score)?;
        ensure_unit_interval("confidence", confidence)?;
        let final_decision = Direction::parse("final_decision", final_decision)?;

        Ok(Self {
            scores,
            final_decision,
            confidence,
        })
    }

    pub fn scores(&self) -> &ModelScores {
        &self.scores
    }

    pub fn final_decision(&self) -> Direction {
        self.final_decision
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    fn directional_scores(&self) -> [f64; 4] {
        [
            self.scores.lstm_score,
            self.scores.cnn_score,
            self.scores.technical_score,
            self.scores.sentiment_score,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgreementLevel {
    High,
    Moderate,
    Low,
}

impl AgreementLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgreementLevel::High => "HIGH",
            AgreementLevel::Moderate => "MODERATE",
            AgreementLevel::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExplanationStrength {
    Strong,
    Moderate,
    Weak,
    Unreliable,
}

impl ExplanationStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExplanationStrength::Strong => "STRONG",
            ExplanationStrength::Moderate => "MODERATE",
            ExplanationStrength::Weak => "WEAK",
            ExplanationStrength::Unreliable => "UNRELIABLE",
        }
    }
}

/// One model's share of the ensemble score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub raw_score: f64,
    pub weight: f64,
    pub contribution: f64,
}

impl Contribution {
    fn new(raw_score: f64, weight: f64) -> Self {
        Self {
            raw_score: round_to(raw_score, 4),
            weight: round_to(weight, 4),
            contribution: round_to(raw_score * weight, 4),
        }
    }
}

/// Per-model contributions, serialized in ensemble order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedContributions {
    pub lstm: Contribution,
    pub cnn: Contribution,
    pub technical: Contribution,
    pub sentiment: Contribution,
    pub risk: Contribution,
}

impl WeightedContributions {
    pub fn total(&self) -> f64 {
        [self.lstm, self.cnn, self.technical, self.sentiment, self.risk]
            .iter()
            .map(|c| c.contribution)
            .sum()
    }
}

/// Outcome of the risk penalty step
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RiskAdjustment {
    /// Risk reached the high band rather than the elevated one
    pub severe: bool,
    pub penalty: f64,
    pub adjusted_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDecisionExplanation {
    pub final_decision: Direction,
    pub confidence: f64,
    pub weighted_contributions: WeightedContributions,
    pub weighted_score: f64,
    pub reasoning_points: Vec<String>,
    pub agreement_level: AgreementLevel,
    pub agreement_ratio: f64,
    pub risk_adjustment_explanation: String,
    pub adjusted_confidence: f64,
    pub explanation_strength: ExplanationStrength,
}

#[derive(Debug, Clone, Default)]
pub struct AiDecisionExplainer {
    config: AiDecisionConfig,
}

impl AiDecisionExplainer {
    pub fn new(config: AiDecisionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AiDecisionConfig {
        &self.config
    }

    /// Validate and explain in one step.
    pub fn explain(
        &self,
        scores: ModelScores,
        final_decision: &str,
        confidence: f64,
    ) -> Result<AiDecisionExplanation, ValidationError> {
        let input = AiDecisionInput::new(scores, final_decision, confidence)?;
        Ok(self.explain_input(&input))
    }

    pub fn explain_input(&self, input: &AiDecisionInput) -> AiDecisionExplanation {
        tracing::debug!(
            "Explaining AI decision: decision={} confidence={:.3}",
            input.final_decision,
            input.confidence
        );

        let contributions = self.weighted_contributions(input);
        let (agreement_level, agreement_ratio) = self.agreement(input);
        let adjustment = self.risk_adjustment(input);

        AiDecisionExplanation {
            final_decision: input.final_decision,
            confidence: input.confidence,
            weighted_score: round_to(contributions.total(), 4),
            weighted_contributions: contributions,
            reasoning_points: reasoning::reasoning_points(input, agreement_level),
            agreement_level,
            agreement_ratio,
            risk_adjustment_explanation: reasoning::risk_adjustment_explanation(
                input,
                adjustment.as_ref(),
            ),
            adjusted_confidence: adjustment
                .map(|a| a.adjusted_confidence)
                .unwrap_or_else(|| round_to(input.confidence, 3)),
            explanation_strength: self.strength(input.confidence, agreement_level),
        }
    }

    pub fn weighted_contributions(&self, input: &AiDecisionInput) -> WeightedContributions {
        let w = &self.config.weights;
        let s = &input.scores;
        WeightedContributions {
            lstm: Contribution::new(s.lstm_score, w.lstm),
            cnn: Contribution::new(s.cnn_score, w.cnn),
            technical: Contribution::new(s.technical_score, w.technical),
            sentiment: Contribution::new(s.sentiment_score, w.sentiment),
            // High risk lowers the contribution
            risk: Contribution::new(1.0 - s.risk_score, w.risk),
        }
    }

    /// Fraction of the four directional models aligned with the decision.
    pub fn agreement(&self, input: &AiDecisionInput) -> (AgreementLevel, f64) {
        let scores = input.directional_scores();
        let aligned = scores
            .iter()
            .filter(|&&s| match input.final_decision {
                Direction::Buy => s > 0.5,
                Direction::Sell => s < 0.5,
                Direction::Hold => {
                    (self.config.hold_band_low..=self.config.hold_band_high).contains(&s)
                }
            })
            .count();
        let ratio = aligned as f64 / scores.len() as f64;

        let level = if ratio >= self.config.high_agreement {
            AgreementLevel::High
        } else if ratio >= self.config.moderate_agreement {
            AgreementLevel::Moderate
        } else {
            AgreementLevel::Low
        };
        (level, round_to(ratio, 4))
    }

    /// `None` when risk is below the elevated band and no penalty applies.
    pub(crate) fn risk_adjustment(&self, input: &AiDecisionInput) -> Option<RiskAdjustment> {
        let risk = input.scores.risk_score;
        let (severe, rate) = if risk >= self.config.high_risk {
            (true, self.config.high_risk_penalty)
        } else if risk >= self.config.elevated_risk {
            (false, self.config.elevated_risk_penalty)
        } else {
            return None;
        };

        let penalty = round_to(risk * rate, 3);
        Some(RiskAdjustment {
            severe,
            penalty,
            adjusted_confidence: round_to(input.confidence - penalty, 3).max(0.0),
        })
    }

    pub fn strength(&self, confidence: f64, agreement: AgreementLevel) -> ExplanationStrength {
        let c = &self.config;
        if confidence >= c.strong_confidence && agreement == AgreementLevel::High {
            ExplanationStrength::Strong
        } else if confidence >= c.moderate_confidence && agreement != AgreementLevel::Low {
            ExplanationStrength::Moderate
        } else if confidence >= c.weak_confidence {
            ExplanationStrength::Weak
        } else {
            ExplanationStrength::Unreliable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scores(lstm: f64, cnn: f64, technical: f64, sentiment: f64, risk: f64) -> ModelScores {
        ModelScores {
            lstm_score: lstm,
            cnn_score: cnn,
            technical_score: technical,
            sentiment_score: sentiment,
            risk_score: risk,
        }
    }

    #[test]
    fn test_rejects_out_of_range_scores() {
        let explainer = AiDecisionExplainer::default();
        let err = explainer
            .explain(scores(1.2, 0.5, 0.5, 0.5, 0.5), "BUY", 0.8)
            .unwrap_err();
        assert!(err.to_string().contains("lstm_score"));

        assert!(explainer
            .explain(scores(0.5, 0.5, 0.5, 0.5, 0.5), "BUY", -0.1)
            .is_err());
        assert!(explainer
            .explain(scores(0.5, 0.5, 0.5, 0.5, 0.5), "SHORT", 0.5)
            .is_err());
    }

    #[test]
    fn test_risk_is_inverted_before_weighting() {
        let explainer = AiDecisionExplainer::default();
        let out = explainer
            .explain(scores(0.8, 0.7, 0.6, 0.5, 0.8), "buy", 0.7)
            .unwrap();
        assert_eq!(out.final_decision, Direction::Buy);
        assert_relative_eq!(out.weighted_contributions.risk.raw_score, 0.2, epsilon = 1e-9);
        assert_relative_eq!(out.weighted_contributions.risk.contribution, 0.02, epsilon = 1e-9);
        assert_relative_eq!(out.weighted_contributions.lstm.contribution, 0.24, epsilon = 1e-9);
        // 0.24 + 0.14 + 0.15 + 0.075 + 0.02
        assert_relative_eq!(out.weighted_score, 0.625, epsilon = 1e-9);
    }

    #[test]
    fn test_agreement_levels() {
        let explainer = AiDecisionExplainer::default();

        let input = AiDecisionInput::new(scores(0.8, 0.7, 0.9, 0.6, 0.2), "BUY", 0.8).unwrap();
        assert_eq!(explainer.agreement(&input), (AgreementLevel::High, 1.0));

        let input = AiDecisionInput::new(scores(0.8, 0.7, 0.9, 0.4, 0.2), "BUY", 0.8).unwrap();
        assert_eq!(explainer.agreement(&input), (AgreementLevel::Moderate, 0.75));

        let input = AiDecisionInput::new(scores(0.8, 0.3, 0.2, 0.4, 0.2), "BUY", 0.8).unwrap();
        assert_eq!(explainer.agreement(&input), (AgreementLevel::Low, 0.25));

        let input = AiDecisionInput::new(scores(0.45, 0.55, 0.6, 0.4, 0.2), "HOLD", 0.5).unwrap();
        assert_eq!(explainer.agreement(&input), (AgreementLevel::High, 1.0));

        let input = AiDecisionInput::new(scores(0.2, 0.3, 0.1, 0.6, 0.2), "SELL", 0.5).unwrap();
        assert_eq!(explainer.agreement(&input).0, AgreementLevel::Moderate);
    }

    #[test]
    fn test_risk_penalty_bands() {
        let explainer = AiDecisionExplainer::default();

        let high = explainer
            .explain(scores(0.8, 0.8, 0.8, 0.8, 0.9), "BUY", 0.8)
            .unwrap();
        // 0.8 - 0.9 * 0.20
        assert_relative_eq!(high.adjusted_confidence, 0.62, epsilon = 1e-9);
        assert!(high.risk_adjustment_explanation.contains("0.180"));

        let elevated = explainer
            .explain(scores(0.8, 0.8, 0.8, 0.8, 0.6), "BUY", 0.8)
            .unwrap();
        assert_relative_eq!(elevated.adjusted_confidence, 0.74, epsilon = 1e-9);

        let calm = explainer
            .explain(scores(0.8, 0.8, 0.8, 0.8, 0.2), "BUY", 0.8)
            .unwrap();
        assert_relative_eq!(calm.adjusted_confidence, 0.8, epsilon = 1e-9);
        assert!(calm.risk_adjustment_explanation.contains("within acceptable bounds"));
    }

    #[test]
    fn test_adjusted_confidence_floors_at_zero() {
        let explainer = AiDecisionExplainer::default();
        let out = explainer
            .explain(scores(0.5, 0.5, 0.5, 0.5, 1.0), "HOLD", 0.1)
            .unwrap();
        assert_eq!(out.adjusted_confidence, 0.0);
    }

    #[test]
    fn test_strength_classification() {
        let explainer = AiDecisionExplainer::default();
        assert_eq!(
            explainer.strength(0.75, AgreementLevel::High),
            ExplanationStrength::Strong
        );
        assert_eq!(
            explainer.strength(0.9, AgreementLevel::Moderate),
            ExplanationStrength::Moderate
        );
        assert_eq!(
            explainer.strength(0.9, AgreementLevel::Low),
            ExplanationStrength::Weak
        );
        assert_eq!(
            explainer.strength(0.29, AgreementLevel::High),
            ExplanationStrength::Unreliable
        );
    }

    #[test]
    fn test_output_is_deterministic_and_ordered() {
        let explainer = AiDecisionExplainer::default();
        let a = explainer
            .explain(scores(0.72, 0.65, 0.68, 0.55, 0.35), "BUY", 0.78)
            .unwrap();
        let b = explainer
            .explain(scores(0.72, 0.65, 0.68, 0.55, 0.35), "BUY", 0.78)
            .unwrap();
        let json_a = serde_json::to_string(&a).unwrap();
        assert_eq!(json_a, serde_json::to_string(&b).unwrap());
        assert_eq!(a.reasoning_points.len(), 6);

        let lstm = json_a.find("\"lstm\"").unwrap();
        let risk = json_a.find("\"risk\"").unwrap();
        assert!(lstm < risk);
    }
}

//! Prediction Playground
//!
//! Scores a user's directional call against the AI call and the realized
//! outcome: correctness, Brier-style calibration, directional bias and a
//! six-part feedback report.

mod insights;

use education_core::{ensure_unit_interval, round_to, Direction, ValidationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PredictionOutcome {
    Correct,
    Incorrect,
}

impl PredictionOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, PredictionOutcome::Correct)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionOutcome::Correct => "CORRECT",
            PredictionOutcome::Incorrect => "INCORRECT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalibrationLevel {
    WellCalibrated,
    Overconfident,
    Underconfident,
}

impl CalibrationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalibrationLevel::WellCalibrated => "WELL_CALIBRATED",
            CalibrationLevel::Overconfident => "OVERCONFIDENT",
            CalibrationLevel::Underconfident => "UNDERCONFIDENT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BiasType {
    Optimistic,
    Pessimistic,
    Calibrated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasDetection {
    #[serde(rename = "type")]
    pub bias_type: BiasType,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub outcome_summary: String,
    pub confidence_assessment: String,
    pub ai_comparison: String,
    pub bias_analysis: String,
    pub behavioral_insight: String,
    pub improvement_focus: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEvaluation {
    pub user_prediction: Direction,
    pub ai_prediction: Direction,
    pub actual_outcome: Direction,
    pub user_confidence: f64,
    pub correctness: PredictionOutcome,
    pub accuracy_score: f64,
    pub calibration_score: f64,
    pub calibration_level: CalibrationLevel,
    pub bias_detection: BiasDetection,
    pub feedback_report: FeedbackReport,
}

/// Validated round input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaygroundInput {
    pub user_prediction: Direction,
    pub user_confidence: f64,
    pub ai_prediction: Direction,
    pub actual_outcome: Direction,
}

impl PlaygroundInput {
    pub fn new(
        user_prediction: &str,
        user_confidence: f64,
        ai_prediction: &str,
        actual_outcome: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user_prediction: Direction::parse("user_prediction", user_prediction)?,
            user_confidence: ensure_unit_interval("user_confidence", user_confidence)?,
            ai_prediction: Direction::parse("ai_prediction", ai_prediction)?,
            actual_outcome: Direction::parse("actual_outcome", actual_outcome)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Largest |confidence - outcome| still classed as well calibrated
    pub well_calibrated_gap: f64,
    /// Upper edge of the moderate miscalibration band. Gaps beyond it are
    /// logged as wide; the reported level is the same in both bands.
    pub moderate_gap: f64,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            well_calibrated_gap: 0.15,
            moderate_gap: 0.30,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PredictionEvaluator {
    config: PlaygroundConfig,
}

impl PredictionEvaluator {
    pub fn new(config: PlaygroundConfig) -> Self {
        Self { config }
    }

    pub fn evaluate(
        &self,
        user_prediction: &str,
        user_confidence: f64,
        ai_prediction: &str,
        actual_outcome: &str,
    ) -> Result<PredictionEvaluation, ValidationError> {
        let input = PlaygroundInput::new(user_prediction, user_confidence, ai_prediction, actual_outcome)?;
        Ok(self.evaluate_input(&input))
    }

    pub fn evaluate_input(&self, input: &PlaygroundInput) -> PredictionEvaluation {
        tracing::debug!(
            "Evaluating prediction: user={} ai={} actual={} confidence={:.2}",
            input.user_prediction,
            input.ai_prediction,
            input.actual_outcome,
            input.user_confidence
        );

        let correctness = if input.user_prediction == input.actual_outcome {
            PredictionOutcome::Correct
        } else {
            PredictionOutcome::Incorrect
        };
        let (calibration_score, calibration_level) =
            self.calibration(input.user_confidence, correctness);
        let bias_detection = detect_bias(input);
        let feedback_report = feedback_report(
            input,
            correctness,
            calibration_score,
            calibration_level,
            &bias_detection,
        );

        PredictionEvaluation {
            user_prediction: input.user_prediction,
            ai_prediction: input.ai_prediction,
            actual_outcome: input.actual_outcome,
            user_confidence: input.user_confidence,
            correctness,
            accuracy_score: if correctness.is_correct() { 1.0 } else { 0.0 },
            calibration_score,
            calibration_level,
            bias_detection,
            feedback_report,
        }
    }

    /// Brier complement `1 - gap²`, rounded to 4 dp, plus the gap classification.
    pub fn calibration(
        &self,
        confidence: f64,
        correctness: PredictionOutcome,
    ) -> (f64, CalibrationLevel) {
        let outcome = if correctness.is_correct() { 1.0 } else { 0.0 };
        let gap = (confidence - outcome).abs();
        let score = round_to(1.0 - gap * gap, 4);

        let level = if gap <= self.config.well_calibrated_gap {
            CalibrationLevel::WellCalibrated
        } else if confidence > outcome {
            CalibrationLevel::Overconfident
        } else {
            CalibrationLevel::Underconfident
        };

        if level != CalibrationLevel::WellCalibrated {
            let band = if gap <= self.config.moderate_gap { "moderate" } else { "wide" };
            tracing::debug!("Calibration gap {:.3} ({} band): {}", gap, band, level.as_str());
        }
        (score, level)
    }
}

/// Optimistic when the user sits above both the outcome and the AI on the
/// BUY(+1) / HOLD(0) / SELL(-1) scale, pessimistic when below both.
pub fn detect_bias(input: &PlaygroundInput) -> BiasDetection {
    let user = input.user_prediction.to_score();
    let vs_actual = user - input.actual_outcome.to_score();
    let vs_ai = user - input.ai_prediction.to_score();

    let (bias_type, explanation) = if vs_actual > 0 && vs_ai > 0 {
        (BiasType::Optimistic, insights::OPTIMISM_BIAS)
    } else if vs_actual < 0 && vs_ai < 0 {
        (BiasType::Pessimistic, insights::PESSIMISM_BIAS)
    } else {
        (BiasType::Calibrated, insights::DIRECTIONAL_NEUTRALITY)
    };

    BiasDetection {
        bias_type,
        explanation: explanation.to_string(),
    }
}

fn behavioral_insight(correctness: PredictionOutcome, level: CalibrationLevel) -> &'static str {
    match (level, correctness.is_correct()) {
        (CalibrationLevel::Overconfident, true) => insights::OVERCONFIDENT_CORRECT,
        (CalibrationLevel::Overconfident, false) => insights::OVERCONFIDENT_INCORRECT,
        (CalibrationLevel::Underconfident, true) => insights::UNDERCONFIDENT_CORRECT,
        (CalibrationLevel::Underconfident, false) => insights::UNDERCONFIDENT_INCORRECT,
        (CalibrationLevel::WellCalibrated, true) => insights::CALIBRATED_CORRECT,
        (CalibrationLevel::WellCalibrated, false) => insights::CALIBRATED_INCORRECT,
    }
}

fn feedback_report(
    input: &PlaygroundInput,
    correctness: PredictionOutcome,
    calibration_score: f64,
    calibration_level: CalibrationLevel,
    bias: &BiasDetection,
) -> FeedbackReport {
    let outcome_summary = if correctness.is_correct() {
        format!(
            "Your prediction ({}) matched the actual outcome ({}).",
            input.user_prediction, input.actual_outcome
        )
    } else {
        format!(
            "Your prediction ({}) did not match the actual outcome ({}).",
            input.user_prediction, input.actual_outcome
        )
    };

    let confidence_assessment = format!(
        "You stated {:.0}% confidence. Calibration assessment: {}. \
         Calibration score: {:.3} (1.0 = perfect).",
        input.user_confidence * 100.0,
        calibration_level.as_str(),
        calibration_score
    );

    let agreement = if input.user_prediction == input.ai_prediction {
        "Your prediction agreed with the AI."
    } else {
        "Your prediction diverged from the AI recommendation."
    };
    let ai_comparison = format!("The AI model predicted {}. {}", input.ai_prediction, agreement);

    let improvement_focus = match calibration_level {
        CalibrationLevel::WellCalibrated => insights::FOCUS_MAINTAIN,
        CalibrationLevel::Overconfident | CalibrationLevel::Underconfident => {
            insights::FOCUS_RECALIBRATE
        }
    };

    FeedbackReport {
        outcome_summary,
        confidence_assessment,
        ai_comparison,
        bias_analysis: bias.explanation.clone(),
        behavioral_insight: behavioral_insight(correctness, calibration_level).to_string(),
        improvement_focus: improvement_focus.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn evaluate(user: &str, confidence: f64, ai: &str, actual: &str) -> PredictionEvaluation {
        PredictionEvaluator::default()
            .evaluate(user, confidence, ai, actual)
            .unwrap()
    }

    #[test]
    fn test_full_confidence_correct_is_perfect() {
        let out = evaluate("BUY", 1.0, "BUY", "BUY");
        assert_eq!(out.correctness, PredictionOutcome::Correct);
        assert_eq!(out.calibration_score, 1.0);
        assert_eq!(out.calibration_level, CalibrationLevel::WellCalibrated);
        assert_eq!(out.accuracy_score, 1.0);
    }

    #[test]
    fn test_zero_confidence_correct_scores_zero() {
        let out = evaluate("SELL", 0.0, "BUY", "SELL");
        assert_eq!(out.calibration_score, 0.0);
        assert_eq!(out.calibration_level, CalibrationLevel::Underconfident);
    }

    #[test]
    fn test_moderate_and_wide_gaps_share_a_level() {
        let evaluator = PredictionEvaluator::default();
        let (_, moderate) = evaluator.calibration(0.75, PredictionOutcome::Correct);
        let (_, wide) = evaluator.calibration(0.40, PredictionOutcome::Correct);
        assert_eq!(moderate, CalibrationLevel::Underconfident);
        assert_eq!(wide, CalibrationLevel::Underconfident);

        let config: PlaygroundConfig = serde_json::from_str(r#"{"well_calibrated_gap": 0.1}"#).unwrap();
        assert_eq!(config.moderate_gap, 0.30);
        assert_eq!(config.well_calibrated_gap, 0.1);
    }

    #[test]
    fn test_overconfident_miss() {
        let out = evaluate("BUY", 0.9, "SELL", "SELL");
        assert_eq!(out.correctness, PredictionOutcome::Incorrect);
        assert_eq!(out.accuracy_score, 0.0);
        assert_relative_eq!(out.calibration_score, 0.19, epsilon = 1e-9);
        assert_eq!(out.calibration_level, CalibrationLevel::Overconfident);
        assert!(out
            .feedback_report
            .behavioral_insight
            .starts_with("Overconfidence Bias + Confirmation Error"));
        assert!(out.feedback_report.confidence_assessment.contains("90% confidence"));
        assert!(out.feedback_report.confidence_assessment.contains("0.190"));
    }

    #[test]
    fn test_bias_detection() {
        let out = evaluate("BUY", 0.7, "HOLD", "SELL");
        assert_eq!(out.bias_detection.bias_type, BiasType::Optimistic);

        let out = evaluate("SELL", 0.7, "HOLD", "BUY");
        assert_eq!(out.bias_detection.bias_type, BiasType::Pessimistic);

        // Above the outcome but below the AI
        let out = evaluate("HOLD", 0.7, "BUY", "SELL");
        assert_eq!(out.bias_detection.bias_type, BiasType::Calibrated);
        assert_eq!(out.feedback_report.bias_analysis, out.bias_detection.explanation);
    }

    #[test]
    fn test_inputs_are_case_insensitive_and_validated() {
        let out = evaluate("buy", 0.85, "Buy", "BUY");
        assert_eq!(out.user_prediction, Direction::Buy);
        assert!(out.feedback_report.ai_comparison.ends_with("agreed with the AI."));

        let evaluator = PredictionEvaluator::default();
        assert!(evaluator.evaluate("BUY", 1.5, "BUY", "BUY").is_err());
        let err = evaluator.evaluate("BUY", 0.5, "UP", "BUY").unwrap_err();
        assert!(err.to_string().contains("ai_prediction"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(evaluate("HOLD", 0.5, "BUY", "HOLD")).unwrap();
        assert_eq!(json["correctness"], "CORRECT");
        assert_eq!(json["calibration_level"], "UNDERCONFIDENT");
        assert_eq!(json["bias_detection"]["type"], "CALIBRATED");
        assert_eq!(json["feedback_report"].as_object().unwrap().len(), 6);
    }
}

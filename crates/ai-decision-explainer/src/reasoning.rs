//! Fixed narrative ladders for the per-model reasoning points.

use crate::{AgreementLevel, AiDecisionInput, RiskAdjustment};

const STRONG_HIGH: f64 = 0.70;
const STRONG_LOW: f64 = 0.30;
const SOFT_HIGH: f64 = 0.65;
const SOFT_LOW: f64 = 0.35;

/// Picks one of three sentences depending on which side of the band `score` falls.
fn ladder(score: f64, high: f64, low: f64, bullish: String, bearish: String, neutral: String) -> String {
    if score >= high {
        bullish
    } else if score <= low {
        bearish
    } else {
        neutral
    }
}

pub(crate) fn reasoning_points(input: &AiDecisionInput, agreement: AgreementLevel) -> Vec<String> {
    let s = input.scores();
    let decision = input.final_decision();

    let lstm = s.lstm_score;
    let cnn = s.cnn_score;
    let tech = s.technical_score;
    let sent = s.sentiment_score;
    let risk = s.risk_score;

    vec![
        ladder(
            lstm,
            STRONG_HIGH,
            STRONG_LOW,
            format!(
                "LSTM trend model signals strong upside momentum (score={lstm:.2}), \
                 indicating the recent price sequence favors continuation of the uptrend."
            ),
            format!(
                "LSTM trend model signals strong downside momentum (score={lstm:.2}), \
                 suggesting the sequential price pattern is bearish."
            ),
            format!(
                "LSTM trend model is inconclusive (score={lstm:.2}); \
                 sequential price pattern does not produce a high-confidence directional signal."
            ),
        ),
        ladder(
            cnn,
            STRONG_HIGH,
            STRONG_LOW,
            format!(
                "CNN pattern recognition identified a bullish formation (score={cnn:.2}), \
                 consistent with technical breakout or accumulation patterns."
            ),
            format!(
                "CNN pattern recognition flagged a bearish structure (score={cnn:.2}), \
                 suggesting distribution or breakdown chart patterns."
            ),
            format!(
                "CNN pattern recognition produced a neutral reading (score={cnn:.2}); \
                 no dominant chart pattern detected."
            ),
        ),
        ladder(
            tech,
            SOFT_HIGH,
            SOFT_LOW,
            format!(
                "Technical scoring engine confirms positive momentum (score={tech:.2}); \
                 the majority of technical indicators are aligned bullish."
            ),
            format!(
                "Technical scoring engine shows negative momentum (score={tech:.2}); \
                 the majority of technical indicators are aligned bearish."
            ),
            format!(
                "Technical scoring engine is mixed (score={tech:.2}); \
                 indicators are not aligned in a single direction."
            ),
        ),
        ladder(
            sent,
            SOFT_HIGH,
            SOFT_LOW,
            format!(
                "News sentiment is positive (score={sent:.2}), supporting the directional thesis \
                 with favorable macro and headline tone."
            ),
            format!(
                "News sentiment is negative (score={sent:.2}); adverse headlines and macro tone \
                 present a headwind."
            ),
            format!("News sentiment is neutral (score={sent:.2}); no significant macro catalyst detected."),
        ),
        ladder(
            risk,
            STRONG_HIGH,
            STRONG_LOW,
            format!(
                "Risk model flags elevated risk exposure (score={risk:.2}). \
                 Position sizing should be reduced and stop-loss parameters tightened."
            ),
            format!(
                "Risk model indicates low systemic risk (score={risk:.2}), \
                 supporting full position sizing within the portfolio risk budget."
            ),
            format!("Risk model shows moderate risk (score={risk:.2}); standard risk controls apply."),
        ),
        match agreement {
            AgreementLevel::High => format!(
                "Model agreement is HIGH: all major models align with the {decision} decision, \
                 significantly increasing signal reliability."
            ),
            AgreementLevel::Moderate => format!(
                "Model agreement is MODERATE: most but not all models support the {decision} decision. \
                 The minority divergence introduces an element of uncertainty."
            ),
            AgreementLevel::Low => format!(
                "Model agreement is LOW: significant disagreement exists across models for the {decision} decision. \
                 This signal carries elevated uncertainty and should be weighted conservatively."
            ),
        },
    ]
}

pub(crate) fn risk_adjustment_explanation(
    input: &AiDecisionInput,
    adjustment: Option<&RiskAdjustment>,
) -> String {
    let risk = input.scores().risk_score;

    match adjustment {
        Some(adj) if adj.severe => format!(
            "Risk model score of {:.2} applied a downward confidence adjustment of {:.3}. \
             Effective confidence after risk adjustment: {:.3}. \
             High systemic risk signals reduce the actionable certainty of any directional call.",
            risk, adj.penalty, adj.adjusted_confidence
        ),
        Some(adj) => format!(
            "Risk model score of {:.2} applied a moderate confidence reduction of {:.3}. \
             Effective confidence after adjustment: {:.3}.",
            risk, adj.penalty, adj.adjusted_confidence
        ),
        None => format!(
            "Risk model score of {:.2} is within acceptable bounds. \
             No material confidence penalty applied. Reported confidence stands at {:.3}.",
            risk,
            input.confidence()
        ),
    }
}

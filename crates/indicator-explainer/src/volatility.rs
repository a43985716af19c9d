use education_core::{ConfidenceHint, MarketSignal, TradingBias};
use serde::{Deserialize, Serialize};

use crate::{build, IndicatorConfig, IndicatorContext, IndicatorExplanation, IndicatorKind, Reading};

const DEFINITION: &str = "Volatility measures the statistical dispersion of returns for an asset, \
typically expressed as annualized standard deviation of daily returns. \
It is a primary input into options pricing, position sizing, and risk models.";

/// Annualized volatility bands, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolatilityThresholds {
    pub low: f64,
    pub high: f64,
    pub extreme: f64,
}

impl Default for VolatilityThresholds {
    fn default() -> Self {
        Self {
            low: 15.0,
            high: 40.0,
            extreme: 60.0,
        }
    }
}

pub fn explain(
    config: &IndicatorConfig,
    value: f64,
    context: Option<&IndicatorContext>,
) -> IndicatorExplanation {
    let t = &config.volatility;

    let reading = if value >= t.extreme {
        Reading {
            signal: MarketSignal::Bearish,
            bias: TradingBias::Wait,
            confidence: ConfidenceHint::High,
            interpretation: format!(
                "Annualized volatility at {:.1}% is extreme (>={}%). \
                 Market conditions are highly unstable. Price discovery is impaired and slippage risk is elevated.",
                value, t.extreme
            ),
            risk_note: "Extreme volatility dramatically widens bid-ask spreads and increases stop-out risk. \
                        Reduce position sizing."
                .to_string(),
        }
    } else if value >= t.high {
        Reading {
            signal: MarketSignal::Bearish,
            bias: TradingBias::Hold,
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "Volatility at {:.1}% is elevated (>={}%). \
                 Uncertainty is high and position risk is above normal.",
                value, t.high
            ),
            risk_note: "Increase margin buffer and reduce leverage in high-volatility environments.".to_string(),
        }
    } else if value <= t.low {
        // Compressed volatility tends to precede expansion
        Reading {
            signal: MarketSignal::Neutral,
            bias: TradingBias::Wait,
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "Volatility at {:.1}% is compressed (<={}%). \
                 Low-volatility regimes often precede sharp directional moves (volatility expansion).",
                value, t.low
            ),
            risk_note: "Compressed volatility is not safe; it is a coiled spring. \
                        Be prepared for a sudden expansion."
                .to_string(),
        }
    } else {
        Reading {
            signal: MarketSignal::Neutral,
            bias: TradingBias::Hold,
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "Volatility at {:.1}% is within a normal range ({}-{}%). \
                 Market conditions support standard risk management parameters.",
                value, t.low, t.high
            ),
            risk_note: "Monitor for volatility regime changes, especially around earnings or macro events."
                .to_string(),
        }
    };

    build(IndicatorKind::Volatility, value, DEFINITION, reading, context.is_some())
}

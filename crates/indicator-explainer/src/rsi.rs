use education_core::{ConfidenceHint, MarketSignal, TradingBias};
use serde::{Deserialize, Serialize};

use crate::{build, IndicatorConfig, IndicatorContext, IndicatorExplanation, IndicatorKind, Reading};

const DEFINITION: &str = "The Relative Strength Index (RSI) is a momentum oscillator that measures \
the speed and magnitude of price changes on a 0-100 scale. \
Values above 70 indicate overbought conditions; values below 30 indicate oversold conditions.";

/// RSI ladder. Upper bounds are inclusive at the extremes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiThresholds {
    pub extreme_high: f64,
    pub overbought: f64,
    pub neutral_high: f64,
    pub neutral_low: f64,
    pub oversold: f64,
    pub extreme_low: f64,
}

impl Default for RsiThresholds {
    fn default() -> Self {
        Self {
            extreme_high: 80.0,
            overbought: 70.0,
            neutral_high: 55.0,
            neutral_low: 45.0,
            oversold: 30.0,
            extreme_low: 20.0,
        }
    }
}

pub fn explain(
    config: &IndicatorConfig,
    value: f64,
    context: Option<&IndicatorContext>,
) -> IndicatorExplanation {
    let t = &config.rsi;
    let trending = context.map(|c| c.is_trending()).unwrap_or(false);

    let reading = if value >= t.extreme_high {
        Reading {
            signal: MarketSignal::Overbought,
            bias: TradingBias::Sell,
            confidence: ConfidenceHint::High,
            interpretation: format!(
                "RSI at {:.1} is in extreme overbought territory (>={}). \
                 Price momentum is heavily skewed to the upside; mean-reversion probability is elevated.",
                value, t.extreme_high
            ),
            risk_note: "Rapid reversals are common at extreme RSI levels. Use tight stops.".to_string(),
        }
    } else if value >= t.overbought {
        Reading {
            signal: MarketSignal::Overbought,
            // Trending markets soften the overbought call
            bias: if trending { TradingBias::Hold } else { TradingBias::Sell },
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "RSI at {:.1} exceeds the overbought threshold ({}). \
                 Upward momentum remains but exhaustion signals are present.",
                value, t.overbought
            ),
            risk_note: "In strong trending markets RSI can remain overbought for extended periods."
                .to_string(),
        }
    } else if value <= t.extreme_low {
        Reading {
            signal: MarketSignal::Oversold,
            bias: TradingBias::Buy,
            confidence: ConfidenceHint::High,
            interpretation: format!(
                "RSI at {:.1} is in extreme oversold territory (<={}). \
                 Selling pressure is excessive; a technical bounce is statistically probable.",
                value, t.extreme_low
            ),
            risk_note: "Oversold readings in downtrends can persist. Confirm with volume and support levels."
                .to_string(),
        }
    } else if value <= t.oversold {
        Reading {
            signal: MarketSignal::Oversold,
            bias: TradingBias::Buy,
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "RSI at {:.1} is below the oversold threshold ({}). \
                 Bearish momentum is dominant but reversal conditions are developing.",
                value, t.oversold
            ),
            risk_note: "Do not enter long positions until a bullish divergence or candlestick confirmation appears."
                .to_string(),
        }
    } else if (t.neutral_low..=t.neutral_high).contains(&value) {
        Reading {
            signal: MarketSignal::Neutral,
            bias: TradingBias::Hold,
            confidence: ConfidenceHint::Low,
            interpretation: format!(
                "RSI at {:.1} is in the neutral midrange ({}-{}). \
                 Neither buyers nor sellers hold a decisive advantage.",
                value, t.neutral_low, t.neutral_high
            ),
            risk_note: "Neutral RSI offers no directional edge; rely on other indicators for signals."
                .to_string(),
        }
    } else if value > t.neutral_high {
        Reading {
            signal: MarketSignal::Bullish,
            bias: TradingBias::Buy,
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "RSI at {:.1} is in bullish territory ({}-{}). \
                 Buying pressure is present without triggering an overbought warning.",
                value, t.neutral_high, t.overbought
            ),
            risk_note: "Watch for RSI divergence with price if the reading climbs above 65.".to_string(),
        }
    } else {
        Reading {
            signal: MarketSignal::Bearish,
            bias: TradingBias::Sell,
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "RSI at {:.1} is in bearish territory ({}-{}). \
                 Selling pressure dominates without reaching an oversold extreme.",
                value, t.oversold, t.neutral_low
            ),
            risk_note: "Bearish RSI in a ranging market may quickly revert; use additional confirmation."
                .to_string(),
        }
    };

    build(IndicatorKind::Rsi, value, DEFINITION, reading, context.is_some())
}

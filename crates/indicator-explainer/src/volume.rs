use education_core::{ConfidenceHint, MarketSignal, TradingBias};
use serde::{Deserialize, Serialize};

use crate::{build, IndicatorConfig, IndicatorContext, IndicatorExplanation, IndicatorKind, Reading};

const DEFINITION: &str = "Volume represents the total number of shares or contracts traded during a given period. \
It is a primary confirmation tool: high volume on a directional move validates the trend, \
while low volume suggests weak conviction or potential false breakouts.";

const AVG_KEY: &str = "avg_volume";

/// Current/average volume ratios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeThresholds {
    pub high_ratio: f64,
    pub low_ratio: f64,
}

impl Default for VolumeThresholds {
    fn default() -> Self {
        Self {
            high_ratio: 1.5,
            low_ratio: 0.5,
        }
    }
}

/// Whole-number rendering with thousands separators: 1234567.8 -> "1,234,568"
fn with_separators(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

pub fn explain(
    config: &IndicatorConfig,
    value: f64,
    context: Option<&IndicatorContext>,
) -> IndicatorExplanation {
    let t = &config.volume;
    let average = context.and_then(|c| c.numeric_extra(AVG_KEY));

    let reading = match average.filter(|avg| *avg > 0.0) {
        Some(avg) => {
            let ratio = value / avg;
            if ratio >= t.high_ratio {
                Reading {
                    signal: MarketSignal::Bullish,
                    bias: TradingBias::Buy,
                    confidence: ConfidenceHint::High,
                    interpretation: format!(
                        "Current volume ({}) is {:.1}x the average ({}). \
                         Elevated volume signals strong institutional participation and validates price moves.",
                        with_separators(value),
                        ratio,
                        with_separators(avg)
                    ),
                    risk_note: "High volume on a down day is a bearish sign; confirm the price direction alongside volume."
                        .to_string(),
                }
            } else if ratio <= t.low_ratio {
                Reading {
                    signal: MarketSignal::Neutral,
                    bias: TradingBias::Hold,
                    confidence: ConfidenceHint::Low,
                    interpretation: format!(
                        "Current volume ({}) is only {:.1}x the average ({}). \
                         Low volume suggests weak conviction; price moves are less reliable.",
                        with_separators(value),
                        ratio,
                        with_separators(avg)
                    ),
                    risk_note: "Low-volume breakouts frequently fail. Wait for volume confirmation.".to_string(),
                }
            } else {
                Reading {
                    signal: MarketSignal::Neutral,
                    bias: TradingBias::Hold,
                    confidence: ConfidenceHint::Low,
                    interpretation: format!(
                        "Volume ({}) is within normal range ({:.1}x average). \
                         No abnormal institutional activity detected.",
                        with_separators(value),
                        ratio
                    ),
                    risk_note: "Ordinary volume does not add directional confidence to a signal.".to_string(),
                }
            }
        }
        None => Reading {
            signal: MarketSignal::Neutral,
            bias: TradingBias::Hold,
            confidence: ConfidenceHint::Low,
            interpretation: format!(
                "Volume is {}. Average volume not provided; relative analysis unavailable.",
                with_separators(value)
            ),
            risk_note: "Supply 'avg_volume' in context.extra to enable ratio-based volume analysis.".to_string(),
        },
    };

    build(IndicatorKind::Volume, value, DEFINITION, reading, average.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_average(avg: f64) -> IndicatorContext {
        IndicatorContext::default().with_extra(AVG_KEY, avg)
    }

    #[test]
    fn test_thousands_separators() {
        assert_eq!(with_separators(0.0), "0");
        assert_eq!(with_separators(999.0), "999");
        assert_eq!(with_separators(1000.0), "1,000");
        assert_eq!(with_separators(1_234_567.6), "1,234,568");
        assert_eq!(with_separators(-45_000.0), "-45,000");
    }

    #[test]
    fn test_high_volume_is_bullish() {
        let e = explain(&IndicatorConfig::default(), 3_000_000.0, Some(&with_average(2_000_000.0)));
        assert_eq!(e.market_signal, MarketSignal::Bullish);
        assert_eq!(e.trading_bias, TradingBias::Buy);
        assert_eq!(e.confidence_hint, ConfidenceHint::High);
        assert!(e.interpretation.contains("3,000,000"));
        assert!(e.context_applied);
    }

    #[test]
    fn test_low_and_normal_volume_are_neutral() {
        let config = IndicatorConfig::default();
        let low = explain(&config, 400_000.0, Some(&with_average(1_000_000.0)));
        assert_eq!(low.market_signal, MarketSignal::Neutral);
        assert!(low.interpretation.contains("only 0.4x"));

        let normal = explain(&config, 1_100_000.0, Some(&with_average(1_000_000.0)));
        assert_eq!(normal.market_signal, MarketSignal::Neutral);
        assert_eq!(normal.confidence_hint, ConfidenceHint::Low);
        assert!(normal.interpretation.contains("normal range"));
    }

    #[test]
    fn test_missing_average_degrades() {
        let e = explain(&IndicatorConfig::default(), 1_000.0, None);
        assert_eq!(e.market_signal, MarketSignal::Neutral);
        assert!(!e.context_applied);
        assert!(e.risk_note.contains("avg_volume"));
    }
}

use education_core::{ConfidenceHint, MarketSignal, TradingBias};
use serde::{Deserialize, Serialize};

use crate::{build, IndicatorConfig, IndicatorContext, IndicatorExplanation, IndicatorKind, Reading};

const EMA_DEFINITION: &str = "The Exponential Moving Average (EMA) is a weighted moving average that gives \
greater importance to recent price data. It reacts faster than a Simple Moving Average (SMA) \
to recent price changes, making it preferred for short-to-medium-term trend identification.";

const SMA_DEFINITION: &str = "The Simple Moving Average (SMA) is the arithmetic mean of closing prices over a \
specified period. It smooths price data to identify trend direction. \
Unlike EMA, it weighs all periods equally, making it slower to react to recent changes.";

const PRICE_KEY: &str = "current_price";

/// Percentage bands around the moving average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageBands {
    /// EMA deviation beyond which a directional call is made
    pub ema_signal_pct: f64,
    /// EMA deviation beyond which the call is HIGH confidence
    pub ema_strong_pct: f64,
    pub sma_band_pct: f64,
}

impl Default for MovingAverageBands {
    fn default() -> Self {
        Self {
            ema_signal_pct: 3.0,
            ema_strong_pct: 5.0,
            sma_band_pct: 2.0,
        }
    }
}

fn current_price(context: Option<&IndicatorContext>) -> Option<f64> {
    context.and_then(|c| c.numeric_extra(PRICE_KEY))
}

pub fn explain_ema(
    config: &IndicatorConfig,
    value: f64,
    context: Option<&IndicatorContext>,
) -> IndicatorExplanation {
    let bands = &config.moving_average;
    let price = current_price(context).filter(|_| value != 0.0);

    let reading = match price {
        Some(price) => {
            let deviation_pct = (price - value) / value * 100.0;
            if deviation_pct > bands.ema_signal_pct {
                Reading {
                    signal: MarketSignal::Bullish,
                    bias: TradingBias::Buy,
                    confidence: if deviation_pct > bands.ema_strong_pct {
                        ConfidenceHint::High
                    } else {
                        ConfidenceHint::Medium
                    },
                    interpretation: format!(
                        "Price ({:.2}) is {:.1}% above the EMA ({:.2}). \
                         The asset is trading well above its moving average, confirming upward momentum.",
                        price, deviation_pct, value
                    ),
                    risk_note: "Extended deviation above EMA increases the probability of a mean-reversion pullback."
                        .to_string(),
                }
            } else if deviation_pct < -bands.ema_signal_pct {
                Reading {
                    signal: MarketSignal::Bearish,
                    bias: TradingBias::Sell,
                    confidence: if deviation_pct < -bands.ema_strong_pct {
                        ConfidenceHint::High
                    } else {
                        ConfidenceHint::Medium
                    },
                    interpretation: format!(
                        "Price ({:.2}) is {:.1}% below the EMA ({:.2}). \
                         The asset is trading below its moving average, indicating downward momentum.",
                        price,
                        deviation_pct.abs(),
                        value
                    ),
                    risk_note: "Price below EMA in a downtrend can accelerate; avoid catching falling knives."
                        .to_string(),
                }
            } else {
                Reading {
                    signal: MarketSignal::Neutral,
                    bias: TradingBias::Hold,
                    confidence: ConfidenceHint::Low,
                    interpretation: format!(
                        "Price ({:.2}) is within {}% of the EMA ({:.2}). \
                         The asset is consolidating around its moving average. Breakout direction is undetermined.",
                        price, bands.ema_signal_pct, value
                    ),
                    risk_note: "Wait for a decisive close above or below the EMA before taking a directional position."
                        .to_string(),
                }
            }
        }
        None => Reading {
            signal: MarketSignal::Neutral,
            bias: TradingBias::Hold,
            confidence: ConfidenceHint::Low,
            interpretation: format!(
                "EMA value is {:.2}. No current price provided; \
                 relative signal cannot be computed. Supply 'current_price' in context.extra.",
                value
            ),
            risk_note: "Signal quality is degraded without current price context.".to_string(),
        },
    };

    let applied = price.is_some();
    build(IndicatorKind::Ema, value, EMA_DEFINITION, reading, applied)
}

pub fn explain_sma(
    config: &IndicatorConfig,
    value: f64,
    context: Option<&IndicatorContext>,
) -> IndicatorExplanation {
    let band = config.moving_average.sma_band_pct / 100.0;
    let price = current_price(context);

    let reading = match price {
        Some(price) if price > value * (1.0 + band) => Reading {
            signal: MarketSignal::Bullish,
            bias: TradingBias::Buy,
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "Price ({:.2}) is above the SMA ({:.2}). \
                 The asset has been trending higher over the average period.",
                price, value
            ),
            risk_note: "SMA is a lagging indicator; it confirms trends rather than predicting reversals."
                .to_string(),
        },
        Some(price) if price < value * (1.0 - band) => Reading {
            signal: MarketSignal::Bearish,
            bias: TradingBias::Sell,
            confidence: ConfidenceHint::Medium,
            interpretation: format!(
                "Price ({:.2}) is below the SMA ({:.2}). \
                 The asset has been trending lower on average over the lookback period.",
                price, value
            ),
            risk_note: "SMA crossovers can produce whipsaws in choppy markets.".to_string(),
        },
        Some(price) => Reading {
            signal: MarketSignal::Neutral,
            bias: TradingBias::Hold,
            confidence: ConfidenceHint::Low,
            interpretation: format!(
                "Price ({:.2}) is near the SMA ({:.2}). \
                 The asset is testing its average price level; no clear directional edge.",
                price, value
            ),
            risk_note: "SMA levels often act as dynamic support/resistance; monitor price reaction closely."
                .to_string(),
        },
        None => Reading {
            signal: MarketSignal::Neutral,
            bias: TradingBias::Hold,
            confidence: ConfidenceHint::Low,
            interpretation: format!(
                "SMA value is {:.2}. No current price provided for relative comparison.",
                value
            ),
            risk_note: "Provide 'current_price' in context.extra for a directional signal.".to_string(),
        },
    };

    build(IndicatorKind::Sma, value, SMA_DEFINITION, reading, price.is_some())
}

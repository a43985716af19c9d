//! Indicator Explainer
//!
//! Rule-based explanations for technical indicator readings. Each supported
//! indicator has one handler function with its own threshold ladder; handlers
//! are looked up by name through a fixed registry.

pub mod context;
pub mod moving_average;
pub mod rsi;
pub mod volatility;
pub mod volume;

pub use context::IndicatorContext;
pub use moving_average::MovingAverageBands;
pub use rsi::RsiThresholds;
pub use volatility::VolatilityThresholds;
pub use volume::VolumeThresholds;

use education_core::{ensure_finite, ConfidenceHint, MarketSignal, TradingBias, ValidationError};
use serde::{Deserialize, Serialize};

/// Structured output shared by every indicator handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorExplanation {
    pub indicator_name: String,
    pub value: f64,
    pub definition: String,
    pub market_signal: MarketSignal,
    pub interpretation: String,
    pub trading_bias: TradingBias,
    pub confidence_hint: ConfidenceHint,
    pub risk_note: String,
    pub context_applied: bool,
}

/// Classification produced by a handler before the definition is attached
pub(crate) struct Reading {
    pub signal: MarketSignal,
    pub bias: TradingBias,
    pub confidence: ConfidenceHint,
    pub interpretation: String,
    pub risk_note: String,
}

/// Threshold tables for all handlers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub rsi: RsiThresholds,
    pub moving_average: MovingAverageBands,
    pub volume: VolumeThresholds,
    pub volatility: VolatilityThresholds,
}

/// Closed set of supported indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorKind {
    Rsi,
    Ema,
    Sma,
    Volume,
    Volatility,
}

type Handler = fn(&IndicatorConfig, f64, Option<&IndicatorContext>) -> IndicatorExplanation;

/// Name → handler table. Adding an indicator means one variant and one row here.
const REGISTRY: [(IndicatorKind, &str, Handler); 5] = [
    (IndicatorKind::Rsi, "RSI", rsi::explain),
    (IndicatorKind::Ema, "EMA", moving_average::explain_ema),
    (IndicatorKind::Sma, "SMA", moving_average::explain_sma),
    (IndicatorKind::Volume, "Volume", volume::explain),
    (IndicatorKind::Volatility, "Volatility", volatility::explain),
];

impl IndicatorKind {
    /// Canonical display name
    pub fn name(&self) -> &'static str {
        REGISTRY
            .iter()
            .find(|(kind, _, _)| kind == self)
            .map(|(_, name, _)| *name)
            .unwrap_or("UNKNOWN")
    }

    /// Case-insensitive exact match against the registered names
    pub fn from_name(name: &str) -> Option<Self> {
        let key = name.trim();
        REGISTRY
            .iter()
            .find(|(_, registered, _)| registered.eq_ignore_ascii_case(key))
            .map(|(kind, _, _)| *kind)
    }

    fn handler(&self) -> Option<Handler> {
        REGISTRY
            .iter()
            .find(|(kind, _, _)| kind == self)
            .map(|(_, _, handler)| *handler)
    }
}

/// Upper-cased registered names, sorted
pub fn supported_indicators() -> Vec<String> {
    let mut names: Vec<String> = REGISTRY
        .iter()
        .map(|(_, name, _)| name.to_ascii_uppercase())
        .collect();
    names.sort();
    names
}

/// Explainer engine holding the threshold tables
#[derive(Debug, Clone, Default)]
pub struct IndicatorExplainer {
    config: IndicatorConfig,
}

impl IndicatorExplainer {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Explain an indicator reading.
    ///
    /// Fails with `UnsupportedIndicator` when `indicator` is not registered.
    pub fn explain(
        &self,
        indicator: &str,
        value: f64,
        context: Option<&IndicatorContext>,
    ) -> Result<IndicatorExplanation, ValidationError> {
        let handler = IndicatorKind::from_name(indicator)
            .and_then(|kind| kind.handler())
            .ok_or_else(|| ValidationError::UnsupportedIndicator {
                name: indicator.to_string(),
                supported: supported_indicators().join(", "),
            })?;
        let value = ensure_finite("value", value)?;

        tracing::debug!("Explaining indicator '{}' with value={:.4}", indicator, value);
        Ok(handler(&self.config, value, context))
    }
}

pub(crate) fn build(
    kind: IndicatorKind,
    value: f64,
    definition: &str,
    reading: Reading,
    context_applied: bool,
) -> IndicatorExplanation {
    IndicatorExplanation {
        indicator_name: kind.name().to_string(),
        value,
        definition: definition.to_string(),
        market_signal: reading.signal,
        interpretation: reading.interpretation,
        trading_bias: reading.bias,
        confidence_hint: reading.confidence,
        risk_note: reading.risk_note,
        context_applied,
    }
}

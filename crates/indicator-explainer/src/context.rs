use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Optional market metadata supplied alongside an indicator value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorContext {
    /// Candle timeframe (e.g., "1D", "4H")
    pub timeframe: String,
    /// equity, crypto, forex, commodity
    pub asset_class: String,
    /// trending, ranging, volatile, unknown
    pub market_regime: String,
    /// Handler-specific inputs such as `current_price` or `avg_volume`
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for IndicatorContext {
    fn default() -> Self {
        Self {
            timeframe: "1D".to_string(),
            asset_class: "equity".to_string(),
            market_regime: "unknown".to_string(),
            extra: BTreeMap::new(),
        }
    }
}

impl IndicatorContext {
    pub fn with_regime(mut self, regime: impl Into<String>) -> Self {
        self.market_regime = regime.into();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn is_trending(&self) -> bool {
        self.market_regime.eq_ignore_ascii_case("trending")
    }

    /// Numeric `extra` entry. Numeric strings are accepted; anything else is
    /// treated as absent.
    pub fn numeric_extra(&self, key: &str) -> Option<f64> {
        let raw = self.extra.get(key)?;
        let parsed = match raw {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            tracing::warn!("Ignoring non-numeric context.extra['{}'] = {}", key, raw);
        }
        parsed
    }
}

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Directional market call shared by decisions, predictions and outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
    Hold,
}

impl Direction {
    /// Parse a direction label (case-insensitive, surrounding whitespace ignored).
    ///
    /// `field` names the input in the error message.
    pub fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Direction::Buy),
            "SELL" => Ok(Direction::Sell),
            "HOLD" => Ok(Direction::Hold),
            _ => Err(ValidationError::UnknownDirection {
                field: field.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Signed directional score: BUY = +1, HOLD = 0, SELL = -1
    pub fn to_score(&self) -> i32 {
        match self {
            Direction::Buy => 1,
            Direction::Hold => 0,
            Direction::Sell => -1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
            Direction::Hold => "HOLD",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suggested action attached to an indicator reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradingBias {
    Buy,
    Sell,
    Hold,
    Wait,
}

impl TradingBias {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingBias::Buy => "BUY",
            TradingBias::Sell => "SELL",
            TradingBias::Hold => "HOLD",
            TradingBias::Wait => "WAIT",
        }
    }
}

impl std::fmt::Display for TradingBias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market condition implied by an indicator reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketSignal {
    Bullish,
    Bearish,
    Neutral,
    Overbought,
    Oversold,
}

impl MarketSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSignal::Bullish => "BULLISH",
            MarketSignal::Bearish => "BEARISH",
            MarketSignal::Neutral => "NEUTRAL",
            MarketSignal::Overbought => "OVERBOUGHT",
            MarketSignal::Oversold => "OVERSOLD",
        }
    }
}

impl std::fmt::Display for MarketSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse confidence attached to a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceHint {
    High,
    Medium,
    Low,
}

impl ConfidenceHint {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceHint::High => "HIGH",
            ConfidenceHint::Medium => "MEDIUM",
            ConfidenceHint::Low => "LOW",
        }
    }
}

impl std::fmt::Display for ConfidenceHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parse_is_case_insensitive() {
        assert_eq!(Direction::parse("d", "buy").unwrap(), Direction::Buy);
        assert_eq!(Direction::parse("d", " Sell ").unwrap(), Direction::Sell);
        assert_eq!(Direction::parse("d", "HOLD").unwrap(), Direction::Hold);
    }

    #[test]
    fn test_direction_parse_rejects_unknown() {
        let err = Direction::parse("user_prediction", "LONG").unwrap_err();
        assert!(err.to_string().contains("user_prediction"));
        assert!(err.to_string().contains("LONG"));
    }

    #[test]
    fn test_direction_scores() {
        assert_eq!(Direction::Buy.to_score(), 1);
        assert_eq!(Direction::Hold.to_score(), 0);
        assert_eq!(Direction::Sell.to_score(), -1);
    }

    #[test]
    fn test_enums_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&Direction::Buy).unwrap(), "\"BUY\"");
        assert_eq!(serde_json::to_string(&TradingBias::Wait).unwrap(), "\"WAIT\"");
        assert_eq!(
            serde_json::to_string(&MarketSignal::Overbought).unwrap(),
            "\"OVERBOUGHT\""
        );
        assert_eq!(serde_json::to_string(&ConfidenceHint::Low).unwrap(), "\"LOW\"");
    }
}

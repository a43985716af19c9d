use education_core::ValidationError;
use serde::{Deserialize, Serialize};

pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 6;

/// Subject area a question belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum TopicTag {
    Rsi,
    Volatility,
    Risk,
    Diversification,
    Sentiment,
    Ema,
    Sma,
    Volume,
    General,
}

impl TopicTag {
    /// Unknown labels fall back to GENERAL.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "RSI" => TopicTag::Rsi,
            "VOLATILITY" => TopicTag::Volatility,
            "RISK" => TopicTag::Risk,
            "DIVERSIFICATION" => TopicTag::Diversification,
            "SENTIMENT" => TopicTag::Sentiment,
            "EMA" => TopicTag::Ema,
            "SMA" => TopicTag::Sma,
            "VOLUME" => TopicTag::Volume,
            "GENERAL" => TopicTag::General,
            _ => {
                tracing::warn!("Unknown quiz topic '{}', defaulting to GENERAL", value);
                TopicTag::General
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TopicTag::Rsi => "RSI",
            TopicTag::Volatility => "VOLATILITY",
            TopicTag::Risk => "RISK",
            TopicTag::Diversification => "DIVERSIFICATION",
            TopicTag::Sentiment => "SENTIMENT",
            TopicTag::Ema => "EMA",
            TopicTag::Sma => "SMA",
            TopicTag::Volume => "VOLUME",
            TopicTag::General => "GENERAL",
        }
    }
}

impl From<String> for TopicTag {
    fn from(value: String) -> Self {
        TopicTag::parse_lenient(&value)
    }
}

impl std::fmt::Display for TopicTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Unknown labels fall back to MEDIUM.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "EASY" => Difficulty::Easy,
            "MEDIUM" => Difficulty::Medium,
            "HARD" => Difficulty::Hard,
            _ => {
                tracing::warn!("Unknown quiz difficulty '{}', defaulting to MEDIUM", value);
                Difficulty::Medium
            }
        }
    }
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        Difficulty::parse_lenient(&value)
    }
}

/// A question from the bank. `explanation` is shown on a wrong answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question_id: String,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_option_key: String,
    pub topic: TopicTag,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn new(
        question_id: impl Into<String>,
        question_text: impl Into<String>,
        options: Vec<String>,
        correct_option_key: impl Into<String>,
        topic: TopicTag,
        difficulty: Difficulty,
        explanation: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let question = Self {
            question_id: question_id.into(),
            question_text: question_text.into(),
            options,
            correct_option_key: correct_option_key.into(),
            topic,
            difficulty,
            explanation: explanation.into(),
        };
        question.validate()?;
        Ok(question)
    }

    /// Questions can also arrive via deserialization, so the evaluator re-checks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let count = self.options.len();
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
            return Err(ValidationError::InvalidOptions {
                question_id: self.question_id.clone(),
                count,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub question_id: String,
    pub selected_key: String,
    #[serde(default)]
    pub time_taken_sec: Option<u32>,
}

impl UserAnswer {
    pub fn new(question_id: impl Into<String>, selected_key: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            selected_key: selected_key.into(),
            time_taken_sec: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_parse_is_lenient() {
        assert_eq!(TopicTag::parse_lenient("rsi"), TopicTag::Rsi);
        assert_eq!(TopicTag::parse_lenient("Diversification"), TopicTag::Diversification);
        assert_eq!(TopicTag::parse_lenient("options-greeks"), TopicTag::General);
        assert_eq!(Difficulty::parse_lenient("hard"), Difficulty::Hard);
        assert_eq!(Difficulty::parse_lenient("brutal"), Difficulty::Medium);
    }

    #[test]
    fn test_question_deserializes_leniently() {
        let q: QuizQuestion = serde_json::from_value(serde_json::json!({
            "question_id": "q1",
            "question_text": "What does RSI measure?",
            "options": ["Momentum", "Volume"],
            "correct_option_key": "A",
            "topic": "rsi",
            "difficulty": "expert",
            "explanation": "RSI is a momentum oscillator."
        }))
        .unwrap();
        assert_eq!(q.topic, TopicTag::Rsi);
        assert_eq!(q.difficulty, Difficulty::Medium);
        assert_eq!(serde_json::to_value(q.topic).unwrap(), "RSI");
    }

    #[test]
    fn test_option_count_bounds() {
        let build = |n: usize| {
            QuizQuestion::new(
                "q1",
                "?",
                (0..n).map(|i| format!("option {i}")).collect(),
                "A",
                TopicTag::General,
                Difficulty::Easy,
                "",
            )
        };
        assert!(build(1).is_err());
        assert!(build(2).is_ok());
        assert!(build(6).is_ok());
        assert!(matches!(
            build(7),
            Err(ValidationError::InvalidOptions { count: 7, .. })
        ));
    }
}

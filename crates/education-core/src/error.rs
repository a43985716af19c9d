use thiserror::Error;

/// Rejection of caller-supplied data. Engines never raise anything else.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be in [{min}, {max}]; received {value}.")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} must be a finite number; received {value}.")]
    NotFinite { field: String, value: f64 },

    #[error("{field} must be positive; received {value}.")]
    NotPositive { field: String, value: f64 },

    #[error("{field} must be >= 0; received {value}.")]
    Negative { field: String, value: i64 },

    #[error("{field} must be one of BUY, SELL, HOLD; received '{value}'.")]
    UnknownDirection { field: String, value: String },

    #[error("Unsupported indicator '{name}'. Supported indicators: {supported}.")]
    UnsupportedIndicator { name: String, supported: String },

    #[error("Unknown scenario '{value}'. Supported scenarios: NORMAL, MARKET_CRASH, HIGH_VOLATILITY.")]
    UnknownScenario { value: String },

    #[error("UserAnswer references unknown question_id '{question_id}'.")]
    UnknownQuestionReference { question_id: String },

    #[error("Duplicate question_id '{question_id}' in question set.")]
    DuplicateQuestionId { question_id: String },

    #[error("questions list must not be empty.")]
    EmptyQuestionSet,

    #[error("Question '{question_id}' must have between 2 and 6 options; received {count}.")]
    InvalidOptions { question_id: String, count: usize },

    #[error("'{value}' is not a valid ISO-8601 date for {field}. Expected YYYY-MM-DD.")]
    InvalidDate { field: String, value: String },

    #[error("{0}")]
    Inconsistent(String),
}

impl ValidationError {
    pub fn out_of_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        }
    }

    pub fn inconsistent(message: impl Into<String>) -> Self {
        ValidationError::Inconsistent(message.into())
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_field_and_value() {
        let err = ValidationError::out_of_range("lstm_score", 1.2, 0.0, 1.0);
        let msg = err.to_string();
        assert!(msg.contains("lstm_score"));
        assert!(msg.contains("1.2"));
    }

    #[test]
    fn test_unknown_reference_message() {
        let err = ValidationError::UnknownQuestionReference {
            question_id: "q-99".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "UserAnswer references unknown question_id 'q-99'."
        );
    }
}

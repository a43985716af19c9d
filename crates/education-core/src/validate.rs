//! Range checks used by every engine's smart constructors, plus the shared
//! rounding helper applied to published figures.

use crate::ValidationError;

/// Reject `value` unless `min <= value <= max`. NaN is always rejected.
pub fn ensure_range(field: &str, value: f64, min: f64, max: f64) -> Result<f64, ValidationError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(ValidationError::out_of_range(field, value, min, max))
    }
}

/// Reject `value` unless it lies in [0.0, 1.0].
pub fn ensure_unit_interval(field: &str, value: f64) -> Result<f64, ValidationError> {
    ensure_range(field, value, 0.0, 1.0)
}

/// Reject NaN and infinities.
pub fn ensure_finite(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite {
            field: field.to_string(),
            value,
        })
    }
}

/// Reject zero, negative and non-finite values.
pub fn ensure_positive(field: &str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive {
            field: field.to_string(),
            value,
        })
    }
}

/// Reject negative counts.
pub fn ensure_non_negative(field: &str, value: i64) -> Result<i64, ValidationError> {
    if value >= 0 {
        Ok(value)
    } else {
        Err(ValidationError::Negative {
            field: field.to_string(),
            value,
        })
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_interval_bounds_inclusive() {
        assert!(ensure_unit_interval("x", 0.0).is_ok());
        assert!(ensure_unit_interval("x", 1.0).is_ok());
        assert!(ensure_unit_interval("x", 1.0001).is_err());
        assert!(ensure_unit_interval("x", -0.0001).is_err());
        assert!(ensure_unit_interval("x", f64::NAN).is_err());
    }

    #[test]
    fn test_positive_rejects_zero() {
        assert!(ensure_positive("investment_amount", 0.0).is_err());
        assert!(ensure_positive("investment_amount", f64::INFINITY).is_err());
        assert_eq!(ensure_positive("investment_amount", 5.0).unwrap(), 5.0);
    }

    #[test]
    fn test_finite() {
        assert!(ensure_finite("value", f64::NAN).is_err());
        assert!(ensure_finite("value", f64::NEG_INFINITY).is_err());
        assert_eq!(ensure_finite("value", -3.5).unwrap(), -3.5);
    }

    #[test]
    fn test_non_negative() {
        assert!(ensure_non_negative("count", -1).is_err());
        assert_eq!(ensure_non_negative("count", 0).unwrap(), 0);
    }

    #[test]
    fn test_round_to() {
        assert_relative_eq!(round_to(0.123456, 4), 0.1235);
        assert_relative_eq!(round_to(11050.000000001, 2), 11050.0);
        assert_relative_eq!(round_to(-2.345, 1), -2.3, epsilon = 1e-12);
    }
}

//! Face weight validation

use crate::{McError, McResult};

/// Default weight of every face on a freshly built die
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Check that a weight can be used for sampling
///
/// Non-finite values are a type error; negative values are rejected as
/// invalid input. Zero is allowed.
pub fn validate_weight(weight: f64) -> McResult<f64> {
    if !weight.is_finite() {
        return Err(McError::InvalidWeight(format!(
            "weight must be a finite number, got {}",
            weight
        )));
    }
    if weight < 0.0 {
        return Err(McError::NegativeWeight(weight));
    }
    // -0.0 passes the check above; store it as plain zero
    Ok(weight.abs())
}

/// Parse a weight from text and validate it
pub fn parse_weight(text: &str) -> McResult<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| McError::InvalidWeight(format!("'{}' is not a number", text)))?;
    validate_weight(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_validate_weight() {
        assert_eq!(validate_weight(10.0).unwrap(), 10.0);
        assert_eq!(validate_weight(0.0).unwrap(), 0.0);
        assert_eq!(validate_weight(-0.0).unwrap().to_bits(), 0.0f64.to_bits());
        assert_eq!(validate_weight(-1.0).unwrap_err().kind(), ErrorKind::Validation);
        assert_eq!(validate_weight(f64::NAN).unwrap_err().kind(), ErrorKind::Type);
        assert_eq!(
            validate_weight(f64::INFINITY).unwrap_err().kind(),
            ErrorKind::Type
        );
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("3").unwrap(), 3.0);
        assert_eq!(parse_weight(" 2.5 ").unwrap(), 2.5);
        assert_eq!(parse_weight("heavy").unwrap_err().kind(), ErrorKind::Type);
        assert!(matches!(
            parse_weight("-4"),
            Err(McError::NegativeWeight(w)) if w == -4.0
        ));
    }
}

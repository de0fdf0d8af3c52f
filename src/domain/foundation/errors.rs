//! Validation errors shared by foundation value objects.

/// Errors raised when constructing a value object from raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} out of range: {actual} not in [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("unrecognized {field}: {value}")]
    Unrecognized { field: &'static str, value: String },
}

impl ValidationError {
    /// Creates an out-of-range error.
    pub fn out_of_range(field: &'static str, min: i64, max: i64, actual: i64) -> Self {
        Self::OutOfRange {
            field,
            min,
            max,
            actual,
        }
    }

    /// Creates an unrecognized-value error.
    pub fn unrecognized(field: &'static str, value: impl Into<String>) -> Self {
        Self::Unrecognized {
            field,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_displays_bounds() {
        let err = ValidationError::out_of_range("score", 0, 5, 9);
        assert_eq!(err.to_string(), "score out of range: 9 not in [0, 5]");
    }

    #[test]
    fn unrecognized_displays_value() {
        let err = ValidationError::unrecognized("advisor id", "astrology");
        assert_eq!(err.to_string(), "unrecognized advisor id: astrology");
    }
}

//! Validated form inputs for catalog and content writes.

use crate::{DashboardError, DashboardResult};

/// Upper bound on free-text form fields.
pub const MAX_TEXT_LEN: usize = 2_000;

/// A trimmed string that is guaranteed to hold at least one non-whitespace
/// character and at most [`MAX_TEXT_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredText(String);

impl RequiredText {
    /// Validate a form field.
    ///
    /// # Arguments
    ///
    /// * `field` - Field label used in the error message
    /// * `input` - Raw user input
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::EmptyField`] for blank input and
    /// [`DashboardError::FieldTooLong`] when the trimmed input exceeds the limit.
    pub fn new(field: &'static str, input: impl AsRef<str>) -> DashboardResult<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DashboardError::EmptyField { field });
        }
        if trimmed.chars().count() > MAX_TEXT_LEN {
            return Err(DashboardError::FieldTooLong {
                field,
                max: MAX_TEXT_LEN,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequiredText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequiredText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for RequiredText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Trim optional text, mapping blank input to `None`.
pub fn optional_text(input: Option<String>) -> Option<String> {
    input
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Prices and other amounts must be finite and non-negative.
pub fn validate_amount(field: &'static str, value: f64) -> DashboardResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(DashboardError::InvalidAmount { field })
    }
}

/// Star rating on a testimonial.
pub fn validate_rating(value: u8) -> DashboardResult<u8> {
    if (1..=5).contains(&value) {
        Ok(value)
    } else {
        Err(DashboardError::InvalidRating(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        let text = RequiredText::new("name", "  Lipid Profile ").unwrap();
        assert_eq!(text.as_str(), "Lipid Profile");
    }

    #[test]
    fn test_required_text_rejects_blank() {
        let result = RequiredText::new("name", " \t ");
        assert!(matches!(
            result,
            Err(DashboardError::EmptyField { field: "name" })
        ));
    }

    #[test]
    fn test_required_text_rejects_overlong() {
        let long = "x".repeat(MAX_TEXT_LEN + 1);
        assert!(matches!(
            RequiredText::new("description", long),
            Err(DashboardError::FieldTooLong { .. })
        ));
    }

    #[test]
    fn test_validate_amount() {
        assert_eq!(validate_amount("price", 0.0).unwrap(), 0.0);
        assert!(validate_amount("price", -1.0).is_err());
        assert!(validate_amount("price", f64::NAN).is_err());
        assert!(validate_amount("price", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_rating() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}

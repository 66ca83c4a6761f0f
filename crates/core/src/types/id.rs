//! Product identifier type.
//!
//! Product IDs come from the catalog as opaque item codes (e.g. `"ACE-500"`).
//! The only structural rule the cart relies on is that they are non-empty,
//! since the ID is the key that keeps cart entries unique.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("product id must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A catalog product identifier.
///
/// ## Constraints
///
/// - Must contain at least one non-whitespace character
/// - Length: at most 140 characters (catalog item code limit)
///
/// ## Examples
///
/// ```
/// use garval_core::ProductId;
///
/// assert!(ProductId::parse("ACE-500").is_ok());
/// assert!(ProductId::parse("").is_err());
/// assert!(ProductId::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Maximum length of a product id.
    pub const MAX_LENGTH: usize = 140;

    /// Parse a `ProductId` from a string.
    ///
    /// The value is kept verbatim; it is not trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or longer than 140 characters.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        Self::validate(s)?;
        Ok(Self(s.to_owned()))
    }

    fn validate(s: &str) -> Result<(), ProductIdError> {
        if s.trim().is_empty() {
            return Err(ProductIdError::Empty);
        }

        if s.chars().count() > Self::MAX_LENGTH {
            return Err(ProductIdError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ProductId` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::validate(&value)?;
        Ok(Self(value))
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ProductId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_ids() {
        assert!(ProductId::parse("ACE-500").is_ok());
        assert!(ProductId::parse("1").is_ok());
        assert!(ProductId::parse("aceite oliva virgen").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
        assert_eq!(ProductId::parse(" \t"), Err(ProductIdError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "x".repeat(ProductId::MAX_LENGTH + 1);
        assert!(matches!(
            ProductId::parse(&long),
            Err(ProductIdError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_keeps_value_verbatim() {
        let id = ProductId::parse(" ACE-500").unwrap();
        assert_eq!(id.as_str(), " ACE-500");
    }

    #[test]
    fn test_serde_transparent_string() {
        let id = ProductId::parse("ACE-500").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ACE-500\"");

        let parsed: ProductId = serde_json::from_str("\"ACE-500\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<ProductId>("\"\"").is_err());
        assert!(serde_json::from_str::<ProductId>("42").is_err());
    }

    #[test]
    fn test_compare_with_str() {
        let id = ProductId::parse("ACE-500").unwrap();
        assert_eq!(id, "ACE-500");
        assert_eq!(format!("{id}"), "ACE-500");
    }
}

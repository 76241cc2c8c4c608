//! Customer phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input is empty or only whitespace.
    #[error("phone number cannot be empty")]
    Empty,
}

/// A customer's self-reported phone number.
///
/// Phone numbers are never verified: a customer is identified purely by the
/// text they type. Parsing only trims surrounding whitespace and rejects empty
/// input; there is no length limit. Two orders belong to the same customer iff their phone
/// strings are exactly equal.
///
/// ## Examples
///
/// ```
/// use clearspring_core::Phone;
///
/// let phone = Phone::parse("  555-1234 ").unwrap();
/// assert_eq!(phone.as_str(), "555-1234");
///
/// assert!(Phone::parse("").is_err());
/// assert!(Phone::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError::Empty` if the trimmed input is empty.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Role and status enums.
//!
//! All enums are stored in the database as their lowercase token
//! (`"admin"`, `"offline"`, `"paid"`, ...) and round-trip through
//! `Display` / `FromStr`.

use serde::{Deserialize, Serialize};

/// Error returned when a token does not name a known variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    /// Which enum failed to parse.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Staff role governing which staff actions are permitted.
///
/// Roles are flat: `Manager` is neither a subset nor a superset of `Admin`.
/// Permission checks compare roles for equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// May edit and delete orders in addition to recording payments.
    Admin,
    /// May view all orders and record payments.
    Manager,
}

impl StaffRole {
    /// Returns the stored token for this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StaffRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            _ => Err(ParseEnumError::new("staff role", s)),
        }
    }
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Online,
    /// Cash on delivery. The order form's default.
    #[default]
    Offline,
}

impl PaymentMethod {
    /// Returns the stored token for this payment method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(Self::Online),
            "offline" => Ok(Self::Offline),
            _ => Err(ParseEnumError::new("payment method", s)),
        }
    }
}

/// Whether staff have recorded a payment for the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    /// Returns the stored token for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            _ => Err(ParseEnumError::new("payment status", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_role_tokens() {
        assert_eq!("admin".parse::<StaffRole>().unwrap(), StaffRole::Admin);
        assert_eq!("manager".parse::<StaffRole>().unwrap(), StaffRole::Manager);
        assert_eq!(StaffRole::Manager.to_string(), "manager");
    }

    #[test]
    fn test_staff_role_rejects_unknown_and_case_variants() {
        assert!("Admin".parse::<StaffRole>().is_err());
        assert!("super_admin".parse::<StaffRole>().is_err());
        let err = "root".parse::<StaffRole>().unwrap_err();
        assert_eq!(err.to_string(), "invalid staff role: root");
    }

    #[test]
    fn test_payment_defaults() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Offline);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }

    #[test]
    fn test_payment_status_tokens() {
        assert_eq!("paid".parse::<PaymentStatus>().unwrap(), PaymentStatus::Paid);
        assert!("refunded".parse::<PaymentStatus>().is_err());
        assert_eq!(PaymentStatus::Pending.as_str(), "pending");
    }

    #[test]
    fn test_serde_uses_lowercase_tokens() {
        let json = serde_json::to_string(&PaymentMethod::Online).unwrap();
        assert_eq!(json, "\"online\"");
        let role: StaffRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, StaffRole::Admin);
    }
}

//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use clearspring_core::{Phone, StaffAccountId};

/// Who the current browser session belongs to.
///
/// A session holds at most one identity. Starting a customer session replaces
/// a staff identity and vice versa (last-set-wins). Only the identity itself is
/// stored; the staff account is re-resolved from the database on every request
/// so that a deleted account loses access immediately.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionIdentity {
    /// No identity established.
    #[default]
    Unauthenticated,
    /// A customer identified by the phone number they typed (unverified).
    Customer { phone: Phone },
    /// A staff member who passed the credential check.
    Staff { account_id: StaffAccountId },
}

impl SessionIdentity {
    /// The customer phone, if this is a customer session.
    #[must_use]
    pub const fn customer_phone(&self) -> Option<&Phone> {
        match self {
            Self::Customer { phone } => Some(phone),
            _ => None,
        }
    }

    /// The staff account ID, if this is a staff session.
    #[must_use]
    pub const fn staff_account_id(&self) -> Option<StaffAccountId> {
        match self {
            Self::Staff { account_id } => Some(*account_id),
            _ => None,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current [`super::SessionIdentity`].
    pub const IDENTITY: &str = "identity";
}

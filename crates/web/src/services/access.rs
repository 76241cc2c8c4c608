//! Access control decisions.
//!
//! Guards are plain functions from the session identity (and, for staff, the
//! resolved account) to a [`Decision`]. The extractors in
//! [`crate::middleware::auth`] turn decisions into responses, so the rules
//! themselves stay free of HTTP and storage concerns.
//!
//! Roles are flat: a guard that requires [`StaffRole::Admin`] refuses a
//! manager, and vice versa. Nothing here treats one role as implying another.

use clearspring_core::StaffRole;

use crate::models::{Order, SessionIdentity, StaffAccount};

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The action may proceed.
    Allow,
    /// No customer identity: send to the public landing page.
    RedirectToLanding,
    /// No usable staff identity: send to the staff login page.
    RedirectToStaffLogin {
        /// The session referenced an account that no longer exists and the
        /// stale reference must be removed.
        clear_stale: bool,
    },
    /// Valid staff identity with the wrong role. The identity is kept and the
    /// caller is sent back to the staff dashboard with a message.
    PermissionDenied,
}

impl Decision {
    /// Returns `true` if the action may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Whether a caller may see a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Forbidden,
}

/// Require an active customer identity.
#[must_use]
pub const fn customer_guard(identity: &SessionIdentity) -> Decision {
    match identity {
        SessionIdentity::Customer { .. } => Decision::Allow,
        _ => Decision::RedirectToLanding,
    }
}

/// Require an active staff identity that resolves to `account`, optionally
/// with a specific role.
///
/// `account` is the result of looking up the session's account ID; `None`
/// means the account no longer exists.
#[must_use]
pub fn staff_guard(
    identity: &SessionIdentity,
    account: Option<&StaffAccount>,
    required_role: Option<StaffRole>,
) -> Decision {
    let Some(account_id) = identity.staff_account_id() else {
        return Decision::RedirectToStaffLogin { clear_stale: false };
    };

    let Some(account) = account.filter(|a| a.id == account_id) else {
        return Decision::RedirectToStaffLogin { clear_stale: true };
    };

    match required_role {
        Some(role) if account.role != role => Decision::PermissionDenied,
        _ => Decision::Allow,
    }
}

/// Single-order visibility.
///
/// A customer may only see orders placed under their own phone number.
/// Anonymous and staff callers are not restricted here.
#[must_use]
pub fn order_visibility(identity: &SessionIdentity, order: &Order) -> Visibility {
    match identity {
        SessionIdentity::Customer { phone } if !order.is_owned_by(phone) => Visibility::Forbidden,
        _ => Visibility::Visible,
    }
}

//! Session identity helpers and access-control extractors.
//!
//! The helpers read and write the single [`SessionIdentity`] stored in the
//! session. The extractors run the guards from [`crate::services::access`]
//! before a handler executes and turn a refusal into the matching redirect.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tower_sessions::Session;

use clearspring_core::{Phone, StaffRole};

use crate::db::{RepositoryError, StaffRepository};
use crate::models::{SessionIdentity, StaffAccount, ValidationError, session_keys};
use crate::services::access::{self, Decision};
use crate::state::AppState;

/// Errors from changing the session identity.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The supplied identity was rejected; the session is unchanged.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The session store failed.
    #[error("session error: {0}")]
    Store(#[from] tower_sessions::session::Error),
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Read the current identity. A missing or unreadable entry is
/// [`SessionIdentity::Unauthenticated`].
pub async fn current_identity(session: &Session) -> SessionIdentity {
    session
        .get::<SessionIdentity>(session_keys::IDENTITY)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Identify the browser as the customer with this phone number.
///
/// Replaces any existing identity, staff included.
///
/// # Errors
///
/// Returns `SessionError::Validation` if the phone is blank (the session is
/// left unchanged), or `SessionError::Store` if the write fails.
pub async fn start_customer_session(
    session: &Session,
    raw_phone: &str,
) -> Result<Phone, SessionError> {
    let phone = Phone::parse(raw_phone).map_err(ValidationError::from)?;

    session
        .insert(
            session_keys::IDENTITY,
            SessionIdentity::Customer {
                phone: phone.clone(),
            },
        )
        .await?;

    Ok(phone)
}

/// Identify the browser as this staff account.
///
/// The session ID is rotated first so a pre-login cookie cannot be reused.
/// Replaces any existing identity, customer included.
///
/// # Errors
///
/// Returns `SessionError::Store` if the session cannot be modified.
pub async fn start_staff_session(
    session: &Session,
    account: &StaffAccount,
) -> Result<(), SessionError> {
    session.cycle_id().await?;
    session
        .insert(
            session_keys::IDENTITY,
            SessionIdentity::Staff {
                account_id: account.id,
            },
        )
        .await?;
    Ok(())
}

/// Remove a customer identity. No-op for any other identity.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_customer_session(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    if matches!(
        current_identity(session).await,
        SessionIdentity::Customer { .. }
    ) {
        session
            .remove::<SessionIdentity>(session_keys::IDENTITY)
            .await?;
    }
    Ok(())
}

/// Remove a staff identity. No-op for any other identity.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_staff_session(session: &Session) -> Result<(), tower_sessions::session::Error> {
    if matches!(current_identity(session).await, SessionIdentity::Staff { .. }) {
        session
            .remove::<SessionIdentity>(session_keys::IDENTITY)
            .await?;
    }
    Ok(())
}

/// Drop every identity and destroy the session.
///
/// # Errors
///
/// Returns an error if the session store cannot delete the session.
pub async fn clear_all(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}

/// The customer phone, if the session holds a customer identity.
pub async fn current_customer_phone(session: &Session) -> Option<Phone> {
    current_identity(session).await.customer_phone().cloned()
}

/// Resolve the session's staff identity to a live account.
///
/// If the referenced account no longer exists the stale identity is removed
/// and `None` is returned.
///
/// # Errors
///
/// Returns `RepositoryError` if the account lookup fails.
pub async fn current_staff_account(
    session: &Session,
    pool: &SqlitePool,
) -> Result<Option<StaffAccount>, RepositoryError> {
    let Some(account_id) = current_identity(session).await.staff_account_id() else {
        return Ok(None);
    };

    let account = StaffRepository::new(pool).get_by_id(account_id).await?;
    if account.is_none() {
        tracing::info!(account_id = %account_id, "Clearing stale staff session");
        if let Err(e) = clear_staff_session(session).await {
            tracing::warn!(error = %e, "Failed to clear stale staff session");
        }
    }

    Ok(account)
}

// =============================================================================
// Extractors
// =============================================================================

/// Rejection returned by the access-control extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardRejection {
    /// No customer identity.
    RedirectToLanding,
    /// No usable staff identity.
    RedirectToStaffLogin,
    /// Staff identity with the wrong role; the identity is kept.
    PermissionDenied,
    /// Session layer missing or account lookup failed.
    Internal,
}

impl IntoResponse for GuardRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLanding => Redirect::to("/").into_response(),
            Self::RedirectToStaffLogin => Redirect::to("/staff/login").into_response(),
            Self::PermissionDenied => {
                Redirect::to("/staff?error=permission_denied").into_response()
            }
            Self::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

fn session_from_parts(parts: &Parts) -> Result<Session, GuardRejection> {
    parts.extensions.get::<Session>().cloned().ok_or_else(|| {
        tracing::error!("Session layer is not installed");
        GuardRejection::Internal
    })
}

/// Extractor that requires a customer identity.
///
/// Redirects to the landing page otherwise.
///
/// # Example
///
/// ```rust,ignore
/// async fn dashboard(RequireCustomer(phone): RequireCustomer) -> impl IntoResponse {
///     format!("Orders for {phone}")
/// }
/// ```
pub struct RequireCustomer(pub Phone);

impl FromRequestParts<AppState> for RequireCustomer {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_parts(parts)?;
        let identity = current_identity(&session).await;

        match (access::customer_guard(&identity), identity) {
            (Decision::Allow, SessionIdentity::Customer { phone }) => Ok(Self(phone)),
            _ => Err(GuardRejection::RedirectToLanding),
        }
    }
}

/// Extractor that requires a staff identity of any role.
pub struct RequireStaff(pub StaffAccount);

/// Extractor that requires a staff identity with the admin role.
///
/// A manager is sent back to the staff dashboard with a permission message.
pub struct RequireAdmin(pub StaffAccount);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_staff(parts, state, None).await.map(Self)
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = GuardRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        resolve_staff(parts, state, Some(StaffRole::Admin))
            .await
            .map(Self)
    }
}

async fn resolve_staff(
    parts: &Parts,
    state: &AppState,
    required_role: Option<StaffRole>,
) -> Result<StaffAccount, GuardRejection> {
    let session = session_from_parts(parts)?;
    let identity = current_identity(&session).await;

    let account = match identity.staff_account_id() {
        Some(id) => StaffRepository::new(state.pool())
            .get_by_id(id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to resolve staff account");
                GuardRejection::Internal
            })?,
        None => None,
    };

    match access::staff_guard(&identity, account.as_ref(), required_role) {
        Decision::Allow => account.ok_or(GuardRejection::Internal),
        Decision::RedirectToStaffLogin { clear_stale } => {
            if clear_stale {
                tracing::info!("Clearing stale staff session");
                if let Err(e) = clear_staff_session(&session).await {
                    tracing::warn!(error = %e, "Failed to clear stale staff session");
                }
            }
            Err(GuardRejection::RedirectToStaffLogin)
        }
        Decision::PermissionDenied => {
            tracing::warn!(
                staff = account.as_ref().map_or("", |a| a.username.as_str()),
                path = %parts.uri.path(),
                "Permission denied"
            );
            Err(GuardRejection::PermissionDenied)
        }
        Decision::RedirectToLanding => Err(GuardRejection::RedirectToLanding),
    }
}

/// Extractor for the current identity. Never rejects.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(CurrentIdentity(identity): CurrentIdentity) -> impl IntoResponse {
///     match identity {
///         SessionIdentity::Customer { phone } => format!("Hello, {phone}!"),
///         _ => "Hello, guest!".to_string(),
///     }
/// }
/// ```
pub struct CurrentIdentity(pub SessionIdentity);

impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = match parts.extensions.get::<Session>() {
            Some(session) => current_identity(session).await,
            None => SessionIdentity::Unauthenticated,
        };

        Ok(Self(identity))
    }
}

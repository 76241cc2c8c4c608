//! Landing page and customer session entry/exit.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::Query,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use super::{MessageQuery, redirect_with_error, redirect_with_success};
use crate::error::clear_sentry_user;
use crate::filters;
use crate::middleware::{CurrentIdentity, SessionError, clear_all, start_customer_session};

/// Phone entry form.
#[derive(Debug, Deserialize)]
pub struct ContinueForm {
    #[serde(default)]
    pub phone: String,
}

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct LandingTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
    /// Set when the browser already holds a customer identity.
    pub customer_phone: Option<String>,
    pub is_staff: bool,
}

/// Display the landing page.
pub async fn landing(
    CurrentIdentity(identity): CurrentIdentity,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    LandingTemplate {
        error: query.error_text(),
        success: query.success_text(),
        customer_phone: identity.customer_phone().map(ToString::to_string),
        is_staff: identity.staff_account_id().is_some(),
    }
}

/// Start a customer session from the typed phone number.
///
/// No verification is performed: the phone number alone identifies the
/// customer.
pub async fn continue_session(session: Session, Form(form): Form<ContinueForm>) -> Response {
    match start_customer_session(&session, &form.phone).await {
        Ok(_) => {
            tracing::info!("Customer session started");
            redirect_with_success("/customer", "continuing").into_response()
        }
        Err(SessionError::Validation(err)) => redirect_with_error("/", err.code()).into_response(),
        Err(SessionError::Store(e)) => {
            tracing::error!(error = %e, "Failed to start customer session");
            redirect_with_error("/", "session").into_response()
        }
    }
}

/// End the session, dropping any customer or staff identity.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_all(&session).await {
        tracing::error!(error = %e, "Failed to clear session");
    }
    clear_sentry_user();

    redirect_with_success("/", "logged_out")
}

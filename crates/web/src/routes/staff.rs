//! Staff login and order management.
//!
//! Any staff role may list orders and record payments. Editing and deleting
//! require the admin role.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use super::{MessageQuery, OrderView, parse_order_id, redirect_with_error, redirect_with_success};
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{
    RequireAdmin, RequireStaff, clear_staff_session, current_staff_account, start_staff_session,
};
use crate::models::OrderPatch;
use crate::services::{AuthError, AuthService, OrderError, OrderService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Staff login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Payment entry form data.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    #[serde(default)]
    pub payment_details: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Staff login page template.
#[derive(Template, WebTemplate)]
#[template(path = "staff/login.html")]
pub struct StaffLoginTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
}

/// Staff dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "staff/dashboard.html")]
pub struct StaffDashboardTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
    pub username: String,
    pub role: &'static str,
    pub is_admin: bool,
    pub orders: Vec<OrderView>,
}

/// Edit order page template.
#[derive(Template, WebTemplate)]
#[template(path = "staff/edit_order.html")]
pub struct EditOrderTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
    pub order: OrderView,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the staff login page, or skip it for a live staff session.
pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<Response> {
    if current_staff_account(&session, state.pool()).await?.is_some() {
        return Ok(Redirect::to("/staff").into_response());
    }

    Ok(StaffLoginTemplate {
        error: query.error_text(),
        success: query.success_text(),
    }
    .into_response())
}

/// Handle staff login form submission.
///
/// Unknown usernames and wrong passwords produce the same message. Account
/// names are stored trimmed, so surrounding whitespace in the submitted
/// username is ignored; the password is checked as typed.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let account = match AuthService::new(state.pool())
        .login(form.username.trim(), &form.password)
        .await
    {
        Ok(account) => account,
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(username = %form.username.trim(), "Staff login failed");
            return Ok(redirect_with_error("/staff/login", "invalid_credentials").into_response());
        }
        Err(e) => return Err(e.into()),
    };

    start_staff_session(&session, &account).await?;
    set_sentry_user(&account.username);
    tracing::info!(staff = %account.username, role = %account.role, "Staff logged in");

    Ok(redirect_with_success("/staff", "staff_login").into_response())
}

/// Drop the staff identity. A customer identity is left alone.
pub async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_staff_session(&session).await {
        tracing::error!(error = %e, "Failed to clear staff session");
    }
    clear_sentry_user();

    redirect_with_success("/", "staff_logged_out")
}

// =============================================================================
// Order Routes
// =============================================================================

/// List every order, newest first.
pub async fn dashboard(
    RequireStaff(account): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool()).list_all().await?;

    Ok(StaffDashboardTemplate {
        error: query.error_text(),
        success: query.success_text(),
        is_admin: account.is_admin(),
        role: account.role.as_str(),
        username: account.username,
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

/// Record a payment against an order, attributed to the current staff member.
pub async fn record_payment(
    RequireStaff(account): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<PaymentForm>,
) -> Result<Response> {
    let id = parse_order_id(&id)?;
    match OrderService::new(state.pool())
        .record_payment(id, &account, &form.payment_details)
        .await
    {
        Ok(_) => Ok(redirect_with_success("/staff", "payment_recorded").into_response()),
        Err(OrderError::Validation(err)) => {
            Ok(redirect_with_error("/staff", err.code()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Display the edit form for an order.
pub async fn edit_page(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.pool())
        .get(parse_order_id(&id)?)
        .await?;

    Ok(EditOrderTemplate {
        error: None,
        success: None,
        order: OrderView::from(&order),
    })
}

/// Apply an edit. Fields that fail to parse keep their stored value.
pub async fn edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(patch): Form<OrderPatch>,
) -> Result<Redirect> {
    let id = parse_order_id(&id)?;
    OrderService::new(state.pool())
        .edit_order(id, &patch)
        .await?;
    tracing::debug!(order_id = %id, staff = %admin.username, "Order edit applied");

    Ok(redirect_with_success("/staff", "order_updated"))
}

/// Permanently delete an order.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_order_id(&id)?;
    OrderService::new(state.pool()).delete_order(id).await?;
    tracing::debug!(order_id = %id, staff = %admin.username, "Order delete applied");

    Ok(redirect_with_success("/staff", "order_deleted"))
}

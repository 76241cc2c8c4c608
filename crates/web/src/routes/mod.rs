//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                              - Landing page (phone entry)
//! POST /continue                      - Start a customer session
//! GET  /logout                        - End the session entirely
//!
//! # Customer (requires customer identity)
//! GET  /customer                      - Own orders + order form
//! POST /customer/orders               - Place an order
//!
//! # Staff
//! GET  /staff/login                   - Login page
//! POST /staff/login                   - Login action (rate limited)
//! GET  /staff/logout                  - Drop the staff identity
//! GET  /staff                         - All orders (any staff role)
//! POST /staff/orders/{id}/payment     - Record a payment (any staff role)
//! GET  /staff/orders/{id}/edit        - Edit form (admin)
//! POST /staff/orders/{id}/edit        - Apply edit (admin)
//! POST /staff/orders/{id}/delete      - Delete order (admin)
//!
//! # Orders
//! GET  /orders/{id}                   - Single order view
//! ```
//!
//! Form handlers redirect with `?error=<code>` or `?success=<code>`; the
//! target page turns the code into text through [`MessageQuery`].

pub mod customer;
pub mod home;
pub mod orders;
pub mod staff;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use clearspring_core::OrderId;

use crate::error::AppError;
use crate::middleware::RateLimiterLayer;
use crate::models::Order;
use crate::state::AppState;

// =============================================================================
// Messages
// =============================================================================

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl MessageQuery {
    /// Human text for the `error` code. Unknown codes render nothing.
    #[must_use]
    pub fn error_text(&self) -> Option<&'static str> {
        self.error.as_deref().and_then(error_text)
    }

    /// Human text for the `success` code. Unknown codes render nothing.
    #[must_use]
    pub fn success_text(&self) -> Option<&'static str> {
        self.success.as_deref().and_then(success_text)
    }
}

fn error_text(code: &str) -> Option<&'static str> {
    Some(match code {
        "phone_required" => "Enter phone number.",
        "phone_and_address_required" => "Phone and Address are required.",
        "payment_details_required" => "Enter payment details.",
        "invalid_credentials" => "Invalid staff credentials.",
        "permission_denied" => "Permission denied.",
        "session" => "Something went wrong. Please try again.",
        _ => return None,
    })
}

fn success_text(code: &str) -> Option<&'static str> {
    Some(match code {
        "continuing" => "Continuing with phone number.",
        "logged_out" => "Logged out.",
        "order_placed" => "Order placed.",
        "staff_login" => "Staff login OK.",
        "staff_logged_out" => "Staff logged out.",
        "payment_recorded" => "Payment recorded.",
        "order_updated" => "Order updated.",
        "order_deleted" => "Order deleted.",
        _ => return None,
    })
}

/// Parse the `{id}` path segment. Anything that is not an order ID names no
/// order, so it is a 404 rather than a malformed request.
pub(crate) fn parse_order_id(raw: &str) -> Result<OrderId, AppError> {
    raw.parse::<i64>()
        .map(OrderId::new)
        .map_err(|_| AppError::NotFound(format!("order {raw}")))
}

/// Redirect to `path` carrying an error code.
pub(crate) fn redirect_with_error(path: &str, code: &str) -> Redirect {
    Redirect::to(&format!("{path}?error={code}"))
}

/// Redirect to `path` carrying a success code.
pub(crate) fn redirect_with_success(path: &str, code: &str) -> Redirect {
    Redirect::to(&format!("{path}?success={code}"))
}

// =============================================================================
// View Types
// =============================================================================

/// Order prepared for display in templates.
#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: i64,
    pub phone: String,
    pub address: String,
    pub cans: i64,
    pub cooling: bool,
    pub payment_method: &'static str,
    pub payment_status: &'static str,
    pub is_paid: bool,
    /// Empty when no payment has been recorded.
    pub payment_details: String,
    pub created_at: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.as_i64(),
            phone: order.customer_phone.to_string(),
            address: order.customer_address.clone(),
            cans: order.cans,
            cooling: order.cooling,
            payment_method: order.payment_method.as_str(),
            payment_status: order.payment_status.as_str(),
            is_paid: order.is_paid(),
            payment_details: order.payment_details.clone().unwrap_or_default(),
            created_at: order.created_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        }
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the staff login router, rate limited when a limiter is given.
fn staff_login_routes(login_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    let login = Router::new().route("/staff/login", get(staff::login_page).post(staff::login));

    match login_limiter {
        Some(limiter) => login.layer(limiter),
        None => login,
    }
}

/// Create all application routes.
pub fn routes(login_limiter: Option<RateLimiterLayer>) -> Router<AppState> {
    Router::new()
        // Public
        .route("/", get(home::landing))
        .route("/continue", post(home::continue_session))
        .route("/logout", get(home::logout))
        // Customer
        .route("/customer", get(customer::dashboard))
        .route("/customer/orders", post(customer::place_order))
        // Staff
        .merge(staff_login_routes(login_limiter))
        .route("/staff/logout", get(staff::logout))
        .route("/staff", get(staff::dashboard))
        .route("/staff/orders/{id}/payment", post(staff::record_payment))
        .route(
            "/staff/orders/{id}/edit",
            get(staff::edit_page).post(staff::edit),
        )
        .route("/staff/orders/{id}/delete", post(staff::delete))
        // Orders
        .route("/orders/{id}", get(orders::show))
}

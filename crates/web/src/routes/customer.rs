//! Customer dashboard and order placement.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Response},
};

use super::{MessageQuery, OrderView, redirect_with_error, redirect_with_success};
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireCustomer;
use crate::models::PlaceOrderRequest;
use crate::services::{OrderError, OrderService};
use crate::state::AppState;

/// Customer dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "customer/dashboard.html")]
pub struct CustomerDashboardTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
    pub phone: String,
    pub orders: Vec<OrderView>,
}

/// Display the customer's own orders, newest first, with the order form.
pub async fn dashboard(
    RequireCustomer(phone): RequireCustomer,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse> {
    let orders = OrderService::new(state.pool())
        .list_for_customer(&phone)
        .await?;

    Ok(CustomerDashboardTemplate {
        error: query.error_text(),
        success: query.success_text(),
        phone: phone.into_inner(),
        orders: orders.iter().map(OrderView::from).collect(),
    })
}

/// Place an order. A phone typed into the form overrides the session phone.
pub async fn place_order(
    RequireCustomer(phone): RequireCustomer,
    State(state): State<AppState>,
    Form(form): Form<PlaceOrderRequest>,
) -> Result<Response> {
    match OrderService::new(state.pool())
        .place_order(&form, Some(&phone))
        .await
    {
        Ok(_) => Ok(redirect_with_success("/customer", "order_placed").into_response()),
        Err(OrderError::Validation(err)) => {
            tracing::debug!(error = %err, "Order rejected");
            Ok(redirect_with_error("/customer", err.code()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

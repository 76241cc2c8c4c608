//! Single order view.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use super::{OrderView, parse_order_id};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::CurrentIdentity;
use crate::services::access::{Visibility, order_visibility};
use crate::services::OrderService;
use crate::state::AppState;

/// Order detail template.
#[derive(Template, WebTemplate)]
#[template(path = "order.html")]
pub struct OrderTemplate {
    pub error: Option<&'static str>,
    pub success: Option<&'static str>,
    pub order: OrderView,
}

/// Show one order.
///
/// A customer may only see their own orders; anyone else is not restricted.
pub async fn show(
    CurrentIdentity(identity): CurrentIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let order = OrderService::new(state.pool())
        .get(parse_order_id(&id)?)
        .await?;

    if order_visibility(&identity, &order) == Visibility::Forbidden {
        tracing::warn!(order_id = %order.id, "Customer tried to view another customer's order");
        return Err(AppError::Forbidden);
    }

    Ok(OrderTemplate {
        error: None,
        success: None,
        order: OrderView::from(&order),
    })
}

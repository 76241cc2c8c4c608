//! Order inspection commands.

use clearspring_core::Phone;
use clearspring_web::services::OrderService;

use super::{CommandError, open};

/// List orders, newest first, optionally filtered by customer phone.
///
/// # Errors
///
/// Returns `CommandError` if the phone number is invalid or the query fails.
pub async fn list(phone: Option<&str>) -> Result<(), CommandError> {
    let phone = phone.map(Phone::parse).transpose()?;
    let (_config, pool) = open().await?;

    let service = OrderService::new(&pool);
    let orders = match &phone {
        Some(phone) => service.list_for_customer(phone).await?,
        None => service.list_all().await?,
    };

    tracing::info!(count = orders.len(), "Orders");
    for order in orders {
        tracing::info!(
            "#{} {} {} cans={} cooling={} {} {} {}",
            order.id,
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.customer_phone,
            order.cans,
            order.cooling,
            order.payment_method,
            order.payment_status,
            order.payment_details.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}

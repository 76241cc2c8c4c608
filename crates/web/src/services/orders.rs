//! Order lifecycle service.
//!
//! Validates and applies order state transitions:
//!
//! ```text
//! place_order ──> pending ──record_payment──> paid
//!                    │                          │
//!                    └──── edit_order / delete_order (admin) ────┘
//! ```
//!
//! Authorization is the caller's job: the guards in
//! [`crate::middleware::auth`] run before any of these methods.

use sqlx::SqlitePool;
use thiserror::Error;

use clearspring_core::{OrderId, Phone};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::order::payment_note;
use crate::models::{NewOrder, Order, OrderPatch, PlaceOrderRequest, StaffAccount, ValidationError};

/// Errors from order lifecycle operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Missing or malformed required input. Nothing was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// No order with that ID.
    #[error("order {0} not found")]
    NotFound(OrderId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl OrderError {
    fn from_repository(id: OrderId, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound(id),
            other => Self::Repository(other),
        }
    }
}

impl From<RepositoryError> for OrderError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

/// Order lifecycle service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place a new pending order from the customer form.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` if no phone can be resolved or the
    /// address is missing; no row is created in that case.
    pub async fn place_order(
        &self,
        request: &PlaceOrderRequest,
        session_phone: Option<&Phone>,
    ) -> Result<Order, OrderError> {
        let new_order = NewOrder::from_request(request, session_phone)?;
        let order = self.orders.create(&new_order).await?;

        tracing::info!(
            order_id = %order.id,
            cans = order.cans,
            cooling = order.cooling,
            payment_method = %order.payment_method,
            "Order placed"
        );
        Ok(order)
    }

    /// Record a payment, attributing it to `staff`.
    ///
    /// Replaces any previously recorded note; no history is kept.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown order, or
    /// `OrderError::Validation` if the details are blank (no change is made).
    pub async fn record_payment(
        &self,
        id: OrderId,
        staff: &StaffAccount,
        raw_details: &str,
    ) -> Result<Order, OrderError> {
        self.get(id).await?;
        let note = payment_note(&staff.username, raw_details)?;

        let order = self
            .orders
            .record_payment(id, &note)
            .await
            .map_err(|e| OrderError::from_repository(id, e))?;

        tracing::info!(order_id = %id, staff = %staff.username, "Payment recorded");
        Ok(order)
    }

    /// Apply an admin edit. Malformed fields are ignored rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown order.
    pub async fn edit_order(&self, id: OrderId, patch: &OrderPatch) -> Result<Order, OrderError> {
        let mut order = self.get(id).await?;
        patch.apply(&mut order);

        let order = self
            .orders
            .update(&order)
            .await
            .map_err(|e| OrderError::from_repository(id, e))?;

        tracing::info!(order_id = %id, "Order updated");
        Ok(order)
    }

    /// Permanently delete an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown order.
    pub async fn delete_order(&self, id: OrderId) -> Result<(), OrderError> {
        if !self.orders.delete(id).await? {
            return Err(OrderError::NotFound(id));
        }

        tracing::info!(order_id = %id, "Order deleted");
        Ok(())
    }

    /// Look up a single order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for an unknown order.
    pub async fn get(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders.get(id).await?.ok_or(OrderError::NotFound(id))
    }

    /// A customer's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_for_customer(&self, phone: &Phone) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_by_phone(phone).await?)
    }

    /// Every order, newest first, for the staff dashboard.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_all().await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clearspring_core::{PaymentMethod, PaymentStatus, StaffAccountId, StaffRole};

    use super::*;
    use crate::db::test_pool;

    fn phone(s: &str) -> Phone {
        Phone::parse(s).unwrap()
    }

    fn manager() -> StaffAccount {
        StaffAccount {
            id: StaffAccountId::new(2),
            username: "mgr1".to_string(),
            password_hash: String::new(),
            role: StaffRole::Manager,
        }
    }

    fn order_form(address: &str) -> PlaceOrderRequest {
        PlaceOrderRequest {
            address: Some(address.to_string()),
            cans: Some("abc".to_string()),
            cooling: Some("yes".to_string()),
            ..PlaceOrderRequest::default()
        }
    }

    #[tokio::test]
    async fn test_place_order_creates_pending_order() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);

        let order = service
            .place_order(&order_form("12 Well Street"), Some(&phone("555-1234")))
            .await
            .unwrap();

        assert_eq!(order.customer_phone.as_str(), "555-1234");
        assert_eq!(order.cans, 1);
        assert!(order.cooling);
        assert_eq!(order.payment_method, PaymentMethod::Offline);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_details, None);
    }

    #[tokio::test]
    async fn test_place_order_validation_creates_nothing() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);

        let err = service
            .place_order(&order_form(""), Some(&phone("555-1234")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::Validation(ValidationError::MissingAddress)
        ));
        assert!(service.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_payment_attributes_staff() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);
        let order = service
            .place_order(&order_form("12 Well Street"), Some(&phone("555-1234")))
            .await
            .unwrap();

        let paid = service
            .record_payment(order.id, &manager(), "cash received")
            .await
            .unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_details.as_deref(), Some("mgr1: cash received"));
    }

    #[tokio::test]
    async fn test_long_phone_address_and_note_are_stored() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);
        let long_phone = phone("+91 98765 43210 ext. 1234 (office)");
        let address = "Block C, ".repeat(100);
        let order = service
            .place_order(&order_form(&address), Some(&long_phone))
            .await
            .unwrap();
        assert_eq!(order.customer_phone, long_phone);
        assert_eq!(order.customer_address, address.trim());

        let details = "x".repeat(495);
        let paid = service
            .record_payment(order.id, &manager(), &details)
            .await
            .unwrap();
        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(
            paid.payment_details.as_deref(),
            Some(format!("mgr1: {details}").as_str())
        );
    }

    #[tokio::test]
    async fn test_record_payment_blank_details_leaves_order_pending() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);
        let order = service
            .place_order(&order_form("12 Well Street"), Some(&phone("555-1234")))
            .await
            .unwrap();

        for blank in ["", "   \n"] {
            let err = service
                .record_payment(order.id, &manager(), blank)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                OrderError::Validation(ValidationError::MissingPaymentDetails)
            ));
        }

        let unchanged = service.get(order.id).await.unwrap();
        assert_eq!(unchanged, order);
    }

    #[tokio::test]
    async fn test_record_payment_unknown_order() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);

        let err = service
            .record_payment(OrderId::new(404), &manager(), "cash")
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::NotFound(id) if id == OrderId::new(404)));
    }

    #[tokio::test]
    async fn test_edit_order_keeps_existing_values_for_bad_fields() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);
        let order = service
            .place_order(&order_form("12 Well Street"), Some(&phone("555-1234")))
            .await
            .unwrap();

        let patch = OrderPatch {
            cans: Some("many".to_string()),
            customer_address: Some("99 Spring Road".to_string()),
            ..OrderPatch::default()
        };
        let edited = service.edit_order(order.id, &patch).await.unwrap();

        assert_eq!(edited.cans, order.cans);
        assert_eq!(edited.customer_address, "99 Spring Road");
        assert_eq!(edited.created_at, order.created_at);
    }

    #[tokio::test]
    async fn test_edit_unknown_order() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);

        let err = service
            .edit_order(OrderId::new(9), &OrderPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_then_lookup_is_not_found() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);
        let order = service
            .place_order(&order_form("12 Well Street"), Some(&phone("555-1234")))
            .await
            .unwrap();

        service.delete_order(order.id).await.unwrap();
        assert!(matches!(
            service.get(order.id).await,
            Err(OrderError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_order(order.id).await,
            Err(OrderError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_for_customer_only_own_orders() {
        let pool = test_pool().await;
        let service = OrderService::new(&pool);
        let mine = phone("555-1234");

        let first = service
            .place_order(&order_form("first"), Some(&mine))
            .await
            .unwrap();
        service
            .place_order(&order_form("theirs"), Some(&phone("555-9999")))
            .await
            .unwrap();
        let second = service
            .place_order(&order_form("second"), Some(&mine))
            .await
            .unwrap();

        let ids: Vec<_> = service
            .list_for_customer(&mine)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(service.list_all().await.unwrap().len(), 3);
    }
}

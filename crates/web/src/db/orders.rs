//! Order repository (the order store).
//!
//! Every operation is a single statement, so each create/update/delete is
//! atomic on its own. Concurrent updates to the same order are last-write-wins.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use clearspring_core::{OrderId, PaymentStatus, Phone};

use super::RepositoryError;
use crate::models::{NewOrder, Order};

const ORDER_COLUMNS: &str = "id, customer_phone, customer_address, cans, cooling, \
     payment_method, payment_status, payment_details, created_at";

/// Raw `customer_order` row.
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_phone: String,
    customer_address: String,
    cans: i64,
    cooling: bool,
    payment_method: String,
    payment_status: String,
    payment_details: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| {
            RepositoryError::DataCorruption(format!("order {}: invalid {what}", row.id))
        };

        Ok(Self {
            id: OrderId::new(row.id),
            customer_phone: Phone::parse(&row.customer_phone)
                .map_err(|_| corrupt("customer_phone"))?,
            payment_method: row
                .payment_method
                .parse()
                .map_err(|_| corrupt("payment_method"))?,
            payment_status: row
                .payment_status
                .parse()
                .map_err(|_| corrupt("payment_status"))?,
            customer_address: row.customer_address,
            cans: row.cans,
            cooling: row.cooling,
            payment_details: row.payment_details,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new pending order stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        self.insert(order, Utc::now()).await
    }

    /// Insert a new pending order with an explicit creation time.
    pub(crate) async fn insert(
        &self,
        order: &NewOrder,
        created_at: DateTime<Utc>,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            "INSERT INTO customer_order \
             (customer_phone, customer_address, cans, cooling, payment_method, \
              payment_status, payment_details, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, NULL, ?) \
             RETURNING {ORDER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order.customer_phone.as_str())
            .bind(&order.customer_address)
            .bind(order.cans)
            .bind(order.cooling)
            .bind(order.payment_method.as_str())
            .bind(PaymentStatus::Pending.as_str())
            .bind(created_at)
            .fetch_one(self.pool)
            .await?;

        Order::try_from(row)
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row is invalid.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM customer_order WHERE id = ?");

        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    /// Overwrite every mutable field of an order. `created_at` and the phone
    /// number are never written.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order no longer exists.
    pub async fn update(&self, order: &Order) -> Result<Order, RepositoryError> {
        let sql = format!(
            "UPDATE customer_order SET \
             customer_address = ?, cans = ?, cooling = ?, payment_method = ?, \
             payment_status = ?, payment_details = ? \
             WHERE id = ? \
             RETURNING {ORDER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(&order.customer_address)
            .bind(order.cans)
            .bind(order.cooling)
            .bind(order.payment_method.as_str())
            .bind(order.payment_status.as_str())
            .bind(order.payment_details.as_deref())
            .bind(order.id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Order::try_from(row)
    }

    /// Mark an order paid with the given note, replacing any previous note.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn record_payment(
        &self,
        id: OrderId,
        payment_details: &str,
    ) -> Result<Order, RepositoryError> {
        let sql = format!(
            "UPDATE customer_order SET payment_details = ?, payment_status = ? \
             WHERE id = ? \
             RETURNING {ORDER_COLUMNS}"
        );

        let row = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(payment_details)
            .bind(PaymentStatus::Paid.as_str())
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Order::try_from(row)
    }

    /// Permanently remove an order.
    ///
    /// Returns `false` if no order had that ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customer_order WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All orders placed under exactly this phone number, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_phone(&self, phone: &Phone) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM customer_order \
             WHERE customer_phone = ? \
             ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(phone.as_str())
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    /// Every order, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let sql = format!(
            "SELECT {ORDER_COLUMNS} FROM customer_order ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use clearspring_core::PaymentMethod;

    use super::*;
    use crate::db::test_pool;

    fn new_order(phone: &str, address: &str) -> NewOrder {
        NewOrder {
            customer_phone: Phone::parse(phone).unwrap(),
            customer_address: address.to_string(),
            cans: 2,
            cooling: true,
            payment_method: PaymentMethod::Online,
        }
    }

    #[tokio::test]
    async fn test_create_starts_pending() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);

        let order = repo.create(&new_order("555-1234", "12 Well Street")).await.unwrap();
        assert_eq!(order.customer_phone.as_str(), "555-1234");
        assert_eq!(order.cans, 2);
        assert!(order.cooling);
        assert_eq!(order.payment_method, PaymentMethod::Online);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_details, None);

        let fetched = repo.get(order.id).await.unwrap().unwrap();
        assert_eq!(fetched, order);
    }

    #[tokio::test]
    async fn test_ids_are_monotonic() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);

        let first = repo.create(&new_order("555-1234", "a")).await.unwrap();
        let second = repo.create(&new_order("555-1234", "b")).await.unwrap();
        assert!(second.id.as_i64() > first.id.as_i64());
    }

    #[tokio::test]
    async fn test_list_by_phone_exact_match_newest_first() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);
        let now = Utc::now();

        let old = repo
            .insert(&new_order("555-1234", "old"), now - Duration::days(2))
            .await
            .unwrap();
        let newest = repo
            .insert(&new_order("555-1234", "newest"), now)
            .await
            .unwrap();
        // Inserted last but created earlier than `newest`.
        let middle = repo
            .insert(&new_order("555-1234", "middle"), now - Duration::days(1))
            .await
            .unwrap();
        repo.insert(&new_order("555-12345", "other"), now)
            .await
            .unwrap();
        repo.insert(&new_order("555-9999", "other"), now)
            .await
            .unwrap();

        let ids: Vec<_> = repo
            .list_by_phone(&Phone::parse("555-1234").unwrap())
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![newest.id, middle.id, old.id]);
    }

    #[tokio::test]
    async fn test_list_all_newest_first_with_id_tiebreak() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);
        let now = Utc::now();

        let a = repo.insert(&new_order("1", "a"), now).await.unwrap();
        let b = repo.insert(&new_order("2", "b"), now).await.unwrap();
        let c = repo
            .insert(&new_order("3", "c"), now - Duration::hours(1))
            .await
            .unwrap();

        let ids: Vec<_> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);
    }

    #[tokio::test]
    async fn test_record_payment_overwrites_previous_note() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);
        let order = repo.create(&new_order("555-1234", "a")).await.unwrap();

        repo.record_payment(order.id, "mgr1: cash").await.unwrap();
        let paid = repo.record_payment(order.id, "boss: upi").await.unwrap();

        assert_eq!(paid.payment_status, PaymentStatus::Paid);
        assert_eq!(paid.payment_details.as_deref(), Some("boss: upi"));
        assert_eq!(paid.created_at, order.created_at);
    }

    #[tokio::test]
    async fn test_record_payment_unknown_order() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);

        let err = repo
            .record_payment(OrderId::new(42), "mgr1: cash")
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);
        let mut order = repo.create(&new_order("555-1234", "a")).await.unwrap();
        let created_at = order.created_at;

        order.customer_address = "b".to_string();
        order.cans = 9;
        order.payment_status = PaymentStatus::Paid;
        let updated = repo.update(&order).await.unwrap();

        assert_eq!(updated.customer_address, "b");
        assert_eq!(updated.cans, 9);
        assert_eq!(updated.payment_status, PaymentStatus::Paid);
        assert_eq!(updated.created_at, created_at);
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let pool = test_pool().await;
        let repo = OrderRepository::new(&pool);
        let order = repo.create(&new_order("555-1234", "a")).await.unwrap();

        assert!(repo.delete(order.id).await.unwrap());
        assert!(repo.get(order.id).await.unwrap().is_none());
        assert!(!repo.delete(order.id).await.unwrap());
    }
}

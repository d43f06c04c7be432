//! Order queries.

use rand::Rng;
use sqlx::SqlitePool;
use tracing::debug;

use order_flow::OrderStatus;

use crate::error::{Result, StoreError};
use crate::models::{NewOrder, Order, OrderRow};

const ORDER_COLUMNS: &str = "id, order_number, customer_chat_id, customer_name, phone, items, \
     total_amount, delivery_address, delivery_type, payment_method, status, \
     latitude, longitude, created_at, updated_at";

/// Generate a fresh order number: a country prefix, the last six digits
/// of the epoch millis, and three random digits.
pub fn new_order_number() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("UZ{:06}{:03}", millis % 1_000_000, suffix)
}

/// Insert a new order. Orders always enter the store in `accepted`.
pub async fn create_order(pool: &SqlitePool, new: &NewOrder) -> Result<Order> {
    let items = serde_json::to_string(&new.items)?;

    let result = sqlx::query(
        r#"
        INSERT INTO orders (
            order_number, customer_chat_id, customer_name, phone, items,
            total_amount, delivery_address, delivery_type, payment_method,
            status, latitude, longitude
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.order_number)
    .bind(new.customer_chat_id)
    .bind(&new.customer_name)
    .bind(&new.phone)
    .bind(items)
    .bind(new.total_amount)
    .bind(&new.delivery_address)
    .bind(new.delivery_type.as_str())
    .bind(new.payment_method.as_str())
    .bind(OrderStatus::Accepted.as_str())
    .bind(new.latitude)
    .bind(new.longitude)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!("Created order #{} (id={})", new.order_number, id);

    find_by_id(pool, id).await?.ok_or(StoreError::NotFound {
        entity: "order",
        id: id.to_string(),
    })
}

/// Look up an order by its numeric id.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Order::try_from).transpose()
}

/// Look up an order by its customer-facing order number.
pub async fn find_by_order_number(pool: &SqlitePool, order_number: &str) -> Result<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = ?"
    ))
    .bind(order_number)
    .fetch_optional(pool)
    .await?;

    row.map(Order::try_from).transpose()
}

/// Persist a new status, stamping `updated_at`.
pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE orders
        SET status = ?, updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(status.as_str())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound {
            entity: "order",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// The most recent orders, newest first.
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
}

/// All orders placed by a customer, newest first.
pub async fn list_by_customer(pool: &SqlitePool, customer_chat_id: i64) -> Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_chat_id = ? \
         ORDER BY created_at DESC, id DESC"
    ))
    .bind(customer_chat_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Order::try_from).collect()
}

/// Aggregate order statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderStats {
    /// Sum of delivered orders' totals.
    pub total_revenue: i64,
    /// Count of all orders, whatever their status.
    pub total_orders: i64,
}

/// Revenue and order-count totals.
pub async fn stats(pool: &SqlitePool) -> Result<OrderStats> {
    let (total_revenue,): (Option<i64>,) = sqlx::query_as(
        "SELECT SUM(total_amount) FROM orders WHERE status = 'delivered'",
    )
    .fetch_one(pool)
    .await?;

    let (total_orders,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders")
        .fetch_one(pool)
        .await?;

    Ok(OrderStats {
        total_revenue: total_revenue.unwrap_or(0),
        total_orders,
    })
}

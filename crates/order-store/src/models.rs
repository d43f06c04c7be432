//! Order models.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use order_flow::{validate_transition, OrderStatus, TransitionError};

use crate::error::StoreError;

/// One ordered line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Item name.
    pub name: String,
    /// Unit price.
    pub price: i64,
    /// Quantity ordered.
    pub quantity: i64,
    /// Size/variant, if the item has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl OrderItem {
    /// Price of this line (unit price times quantity).
    pub fn line_total(&self) -> i64 {
        self.price * self.quantity
    }
}

/// Whether the order is delivered to an address or picked up at a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    Delivery,
    Pickup,
}

impl DeliveryType {
    /// The storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            DeliveryType::Delivery => "delivery",
            DeliveryType::Pickup => "pickup",
        }
    }
}

impl FromStr for DeliveryType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivery" => Ok(DeliveryType::Delivery),
            "pickup" => Ok(DeliveryType::Pickup),
            _ => Err(()),
        }
    }
}

/// How the customer pays. Settlement itself happens outside this system;
/// only the recorded method is relevant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Click,
    Payme,
    Cash,
}

impl PaymentMethod {
    /// The storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::Click => "click",
            PaymentMethod::Payme => "payme",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "click" => Ok(PaymentMethod::Click),
            "payme" => Ok(PaymentMethod::Payme),
            "cash" => Ok(PaymentMethod::Cash),
            _ => Err(()),
        }
    }
}

/// A customer order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned numeric id, used in action-control payloads.
    pub id: i64,
    /// Human-readable order number, unique, customer-facing.
    pub order_number: String,
    /// Chat id of the customer, when they are reachable over the channel.
    pub customer_chat_id: Option<i64>,
    /// Customer display name.
    pub customer_name: Option<String>,
    /// Contact phone.
    pub phone: String,
    /// Ordered line items.
    pub items: Vec<OrderItem>,
    /// Total amount.
    pub total_amount: i64,
    /// Delivery address, or the pickup branch reference.
    pub delivery_address: String,
    /// Delivery vs. pickup.
    pub delivery_type: DeliveryType,
    /// Recorded payment method.
    pub payment_method: PaymentMethod,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Delivery geolocation latitude, if shared.
    pub latitude: Option<f64>,
    /// Delivery geolocation longitude, if shared.
    pub longitude: Option<f64>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last-update timestamp.
    pub updated_at: String,
}

impl Order {
    /// Whether the order is picked up at a branch.
    pub fn is_pickup(&self) -> bool {
        self.delivery_type == DeliveryType::Pickup
    }

    /// The delivery geolocation, when both coordinates are present.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Advance the order to a new status.
    ///
    /// This is the only sanctioned way to mutate the status field. Fails
    /// without touching the order when the transition is not reachable
    /// from the current status; on success also stamps `updated_at`.
    pub fn apply_transition(&mut self, to: OrderStatus) -> Result<(), TransitionError> {
        validate_transition(self.status, to)?;
        self.status = to;
        self.updated_at = now_timestamp();
        Ok(())
    }
}

/// A new order, as handed over by the order-submission flow.
///
/// Orders always enter the store in `accepted`; the status is not a
/// caller-supplied field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_chat_id: Option<i64>,
    pub customer_name: Option<String>,
    pub phone: String,
    pub items: Vec<OrderItem>,
    pub total_amount: i64,
    pub delivery_address: String,
    pub delivery_type: DeliveryType,
    pub payment_method: PaymentMethod,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Current timestamp in the store's format (UTC, second precision).
pub(crate) fn now_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// A flat orders row as fetched from SQLite. Items arrive as the raw
/// JSON column and get parsed during conversion.
#[derive(Debug, FromRow)]
pub(crate) struct OrderRow {
    pub id: i64,
    pub order_number: String,
    pub customer_chat_id: Option<i64>,
    pub customer_name: Option<String>,
    pub phone: String,
    pub items: String,
    pub total_amount: i64,
    pub delivery_address: String,
    pub delivery_type: String,
    pub payment_method: String,
    pub status: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let items: Vec<OrderItem> = serde_json::from_str(&row.items)?;
        let status = row.status.parse().map_err(|_| StoreError::InvalidField {
            field: "status",
            value: row.status.clone(),
        })?;
        let delivery_type = row
            .delivery_type
            .parse()
            .map_err(|_| StoreError::InvalidField {
                field: "delivery_type",
                value: row.delivery_type.clone(),
            })?;
        let payment_method = row
            .payment_method
            .parse()
            .map_err(|_| StoreError::InvalidField {
                field: "payment_method",
                value: row.payment_method.clone(),
            })?;

        Ok(Order {
            id: row.id,
            order_number: row.order_number,
            customer_chat_id: row.customer_chat_id,
            customer_name: row.customer_name,
            phone: row.phone,
            items,
            total_amount: row.total_amount,
            delivery_address: row.delivery_address,
            delivery_type,
            payment_method,
            status,
            latitude: row.latitude,
            longitude: row.longitude,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

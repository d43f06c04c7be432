//! In-place reconciliation of the operator control message.

use tracing::debug;

use order_flow::OrderStatus;
use order_store::Order;

use crate::channel::Channel;
use crate::error::NotifierError;
use crate::operator;

/// Edit an existing operator control message to reflect a new status.
///
/// The message text and keyboard are re-rendered from the order, so the
/// remote message always matches what a fresh dispatch would have sent.
/// At a terminal status the keyboard comes back empty, stripping the
/// message of its controls. Idempotent: the same arguments always
/// produce the same remote content, and no new message is ever created.
pub async fn reconcile(
    channel: &dyn Channel,
    chat_id: i64,
    message_id: i64,
    order: &Order,
    new_status: OrderStatus,
) -> Result<(), NotifierError> {
    let (text, keyboard) = operator::render_message(order, new_status);
    debug!(
        "Reconciling control message {} for order #{} to {}",
        message_id, order.order_number, new_status
    );
    channel.edit_message(chat_id, message_id, &text, keyboard).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use order_store::{DeliveryType, OrderItem, PaymentMethod};

    fn sample_order(status: OrderStatus) -> Order {
        Order {
            id: 7,
            order_number: "UZ123456001".to_string(),
            customer_chat_id: Some(100),
            customer_name: Some("Aziz".to_string()),
            phone: "+998901234567".to_string(),
            items: vec![OrderItem {
                name: "Лагман".to_string(),
                price: 38000,
                quantity: 1,
                size: None,
            }],
            total_amount: 38000,
            delivery_address: "ул. Навои, 15".to_string(),
            delivery_type: DeliveryType::Delivery,
            payment_method: PaymentMethod::Payme,
            status,
            latitude: None,
            longitude: None,
            created_at: "2025-01-01 10:00:00".to_string(),
            updated_at: "2025-01-01 10:00:00".to_string(),
        }
    }

    #[tokio::test]
    async fn test_reconcile_edits_in_place() {
        let channel = RecordingChannel::new();
        let order = sample_order(OrderStatus::Preparing);

        reconcile(&channel, 555, 42, &order, OrderStatus::Preparing)
            .await
            .unwrap();

        let edits = channel.edits();
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].chat_id, 555);
        assert_eq!(edits[0].message_id, 42);
        assert!(edits[0].text.contains("👨‍🍳 Статус: Готовится"));
        assert_eq!(
            edits[0].keyboard.inline_keyboard[0][0]
                .callback_data
                .as_deref(),
            Some("setstatus:7:cooking")
        );
        // Nothing was sent as a new message.
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let channel = RecordingChannel::new();
        let order = sample_order(OrderStatus::Cooking);

        reconcile(&channel, 555, 42, &order, OrderStatus::Cooking)
            .await
            .unwrap();
        reconcile(&channel, 555, 42, &order, OrderStatus::Cooking)
            .await
            .unwrap();

        let edits = channel.edits();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0], edits[1]);
    }

    #[tokio::test]
    async fn test_reconcile_terminal_status_strips_controls() {
        let channel = RecordingChannel::new();
        let order = sample_order(OrderStatus::Delivered);

        reconcile(&channel, 555, 42, &order, OrderStatus::Delivered)
            .await
            .unwrap();

        let edits = channel.edits();
        assert!(edits[0].keyboard.is_empty());
        assert!(edits[0].text.contains("✅ Статус: Доставлен"));
    }
}

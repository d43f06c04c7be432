//! Notification dispatch side effects.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use order_flow::OrderStatus;
use order_store::Order;

use crate::channel::{Channel, MessageRef};
use crate::templates::Lang;
use crate::{customer, operator};

/// Dispatches order notifications to the operator and the customer.
///
/// Every dispatch method is best-effort: send failures are logged and
/// swallowed, never surfaced to the caller. The order-creation flow must
/// not fail because a notification could not be delivered.
#[derive(Clone)]
pub struct Notifier {
    channel: Arc<dyn Channel>,
    operator_chat_id: i64,
}

impl Notifier {
    /// Create a notifier sending operator traffic to the given chat.
    pub fn new(channel: Arc<dyn Channel>, operator_chat_id: i64) -> Self {
        Self {
            channel,
            operator_chat_id,
        }
    }

    /// The channel this notifier sends over.
    pub fn channel(&self) -> &Arc<dyn Channel> {
        &self.channel
    }

    /// The operator conversation.
    pub fn operator_chat_id(&self) -> i64 {
        self.operator_chat_id
    }

    /// Alert the operator about a new order: the control message with the
    /// first-step actions, and a companion location marker for delivery
    /// orders that shared coordinates.
    ///
    /// Returns the control message's address so callers can reconcile it
    /// later, or `None` when the send failed.
    pub async fn dispatch_new_order(&self, order: &Order) -> Option<MessageRef> {
        let (text, keyboard) = operator::render_message(order, order.status);

        let message = match self
            .channel
            .send_markdown(self.operator_chat_id, &text, Some(keyboard.into()))
            .await
        {
            Ok(message) => message,
            Err(e) => {
                error!("Failed to send operator notification for order #{}: {}", order.order_number, e);
                return None;
            }
        };

        if !order.is_pickup() {
            if let Some((latitude, longitude)) = order.location() {
                if let Err(e) = self
                    .channel
                    .send_location(self.operator_chat_id, latitude, longitude)
                    .await
                {
                    // The control message made it out; losing the marker
                    // is acceptable.
                    warn!("Failed to send location marker for order #{}: {}", order.order_number, e);
                }
            }
        }

        info!("Operator notified of order #{}", order.order_number);
        Some(message)
    }

    /// Send the customer their one-time order confirmation.
    ///
    /// No-ops when the customer has no reachable conversation.
    pub async fn dispatch_customer_confirmation(&self, order: &Order, lang: Lang) {
        let Some(chat_id) = order.customer_chat_id else {
            debug!("Order #{} has no customer conversation, skipping confirmation", order.order_number);
            return;
        };

        let text = customer::render_confirmation(order, lang);
        match self.channel.send_markdown(chat_id, &text, None).await {
            Ok(_) => info!("Confirmation sent to customer {} for order #{}", chat_id, order.order_number),
            Err(e) => error!("Failed to send confirmation for order #{}: {}", order.order_number, e),
        }
    }

    /// Notify the customer of a status change.
    ///
    /// Silent for `accepted` (covered by the confirmation) and for orders
    /// without a customer conversation.
    pub async fn dispatch_status_change(&self, order: &Order, status: OrderStatus, lang: Lang) {
        let Some(chat_id) = order.customer_chat_id else {
            debug!("Order #{} has no customer conversation, skipping status update", order.order_number);
            return;
        };

        let Some(text) = customer::render_status_update(status, &order.order_number, lang) else {
            return;
        };

        match self.channel.send_markdown(chat_id, &text, None).await {
            Ok(_) => info!(
                "Status \"{}\" sent to customer {} for order #{}",
                status, chat_id, order.order_number
            ),
            Err(e) => error!(
                "Failed to send status \"{}\" for order #{}: {}",
                status, order.order_number, e
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::RecordingChannel;
    use order_store::{DeliveryType, OrderItem, PaymentMethod};

    fn sample_order() -> Order {
        Order {
            id: 5,
            order_number: "UZ123456001".to_string(),
            customer_chat_id: Some(100),
            customer_name: Some("Aziz".to_string()),
            phone: "+998901234567".to_string(),
            items: vec![OrderItem {
                name: "Плов".to_string(),
                price: 45000,
                quantity: 2,
                size: None,
            }],
            total_amount: 90000,
            delivery_address: "ул. Навои, 15".to_string(),
            delivery_type: DeliveryType::Delivery,
            payment_method: PaymentMethod::Cash,
            status: OrderStatus::Accepted,
            latitude: Some(41.311),
            longitude: Some(69.279),
            created_at: "2025-01-01 10:00:00".to_string(),
            updated_at: "2025-01-01 10:00:00".to_string(),
        }
    }

    fn notifier(channel: &RecordingChannel) -> Notifier {
        Notifier::new(Arc::new(channel.clone()), 555)
    }

    #[tokio::test]
    async fn test_dispatch_new_order_sends_control_message_and_marker() {
        let channel = RecordingChannel::new();
        let order = sample_order();

        let message = notifier(&channel).dispatch_new_order(&order).await.unwrap();
        assert_eq!(message.chat_id, 555);

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, 555);
        assert!(sent[0].markdown);
        assert!(sent[0].text.contains("#UZ123456001"));

        // First decision point: advance to preparing, or cancel.
        match &sent[0].markup {
            Some(telegram_client::ReplyMarkup::Inline(keyboard)) => {
                assert_eq!(keyboard.inline_keyboard.len(), 2);
                assert_eq!(
                    keyboard.inline_keyboard[0][0].callback_data.as_deref(),
                    Some("setstatus:5:preparing")
                );
                assert_eq!(
                    keyboard.inline_keyboard[1][0].callback_data.as_deref(),
                    Some("setstatus:5:cancelled")
                );
            }
            other => panic!("expected inline keyboard, got {:?}", other),
        }

        assert_eq!(channel.locations(), vec![(555, 41.311, 69.279)]);
    }

    #[tokio::test]
    async fn test_dispatch_new_order_pickup_sends_no_marker() {
        let channel = RecordingChannel::new();
        let mut order = sample_order();
        order.delivery_type = DeliveryType::Pickup;

        notifier(&channel).dispatch_new_order(&order).await.unwrap();
        assert!(channel.locations().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_new_order_swallows_send_failure() {
        let channel = RecordingChannel::new();
        channel.set_failing(true);

        let result = notifier(&channel).dispatch_new_order(&sample_order()).await;
        assert!(result.is_none());
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn test_status_change_skips_accepted() {
        let channel = RecordingChannel::new();
        let order = sample_order();

        notifier(&channel)
            .dispatch_status_change(&order, OrderStatus::Accepted, Lang::Ru)
            .await;
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn test_status_change_reaches_customer_chat() {
        let channel = RecordingChannel::new();
        let order = sample_order();

        notifier(&channel)
            .dispatch_status_change(&order, OrderStatus::Preparing, Lang::Ru)
            .await;

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].chat_id, 100);
        assert!(sent[0].text.contains("готовится"));
    }

    #[tokio::test]
    async fn test_status_change_without_customer_is_silent() {
        let channel = RecordingChannel::new();
        let mut order = sample_order();
        order.customer_chat_id = None;

        notifier(&channel)
            .dispatch_status_change(&order, OrderStatus::Delivered, Lang::Ru)
            .await;
        assert!(channel.sent().is_empty());
    }

    #[tokio::test]
    async fn test_confirmation_uses_customer_language() {
        let channel = RecordingChannel::new();
        let order = sample_order();

        notifier(&channel)
            .dispatch_customer_confirmation(&order, Lang::Uz)
            .await;

        let sent = channel.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("Buyurtmangiz qabul qilindi"));
    }
}

//! Operator control-message rendering.

use telegram_client::{InlineKeyboardButton, InlineKeyboardMarkup};

use order_flow::{next_actions, OrderStatus};
use order_store::Order;

use crate::templates::{format_amount, payment_label, status_line};

fn header_icon(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Accepted => "🆕",
        OrderStatus::Delivered => "✅",
        OrderStatus::Cancelled => "🚫",
        _ => "📦",
    }
}

/// Render the operator control message for an order at a given status.
///
/// Deterministic in the order contents and status, so dispatching and
/// reconciling produce byte-identical text. The keyboard is empty at
/// terminal statuses.
pub fn render_message(order: &Order, status: OrderStatus) -> (String, InlineKeyboardMarkup) {
    let customer_name = order.customer_name.as_deref().unwrap_or("Не указано");
    let is_pickup = order.is_pickup();

    let mut lines = vec![
        format!(
            "{} *{} #{}*",
            header_icon(status),
            if is_pickup { "САМОВЫВОЗ" } else { "ДОСТАВКА" },
            order.order_number
        ),
        "━━━━━━━━━━━━━━━━━━━━".to_string(),
        format!("📦 *Тип:* {}", if is_pickup { "Самовывоз" } else { "Доставка" }),
        format!("👤 *Имя:* {customer_name}"),
        format!("📞 *Телефон:* {}", order.phone),
        format!(
            "📍 *{}:* {}",
            if is_pickup { "Филиал" } else { "Адрес" },
            order.delivery_address
        ),
    ];

    if !is_pickup {
        if let Some((latitude, longitude)) = order.location() {
            lines.push(format!(
                "🌍 *Карта:* [Открыть](https://www.google.com/maps?q={latitude},{longitude})"
            ));
        }
    }

    lines.push(String::new());
    lines.push("🛒 *Состав заказа:*".to_string());
    for item in &order.items {
        lines.push(format!(
            "  • {} ({}) × {} = {} сум",
            item.name,
            item.size.as_deref().unwrap_or("стд."),
            item.quantity,
            format_amount(item.line_total())
        ));
    }
    lines.push(String::new());

    lines.push(format!("💰 *Итого:* {} сум", format_amount(order.total_amount)));
    lines.push(format!("💳 *Оплата:* {}", payment_label(order.payment_method)));
    lines.push("━━━━━━━━━━━━━━━━━━━━".to_string());
    lines.push(String::new());
    lines.push(status_line(status).to_string());

    (lines.join("\n"), status_keyboard(order.id, status))
}

/// The control keyboard for an order at a given status: one row per
/// available action, in the state machine's fixed order.
pub fn status_keyboard(order_id: i64, status: OrderStatus) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        next_actions(status)
            .iter()
            .map(|action| {
                vec![InlineKeyboardButton::callback(
                    action.label,
                    format!("setstatus:{}:{}", order_id, action.target),
                )]
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_store::{DeliveryType, OrderItem, PaymentMethod};

    fn sample_order() -> Order {
        Order {
            id: 17,
            order_number: "UZ123456001".to_string(),
            customer_chat_id: Some(100),
            customer_name: Some("Aziz".to_string()),
            phone: "+998901234567".to_string(),
            items: vec![
                OrderItem {
                    name: "Плов".to_string(),
                    price: 45000,
                    quantity: 2,
                    size: None,
                },
                OrderItem {
                    name: "Сомса".to_string(),
                    price: 12000,
                    quantity: 1,
                    size: Some("большая".to_string()),
                },
            ],
            total_amount: 102000,
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

    #[test]
    fn test_render_includes_order_details() {
        let order = sample_order();
        let (text, keyboard) = render_message(&order, OrderStatus::Accepted);

        assert!(text.contains("#UZ123456001"));
        assert!(text.contains("ДОСТАВКА"));
        assert!(text.contains("+998901234567"));
        assert!(text.contains("ул. Навои, 15"));
        assert!(text.contains("• Плов (стд.) × 2 = 90 000 сум"));
        assert!(text.contains("• Сомса (большая) × 1 = 12 000 сум"));
        assert!(text.contains("*Итого:* 102 000 сум"));
        assert!(text.contains("Наличные"));
        assert!(text.contains("📋 Статус: Принят"));
        assert!(text.contains("google.com/maps?q=41.311,69.279"));

        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(
            keyboard.inline_keyboard[0][0].callback_data.as_deref(),
            Some("setstatus:17:preparing")
        );
        assert_eq!(
            keyboard.inline_keyboard[1][0].callback_data.as_deref(),
            Some("setstatus:17:cancelled")
        );
    }

    #[test]
    fn test_render_pickup_has_no_map_link() {
        let mut order = sample_order();
        order.delivery_type = DeliveryType::Pickup;
        let (text, _) = render_message(&order, OrderStatus::Accepted);

        assert!(text.contains("САМОВЫВОЗ"));
        assert!(text.contains("*Филиал:*"));
        assert!(!text.contains("Карта"));
    }

    #[test]
    fn test_render_terminal_status_has_no_actions() {
        let order = sample_order();
        for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let (text, keyboard) = render_message(&order, status);
            assert!(keyboard.is_empty());
            assert!(text.contains(status_line(status)));
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let order = sample_order();
        let first = render_message(&order, OrderStatus::Preparing);
        let second = render_message(&order, OrderStatus::Preparing);
        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }
}

//! Customer-facing message rendering.

use order_flow::OrderStatus;
use order_store::Order;

use crate::templates::{format_amount, payment_label, Lang};

/// Render the one-time order confirmation in the customer's language.
pub fn render_confirmation(order: &Order, lang: Lang) -> String {
    let items = order
        .items
        .iter()
        .map(|item| format!("• {} × {}", item.name, item.quantity))
        .collect::<Vec<_>>()
        .join("\n");
    let total = format_amount(order.total_amount);
    let payment = payment_label(order.payment_method);
    let number = &order.order_number;
    let address = &order.delivery_address;

    match lang {
        Lang::Ru => format!(
            "✅ *Ваш заказ принят!*\nС вами свяжутся в ближайшее время.\n\n\
             📋 *Номер заказа:* `#{number}`\n\
             🛍️ *Заказано:*\n{items}\n\n\
             💰 *Итого:* {total} сум\n\
             🏢 *{}:* {address}\n\
             💳 *Оплата:* {payment}",
            if order.is_pickup() { "Самовывоз" } else { "Адрес" }
        ),
        Lang::Uz => format!(
            "✅ *Buyurtmangiz qabul qilindi!*\nTez orada siz bilan bog'lanamiz.\n\n\
             📋 *Buyurtma raqami:* `#{number}`\n\
             🛍️ *Buyurtma tarkibi:*\n{items}\n\n\
             💰 *Jami:* {total} so'm\n\
             🏢 *{}:* {address}\n\
             💳 *To'lov:* {payment}",
            if order.is_pickup() { "Olib ketish" } else { "Manzil" }
        ),
        Lang::En => format!(
            "✅ *Your order has been placed!*\nWe will contact you shortly.\n\n\
             📋 *Order number:* `#{number}`\n\
             🛍️ *Your items:*\n{items}\n\n\
             💰 *Total:* {total} UZS\n\
             🏢 *{}:* {address}\n\
             💳 *Payment:* {payment}",
            if order.is_pickup() { "Pickup" } else { "Address" }
        ),
    }
}

/// Render the status-change notification for the customer.
///
/// Returns `None` for `accepted`: the confirmation already covered it,
/// and a second message would read as a duplicate.
pub fn render_status_update(
    status: OrderStatus,
    order_number: &str,
    lang: Lang,
) -> Option<String> {
    let text = match (lang, status) {
        (_, OrderStatus::Accepted) => return None,

        (Lang::Ru, OrderStatus::Preparing) => format!(
            "👨‍🍳 *Заказ #{order_number} готовится!*\n\nНаши повара уже приступили. Скоро будет готово! ⏳"
        ),
        (Lang::Ru, OrderStatus::Cooking) => format!(
            "🔥 *Заказ #{order_number} упаковывается!*\n\nОсталось совсем немного, уже почти готово!"
        ),
        (Lang::Ru, OrderStatus::OutForDelivery) => format!(
            "🚗 *Заказ #{order_number} в пути!*\n\nКурьер уже едет к вам. Ожидайте! 📍"
        ),
        (Lang::Ru, OrderStatus::Delivered) => format!(
            "✅ *Заказ #{order_number} доставлен!*\n\nПриятного аппетита! 😋\nСпасибо, что выбрали нас! 🙏"
        ),
        (Lang::Ru, OrderStatus::Cancelled) => format!(
            "❌ *Заказ #{order_number} отменён.*\n\nЕсли возникли вопросы — свяжитесь с нами."
        ),

        (Lang::Uz, OrderStatus::Preparing) => format!(
            "👨‍🍳 *Buyurtma #{order_number} tayyorlanmoqda!*\n\nOshpazlarimiz ishga kirishdi. Tez orada tayyor bo'ladi! ⏳"
        ),
        (Lang::Uz, OrderStatus::Cooking) => format!(
            "🔥 *Buyurtma #{order_number} qadoqlanmoqda!*\n\nOzgina qoldi, deyarli tayyor!"
        ),
        (Lang::Uz, OrderStatus::OutForDelivery) => format!(
            "🚗 *Buyurtma #{order_number} yo'lda!*\n\nKuryer sizga yetib kelmoqda. Kuting! 📍"
        ),
        (Lang::Uz, OrderStatus::Delivered) => format!(
            "✅ *Buyurtma #{order_number} yetkazildi!*\n\nYoqimli ishtaha! 😋\nBizni tanlaganingiz uchun rahmat! 🙏"
        ),
        (Lang::Uz, OrderStatus::Cancelled) => format!(
            "❌ *Buyurtma #{order_number} bekor qilindi.*\n\nSavollar bo'lsa, biz bilan bog'laning."
        ),

        (Lang::En, OrderStatus::Preparing) => format!(
            "👨‍🍳 *Order #{order_number} is being prepared!*\n\nOur cooks are on it. It will be ready soon! ⏳"
        ),
        (Lang::En, OrderStatus::Cooking) => format!(
            "🔥 *Order #{order_number} is being packed!*\n\nAlmost there, just a little longer!"
        ),
        (Lang::En, OrderStatus::OutForDelivery) => format!(
            "🚗 *Order #{order_number} is on its way!*\n\nThe courier is heading to you. Stay tuned! 📍"
        ),
        (Lang::En, OrderStatus::Delivered) => format!(
            "✅ *Order #{order_number} has been delivered!*\n\nEnjoy your meal! 😋\nThank you for choosing us! 🙏"
        ),
        (Lang::En, OrderStatus::Cancelled) => format!(
            "❌ *Order #{order_number} was cancelled.*\n\nIf you have any questions, please contact us."
        ),
    };

    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_store::{DeliveryType, OrderItem, PaymentMethod};

    fn sample_order() -> Order {
        Order {
            id: 1,
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
            payment_method: PaymentMethod::Click,
            status: order_flow::OrderStatus::Accepted,
            latitude: None,
            longitude: None,
            created_at: "2025-01-01 10:00:00".to_string(),
            updated_at: "2025-01-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn test_no_status_update_for_accepted() {
        for lang in Lang::ALL {
            assert!(render_status_update(OrderStatus::Accepted, "UZ1", lang).is_none());
        }
    }

    #[test]
    fn test_status_updates_nonempty_for_all_other_statuses() {
        for lang in Lang::ALL {
            for status in OrderStatus::ALL {
                if status == OrderStatus::Accepted {
                    continue;
                }
                let text = render_status_update(status, "UZ123456001", lang)
                    .expect("template missing");
                assert!(text.contains("#UZ123456001"), "{lang:?}/{status}");
            }
        }
    }

    #[test]
    fn test_confirmation_summarizes_order() {
        let order = sample_order();
        let text = render_confirmation(&order, Lang::Ru);
        assert!(text.contains("`#UZ123456001`"));
        assert!(text.contains("• Плов × 2"));
        assert!(text.contains("90 000 сум"));
        assert!(text.contains("*Адрес:* ул. Навои, 15"));
        assert!(text.contains("Click"));
    }

    #[test]
    fn test_confirmation_is_localized() {
        let order = sample_order();
        let uz = render_confirmation(&order, Lang::Uz);
        assert!(uz.contains("Buyurtmangiz qabul qilindi"));

        let en = render_confirmation(&order, Lang::En);
        assert!(en.contains("Your order has been placed"));
    }

    #[test]
    fn test_confirmation_pickup_label() {
        let mut order = sample_order();
        order.delivery_type = DeliveryType::Pickup;
        let text = render_confirmation(&order, Lang::Ru);
        assert!(text.contains("*Самовывоз:*"));
    }
}

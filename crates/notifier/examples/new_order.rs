//! Dispatch a demo order to the operator.
//!
//! Sends the operator control message (with its first-step actions) and
//! the customer confirmation for a hand-built order, the same calls the
//! order-submission flow makes after persisting a new order.
//!
//! Run with: cargo run -p notifier --example new_order
//!
//! Configuration via .env file or environment variables:
//!   BOT_TOKEN         - Bot API token (required)
//!   OPERATOR_CHAT_ID  - chat id receiving the control message (required)

use std::env;
use std::sync::Arc;

use notifier::{Lang, Notifier};
use order_flow::OrderStatus;
use order_store::{DeliveryType, Order, OrderItem, PaymentMethod};
use telegram_client::{BotClient, BotConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let token = env::var("BOT_TOKEN").map_err(|_| "BOT_TOKEN is not set")?;
    let operator_chat_id: i64 = env::var("OPERATOR_CHAT_ID")
        .map_err(|_| "OPERATOR_CHAT_ID is not set")?
        .parse()?;

    println!("Connecting...");
    let client = BotClient::connect(BotConfig::new(token)).await?;
    let notifier = Notifier::new(Arc::new(client), operator_chat_id);

    // A demo order; the "customer" is the operator chat so both
    // messages land somewhere visible.
    let order = Order {
        id: 1,
        order_number: "UZ123456001".to_string(),
        customer_chat_id: Some(operator_chat_id),
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
    };

    match notifier.dispatch_new_order(&order).await {
        Some(message) => println!("Control message {} sent", message.message_id),
        None => println!("Dispatch failed, see logs"),
    }

    notifier.dispatch_customer_confirmation(&order, Lang::Ru).await;
    println!("Done.");

    Ok(())
}

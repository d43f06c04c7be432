//! Inbound event handlers.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use notifier::templates;
use notifier::{reconcile, Channel, Lang, Notifier};
use order_flow::{OrderStatus, TransitionError};
use order_store::{order, Database, StoreError};

use crate::event::{ActionPayload, InboundEvent, PayloadError};
use crate::session::SessionStore;

/// Configuration for the update handlers.
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// The single conversation authorized to advance order statuses.
    pub operator_chat_id: i64,

    /// Storefront web-app URL, when one is configured.
    pub webapp_url: Option<String>,
}

/// Errors that can occur while handling a status-change action.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A non-operator conversation attempted a status change.
    #[error("unauthorized: chat {0} is not the operator")]
    Unauthorized(i64),

    /// Malformed action payload or unrecognized status.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The referenced order is absent from the store.
    #[error("order not found: {0}")]
    NotFound(i64),

    /// The requested transition is not reachable.
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// The store read or write failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Interprets inbound events and drives the state machine, store,
/// reconciler and customer notifications.
pub struct UpdateHandler {
    channel: Arc<dyn Channel>,
    store: Database,
    sessions: Arc<SessionStore>,
    notifier: Notifier,
    config: HandlerConfig,
}

impl UpdateHandler {
    /// Create a handler over the given collaborators.
    pub fn new(
        channel: Arc<dyn Channel>,
        store: Database,
        sessions: Arc<SessionStore>,
        notifier: Notifier,
        config: HandlerConfig,
    ) -> Self {
        Self {
            channel,
            store,
            sessions,
            notifier,
            config,
        }
    }

    /// Handle one inbound event. Never fails: every error is recovered
    /// here and surfaced to the requesting actor instead.
    pub async fn handle_event(&self, event: InboundEvent) {
        match event {
            InboundEvent::ActionPress {
                action_id,
                chat_id,
                message_id,
                data,
            } => {
                self.handle_action(&action_id, chat_id, message_id, &data)
                    .await
            }
            InboundEvent::ChatMessage {
                chat_id,
                sender_name,
                text,
            } => self.handle_message(chat_id, &sender_name, text.trim()).await,
        }
    }

    /// Route an action press by its payload shape.
    async fn handle_action(
        &self,
        action_id: &str,
        chat_id: i64,
        message_id: Option<i64>,
        data: &str,
    ) {
        match ActionPayload::parse(data) {
            Ok(ActionPayload::SetLanguage(lang)) => {
                self.change_language(action_id, chat_id, lang).await
            }
            Ok(ActionPayload::SetStatus { order_id, status }) => {
                self.run_status_change(action_id, chat_id, message_id, Some((order_id, status)))
                    .await
            }
            // Status-shaped but undecodable; authorization still applies.
            Err(PayloadError::MalformedStatus(_)) => {
                self.run_status_change(action_id, chat_id, message_id, None)
                    .await
            }
            Err(PayloadError::UnknownLanguage(code)) => {
                debug!("Ignoring language request for unsupported code {}", code)
            }
            Err(PayloadError::Unrecognized(payload)) => {
                debug!("Ignoring unrecognized action payload: {}", payload)
            }
        }
    }

    /// Switch a conversation's language and confirm in the new language.
    async fn change_language(&self, action_id: &str, chat_id: i64, lang: Lang) {
        self.sessions.set(chat_id, lang).await;
        info!("Chat {} switched language to {}", chat_id, lang.code());

        // Acknowledge right away; the confirmation send below may be
        // slow or fail on its own.
        if let Err(e) = self.channel.answer_action(action_id, None, false).await {
            warn!("Failed to acknowledge language change: {}", e);
        }

        let keyboard = templates::main_keyboard(lang, self.config.webapp_url.as_deref());
        if let Err(e) = self
            .channel
            .send_message(chat_id, templates::lang_changed(lang), Some(keyboard.into()))
            .await
        {
            warn!("Failed to send language confirmation: {}", e);
        }
    }

    /// Run a status change and surface any failure as a visible
    /// acknowledgment.
    async fn run_status_change(
        &self,
        action_id: &str,
        chat_id: i64,
        message_id: Option<i64>,
        request: Option<(i64, OrderStatus)>,
    ) {
        if let Err(e) = self
            .change_order_status(action_id, chat_id, message_id, request)
            .await
        {
            warn!("Status change from chat {} failed: {}", chat_id, e);
            if let Err(e) = self
                .channel
                .answer_action(action_id, Some(failure_notice(&e)), true)
                .await
            {
                warn!("Failed to deliver failure notice: {}", e);
            }
        }
    }

    /// The status-change sequence: authorize, validate, look up,
    /// transition, persist, acknowledge, reconcile, notify the customer.
    async fn change_order_status(
        &self,
        action_id: &str,
        chat_id: i64,
        message_id: Option<i64>,
        request: Option<(i64, OrderStatus)>,
    ) -> Result<(), HandlerError> {
        // Authorization comes before any payload or store inspection.
        if chat_id != self.config.operator_chat_id {
            return Err(HandlerError::Unauthorized(chat_id));
        }

        let (order_id, status) = request.ok_or_else(|| {
            HandlerError::InvalidRequest("malformed setstatus payload".to_string())
        })?;

        let mut order = order::find_by_id(self.store.pool(), order_id)
            .await?
            .ok_or(HandlerError::NotFound(order_id))?;

        order.apply_transition(status)?;
        order::update_status(self.store.pool(), order.id, status).await?;

        info!("Order #{} -> \"{}\" by operator", order.order_number, status);

        let ack = format!("#{}: {}", order.order_number, templates::status_label(status));
        if let Err(e) = self.channel.answer_action(action_id, Some(&ack), false).await {
            warn!("Failed to acknowledge status change: {}", e);
        }

        if let Some(message_id) = message_id {
            if let Err(e) =
                reconcile(self.channel.as_ref(), chat_id, message_id, &order, status).await
            {
                warn!(
                    "Failed to reconcile control message for order #{}: {}",
                    order.order_number, e
                );
            }
        }

        let lang = match order.customer_chat_id {
            Some(customer) => self.sessions.get(customer).await,
            None => Lang::default(),
        };
        self.notifier.dispatch_status_change(&order, status, lang).await;

        Ok(())
    }

    /// Reply to the small fixed vocabulary of chat commands; anything
    /// else is ignored.
    async fn handle_message(&self, chat_id: i64, sender_name: &str, text: &str) {
        let lang = self.sessions.get(chat_id).await;

        if text == "/start" {
            let keyboard = templates::main_keyboard(lang, self.config.webapp_url.as_deref());
            if let Err(e) = self
                .channel
                .send_message(
                    chat_id,
                    &templates::welcome(lang, sender_name),
                    Some(keyboard.into()),
                )
                .await
            {
                warn!("Failed to send welcome: {}", e);
            }
            return;
        }

        if templates::is_lang_button(text) {
            if let Err(e) = self
                .channel
                .send_message(
                    chat_id,
                    templates::choose_lang(lang),
                    Some(templates::language_keyboard().into()),
                )
                .await
            {
                warn!("Failed to send language picker: {}", e);
            }
            return;
        }

        if templates::is_menu_button(text) && self.config.webapp_url.is_none() {
            if let Err(e) = self
                .channel
                .send_message(chat_id, templates::STOREFRONT_MISSING, None)
                .await
            {
                warn!("Failed to send storefront warning: {}", e);
            }
            return;
        }

        debug!("Ignoring message from chat {}: {:?}", chat_id, text);
    }
}

/// The visible notice for a failed status change.
fn failure_notice(error: &HandlerError) -> &'static str {
    match error {
        HandlerError::Unauthorized(_) => "⛔ Только администратор может менять статус",
        HandlerError::InvalidRequest(_) => "❌ Неверный статус или ID заказа",
        HandlerError::NotFound(_) => "❌ Заказ не найден в базе данных",
        HandlerError::Transition(_) => "❌ Недопустимая смена статуса",
        HandlerError::Store(_) => "❌ Ошибка при обновлении статуса",
    }
}

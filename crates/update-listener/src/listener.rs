//! The update ingestion loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use telegram_client::{BotApiError, BotClient, Update};

use crate::event::classify;
use crate::handler::UpdateHandler;

/// Configuration for the ingestion loop.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Server-side long-poll wait. Bounded so the loop stays responsive
    /// to a stop request.
    pub poll_timeout_secs: u64,

    /// Fixed backoff after a transient poll failure.
    pub error_backoff: Duration,

    /// Whether to drop updates queued while the bot was down.
    pub drop_pending_updates: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            poll_timeout_secs: 30,
            error_backoff: Duration::from_secs(5),
            drop_pending_updates: false,
        }
    }
}

/// Where the loop pulls updates from.
///
/// Abstracted to support different transports (the Bot API, tests, etc.)
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Remove an installed webhook so polling receives the updates.
    async fn prepare(&self, drop_pending_updates: bool) -> Result<(), BotApiError>;

    /// Fetch the next batch of updates at the given cursor, waiting up
    /// to `timeout_secs` for traffic.
    async fn poll(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, BotApiError>;
}

#[async_trait]
impl UpdateSource for BotClient {
    async fn prepare(&self, drop_pending_updates: bool) -> Result<(), BotApiError> {
        self.delete_webhook(drop_pending_updates).await.map(|_| ())
    }

    async fn poll(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, BotApiError> {
        self.get_updates(offset, timeout_secs).await
    }
}

/// Handle for cooperatively stopping a running listener.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Ask the listener to stop after its current iteration.
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A single sequential consumer of inbound updates.
///
/// Polls the source at the delivery cursor, advances the cursor past
/// each update before handing it to the handler, and routes events one
/// at a time. Handler failures are recovered per event; poll failures
/// back off and retry. The loop only exits on an explicit stop request.
pub struct UpdateListener<S: UpdateSource> {
    source: S,
    handler: UpdateHandler,
    config: ListenerConfig,
    cursor: i64,
    stopping: Arc<AtomicBool>,
}

impl<S: UpdateSource> UpdateListener<S> {
    /// Create a listener with the default configuration.
    pub fn new(source: S, handler: UpdateHandler) -> Self {
        Self::with_config(source, handler, ListenerConfig::default())
    }

    /// Create a listener with a custom configuration.
    pub fn with_config(source: S, handler: UpdateHandler, config: ListenerConfig) -> Self {
        Self {
            source,
            handler,
            config,
            cursor: 0,
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A handle that stops this listener from another task.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(self.stopping.clone())
    }

    /// The current delivery cursor: the id of the next unconsumed
    /// update.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Run the loop until a stop is requested.
    ///
    /// Returns the final delivery cursor, so a caller that restarts the
    /// listener can resume where this one left off.
    pub async fn run(mut self) -> i64 {
        if let Err(e) = self.source.prepare(self.config.drop_pending_updates).await {
            warn!("Webhook cleanup failed, polling anyway: {}", e);
        }
        info!("Update polling started");

        while !self.stopping.load(Ordering::SeqCst) {
            match self
                .source
                .poll(self.cursor, self.config.poll_timeout_secs)
                .await
            {
                Ok(updates) => self.process_batch(updates).await,
                Err(e) => {
                    error!("Polling error: {}", e);
                    tokio::time::sleep(self.config.error_backoff).await;
                }
            }
        }

        info!("Update polling stopped");
        self.cursor
    }

    /// Process one polled batch, strictly in order.
    async fn process_batch(&mut self, updates: Vec<Update>) {
        for update in updates {
            // Advance past this update before handling it, so a poison
            // event can never be fetched again.
            self.cursor = self.cursor.max(update.update_id + 1);

            match classify(&update) {
                Some(event) => self.handler.handle_event(event).await,
                None => debug!("Ignoring update {}", update.update_id),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use notifier::{Channel, Notifier, RecordingChannel};
    use order_store::Database;
    use telegram_client::{CallbackQuery, User};

    use crate::handler::HandlerConfig;
    use crate::session::SessionStore;

    const OPERATOR: i64 = 555;

    /// A source that serves queued batches, then stops the listener
    /// once the script is drained.
    struct ScriptedSource {
        batches: Mutex<VecDeque<Result<Vec<Update>, BotApiError>>>,
        stop: Mutex<Option<StopHandle>>,
        polled_offsets: Mutex<Vec<i64>>,
    }

    impl ScriptedSource {
        fn new(batches: Vec<Result<Vec<Update>, BotApiError>>) -> Arc<Self> {
            Arc::new(Self {
                batches: Mutex::new(batches.into_iter().collect()),
                stop: Mutex::new(None),
                polled_offsets: Mutex::new(Vec::new()),
            })
        }

        fn offsets(&self) -> Vec<i64> {
            self.polled_offsets.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UpdateSource for Arc<ScriptedSource> {
        async fn prepare(&self, _drop_pending_updates: bool) -> Result<(), BotApiError> {
            Ok(())
        }

        async fn poll(&self, offset: i64, _timeout_secs: u64) -> Result<Vec<Update>, BotApiError> {
            self.polled_offsets.lock().unwrap().push(offset);
            match self.batches.lock().unwrap().pop_front() {
                Some(batch) => batch,
                None => {
                    if let Some(stop) = self.stop.lock().unwrap().as_ref() {
                        stop.stop();
                    }
                    Ok(Vec::new())
                }
            }
        }
    }

    async fn handler_with_channel() -> (UpdateHandler, RecordingChannel) {
        let store = Database::connect("sqlite::memory:").await.unwrap();
        store.migrate().await.unwrap();

        let channel = RecordingChannel::new();
        let shared: Arc<dyn Channel> = Arc::new(channel.clone());
        let sessions = Arc::new(SessionStore::new());
        let notifier = Notifier::new(shared.clone(), OPERATOR);
        let handler = UpdateHandler::new(
            shared,
            store,
            sessions,
            notifier,
            HandlerConfig {
                operator_chat_id: OPERATOR,
                webapp_url: None,
            },
        );
        (handler, channel)
    }

    fn callback_update(update_id: i64, chat_id: i64, data: &str) -> Update {
        Update {
            update_id,
            message: None,
            callback_query: Some(CallbackQuery {
                id: format!("cbq-{update_id}"),
                from: User {
                    id: chat_id,
                    is_bot: false,
                    first_name: "Op".to_string(),
                    username: None,
                },
                message: None,
                data: Some(data.to_string()),
            }),
        }
    }

    async fn run_scripted(
        batches: Vec<Result<Vec<Update>, BotApiError>>,
    ) -> (i64, RecordingChannel, Vec<i64>) {
        let (handler, channel) = handler_with_channel().await;

        let source = ScriptedSource::new(batches);
        let listener = UpdateListener::with_config(
            source.clone(),
            handler,
            ListenerConfig {
                poll_timeout_secs: 0,
                error_backoff: Duration::from_millis(1),
                drop_pending_updates: false,
            },
        );
        *source.stop.lock().unwrap() = Some(listener.stop_handle());

        let cursor = listener.run().await;
        (cursor, channel, source.offsets())
    }

    #[tokio::test]
    async fn test_cursor_advances_past_every_event_even_on_failure() {
        // Event 6 is a poison event: a status press whose handling
        // fails (no such order). Events 5 and 7 are plain presses.
        let batch = vec![
            callback_update(5, 999, "noop"),
            callback_update(6, OPERATOR, "setstatus:1:preparing"),
            callback_update(7, 999, "noop"),
        ];
        let (cursor, channel, _) = run_scripted(vec![Ok(batch)]).await;

        assert_eq!(cursor, 8);
        // The poison event still produced its visible failure notice.
        let answers = channel.answers();
        assert_eq!(answers.len(), 1);
        assert!(answers[0].urgent);
    }

    #[tokio::test]
    async fn test_poll_failure_does_not_move_cursor() {
        let batches = vec![
            Err(BotApiError::Connection("boom".to_string())),
            Ok(vec![callback_update(3, 999, "noop")]),
        ];
        let (cursor, _, offsets) = run_scripted(batches).await;

        assert_eq!(cursor, 4);
        // The retry after the failure polled from the same offset.
        assert_eq!(offsets[..2], [0, 0]);
    }

    #[tokio::test]
    async fn test_stop_handle_stops_the_loop() {
        let (handler, _) = handler_with_channel().await;
        let source = ScriptedSource::new(Vec::new());
        let listener = UpdateListener::new(source.clone(), handler);
        let stop = listener.stop_handle();

        assert!(!stop.is_stopped());
        stop.stop();
        assert!(stop.is_stopped());

        // With the stop already requested, run returns without polling.
        listener.run().await;
        assert!(source.offsets().is_empty());
    }
}

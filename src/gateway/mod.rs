//! Gateway: the main event loop connecting the channel, the conversation
//! engine, the listing service, and the store.
//!
//! Includes: per-sender ordering, scheduler loops, the liveness API,
//! and graceful shutdown.

mod routing;
mod scheduler;

#[cfg(test)]
mod tests;

pub use scheduler::reset_day;

use crate::conversation::Conversations;
use crate::menu::Reply;
use daykeeper_core::{
    config::{ApiConfig, Config, ReadingConfig, SchedulerConfig},
    error::DaykeeperError,
    message::{IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use daykeeper_store::{HourMinute, Store};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The central gateway that routes user actions between the channel and
/// the store.
pub struct Gateway {
    pub(super) channel: Arc<dyn Channel>,
    pub(super) store: Store,
    pub(super) conversations: Conversations,
    pub(super) scheduler_config: SchedulerConfig,
    pub(super) api_config: ApiConfig,
    pub(super) reading_config: ReadingConfig,
    pub(super) language: String,
    pub(super) reset_time: HourMinute,
    /// Senders with a message in flight. Later messages queue here.
    pub(super) active_senders: Mutex<HashMap<String, Vec<IncomingMessage>>>,
}

impl Gateway {
    /// Create a new gateway.
    pub fn new(
        channel: Arc<dyn Channel>,
        store: Store,
        config: &Config,
    ) -> Result<Self, DaykeeperError> {
        let reset_time = config.scheduler.reset_time.parse().map_err(|e| {
            DaykeeperError::Config(format!(
                "invalid scheduler.reset_time '{}': {e}",
                config.scheduler.reset_time
            ))
        })?;
        Ok(Self {
            channel,
            store,
            conversations: Conversations::new(),
            scheduler_config: config.scheduler.clone(),
            api_config: config.api.clone(),
            reading_config: config.reading.clone(),
            language: config.daykeeper.language.clone(),
            reset_time,
            active_senders: Mutex::new(HashMap::new()),
        })
    }

    /// Run the main event loop.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Daykeeper gateway running | channel: {} | language: {} | scheduler: {}",
            self.channel.name(),
            self.language,
            if self.scheduler_config.enabled {
                "enabled"
            } else {
                "disabled"
            },
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel {}: {e}", self.channel.name()))?;
        info!("Channel started: {}", self.channel.name());

        let mut handles: Vec<JoinHandle<()>> = Vec::new();

        // Spawn scheduler loops.
        if self.scheduler_config.enabled {
            let sweep_store = self.store.clone();
            let sweep_channel = self.channel.clone();
            let sweep_config = self.scheduler_config.clone();
            let sweep_lang = self.language.clone();
            handles.push(tokio::spawn(async move {
                Self::sweep_loop(sweep_store, sweep_channel, sweep_config, sweep_lang).await;
            }));

            let reset_store = self.store.clone();
            let reset_at = self.reset_time;
            handles.push(tokio::spawn(async move {
                Self::reset_loop(reset_store, reset_at).await;
            }));
        }

        // Spawn HTTP API server.
        if self.api_config.enabled {
            let api_cfg = self.api_config.clone();
            handles.push(tokio::spawn(async move {
                crate::api::serve(api_cfg).await;
            }));
        }

        // Main event loop with graceful shutdown.
        loop {
            tokio::select! {
                incoming = rx.recv() => match incoming {
                    Some(incoming) => {
                        let gw = self.clone();
                        tokio::spawn(async move {
                            gw.dispatch_message(incoming).await;
                        });
                    }
                    None => {
                        warn!("channel closed, stopping gateway");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        self.shutdown(&handles).await;
        Ok(())
    }

    /// Dispatch a message: queue it if the sender is busy, otherwise process
    /// it and then drain the sender's queue in arrival order.
    pub(super) async fn dispatch_message(self: Arc<Self>, incoming: IncomingMessage) {
        let sender_key = format!("{}:{}", incoming.channel, incoming.sender_id);

        {
            let mut active = self.active_senders.lock().await;
            if let Some(queue) = active.get_mut(&sender_key) {
                queue.push(incoming);
                return;
            }
            active.insert(sender_key.clone(), Vec::new());
        }

        self.handle_message(incoming).await;

        loop {
            let next = {
                let mut active = self.active_senders.lock().await;
                match active.get_mut(&sender_key) {
                    Some(queue) if !queue.is_empty() => Some(queue.remove(0)),
                    _ => {
                        active.remove(&sender_key);
                        None
                    }
                }
            };

            match next {
                Some(queued) => self.handle_message(queued).await,
                None => break,
            }
        }
    }

    /// Graceful shutdown: stop background loops, then the channel.
    async fn shutdown(&self, handles: &[JoinHandle<()>]) {
        info!("Shutting down...");

        for h in handles {
            h.abort();
        }

        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel {}: {e}", self.channel.name());
        }

        info!("Shutdown complete.");
    }

    /// Send a reply back to the sender, optionally editing `edit` in place.
    pub(super) async fn send_reply(
        &self,
        incoming: &IncomingMessage,
        reply: Reply,
        edit: Option<i64>,
    ) {
        let msg: OutgoingMessage = reply
            .into_outgoing(incoming.reply_target.clone())
            .editing(edit);
        if let Err(e) = self.channel.send(msg).await {
            error!("{}: failed to send reply: {e}", incoming.sender_id);
        }
    }
}

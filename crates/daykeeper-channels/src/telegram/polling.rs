//! Long-polling update loop and Channel trait implementation.

use super::send;
use super::types::{TgResponse, TgUpdate};
use super::TelegramChannel;
use async_trait::async_trait;
use daykeeper_core::{
    error::DaykeeperError,
    message::{IncomingKind, IncomingMessage, OutgoingMessage},
    traits::Channel,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

#[async_trait]
impl Channel for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn start(&self) -> Result<mpsc::Receiver<IncomingMessage>, DaykeeperError> {
        self.register_commands().await;

        let (tx, rx) = mpsc::channel(64);
        let client = self.client.clone();
        let base_url = self.base_url.clone();
        let allowed_users = self.config.allowed_users.clone();
        let last_update_id = self.last_update_id.clone();

        info!("Telegram channel starting long polling...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let last = last_update_id.lock().await;
                let offset = last.map(|id| id + 1);
                drop(last);

                let mut url = format!(
                    "{base_url}/getUpdates?timeout=30&allowed_updates=[\"message\",\"callback_query\"]"
                );
                if let Some(off) = offset {
                    url.push_str(&format!("&offset={off}"));
                }

                let resp = match client
                    .get(&url)
                    .timeout(std::time::Duration::from_secs(35))
                    .send()
                    .await
                {
                    Ok(r) => r,
                    Err(e) => {
                        error!("telegram poll error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let body: TgResponse<Vec<TgUpdate>> = match resp.json().await {
                    Ok(b) => b,
                    Err(e) => {
                        error!("telegram parse error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                if !body.ok {
                    error!(
                        "telegram API error (retry in {backoff_secs}s): {}",
                        body.description.unwrap_or_default()
                    );
                    tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                    backoff_secs = (backoff_secs * 2).min(60);
                    continue;
                }

                backoff_secs = 1;

                let updates = body.result.unwrap_or_default();

                if let Some(last_update) = updates.last() {
                    *last_update_id.lock().await = Some(last_update.update_id);
                }

                for update in updates {
                    let Some(incoming) =
                        route_update(&client, &base_url, update, &allowed_users).await
                    else {
                        continue;
                    };
                    if tx.send(incoming).await.is_err() {
                        info!("telegram channel receiver dropped, stopping poll");
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), DaykeeperError> {
        let chat_id = parse_chat_id(message.reply_target.as_deref())?;
        self.send_message(chat_id, &message).await
    }

    async fn send_document(
        &self,
        target: &str,
        payload: Vec<u8>,
        filename: &str,
    ) -> Result<(), DaykeeperError> {
        let chat_id = parse_chat_id(Some(target))?;
        self.send_document_bytes(chat_id, payload, filename).await
    }

    async fn answer_callback(&self, query_id: &str) -> Result<(), DaykeeperError> {
        self.answer_callback_query(query_id).await
    }

    async fn stop(&self) -> Result<(), DaykeeperError> {
        info!("Telegram channel stopped");
        Ok(())
    }
}

fn parse_chat_id(target: Option<&str>) -> Result<i64, DaykeeperError> {
    let target =
        target.ok_or_else(|| DaykeeperError::Channel("no reply_target on outgoing message".into()))?;
    target.parse().map_err(|e| {
        DaykeeperError::Channel(format!("invalid telegram chat_id '{target}': {e}"))
    })
}

/// Convert an update, acknowledging any button press that gets dropped so
/// the client does not spin forever.
pub(crate) async fn route_update(
    client: &reqwest::Client,
    base_url: &str,
    update: TgUpdate,
    allowed_users: &[i64],
) -> Option<IncomingMessage> {
    let query_id = update.callback_query.as_ref().map(|cq| cq.id.clone());
    let incoming = to_incoming(update, allowed_users);
    if incoming.is_none() {
        if let Some(id) = query_id {
            debug!("telegram: acknowledging dropped callback {id}");
            if let Err(e) = send::answer_query(client, base_url, &id).await {
                warn!("{e}");
            }
        }
    }
    incoming
}

/// Convert a raw update into an incoming message, applying the auth and
/// private-chat filters. Returns `None` for anything the bot ignores.
pub(crate) fn to_incoming(update: TgUpdate, allowed_users: &[i64]) -> Option<IncomingMessage> {
    let (user, chat, kind) = if let Some(cq) = update.callback_query {
        let data = cq.data?;
        let (chat, message_id) = match cq.message {
            Some(m) => (Some(m.chat), Some(m.message_id)),
            None => (None, None),
        };
        (
            cq.from,
            chat,
            IncomingKind::Callback {
                data,
                query_id: cq.id,
                message_id,
            },
        )
    } else {
        let msg = update.message?;
        let text = msg.text?;
        (msg.from?, Some(msg.chat), IncomingKind::Text { text })
    };

    if !allowed_users.is_empty() && !allowed_users.contains(&user.id) {
        warn!("ignoring update from unauthorized user {}", user.id);
        return None;
    }

    if let Some(ref chat) = chat {
        if chat.is_group() {
            debug!("telegram: ignoring group update from chat {}", chat.id);
            return None;
        }
    }

    let reply_target = chat.map(|c| c.id).unwrap_or(user.id);

    Some(IncomingMessage {
        id: Uuid::new_v4(),
        channel: "telegram".to_string(),
        sender_id: user.id.to_string(),
        sender_name: Some(user.display_name()),
        kind,
        timestamp: chrono::Utc::now(),
        reply_target: Some(reply_target.to_string()),
    })
}

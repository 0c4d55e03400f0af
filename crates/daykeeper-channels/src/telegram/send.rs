//! Outbound calls: text with keyboards, in-place edits, documents,
//! callback acknowledgements, and command registration.

use super::{TelegramChannel, MAX_MESSAGE_LEN};
use crate::utils::split_message;
use daykeeper_core::{
    error::DaykeeperError,
    message::{Keyboard, OutgoingMessage},
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Build the `reply_markup` object for a keyboard.
pub(crate) fn reply_markup(keyboard: &Keyboard) -> Value {
    match keyboard {
        Keyboard::Menu { rows } => {
            let rows: Vec<Vec<Value>> = rows
                .iter()
                .map(|row| row.iter().map(|label| json!({ "text": label })).collect())
                .collect();
            json!({ "keyboard": rows, "resize_keyboard": true })
        }
        Keyboard::Inline { rows } => {
            let rows: Vec<Vec<Value>> = rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|b| json!({ "text": b.label, "callback_data": b.data }))
                        .collect()
                })
                .collect();
            json!({ "inline_keyboard": rows })
        }
        Keyboard::Remove => json!({ "remove_keyboard": true }),
    }
}

/// Telegram answers an edit with identical content with an error; the
/// message already shows what we wanted.
pub(crate) fn is_not_modified(error_text: &str) -> bool {
    error_text.contains("message is not modified")
}

impl TelegramChannel {
    /// Deliver an outgoing message, editing in place when requested.
    pub(crate) async fn send_message(
        &self,
        chat_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), DaykeeperError> {
        // Reply keyboards cannot be attached to an edited message.
        let editable = !matches!(
            message.keyboard,
            Some(Keyboard::Menu { .. }) | Some(Keyboard::Remove)
        );
        if let (Some(message_id), true) = (message.edit_message_id, editable) {
            match self.edit_text(chat_id, message_id, message).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    debug!("telegram edit failed, sending new message: {e}");
                }
            }
        }
        self.send_text(chat_id, &message.text, message.keyboard.as_ref())
            .await
    }

    /// Send a text message, splitting long text. The keyboard rides on the
    /// last chunk.
    pub(crate) async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), DaykeeperError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let last = chunks.len().saturating_sub(1);

        for (i, chunk) in chunks.into_iter().enumerate() {
            let mut body = json!({
                "chat_id": chat_id,
                "text": chunk,
            });
            if let (Some(kb), true) = (keyboard, i == last) {
                body["reply_markup"] = reply_markup(kb);
            }

            let resp = self
                .client
                .post(format!("{}/sendMessage", self.base_url))
                .json(&body)
                .send()
                .await
                .map_err(|e| DaykeeperError::Channel(format!("telegram send failed: {e}")))?;

            let status = resp.status();
            if !status.is_success() {
                let error_text = resp.text().await.unwrap_or_default();
                return Err(DaykeeperError::Channel(format!(
                    "telegram send failed ({status}): {error_text}"
                )));
            }
        }

        Ok(())
    }

    /// Replace the text and inline keyboard of an existing message.
    pub(crate) async fn edit_text(
        &self,
        chat_id: i64,
        message_id: i64,
        message: &OutgoingMessage,
    ) -> Result<(), DaykeeperError> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": message.text,
        });
        if let Some(kb @ Keyboard::Inline { .. }) = message.keyboard.as_ref() {
            body["reply_markup"] = reply_markup(kb);
        }

        let resp = self
            .client
            .post(format!("{}/editMessageText", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| DaykeeperError::Channel(format!("telegram edit failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let error_text = resp.text().await.unwrap_or_default();
        if is_not_modified(&error_text) {
            return Ok(());
        }
        Err(DaykeeperError::Channel(format!(
            "telegram edit failed ({status}): {error_text}"
        )))
    }

    /// Upload a file as a document.
    pub(crate) async fn send_document_bytes(
        &self,
        chat_id: i64,
        payload: Vec<u8>,
        filename: &str,
    ) -> Result<(), DaykeeperError> {
        let part = reqwest::multipart::Part::bytes(payload)
            .file_name(filename.to_string())
            .mime_str("application/octet-stream")
            .map_err(|e| DaykeeperError::Channel(format!("mime error: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", part);

        let resp = self
            .client
            .post(format!("{}/sendDocument", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| DaykeeperError::Channel(format!("telegram sendDocument failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            return Err(DaykeeperError::Channel(format!(
                "telegram sendDocument failed ({status}): {error_text}"
            )));
        }

        Ok(())
    }

    pub(crate) async fn answer_callback_query(&self, query_id: &str) -> Result<(), DaykeeperError> {
        answer_query(&self.client, &self.base_url, query_id).await
    }

    /// Register bot commands with Telegram so users see an autocomplete menu.
    /// Best-effort: logs failures but does not propagate errors.
    pub(crate) async fn register_commands(&self) {
        let commands = json!({
            "commands": [
                { "command": "start", "description": "Show the main menu" },
                { "command": "cancel", "description": "Cancel the current question" },
            ]
        });

        let url = format!("{}/setMyCommands", self.base_url);
        match self.client.post(&url).json(&commands).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("registered Telegram bot commands");
            }
            Ok(resp) => {
                let body = resp.text().await.unwrap_or_default();
                warn!("failed to register Telegram bot commands: {body}");
            }
            Err(e) => {
                warn!("failed to register Telegram bot commands: {e}");
            }
        }
    }
}

/// Stop the client's spinner on a pressed button.
pub(crate) async fn answer_query(
    client: &reqwest::Client,
    base_url: &str,
    query_id: &str,
) -> Result<(), DaykeeperError> {
    let body = json!({ "callback_query_id": query_id });
    let resp = client
        .post(format!("{base_url}/answerCallbackQuery"))
        .json(&body)
        .send()
        .await
        .map_err(|e| DaykeeperError::Channel(format!("telegram answerCallbackQuery failed: {e}")))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let error_text = resp.text().await.unwrap_or_default();
        return Err(DaykeeperError::Channel(format!(
            "telegram answerCallbackQuery failed ({status}): {error_text}"
        )));
    }

    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An incoming user action from a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Channel name (e.g. "telegram").
    pub channel: String,
    /// Platform-specific user ID. Every stored collection is keyed by it.
    pub sender_id: String,
    /// Human-readable sender name.
    pub sender_name: Option<String>,
    pub kind: IncomingKind,
    pub timestamp: DateTime<Utc>,
    /// Platform-specific target for routing the response (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
}

/// What the user did: typed a message or pressed an inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IncomingKind {
    Text {
        text: String,
    },
    Callback {
        /// Opaque token attached to the pressed button.
        data: String,
        /// Platform id of the callback, used to acknowledge the press.
        query_id: String,
        /// Message the button belongs to, if the platform reports it.
        message_id: Option<i64>,
    },
}

/// An outgoing message to send back through a channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Quick actions rendered with the message.
    #[serde(default)]
    pub keyboard: Option<Keyboard>,
    /// Platform-specific target for routing (e.g. Telegram chat_id).
    #[serde(default)]
    pub reply_target: Option<String>,
    /// Message to edit in place instead of sending a new one.
    #[serde(default)]
    pub edit_message_id: Option<i64>,
}

impl OutgoingMessage {
    pub fn new(text: impl Into<String>, reply_target: Option<String>) -> Self {
        Self {
            text: text.into(),
            reply_target,
            ..Default::default()
        }
    }

    pub fn editing(mut self, message_id: Option<i64>) -> Self {
        self.edit_message_id = message_id;
        self
    }
}

/// Quick actions attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Keyboard {
    /// Persistent reply keyboard; each label is sent back as plain text.
    Menu { rows: Vec<Vec<String>> },
    /// Buttons attached to the message; each carries a callback token.
    Inline { rows: Vec<Vec<InlineButton>> },
    /// Hide any reply keyboard currently shown.
    Remove,
}

/// A single inline button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub label: String,
    pub data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            data: data.into(),
        }
    }
}

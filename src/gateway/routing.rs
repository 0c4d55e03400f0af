//! Routing of text and button presses to the conversation engine and the
//! listing service.

use super::Gateway;
use crate::callback::Callback;
use crate::conversation::Flow;
use crate::i18n::t;
use crate::listing::{events, overview, reminders, tasks};
use crate::menu::{self, is_cancel, MenuAction, Reply};
use chrono::{Local, NaiveDate};
use daykeeper_core::message::{IncomingKind, IncomingMessage};
use tracing::{error, info, warn};

/// Built-in slash commands.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
}

impl Command {
    /// Parse a command from message text. Returns `None` for unknown `/` prefixes.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/start@daykeeper_bot" → "/start").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

impl Gateway {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Process one user action end to end.
    pub(super) async fn handle_message(&self, incoming: IncomingMessage) {
        match &incoming.kind {
            IncomingKind::Text { text } => self.handle_text(&incoming, text).await,
            IncomingKind::Callback {
                data,
                query_id,
                message_id,
            } => {
                if let Err(e) = self.channel.answer_callback(query_id).await {
                    warn!("{}: failed to answer callback: {e}", incoming.sender_id);
                }
                self.handle_callback(&incoming, data, *message_id).await;
            }
        }
    }

    async fn handle_text(&self, incoming: &IncomingMessage, text: &str) {
        let user = incoming.sender_id.as_str();
        let lang = self.language.as_str();

        if is_cancel(text, lang) {
            let reply = self.conversations.cancel(user, lang).await;
            self.send_reply(incoming, reply, None).await;
            return;
        }

        // Commands and menu labels always leave the current flow.
        if text.trim_start().starts_with('/') {
            self.conversations.discard(user).await;
            let reply = match Command::parse(text) {
                Some(Command::Start | Command::Help) => Reply::with_menu(t("welcome", lang), lang),
                None => Reply::with_menu(t("unknown_input", lang), lang),
            };
            self.send_reply(incoming, reply, None).await;
            return;
        }

        if let Some(action) = MenuAction::parse(text, lang) {
            self.conversations.discard(user).await;
            self.handle_menu(incoming, action).await;
            return;
        }

        let today = self.today();
        let reply = match self
            .conversations
            .handle(&self.store, user, text, today, lang)
            .await
        {
            Some(reply) => reply,
            None => Reply::with_menu(t("unknown_input", lang), lang),
        };
        self.send_reply(incoming, reply, None).await;
    }

    async fn handle_menu(&self, incoming: &IncomingMessage, action: MenuAction) {
        let user = incoming.sender_id.as_str();
        let lang = self.language.as_str();
        let today = self.today();

        let reply = match action {
            MenuAction::AddTask => self.conversations.start(user, Flow::Task, lang).await,
            MenuAction::AddReminder => self.conversations.start(user, Flow::Reminder, lang).await,
            MenuAction::AddBirthday => self.conversations.start(user, Flow::Birthday, lang).await,
            MenuAction::AddEvent => self.conversations.start(user, Flow::Event, lang).await,
            MenuAction::Tasks => tasks::show(&self.store, user, today, lang).await,
            MenuAction::Reminders => reminders::show(&self.store, user, lang).await,
            MenuAction::EventList => events::show(&self.store, user, today, lang).await,
            MenuAction::MyDay => overview::my_day(&self.store, user, today, lang).await,
            MenuAction::MyMonth => overview::my_month(&self.store, user, today, lang).await,
            MenuAction::Events => Reply::new(t("events_menu", lang), Some(menu::events_menu(lang))),
            MenuAction::Read => {
                let target = incoming.reply_target.as_deref().unwrap_or(user);
                match crate::reading::send_random(
                    self.channel.as_ref(),
                    target,
                    &self.reading_config,
                    lang,
                )
                .await
                {
                    Some(notice) => notice,
                    None => return,
                }
            }
        };
        self.send_reply(incoming, reply, None).await;
    }

    async fn handle_callback(&self, incoming: &IncomingMessage, data: &str, message_id: Option<i64>) {
        let user = incoming.sender_id.as_str();
        let lang = self.language.as_str();

        // A button press is an out-of-flow action.
        self.conversations.discard(user).await;

        let callback: Callback = match data.parse() {
            Ok(cb) => cb,
            Err(e) => {
                warn!("{user}: rejected callback: {e}");
                self.send_reply(incoming, Reply::with_menu(t("back_to_menu", lang), lang), None)
                    .await;
                return;
            }
        };

        let today = self.today();
        let applied = match callback {
            Callback::Task {
                bucket,
                action,
                index,
            } => tasks::apply(&self.store, user, bucket, action, index, today).await,
            Callback::Reminder { action, id } => {
                reminders::apply(&self.store, user, action, id).await
            }
            Callback::DeleteEvent(target) => events::delete(&self.store, user, target).await,
        };

        match applied {
            Ok(true) => info!("{user}: applied {}", callback.encode()),
            Ok(false) => info!("{user}: {} resolved to nothing, re-rendering", callback.encode()),
            Err(e) => {
                error!("{user}: {} failed: {e}", callback.encode());
                self.send_reply(incoming, Reply::with_menu(t("action_failed", lang), lang), None)
                    .await;
                return;
            }
        }

        let view = match callback {
            Callback::Task { .. } => tasks::show(&self.store, user, today, lang).await,
            Callback::Reminder { .. } => reminders::show(&self.store, user, lang).await,
            Callback::DeleteEvent(_) => events::show(&self.store, user, today, lang).await,
        };
        self.respond_in_place(incoming, message_id, view).await;
    }

    /// Re-render a list in the message whose button was pressed.
    ///
    /// A reply keyboard cannot ride on an edit, so a degraded view updates
    /// the text in place and brings the main menu back in a new message.
    async fn respond_in_place(&self, incoming: &IncomingMessage, message_id: Option<i64>, view: Reply) {
        let lang = self.language.as_str();
        if view.is_interactive() || message_id.is_none() {
            self.send_reply(incoming, view, message_id).await;
            return;
        }
        self.send_reply(incoming, Reply::new(view.text, None), message_id)
            .await;
        self.send_reply(incoming, Reply::with_menu(t("back_to_menu", lang), lang), None)
            .await;
    }
}

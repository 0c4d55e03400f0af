//! Inline-button payloads.
//!
//! Every button carries a versioned token decoded once at the transport
//! boundary. Anything unrecognized is rejected with [`CallbackError`].

use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const VERSION: &str = "v1";

/// Display partition of a task or reminder list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Today,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Done,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderAction {
    Stop,
    Start,
    Delete,
}

/// Position of a record inside its own source collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventRef {
    Birthday(usize),
    Event(usize),
}

/// A decoded button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Callback {
    Task {
        bucket: Bucket,
        action: TaskAction,
        index: usize,
    },
    Reminder {
        action: ReminderAction,
        id: Uuid,
    },
    DeleteEvent(EventRef),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error("unsupported callback version in '{0}'")]
    Version(String),
    #[error("unknown callback token '{0}'")]
    Unknown(String),
    #[error("malformed callback token '{0}'")]
    Malformed(String),
}

impl Bucket {
    fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Other => "other",
        }
    }
}

impl TaskAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::Delete => "del",
        }
    }
}

impl ReminderAction {
    fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Start => "start",
            Self::Delete => "del",
        }
    }
}

impl fmt::Display for EventRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Birthday(i) => write!(f, "b{i}"),
            Self::Event(i) => write!(f, "e{i}"),
        }
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Task {
                bucket,
                action,
                index,
            } => write!(
                f,
                "{VERSION}:task:{}:{}:{index}",
                bucket.as_str(),
                action.as_str()
            ),
            Self::Reminder { action, id } => {
                write!(f, "{VERSION}:rem:{}:{id}", action.as_str())
            }
            Self::DeleteEvent(r) => write!(f, "{VERSION}:ev:del:{r}"),
        }
    }
}

impl Callback {
    /// Token to attach to an inline button.
    pub fn encode(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Callback {
    type Err = CallbackError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let unknown = || CallbackError::Unknown(token.to_string());
        let malformed = || CallbackError::Malformed(token.to_string());

        let parts: Vec<&str> = token.split(':').collect();
        if parts.first() != Some(&VERSION) {
            return Err(CallbackError::Version(token.to_string()));
        }

        match parts[1..] {
            ["task", bucket, action, index] => {
                let bucket = match bucket {
                    "today" => Bucket::Today,
                    "other" => Bucket::Other,
                    _ => return Err(unknown()),
                };
                let action = match action {
                    "done" => TaskAction::Done,
                    "del" => TaskAction::Delete,
                    _ => return Err(unknown()),
                };
                let index = index.parse().map_err(|_| malformed())?;
                Ok(Self::Task {
                    bucket,
                    action,
                    index,
                })
            }
            ["rem", action, id] => {
                let action = match action {
                    "stop" => ReminderAction::Stop,
                    "start" => ReminderAction::Start,
                    "del" => ReminderAction::Delete,
                    _ => return Err(unknown()),
                };
                let id = Uuid::parse_str(id).map_err(|_| malformed())?;
                Ok(Self::Reminder { action, id })
            }
            ["ev", "del", target] => {
                let mut chars = target.chars();
                let tag = chars.next();
                let index: usize = chars.as_str().parse().map_err(|_| malformed())?;
                match tag {
                    Some('b') => Ok(Self::DeleteEvent(EventRef::Birthday(index))),
                    Some('e') => Ok(Self::DeleteEvent(EventRef::Event(index))),
                    _ => Err(unknown()),
                }
            }
            _ => Err(unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_token() {
        let cb = Callback::Task {
            bucket: Bucket::Today,
            action: TaskAction::Done,
            index: 3,
        };
        assert_eq!(cb.encode(), "v1:task:today:done:3");
        assert_eq!("v1:task:other:del:0".parse::<Callback>().unwrap(), Callback::Task {
            bucket: Bucket::Other,
            action: TaskAction::Delete,
            index: 0,
        });
    }

    #[test]
    fn test_reminder_token_fits_telegram_limit() {
        let id = Uuid::new_v4();
        let token = Callback::Reminder {
            action: ReminderAction::Start,
            id,
        }
        .encode();
        assert!(token.len() <= 64, "{token} is {} bytes", token.len());
        assert_eq!(
            token.parse::<Callback>().unwrap(),
            Callback::Reminder {
                action: ReminderAction::Start,
                id
            }
        );
    }

    #[test]
    fn test_event_token() {
        assert_eq!(
            "v1:ev:del:b12".parse::<Callback>().unwrap(),
            Callback::DeleteEvent(EventRef::Birthday(12))
        );
        assert_eq!(
            Callback::DeleteEvent(EventRef::Event(4)).encode(),
            "v1:ev:del:e4"
        );
    }

    #[test]
    fn test_rejects_legacy_and_garbage() {
        assert!(matches!(
            "task:today:done:0".parse::<Callback>(),
            Err(CallbackError::Version(_))
        ));
        assert!(matches!(
            "del_b0".parse::<Callback>(),
            Err(CallbackError::Version(_))
        ));
        assert!(matches!("".parse::<Callback>(), Err(CallbackError::Version(_))));
        assert!(matches!(
            "v1:task:tomorrow:done:0".parse::<Callback>(),
            Err(CallbackError::Unknown(_))
        ));
        assert!(matches!(
            "v1:task:today:done:x".parse::<Callback>(),
            Err(CallbackError::Malformed(_))
        ));
        assert!(matches!(
            "v1:task:today:done:-1".parse::<Callback>(),
            Err(CallbackError::Malformed(_))
        ));
        assert!(matches!(
            "v1:rem:stop:not-a-uuid".parse::<Callback>(),
            Err(CallbackError::Malformed(_))
        ));
        assert!(matches!(
            "v1:ev:del:x1".parse::<Callback>(),
            Err(CallbackError::Unknown(_))
        ));
        assert!(matches!(
            "v1:ev:del:".parse::<Callback>(),
            Err(CallbackError::Malformed(_))
        ));
        assert!(matches!(
            "v1:ev:del:b".parse::<Callback>(),
            Err(CallbackError::Malformed(_))
        ));
        assert!(matches!("v1".parse::<Callback>(), Err(CallbackError::Unknown(_))));
    }
}

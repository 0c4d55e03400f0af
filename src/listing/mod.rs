//! Listing and mutation service.
//!
//! Builds the numbered views shown to the user and resolves a pressed
//! button back to the record it refers to. Every mutation is resolved
//! against the collection as it is now, under the collection lock. A
//! reference that no longer resolves is a no-op and the caller simply
//! re-renders.

pub mod events;
pub mod overview;
pub mod reminders;
pub mod tasks;


use crate::callback::Bucket;
use daykeeper_core::message::InlineButton;

/// Inline button carrying an encoded callback.
fn button(label: impl Into<String>, callback: &crate::callback::Callback) -> InlineButton {
    InlineButton::new(label, callback.encode())
}

impl Bucket {
    /// Index of this bucket in a `[today, other]` pair.
    fn slot(self) -> usize {
        match self {
            Self::Today => 0,
            Self::Other => 1,
        }
    }
}

use crate::{
    error::DaykeeperError,
    message::{IncomingMessage, OutgoingMessage},
};
use async_trait::async_trait;

/// Messaging channel trait: the transport adapter.
///
/// Every messaging platform implements this trait to receive user actions
/// and deliver responses, notifications, and files.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming messages.
    /// Returns a receiver that yields incoming messages.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>, DaykeeperError>;

    /// Send a response back through this channel.
    async fn send(&self, message: OutgoingMessage) -> Result<(), DaykeeperError>;

    /// Deliver a binary file under the given filename.
    async fn send_document(
        &self,
        target: &str,
        payload: Vec<u8>,
        filename: &str,
    ) -> Result<(), DaykeeperError>;

    /// Acknowledge a button press so the client stops its spinner.
    async fn answer_callback(&self, _query_id: &str) -> Result<(), DaykeeperError> {
        Ok(())
    }

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), DaykeeperError>;
}

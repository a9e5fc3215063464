//! Notifier trait for delivering messages to the chat

use async_trait::async_trait;

/// Delivers text messages to one fixed recipient.
///
/// Implementations must report every failed delivery as an error; the engine
/// relies on that to avoid treating an unsent message as already notified.
#[async_trait]
pub trait Notifier: Send + Sync + std::fmt::Debug {
    /// Get the notifier type name (e.g. "telegram")
    fn type_name(&self) -> &str;

    /// Send a message
    async fn notify(&self, message: &str) -> crate::Result<()>;
}

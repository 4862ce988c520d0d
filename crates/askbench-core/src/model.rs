use async_trait::async_trait;

use crate::error::Result;
use crate::message::Message;

/// Trait for chat language models.
///
/// Implementations handle API communication, request formatting, and
/// response parsing for a specific provider. One call is exactly one
/// logical exchange; no session state is retained between calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the messages and return the assistant's response text.
    async fn generate(&self, messages: &[Message]) -> Result<String>;

    /// Return the model name/identifier.
    fn model_name(&self) -> &str;
}

//! Model gateway seam: text prompt in, generated text out.
//!
//! The quiz session only depends on this trait. The production implementation
//! is the OpenAI-compatible client in `openai.rs`; tests plug in scripted ones.

use async_trait::async_trait;

use crate::errors::GatewayError;

#[async_trait]
pub trait ModelGateway: Send + Sync {
  async fn generate(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// Gateway used when no provider is configured. Always fails, so the session
/// stays in `AwaitingTopic` and the user sees why.
pub struct Unconfigured;

#[async_trait]
impl ModelGateway for Unconfigured {
  async fn generate(&self, _prompt: &str) -> Result<String, GatewayError> {
    Err(GatewayError::NotConfigured)
  }
}

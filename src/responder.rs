use async_trait::async_trait;

use crate::error::Result;

/// Produces this agent's reply to an incoming utterance. Implementations may
/// call a model or another agent behind this seam.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, text: &str) -> Result<String>;
}

/// Reference behavior: echo the question back.
pub struct EchoResponder;

#[async_trait]
impl Responder for EchoResponder {
    async fn respond(&self, text: &str) -> Result<String> {
        Ok(format!("You said - {text}"))
    }
}

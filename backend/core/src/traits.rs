use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::TruthLensError;
use crate::message::Envelope;

/// Trait for long-running TruthLens components (the coordinator).
///
/// Each component consumes envelopes from its channel and runs in its own Tokio task.
#[async_trait]
pub trait Component: Send + Sync + 'static {
    /// Human-readable name of this component.
    fn name(&self) -> &str;

    /// Start the component's event loop, consuming from the given receiver.
    async fn start(&self, rx: mpsc::Receiver<Envelope>) -> Result<()>;
}

/// Trait for text-classification LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g., "openai", "mock").
    fn name(&self) -> &str;

    /// Send a completion request and return the reply text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, TruthLensError>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}

/// Trait for remote OCR services.
#[async_trait]
pub trait OcrProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Recognize text in an image data URL. Returns the raw text, which may be empty.
    async fn recognize(&self, image_data: &str) -> Result<String, TruthLensError>;
}

/// The platform's visible-tab screenshot primitive.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    /// Capture the visible area of the given window as a PNG data URL.
    async fn capture_visible_tab(&self, window_id: u32) -> Result<String, TruthLensError>;
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use truthlens_core::{LlmProvider, LlmRequest, LlmResponse, TruthLensError};

type Responder = dyn Fn(&LlmRequest) -> Result<String, TruthLensError> + Send + Sync;

/// A mock LLM provider that returns canned replies and counts calls.
pub struct MockProvider {
    name: String,
    responder: Box<Responder>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responder: Box::new(|_| {
                Ok("1. VERDICT: Real\n2. CONFIDENCE SCORE: 50%\n3. ANALYSIS: Mock response".into())
            }),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        let response = response.into();
        self.responder = Box::new(move |_| Ok(response.clone()));
        self
    }

    /// Reply with an HTTP-status error, as a failing remote API would.
    pub fn with_status_error(mut self, status: u16) -> Self {
        self.responder = Box::new(move |_| Err(TruthLensError::from_status(status, "mock failure")));
        self
    }

    /// Compute the reply from the request.
    pub fn with_responder<F>(mut self, f: F) -> Self
    where
        F: Fn(&LlmRequest) -> Result<String, TruthLensError> + Send + Sync + 'static,
    {
        self.responder = Box::new(f);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Shared call counter, readable after the provider is moved into a classifier.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, req: &LlmRequest) -> Result<LlmResponse, TruthLensError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let content = (self.responder)(req)?;
        Ok(LlmResponse {
            content,
            provider: self.name.clone(),
            model: "mock".to_string(),
            latency_ms: 0,
        })
    }
}

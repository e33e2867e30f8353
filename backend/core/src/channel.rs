use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info};

use crate::error::TruthLensError;
use crate::message::{Envelope, Message, Reply};
use crate::types::{AnalysisResult, CaptureRequest, ImageAnalysis, Origin};

/// Default channel buffer size for inter-context messaging.
const DEFAULT_BUFFER_SIZE: usize = 256;

/// Capacity of the relay broadcast channel.
const RELAY_CAPACITY: usize = 64;

/// The message bus connecting the page, panel, and coordinator contexts.
///
/// Requests flow to the coordinator over a bounded mpsc channel; relayed
/// messages fan out to every listening context over a broadcast channel.
pub struct MessageBus {
    pub coordinator_tx: mpsc::Sender<Envelope>,
    coordinator_rx: Option<mpsc::Receiver<Envelope>>,
    relay_tx: broadcast::Sender<Message>,
}

impl MessageBus {
    /// Create a new bus with default buffer sizes.
    pub fn new() -> Self {
        Self::with_buffer_size(DEFAULT_BUFFER_SIZE)
    }

    /// Create a new bus with a custom buffer size.
    pub fn with_buffer_size(buffer: usize) -> Self {
        let (coordinator_tx, coordinator_rx) = mpsc::channel(buffer);
        let (relay_tx, _) = broadcast::channel(RELAY_CAPACITY);

        info!(buffer_size = buffer, "MessageBus initialized");

        Self {
            coordinator_tx,
            coordinator_rx: Some(coordinator_rx),
            relay_tx,
        }
    }

    /// Take the coordinator receiver (can only be called once).
    pub fn take_coordinator_rx(&mut self) -> Option<mpsc::Receiver<Envelope>> {
        debug!("Coordinator receiver taken");
        self.coordinator_rx.take()
    }

    /// Sender half of the relay channel, handed to the coordinator.
    pub fn relay_sender(&self) -> broadcast::Sender<Message> {
        self.relay_tx.clone()
    }

    /// Listen for relayed messages.
    pub fn subscribe(&self) -> broadcast::Receiver<Message> {
        self.relay_tx.subscribe()
    }

    /// A request client speaking for the given context.
    pub fn client(&self, origin: Origin) -> RuntimeClient {
        RuntimeClient::new(origin, self.coordinator_tx.clone())
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Future-returning wrapper over the raw coordinator channel.
///
/// Every call settles exactly once: with the coordinator's reply, or with
/// [`TruthLensError::NoListener`] when the channel or reply slot is dropped.
#[derive(Debug, Clone)]
pub struct RuntimeClient {
    origin: Origin,
    tx: mpsc::Sender<Envelope>,
}

impl RuntimeClient {
    pub fn new(origin: Origin, tx: mpsc::Sender<Envelope>) -> Self {
        Self { origin, tx }
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Send a message and wait for its reply.
    pub async fn send_message(&self, message: Message) -> Result<Reply, TruthLensError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        debug!(
            action = message.action(),
            origin = self.origin.label(),
            bytes = message.payload_len(),
            "Sending message"
        );
        self.tx
            .send(Envelope {
                origin: self.origin.clone(),
                message,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| TruthLensError::NoListener)?;
        reply_rx.await.map_err(|_| TruthLensError::NoListener)
    }

    pub async fn analyze_text(&self, text: &str) -> Result<AnalysisResult, TruthLensError> {
        match self
            .send_message(Message::AnalyzeText {
                text: text.to_string(),
            })
            .await?
        {
            Reply::Analysis(result) => Ok(result),
            Reply::Error { error } => Err(TruthLensError::Remote(error)),
            _ => Err(TruthLensError::NoResponse("analysis service")),
        }
    }

    pub async fn analyze_image(&self, image_data: &str) -> Result<ImageAnalysis, TruthLensError> {
        match self
            .send_message(Message::AnalyzeImage {
                image_data: image_data.to_string(),
            })
            .await?
        {
            Reply::Image(result) => Ok(result),
            Reply::Error { error } => Err(TruthLensError::Remote(error)),
            _ => Err(TruthLensError::NoResponse("OCR service")),
        }
    }

    /// Ask the coordinator for a screenshot of this context's viewport.
    pub async fn capture_visible_tab(&self) -> Result<String, TruthLensError> {
        match self.send_message(Message::Capture).await? {
            Reply::Screenshot(data_url) if !data_url.is_empty() => Ok(data_url),
            Reply::Error { error } => Err(TruthLensError::Capture(error)),
            _ => Err(TruthLensError::NoResponse("screenshot service")),
        }
    }

    /// Hand a finished capture to the coordinator.
    pub async fn submit_capture(&self, request: CaptureRequest) -> Result<(), TruthLensError> {
        match self.send_message(request.into()).await? {
            Reply::Received { .. } => Ok(()),
            Reply::Error { error } => Err(TruthLensError::Remote(error)),
            _ => Err(TruthLensError::NoResponse("coordinator")),
        }
    }
}

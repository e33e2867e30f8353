use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use truthlens_classifier::Classifier;
use truthlens_core::{
    AnalysisResult, Component, Envelope, ImageAnalysis, Message, OcrProvider, Origin, Reply,
    ResultSlot, ScreenCapture, TruthLensError,
};
use truthlens_logging::{AnalysisEvent, EventLogger};

struct Inner {
    screens: Arc<dyn ScreenCapture>,
    ocr: Arc<dyn OcrProvider>,
    classifier: Classifier,
    relay_tx: broadcast::Sender<Message>,
    results: ResultSlot,
}

/// The Coordinator receives protocol messages from the page and panel
/// contexts, calls the remote services, and replies to the requester.
///
/// It holds no per-request state. Each envelope is handled on its own task,
/// so a slow classification never delays an unrelated request.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

impl Coordinator {
    pub fn new(
        screens: Arc<dyn ScreenCapture>,
        ocr: Arc<dyn OcrProvider>,
        classifier: Classifier,
        relay_tx: broadcast::Sender<Message>,
    ) -> Self {
        Self::with_result_slot(screens, ocr, classifier, relay_tx, ResultSlot::new())
    }

    /// Like [`Coordinator::new`], writing successful results into a shared slot.
    pub fn with_result_slot(
        screens: Arc<dyn ScreenCapture>,
        ocr: Arc<dyn OcrProvider>,
        classifier: Classifier,
        relay_tx: broadcast::Sender<Message>,
        results: ResultSlot,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                screens,
                ocr,
                classifier,
                relay_tx,
                results,
            }),
        }
    }

    pub fn results(&self) -> &ResultSlot {
        &self.inner.results
    }

    pub fn ocr_provider(&self) -> &str {
        self.inner.ocr.name()
    }

    pub fn classifier(&self) -> &Classifier {
        &self.inner.classifier
    }

    /// Screenshot the visible area of `window_id`. No retry.
    pub async fn capture_visible_viewport(&self, window_id: u32) -> Result<String, TruthLensError> {
        debug!(window_id, "Capturing visible viewport");
        self.inner.screens.capture_visible_tab(window_id).await
    }

    /// Classify text and record the result in the latest-result slot.
    pub async fn classify_text(&self, text: &str) -> Result<AnalysisResult, TruthLensError> {
        let result = self.inner.classifier.classify_text(text).await?;
        self.inner.results.store(result.clone(), None).await;
        Ok(result)
    }

    /// Classify text and return the reply unparsed. Does not touch the slot.
    pub async fn classify_raw(&self, text: &str) -> Result<String, TruthLensError> {
        self.inner.classifier.classify_raw(text).await
    }

    /// OCR an image data URL. Fails with `NoTextFound` on fewer than three characters.
    pub async fn extract_text(&self, image_data: &str) -> Result<String, TruthLensError> {
        truthlens_understanding::extract_text(self.inner.ocr.as_ref(), image_data).await
    }

    /// OCR an image data URL and return the trimmed text, which may be empty.
    pub async fn recognize(&self, image_data: &str) -> Result<String, TruthLensError> {
        let raw = self.inner.ocr.recognize(image_data).await?;
        Ok(raw.trim().to_string())
    }

    /// OCR then classify. A failed OCR step means no classification call.
    pub async fn classify_image(&self, image_data: &str) -> Result<ImageAnalysis, TruthLensError> {
        let extracted = self.extract_text(image_data).await?;
        let result = self.inner.classifier.classify_text(&extracted).await?;
        self.inner
            .results
            .store(result.clone(), Some(extracted.clone()))
            .await;
        Ok(ImageAnalysis::new(extracted, result))
    }

    /// Forward a message one hop to every listening context.
    pub fn relay(&self, message: Message) {
        let action = message.action();
        match self.inner.relay_tx.send(message) {
            Ok(listeners) => debug!(action, listeners, "Relayed message"),
            Err(_) => warn!(action, "No listener for relayed message"),
        }
    }

    /// Route one message and produce its reply. Every failure becomes `Reply::Error`.
    pub async fn handle(&self, origin: &Origin, message: &Message) -> Reply {
        let request_id = Uuid::new_v4().to_string();
        let action = message.action();
        EventLogger::log_event(
            &request_id,
            AnalysisEvent::Request {
                action: action.to_string(),
                origin: origin.label().to_string(),
                payload_bytes: message.payload_len(),
            },
        );
        let started = Instant::now();

        let reply = match message {
            Message::Capture => match origin.tab() {
                // The client re-wraps capture errors, so reply with the bare reason.
                Some(tab) => match self.capture_visible_viewport(tab.window_id).await {
                    Ok(data_url) => Reply::Screenshot(data_url),
                    Err(TruthLensError::Capture(reason)) => Reply::error(reason),
                    Err(e) => Reply::error(e),
                },
                None => Reply::error("capture requires a page context"),
            },
            Message::AnalyzeText { .. } if matches!(origin, Origin::Page(_)) => {
                self.relay(message.clone());
                Reply::received()
            }
            Message::AnalyzeText { text } => self.classify_text(text).await.into(),
            Message::AnalyzeImage { image_data } => self.classify_image(image_data).await.into(),
            Message::OcrImage { image_data } => {
                self.relay(Message::OcrImageReady {
                    image_data: image_data.clone(),
                });
                Reply::received()
            }
            Message::OcrImageReady { .. } => {
                Reply::error(format!("Unsupported action: {action}"))
            }
        };

        let event = match &reply {
            Reply::Error { error } => AnalysisEvent::Failed {
                action: action.to_string(),
                error_msg: error.clone(),
            },
            Reply::Analysis(AnalysisResult {
                verdict, confidence, ..
            })
            | Reply::Image(ImageAnalysis {
                verdict, confidence, ..
            }) => AnalysisEvent::Completed {
                action: action.to_string(),
                verdict: verdict.to_string(),
                confidence: *confidence,
                latency_ms: started.elapsed().as_millis() as u64,
            },
            Reply::Received { .. } | Reply::Screenshot(_) => return reply,
        };
        EventLogger::log_event(&request_id, event);
        reply
    }
}

#[async_trait]
impl Component for Coordinator {
    fn name(&self) -> &str {
        "coordinator"
    }

    async fn start(&self, mut rx: mpsc::Receiver<Envelope>) -> Result<()> {
        info!(
            ocr = self.inner.ocr.name(),
            classifier = self.inner.classifier.provider_name(),
            "Coordinator started"
        );

        while let Some(env) = rx.recv().await {
            let this = self.clone();
            tokio::spawn(async move {
                let reply = this.handle(&env.origin, &env.message).await;
                env.respond(reply);
            });
        }

        info!("Coordinator stopped");
        Ok(())
    }
}

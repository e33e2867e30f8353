//! Panel request flows: typed text, uploaded files, page scans, and relays.

use std::sync::Arc;

use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use truthlens_capture::{Platform, PlatformRules};
use truthlens_core::{Message, RuntimeClient, TruthLensError};

use crate::mode::{InputMode, ModeAction};
use crate::tab::TabHost;
use crate::transcript::{ChatEntry, Transcript};

pub const SCANNING_MESSAGE: &str = "📸 Scanning page...";
pub const NO_POST_MESSAGE: &str = "❌ No tweet found. Please open a tweet and try again.";
pub const DRAG_ENABLED_MESSAGE: &str =
    "✅ Drag-select enabled!\n\nDrag your mouse to select the area with text you want to analyze.";
pub const OCR_PROGRESS_MESSAGE: &str = "🔍 Extracting text with OCR...";

/// Extracted text longer than this is cut in the preview bubble.
const PREVIEW_CHARS: usize = 200;

/// The user-facing panel. Each request awaits exactly one coordinator reply.
pub struct Panel {
    client: RuntimeClient,
    tabs: Arc<dyn TabHost>,
    rules: PlatformRules,
    transcript: Transcript,
    mode: Mutex<InputMode>,
}

impl Panel {
    pub fn new(client: RuntimeClient, tabs: Arc<dyn TabHost>, rules: PlatformRules) -> Self {
        Self {
            client,
            tabs,
            rules,
            transcript: Transcript::new(),
            mode: Mutex::new(InputMode::default()),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub async fn mode(&self) -> InputMode {
        *self.mode.lock().await
    }

    /// Switch input mode. Image and Capture start their acquisition flow at once.
    pub async fn select_mode(&self, mode: InputMode) -> ModeAction {
        *self.mode.lock().await = mode;
        debug!(?mode, "Input mode selected");
        match mode {
            InputMode::Text => ModeAction::FocusInput,
            InputMode::Image => ModeAction::OpenFilePicker,
            InputMode::Capture => {
                self.scan_current_page().await;
                ModeAction::Scanned
            }
        }
    }

    /// Send typed text. Blank input is ignored.
    pub async fn send(&self, input: &str) {
        let text = input.trim();
        if text.is_empty() {
            return;
        }
        self.transcript.push(ChatEntry::UserText(text.to_string())).await;
        self.analyze_text(text).await;
    }

    /// Analyze an uploaded file right away. The image is not kept for a later send.
    pub async fn upload_file(&self, data_url: &str) {
        self.transcript
            .push(ChatEntry::UserImage(data_url.to_string()))
            .await;
        self.analyze_image(data_url).await;
    }

    /// Read post text from the active tab, or inject the capture agent.
    pub async fn scan_current_page(&self) {
        self.transcript
            .push(ChatEntry::Assistant(SCANNING_MESSAGE.to_string()))
            .await;
        if let Err(e) = self.try_scan().await {
            warn!(error = %e, "Page scan failed");
            self.transcript
                .push(ChatEntry::Error(format!("❌ Error: {e}")))
                .await;
        }
    }

    async fn try_scan(&self) -> Result<(), TruthLensError> {
        let tab = self.tabs.active_tab().await?;
        let platform = self.rules.classify_url(&tab.url);
        info!(tab = tab.id, ?platform, "Scanning page");

        if platform != Platform::PostText {
            self.tabs.inject_capture_agent(&tab).await?;
            self.transcript
                .push(ChatEntry::Assistant(DRAG_ENABLED_MESSAGE.to_string()))
                .await;
            return Ok(());
        }

        let text = self
            .tabs
            .extract_post_text(&tab, &self.rules.post_text_selector)
            .await?
            .filter(|t| !t.trim().is_empty());
        let Some(text) = text else {
            self.transcript
                .push(ChatEntry::Error(NO_POST_MESSAGE.to_string()))
                .await;
            return Ok(());
        };

        self.transcript.push(ChatEntry::UserText(text.clone())).await;
        let typing = self.transcript.show_typing().await;
        let result = self.client.analyze_text(&text).await;
        self.transcript.remove_typing(typing).await;
        self.transcript.push(ChatEntry::Result(result?)).await;
        Ok(())
    }

    /// Classify text and render the result or an error bubble.
    pub async fn analyze_text(&self, text: &str) {
        let typing = self.transcript.show_typing().await;
        let result = self.client.analyze_text(text).await;
        self.transcript.remove_typing(typing).await;
        let entry = match result {
            Ok(result) => ChatEntry::Result(result),
            Err(e) => ChatEntry::Error(format!("❌ Error: {e}")),
        };
        self.transcript.push(entry).await;
    }

    /// OCR and classify an image, showing a preview of the extracted text.
    pub async fn analyze_image(&self, image_data: &str) {
        self.transcript
            .push(ChatEntry::Assistant(OCR_PROGRESS_MESSAGE.to_string()))
            .await;
        let typing = self.transcript.show_typing().await;
        let result = self.client.analyze_image(image_data).await;
        self.transcript.remove_typing(typing).await;

        match result {
            Ok(analysis) => {
                if !analysis.extracted_text.is_empty() {
                    self.transcript
                        .push(ChatEntry::Assistant(format!(
                            "📄 Extracted text:\n\n\"{}\"",
                            preview(&analysis.extracted_text)
                        )))
                        .await;
                }
                self.transcript
                    .push(ChatEntry::Result(analysis.result()))
                    .await;
            }
            Err(e) => {
                self.transcript
                    .push(ChatEntry::Error(format!("❌ {e}")))
                    .await;
            }
        }
    }

    /// Handle a message relayed from a page by the coordinator.
    pub async fn on_relay(&self, message: Message) {
        match message {
            Message::OcrImageReady { image_data } if !image_data.is_empty() => {
                self.upload_file(&image_data).await;
            }
            Message::AnalyzeText { text } if !text.is_empty() => {
                self.transcript.push(ChatEntry::UserText(text.clone())).await;
                self.analyze_text(&text).await;
            }
            other => debug!(action = other.action(), "Ignoring relayed message"),
        }
    }

    /// Consume relays until the channel closes. Each relay is handled on its own task.
    pub async fn listen(self: Arc<Self>, mut relays: broadcast::Receiver<Message>) {
        loop {
            match relays.recv().await {
                Ok(message) => {
                    let panel = Arc::clone(&self);
                    tokio::spawn(async move { panel.on_relay(message).await });
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Panel lagged behind relays");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use truthlens_core::{
        AnalysisResult, ImageAnalysis, MessageBus, Origin, Reply, TabInfo, Verdict,
    };

    struct FakeTabs {
        url: String,
        post_text: Option<String>,
        injected: StdMutex<Vec<u32>>,
    }

    impl FakeTabs {
        fn new(url: &str, post_text: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                url: url.into(),
                post_text: post_text.map(String::from),
                injected: StdMutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TabHost for FakeTabs {
        async fn active_tab(&self) -> Result<TabInfo, TruthLensError> {
            Ok(TabInfo {
                id: 12,
                window_id: 1,
                url: self.url.clone(),
            })
        }
        async fn extract_post_text(
            &self,
            _tab: &TabInfo,
            _selector: &str,
        ) -> Result<Option<String>, TruthLensError> {
            Ok(self.post_text.clone())
        }
        async fn inject_capture_agent(&self, tab: &TabInfo) -> Result<(), TruthLensError> {
            self.injected.lock().unwrap().push(tab.id);
            Ok(())
        }
    }

    type OcrOutcome = Result<String, String>;

    /// Coordinator stand-in: classifies "fake ..." text as fake and answers OCR with `ocr`.
    fn fake_coordinator(bus: &mut MessageBus, ocr: OcrOutcome) {
        let mut rx = bus.take_coordinator_rx().unwrap();
        tokio::spawn(async move {
            while let Some(env) = rx.recv().await {
                let ocr = ocr.clone();
                tokio::spawn(async move {
                    let reply = match &env.message {
                        Message::AnalyzeText { text } => {
                            if text.starts_with("slow") {
                                tokio::time::sleep(Duration::from_millis(100)).await;
                            }
                            let verdict = if text.starts_with("fake") {
                                Verdict::Fake
                            } else {
                                Verdict::Real
                            };
                            Reply::Analysis(AnalysisResult::new(verdict, 90, text.clone()))
                        }
                        Message::AnalyzeImage { .. } => match ocr {
                            Ok(text) => Reply::Image(ImageAnalysis::new(
                                text,
                                AnalysisResult::new(Verdict::Fake, 60, "ocr verdict"),
                            )),
                            Err(msg) => Reply::error(msg),
                        },
                        _ => Reply::error("unsupported"),
                    };
                    env.respond(reply);
                });
            }
        });
    }

    fn setup(url: &str, post_text: Option<&str>, ocr: OcrOutcome) -> (MessageBus, Panel, Arc<FakeTabs>) {
        let mut bus = MessageBus::new();
        fake_coordinator(&mut bus, ocr);
        let tabs = FakeTabs::new(url, post_text);
        let panel = Panel::new(bus.client(Origin::Panel), tabs.clone(), PlatformRules::default());
        (bus, panel, tabs)
    }

    fn no_ocr() -> OcrOutcome {
        Ok(String::new())
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let (_bus, panel, _) = setup("https://example.org", None, no_ocr());
        panel.send("   \n").await;
        assert!(panel.transcript().is_empty().await);
    }

    #[tokio::test]
    async fn send_renders_result_without_typing_indicator() {
        let (_bus, panel, _) = setup("https://example.org", None, no_ocr());
        panel.send("  fake moon landing ").await;
        let entries = panel.transcript().entries().await;
        assert_eq!(entries[0], ChatEntry::UserText("fake moon landing".into()));
        assert!(matches!(&entries[1], ChatEntry::Result(r) if r.verdict == Verdict::Fake));
        assert_eq!(entries.len(), 2);
    }

    #[tokio::test]
    async fn dead_coordinator_becomes_error_bubble() {
        let mut bus = MessageBus::new();
        drop(bus.take_coordinator_rx());
        let panel = Panel::new(
            bus.client(Origin::Panel),
            FakeTabs::new("https://example.org", None),
            PlatformRules::default(),
        );
        panel.send("anything").await;
        let entries = panel.transcript().entries().await;
        assert_eq!(
            entries.last().unwrap(),
            &ChatEntry::Error(
                "❌ Error: Could not establish connection. Receiving end does not exist.".into()
            )
        );
    }

    #[tokio::test]
    async fn image_preview_is_capped() {
        let (_bus, panel, _) = setup("https://example.org", None, Ok("x".repeat(250)));
        panel.upload_file("data:image/png;base64,AAAA").await;

        let entries = panel.transcript().entries().await;
        assert_eq!(entries[0], ChatEntry::UserImage("data:image/png;base64,AAAA".into()));
        assert_eq!(entries[1], ChatEntry::Assistant(OCR_PROGRESS_MESSAGE.into()));
        let expected = format!("📄 Extracted text:\n\n\"{}...\"", "x".repeat(200));
        assert_eq!(entries[2], ChatEntry::Assistant(expected));
        assert!(matches!(&entries[3], ChatEntry::Result(r) if r.confidence == 60));
    }

    #[tokio::test]
    async fn image_error_uses_plain_prefix() {
        let (_bus, panel, _) = setup("https://example.org", None, Err("bad image".into()));
        panel.upload_file("data:image/png;base64,AAAA").await;
        let entries = panel.transcript().entries().await;
        assert_eq!(entries.last().unwrap(), &ChatEntry::Error("❌ bad image".into()));
    }

    #[tokio::test]
    async fn scan_on_post_platform_analyzes_post_text() {
        let (_bus, panel, tabs) = setup("https://x.com/a/status/1", Some("fake claim"), no_ocr());
        assert_eq!(panel.select_mode(InputMode::Capture).await, ModeAction::Scanned);

        let entries = panel.transcript().entries().await;
        assert_eq!(entries[0], ChatEntry::Assistant(SCANNING_MESSAGE.into()));
        assert_eq!(entries[1], ChatEntry::UserText("fake claim".into()));
        assert!(matches!(&entries[2], ChatEntry::Result(r) if r.verdict == Verdict::Fake));
        assert!(tabs.injected.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn scan_without_post_text_reports_missing_post() {
        let (_bus, panel, _) = setup("https://twitter.com/home", None, no_ocr());
        panel.scan_current_page().await;
        let entries = panel.transcript().entries().await;
        assert_eq!(entries.last().unwrap(), &ChatEntry::Error(NO_POST_MESSAGE.into()));
    }

    #[tokio::test]
    async fn scan_elsewhere_injects_capture_agent() {
        let (_bus, panel, tabs) = setup("https://news.example.org/story", None, no_ocr());
        panel.scan_current_page().await;
        assert_eq!(*tabs.injected.lock().unwrap(), vec![12]);
        let entries = panel.transcript().entries().await;
        assert_eq!(entries.last().unwrap(), &ChatEntry::Assistant(DRAG_ENABLED_MESSAGE.into()));
    }

    #[tokio::test]
    async fn image_mode_asks_for_file_picker() {
        let (_bus, panel, _) = setup("https://example.org", None, no_ocr());
        assert_eq!(panel.select_mode(InputMode::Image).await, ModeAction::OpenFilePicker);
        assert_eq!(panel.mode().await, InputMode::Image);
        assert!(panel.transcript().is_empty().await);
    }

    #[tokio::test]
    async fn relayed_crop_is_analyzed() {
        let (bus, panel, _) = setup("https://example.org", None, Ok("Breaking news".into()));
        let panel = Arc::new(panel);
        tokio::spawn(Arc::clone(&panel).listen(bus.subscribe()));

        bus.relay_sender()
            .send(Message::OcrImageReady {
                image_data: "data:image/png;base64,CROP".into(),
            })
            .unwrap();

        for _ in 0..50 {
            if panel
                .transcript()
                .entries()
                .await
                .iter()
                .any(|e| matches!(e, ChatEntry::Result(_)))
            {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let entries = panel.transcript().entries().await;
        assert_eq!(entries[0], ChatEntry::UserImage("data:image/png;base64,CROP".into()));
        assert!(entries.iter().any(|e| matches!(e, ChatEntry::Result(_))));
    }

    #[tokio::test]
    async fn results_render_in_completion_order() {
        let (_bus, panel, _) = setup("https://example.org", None, no_ocr());
        tokio::join!(panel.send("slow claim"), panel.send("quick claim"));

        let results: Vec<String> = panel
            .transcript()
            .entries()
            .await
            .into_iter()
            .filter_map(|e| match e {
                ChatEntry::Result(r) => Some(r.analysis),
                _ => None,
            })
            .collect();
        assert_eq!(results, vec!["quick claim", "slow claim"]);
    }
}

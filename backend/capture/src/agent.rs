//! Capture agent: turns page content into exactly one outbound request.

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use truthlens_core::{CaptureRequest, RuntimeClient};

use crate::crop::crop_to_data_url;
use crate::latch::ActivationLatch;
use crate::page::PageContext;
use crate::platform::{region_notice, Platform, PlatformRules, NO_POST_TEXT_NOTICE};
use crate::region::{PointerEvent, RegionSelector};

/// How an activation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Another capture is running on this page.
    AlreadyActive,
    /// A request of this kind was delivered to the coordinator.
    Sent(&'static str),
    /// The capture ended without a request. Never surfaced to the panel.
    Aborted(AbortReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    NoSelection,
    Screenshot(String),
    Decode(String),
    Delivery(String),
}

pub struct CaptureAgent {
    client: RuntimeClient,
    rules: PlatformRules,
    latch: ActivationLatch,
}

impl CaptureAgent {
    /// `latch` is the page's latch; agents injected into the same page must share it.
    pub fn new(client: RuntimeClient, rules: PlatformRules, latch: ActivationLatch) -> Self {
        Self {
            client,
            rules,
            latch,
        }
    }

    /// Run one capture on `page`, consuming pointer input from `pointer`.
    pub async fn activate(
        &self,
        page: &dyn PageContext,
        pointer: mpsc::Receiver<PointerEvent>,
    ) -> CaptureOutcome {
        let Some(_guard) = self.latch.try_acquire() else {
            debug!("Capture already active on this page");
            return CaptureOutcome::AlreadyActive;
        };

        let host = page.hostname();
        let platform = self.rules.classify_host(&host);
        info!(host = %host, ?platform, "Capture agent activated");

        if platform == Platform::PostText {
            if let Some(request) = self.detect_platform_text(page).await {
                return self.deliver(request).await;
            }
            page.notify(NO_POST_TEXT_NOTICE).await;
        }

        page.notify(region_notice(platform)).await;
        self.capture_region(page, pointer).await
    }

    /// Read structured post text from the page, if present and non-empty.
    pub async fn detect_platform_text(&self, page: &dyn PageContext) -> Option<CaptureRequest> {
        let text = page.query_text(&self.rules.post_text_selector).await?;
        if text.trim().is_empty() {
            return None;
        }
        Some(CaptureRequest::Text(text))
    }

    /// Drag-select a region, crop the viewport to it, and send the crop.
    /// The overlay is removed on every path.
    pub async fn capture_region(
        &self,
        page: &dyn PageContext,
        pointer: mpsc::Receiver<PointerEvent>,
    ) -> CaptureOutcome {
        page.mount_overlay().await;
        let outcome = self.select_and_send(page, pointer).await;
        page.unmount_overlay().await;
        outcome
    }

    async fn select_and_send(
        &self,
        page: &dyn PageContext,
        mut pointer: mpsc::Receiver<PointerEvent>,
    ) -> CaptureOutcome {
        let mut selector = RegionSelector::new();
        while let Some(event) = pointer.recv().await {
            let visible = selector.handle(event);
            if event == PointerEvent::Up {
                break;
            }
            if let Some(rect) = visible {
                page.draw_selection(rect).await;
            }
        }

        let Some(rect) = selector.finish() else {
            debug!("No region selected");
            return CaptureOutcome::Aborted(AbortReason::NoSelection);
        };

        page.hide_overlay().await;

        let screenshot = match self.client.capture_visible_tab().await {
            Ok(shot) => shot,
            Err(e) => {
                warn!(error = %e, "Viewport capture failed");
                return CaptureOutcome::Aborted(AbortReason::Screenshot(e.to_string()));
            }
        };

        let cropped = match crop_to_data_url(&screenshot, rect, page.device_pixel_ratio()) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Cropping screenshot failed");
                return CaptureOutcome::Aborted(AbortReason::Decode(e.to_string()));
            }
        };

        self.deliver(CaptureRequest::Image(cropped)).await
    }

    async fn deliver(&self, request: CaptureRequest) -> CaptureOutcome {
        let kind = request.kind();
        match self.client.submit_capture(request).await {
            Ok(()) => {
                info!(kind, "Capture delivered");
                CaptureOutcome::Sent(kind)
            }
            Err(e) => {
                warn!(kind, error = %e, "Capture delivery failed");
                CaptureOutcome::Aborted(AbortReason::Delivery(e.to_string()))
            }
        }
    }
}

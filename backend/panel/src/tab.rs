use async_trait::async_trait;

use truthlens_core::{TabInfo, TruthLensError};

/// The platform's tab query and script-injection primitives, as seen by the panel.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// The active tab of the current window.
    async fn active_tab(&self) -> Result<TabInfo, TruthLensError>;

    /// Run the post-text extraction in `tab`. `None` when no element matches.
    async fn extract_post_text(
        &self,
        tab: &TabInfo,
        selector: &str,
    ) -> Result<Option<String>, TruthLensError>;

    /// Inject the capture agent; progress continues asynchronously from the page.
    async fn inject_capture_agent(&self, tab: &TabInfo) -> Result<(), TruthLensError>;
}

use async_trait::async_trait;

use truthlens_core::{ScreenCapture, TruthLensError};

/// Screen capture for contexts without a browser window (gateway, CLI).
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableScreenCapture;

#[async_trait]
impl ScreenCapture for UnavailableScreenCapture {
    async fn capture_visible_tab(&self, window_id: u32) -> Result<String, TruthLensError> {
        Err(TruthLensError::Capture(format!(
            "no visible tab for window {window_id} in this context"
        )))
    }
}

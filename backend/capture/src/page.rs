//! The page-side surface the capture agent drives.

use async_trait::async_trait;

use crate::region::Rect;

/// What the capture agent needs from the page it was injected into.
#[async_trait]
pub trait PageContext: Send + Sync {
    fn hostname(&self) -> String;

    fn device_pixel_ratio(&self) -> f64;

    /// Inner text of the first element matching `selector`, if any.
    async fn query_text(&self, selector: &str) -> Option<String>;

    /// Show a blocking notice to the user.
    async fn notify(&self, message: &str);

    /// Insert the full-viewport selection overlay.
    async fn mount_overlay(&self);

    async fn draw_selection(&self, rect: Rect);

    /// Hide the overlay so it does not appear in the screenshot.
    async fn hide_overlay(&self);

    /// Remove the overlay from the page.
    async fn unmount_overlay(&self);
}

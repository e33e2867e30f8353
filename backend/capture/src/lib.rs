//! Page-side capture: detect post text or drag-select a region, then hand the
//! result to the coordinator as a single request.

pub mod agent;
pub mod crop;
pub mod latch;
pub mod page;
pub mod platform;
pub mod region;

pub use agent::{AbortReason, CaptureAgent, CaptureOutcome};
pub use latch::{ActivationLatch, LatchGuard};
pub use page::PageContext;
pub use platform::{Platform, PlatformRules};
pub use region::{Point, PointerEvent, Rect, RegionSelector};
